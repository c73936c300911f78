pub mod import_books_cmd;
