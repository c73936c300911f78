use std::io::Read;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use crate::books::dto::BookDto;
use crate::core::library::{LibraryError, LibraryResult};

// header columns every upload must carry, matched without regard to case
pub const REQUIRED_COLUMNS: [&str; 5] = ["isbn", "title", "author", "publication_year", "copies"];

// BookRow is one raw data row of an upload, numbers are parsed when the row is converted
#[derive(Debug, Clone, PartialEq)]
pub struct BookRow {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publication_year: String,
    pub copies: String,
}

impl BookRow {
    pub fn to_book(&self) -> LibraryResult<BookDto> {
        let publication_year = parse_number("publication_year", self.publication_year.as_str())?;
        let copies = parse_number("copies", self.copies.as_str())?;
        Ok(BookDto::new(self.isbn.as_str(), self.title.as_str(), self.author.as_str(),
                        publication_year, copies))
    }
}

fn parse_number(column: &str, value: &str) -> LibraryResult<i32> {
    value.trim().parse::<i32>().map_err(|_| LibraryError::validation(
        format!("{} must be a number, got '{}'", column, value).as_str(), Some("400".to_string())))
}

// CsvRowReader lazily yields the data rows of a CSV upload. The header is checked when the
// reader is built so a missing column rejects the upload before any row is read.
pub struct CsvRowReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    positions: [usize; 5],
}

impl<R: Read> CsvRowReader<R> {
    pub fn new(rdr: R) -> LibraryResult<Self> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(rdr);
        let headers = reader.headers()?.clone();
        let mut positions = [0; 5];
        for (ndx, column) in REQUIRED_COLUMNS.iter().enumerate() {
            positions[ndx] = headers.iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| LibraryError::validation(
                    format!("CSV header is missing column {}", column).as_str(), Some("400".to_string())))?;
        }
        Ok(Self {
            records: reader.into_records(),
            positions,
        })
    }

    fn field(&self, record: &StringRecord, ndx: usize) -> String {
        record.get(self.positions[ndx]).unwrap_or_default().to_string()
    }

    fn to_row(&self, record: &StringRecord) -> BookRow {
        BookRow {
            isbn: self.field(record, 0),
            title: self.field(record, 1),
            author: self.field(record, 2),
            publication_year: self.field(record, 3),
            copies: self.field(record, 4),
        }
    }
}

impl<R: Read> Iterator for CsvRowReader<R> {
    type Item = LibraryResult<BookRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(record.map_err(LibraryError::from).map(|r| self.to_row(&r)))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::LibraryError;
    use crate::imports::reader::CsvRowReader;

    #[tokio::test]
    async fn test_should_read_rows() {
        let content = "ISBN, Title ,author,publication_year,copies\n123, Test ,Author,2023,5\n456,Other,Writer,1999,x\n";
        let rows = CsvRowReader::new(content.as_bytes()).expect("should read header")
            .collect::<Vec<_>>();
        assert_eq!(2, rows.len());

        let first = rows[0].as_ref().expect("should read row");
        assert_eq!("123", first.isbn.as_str());
        assert_eq!("Test", first.title.as_str());
        let book = first.to_book().expect("should build book");
        assert_eq!(2023, book.publication_year);
        assert_eq!(5, book.copies_in_stock);

        let second = rows[1].as_ref().expect("should read row");
        assert!(matches!(second.to_book(), Err(LibraryError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_should_reorder_columns() {
        let content = "copies,author,title,isbn,publication_year\n3,Author,Title,789,2001\n";
        let row = CsvRowReader::new(content.as_bytes()).expect("should read header")
            .next().expect("should have row").expect("should read row");
        assert_eq!("789", row.isbn.as_str());
        assert_eq!("3", row.copies.as_str());
    }

    #[tokio::test]
    async fn test_should_reject_missing_column() {
        let content = "ISBN,title,author,copies\n123,Test,Author,5\n";
        assert!(matches!(CsvRowReader::new(content.as_bytes()), Err(LibraryError::Validation { .. })));
        assert!(matches!(CsvRowReader::new("".as_bytes()), Err(LibraryError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_should_tolerate_short_rows() {
        let content = "ISBN,title,author,publication_year,copies\n123,Test\n";
        let row = CsvRowReader::new(content.as_bytes()).expect("should read header")
            .next().expect("should have row").expect("should read row");
        assert_eq!("", row.author.as_str());
        assert!(row.to_book().is_err());
    }
}
