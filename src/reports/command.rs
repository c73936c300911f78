pub mod borrowing_report_cmd;
