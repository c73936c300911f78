use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportFailure {
    // 1-based position of the data row, the header is not counted
    pub row: usize,
    pub isbn: Option<String>,
    pub message: String,
}

impl ImportFailure {
    pub fn new(row: usize, isbn: Option<String>, message: &str) -> Self {
        Self {
            row,
            isbn,
            message: message.to_string(),
        }
    }
}

// ImportSummary reports the outcome of a bulk upload row by row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub imported: usize,
    pub failures: Vec<ImportFailure>,
}

impl ImportSummary {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
