use std::fmt;

#[derive(Debug)]
pub enum ExportError {
    Csv(String),
    Xlsx(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(msg) => write!(f, "CSV export error: {msg}"),
            Self::Xlsx(msg) => write!(f, "XLSX export error: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}
