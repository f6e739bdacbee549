use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// Required column absent from a recipient export header.
    MissingColumn { column: String },
    /// A count cell did not parse as an integer.
    CountParse { email: String, column: String, value: String },
    /// CSV-level read error (malformed record, bad quoting, etc.).
    Csv(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { column } => {
                write!(f, "recipient export: missing column '{column}'")
            }
            Self::CountParse { email, column, value } => {
                write!(f, "recipient '{email}': cannot parse {column} '{value}'")
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
