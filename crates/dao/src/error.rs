use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConvertError {
    #[error("Conversion not supported {0} to {1}")]
    NotSupported(String, String),
}

#[derive(Error, Debug, PartialEq)]
pub enum DaoError {
    #[error("ConvertError {0}")]
    ConvertError(ConvertError),
    #[error("No such value {0}")]
    NoSuchValueError(String),
    #[error("Invalid value for {column}: {reason}")]
    InvalidValue { column: String, reason: String },
}
