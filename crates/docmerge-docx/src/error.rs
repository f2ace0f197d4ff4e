use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("xml error: {0}")]
    Xml(String),
    #[error("missing docx part: {0}")]
    MissingPart(String),
    #[error("invalid placeholder pattern: {0}")]
    InvalidPattern(String),
}
