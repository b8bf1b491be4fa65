use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("unknown case matching mode `{0}`, expected one of: ignore, respect, smart")]
    UnknownCaseMatching(String),

    #[error("row {row} is out of range for a view of {len} tabs")]
    RowOutOfRange { row: usize, len: usize },
}
