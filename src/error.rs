// src/error.rs
//
// Errors from the outer surface (loading documents, picking a start node).
// Walking a tree never fails; exhaustion is part of the output stream.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("no <{tag}> element in the document")]
    RootNotFound { tag: String },

    #[error("start offset {offset} is past the end of the root's text ({len} units)")]
    OffsetOutOfRange { offset: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
