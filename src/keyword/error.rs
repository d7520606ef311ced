use std::fmt;
use std::io;
use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown block: \"{0}\"")]
    UnknownBlock(String),
    #[error("Conflict at {0}")]
    Conflict(String),
    #[error("Block *{keyword} needs at least {expected} data lines, found {found}")]
    MissingLines {
        keyword: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },
    #[error("Missing field '{0}'")]
    MissingField(&'static str),
    #[error("Error parsing integer '{0}'")]
    ParseInt(String, #[source] ParseIntError),
    #[error("Error parsing float '{0}'")]
    ParseFloat(String, #[source] ParseFloatError),
    #[error("Error on line {0}: {1}")]
    LineError(usize, Box<Error>),
    #[error("Data on line {0} appears before any keyword")]
    OrphanDataLine(usize),
    #[error("Line {0} is not valid UTF-8")]
    Utf8(usize, #[source] bstr::Utf8Error),
    #[error("Missing section '{0}'")]
    MissingSection(&'static str),
    #[error("Missing reference {0}")]
    MissingReference(String),
    #[error("Unexpected value at {0}, expected {1}")]
    UnexpectedValue(String, &'static str),
    #[error("Load curve {0} does not select an axis")]
    UnknownAxis(i64),
    #[error("Formatting error")]
    Fmt(#[from] fmt::Error),
    #[error("Error reading keyword file : {0}")]
    IO(#[from] io::Error),
}

impl Error {
    pub(crate) fn on_line(self, line: usize) -> Self {
        match self {
            e @ Error::LineError(..) => e,
            e => Error::LineError(line, Box::new(e)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
