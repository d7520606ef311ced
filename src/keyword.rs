pub mod cards;
mod error;
mod model;
pub mod parser;
mod value;

pub use error::{Error, Result};
pub use model::Model;
pub use parser::{parse_bytes, parse_file, Block, Keyword, Parser, Row, IGNORED_KEYWORDS};
pub use value::{Key, Map, Scalar, Value};
