mod error;
mod parse;
mod types;

#[cfg(test)]
mod tests;

pub use error::ParseError;
pub use parse::{TIMESTAMP_FORMAT, parse_line};
pub use types::{RawLine, RequestEvent, is_success_status};

pub(crate) use parse::has_shape;
