// Command Parser - raw console text → class name + arguments

pub mod literal;
pub mod parser;

pub use literal::{find_literal, parse_literal};
pub use parser::{parse_line, split_arguments, tokenize, ParseError, ParsedLine, Syntax};
