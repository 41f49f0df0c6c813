pub mod error;
pub mod parser;

// Re-export the parser and rule enum for external use
pub use error::ParseError;
pub use parser::{ProgramParser, Rule, parse};

#[cfg(test)]
mod parse_test;

#[cfg(test)]
mod precedence_test;
