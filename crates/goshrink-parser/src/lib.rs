//! Hand-written recursive descent parser for Go source.
//!
//! Builds arena nodes (`goshrink-ast`) directly; expression parsing is Pratt
//! style with a single operator table. The parser consumes the
//! semicolon-normalized token stream from `goshrink-lexer`.

pub mod parser;

pub use parser::{parse_file, ParseError};
