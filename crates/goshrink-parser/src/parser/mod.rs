//! Recursive descent parser over the semicolon-normalized token stream.
//!
//! ## Architecture
//!
//! - `stream`: TokenStream wrapper with lookahead
//! - `error`: ParseError
//! - `decl`: file, declaration, and spec parsers
//! - `stmt`: statement parsers
//! - `expr`: expression parser (Pratt core + operands + postfix)
//! - `types`: type and signature parsers
//!
//! The single piece of shared state beyond the stream is `no_lit`, the
//! composite-literal suppression depth: inside an `if`/`for`/`switch` header
//! a brace opens the block, so `T{...}` needs parentheses there unless the
//! literal type is unambiguous (slice, map, array).

mod error;
mod stream;

pub use error::{ParseError, ParseErrorKind};
use stream::TokenStream;

mod decl;
mod expr;
mod stmt;
mod types;

use goshrink_ast::{Ast, Node, NodeId, Span};
use goshrink_lexer::Token;

pub(crate) struct Parser<'src, 'a> {
    pub(crate) stream: TokenStream<'src>,
    pub(crate) ast: &'a mut Ast,
    /// Composite-literal suppression depth (>0 inside control headers).
    pub(crate) no_lit: u32,
}

impl<'src, 'a> Parser<'src, 'a> {
    /// Allocate `node` with a span from token position `start` to here.
    pub(crate) fn alloc(&mut self, node: Node, start: usize) -> NodeId {
        let span = self.stream.span_from(start);
        self.ast.alloc(node, span)
    }

    /// Parse a plain identifier.
    pub(crate) fn parse_ident(&mut self) -> Result<NodeId, ParseError> {
        let start = self.stream.current_pos();
        let span = self.stream.current_span();
        match self.stream.advance() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                Ok(self.alloc(Node::Ident { name }, start))
            }
            found => Err(ParseError::unexpected_token(
                found,
                "where an identifier was expected",
                span,
            )),
        }
    }

    /// Run `f` with composite literals re-enabled (inside parens, brackets,
    /// call arguments, or a braced body).
    pub(crate) fn with_lit<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = self.no_lit;
        self.no_lit = 0;
        let result = f(self);
        self.no_lit = saved;
        result
    }
}

/// Parse one Go source file into `ast`, returning the file root.
pub fn parse_file(source: &str, file_id: u16, ast: &mut Ast) -> Result<NodeId, ParseError> {
    let tokens = goshrink_lexer::tokenize(source).map_err(|e| {
        ParseError::invalid_syntax(
            e.to_string(),
            Span::new(file_id, e.offset as u32, e.offset as u32),
        )
    })?;
    let mut p = Parser {
        stream: TokenStream::new(&tokens, file_id),
        ast,
        no_lit: 0,
    };
    decl::parse_file(&mut p)
}
