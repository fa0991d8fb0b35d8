//! File, declaration, and spec parsers.

use super::{ParseError, Parser};
use goshrink_ast::{DeclKeyword, Node, NodeId};
use goshrink_lexer::Token;

/// Parse a whole source file: package clause, imports, declarations.
pub(crate) fn parse_file(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::Package)?;
    let package = p.parse_ident()?;
    p.stream.expect(Token::Semi)?;

    let mut imports = Vec::new();
    while p.stream.check(&Token::Import) {
        imports.push(parse_gen_decl(p, DeclKeyword::Import)?);
        p.stream.eat(&Token::Semi);
    }

    let mut decls = Vec::new();
    while !p.stream.at_end() {
        match p.stream.peek() {
            Some(Token::Semi) => {
                p.stream.advance();
            }
            Some(Token::Func) => {
                decls.push(parse_func_decl(p)?);
                p.stream.eat(&Token::Semi);
            }
            Some(Token::Var) => {
                decls.push(parse_gen_decl(p, DeclKeyword::Var)?);
                p.stream.eat(&Token::Semi);
            }
            Some(Token::Const) => {
                decls.push(parse_gen_decl(p, DeclKeyword::Const)?);
                p.stream.eat(&Token::Semi);
            }
            Some(Token::Type) => {
                decls.push(parse_gen_decl(p, DeclKeyword::Type)?);
                p.stream.eat(&Token::Semi);
            }
            found => {
                return Err(ParseError::unexpected_token(
                    found,
                    "at top level",
                    p.stream.current_span(),
                ))
            }
        }
    }

    Ok(p.alloc(
        Node::File {
            package,
            imports,
            decls,
        },
        start,
    ))
}

/// Parse a grouped or single declaration for `keyword`.
pub(crate) fn parse_gen_decl(p: &mut Parser, keyword: DeclKeyword) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    p.stream.advance(); // the keyword token, dispatched by the caller
    let mut specs = Vec::new();
    if p.stream.eat(&Token::LParen) {
        while !p.stream.check(&Token::RParen) {
            if p.stream.eat(&Token::Semi) {
                continue;
            }
            specs.push(parse_spec(p, keyword)?);
            if !p.stream.check(&Token::RParen) {
                p.stream.expect(Token::Semi)?;
            }
        }
        p.stream.expect(Token::RParen)?;
    } else {
        specs.push(parse_spec(p, keyword)?);
    }
    Ok(p.alloc(Node::GenDecl { keyword, specs }, start))
}

fn parse_spec(p: &mut Parser, keyword: DeclKeyword) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    match keyword {
        DeclKeyword::Import => {
            let alias = match p.stream.peek() {
                Some(Token::Ident(_)) => Some(p.parse_ident()?),
                Some(Token::Dot) => {
                    let dot_start = p.stream.current_pos();
                    p.stream.advance();
                    Some(p.alloc(Node::Ident { name: ".".into() }, dot_start))
                }
                _ => None,
            };
            let path = parse_string_lit(p)?;
            Ok(p.alloc(Node::ImportSpec { alias, path }, start))
        }
        DeclKeyword::Var | DeclKeyword::Const => {
            let mut names = vec![p.parse_ident()?];
            while p.stream.eat(&Token::Comma) {
                names.push(p.parse_ident()?);
            }
            let ty = if !matches!(
                p.stream.peek(),
                Some(Token::Eq) | Some(Token::Semi) | Some(Token::RParen) | None
            ) {
                Some(super::types::parse_type(p)?)
            } else {
                None
            };
            let values = if p.stream.eat(&Token::Eq) {
                super::expr::parse_expr_list(p)?
            } else {
                Vec::new()
            };
            Ok(p.alloc(Node::ValueSpec { names, ty, values }, start))
        }
        DeclKeyword::Type => {
            let name = p.parse_ident()?;
            // `type A = B` aliases keep the same node shape.
            p.stream.eat(&Token::Eq);
            let ty = super::types::parse_type(p)?;
            Ok(p.alloc(Node::TypeSpec { name, ty }, start))
        }
    }
}

fn parse_string_lit(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    let span = p.stream.current_span();
    match p.stream.advance() {
        Some(Token::String(text)) => {
            let text = text.clone();
            Ok(p.alloc(
                Node::BasicLit {
                    kind: goshrink_ast::LitKind::String,
                    text,
                },
                start,
            ))
        }
        found => Err(ParseError::unexpected_token(
            found,
            "where an import path was expected",
            span,
        )),
    }
}

fn parse_func_decl(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::Func)?;
    let recv = if p.stream.check(&Token::LParen) {
        Some(super::types::parse_receiver(p)?)
    } else {
        None
    };
    let name = p.parse_ident()?;
    let sig = super::types::parse_signature(p)?;
    let body = if p.stream.check(&Token::LBrace) {
        Some(super::stmt::parse_block(p)?)
    } else {
        None
    };
    Ok(p.alloc(
        Node::FuncDecl {
            recv,
            name,
            sig,
            body,
        },
        start,
    ))
}
