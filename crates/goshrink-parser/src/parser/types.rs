//! Type, signature, and parameter-list parsers.

use super::{ParseError, Parser};
use goshrink_ast::{ChanDir, Node, NodeId};
use goshrink_lexer::Token;

/// Whether `token` can begin a type.
pub(crate) fn starts_type(token: &Token) -> bool {
    matches!(
        token,
        Token::Ident(_)
            | Token::Star
            | Token::LBracket
            | Token::Map
            | Token::Chan
            | Token::Arrow
            | Token::Func
            | Token::Struct
            | Token::Interface
            | Token::LParen
    )
}

pub(crate) fn parse_type(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    match p.stream.peek() {
        Some(Token::Ident(_)) => {
            let mut ty = p.parse_ident()?;
            if p.stream.eat(&Token::Dot) {
                let sel = p.parse_ident()?;
                ty = p.alloc(Node::Selector { base: ty, sel }, start);
            }
            Ok(ty)
        }
        Some(Token::Star) => {
            p.stream.advance();
            let inner = parse_type(p)?;
            Ok(p.alloc(Node::Star { inner }, start))
        }
        Some(Token::LBracket) => {
            p.stream.advance();
            let len = if p.stream.check(&Token::RBracket) {
                None
            } else {
                Some(p.with_lit(super::expr::parse_expr)?)
            };
            p.stream.expect(Token::RBracket)?;
            let elem = parse_type(p)?;
            Ok(p.alloc(Node::ArrayType { len, elem }, start))
        }
        Some(Token::Map) => {
            p.stream.advance();
            p.stream.expect(Token::LBracket)?;
            let key = p.with_lit(parse_type)?;
            p.stream.expect(Token::RBracket)?;
            let value = parse_type(p)?;
            Ok(p.alloc(Node::MapType { key, value }, start))
        }
        Some(Token::Chan) => {
            p.stream.advance();
            let dir = if p.stream.eat(&Token::Arrow) {
                ChanDir::Send
            } else {
                ChanDir::Both
            };
            let elem = parse_type(p)?;
            Ok(p.alloc(Node::ChanType { dir, elem }, start))
        }
        Some(Token::Arrow) => {
            p.stream.advance();
            p.stream.expect(Token::Chan)?;
            let elem = parse_type(p)?;
            Ok(p.alloc(
                Node::ChanType {
                    dir: ChanDir::Recv,
                    elem,
                },
                start,
            ))
        }
        Some(Token::Func) => {
            p.stream.advance();
            parse_signature(p)
        }
        Some(Token::Struct) => {
            p.stream.advance();
            let fields = parse_struct_body(p)?;
            Ok(p.alloc(Node::StructType { fields }, start))
        }
        Some(Token::Interface) => {
            p.stream.advance();
            let methods = parse_interface_body(p)?;
            Ok(p.alloc(Node::InterfaceType { methods }, start))
        }
        Some(Token::LParen) => {
            p.stream.advance();
            let inner = p.with_lit(parse_type)?;
            p.stream.expect(Token::RParen)?;
            Ok(p.alloc(Node::Paren { inner }, start))
        }
        found => Err(ParseError::unexpected_token(
            found,
            "where a type was expected",
            p.stream.current_span(),
        )),
    }
}

/// Parse `(params) [results]`, producing a FuncType node.
///
/// The caller has already consumed the `func` keyword if there was one.
pub(crate) fn parse_signature(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    let params = parse_params(p)?;
    let results = match p.stream.peek() {
        Some(Token::LParen) => Some(parse_params(p)?),
        Some(tok) if starts_type(tok) => {
            let rstart = p.stream.current_pos();
            let ty = parse_type(p)?;
            let field = p.alloc(
                Node::Field {
                    names: Vec::new(),
                    ty,
                },
                rstart,
            );
            Some(p.alloc(
                Node::FieldList {
                    fields: vec![field],
                },
                rstart,
            ))
        }
        _ => None,
    };
    Ok(p.alloc(Node::FuncType { params, results }, start))
}

/// Parse a method receiver: `(name Type)` or `(Type)`.
pub(crate) fn parse_receiver(p: &mut Parser) -> Result<NodeId, ParseError> {
    parse_params(p)
}

/// Parse a parenthesized parameter list into a FieldList.
///
/// Go's grammar leaves `(a, b int)` vs `(int, string)` ambiguous until the
/// list is complete: a bare identifier element is a parameter *name* if some
/// later element in the group carries a type, otherwise it is itself a type.
/// Elements are parsed loosely, then regrouped.
fn parse_params(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::LParen)?;

    // (maybe-name, type) pairs before regrouping.
    let mut elements: Vec<(Option<NodeId>, NodeId)> = Vec::new();
    p.with_lit(|p| {
        while !p.stream.check(&Token::RParen) {
            let element = parse_param_element(p)?;
            elements.push(element);
            if !p.stream.check(&Token::RParen) {
                p.stream.expect(Token::Comma)?;
            }
        }
        Ok(())
    })?;
    p.stream.expect(Token::RParen)?;

    let any_named = elements.iter().any(|(name, _)| name.is_some());
    let mut fields = Vec::new();
    let mut pending: Vec<NodeId> = Vec::new();
    for (name, ty) in elements {
        match name {
            Some(name) => {
                let mut names = std::mem::take(&mut pending);
                names.push(name);
                fields.push(p.alloc(Node::Field { names, ty }, start));
            }
            None => {
                if any_named && matches!(p.ast.node(ty), Node::Ident { .. }) {
                    // A bare identifier in a named group is a name whose type
                    // comes from the next named element.
                    pending.push(ty);
                } else {
                    fields.push(p.alloc(
                        Node::Field {
                            names: Vec::new(),
                            ty,
                        },
                        start,
                    ));
                }
            }
        }
    }
    for ty in pending {
        fields.push(p.alloc(
            Node::Field {
                names: Vec::new(),
                ty,
            },
            start,
        ));
    }

    Ok(p.alloc(Node::FieldList { fields }, start))
}

fn parse_param_element(p: &mut Parser) -> Result<(Option<NodeId>, NodeId), ParseError> {
    let start = p.stream.current_pos();
    if p.stream.eat(&Token::Ellipsis) {
        let elem = parse_type(p)?;
        return Ok((None, p.alloc(Node::EllipsisType { elem }, start)));
    }
    if matches!(p.stream.peek(), Some(Token::Ident(_))) {
        let first = parse_type(p)?;
        // A plain identifier followed by a type (or `...T`) names a parameter.
        let is_plain_ident = matches!(p.ast.node(first), Node::Ident { .. });
        let next_is_type = match p.stream.peek() {
            Some(Token::Ellipsis) => true,
            Some(tok) => starts_type(tok),
            None => false,
        };
        if is_plain_ident && next_is_type {
            let tstart = p.stream.current_pos();
            let ty = if p.stream.eat(&Token::Ellipsis) {
                let elem = parse_type(p)?;
                p.alloc(Node::EllipsisType { elem }, tstart)
            } else {
                parse_type(p)?
            };
            return Ok((Some(first), ty));
        }
        return Ok((None, first));
    }
    let ty = parse_type(p)?;
    Ok((None, ty))
}

fn parse_struct_body(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::LBrace)?;
    let mut fields = Vec::new();
    while !p.stream.check(&Token::RBrace) {
        if p.stream.eat(&Token::Semi) {
            continue;
        }
        fields.push(parse_struct_field(p)?);
        if !p.stream.check(&Token::RBrace) {
            p.stream.expect(Token::Semi)?;
        }
    }
    p.stream.expect(Token::RBrace)?;
    Ok(p.alloc(Node::FieldList { fields }, start))
}

fn parse_struct_field(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    // `a, b T` names, `a T` a name, anything else an embedded type.
    let named = matches!(p.stream.peek(), Some(Token::Ident(_)))
        && match p.stream.peek_nth(1) {
            Some(Token::Comma) => true,
            Some(tok) => starts_type(tok),
            _ => false,
        };
    if named {
        let mut names = vec![p.parse_ident()?];
        while p.stream.eat(&Token::Comma) {
            names.push(p.parse_ident()?);
        }
        let ty = parse_type(p)?;
        skip_field_tag(p);
        Ok(p.alloc(Node::Field { names, ty }, start))
    } else {
        let ty = parse_type(p)?;
        skip_field_tag(p);
        Ok(p.alloc(
            Node::Field {
                names: Vec::new(),
                ty,
            },
            start,
        ))
    }
}

/// Struct tags are accepted and dropped; nothing downstream reads them.
fn skip_field_tag(p: &mut Parser) {
    if matches!(p.stream.peek(), Some(Token::String(_))) {
        p.stream.advance();
    }
}

fn parse_interface_body(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::LBrace)?;
    let mut methods = Vec::new();
    while !p.stream.check(&Token::RBrace) {
        if p.stream.eat(&Token::Semi) {
            continue;
        }
        let mstart = p.stream.current_pos();
        if matches!(p.stream.peek(), Some(Token::Ident(_)))
            && matches!(p.stream.peek_nth(1), Some(Token::LParen))
        {
            let name = p.parse_ident()?;
            let sig = parse_signature(p)?;
            methods.push(p.alloc(
                Node::Field {
                    names: vec![name],
                    ty: sig,
                },
                mstart,
            ));
        } else {
            let ty = parse_type(p)?;
            methods.push(p.alloc(
                Node::Field {
                    names: Vec::new(),
                    ty,
                },
                mstart,
            ));
        }
        if !p.stream.check(&Token::RBrace) {
            p.stream.expect(Token::Semi)?;
        }
    }
    p.stream.expect(Token::RBrace)?;
    Ok(p.alloc(Node::FieldList { fields: methods }, start))
}
