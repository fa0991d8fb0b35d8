//! Expression parser: Pratt core for binary operators, prefix unaries,
//! postfix chains (selector, index, slice, call, type assertion, composite
//! literal).

use super::{ParseError, Parser};
use goshrink_ast::{BinOp, LitKind, Node, NodeId, UnOp};
use goshrink_lexer::Token;

/// Binary operator precedence and meaning. Go's binary operators are all
/// left-associative; higher binds tighter.
fn binary_op_info(token: &Token) -> Option<(u8, BinOp)> {
    match token {
        Token::PipePipe => Some((1, BinOp::LogicalOr)),
        Token::AmpAmp => Some((2, BinOp::LogicalAnd)),
        Token::EqEq => Some((3, BinOp::Eq)),
        Token::BangEq => Some((3, BinOp::Ne)),
        Token::Lt => Some((3, BinOp::Lt)),
        Token::LtEq => Some((3, BinOp::Le)),
        Token::Gt => Some((3, BinOp::Gt)),
        Token::GtEq => Some((3, BinOp::Ge)),
        Token::Plus => Some((4, BinOp::Add)),
        Token::Minus => Some((4, BinOp::Sub)),
        Token::Pipe => Some((4, BinOp::Or)),
        Token::Caret => Some((4, BinOp::Xor)),
        Token::Star => Some((5, BinOp::Mul)),
        Token::Slash => Some((5, BinOp::Div)),
        Token::Percent => Some((5, BinOp::Rem)),
        Token::Amp => Some((5, BinOp::And)),
        Token::AmpCaret => Some((5, BinOp::AndNot)),
        Token::Shl => Some((5, BinOp::Shl)),
        Token::Shr => Some((5, BinOp::Shr)),
        _ => None,
    }
}

pub(crate) fn parse_expr(p: &mut Parser) -> Result<NodeId, ParseError> {
    parse_binary(p, 1)
}

pub(crate) fn parse_expr_list(p: &mut Parser) -> Result<Vec<NodeId>, ParseError> {
    let mut list = vec![parse_expr(p)?];
    while p.stream.eat(&Token::Comma) {
        list.push(parse_expr(p)?);
    }
    Ok(list)
}

fn parse_binary(p: &mut Parser, min_prec: u8) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    let mut left = parse_unary(p)?;
    while let Some((prec, op)) = p.stream.peek().and_then(binary_op_info) {
        if prec < min_prec {
            break;
        }
        p.stream.advance();
        let right = parse_binary(p, prec + 1)?;
        left = p.alloc(Node::Binary { op, left, right }, start);
    }
    Ok(left)
}

fn parse_unary(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    let op = match p.stream.peek() {
        Some(Token::Plus) => Some(UnOp::Plus),
        Some(Token::Minus) => Some(UnOp::Minus),
        Some(Token::Bang) => Some(UnOp::Not),
        Some(Token::Caret) => Some(UnOp::Xor),
        Some(Token::Amp) => Some(UnOp::And),
        Some(Token::Arrow) => Some(UnOp::Recv),
        Some(Token::Star) => {
            p.stream.advance();
            let inner = parse_unary(p)?;
            return Ok(p.alloc(Node::Star { inner }, start));
        }
        _ => None,
    };
    if let Some(op) = op {
        p.stream.advance();
        let operand = parse_unary(p)?;
        return Ok(p.alloc(Node::Unary { op, operand }, start));
    }
    parse_postfix(p)
}

fn parse_postfix(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    let mut expr = parse_operand(p)?;
    loop {
        match p.stream.peek() {
            Some(Token::Dot) => {
                p.stream.advance();
                if p.stream.eat(&Token::LParen) {
                    // Type assertion: x.(T) or the type-switch guard x.(type).
                    let ty = if p.stream.eat(&Token::Type) {
                        None
                    } else {
                        Some(p.with_lit(super::types::parse_type)?)
                    };
                    p.stream.expect(Token::RParen)?;
                    expr = p.alloc(Node::TypeAssert { base: expr, ty }, start);
                } else {
                    let sel = p.parse_ident()?;
                    expr = p.alloc(Node::Selector { base: expr, sel }, start);
                }
            }
            Some(Token::LBracket) => {
                p.stream.advance();
                expr = p.with_lit(|p| parse_index_or_slice(p, expr, start))?;
            }
            Some(Token::LParen) => {
                p.stream.advance();
                let mut args = Vec::new();
                let mut spread = false;
                p.with_lit(|p| {
                    while !p.stream.check(&Token::RParen) {
                        args.push(parse_expr(p)?);
                        if p.stream.eat(&Token::Ellipsis) {
                            spread = true;
                            break;
                        }
                        if !p.stream.eat(&Token::Comma) {
                            break;
                        }
                    }
                    Ok(())
                })?;
                p.stream.eat(&Token::Comma);
                p.stream.expect(Token::RParen)?;
                expr = p.alloc(
                    Node::Call {
                        fun: expr,
                        args,
                        spread,
                    },
                    start,
                );
            }
            Some(Token::LBrace) if composite_allowed(p, expr) => {
                expr = parse_composite_body(p, Some(expr), start)?;
            }
            _ => break,
        }
    }
    Ok(expr)
}

/// Whether a `{` after `expr` opens a composite literal here.
///
/// Suppressed inside control-clause headers unless the literal type is
/// unambiguous (slice, array, map — anything that cannot be a block start).
fn composite_allowed(p: &Parser, expr: NodeId) -> bool {
    match p.ast.node(expr) {
        Node::Ident { .. } | Node::Selector { .. } => p.no_lit == 0,
        Node::ArrayType { .. } | Node::MapType { .. } | Node::StructType { .. } => true,
        _ => false,
    }
}

fn parse_index_or_slice(
    p: &mut Parser,
    base: NodeId,
    start: usize,
) -> Result<NodeId, ParseError> {
    let low = if p.stream.check(&Token::Colon) {
        None
    } else {
        Some(parse_expr(p)?)
    };
    if p.stream.eat(&Token::RBracket) {
        let index = low.ok_or_else(|| {
            ParseError::invalid_syntax("missing index expression", p.stream.current_span())
        })?;
        return Ok(p.alloc(Node::Index { base, index }, start));
    }
    p.stream.expect(Token::Colon)?;
    let high = if p.stream.check(&Token::Colon) || p.stream.check(&Token::RBracket) {
        None
    } else {
        Some(parse_expr(p)?)
    };
    let (max, three_index) = if p.stream.eat(&Token::Colon) {
        (Some(parse_expr(p)?), true)
    } else {
        (None, false)
    };
    p.stream.expect(Token::RBracket)?;
    Ok(p.alloc(
        Node::SliceExpr {
            base,
            low,
            high,
            max,
            three_index,
        },
        start,
    ))
}

fn parse_operand(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    match p.stream.peek() {
        Some(Token::Ident(_)) => p.parse_ident(),
        Some(Token::Int(_)) => parse_lit(p, LitKind::Int),
        Some(Token::Float(_)) => parse_lit(p, LitKind::Float),
        Some(Token::Rune(_)) => parse_lit(p, LitKind::Rune),
        Some(Token::String(_)) => parse_lit(p, LitKind::String),
        Some(Token::LParen) => {
            p.stream.advance();
            let inner = p.with_lit(parse_expr)?;
            p.stream.expect(Token::RParen)?;
            Ok(p.alloc(Node::Paren { inner }, start))
        }
        Some(Token::Func) => {
            p.stream.advance();
            let sig = super::types::parse_signature(p)?;
            if p.stream.check(&Token::LBrace) {
                let body = p.with_lit(super::stmt::parse_block)?;
                Ok(p.alloc(Node::FuncLit { sig, body }, start))
            } else {
                // Bare func type in expression position (e.g. a conversion).
                Ok(sig)
            }
        }
        // A type operand: the postfix loop attaches the composite literal
        // braces or a conversion call.
        Some(Token::LBracket)
        | Some(Token::Map)
        | Some(Token::Chan)
        | Some(Token::Struct)
        | Some(Token::Interface) => super::types::parse_type(p),
        found => Err(ParseError::unexpected_token(
            found,
            "in expression",
            p.stream.current_span(),
        )),
    }
}

fn parse_lit(p: &mut Parser, kind: LitKind) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    let text = match p.stream.advance() {
        Some(Token::Int(t)) | Some(Token::Float(t)) | Some(Token::Rune(t))
        | Some(Token::String(t)) => t.clone(),
        _ => unreachable!("caller checked the literal token"),
    };
    Ok(p.alloc(Node::BasicLit { kind, text }, start))
}

/// Parse `{ elements }` for a composite literal with optional type.
pub(crate) fn parse_composite_body(
    p: &mut Parser,
    ty: Option<NodeId>,
    start: usize,
) -> Result<NodeId, ParseError> {
    p.stream.expect(Token::LBrace)?;
    let mut elems = Vec::new();
    p.with_lit(|p| {
        while !p.stream.check(&Token::RBrace) {
            elems.push(parse_element(p)?);
            if !p.stream.eat(&Token::Comma) {
                break;
            }
        }
        Ok(())
    })?;
    p.stream.expect(Token::RBrace)?;
    Ok(p.alloc(Node::CompositeLit { ty, elems }, start))
}

fn parse_element(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    let value = parse_element_value(p, start)?;
    if p.stream.eat(&Token::Colon) {
        let vstart = p.stream.current_pos();
        let inner = parse_element_value(p, vstart)?;
        return Ok(p.alloc(
            Node::KeyValue {
                key: value,
                value: inner,
            },
            start,
        ));
    }
    Ok(value)
}

fn parse_element_value(p: &mut Parser, start: usize) -> Result<NodeId, ParseError> {
    if p.stream.check(&Token::LBrace) {
        // Nested literal with elided element type.
        parse_composite_body(p, None, start)
    } else {
        parse_expr(p)
    }
}
