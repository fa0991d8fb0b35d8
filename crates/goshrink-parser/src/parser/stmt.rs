//! Statement parsers.

use super::{ParseError, Parser};
use goshrink_ast::{AssignOp, BranchKind, DeclKeyword, Node, NodeId};
use goshrink_lexer::Token;

/// Parse a braced statement block.
pub(crate) fn parse_block(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::LBrace)?;
    let mut stmts = Vec::new();
    p.with_lit(|p| {
        while !p.stream.check(&Token::RBrace) {
            if p.stream.eat(&Token::Semi) {
                continue;
            }
            stmts.push(parse_stmt(p)?);
            if !p.stream.eat(&Token::Semi) && !p.stream.check(&Token::RBrace) {
                return Err(ParseError::unexpected_token(
                    p.stream.peek(),
                    "after statement",
                    p.stream.current_span(),
                ));
            }
        }
        Ok(())
    })?;
    p.stream.expect(Token::RBrace)?;
    Ok(p.alloc(Node::Block { stmts }, start))
}

pub(crate) fn parse_stmt(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    match p.stream.peek() {
        Some(Token::Var) => parse_decl_stmt(p, DeclKeyword::Var, start),
        Some(Token::Const) => parse_decl_stmt(p, DeclKeyword::Const, start),
        Some(Token::Type) => parse_decl_stmt(p, DeclKeyword::Type, start),
        Some(Token::If) => parse_if(p),
        Some(Token::For) => parse_for(p),
        Some(Token::Switch) => parse_switch(p),
        Some(Token::Select) => parse_select(p),
        Some(Token::LBrace) => parse_block(p),
        Some(Token::Go) => {
            p.stream.advance();
            let call = super::expr::parse_expr(p)?;
            Ok(p.alloc(Node::GoStmt { call }, start))
        }
        Some(Token::Defer) => {
            p.stream.advance();
            let call = super::expr::parse_expr(p)?;
            Ok(p.alloc(Node::DeferStmt { call }, start))
        }
        Some(Token::Return) => {
            p.stream.advance();
            let results = if matches!(
                p.stream.peek(),
                Some(Token::Semi) | Some(Token::RBrace) | None
            ) {
                Vec::new()
            } else {
                super::expr::parse_expr_list(p)?
            };
            Ok(p.alloc(Node::ReturnStmt { results }, start))
        }
        Some(Token::Break) => parse_branch(p, BranchKind::Break, start),
        Some(Token::Continue) => parse_branch(p, BranchKind::Continue, start),
        Some(Token::Goto) => {
            p.stream.advance();
            let label = p.parse_ident()?;
            Ok(p.alloc(
                Node::BranchStmt {
                    keyword: BranchKind::Goto,
                    label: Some(label),
                },
                start,
            ))
        }
        Some(Token::Fallthrough) => {
            p.stream.advance();
            Ok(p.alloc(
                Node::BranchStmt {
                    keyword: BranchKind::Fallthrough,
                    label: None,
                },
                start,
            ))
        }
        Some(Token::Ident(_)) if matches!(p.stream.peek_nth(1), Some(Token::Colon)) => {
            let label = p.parse_ident()?;
            p.stream.expect(Token::Colon)?;
            let stmt = parse_stmt(p)?;
            Ok(p.alloc(Node::LabeledStmt { label, stmt }, start))
        }
        _ => parse_simple_stmt(p),
    }
}

fn parse_decl_stmt(
    p: &mut Parser,
    keyword: DeclKeyword,
    start: usize,
) -> Result<NodeId, ParseError> {
    let decl = super::decl::parse_gen_decl(p, keyword)?;
    Ok(p.alloc(Node::DeclStmt { decl }, start))
}

fn parse_branch(p: &mut Parser, keyword: BranchKind, start: usize) -> Result<NodeId, ParseError> {
    p.stream.advance();
    let label = if matches!(p.stream.peek(), Some(Token::Ident(_))) {
        Some(p.parse_ident()?)
    } else {
        None
    };
    Ok(p.alloc(Node::BranchStmt { keyword, label }, start))
}

fn assign_op(token: &Token) -> Option<AssignOp> {
    match token {
        Token::Eq => Some(AssignOp::Assign),
        Token::ColonEq => Some(AssignOp::Define),
        Token::PlusEq => Some(AssignOp::Add),
        Token::MinusEq => Some(AssignOp::Sub),
        Token::StarEq => Some(AssignOp::Mul),
        Token::SlashEq => Some(AssignOp::Div),
        Token::PercentEq => Some(AssignOp::Rem),
        Token::AmpEq => Some(AssignOp::And),
        Token::PipeEq => Some(AssignOp::Or),
        Token::CaretEq => Some(AssignOp::Xor),
        Token::ShlEq => Some(AssignOp::Shl),
        Token::ShrEq => Some(AssignOp::Shr),
        Token::AmpCaretEq => Some(AssignOp::AndNot),
        _ => None,
    }
}

/// Parse an expression statement, assignment, send, or inc/dec.
pub(crate) fn parse_simple_stmt(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    let exprs = super::expr::parse_expr_list(p)?;
    if let Some(op) = p.stream.peek().and_then(assign_op) {
        p.stream.advance();
        let rhs = super::expr::parse_expr_list(p)?;
        return Ok(p.alloc(
            Node::AssignStmt {
                op,
                lhs: exprs,
                rhs,
            },
            start,
        ));
    }
    match p.stream.peek() {
        Some(Token::Arrow) if exprs.len() == 1 => {
            p.stream.advance();
            let value = super::expr::parse_expr(p)?;
            Ok(p.alloc(
                Node::SendStmt {
                    chan: exprs[0],
                    value,
                },
                start,
            ))
        }
        Some(Token::Inc) if exprs.len() == 1 => {
            p.stream.advance();
            Ok(p.alloc(
                Node::IncDecStmt {
                    expr: exprs[0],
                    inc: true,
                },
                start,
            ))
        }
        Some(Token::Dec) if exprs.len() == 1 => {
            p.stream.advance();
            Ok(p.alloc(
                Node::IncDecStmt {
                    expr: exprs[0],
                    inc: false,
                },
                start,
            ))
        }
        _ if exprs.len() == 1 => Ok(p.alloc(Node::ExprStmt { expr: exprs[0] }, start)),
        found => Err(ParseError::unexpected_token(
            found,
            "after expression list",
            p.stream.current_span(),
        )),
    }
}

fn parse_if(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::If)?;
    p.no_lit += 1;
    let first = parse_simple_stmt(p)?;
    let (init, cond) = if p.stream.eat(&Token::Semi) {
        let cond = super::expr::parse_expr(p)?;
        (Some(first), cond)
    } else {
        let cond = expr_of_stmt(p, first).ok_or_else(|| {
            ParseError::invalid_syntax("if condition must be an expression", p.stream.current_span())
        })?;
        (None, cond)
    };
    p.no_lit -= 1;
    let body = parse_block(p)?;
    let else_ = if p.stream.eat(&Token::Else) {
        if p.stream.check(&Token::If) {
            Some(parse_if(p)?)
        } else {
            Some(parse_block(p)?)
        }
    } else {
        None
    };
    Ok(p.alloc(
        Node::IfStmt {
            init,
            cond,
            body,
            else_,
        },
        start,
    ))
}

/// Unwrap an ExprStmt parsed where the grammar wanted a bare expression.
fn expr_of_stmt(p: &Parser, stmt: NodeId) -> Option<NodeId> {
    match p.ast.node(stmt) {
        Node::ExprStmt { expr } => Some(*expr),
        _ => None,
    }
}

fn parse_for(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::For)?;
    if p.stream.check(&Token::LBrace) {
        let body = parse_block(p)?;
        return Ok(p.alloc(
            Node::ForStmt {
                init: None,
                cond: None,
                post: None,
                body,
            },
            start,
        ));
    }
    p.no_lit += 1;
    // `for range x` without iteration variables.
    if p.stream.eat(&Token::Range) {
        let expr = super::expr::parse_expr(p)?;
        p.no_lit -= 1;
        let body = parse_block(p)?;
        return Ok(p.alloc(
            Node::RangeStmt {
                key: None,
                value: None,
                define: false,
                expr,
                body,
            },
            start,
        ));
    }
    // `for ; cond ; post`.
    if p.stream.check(&Token::Semi) {
        let result = parse_for_clauses(p, None, start);
        return result;
    }
    // Either a range clause, a cond-only loop, or init; cond; post.
    let estart = p.stream.current_pos();
    let exprs = super::expr::parse_expr_list(p)?;
    if matches!(p.stream.peek(), Some(Token::Eq) | Some(Token::ColonEq))
        && matches!(p.stream.peek_nth(1), Some(Token::Range))
    {
        let define = matches!(p.stream.peek(), Some(Token::ColonEq));
        p.stream.advance();
        p.stream.advance();
        if exprs.len() > 2 {
            return Err(ParseError::invalid_syntax(
                "too many iteration variables in range clause",
                p.stream.current_span(),
            ));
        }
        let key = exprs.first().copied();
        let value = exprs.get(1).copied();
        let expr = super::expr::parse_expr(p)?;
        p.no_lit -= 1;
        let body = parse_block(p)?;
        return Ok(p.alloc(
            Node::RangeStmt {
                key,
                value,
                define,
                expr,
                body,
            },
            start,
        ));
    }
    let first = finish_simple_stmt(p, exprs, estart)?;
    if p.stream.check(&Token::Semi) {
        return parse_for_clauses(p, Some(first), start);
    }
    // Cond-only loop.
    let cond = expr_of_stmt(p, first).ok_or_else(|| {
        ParseError::invalid_syntax("for condition must be an expression", p.stream.current_span())
    })?;
    p.no_lit -= 1;
    let body = parse_block(p)?;
    Ok(p.alloc(
        Node::ForStmt {
            init: None,
            cond: Some(cond),
            post: None,
            body,
        },
        start,
    ))
}

/// Parse `; [cond] ; [post] { body }` after an optional init. Assumes
/// `no_lit` was incremented by the caller; decrements it before the body.
fn parse_for_clauses(
    p: &mut Parser,
    init: Option<NodeId>,
    start: usize,
) -> Result<NodeId, ParseError> {
    p.stream.expect(Token::Semi)?;
    let cond = if p.stream.check(&Token::Semi) {
        None
    } else {
        Some(super::expr::parse_expr(p)?)
    };
    p.stream.expect(Token::Semi)?;
    let post = if p.stream.check(&Token::LBrace) {
        None
    } else {
        Some(parse_simple_stmt(p)?)
    };
    p.no_lit -= 1;
    let body = parse_block(p)?;
    Ok(p.alloc(
        Node::ForStmt {
            init,
            cond,
            post,
            body,
        },
        start,
    ))
}

/// Complete a simple statement whose leading expression list is already
/// parsed (used by `for`, where `range` had to be ruled out first).
fn finish_simple_stmt(
    p: &mut Parser,
    exprs: Vec<NodeId>,
    start: usize,
) -> Result<NodeId, ParseError> {
    if let Some(op) = p.stream.peek().and_then(assign_op) {
        p.stream.advance();
        let rhs = super::expr::parse_expr_list(p)?;
        return Ok(p.alloc(
            Node::AssignStmt {
                op,
                lhs: exprs,
                rhs,
            },
            start,
        ));
    }
    match p.stream.peek() {
        Some(Token::Inc) if exprs.len() == 1 => {
            p.stream.advance();
            Ok(p.alloc(
                Node::IncDecStmt {
                    expr: exprs[0],
                    inc: true,
                },
                start,
            ))
        }
        Some(Token::Dec) if exprs.len() == 1 => {
            p.stream.advance();
            Ok(p.alloc(
                Node::IncDecStmt {
                    expr: exprs[0],
                    inc: false,
                },
                start,
            ))
        }
        _ if exprs.len() == 1 => Ok(p.alloc(Node::ExprStmt { expr: exprs[0] }, start)),
        found => Err(ParseError::unexpected_token(
            found,
            "in for clause",
            p.stream.current_span(),
        )),
    }
}

fn parse_switch(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::Switch)?;
    let mut init = None;
    let mut guard = None;
    if !p.stream.check(&Token::LBrace) {
        p.no_lit += 1;
        let first = parse_simple_stmt(p)?;
        if p.stream.eat(&Token::Semi) {
            init = Some(first);
            if !p.stream.check(&Token::LBrace) {
                guard = Some(parse_simple_stmt(p)?);
            }
        } else {
            guard = Some(first);
        }
        p.no_lit -= 1;
    }

    // A guard of the form `v := x.(type)` or `x.(type)` selects a type
    // switch; any other guard is the tag expression of a value switch.
    let is_type_guard = guard.is_some_and(|g| match p.ast.node(g) {
        Node::AssignStmt { op, rhs, .. } => {
            *op == AssignOp::Define
                && rhs.len() == 1
                && matches!(p.ast.node(rhs[0]), Node::TypeAssert { ty: None, .. })
        }
        Node::ExprStmt { expr } => matches!(p.ast.node(*expr), Node::TypeAssert { ty: None, .. }),
        _ => false,
    });

    let cases = parse_case_clauses(p)?;
    if is_type_guard {
        let assign = guard.expect("type guard checked above");
        Ok(p.alloc(
            Node::TypeSwitchStmt {
                init,
                assign,
                cases,
            },
            start,
        ))
    } else {
        let tag = match guard {
            Some(g) => Some(expr_of_stmt(p, g).ok_or_else(|| {
                ParseError::invalid_syntax(
                    "switch tag must be an expression",
                    p.stream.current_span(),
                )
            })?),
            None => None,
        };
        Ok(p.alloc(Node::SwitchStmt { init, tag, cases }, start))
    }
}

fn parse_case_clauses(p: &mut Parser) -> Result<Vec<NodeId>, ParseError> {
    p.stream.expect(Token::LBrace)?;
    let mut cases = Vec::new();
    p.with_lit(|p| {
        while !p.stream.check(&Token::RBrace) {
            let cstart = p.stream.current_pos();
            let exprs = if p.stream.eat(&Token::Case) {
                super::expr::parse_expr_list(p)?
            } else {
                p.stream.expect(Token::Default)?;
                Vec::new()
            };
            p.stream.expect(Token::Colon)?;
            let body = parse_case_body(p)?;
            cases.push(p.alloc(Node::CaseClause { exprs, body }, cstart));
        }
        Ok(())
    })?;
    p.stream.expect(Token::RBrace)?;
    Ok(cases)
}

/// Statements of one case, up to the next `case`/`default`/`}`.
fn parse_case_body(p: &mut Parser) -> Result<Vec<NodeId>, ParseError> {
    let mut body = Vec::new();
    loop {
        match p.stream.peek() {
            Some(Token::Case) | Some(Token::Default) | Some(Token::RBrace) | None => break,
            Some(Token::Semi) => {
                p.stream.advance();
            }
            _ => {
                body.push(parse_stmt(p)?);
                if !p.stream.eat(&Token::Semi)
                    && !matches!(
                        p.stream.peek(),
                        Some(Token::Case) | Some(Token::Default) | Some(Token::RBrace)
                    )
                {
                    return Err(ParseError::unexpected_token(
                        p.stream.peek(),
                        "after statement in case body",
                        p.stream.current_span(),
                    ));
                }
            }
        }
    }
    Ok(body)
}

fn parse_select(p: &mut Parser) -> Result<NodeId, ParseError> {
    let start = p.stream.current_pos();
    p.stream.expect(Token::Select)?;
    p.stream.expect(Token::LBrace)?;
    let mut cases = Vec::new();
    while !p.stream.check(&Token::RBrace) {
        let cstart = p.stream.current_pos();
        let comm = if p.stream.eat(&Token::Case) {
            Some(parse_simple_stmt(p)?)
        } else {
            p.stream.expect(Token::Default)?;
            None
        };
        p.stream.expect(Token::Colon)?;
        let body = parse_case_body(p)?;
        cases.push(p.alloc(Node::CommClause { comm, body }, cstart));
    }
    p.stream.expect(Token::RBrace)?;
    Ok(p.alloc(Node::SelectStmt { cases }, start))
}
