//! Traversal engine.
//!
//! Pre-order walk over the focused file, handing each visited node to the
//! rule dispatcher together with its slot context:
//!
//! - a **statement slot** (`Slot::Stmt(parent)`) where the node is a
//!   statement replaceable inside `parent` — a list element, an `if` else
//!   branch, a loop init/post, a labeled statement's body;
//! - an **expression slot** (`Slot::Expr(parent)`) where the node is a
//!   single replaceable expression (list elements of call arguments,
//!   assignment sides, and return values count — each element is its own
//!   slot);
//! - no slot for structural positions (names, bodies, specs).
//!
//! Ordered statement lists (block, case body, comm body) are additionally
//! visited as a unit before their elements, which is where the
//! list-shrinking rules hook in.
//!
//! The walk aborts as soon as an edit commits; the driver restarts the
//! pass from the root, because a committed deletion invalidates any
//! in-flight cursor into the removed subtree.

use crate::Reducer;
use goshrink_ast::{Node, NodeId};

/// Slot context for a visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    None,
    /// Statement position inside the carried parent.
    Stmt(NodeId),
    /// Expression position inside the carried parent.
    Expr(NodeId),
}

/// Walk control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Stop,
}

macro_rules! walk_try {
    ($e:expr) => {
        if let Flow::Stop = $e {
            return Flow::Stop;
        }
    };
}

impl Reducer<'_> {
    /// Visit `id`, then its children.
    pub(crate) fn walk(&mut self, id: NodeId, slot: Slot) -> Flow {
        walk_try!(self.reduce_node(id, slot));
        let node = self.ast.node(id).clone();
        match node {
            Node::File {
                package,
                imports,
                decls,
            } => {
                walk_try!(self.walk(package, Slot::None));
                for import in imports {
                    walk_try!(self.walk(import, Slot::None));
                }
                for decl in decls {
                    walk_try!(self.walk(decl, Slot::None));
                }
            }
            Node::ImportSpec { alias, path } => {
                if let Some(alias) = alias {
                    walk_try!(self.walk(alias, Slot::None));
                }
                walk_try!(self.walk(path, Slot::None));
            }
            Node::GenDecl { specs, .. } => {
                for spec in specs {
                    walk_try!(self.walk(spec, Slot::None));
                }
            }
            Node::ValueSpec { names, ty, values } => {
                for name in names {
                    walk_try!(self.walk(name, Slot::None));
                }
                if let Some(ty) = ty {
                    walk_try!(self.walk(ty, Slot::Expr(id)));
                }
                for value in values {
                    walk_try!(self.walk(value, Slot::Expr(id)));
                }
            }
            Node::TypeSpec { name, ty } => {
                walk_try!(self.walk(name, Slot::None));
                walk_try!(self.walk(ty, Slot::Expr(id)));
            }
            Node::FuncDecl {
                recv,
                name,
                sig,
                body,
            } => {
                if let Some(recv) = recv {
                    walk_try!(self.walk(recv, Slot::None));
                }
                walk_try!(self.walk(name, Slot::None));
                walk_try!(self.walk(sig, Slot::None));
                if let Some(body) = body {
                    walk_try!(self.walk(body, Slot::None));
                }
            }
            Node::Field { names, ty } => {
                for name in names {
                    walk_try!(self.walk(name, Slot::None));
                }
                walk_try!(self.walk(ty, Slot::Expr(id)));
            }
            Node::FieldList { fields } => {
                for field in fields {
                    walk_try!(self.walk(field, Slot::None));
                }
            }

            Node::Ident { .. } | Node::BasicLit { .. } => {}
            Node::EllipsisType { elem } => {
                walk_try!(self.walk(elem, Slot::Expr(id)));
            }
            Node::FuncLit { sig, body } => {
                walk_try!(self.walk(sig, Slot::None));
                walk_try!(self.walk(body, Slot::None));
            }
            Node::CompositeLit { ty, elems } => {
                if let Some(ty) = ty {
                    walk_try!(self.walk(ty, Slot::Expr(id)));
                }
                for elem in elems {
                    walk_try!(self.walk(elem, Slot::Expr(id)));
                }
            }
            Node::Paren { inner } | Node::Star { inner } => {
                walk_try!(self.walk(inner, Slot::Expr(id)));
            }
            Node::Selector { base, sel } => {
                walk_try!(self.walk(base, Slot::Expr(id)));
                walk_try!(self.walk(sel, Slot::None));
            }
            Node::Index { base, index } => {
                walk_try!(self.walk(base, Slot::Expr(id)));
                walk_try!(self.walk(index, Slot::Expr(id)));
            }
            Node::SliceExpr {
                base,
                low,
                high,
                max,
                ..
            } => {
                walk_try!(self.walk(base, Slot::Expr(id)));
                for bound in [low, high, max].into_iter().flatten() {
                    walk_try!(self.walk(bound, Slot::Expr(id)));
                }
            }
            Node::TypeAssert { base, ty } => {
                walk_try!(self.walk(base, Slot::Expr(id)));
                if let Some(ty) = ty {
                    walk_try!(self.walk(ty, Slot::Expr(id)));
                }
            }
            Node::Call { fun, args, .. } => {
                walk_try!(self.walk(fun, Slot::Expr(id)));
                for arg in args {
                    walk_try!(self.walk(arg, Slot::Expr(id)));
                }
            }
            Node::Unary { operand, .. } => {
                walk_try!(self.walk(operand, Slot::Expr(id)));
            }
            Node::Binary { left, right, .. } => {
                walk_try!(self.walk(left, Slot::Expr(id)));
                walk_try!(self.walk(right, Slot::Expr(id)));
            }
            Node::KeyValue { key, value } => {
                walk_try!(self.walk(key, Slot::Expr(id)));
                walk_try!(self.walk(value, Slot::Expr(id)));
            }

            Node::ArrayType { len, elem } => {
                if let Some(len) = len {
                    walk_try!(self.walk(len, Slot::Expr(id)));
                }
                walk_try!(self.walk(elem, Slot::Expr(id)));
            }
            Node::MapType { key, value } => {
                walk_try!(self.walk(key, Slot::Expr(id)));
                walk_try!(self.walk(value, Slot::Expr(id)));
            }
            Node::ChanType { elem, .. } => {
                walk_try!(self.walk(elem, Slot::Expr(id)));
            }
            Node::FuncType { params, results } => {
                walk_try!(self.walk(params, Slot::None));
                if let Some(results) = results {
                    walk_try!(self.walk(results, Slot::None));
                }
            }
            Node::StructType { fields } => {
                walk_try!(self.walk(fields, Slot::None));
            }
            Node::InterfaceType { methods } => {
                walk_try!(self.walk(methods, Slot::None));
            }

            Node::DeclStmt { decl } => {
                walk_try!(self.walk(decl, Slot::None));
            }
            Node::LabeledStmt { label, stmt } => {
                walk_try!(self.walk(label, Slot::None));
                walk_try!(self.walk(stmt, Slot::Stmt(id)));
            }
            Node::ExprStmt { expr } => {
                walk_try!(self.walk(expr, Slot::Expr(id)));
            }
            Node::SendStmt { chan, value } => {
                walk_try!(self.walk(chan, Slot::Expr(id)));
                walk_try!(self.walk(value, Slot::Expr(id)));
            }
            Node::IncDecStmt { expr, .. } => {
                walk_try!(self.walk(expr, Slot::Expr(id)));
            }
            Node::AssignStmt { lhs, rhs, .. } => {
                for target in lhs {
                    walk_try!(self.walk(target, Slot::Expr(id)));
                }
                for value in rhs {
                    walk_try!(self.walk(value, Slot::Expr(id)));
                }
            }
            Node::GoStmt { call } | Node::DeferStmt { call } => {
                walk_try!(self.walk(call, Slot::None));
            }
            Node::ReturnStmt { results } => {
                for result in results {
                    walk_try!(self.walk(result, Slot::Expr(id)));
                }
            }
            Node::BranchStmt { label, .. } => {
                if let Some(label) = label {
                    walk_try!(self.walk(label, Slot::None));
                }
            }
            Node::Block { .. } => {
                walk_try!(self.walk_stmt_list(id));
            }
            Node::IfStmt {
                init,
                cond,
                body,
                else_,
            } => {
                if let Some(init) = init {
                    walk_try!(self.walk(init, Slot::Stmt(id)));
                }
                walk_try!(self.walk(cond, Slot::Expr(id)));
                walk_try!(self.walk(body, Slot::None));
                if let Some(else_) = else_ {
                    walk_try!(self.walk(else_, Slot::Stmt(id)));
                }
            }
            Node::CaseClause { exprs, .. } => {
                for expr in exprs {
                    walk_try!(self.walk(expr, Slot::Expr(id)));
                }
                walk_try!(self.walk_stmt_list(id));
            }
            Node::SwitchStmt { init, tag, cases } => {
                if let Some(init) = init {
                    walk_try!(self.walk(init, Slot::Stmt(id)));
                }
                if let Some(tag) = tag {
                    walk_try!(self.walk(tag, Slot::None));
                }
                for case in cases {
                    walk_try!(self.walk(case, Slot::None));
                }
            }
            Node::TypeSwitchStmt {
                init,
                assign,
                cases,
            } => {
                if let Some(init) = init {
                    walk_try!(self.walk(init, Slot::Stmt(id)));
                }
                walk_try!(self.walk(assign, Slot::Stmt(id)));
                for case in cases {
                    walk_try!(self.walk(case, Slot::None));
                }
            }
            Node::CommClause { comm, .. } => {
                if let Some(comm) = comm {
                    walk_try!(self.walk(comm, Slot::Stmt(id)));
                }
                walk_try!(self.walk_stmt_list(id));
            }
            Node::SelectStmt { cases } => {
                for case in cases {
                    walk_try!(self.walk(case, Slot::None));
                }
            }
            Node::ForStmt {
                init,
                cond,
                post,
                body,
            } => {
                if let Some(init) = init {
                    walk_try!(self.walk(init, Slot::Stmt(id)));
                }
                if let Some(cond) = cond {
                    walk_try!(self.walk(cond, Slot::Expr(id)));
                }
                if let Some(post) = post {
                    walk_try!(self.walk(post, Slot::Stmt(id)));
                }
                walk_try!(self.walk(body, Slot::None));
            }
            Node::RangeStmt {
                key,
                value,
                expr,
                body,
                ..
            } => {
                for target in [key, value].into_iter().flatten() {
                    walk_try!(self.walk(target, Slot::Expr(id)));
                }
                walk_try!(self.walk(expr, Slot::Expr(id)));
                walk_try!(self.walk(body, Slot::None));
            }
        }
        Flow::Continue
    }

    /// Visit an ordered statement list as a unit, then its elements, each
    /// in a statement slot of the owner.
    fn walk_stmt_list(&mut self, owner: NodeId) -> Flow {
        let stmts = match self.ast.stmt_list(owner) {
            Some(stmts) if !stmts.is_empty() => stmts.clone(),
            _ => return Flow::Continue,
        };
        walk_try!(self.reduce_stmt_list(owner));
        for stmt in stmts {
            walk_try!(self.walk(stmt, Slot::Stmt(owner)));
        }
        Flow::Continue
    }
}
