//! The rule library.
//!
//! Rules dispatch on the visited node's variant and slot. Each rule offers
//! its candidate edits in order through `try_edit`; the first accepted one
//! wins and unwinds the pass. More aggressive rules run first: whole
//! statements go before their subexpressions because the walk is pre-order.

mod decls;
mod exprs;
mod stmts;

use crate::walk::{Flow, Slot};
use crate::Reducer;
use goshrink_ast::Node;

impl Reducer<'_> {
    /// Dispatch rules for one visited node. Returns `Stop` once an edit has
    /// been committed (or a fatal error recorded) so the walk unwinds.
    pub(crate) fn reduce_node(&mut self, id: goshrink_ast::NodeId, slot: Slot) -> Flow {
        if self.did_change || self.fatal.is_some() {
            return Flow::Stop;
        }
        let changed = match slot {
            Slot::Stmt(parent) => match self.ast.node(id) {
                Node::IfStmt { .. } => self.rule_bypass_if(id, parent),
                Node::SwitchStmt { .. } => self.rule_flatten_switch(id, parent),
                Node::GoStmt { .. } | Node::DeferStmt { .. } => {
                    self.rule_unwrap_async(id, parent)
                }
                Node::ExprStmt { .. } => self.rule_inline_call(id, parent),
                _ => false,
            },
            Slot::Expr(parent) => match self.ast.node(id) {
                Node::Paren { .. } => self.rule_unwrap_paren(id, parent),
                Node::Star { .. } => self.rule_unwrap_deref(id, parent),
                Node::Unary { .. } => self.rule_drop_unary(id, parent),
                Node::Binary { .. } => self.rule_drop_operand(id, parent),
                Node::Index { .. } => self.rule_drop_index(id, parent),
                Node::SliceExpr { .. } => self.rule_shrink_slice(id, parent),
                Node::CompositeLit { .. } => self.rule_empty_composite(id),
                Node::Ident { .. } => self.rule_inline_value(id, parent),
                Node::BasicLit { .. } => self.rule_zero_literal(id),
                _ => false,
            },
            Slot::None => match self.ast.node(id) {
                Node::ValueSpec { .. } => self.rule_remove_unused_spec(id),
                Node::ImportSpec { .. } => self.rule_remove_blank_import(id),
                _ => false,
            },
        };
        if changed {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    /// Dispatch rules for an ordered statement list.
    pub(crate) fn reduce_stmt_list(&mut self, owner: goshrink_ast::NodeId) -> Flow {
        if self.did_change || self.fatal.is_some() {
            return Flow::Stop;
        }
        if self.rule_remove_stmt(owner) || self.rule_inline_block(owner) {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }
}
