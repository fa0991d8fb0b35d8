//! Expression-slot rules.

use crate::engine::replace_child;
use crate::Reducer;
use goshrink_ast::{AssignOp, LitKind, Node, NodeId, UnOp};
use goshrink_resolve::SymbolKind;

impl Reducer<'_> {
    /// `(x)` -> `x`.
    pub(crate) fn rule_unwrap_paren(&mut self, id: NodeId, parent: NodeId) -> bool {
        let inner = match self.ast.node(id) {
            Node::Paren { inner } => *inner,
            _ => return false,
        };
        self.try_edit(id, "(x) -> x", &[], |ast, undo| {
            replace_child(ast, undo, parent, id, inner);
        })
    }

    /// `*x` -> `x`.
    pub(crate) fn rule_unwrap_deref(&mut self, id: NodeId, parent: NodeId) -> bool {
        let inner = match self.ast.node(id) {
            Node::Star { inner } => *inner,
            _ => return false,
        };
        self.try_edit(id, "*x -> x", &[], |ast, undo| {
            replace_child(ast, undo, parent, id, inner);
        })
    }

    /// Drop a `+ - ! ^` prefix operator.
    pub(crate) fn rule_drop_unary(&mut self, id: NodeId, parent: NodeId) -> bool {
        let (op, operand) = match self.ast.node(id) {
            Node::Unary { op, operand } => (*op, *operand),
            _ => return false,
        };
        if !matches!(op, UnOp::Plus | UnOp::Minus | UnOp::Not | UnOp::Xor) {
            return false;
        }
        let desc = format!("{}x -> x", op);
        self.try_edit(id, &desc, &[], |ast, undo| {
            replace_child(ast, undo, parent, id, operand);
        })
    }

    /// Keep one operand of a binary expression; left first.
    pub(crate) fn rule_drop_operand(&mut self, id: NodeId, parent: NodeId) -> bool {
        let (op, left, right) = match self.ast.node(id) {
            Node::Binary { op, left, right } => (*op, *left, *right),
            _ => return false,
        };
        let desc = format!("x {} y -> x", op);
        if self.try_edit(id, &desc, &[right], |ast, undo| {
            replace_child(ast, undo, parent, id, left);
        }) {
            return true;
        }
        let desc = format!("x {} y -> y", op);
        self.try_edit(id, &desc, &[left], |ast, undo| {
            replace_child(ast, undo, parent, id, right);
        })
    }

    /// `a[i]` -> `a`.
    pub(crate) fn rule_drop_index(&mut self, id: NodeId, parent: NodeId) -> bool {
        let (base, index) = match self.ast.node(id) {
            Node::Index { base, index } => (*base, *index),
            _ => return false,
        };
        self.try_edit(id, "a[i] -> a", &[index], |ast, undo| {
            replace_child(ast, undo, parent, id, base);
        })
    }

    /// Shrink a slice expression: drop Max, then High, then Low; once bare,
    /// replace `a[:]` with `a`. Removing Max clears the three-index form.
    pub(crate) fn rule_shrink_slice(&mut self, id: NodeId, parent: NodeId) -> bool {
        let (base, low, high, max) = match self.ast.node(id) {
            Node::SliceExpr {
                base,
                low,
                high,
                max,
                ..
            } => (*base, *low, *high, *max),
            _ => return false,
        };
        if let Some(max) = max {
            let committed = self.try_edit(id, "remove slice max", &[max], |ast, undo| {
                undo.record(ast, id);
                if let Node::SliceExpr {
                    max, three_index, ..
                } = ast.node_mut(id)
                {
                    *max = None;
                    *three_index = false;
                }
            });
            if committed {
                return true;
            }
        }
        if let Some(high) = high {
            let committed = self.try_edit(id, "remove slice high", &[high], |ast, undo| {
                undo.record(ast, id);
                if let Node::SliceExpr { high, .. } = ast.node_mut(id) {
                    *high = None;
                }
            });
            if committed {
                return true;
            }
        }
        if let Some(low) = low {
            let committed = self.try_edit(id, "remove slice low", &[low], |ast, undo| {
                undo.record(ast, id);
                if let Node::SliceExpr { low, .. } = ast.node_mut(id) {
                    *low = None;
                }
            });
            if committed {
                return true;
            }
        }
        if low.is_none() && high.is_none() && max.is_none() {
            return self.try_edit(id, "a[:] -> a", &[], |ast, undo| {
                replace_child(ast, undo, parent, id, base);
            });
        }
        false
    }

    /// `T{e...}` -> `T{}`.
    pub(crate) fn rule_empty_composite(&mut self, id: NodeId) -> bool {
        let elems = match self.ast.node(id) {
            Node::CompositeLit { elems, .. } if !elems.is_empty() => elems.clone(),
            _ => return false,
        };
        self.try_edit(id, "T{...} -> T{}", &elems, |ast, undo| {
            undo.record(ast, id);
            if let Node::CompositeLit { elems, .. } = ast.node_mut(id) {
                elems.clear();
            }
        })
    }

    /// Replace the only use of a basic-valued variable with its
    /// initializer, letting the definition go dead.
    pub(crate) fn rule_inline_value(&mut self, id: NodeId, parent: NodeId) -> bool {
        let Some(sym) = self.res.use_of(id) else {
            return false;
        };
        let symbol = self.res.symbol(sym);
        let uses = self.res.uses_of(sym);
        if symbol.kind != SymbolKind::Var || uses.len() != 1 || uses[0] != id {
            return false;
        }
        let Some(init) = self.initializer_of(symbol.decl) else {
            return false;
        };
        if !self.is_basic_value(init) {
            return false;
        }
        let clone = self.ast.deep_clone(init);
        self.try_edit(id, "inline single-use variable", &[id], |ast, undo| {
            replace_child(ast, undo, parent, id, clone);
        })
    }

    /// The expression initializing the variable defined at `decl_ident`,
    /// when the definition pairs names and values one to one.
    fn initializer_of(&self, decl_ident: NodeId) -> Option<NodeId> {
        let parent = self.parents.get(decl_ident)?;
        match self.ast.node(parent) {
            Node::ValueSpec { names, values, .. } if names.len() == values.len() => {
                let idx = names.iter().position(|n| *n == decl_ident)?;
                Some(values[idx])
            }
            Node::AssignStmt {
                op: AssignOp::Define,
                lhs,
                rhs,
            } if lhs.len() == rhs.len() => {
                let idx = lhs.iter().position(|n| *n == decl_ident)?;
                Some(rhs[idx])
            }
            _ => None,
        }
    }

    /// Numeric, string, rune, or boolean literal value.
    fn is_basic_value(&self, expr: NodeId) -> bool {
        match self.ast.node(expr) {
            Node::BasicLit { .. } => true,
            Node::Ident { name } => matches!(&**name, "true" | "false"),
            _ => false,
        }
    }

    /// Integer literal to `0`, string literal to `""`.
    pub(crate) fn rule_zero_literal(&mut self, id: NodeId) -> bool {
        let (kind, text) = match self.ast.node(id) {
            Node::BasicLit { kind, text } => (*kind, text.clone()),
            _ => return false,
        };
        let zero: &str = match kind {
            LitKind::Int if &*text != "0" => "0",
            LitKind::String if &*text != "\"\"" => "\"\"",
            _ => return false,
        };
        let desc = format!("reduce literal to {}", zero);
        self.try_edit(id, &desc, &[], |ast, undo| {
            undo.record(ast, id);
            if let Node::BasicLit { text, .. } = ast.node_mut(id) {
                *text = zero.into();
            }
        })
    }
}
