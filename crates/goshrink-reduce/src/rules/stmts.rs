//! Statement rules: list shrinking and statement-slot rewrites.

use crate::engine::replace_child;
use crate::Reducer;
use goshrink_ast::{AssignOp, Node, NodeId};
use std::collections::HashSet;

impl Reducer<'_> {
    /// Drop one statement from a list of length > 1, left to right.
    ///
    /// Statements whose deletion is known to break compilation are skipped
    /// without a verifier run: declarations with live bindings, short
    /// variable declarations, and terminating statements after the first
    /// one (the first terminator often guards unreachable code and may go).
    pub(crate) fn rule_remove_stmt(&mut self, owner: NodeId) -> bool {
        let stmts = match self.ast.stmt_list(owner) {
            Some(stmts) if stmts.len() > 1 => stmts.clone(),
            _ => return false,
        };
        let mut seen_terminator = false;
        for (i, &stmt) in stmts.iter().enumerate() {
            if self.is_terminating(stmt) {
                let first = !seen_terminator;
                seen_terminator = true;
                if !first {
                    continue;
                }
            } else if self.drop_breaks_compilation(stmt) {
                continue;
            }
            let committed = self.try_edit(stmt, "remove statement", &[stmt], |ast, undo| {
                undo.record(ast, owner);
                if let Some(list) = ast.stmt_list_mut(owner) {
                    list.remove(i);
                }
            });
            if committed {
                return true;
            }
        }
        false
    }

    /// Splice a block element's statements into the surrounding list.
    ///
    /// Names defined directly inside the block are first renamed (appending
    /// underscores) when they would collide with a name elsewhere in the
    /// enclosing function; nested blocks keep their own scopes untouched.
    pub(crate) fn rule_inline_block(&mut self, owner: NodeId) -> bool {
        let stmts = match self.ast.stmt_list(owner) {
            Some(stmts) => stmts.clone(),
            None => return false,
        };
        for (i, &stmt) in stmts.iter().enumerate() {
            let inner = match self.ast.node(stmt) {
                Node::Block { stmts: inner } if !inner.is_empty() => inner.clone(),
                _ => continue,
            };
            let renames = self.shadow_renames(stmt);
            let committed = self.try_edit(stmt, "inline block", &[], |ast, undo| {
                for &(ident, ref fresh) in &renames {
                    undo.record(ast, ident);
                    if let Node::Ident { name } = ast.node_mut(ident) {
                        *name = fresh.as_str().into();
                    }
                }
                undo.record(ast, owner);
                if let Some(list) = ast.stmt_list_mut(owner) {
                    list.splice(i..=i, inner.iter().copied());
                }
            });
            if committed {
                return true;
            }
        }
        false
    }

    /// `if c { B }` -> `B`, and `if c { ... } else X` -> `X`.
    pub(crate) fn rule_bypass_if(&mut self, id: NodeId, parent: NodeId) -> bool {
        let (init, cond, body, else_) = match self.ast.node(id) {
            Node::IfStmt {
                init,
                cond,
                body,
                else_,
            } => (*init, *cond, *body, *else_),
            _ => return false,
        };
        let mut removed: Vec<NodeId> = vec![cond];
        removed.extend(init);
        removed.extend(else_);
        let committed = self.try_edit(id, "remove if statement", &removed, |ast, undo| {
            replace_child(ast, undo, parent, id, body);
        });
        if committed {
            return true;
        }
        if let Some(else_) = else_ {
            let mut removed = vec![cond, body];
            removed.extend(init);
            let committed = self.try_edit(
                id,
                "replace if statement with else branch",
                &removed,
                |ast, undo| {
                    replace_child(ast, undo, parent, id, else_);
                },
            );
            if committed {
                return true;
            }
        }
        false
    }

    /// A one-case switch without initializer becomes the case body.
    pub(crate) fn rule_flatten_switch(&mut self, id: NodeId, parent: NodeId) -> bool {
        let (tag, case) = match self.ast.node(id) {
            Node::SwitchStmt {
                init: None,
                tag,
                cases,
            } if cases.len() == 1 => (*tag, cases[0]),
            _ => return false,
        };
        let (exprs, body) = match self.ast.node(case) {
            Node::CaseClause { exprs, body } => (exprs.clone(), body.clone()),
            _ => return false,
        };
        let span = self.ast.span(id);
        let block = self.ast.alloc(Node::Block { stmts: body }, span);
        let mut removed = exprs;
        removed.extend(tag);
        let committed = self.try_edit(id, "flatten single-case switch", &removed, |ast, undo| {
            replace_child(ast, undo, parent, id, block);
        });
        committed
    }

    /// `go f(x)` / `defer f(x)` -> `f(x)`.
    pub(crate) fn rule_unwrap_async(&mut self, id: NodeId, parent: NodeId) -> bool {
        let (call, desc) = match self.ast.node(id) {
            Node::GoStmt { call } => (*call, "remove go"),
            Node::DeferStmt { call } => (*call, "remove defer"),
            _ => return false,
        };
        let span = self.ast.span(id);
        let stmt = self.ast.alloc(Node::ExprStmt { expr: call }, span);
        self.try_edit(id, desc, &[], |ast, undo| {
            replace_child(ast, undo, parent, id, stmt);
        })
    }

    /// Replace a call statement with the callee's body when the callee is a
    /// known function with no parameters, no results, and no control nodes
    /// in its body.
    pub(crate) fn rule_inline_call(&mut self, id: NodeId, parent: NodeId) -> bool {
        // Only list positions can hold the resulting block; a call in a
        // for-clause or comm-clause slot stays.
        if !self
            .ast
            .stmt_list(parent)
            .is_some_and(|list| list.contains(&id))
        {
            return false;
        }
        let call = match self.ast.node(id) {
            Node::ExprStmt { expr } => *expr,
            _ => return false,
        };
        let (fun, args) = match self.ast.node(call) {
            Node::Call { fun, args, .. } => (*fun, args.clone()),
            _ => return false,
        };
        if !args.is_empty() {
            return false;
        }
        let Some(sym) = self.res.use_of(fun) else {
            return false;
        };
        if self.res.symbol(sym).kind != goshrink_resolve::SymbolKind::Func {
            return false;
        }
        let decl_ident = self.res.symbol(sym).decl;
        let Some(func_decl) = self.parents.get(decl_ident) else {
            return false;
        };
        let (sig, body) = match self.ast.node(func_decl) {
            Node::FuncDecl {
                recv: None,
                sig,
                body: Some(body),
                ..
            } => (*sig, *body),
            _ => return false,
        };
        if !self.nullary_signature(sig) || self.has_control_nodes(body) {
            return false;
        }
        // A self-recursive body would re-inline forever.
        if self
            .subtree_ids(body)
            .iter()
            .any(|&n| self.res.use_of(n) == Some(sym))
        {
            return false;
        }
        let clone = self.ast.deep_clone(body);
        self.try_edit(id, "inline call", &[id], |ast, undo| {
            replace_child(ast, undo, parent, id, clone);
        })
    }

    /// No parameters and no results.
    fn nullary_signature(&self, sig: NodeId) -> bool {
        match self.ast.node(sig) {
            Node::FuncType { params, results } => {
                let empty_params = matches!(
                    self.ast.node(*params),
                    Node::FieldList { fields } if fields.is_empty()
                );
                let empty_results = match results {
                    None => true,
                    Some(r) => matches!(
                        self.ast.node(*r),
                        Node::FieldList { fields } if fields.is_empty()
                    ),
                };
                empty_params && empty_results
            }
            _ => false,
        }
    }

    /// Whether a body contains statements that change meaning when spliced
    /// into another function: returns, defers, goroutines, branches, labels.
    fn has_control_nodes(&self, body: NodeId) -> bool {
        let mut stack = vec![body];
        let mut kids = Vec::new();
        while let Some(id) = stack.pop() {
            match self.ast.node(id) {
                Node::ReturnStmt { .. }
                | Node::DeferStmt { .. }
                | Node::GoStmt { .. }
                | Node::BranchStmt { .. }
                | Node::LabeledStmt { .. } => return true,
                _ => {}
            }
            kids.clear();
            self.ast.children(id, &mut kids);
            stack.extend(kids.iter().copied());
        }
        false
    }

    /// `return`, or a `panic(...)` call statement.
    fn is_terminating(&self, stmt: NodeId) -> bool {
        match self.ast.node(stmt) {
            Node::ReturnStmt { .. } => true,
            Node::ExprStmt { expr } => match self.ast.node(*expr) {
                Node::Call { fun, .. } => self.ast.ident_name(*fun) == Some("panic"),
                _ => false,
            },
            _ => false,
        }
    }

    /// Deleting this statement is known to leave the program uncompilable.
    fn drop_breaks_compilation(&self, stmt: NodeId) -> bool {
        match self.ast.node(stmt) {
            // Short declarations introduce names later statements may need.
            Node::AssignStmt { op, .. } => *op == AssignOp::Define,
            Node::DeclStmt { .. } => self.has_live_bindings(stmt),
            _ => false,
        }
    }

    /// Whether any symbol defined under `stmt` is referenced outside it.
    fn has_live_bindings(&self, stmt: NodeId) -> bool {
        let inside = self.subtree_ids(stmt);
        for &id in &inside {
            if let Some(sym) = self.res.def_of(id) {
                let uses = self.res.uses_of(sym);
                if uses.iter().any(|u| !inside.contains(u)) {
                    return true;
                }
            }
        }
        false
    }

    fn subtree_ids(&self, root: NodeId) -> HashSet<NodeId> {
        let mut ids = HashSet::new();
        let mut stack = vec![root];
        let mut kids = Vec::new();
        while let Some(id) = stack.pop() {
            if !ids.insert(id) {
                continue;
            }
            kids.clear();
            self.ast.children(id, &mut kids);
            stack.extend(kids.iter().copied());
        }
        ids
    }

    /// Renames needed before inlining the block at `block`: for each name
    /// defined directly in the block that also occurs elsewhere in the
    /// enclosing function, pick the name plus as many underscores as it
    /// takes to be unique, and rename the definition and every use.
    fn shadow_renames(&self, block: NodeId) -> Vec<(NodeId, String)> {
        let stmts = match self.ast.stmt_list(block) {
            Some(stmts) => stmts.clone(),
            None => return Vec::new(),
        };
        // Defining idents of the block's direct statements.
        let mut defs: Vec<NodeId> = Vec::new();
        for &stmt in &stmts {
            match self.ast.node(stmt) {
                Node::AssignStmt {
                    op: AssignOp::Define,
                    lhs,
                    ..
                } => defs.extend(lhs.iter().copied()),
                Node::DeclStmt { decl } => {
                    if let Node::GenDecl { specs, .. } = self.ast.node(*decl) {
                        for &spec in specs {
                            match self.ast.node(spec) {
                                Node::ValueSpec { names, .. } => defs.extend(names.iter().copied()),
                                Node::TypeSpec { name, .. } => defs.push(*name),
                                _ => {}
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        if defs.is_empty() {
            return Vec::new();
        }

        // Occurrences owned by the symbols being renamed: the defining
        // idents and their use sites.
        let mut targets: Vec<(goshrink_resolve::SymbolId, Vec<NodeId>)> = Vec::new();
        let mut owned: HashSet<NodeId> = HashSet::new();
        for def in defs {
            let Some(sym) = self.res.def_of(def) else {
                continue;
            };
            let mut sites = vec![def];
            sites.extend(self.res.uses_of(sym));
            owned.extend(sites.iter().copied());
            targets.push((sym, sites));
        }

        // Every other identifier text in the enclosing function counts as
        // taken, nested scopes included.
        let scope_root = self.enclosing_function(block);
        let mut taken: HashSet<String> = HashSet::new();
        for id in self.subtree_ids(scope_root) {
            if owned.contains(&id) {
                continue;
            }
            if let Some(name) = self.ast.ident_name(id) {
                taken.insert(name.to_string());
            }
        }

        let mut renames = Vec::new();
        for (sym, sites) in targets {
            let name = self.res.symbol(sym).name.clone();
            if !taken.contains(&name) {
                continue;
            }
            let mut fresh = name.clone();
            while taken.contains(&fresh) {
                fresh.push('_');
            }
            taken.insert(fresh.clone());
            for site in sites {
                renames.push((site, fresh.clone()));
            }
        }
        renames
    }

    /// Nearest enclosing function declaration or literal, else the file.
    fn enclosing_function(&self, id: NodeId) -> NodeId {
        for ancestor in self.parents.ancestors(id) {
            if matches!(
                self.ast.node(ancestor),
                Node::FuncDecl { .. } | Node::FuncLit { .. }
            ) {
                return ancestor;
            }
        }
        self.file
    }
}
