//! Declaration rules.

use crate::Reducer;
use goshrink_ast::{DeclKeyword, Node, NodeId};

impl Reducer<'_> {
    /// Remove a const/var spec whose names are all unexported and unused.
    /// The enclosing declaration goes too once its spec list empties.
    pub(crate) fn rule_remove_unused_spec(&mut self, spec: NodeId) -> bool {
        let names = match self.ast.node(spec) {
            Node::ValueSpec { names, .. } => names.clone(),
            _ => return false,
        };
        let Some(decl) = self.parents.get(spec) else {
            return false;
        };
        if !matches!(
            self.ast.node(decl),
            Node::GenDecl {
                keyword: DeclKeyword::Var | DeclKeyword::Const,
                ..
            }
        ) {
            return false;
        }
        for &name in &names {
            let text = self.ast.ident_name(name).unwrap_or("_");
            if text.starts_with(char::is_uppercase) {
                return false;
            }
            if text == "_" {
                continue;
            }
            match self.res.def_of(name) {
                Some(sym) if self.res.is_unused(sym) => {}
                _ => return false,
            }
        }
        self.remove_spec(decl, spec, "remove unused declaration")
    }

    /// Remove a `_`-named import.
    pub(crate) fn rule_remove_blank_import(&mut self, spec: NodeId) -> bool {
        let alias = match self.ast.node(spec) {
            Node::ImportSpec {
                alias: Some(alias), ..
            } => *alias,
            _ => return false,
        };
        if self.ast.ident_name(alias) != Some("_") {
            return false;
        }
        let Some(decl) = self.parents.get(spec) else {
            return false;
        };
        self.remove_spec(decl, spec, "remove blank import")
    }

    /// Delete `spec` from `decl`, unlinking the declaration itself (from
    /// the file or the statement list holding it) when it empties.
    fn remove_spec(&mut self, decl: NodeId, spec: NodeId, desc: &str) -> bool {
        let remaining = match self.ast.node(decl) {
            Node::GenDecl { specs, .. } => specs.iter().filter(|s| **s != spec).count(),
            _ => return false,
        };
        let container = self.parents.get(decl);
        let holder = container.and_then(|c| match self.ast.node(c) {
            // A local declaration sits in a DeclStmt inside a statement list.
            Node::DeclStmt { .. } => self.parents.get(c).map(|list| (c, list)),
            _ => None,
        });
        self.try_edit(spec, desc, &[spec], move |ast, undo| {
            undo.record(ast, decl);
            if let Node::GenDecl { specs, .. } = ast.node_mut(decl) {
                specs.retain(|s| *s != spec);
            }
            if remaining == 0 {
                match (container, holder) {
                    (_, Some((decl_stmt, list_owner))) => {
                        undo.record(ast, list_owner);
                        if let Some(list) = ast.stmt_list_mut(list_owner) {
                            list.retain(|s| *s != decl_stmt);
                        }
                    }
                    (Some(file), None) => {
                        undo.record(ast, file);
                        if let Node::File { imports, decls, .. } = ast.node_mut(file) {
                            imports.retain(|d| *d != decl);
                            decls.retain(|d| *d != decl);
                        }
                    }
                    (None, None) => {}
                }
            }
        })
    }
}
