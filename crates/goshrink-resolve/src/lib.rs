//! Name resolution pass
//!
//! Builds the symbol bookkeeping the reducer's rules consult: which
//! identifier defines which symbol, which identifiers reference it, and
//! therefore which symbols are unused.
//!
//! # What this pass does
//!
//! 1. **Collects package-level symbols** from every file (order-independent,
//!    like Go's package scope)
//! 2. **Walks function bodies** with a lexical scope stack, recording
//!    definition and use occurrences per identifier
//! 3. **Maintains per-symbol use lists** — `uses_of(s).is_empty()` is the
//!    reducer's "safe to delete" signal
//!
//! # What this pass does NOT do
//!
//! - **No type inference** — the verification command's compiler is the
//!   authoritative type checker; a wrong liveness guess here only costs a
//!   rejected candidate
//! - **No diagnostics** — unresolved names (builtins, foreign package
//!   members) are simply not tracked
//!
//! Blank identifiers (`_`) never define or reference a symbol. Selector
//! members (`pkg.Name`, `x.field`) resolve only their base. Composite
//! literal keys that are plain identifiers are treated as field names and
//! skipped; mistaking a map key for a field name drops a use at worst, and
//! the oracle rejects any deletion that mattered.

use goshrink_ast::{AssignOp, Ast, DeclKeyword, Node, NodeId};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Index of a symbol in a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// What kind of entity a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// An imported package.
    Package,
    Var,
    Const,
    Type,
    Func,
}

/// A named entity declared in the target package.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Defining occurrence: the ident node, or the ImportSpec for packages
    /// imported without an alias.
    pub decl: NodeId,
    /// The ImportSpec for package symbols.
    pub import_spec: Option<NodeId>,
    /// True for symbols declared at package level (not function-local).
    pub package_level: bool,
}

/// Symbol tables for one package snapshot.
///
/// Invalidated by any accepted edit; the driver rebuilds it each pass.
#[derive(Debug, Default)]
pub struct Resolution {
    symbols: Vec<Symbol>,
    /// Defining ident -> symbol.
    defs: HashMap<NodeId, SymbolId>,
    /// Referencing ident -> symbol.
    uses: HashMap<NodeId, SymbolId>,
    /// Per-symbol referencing idents, in walk order.
    use_lists: IndexMap<SymbolId, Vec<NodeId>>,
}

impl Resolution {
    /// Resolve all files of a package against a shared arena.
    pub fn resolve(ast: &Ast, files: &[NodeId]) -> Resolution {
        let mut r = Resolver {
            ast,
            res: Resolution::default(),
            scopes: Vec::new(),
        };
        r.collect_package_scope(files);
        for &file in files {
            r.resolve_file(file);
        }
        r.res
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }

    /// The symbol defined by `ident`, if any.
    pub fn def_of(&self, ident: NodeId) -> Option<SymbolId> {
        self.defs.get(&ident).copied()
    }

    /// The symbol referenced by `ident`, if any.
    pub fn use_of(&self, ident: NodeId) -> Option<SymbolId> {
        self.uses.get(&ident).copied()
    }

    /// All referencing occurrences of `sym`, excluding the definition.
    pub fn uses_of(&self, sym: SymbolId) -> &[NodeId] {
        self.use_lists.get(&sym).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_unused(&self, sym: SymbolId) -> bool {
        self.uses_of(sym).is_empty()
    }
}

struct Resolver<'a> {
    ast: &'a Ast,
    res: Resolution,
    /// Lexical scope stack; each maps name -> symbol.
    scopes: Vec<HashMap<String, SymbolId>>,
}

impl<'a> Resolver<'a> {
    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Define a symbol for `ident` in the innermost scope.
    fn define(&mut self, ident: NodeId, kind: SymbolKind) -> Option<SymbolId> {
        let name = self.ast.ident_name(ident)?;
        if name == "_" {
            return None;
        }
        let name = name.to_string();
        let package_level = self.scopes.len() == 1;
        let id = SymbolId(self.res.symbols.len() as u32);
        self.res.symbols.push(Symbol {
            name: name.clone(),
            kind,
            decl: ident,
            import_spec: None,
            package_level,
        });
        self.res.defs.insert(ident, id);
        self.res.use_lists.insert(id, Vec::new());
        self.scopes
            .last_mut()
            .expect("scope stack is never empty during resolution")
            .insert(name, id);
        Some(id)
    }

    fn define_import(&mut self, spec: NodeId) {
        let (alias, _path) = match self.ast.node(spec) {
            Node::ImportSpec { alias, path } => (*alias, *path),
            _ => return,
        };
        let name = match alias {
            Some(alias) => match self.ast.ident_name(alias) {
                // `_` and `.` imports bind no package name.
                Some("_") | Some(".") | None => return,
                Some(name) => name.to_string(),
            },
            None => match self.ast.import_path(spec) {
                Some(path) => path.rsplit('/').next().unwrap_or(path).to_string(),
                None => return,
            },
        };
        let decl = alias.unwrap_or(spec);
        let id = SymbolId(self.res.symbols.len() as u32);
        self.res.symbols.push(Symbol {
            name: name.clone(),
            kind: SymbolKind::Package,
            decl,
            import_spec: Some(spec),
            package_level: false,
        });
        if alias.is_some() {
            self.res.defs.insert(decl, id);
        }
        self.res.use_lists.insert(id, Vec::new());
        self.scopes
            .last_mut()
            .expect("file scope pushed before imports")
            .insert(name, id);
    }

    /// Record a referencing occurrence of `ident`.
    fn use_ident(&mut self, ident: NodeId) {
        let name = match self.ast.ident_name(ident) {
            Some(name) if name != "_" => name,
            _ => return,
        };
        for scope in self.scopes.iter().rev() {
            if let Some(&sym) = scope.get(name) {
                self.res.uses.insert(ident, sym);
                self.res
                    .use_lists
                    .entry(sym)
                    .or_default()
                    .push(ident);
                return;
            }
        }
        // Universe-scope names and foreign members are not tracked.
    }

    /// Pass 1: package-level declarations from every file.
    fn collect_package_scope(&mut self, files: &[NodeId]) {
        self.push_scope();
        for &file in files {
            let decls = match self.ast.node(file) {
                Node::File { decls, .. } => decls.clone(),
                _ => continue,
            };
            for decl in decls {
                match self.ast.node(decl) {
                    Node::FuncDecl { recv, name, .. } => {
                        // Methods live in their receiver's method set, not
                        // the package scope.
                        if recv.is_none() {
                            self.define(*name, SymbolKind::Func);
                        }
                    }
                    Node::GenDecl { keyword, specs } => {
                        let (keyword, specs) = (*keyword, specs.clone());
                        for spec in specs {
                            self.collect_spec_names(keyword, spec);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn collect_spec_names(&mut self, keyword: DeclKeyword, spec: NodeId) {
        match (keyword, self.ast.node(spec)) {
            (DeclKeyword::Var, Node::ValueSpec { names, .. }) => {
                for name in names.clone() {
                    self.define(name, SymbolKind::Var);
                }
            }
            (DeclKeyword::Const, Node::ValueSpec { names, .. }) => {
                for name in names.clone() {
                    self.define(name, SymbolKind::Const);
                }
            }
            (DeclKeyword::Type, Node::TypeSpec { name, .. }) => {
                self.define(*name, SymbolKind::Type);
            }
            _ => {}
        }
    }

    /// Pass 2: one file, with its own import scope.
    fn resolve_file(&mut self, file: NodeId) {
        let (imports, decls) = match self.ast.node(file) {
            Node::File {
                imports, decls, ..
            } => (imports.clone(), decls.clone()),
            _ => return,
        };
        self.push_scope();
        for import in imports {
            if let Node::GenDecl { specs, .. } = self.ast.node(import) {
                for spec in specs.clone() {
                    self.define_import(spec);
                }
            }
        }
        for decl in decls {
            self.resolve_decl(decl);
        }
        self.pop_scope();
    }

    fn resolve_decl(&mut self, decl: NodeId) {
        match self.ast.node(decl) {
            Node::FuncDecl {
                recv, sig, body, ..
            } => {
                let (recv, sig, body) = (*recv, *sig, *body);
                self.push_scope();
                if let Some(recv) = recv {
                    self.bind_field_list(recv);
                }
                self.bind_signature(sig);
                if let Some(body) = body {
                    self.resolve_stmt_list_of(body);
                }
                self.pop_scope();
            }
            Node::GenDecl { specs, .. } => {
                for spec in specs.clone() {
                    self.resolve_spec(spec, true);
                }
            }
            _ => {}
        }
    }

    /// Resolve a value/type spec. At package level the names were defined in
    /// pass 1; locally the caller defines them after this returns.
    fn resolve_spec(&mut self, spec: NodeId, _package_level: bool) {
        match self.ast.node(spec) {
            Node::ValueSpec { ty, values, .. } => {
                let (ty, values) = (*ty, values.clone());
                if let Some(ty) = ty {
                    self.resolve_expr(ty);
                }
                for value in values {
                    self.resolve_expr(value);
                }
            }
            Node::TypeSpec { ty, .. } => {
                let ty = *ty;
                self.resolve_expr(ty);
            }
            _ => {}
        }
    }

    /// Define parameter and result names, resolving their types.
    fn bind_signature(&mut self, sig: NodeId) {
        let (params, results) = match self.ast.node(sig) {
            Node::FuncType { params, results } => (*params, *results),
            _ => return,
        };
        self.bind_field_list(params);
        if let Some(results) = results {
            self.bind_field_list(results);
        }
    }

    fn bind_field_list(&mut self, list: NodeId) {
        let fields = match self.ast.node(list) {
            Node::FieldList { fields } => fields.clone(),
            _ => return,
        };
        for field in fields {
            if let Node::Field { names, ty } = self.ast.node(field) {
                let (names, ty) = (names.clone(), *ty);
                self.resolve_expr(ty);
                for name in names {
                    self.define(name, SymbolKind::Var);
                }
            }
        }
    }

    /// Resolve the statements of a block-like node in a fresh scope.
    fn resolve_stmt_list_of(&mut self, owner: NodeId) {
        let stmts = match self.ast.stmt_list(owner) {
            Some(stmts) => stmts.clone(),
            None => return,
        };
        self.push_scope();
        for stmt in stmts {
            self.resolve_stmt(stmt);
        }
        self.pop_scope();
    }

    fn resolve_stmt(&mut self, stmt: NodeId) {
        match self.ast.node(stmt) {
            Node::DeclStmt { decl } => {
                let decl = *decl;
                if let Node::GenDecl { keyword, specs } = self.ast.node(decl) {
                    let (keyword, specs) = (*keyword, specs.clone());
                    for spec in specs {
                        // Initializers resolve against the outer bindings.
                        self.resolve_spec(spec, false);
                        self.collect_spec_names(keyword, spec);
                    }
                }
            }
            Node::AssignStmt { op, lhs, rhs } => {
                let (op, lhs, rhs) = (*op, lhs.clone(), rhs.clone());
                for value in rhs {
                    self.resolve_expr(value);
                }
                if op == AssignOp::Define {
                    for target in lhs {
                        // `:=` re-uses a name already bound in the innermost
                        // scope and defines the rest.
                        let existing = self
                            .ast
                            .ident_name(target)
                            .filter(|n| *n != "_")
                            .and_then(|n| self.scopes.last().and_then(|s| s.get(n)).copied());
                        if existing.is_some() {
                            self.use_ident(target);
                        } else {
                            self.define(target, SymbolKind::Var);
                        }
                    }
                } else {
                    for target in lhs {
                        self.resolve_expr(target);
                    }
                }
            }
            Node::ExprStmt { expr } => {
                let expr = *expr;
                self.resolve_expr(expr);
            }
            Node::SendStmt { chan, value } => {
                let (chan, value) = (*chan, *value);
                self.resolve_expr(chan);
                self.resolve_expr(value);
            }
            Node::IncDecStmt { expr, .. } => {
                let expr = *expr;
                self.resolve_expr(expr);
            }
            Node::GoStmt { call } | Node::DeferStmt { call } => {
                let call = *call;
                self.resolve_expr(call);
            }
            Node::ReturnStmt { results } => {
                for result in results.clone() {
                    self.resolve_expr(result);
                }
            }
            Node::BranchStmt { .. } => {
                // Labels are a separate namespace the rules never touch.
            }
            Node::LabeledStmt { stmt, .. } => {
                let stmt = *stmt;
                self.resolve_stmt(stmt);
            }
            Node::Block { .. } => self.resolve_stmt_list_of(stmt),
            Node::IfStmt {
                init,
                cond,
                body,
                else_,
            } => {
                let (init, cond, body, else_) = (*init, *cond, *body, *else_);
                self.push_scope();
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                self.resolve_expr(cond);
                self.resolve_stmt_list_of(body);
                if let Some(else_) = else_ {
                    self.resolve_stmt(else_);
                }
                self.pop_scope();
            }
            Node::SwitchStmt { init, tag, cases } => {
                let (init, tag, cases) = (*init, *tag, cases.clone());
                self.push_scope();
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                if let Some(tag) = tag {
                    self.resolve_expr(tag);
                }
                for case in cases {
                    self.resolve_case(case);
                }
                self.pop_scope();
            }
            Node::TypeSwitchStmt {
                init,
                assign,
                cases,
            } => {
                let (init, assign, cases) = (*init, *assign, cases.clone());
                self.push_scope();
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                self.resolve_stmt(assign);
                for case in cases {
                    self.resolve_case(case);
                }
                self.pop_scope();
            }
            Node::SelectStmt { cases } => {
                for case in cases.clone() {
                    if let Node::CommClause { comm, .. } = self.ast.node(case) {
                        let comm = *comm;
                        self.push_scope();
                        if let Some(comm) = comm {
                            self.resolve_stmt(comm);
                        }
                        self.resolve_stmt_list_of(case);
                        self.pop_scope();
                    }
                }
            }
            Node::ForStmt {
                init,
                cond,
                post,
                body,
            } => {
                let (init, cond, post, body) = (*init, *cond, *post, *body);
                self.push_scope();
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                if let Some(cond) = cond {
                    self.resolve_expr(cond);
                }
                if let Some(post) = post {
                    self.resolve_stmt(post);
                }
                self.resolve_stmt_list_of(body);
                self.pop_scope();
            }
            Node::RangeStmt {
                key,
                value,
                define,
                expr,
                body,
            } => {
                let (key, value, define, expr, body) = (*key, *value, *define, *expr, *body);
                self.push_scope();
                self.resolve_expr(expr);
                for target in [key, value].into_iter().flatten() {
                    if define {
                        self.define(target, SymbolKind::Var);
                    } else {
                        self.resolve_expr(target);
                    }
                }
                self.resolve_stmt_list_of(body);
                self.pop_scope();
            }
            _ => {}
        }
    }

    fn resolve_case(&mut self, case: NodeId) {
        if let Node::CaseClause { exprs, .. } = self.ast.node(case) {
            for expr in exprs.clone() {
                self.resolve_expr(expr);
            }
            self.resolve_stmt_list_of(case);
        }
    }

    fn resolve_expr(&mut self, expr: NodeId) {
        match self.ast.node(expr) {
            Node::Ident { .. } => self.use_ident(expr),
            Node::Selector { base, .. } => {
                // Only the base resolves here; the selected member belongs
                // to another package or to a type's field/method set.
                let base = *base;
                self.resolve_expr(base);
            }
            Node::FuncLit { sig, body } => {
                let (sig, body) = (*sig, *body);
                self.push_scope();
                self.bind_signature(sig);
                self.resolve_stmt_list_of(body);
                self.pop_scope();
            }
            Node::CompositeLit { ty, elems } => {
                let (ty, elems) = (*ty, elems.clone());
                if let Some(ty) = ty {
                    self.resolve_expr(ty);
                }
                for elem in elems {
                    match self.ast.node(elem) {
                        Node::KeyValue { key, value } => {
                            let (key, value) = (*key, *value);
                            // Plain-ident keys are field names, not values.
                            if !matches!(self.ast.node(key), Node::Ident { .. }) {
                                self.resolve_expr(key);
                            }
                            self.resolve_expr(value);
                        }
                        _ => self.resolve_expr(elem),
                    }
                }
            }
            _ => {
                let mut kids = Vec::new();
                self.ast.children(expr, &mut kids);
                for kid in kids {
                    self.resolve_expr(kid);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goshrink_parser::parse_file;

    fn resolve_src(source: &str) -> (Ast, NodeId, Resolution) {
        let mut ast = Ast::new();
        let file = parse_file(source, 0, &mut ast).expect("parse failed");
        let res = Resolution::resolve(&ast, &[file]);
        (ast, file, res)
    }

    fn symbol_by_name(res: &Resolution, name: &str) -> SymbolId {
        res.symbols()
            .find(|(_, s)| s.name == name)
            .map(|(id, _)| id)
            .unwrap_or_else(|| panic!("no symbol named {}", name))
    }

    #[test]
    fn test_local_use_counting() {
        let (_, _, res) = resolve_src(
            "package p\n\nfunc f() {\n\tx := 1\n\tprintln(x, x)\n}\n",
        );
        let x = symbol_by_name(&res, "x");
        assert_eq!(res.uses_of(x).len(), 2);
        assert!(!res.is_unused(x));
    }

    #[test]
    fn test_unused_local() {
        let (_, _, res) = resolve_src("package p\n\nfunc f() {\n\tvar x int\n\t_ = 1\n}\n");
        let x = symbol_by_name(&res, "x");
        assert!(res.is_unused(x));
    }

    #[test]
    fn test_import_use_via_selector() {
        let (_, _, res) = resolve_src(
            "package p\n\nimport \"sync\"\n\nfunc f() {\n\t_ = sync.Once{}\n}\n",
        );
        let sync = symbol_by_name(&res, "sync");
        assert_eq!(res.symbol(sync).kind, SymbolKind::Package);
        assert_eq!(res.uses_of(sync).len(), 1);
    }

    #[test]
    fn test_unused_import() {
        let (_, _, res) = resolve_src("package p\n\nimport \"sync\"\n\nfunc f() {\n}\n");
        let sync = symbol_by_name(&res, "sync");
        assert!(res.is_unused(sync));
        assert!(res.symbol(sync).import_spec.is_some());
    }

    #[test]
    fn test_blank_import_binds_nothing() {
        let (_, _, res) = resolve_src("package p\n\nimport _ \"net/http\"\n");
        assert!(res.symbols().all(|(_, s)| s.name != "http"));
    }

    #[test]
    fn test_shadowing_resolves_innermost() {
        let (_, _, res) = resolve_src(
            "package p\n\nfunc f() {\n\tx := 1\n\t{\n\t\tx := 2\n\t\tprintln(x)\n\t}\n}\n",
        );
        // Two distinct x symbols; the inner one has the use.
        let symbols: Vec<_> = res
            .symbols()
            .filter(|(_, s)| s.name == "x")
            .map(|(id, _)| id)
            .collect();
        assert_eq!(symbols.len(), 2);
        assert!(res.is_unused(symbols[0]), "outer x has no use");
        assert_eq!(res.uses_of(symbols[1]).len(), 1);
    }

    #[test]
    fn test_package_scope_is_order_independent() {
        let (_, _, res) = resolve_src(
            "package p\n\nfunc f() {\n\tprintln(g())\n}\n\nfunc g() int {\n\treturn 0\n}\n",
        );
        let g = symbol_by_name(&res, "g");
        assert_eq!(res.uses_of(g).len(), 1);
    }

    #[test]
    fn test_short_decl_reuse_is_a_use() {
        let (_, _, res) = resolve_src(
            "package p\n\nfunc f() {\n\tx, err := g()\n\ty, err := g()\n\tprintln(x, y, err)\n}\n\nfunc g() (int, error) {\n\treturn 0, nil\n}\n",
        );
        let symbols: Vec<_> = res
            .symbols()
            .filter(|(_, s)| s.name == "err")
            .map(|(id, _)| id)
            .collect();
        assert_eq!(symbols.len(), 1, "second := reuses err");
        // One redefine-as-assign occurrence plus one println occurrence.
        assert_eq!(res.uses_of(symbols[0]).len(), 2);
    }

    #[test]
    fn test_defining_occurrence_not_in_use_list() {
        let (ast, _, res) = resolve_src("package p\n\nfunc f() {\n\tx := 1\n\tprintln(x)\n}\n");
        let x = symbol_by_name(&res, "x");
        let decl = res.symbol(x).decl;
        assert!(res.def_of(decl).is_some());
        assert!(!res.uses_of(x).contains(&decl));
        assert_eq!(ast.ident_name(decl), Some("x"));
    }

    #[test]
    fn test_params_are_symbols() {
        let (_, _, res) = resolve_src("package p\n\nfunc f(n int) {\n\tprintln(n)\n}\n");
        let n = symbol_by_name(&res, "n");
        assert_eq!(res.uses_of(n).len(), 1);
    }

    #[test]
    fn test_builtins_untracked() {
        let (_, _, res) = resolve_src("package p\n\nfunc f() {\n\tprintln(len(\"x\"))\n}\n");
        assert!(res.symbols().all(|(_, s)| s.name != "println" && s.name != "len"));
    }

    #[test]
    fn test_composite_field_keys_skipped() {
        let (_, _, res) = resolve_src(
            "package p\n\ntype T struct {\n\ta int\n}\n\nvar v = T{a: 1}\n",
        );
        // `a` the field key is not a use of anything.
        let t = symbol_by_name(&res, "T");
        assert_eq!(res.uses_of(t).len(), 1);
    }

    #[test]
    fn test_range_defines() {
        let (_, _, res) = resolve_src(
            "package p\n\nfunc f(xs []int) {\n\tfor i, x := range xs {\n\t\tprintln(i, x)\n\t}\n}\n",
        );
        let i = symbol_by_name(&res, "i");
        let x = symbol_by_name(&res, "x");
        assert_eq!(res.uses_of(i).len(), 1);
        assert_eq!(res.uses_of(x).len(), 1);
    }
}
