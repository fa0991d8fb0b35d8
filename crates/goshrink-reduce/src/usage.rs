//! Dependent bookkeeping fixups.
//!
//! When an edit detaches a subtree, every symbol whose remaining uses all
//! lived inside that subtree becomes dead weight the compiler will reject
//! (unused import, unused local). The fixups keep the candidate compilable:
//!
//! - **imported package**: the import's alias becomes `_`; a second,
//!   stronger layer removes the import spec entirely (and the enclosing
//!   decl once its spec list empties)
//! - **local variable**: the defining identifier becomes `_`; a
//!   single-name `:=` flips to `=` so the statement still declares nothing
//!
//! The base fixups share the primary edit's undo log. The import-removal
//! layer returns its own log so the engine can peel it separately.

use crate::engine::Undo;
use goshrink_ast::{AssignOp, Ast, Node, NodeId, ParentMap};
use goshrink_resolve::{Resolution, SymbolId, SymbolKind};
use std::collections::HashSet;

/// Apply fixups for symbols orphaned by removing `removed` subtrees.
///
/// Base-layer mutations are recorded into `undo`; returns the undo log of
/// the stronger import-removal layer, if any imports were orphaned.
pub(crate) fn apply_unused_fixups(
    ast: &mut Ast,
    res: &Resolution,
    parents: &ParentMap,
    removed: &[NodeId],
    undo: &mut Undo,
) -> Option<Undo> {
    if removed.is_empty() {
        return None;
    }
    let orphaned = newly_unused(ast, res, removed);
    if orphaned.is_empty() {
        return None;
    }

    let mut stronger = Undo::new();
    for sym in orphaned {
        let symbol = res.symbol(sym);
        match symbol.kind {
            SymbolKind::Package => {
                let spec = symbol
                    .import_spec
                    .expect("package symbols always carry their import spec");
                underscore_import(ast, spec, undo);
                remove_import_spec(ast, parents, spec, &mut stronger);
            }
            SymbolKind::Var if !symbol.package_level => {
                underscore_local(ast, parents, symbol.decl, undo);
            }
            // Unused consts, types, funcs, and package-level vars are
            // legal Go; nothing to patch.
            _ => {}
        }
    }
    if stronger.is_empty() {
        None
    } else {
        Some(stronger)
    }
}

/// Symbols whose every use sits inside the removed subtrees, and whose
/// definition survives outside them.
fn newly_unused(ast: &Ast, res: &Resolution, removed: &[NodeId]) -> Vec<SymbolId> {
    let removed_ids = subtree_ids(ast, removed);
    let mut orphaned = Vec::new();
    for (sym, symbol) in res.symbols() {
        if removed_ids.contains(&symbol.decl) {
            continue;
        }
        let uses = res.uses_of(sym);
        if uses.is_empty() {
            continue;
        }
        if uses.iter().all(|u| removed_ids.contains(u)) {
            orphaned.push(sym);
        }
    }
    orphaned
}

/// All node ids under `roots`, roots included.
fn subtree_ids(ast: &Ast, roots: &[NodeId]) -> HashSet<NodeId> {
    let mut ids = HashSet::new();
    let mut stack: Vec<NodeId> = roots.to_vec();
    let mut kids = Vec::new();
    while let Some(id) = stack.pop() {
        if !ids.insert(id) {
            continue;
        }
        kids.clear();
        ast.children(id, &mut kids);
        stack.extend(kids.iter().copied());
    }
    ids
}

/// `import "x"` -> `import _ "x"` (or rewrite an existing alias).
fn underscore_import(ast: &mut Ast, spec: NodeId, undo: &mut Undo) {
    let span = ast.span(spec);
    let blank = ast.alloc(Node::Ident { name: "_".into() }, span);
    undo.record(ast, spec);
    if let Node::ImportSpec { alias, .. } = ast.node_mut(spec) {
        *alias = Some(blank);
    }
}

/// Stronger layer: drop the import spec, and the whole decl once empty.
fn remove_import_spec(ast: &mut Ast, parents: &ParentMap, spec: NodeId, undo: &mut Undo) {
    let Some(decl) = parents.get(spec) else {
        return;
    };
    undo.record(ast, decl);
    let emptied = match ast.node_mut(decl) {
        Node::GenDecl { specs, .. } => {
            specs.retain(|s| *s != spec);
            specs.is_empty()
        }
        _ => return,
    };
    if emptied {
        if let Some(file) = parents.get(decl) {
            undo.record(ast, file);
            if let Node::File { imports, .. } = ast.node_mut(file) {
                imports.retain(|d| *d != decl);
            }
        }
    }
}

/// Rename a local definition to `_`, flipping a lone `:=` to `=`.
fn underscore_local(ast: &mut Ast, parents: &ParentMap, decl_ident: NodeId, undo: &mut Undo) {
    undo.record(ast, decl_ident);
    if let Node::Ident { name } = ast.node_mut(decl_ident) {
        *name = "_".into();
    }
    if let Some(parent) = parents.get(decl_ident) {
        if let Node::AssignStmt { op, lhs, .. } = ast.node(parent) {
            if *op == AssignOp::Define && lhs.len() == 1 {
                undo.record(ast, parent);
                if let Node::AssignStmt { op, .. } = ast.node_mut(parent) {
                    *op = AssignOp::Assign;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goshrink_parser::parse_file;

    fn setup(source: &str) -> (Ast, NodeId, Resolution, ParentMap) {
        let mut ast = Ast::new();
        let file = parse_file(source, 0, &mut ast).expect("parse");
        let res = Resolution::resolve(&ast, &[file]);
        let parents = ParentMap::build(&ast, &[file]);
        (ast, file, res, parents)
    }

    /// Statement ids of the first function body in the file.
    fn body_stmts(ast: &Ast, file: NodeId) -> Vec<NodeId> {
        let decls = match ast.node(file) {
            Node::File { decls, .. } => decls.clone(),
            _ => panic!("not a file"),
        };
        for decl in decls {
            if let Node::FuncDecl {
                body: Some(body), ..
            } = ast.node(decl)
            {
                return ast.stmt_list(*body).expect("block").clone();
            }
        }
        panic!("no function body");
    }

    #[test]
    fn test_orphaned_import_gets_underscore_and_removal_layer() {
        let (mut ast, file, res, parents) = setup(
            "package p\n\nimport \"sync\"\n\nfunc f() {\n\t_ = sync.Once{}\n\tprintln(1)\n}\n",
        );
        let stmts = body_stmts(&ast, file);
        let mut undo = Undo::new();
        let stronger = apply_unused_fixups(&mut ast, &res, &parents, &[stmts[0]], &mut undo);
        // Both layers applied eagerly: the import is gone entirely.
        let printed = goshrink_ast::print_file(&ast, file);
        assert!(!printed.contains("sync"), "got:\n{}", printed);
        // Peeling the stronger layer restores the underscored import.
        stronger.expect("import removal layer").apply(&mut ast);
        let printed = goshrink_ast::print_file(&ast, file);
        assert!(printed.contains("import _ \"sync\""), "got:\n{}", printed);
        // Peeling the base layer restores the original import.
        undo.apply(&mut ast);
        let printed = goshrink_ast::print_file(&ast, file);
        assert!(printed.contains("import \"sync\""), "got:\n{}", printed);
    }

    #[test]
    fn test_orphaned_local_underscored() {
        let (mut ast, file, res, parents) =
            setup("package p\n\nfunc f() {\n\tx := 1\n\tprintln(x)\n}\n");
        let stmts = body_stmts(&ast, file);
        let mut undo = Undo::new();
        let stronger = apply_unused_fixups(&mut ast, &res, &parents, &[stmts[1]], &mut undo);
        assert!(stronger.is_none());
        let printed = goshrink_ast::print_file(&ast, file);
        assert!(printed.contains("_ = 1"), "got:\n{}", printed);
        undo.apply(&mut ast);
        let printed = goshrink_ast::print_file(&ast, file);
        assert!(printed.contains("x := 1"), "got:\n{}", printed);
    }

    #[test]
    fn test_symbol_defined_inside_removed_subtree_needs_no_fixup() {
        let (mut ast, file, res, parents) = setup(
            "package p\n\nfunc f() {\n\t{\n\t\ty := 1\n\t\tprintln(y)\n\t}\n\tprintln(2)\n}\n",
        );
        let stmts = body_stmts(&ast, file);
        let mut undo = Undo::new();
        let stronger = apply_unused_fixups(&mut ast, &res, &parents, &[stmts[0]], &mut undo);
        assert!(stronger.is_none());
        assert!(undo.is_empty());
    }

    #[test]
    fn test_partial_use_survival_blocks_fixup() {
        let (mut ast, file, res, parents) =
            setup("package p\n\nfunc f() {\n\tx := 1\n\tprintln(x)\n\tprintln(x)\n}\n");
        let stmts = body_stmts(&ast, file);
        let mut undo = Undo::new();
        // Removing only one of two uses leaves x alive.
        apply_unused_fixups(&mut ast, &res, &parents, &[stmts[1]], &mut undo);
        assert!(undo.is_empty());
        let printed = goshrink_ast::print_file(&ast, file);
        assert!(printed.contains("x := 1"));
    }
}
