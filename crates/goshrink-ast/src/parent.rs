//! Node-to-parent mapping.
//!
//! Rebuilt from the roots at the start of every reduction pass. Ids of nodes
//! allocated after the build simply have no entry until the next rebuild,
//! which is fine: a pass restarts from the root as soon as an edit commits.

use crate::ast::{Ast, NodeId};

/// Maps each node id to its immediate parent.
#[derive(Debug, Clone, Default)]
pub struct ParentMap {
    parents: Vec<Option<NodeId>>,
}

impl ParentMap {
    /// Build the map by walking every subtree in `roots`.
    pub fn build(ast: &Ast, roots: &[NodeId]) -> Self {
        let mut parents = vec![None; ast.len()];
        let mut stack: Vec<NodeId> = roots.to_vec();
        let mut kids = Vec::new();
        while let Some(id) = stack.pop() {
            kids.clear();
            ast.children(id, &mut kids);
            for &kid in &kids {
                parents[kid.index()] = Some(id);
                stack.push(kid);
            }
        }
        Self { parents }
    }

    /// Parent of `id`, or None for roots and unlinked nodes.
    pub fn get(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.index()).copied().flatten()
    }

    /// Walk up from `id` through its ancestors.
    pub fn ancestors<'a>(&'a self, id: NodeId) -> impl Iterator<Item = NodeId> + 'a {
        let mut cur = self.get(id);
        std::iter::from_fn(move || {
            let next = cur?;
            cur = self.get(next);
            Some(next)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::span::Span;

    #[test]
    fn test_build_and_ancestors() {
        let mut ast = Ast::new();
        let x = ast.alloc(Node::Ident { name: "x".into() }, Span::zero(0));
        let paren = ast.alloc(Node::Paren { inner: x }, Span::zero(0));
        let stmt = ast.alloc(Node::ExprStmt { expr: paren }, Span::zero(0));
        let block = ast.alloc(Node::Block { stmts: vec![stmt] }, Span::zero(0));

        let map = ParentMap::build(&ast, &[block]);
        assert_eq!(map.get(x), Some(paren));
        assert_eq!(map.get(block), None);
        let chain: Vec<_> = map.ancestors(x).collect();
        assert_eq!(chain, vec![paren, stmt, block]);
    }
}
