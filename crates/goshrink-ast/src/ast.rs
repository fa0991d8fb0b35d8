//! Arena-backed Go syntax tree.
//!
//! # Design
//!
//! - One arena, one id space: every construct — file, declaration, statement,
//!   expression, type, field — is a [`Node`] variant addressed by [`NodeId`].
//! - Children are stored as ids inside the parent's variant, so replacing a
//!   child is a single field write and undoing it is restoring a saved clone
//!   of the parent node.
//! - Nodes are never freed during a run. An edit that drops a subtree just
//!   unlinks it; rollback re-links the old ids.
//!
//! The variant inventory matches the pre-generics Go AST: the statement and
//! expression kinds the rewrite rules dispatch on.

use crate::span::Span;
use std::fmt;
use std::rc::Rc;

/// Index of a node in the [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Keyword of a grouped declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKeyword {
    Import,
    Const,
    Var,
    Type,
}

impl fmt::Display for DeclKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKeyword::Import => write!(f, "import"),
            DeclKeyword::Const => write!(f, "const"),
            DeclKeyword::Var => write!(f, "var"),
            DeclKeyword::Type => write!(f, "type"),
        }
    }
}

/// Basic literal kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Rune,
    String,
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    LogicalOr,
    LogicalAnd,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Div,
    Rem,
    And,
    AndNot,
    Shl,
    Shr,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::LogicalOr => "||",
            BinOp::LogicalAnd => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::And => "&",
            BinOp::AndNot => "&^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
        };
        write!(f, "{}", s)
    }
}

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Minus,
    Not,
    Xor,
    And,
    Recv,
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnOp::Plus => "+",
            UnOp::Minus => "-",
            UnOp::Not => "!",
            UnOp::Xor => "^",
            UnOp::And => "&",
            UnOp::Recv => "<-",
        };
        write!(f, "{}", s)
    }
}

/// Assignment operator, including the short declaration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Define,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::AndNot => "&^=",
        };
        write!(f, "{}", s)
    }
}

/// Branch statement keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchKind::Break => write!(f, "break"),
            BranchKind::Continue => write!(f, "continue"),
            BranchKind::Goto => write!(f, "goto"),
            BranchKind::Fallthrough => write!(f, "fallthrough"),
        }
    }
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// A Go syntax node.
///
/// Child references are [`NodeId`]s into the owning [`Ast`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // === Files and declarations ===
    File {
        /// Package name ident.
        package: NodeId,
        /// Import GenDecls, in order.
        imports: Vec<NodeId>,
        /// Remaining top-level declarations, in order.
        decls: Vec<NodeId>,
    },
    ImportSpec {
        /// Explicit alias ident (`m "math"`, `_ "net/http"`), if any.
        alias: Option<NodeId>,
        /// String literal path.
        path: NodeId,
    },
    GenDecl {
        keyword: DeclKeyword,
        /// ImportSpec / ValueSpec / TypeSpec children.
        specs: Vec<NodeId>,
    },
    ValueSpec {
        names: Vec<NodeId>,
        ty: Option<NodeId>,
        values: Vec<NodeId>,
    },
    TypeSpec {
        name: NodeId,
        ty: NodeId,
    },
    FuncDecl {
        /// Receiver field list for methods.
        recv: Option<NodeId>,
        name: NodeId,
        sig: NodeId,
        /// None for bodyless (external) declarations.
        body: Option<NodeId>,
    },
    Field {
        names: Vec<NodeId>,
        ty: NodeId,
    },
    FieldList {
        fields: Vec<NodeId>,
    },

    // === Expressions ===
    Ident {
        name: Rc<str>,
    },
    BasicLit {
        kind: LitKind,
        /// Raw source text, quotes included.
        text: Rc<str>,
    },
    CompositeLit {
        /// None inside a composite literal whose element type is implied.
        ty: Option<NodeId>,
        elems: Vec<NodeId>,
    },
    FuncLit {
        sig: NodeId,
        body: NodeId,
    },
    Paren {
        inner: NodeId,
    },
    Selector {
        base: NodeId,
        sel: NodeId,
    },
    Index {
        base: NodeId,
        index: NodeId,
    },
    SliceExpr {
        base: NodeId,
        low: Option<NodeId>,
        high: Option<NodeId>,
        max: Option<NodeId>,
        /// True for the three-index form `a[l:h:m]`. Must be cleared when
        /// `max` is removed or the printed form is illegal.
        three_index: bool,
    },
    TypeAssert {
        base: NodeId,
        /// None for the `x.(type)` form inside a type switch.
        ty: Option<NodeId>,
    },
    Call {
        fun: NodeId,
        args: Vec<NodeId>,
        /// True when the last argument carries `...`.
        spread: bool,
    },
    Star {
        /// Deref in expression position, pointer type in type position.
        inner: NodeId,
    },
    Unary {
        op: UnOp,
        operand: NodeId,
    },
    Binary {
        op: BinOp,
        left: NodeId,
        right: NodeId,
    },
    KeyValue {
        key: NodeId,
        value: NodeId,
    },
    EllipsisType {
        /// `...T` in a parameter list.
        elem: NodeId,
    },

    // === Types ===
    ArrayType {
        /// None for slice types.
        len: Option<NodeId>,
        elem: NodeId,
    },
    MapType {
        key: NodeId,
        value: NodeId,
    },
    ChanType {
        dir: ChanDir,
        elem: NodeId,
    },
    FuncType {
        params: NodeId,
        results: Option<NodeId>,
    },
    StructType {
        fields: NodeId,
    },
    InterfaceType {
        methods: NodeId,
    },

    // === Statements ===
    DeclStmt {
        decl: NodeId,
    },
    LabeledStmt {
        label: NodeId,
        stmt: NodeId,
    },
    ExprStmt {
        expr: NodeId,
    },
    SendStmt {
        chan: NodeId,
        value: NodeId,
    },
    IncDecStmt {
        expr: NodeId,
        inc: bool,
    },
    AssignStmt {
        op: AssignOp,
        lhs: Vec<NodeId>,
        rhs: Vec<NodeId>,
    },
    GoStmt {
        call: NodeId,
    },
    DeferStmt {
        call: NodeId,
    },
    ReturnStmt {
        results: Vec<NodeId>,
    },
    BranchStmt {
        keyword: BranchKind,
        label: Option<NodeId>,
    },
    Block {
        stmts: Vec<NodeId>,
    },
    IfStmt {
        init: Option<NodeId>,
        cond: NodeId,
        body: NodeId,
        else_: Option<NodeId>,
    },
    CaseClause {
        /// Empty for `default:`.
        exprs: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    SwitchStmt {
        init: Option<NodeId>,
        tag: Option<NodeId>,
        cases: Vec<NodeId>,
    },
    TypeSwitchStmt {
        init: Option<NodeId>,
        /// The `x := y.(type)` assign or the bare `y.(type)` expr stmt.
        assign: NodeId,
        cases: Vec<NodeId>,
    },
    CommClause {
        /// None for `default:`.
        comm: Option<NodeId>,
        body: Vec<NodeId>,
    },
    SelectStmt {
        cases: Vec<NodeId>,
    },
    ForStmt {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        post: Option<NodeId>,
        body: NodeId,
    },
    RangeStmt {
        key: Option<NodeId>,
        value: Option<NodeId>,
        /// `:=` vs `=` in the range clause.
        define: bool,
        expr: NodeId,
        body: NodeId,
    },
}

impl Node {
    /// Whether this node is a statement.
    pub fn is_stmt(&self) -> bool {
        matches!(
            self,
            Node::DeclStmt { .. }
                | Node::LabeledStmt { .. }
                | Node::ExprStmt { .. }
                | Node::SendStmt { .. }
                | Node::IncDecStmt { .. }
                | Node::AssignStmt { .. }
                | Node::GoStmt { .. }
                | Node::DeferStmt { .. }
                | Node::ReturnStmt { .. }
                | Node::BranchStmt { .. }
                | Node::Block { .. }
                | Node::IfStmt { .. }
                | Node::SwitchStmt { .. }
                | Node::TypeSwitchStmt { .. }
                | Node::SelectStmt { .. }
                | Node::ForStmt { .. }
                | Node::RangeStmt { .. }
        )
    }

    /// Whether this node is an expression (types excluded).
    pub fn is_expr(&self) -> bool {
        matches!(
            self,
            Node::Ident { .. }
                | Node::BasicLit { .. }
                | Node::CompositeLit { .. }
                | Node::FuncLit { .. }
                | Node::Paren { .. }
                | Node::Selector { .. }
                | Node::Index { .. }
                | Node::SliceExpr { .. }
                | Node::TypeAssert { .. }
                | Node::Call { .. }
                | Node::Star { .. }
                | Node::Unary { .. }
                | Node::Binary { .. }
                | Node::KeyValue { .. }
        )
    }
}

/// The arena holding every node of a parsed package.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    spans: Vec<Span>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: Node, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.spans.push(span);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.spans[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The identifier text of `id`, if it is an `Ident`.
    pub fn ident_name(&self, id: NodeId) -> Option<&str> {
        match self.node(id) {
            Node::Ident { name } => Some(name),
            _ => None,
        }
    }

    /// The string-literal payload of an import path (quotes stripped).
    pub fn import_path(&self, spec: NodeId) -> Option<&str> {
        match self.node(spec) {
            Node::ImportSpec { path, .. } => match self.node(*path) {
                Node::BasicLit { text, .. } => Some(text.trim_matches('"')),
                _ => None,
            },
            _ => None,
        }
    }

    /// Push all child ids of `id`, in source order, onto `out`.
    pub fn children(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match self.node(id) {
            Node::File {
                package,
                imports,
                decls,
            } => {
                out.push(*package);
                out.extend(imports);
                out.extend(decls);
            }
            Node::ImportSpec { alias, path } => {
                out.extend(alias);
                out.push(*path);
            }
            Node::GenDecl { specs, .. } => out.extend(specs),
            Node::ValueSpec { names, ty, values } => {
                out.extend(names);
                out.extend(ty);
                out.extend(values);
            }
            Node::TypeSpec { name, ty } => {
                out.push(*name);
                out.push(*ty);
            }
            Node::FuncDecl {
                recv,
                name,
                sig,
                body,
            } => {
                out.extend(recv);
                out.push(*name);
                out.push(*sig);
                out.extend(body);
            }
            Node::Field { names, ty } => {
                out.extend(names);
                out.push(*ty);
            }
            Node::FieldList { fields } => out.extend(fields),
            Node::Ident { .. } | Node::BasicLit { .. } => {}
            Node::CompositeLit { ty, elems } => {
                out.extend(ty);
                out.extend(elems);
            }
            Node::FuncLit { sig, body } => {
                out.push(*sig);
                out.push(*body);
            }
            Node::Paren { inner } | Node::Star { inner } | Node::EllipsisType { elem: inner } => {
                out.push(*inner)
            }
            Node::Selector { base, sel } => {
                out.push(*base);
                out.push(*sel);
            }
            Node::Index { base, index } => {
                out.push(*base);
                out.push(*index);
            }
            Node::SliceExpr {
                base,
                low,
                high,
                max,
                ..
            } => {
                out.push(*base);
                out.extend(low);
                out.extend(high);
                out.extend(max);
            }
            Node::TypeAssert { base, ty } => {
                out.push(*base);
                out.extend(ty);
            }
            Node::Call { fun, args, .. } => {
                out.push(*fun);
                out.extend(args);
            }
            Node::Unary { operand, .. } => out.push(*operand),
            Node::Binary { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            Node::KeyValue { key, value } => {
                out.push(*key);
                out.push(*value);
            }
            Node::ArrayType { len, elem } => {
                out.extend(len);
                out.push(*elem);
            }
            Node::MapType { key, value } => {
                out.push(*key);
                out.push(*value);
            }
            Node::ChanType { elem, .. } => out.push(*elem),
            Node::FuncType { params, results } => {
                out.push(*params);
                out.extend(results);
            }
            Node::StructType { fields } => out.push(*fields),
            Node::InterfaceType { methods } => out.push(*methods),
            Node::DeclStmt { decl } => out.push(*decl),
            Node::LabeledStmt { label, stmt } => {
                out.push(*label);
                out.push(*stmt);
            }
            Node::ExprStmt { expr } => out.push(*expr),
            Node::SendStmt { chan, value } => {
                out.push(*chan);
                out.push(*value);
            }
            Node::IncDecStmt { expr, .. } => out.push(*expr),
            Node::AssignStmt { lhs, rhs, .. } => {
                out.extend(lhs);
                out.extend(rhs);
            }
            Node::GoStmt { call } | Node::DeferStmt { call } => out.push(*call),
            Node::ReturnStmt { results } => out.extend(results),
            Node::BranchStmt { label, .. } => out.extend(label),
            Node::Block { stmts } => out.extend(stmts),
            Node::IfStmt {
                init,
                cond,
                body,
                else_,
            } => {
                out.extend(init);
                out.push(*cond);
                out.push(*body);
                out.extend(else_);
            }
            Node::CaseClause { exprs, body } => {
                out.extend(exprs);
                out.extend(body);
            }
            Node::SwitchStmt { init, tag, cases } => {
                out.extend(init);
                out.extend(tag);
                out.extend(cases);
            }
            Node::TypeSwitchStmt {
                init,
                assign,
                cases,
            } => {
                out.extend(init);
                out.push(*assign);
                out.extend(cases);
            }
            Node::CommClause { comm, body } => {
                out.extend(comm);
                out.extend(body);
            }
            Node::SelectStmt { cases } => out.extend(cases),
            Node::ForStmt {
                init,
                cond,
                post,
                body,
            } => {
                out.extend(init);
                out.extend(cond);
                out.extend(post);
                out.push(*body);
            }
            Node::RangeStmt {
                key,
                value,
                expr,
                body,
                ..
            } => {
                out.extend(key);
                out.extend(value);
                out.push(*expr);
                out.push(*body);
            }
        }
    }

    /// The ordered statement list a node owns, if it owns one.
    ///
    /// Blocks, case clauses, and select comm clauses are the three
    /// list-of-statements holders.
    pub fn stmt_list(&self, owner: NodeId) -> Option<&Vec<NodeId>> {
        match self.node(owner) {
            Node::Block { stmts } => Some(stmts),
            Node::CaseClause { body, .. } => Some(body),
            Node::CommClause { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn stmt_list_mut(&mut self, owner: NodeId) -> Option<&mut Vec<NodeId>> {
        match self.node_mut(owner) {
            Node::Block { stmts } => Some(stmts),
            Node::CaseClause { body, .. } => Some(body),
            Node::CommClause { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Replace the child `old` of `parent` with `new`, wherever it sits.
    ///
    /// Returns false if `old` is not a direct child of `parent`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> bool {
        let mut kids = Vec::new();
        self.children(parent, &mut kids);
        if !kids.contains(&old) {
            return false;
        }
        replace_in_node(self.node_mut(parent), old, new);
        true
    }

    /// Copy the subtree rooted at `id` into fresh nodes.
    ///
    /// Used when a rule splices one occurrence of a subtree to a second
    /// location (call inlining, initializer inlining): ids must stay unique
    /// so the parent map and undo log remain well defined.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let span = self.span(id);
        let mut node = self.node(id).clone();
        let mut kids = Vec::new();
        self.children(id, &mut kids);
        for kid in kids {
            let copy = self.deep_clone(kid);
            replace_in_node(&mut node, kid, copy);
        }
        self.alloc(node, span)
    }
}

/// Swap every occurrence of `old` for `new` among `node`'s child ids.
fn replace_in_node(node: &mut Node, old: NodeId, new: NodeId) {
    let swap = |id: &mut NodeId| {
        if *id == old {
            *id = new;
        }
    };
    let swap_opt = |id: &mut Option<NodeId>| {
        if *id == Some(old) {
            *id = Some(new);
        }
    };
    let swap_vec = |ids: &mut Vec<NodeId>| {
        for id in ids {
            if *id == old {
                *id = new;
            }
        }
    };
    match node {
        Node::File {
            package,
            imports,
            decls,
        } => {
            swap(package);
            swap_vec(imports);
            swap_vec(decls);
        }
        Node::ImportSpec { alias, path } => {
            swap_opt(alias);
            swap(path);
        }
        Node::GenDecl { specs, .. } => swap_vec(specs),
        Node::ValueSpec { names, ty, values } => {
            swap_vec(names);
            swap_opt(ty);
            swap_vec(values);
        }
        Node::TypeSpec { name, ty } => {
            swap(name);
            swap(ty);
        }
        Node::FuncDecl {
            recv,
            name,
            sig,
            body,
        } => {
            swap_opt(recv);
            swap(name);
            swap(sig);
            swap_opt(body);
        }
        Node::Field { names, ty } => {
            swap_vec(names);
            swap(ty);
        }
        Node::FieldList { fields } => swap_vec(fields),
        Node::Ident { .. } | Node::BasicLit { .. } => {}
        Node::CompositeLit { ty, elems } => {
            swap_opt(ty);
            swap_vec(elems);
        }
        Node::FuncLit { sig, body } => {
            swap(sig);
            swap(body);
        }
        Node::Paren { inner } | Node::Star { inner } | Node::EllipsisType { elem: inner } => {
            swap(inner)
        }
        Node::Selector { base, sel } => {
            swap(base);
            swap(sel);
        }
        Node::Index { base, index } => {
            swap(base);
            swap(index);
        }
        Node::SliceExpr {
            base,
            low,
            high,
            max,
            ..
        } => {
            swap(base);
            swap_opt(low);
            swap_opt(high);
            swap_opt(max);
        }
        Node::TypeAssert { base, ty } => {
            swap(base);
            swap_opt(ty);
        }
        Node::Call { fun, args, .. } => {
            swap(fun);
            swap_vec(args);
        }
        Node::Unary { operand, .. } => swap(operand),
        Node::Binary { left, right, .. } => {
            swap(left);
            swap(right);
        }
        Node::KeyValue { key, value } => {
            swap(key);
            swap(value);
        }
        Node::ArrayType { len, elem } => {
            swap_opt(len);
            swap(elem);
        }
        Node::MapType { key, value } => {
            swap(key);
            swap(value);
        }
        Node::ChanType { elem, .. } => swap(elem),
        Node::FuncType { params, results } => {
            swap(params);
            swap_opt(results);
        }
        Node::StructType { fields } => swap(fields),
        Node::InterfaceType { methods } => swap(methods),
        Node::DeclStmt { decl } => swap(decl),
        Node::LabeledStmt { label, stmt } => {
            swap(label);
            swap(stmt);
        }
        Node::ExprStmt { expr } => swap(expr),
        Node::SendStmt { chan, value } => {
            swap(chan);
            swap(value);
        }
        Node::IncDecStmt { expr, .. } => swap(expr),
        Node::AssignStmt { lhs, rhs, .. } => {
            swap_vec(lhs);
            swap_vec(rhs);
        }
        Node::GoStmt { call } | Node::DeferStmt { call } => swap(call),
        Node::ReturnStmt { results } => swap_vec(results),
        Node::BranchStmt { label, .. } => swap_opt(label),
        Node::Block { stmts } => swap_vec(stmts),
        Node::IfStmt {
            init,
            cond,
            body,
            else_,
        } => {
            swap_opt(init);
            swap(cond);
            swap(body);
            swap_opt(else_);
        }
        Node::CaseClause { exprs, body } => {
            swap_vec(exprs);
            swap_vec(body);
        }
        Node::SwitchStmt { init, tag, cases } => {
            swap_opt(init);
            swap_opt(tag);
            swap_vec(cases);
        }
        Node::TypeSwitchStmt {
            init,
            assign,
            cases,
        } => {
            swap_opt(init);
            swap(assign);
            swap_vec(cases);
        }
        Node::CommClause { comm, body } => {
            swap_opt(comm);
            swap_vec(body);
        }
        Node::SelectStmt { cases } => swap_vec(cases),
        Node::ForStmt {
            init,
            cond,
            post,
            body,
        } => {
            swap_opt(init);
            swap_opt(cond);
            swap_opt(post);
            swap(body);
        }
        Node::RangeStmt {
            key,
            value,
            expr,
            body,
            ..
        } => {
            swap_opt(key);
            swap_opt(value);
            swap(expr);
            swap(body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero() -> Span {
        Span::zero(0)
    }

    #[test]
    fn test_alloc_and_lookup() {
        let mut ast = Ast::new();
        let id = ast.alloc(Node::Ident { name: "x".into() }, zero());
        assert_eq!(ast.ident_name(id), Some("x"));
    }

    #[test]
    fn test_replace_child() {
        let mut ast = Ast::new();
        let a = ast.alloc(Node::Ident { name: "a".into() }, zero());
        let b = ast.alloc(Node::Ident { name: "b".into() }, zero());
        let paren = ast.alloc(Node::Paren { inner: a }, zero());
        assert!(ast.replace_child(paren, a, b));
        assert_eq!(ast.node(paren), &Node::Paren { inner: b });
        assert!(!ast.replace_child(paren, a, b));
    }

    #[test]
    fn test_children_order() {
        let mut ast = Ast::new();
        let l = ast.alloc(Node::Ident { name: "l".into() }, zero());
        let r = ast.alloc(Node::Ident { name: "r".into() }, zero());
        let bin = ast.alloc(
            Node::Binary {
                op: BinOp::Add,
                left: l,
                right: r,
            },
            zero(),
        );
        let mut kids = Vec::new();
        ast.children(bin, &mut kids);
        assert_eq!(kids, vec![l, r]);
    }

    #[test]
    fn test_deep_clone_is_fresh() {
        let mut ast = Ast::new();
        let x = ast.alloc(Node::Ident { name: "x".into() }, zero());
        let call = ast.alloc(
            Node::Call {
                fun: x,
                args: vec![],
                spread: false,
            },
            zero(),
        );
        let copy = ast.deep_clone(call);
        assert_ne!(copy, call);
        let mut kids = Vec::new();
        ast.children(copy, &mut kids);
        assert_eq!(kids.len(), 1);
        assert_ne!(kids[0], x);
        assert_eq!(ast.ident_name(kids[0]), Some("x"));
    }

    #[test]
    fn test_stmt_list_holders() {
        let mut ast = Ast::new();
        let s = ast.alloc(Node::ReturnStmt { results: vec![] }, zero());
        let block = ast.alloc(Node::Block { stmts: vec![s] }, zero());
        let case = ast.alloc(
            Node::CaseClause {
                exprs: vec![],
                body: vec![s],
            },
            zero(),
        );
        assert_eq!(ast.stmt_list(block), Some(&vec![s]));
        assert_eq!(ast.stmt_list(case), Some(&vec![s]));
        assert_eq!(ast.stmt_list(s), None);
    }
}
