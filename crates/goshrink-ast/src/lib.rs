//! Mutable Go syntax trees for the reducer.
//!
//! The tree lives in a single arena ([`Ast`]); nodes reference their children
//! by [`NodeId`], so an edit is a field assignment on one node and undo is a
//! saved clone of the touched nodes. Source positions are recorded at parse
//! time and never updated afterwards — the reducer's change log wants the
//! original location of whatever it rewrote.

pub mod ast;
pub mod parent;
pub mod printer;
pub mod span;

pub use ast::{
    AssignOp, Ast, BinOp, BranchKind, ChanDir, DeclKeyword, LitKind, Node, NodeId, UnOp,
};
pub use parent::ParentMap;
pub use printer::print_file;
pub use span::{SourceFile, SourceMap, Span};
