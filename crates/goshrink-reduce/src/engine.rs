//! Rewrite engine: attempt an edit, consult the oracle, commit or roll back.
//!
//! Every mutation goes through [`Undo`], a transaction log of node
//! snapshots applied in reverse. `try_edit` is the single commit point:
//!
//! 1. the rule's closure mutates the arena and records what it touched;
//! 2. the engine applies the dependent bookkeeping fixups for symbols the
//!    edit orphaned (underscore renames, import rewrites), layered so the
//!    strongest candidate is tried first;
//! 3. the oracle classifies the printed candidate;
//! 4. on `Interesting` the undo logs are dropped and the pass unwinds; on
//!    rejection the layers peel off one at a time, each weaker candidate
//!    re-tested, until everything is restored.
//!
//! At most one edit commits per pass.

use crate::error::Error;
use crate::oracle::Verdict;
use crate::usage;
use crate::Reducer;
use goshrink_ast::{print_file, Ast, Node, NodeId};
use std::io::Write;
use tracing::debug;

/// Transaction log of `(node, previous value)` snapshots.
///
/// Restoring applies snapshots in reverse order; a node is snapshotted at
/// most once, before its first mutation.
#[derive(Debug, Default)]
pub(crate) struct Undo {
    saved: Vec<(NodeId, Node)>,
}

impl Undo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Snapshot `id` before mutating it.
    pub(crate) fn record(&mut self, ast: &Ast, id: NodeId) {
        if !self.saved.iter().any(|(saved_id, _)| *saved_id == id) {
            self.saved.push((id, ast.node(id).clone()));
        }
    }

    /// Restore every snapshot, newest first.
    pub(crate) fn apply(self, ast: &mut Ast) {
        for (id, node) in self.saved.into_iter().rev() {
            *ast.node_mut(id) = node;
        }
    }
}

/// Snapshot `parent` into `undo` and swap its child `old` for `new`.
pub(crate) fn replace_child(
    ast: &mut Ast,
    undo: &mut Undo,
    parent: NodeId,
    old: NodeId,
    new: NodeId,
) -> bool {
    undo.record(ast, parent);
    ast.replace_child(parent, old, new)
}

impl Reducer<'_> {
    /// Attempt one edit. `log_node` anchors the verbose log line, `removed`
    /// lists the subtree roots the edit detaches (for use bookkeeping), and
    /// `f` performs the mutation, recording its touches in the undo log.
    ///
    /// Returns true if the edit was committed.
    pub(crate) fn try_edit(
        &mut self,
        log_node: NodeId,
        desc: &str,
        removed: &[NodeId],
        f: impl FnOnce(&mut Ast, &mut Undo),
    ) -> bool {
        if self.did_change || self.fatal.is_some() {
            return false;
        }

        let mut base = Undo::new();
        f(&mut self.ast, &mut base);
        let mut stronger = usage::apply_unused_fixups(
            &mut self.ast,
            &self.res,
            &self.parents,
            removed,
            &mut base,
        );

        // Strongest candidate first; on rejection peel the import-removal
        // layer and re-test before undoing the edit itself.
        loop {
            match self.ok_change() {
                Ok(true) => {
                    self.log_change(log_node, desc);
                    return true;
                }
                Ok(false) => match stronger.take() {
                    Some(layer) => layer.apply(&mut self.ast),
                    None => break,
                },
                Err(err) => {
                    self.fatal = Some(err);
                    break;
                }
            }
        }
        if let Some(layer) = stronger {
            layer.apply(&mut self.ast);
        }
        base.apply(&mut self.ast);
        false
    }

    /// Print the focused file and ask the oracle about it.
    fn ok_change(&mut self) -> Result<bool, Error> {
        let source = print_file(&self.ast, self.file);
        match self.oracle.test(&source)? {
            Verdict::Interesting => {
                self.did_change = true;
                Ok(true)
            }
            Verdict::NotInteresting => Ok(false),
        }
    }

    /// Verbose per-acceptance log: `<path>:<line>: <desc> (<N tries>)`.
    ///
    /// Positions resolve against the original parse; tries count verifier
    /// runs since the previous accepted edit.
    fn log_change(&mut self, node: NodeId, desc: &str) {
        let tries = self.oracle.runs - self.runs_at_accept;
        self.runs_at_accept = self.oracle.runs;
        debug!("accepted: {} ({} tries)", desc, tries);
        if self.verbose {
            let span = self.ast.span(node);
            let path = self.sources.file_path(&span).to_path_buf();
            let (line, _col) = self.sources.line_col(&span);
            let _ = writeln!(
                self.log_out,
                "{}:{}: {} ({} tries)",
                path.display(),
                line,
                desc,
                tries
            );
        }
    }
}
