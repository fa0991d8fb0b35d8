//! Automated Go test-case reduction.
//!
//! Given a package directory, a regex, and a verification command, the
//! reducer walks the package's syntax tree applying shrinking rewrites and
//! keeps each one only if the verifier still reproduces the failure. The
//! result is a local minimum under the rule set, written back over the
//! focused source file.
//!
//! ```no_run
//! # use goshrink_reduce::{reduce, Options};
//! let opts = Options {
//!     dir: "testdata/crasher".into(),
//!     match_re: "index out of range".to_string(),
//!     run: None,
//!     call: Some("Crasher".to_string()),
//!     verbose: false,
//! };
//! reduce(&opts, &mut std::io::stderr())?;
//! # Ok::<(), goshrink_reduce::Error>(())
//! ```

mod engine;
mod error;
mod oracle;
mod rules;
mod usage;
mod walk;

pub use error::{Error, Result};
pub use oracle::{ShellVerifier, Verdict, Verifier, VerifierOutput};

use goshrink_ast::{print_file, Ast, Node, NodeId, ParentMap, SourceMap};
use goshrink_resolve::Resolution;
use oracle::Oracle;
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walk::Slot;

/// Scratch file wrapping the entry function in a main.
const MAIN_FILE: &str = "goshrink_main.go";

/// Reduction options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory holding exactly one package.
    pub dir: PathBuf,
    /// Regex matched against the verifier's combined output.
    pub match_re: String,
    /// Verification command; derived from the target kind when absent.
    pub run: Option<String>,
    /// Entry function to wrap in a generated `main`.
    pub call: Option<String>,
    /// Log each accepted rewrite.
    pub verbose: bool,
}

/// Reduce the package in `opts.dir`, spawning the verification command
/// through the shell.
pub fn reduce(opts: &Options, log_out: &mut dyn Write) -> Result<()> {
    let match_re = Regex::new(&opts.match_re)?;
    let prep = Prep::load(opts)?;
    let command = opts
        .run
        .clone()
        .unwrap_or_else(|| prep.default_command().to_string());
    debug!(%command, "verification command");
    run_reduction(opts, prep, match_re, Box::new(ShellVerifier::new(command)), log_out)
}

/// Reduce with an injected verifier. The seam the tests drive.
pub fn reduce_with_verifier(
    opts: &Options,
    verifier: Box<dyn Verifier>,
    log_out: &mut dyn Write,
) -> Result<()> {
    let match_re = Regex::new(&opts.match_re)?;
    let prep = Prep::load(opts)?;
    run_reduction(opts, prep, match_re, verifier, log_out)
}

/// Parsed package plus focus decisions, before any scratch I/O.
struct Prep {
    ast: Ast,
    sources: SourceMap,
    /// (original path, file root), lexically ordered.
    files: Vec<(PathBuf, NodeId)>,
    focused: usize,
    package_name: String,
    /// `func main` deleted from the focused file in wrap mode.
    saved_main: Option<NodeId>,
    /// True when an entry wrapper is generated.
    wrapped: bool,
}

impl Prep {
    fn load(opts: &Options) -> Result<Prep> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&opts.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "go"))
            .collect();
        paths.sort();
        if paths.is_empty() {
            return Err(Error::PackageCount(0));
        }

        let mut ast = Ast::new();
        let mut sources = SourceMap::new();
        let mut files = Vec::new();
        for path in paths {
            let source = fs::read_to_string(&path)?;
            let file_id = sources.add_file(path.clone(), source);
            let source = &sources.file(file_id).source;
            let root = goshrink_parser::parse_file(source, file_id, &mut ast)
                .map_err(|err| Error::Parse {
                    path: path.clone(),
                    err,
                })?;
            files.push((path, root));
        }

        let mut names: Vec<&str> = files
            .iter()
            .filter_map(|(_, root)| match ast.node(*root) {
                Node::File { package, .. } => ast.ident_name(*package),
                _ => None,
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != 1 {
            return Err(Error::PackageCount(names.len()));
        }
        let package_name = names[0].to_string();

        let mut saved_main = None;
        let focused;
        let wrapped = opts.call.is_some();
        if let Some(call) = &opts.call {
            focused = files
                .iter()
                .position(|(_, root)| find_func(&ast, *root, call).is_some())
                .ok_or_else(|| Error::FuncNotFound(call.clone()))?;
            // The generated wrapper supplies main; existing ones would
            // collide. The focused file's main comes back in the output.
            for (i, (_, root)) in files.iter().enumerate() {
                if let Some(main_decl) = remove_func(&mut ast, *root, "main") {
                    if i == focused {
                        saved_main = Some(main_decl);
                    }
                }
                rename_package(&mut ast, *root, "main");
            }
        } else {
            focused = files
                .iter()
                .position(|(_, root)| find_func(&ast, *root, "main").is_some())
                .unwrap_or(0);
        }

        Ok(Prep {
            ast,
            sources,
            files,
            focused,
            package_name,
            saved_main,
            wrapped,
        })
    }

    /// Build-and-run for executables, build-only for libraries.
    fn default_command(&self) -> &'static str {
        if self.wrapped || self.package_name == "main" {
            "go build -ldflags \"-w -s\" -o out && ./out"
        } else {
            "go build -ldflags \"-w -s\""
        }
    }
}

/// The reduction state for one run.
pub(crate) struct Reducer<'a> {
    pub(crate) ast: Ast,
    pub(crate) sources: SourceMap,
    pub(crate) file: NodeId,
    pub(crate) res: Resolution,
    pub(crate) parents: ParentMap,
    pub(crate) oracle: Oracle,
    pub(crate) did_change: bool,
    pub(crate) fatal: Option<Error>,
    pub(crate) runs_at_accept: usize,
    pub(crate) verbose: bool,
    pub(crate) log_out: &'a mut dyn Write,
}

fn run_reduction(
    opts: &Options,
    prep: Prep,
    match_re: Regex,
    verifier: Box<dyn Verifier>,
    log_out: &mut dyn Write,
) -> Result<()> {
    let Prep {
        ast,
        sources,
        files,
        focused,
        package_name,
        saved_main,
        wrapped,
    } = prep;

    let scratch = tempfile::Builder::new().prefix("goshrink").tempdir()?;
    fs::write(scratch.path().join("go.mod"), "module goshrink\n\ngo 1.21\n")?;

    let (focused_path, file) = files[focused].clone();
    let focused_name = base_name(&focused_path);
    let mut dst = None;
    for (path, root) in &files {
        let scratch_path = scratch.path().join(base_name(path));
        if *root == file {
            dst = Some(fs::File::create(&scratch_path)?);
        } else {
            fs::write(&scratch_path, print_file(&ast, *root))?;
        }
    }
    let dst = dst.expect("focused file is one of the package files");
    debug!(file = %focused_name, dir = %scratch.path().display(), "scratch ready");

    if wrapped {
        let call = opts.call.as_deref().unwrap_or_default();
        fs::write(
            scratch.path().join(MAIN_FILE),
            format!("package main\n\nfunc main() {{\n\t{}()\n}}\n", call),
        )?;
    }

    let roots: Vec<NodeId> = files.iter().map(|(_, root)| *root).collect();
    let mut r = Reducer {
        ast,
        sources,
        file,
        res: Resolution::default(),
        parents: ParentMap::default(),
        oracle: Oracle::new(verifier, match_re, scratch.path().to_path_buf(), dst),
        did_change: false,
        fatal: None,
        runs_at_accept: 0,
        verbose: opts.verbose,
        log_out,
    };

    // The unmodified program must reproduce the failure.
    let initial = print_file(&r.ast, r.file);
    r.oracle.check_initial(&initial)?;
    r.runs_at_accept = r.oracle.runs;

    let mut any_changes = false;
    let mut pass = 0usize;
    loop {
        pass += 1;
        r.res = Resolution::resolve(&r.ast, &roots);
        r.parents = ParentMap::build(&r.ast, &roots);
        r.did_change = false;
        let _ = r.walk(r.file, Slot::None);
        if let Some(err) = r.fatal.take() {
            return Err(err);
        }
        debug!(pass, changed = r.did_change, runs = r.oracle.runs, "pass done");
        if !r.did_change {
            break;
        }
        any_changes = true;
    }
    if !any_changes {
        return Err(Error::NoReduction);
    }

    // Write the reduced program back over the focused input file.
    if wrapped {
        rename_package(&mut r.ast, r.file, &package_name);
    }
    if let Some(main_decl) = saved_main {
        if let Node::File { decls, .. } = r.ast.node_mut(r.file) {
            decls.push(main_decl);
        }
    }
    fs::write(&focused_path, print_file(&r.ast, r.file))?;
    Ok(())
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "src.go".to_string())
}

/// Top-level function declaration named `name`, if the file has one.
fn find_func(ast: &Ast, file: NodeId, name: &str) -> Option<NodeId> {
    let decls = match ast.node(file) {
        Node::File { decls, .. } => decls,
        _ => return None,
    };
    decls.iter().copied().find(|&decl| {
        matches!(
            ast.node(decl),
            Node::FuncDecl { recv: None, name: n, .. } if ast.ident_name(*n) == Some(name)
        )
    })
}

/// Remove the function `name` from the file, returning its declaration.
fn remove_func(ast: &mut Ast, file: NodeId, name: &str) -> Option<NodeId> {
    let target = find_func(ast, file, name)?;
    if let Node::File { decls, .. } = ast.node_mut(file) {
        decls.retain(|d| *d != target);
    }
    Some(target)
}

fn rename_package(ast: &mut Ast, file: NodeId, to: &str) {
    let package = match ast.node(file) {
        Node::File { package, .. } => *package,
        _ => return,
    };
    if let Node::Ident { name } = ast.node_mut(package) {
        *name = to.into();
    }
}
