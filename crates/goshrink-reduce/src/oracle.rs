//! Candidate oracle: decide whether a candidate program still reproduces
//! the failure.
//!
//! The oracle owns the scratch copy of the focused file and the tried set.
//! One candidate test is: print → tried-set check → rewrite the scratch
//! file → run the verifier → classify. The tried set is keyed on the
//! printed bytes and updated *before* the verifier is spawned, so a
//! duplicate serialization can never trigger a second run.
//!
//! The verifier itself is an external collaborator behind the [`Verifier`]
//! trait: give it a working directory, get back an exit status and the
//! combined output bytes. Production uses [`ShellVerifier`]; tests inject
//! scripted implementations.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Outcome of one candidate test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The failure still reproduces; keep the edit.
    Interesting,
    /// Verifier succeeded, or failed without matching the regex, or the
    /// candidate was already tried.
    NotInteresting,
}

/// Exit status and combined stdout+stderr of one verifier run.
#[derive(Debug, Clone)]
pub struct VerifierOutput {
    pub success: bool,
    pub output: Vec<u8>,
}

/// External verification command.
pub trait Verifier {
    /// Run the verification in `dir`, returning status and combined output.
    ///
    /// An `Err` means the verifier could not be invoked at all and aborts
    /// the whole reduction.
    fn run(&mut self, dir: &Path) -> io::Result<VerifierOutput>;
}

impl<F> Verifier for F
where
    F: FnMut(&Path) -> io::Result<VerifierOutput>,
{
    fn run(&mut self, dir: &Path) -> io::Result<VerifierOutput> {
        self(dir)
    }
}

/// Runs a shell command in the scratch directory.
pub struct ShellVerifier {
    command: String,
}

impl ShellVerifier {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Verifier for ShellVerifier {
    fn run(&mut self, dir: &Path) -> io::Result<VerifierOutput> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(dir)
            .output()?;
        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        Ok(VerifierOutput {
            success: output.status.success(),
            output: combined,
        })
    }
}

/// The candidate oracle.
pub struct Oracle {
    verifier: Box<dyn Verifier>,
    match_re: Regex,
    scratch_dir: PathBuf,
    /// Focused scratch file, held open for the whole run.
    dst: File,
    /// Printed candidates already tested.
    tried: HashSet<String>,
    /// Verifier invocations so far.
    pub runs: usize,
}

impl Oracle {
    pub fn new(
        verifier: Box<dyn Verifier>,
        match_re: Regex,
        scratch_dir: PathBuf,
        dst: File,
    ) -> Self {
        Self {
            verifier,
            match_re,
            scratch_dir,
            dst,
            tried: HashSet::new(),
            runs: 0,
        }
    }

    /// Test the unmodified program. Must come back interesting or the run
    /// stops before any rewriting starts.
    pub fn check_initial(&mut self, source: &str) -> Result<()> {
        self.tried.insert(source.to_string());
        self.write_focused(source)?;
        let out = self.run_verifier()?;
        if out.success {
            return Err(Error::NoError);
        }
        if !self.matches(&out.output) {
            return Err(Error::NoMatch(
                String::from_utf8_lossy(&out.output).into_owned(),
            ));
        }
        Ok(())
    }

    /// Test one candidate serialization of the focused file.
    pub fn test(&mut self, source: &str) -> Result<Verdict> {
        if self.tried.contains(source) {
            return Ok(Verdict::NotInteresting);
        }
        self.tried.insert(source.to_string());
        self.write_focused(source)?;
        let out = self.run_verifier()?;
        if !out.success && self.matches(&out.output) {
            Ok(Verdict::Interesting)
        } else {
            Ok(Verdict::NotInteresting)
        }
    }

    fn matches(&self, output: &[u8]) -> bool {
        self.match_re.is_match(&String::from_utf8_lossy(output))
    }

    fn run_verifier(&mut self) -> Result<VerifierOutput> {
        self.runs += 1;
        self.verifier
            .run(&self.scratch_dir)
            .map_err(Error::Verifier)
    }

    /// Truncate, seek, rewrite. The handle stays open across candidates.
    fn write_focused(&mut self, source: &str) -> Result<()> {
        self.dst.set_len(0)?;
        self.dst.seek(SeekFrom::Start(0))?;
        self.dst.write_all(source.as_bytes())?;
        self.dst.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn oracle_with(
        verifier: Box<dyn Verifier>,
        pattern: &str,
    ) -> (tempfile::TempDir, Oracle) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("x.go");
        let dst = File::create(&path).expect("create scratch file");
        let oracle = Oracle::new(
            verifier,
            Regex::new(pattern).expect("regex"),
            dir.path().to_path_buf(),
            dst,
        );
        (dir, oracle)
    }

    fn failing_with(output: &'static str) -> Box<dyn Verifier> {
        Box::new(move |_: &Path| {
            Ok(VerifierOutput {
                success: false,
                output: output.as_bytes().to_vec(),
            })
        })
    }

    #[test]
    fn test_interesting_on_match() {
        let (_dir, mut oracle) = oracle_with(failing_with("index out of range"), "out of range");
        assert_eq!(oracle.test("package p").unwrap(), Verdict::Interesting);
    }

    #[test]
    fn test_not_interesting_without_match() {
        let (_dir, mut oracle) = oracle_with(failing_with("something else"), "out of range");
        assert_eq!(oracle.test("package p").unwrap(), Verdict::NotInteresting);
    }

    #[test]
    fn test_not_interesting_on_success() {
        let verifier = Box::new(|_: &Path| {
            Ok(VerifierOutput {
                success: true,
                output: b"out of range".to_vec(),
            })
        });
        let (_dir, mut oracle) = oracle_with(verifier, "out of range");
        assert_eq!(oracle.test("package p").unwrap(), Verdict::NotInteresting);
    }

    #[test]
    fn test_tried_set_suppresses_rerun() {
        let count = Rc::new(Cell::new(0usize));
        let c = Rc::clone(&count);
        let verifier = Box::new(move |_: &Path| {
            c.set(c.get() + 1);
            Ok(VerifierOutput {
                success: false,
                output: b"boom".to_vec(),
            })
        });
        let (_dir, mut oracle) = oracle_with(verifier, "boom");
        assert_eq!(oracle.test("package p").unwrap(), Verdict::Interesting);
        // Same serialization again: suppressed without a run.
        assert_eq!(oracle.test("package p").unwrap(), Verdict::NotInteresting);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_initial_success_is_no_error() {
        let verifier = Box::new(|_: &Path| {
            Ok(VerifierOutput {
                success: true,
                output: Vec::new(),
            })
        });
        let (_dir, mut oracle) = oracle_with(verifier, "boom");
        assert!(matches!(
            oracle.check_initial("package p"),
            Err(Error::NoError)
        ));
    }

    #[test]
    fn test_initial_mismatch_reports_output() {
        let (_dir, mut oracle) = oracle_with(failing_with("other failure"), "boom");
        match oracle.check_initial("package p") {
            Err(Error::NoMatch(out)) => assert_eq!(out, "other failure"),
            other => panic!("expected NoMatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_launch_failure_is_fatal() {
        let verifier = Box::new(|_: &Path| -> io::Result<VerifierOutput> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no sh"))
        });
        let (_dir, mut oracle) = oracle_with(verifier, "boom");
        assert!(matches!(oracle.test("package p"), Err(Error::Verifier(_))));
    }

    #[test]
    fn test_scratch_file_rewritten() {
        let (_dir, mut oracle) = oracle_with(failing_with("boom"), "boom");
        oracle.test("first candidate").unwrap();
        oracle.test("2nd").unwrap();
        let path = oracle.scratch_dir.join("x.go");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "2nd");
    }
}
