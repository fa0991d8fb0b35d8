//! End-to-end reduction scenarios.
//!
//! Each scenario runs the full driver against a scripted verifier instead
//! of a Go toolchain. The verifier models `go build` honestly with this
//! repo's own front end — a candidate that fails to parse, keeps an unused
//! import, or keeps an unused local is rejected the way the compiler would
//! reject it — and then applies a per-scenario crash predicate to decide
//! the runtime outcome.

use goshrink_ast::{Ast, Node, ParentMap};
use goshrink_parser::parse_file;
use goshrink_reduce::{reduce_with_verifier, Error, Options, Verifier, VerifierOutput};
use goshrink_resolve::{Resolution, SymbolKind};
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;

/// Scripted stand-in for the build-and-run verification command.
struct SimVerifier {
    file: String,
    expect_wrapper: bool,
    crash: Box<dyn Fn(&str) -> Option<String>>,
}

impl Verifier for SimVerifier {
    fn run(&mut self, dir: &Path) -> io::Result<VerifierOutput> {
        if self.expect_wrapper {
            assert!(
                dir.join("goshrink_main.go").exists(),
                "entry wrapper missing from scratch dir"
            );
        }
        let src = fs::read_to_string(dir.join(&self.file))?;
        if self.expect_wrapper {
            assert!(
                src.starts_with("package main\n"),
                "scratch copy not renamed to package main:\n{}",
                src
            );
        }
        if let Some(err) = compile_error(&src) {
            return Ok(fail(err));
        }
        match (self.crash)(&src) {
            Some(output) => Ok(fail(output)),
            None => Ok(VerifierOutput {
                success: true,
                output: Vec::new(),
            }),
        }
    }
}

fn fail(output: String) -> VerifierOutput {
    VerifierOutput {
        success: false,
        output: output.into_bytes(),
    }
}

/// What `go build` would reject: parse errors, unused imports, unused
/// locals (parameters and range variables exempt).
fn compile_error(src: &str) -> Option<String> {
    let mut ast = Ast::new();
    let file = match parse_file(src, 0, &mut ast) {
        Ok(file) => file,
        Err(err) => return Some(format!("syntax error: {}", err)),
    };
    let res = Resolution::resolve(&ast, &[file]);
    let parents = ParentMap::build(&ast, &[file]);
    for (sym, symbol) in res.symbols() {
        match symbol.kind {
            SymbolKind::Package if res.is_unused(sym) => {
                return Some(format!("imported and not used: \"{}\"", symbol.name));
            }
            SymbolKind::Var if !symbol.package_level && res.is_unused(sym) => {
                let exempt = matches!(
                    parents.get(symbol.decl).map(|p| ast.node(p)),
                    Some(Node::Field { .. }) | Some(Node::RangeStmt { .. })
                );
                if !exempt {
                    return Some(format!("declared and not used: {}", symbol.name));
                }
            }
            _ => {}
        }
    }
    None
}

struct Reduction {
    output: String,
    log: String,
    result: Result<(), Error>,
}

fn run_case(
    input: &str,
    match_re: &str,
    call: Option<&str>,
    crash: impl Fn(&str) -> Option<String> + 'static,
) -> Reduction {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("src.go");
    fs::write(&path, input).expect("write input");
    let opts = Options {
        dir: dir.path().to_path_buf(),
        match_re: match_re.to_string(),
        run: None,
        call: call.map(str::to_string),
        verbose: true,
    };
    let verifier = SimVerifier {
        file: "src.go".to_string(),
        expect_wrapper: call.is_some(),
        crash: Box::new(crash),
    };
    let mut log = Vec::new();
    let result = reduce_with_verifier(&opts, Box::new(verifier), &mut log);
    Reduction {
        output: fs::read_to_string(&path).expect("read result"),
        log: String::from_utf8(log).expect("utf8 log"),
        result,
    }
}

#[test]
fn test_dead_import_removal() {
    let input = "package p\n\nimport \"sync\"\n\nfunc Crasher() {\n\tvar a []int\n\t_ = sync.Once{}\n\tprintln(a[0])\n}\n";
    let r = run_case(input, "index out of range", Some("Crasher"), |src| {
        if src.contains("println(a[0])") && src.contains("var a []int") {
            Some("panic: runtime error: index out of range [0] with length 0".to_string())
        } else {
            None
        }
    });
    r.result.expect("reduction should succeed");
    assert_eq!(
        r.output,
        "package p\n\nfunc Crasher() {\n\tvar a []int\n\tprintln(a[0])\n}\n"
    );
    // The statement and the import fell in a single accepted edit.
    assert!(
        r.log.ends_with("src.go:7: remove statement (1 tries)\n"),
        "log was:\n{}",
        r.log
    );
}

#[test]
fn test_if_bypass() {
    let input = "package p\n\nfunc Crasher() {\n\tif true {\n\t\tprintln(\"a\"[5])\n\t} else {\n\t\tprintln(\"b\")\n\t}\n}\n";
    let r = run_case(input, "index out of range", None, string_index_crash);
    r.result.expect("reduction should succeed");
    // The if and its else are gone, the block was inlined, and the literals
    // kept shrinking while the index stayed out of bounds.
    assert!(
        r.output.contains("\tprintln(\"\"[0])\n"),
        "got:\n{}",
        r.output
    );
    assert!(!r.output.contains("if"), "got:\n{}", r.output);
    assert!(r.log.contains("remove if statement"), "log:\n{}", r.log);
    assert!(r.log.contains("inline block"), "log:\n{}", r.log);
}

/// Constant-string indexing: out of bounds iff the index reaches past the
/// literal's length.
fn string_index_crash(src: &str) -> Option<String> {
    let re = Regex::new(r#""([^"]*)"\[(\d+)\]"#).expect("regex");
    for cap in re.captures_iter(src) {
        let len = cap[1].len();
        let idx: usize = cap[2].parse().expect("index");
        if idx >= len {
            return Some(format!("panic: runtime error: index out of range [{}]", idx));
        }
    }
    None
}

#[test]
fn test_literal_keeps_matching_message() {
    // The match is inside the panic message: shrinking the literal would
    // lose the match, so nothing reduces at all.
    let input = "package p\n\nfunc Crasher() {\n\tpanic(\"a very long message\")\n}\n";
    let r = run_case(input, "very long", None, panic_crash);
    assert!(matches!(r.result, Err(Error::NoReduction)));
    assert_eq!(r.output, input, "input must stay untouched");
}

#[test]
fn test_literal_shrinks_when_match_is_header() {
    let input = "package p\n\nfunc Crasher() {\n\tpanic(\"boom 1234\")\n}\n";
    let r = run_case(input, "panic:", None, panic_crash);
    r.result.expect("reduction should succeed");
    assert!(r.output.contains("panic(\"\")"), "got:\n{}", r.output);
}

fn panic_crash(src: &str) -> Option<String> {
    let re = Regex::new(r#"panic\("([^"]*)"\)"#).expect("regex");
    re.captures(src)
        .map(|cap| format!("panic: {}", &cap[1]))
}

#[test]
fn test_slice_minimization() {
    let input = "package p\n\nfunc Crasher() {\n\ts := []int{1, 2, 3}\n\tprintln(s[0:2:3][10])\n}\n";
    let r = run_case(input, "index out of range", None, slice_crash);
    r.result.expect("reduction should succeed");
    assert!(r.output.contains("s := []int{}"), "got:\n{}", r.output);
    assert!(r.output.contains("println(s[0])"), "got:\n{}", r.output);
    assert!(r.log.contains("remove slice max"), "log:\n{}", r.log);
}

/// Model the runtime semantics of slicing and indexing `s`.
fn slice_crash(src: &str) -> Option<String> {
    let elems = src.split("[]int{").nth(1)?.split('}').next()?;
    let n = if elems.trim().is_empty() {
        0
    } else {
        elems.split(',').count()
    };
    let arg = Regex::new(r"println\(([^)]*)\)")
        .expect("regex")
        .captures(src)?
        .get(1)?
        .as_str()
        .to_string();
    let form = Regex::new(r"^s(?:\[(\d*):(\d*)(?::(\d*))?\])?(?:\[(\d+)\])?$").expect("regex");
    let cap = form.captures(&arg)?;
    let mut len = n;
    if cap.get(1).is_some() {
        let low: usize = cap[1].parse().unwrap_or(0);
        let high: usize = cap
            .get(2)
            .filter(|m| !m.as_str().is_empty())
            .map(|m| m.as_str().parse().expect("high"))
            .unwrap_or(n);
        let max: usize = cap
            .get(3)
            .filter(|m| !m.as_str().is_empty())
            .map(|m| m.as_str().parse().expect("max"))
            .unwrap_or(n);
        if low > high || high > n || max > n {
            return Some("panic: runtime error: slice bounds out of range".to_string());
        }
        len = high - low;
    }
    let index = cap.get(4)?;
    let idx: usize = index.as_str().parse().expect("index");
    if idx >= len {
        Some(format!(
            "panic: runtime error: index out of range [{}] with length {}",
            idx, len
        ))
    } else {
        None
    }
}

#[test]
fn test_dead_statements_drop_one_at_a_time() {
    let input = "package p\n\nfunc Crasher() {\n\tprintln(\"one\")\n\tprintln(\"two\")\n\tprintln(\"three\")\n\tprintln(\"four\")\n\tpanic(\"boom\")\n}\n";
    let r = run_case(input, "boom", None, panic_crash);
    r.result.expect("reduction should succeed");
    assert_eq!(
        r.output,
        "package p\n\nfunc Crasher() {\n\tpanic(\"boom\")\n}\n"
    );
    let drops = r.log.matches("remove statement").count();
    assert_eq!(drops, 4, "log:\n{}", r.log);
}

#[test]
fn test_unused_var_rewritten_to_underscore() {
    // The crash needs the literal 1 to stay, so the definition cannot be
    // dropped outright; removing its only use forces the bookkeeping
    // rewrite `x := 1` -> `_ = 1`.
    let input =
        "package p\n\nfunc Crasher() {\n\tx := 1\n\tprintln(x)\n\tpanic(\"boom\")\n}\n";
    let r = run_case(input, "boom", None, |src| {
        if src.contains("panic(\"boom\")") && src.contains('1') {
            Some("panic: boom".to_string())
        } else {
            None
        }
    });
    r.result.expect("reduction should succeed");
    assert!(r.output.contains("_ = 1"), "got:\n{}", r.output);
    assert!(!r.output.contains("x := 1"), "got:\n{}", r.output);
}

#[test]
fn test_irreducible_program_errors_and_preserves_input() {
    let input = "package p\n\nfunc Crasher() {\n\tpanic(\"msg\")\n}\n";
    let expected = input.to_string();
    let r = run_case(input, "msg", None, panic_crash);
    assert!(matches!(r.result, Err(Error::NoReduction)));
    assert_eq!(r.output, expected);
    assert!(r.log.is_empty(), "no accepted edits, log:\n{}", r.log);
}

#[test]
fn test_initial_non_match_refuses_to_reduce() {
    let input = "package p\n\nfunc Crasher() {\n\tpanic(\"other\")\n}\n";
    let r = run_case(input, "does not appear", None, panic_crash);
    match r.result {
        Err(Error::NoMatch(output)) => assert!(output.contains("panic: other")),
        other => panic!("expected NoMatch, got {:?}", other.map(|_| ())),
    }
    assert_eq!(r.output, input);
}

#[test]
fn test_initial_success_refuses_to_reduce() {
    let input = "package p\n\nfunc Quiet() {\n\tprintln(\"fine\")\n}\n";
    let r = run_case(input, "anything", None, |_| None);
    assert!(matches!(r.result, Err(Error::NoError)));
    assert_eq!(r.output, input);
}

#[test]
fn test_missing_entry_function() {
    let input = "package p\n\nfunc Crasher() {\n\tpanic(\"x\")\n}\n";
    let r = run_case(input, "x", Some("DoesNotExist"), panic_crash);
    match r.result {
        Err(Error::FuncNotFound(name)) => assert_eq!(name, "DoesNotExist"),
        other => panic!("expected FuncNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_bad_regex_reported_before_io() {
    let opts = Options {
        dir: "definitely/missing/dir".into(),
        match_re: "[".to_string(),
        run: None,
        call: None,
        verbose: false,
    };
    let mut log = Vec::new();
    let verifier = SimVerifier {
        file: "src.go".into(),
        expect_wrapper: false,
        crash: Box::new(|_| None),
    };
    match reduce_with_verifier(&opts, Box::new(verifier), &mut log) {
        Err(Error::BadRegex(_)) => {}
        other => panic!("expected BadRegex, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_dir_is_io_error() {
    let opts = Options {
        dir: "definitely/missing/dir".into(),
        match_re: ".".to_string(),
        run: None,
        call: None,
        verbose: false,
    };
    let mut log = Vec::new();
    let verifier = SimVerifier {
        file: "src.go".into(),
        expect_wrapper: false,
        crash: Box::new(|_| None),
    };
    assert!(matches!(
        reduce_with_verifier(&opts, Box::new(verifier), &mut log),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_duplicate_candidates_hit_verifier_once() {
    // Dropping either operand of `1 + 1` serializes to the same program;
    // the tried set must keep the verifier from seeing it twice.
    use std::cell::RefCell;
    use std::rc::Rc;

    let input = "package p\n\nfunc Crasher() {\n\tprintln(1 + 1)\n\tpanic(\"stay\")\n}\n";
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let recorder = Rc::clone(&seen);
    let r = run_case(input, "stay", None, move |src| {
        recorder.borrow_mut().push(src.to_string());
        if src.contains("println(1 + 1)") && src.contains("panic(\"stay\")") {
            Some("panic: stay".to_string())
        } else {
            None
        }
    });
    assert!(matches!(r.result, Err(Error::NoReduction)));
    let seen = seen.borrow();
    let mut unique: Vec<&String> = seen.iter().collect();
    unique.sort();
    unique.dedup();
    assert_eq!(
        unique.len(),
        seen.len(),
        "verifier saw a duplicate candidate:\n{:#?}",
        *seen
    );
}

#[test]
fn test_go_statement_unwrapped() {
    // `go f()` hides the panic; unwrapping it brings the crash back into
    // the calling goroutine and is the only edit the oracle accepts.
    let input = "package p\n\nfunc Crasher() {\n\tgo boom()\n\tboom()\n}\n\nfunc boom() {\n\tpanic(\"kaboom\")\n}\n";
    let r = run_case(input, "kaboom", None, |src| {
        // Two live call sites are required, so deleting the go statement is
        // rejected and only unwrapping it survives the oracle.
        let call_sites = src.matches("\tboom()").count() + src.matches("\tgo boom()").count();
        if call_sites >= 2 && src.contains("panic(\"kaboom\")") {
            Some("panic: kaboom".to_string())
        } else {
            None
        }
    });
    r.result.expect("reduction should succeed");
    assert!(!r.output.contains("go boom()"), "got:\n{}", r.output);
    assert!(r.log.contains("remove go"), "log:\n{}", r.log);
}

#[test]
fn test_inline_nullary_call() {
    let input = "package p\n\nfunc Crasher() {\n\thelper()\n}\n\nfunc helper() {\n\tpanic(\"inner\")\n}\n";
    let r = run_case(input, "inner", None, |src| {
        if src.contains("panic(\"inner\")") {
            Some("panic: inner".to_string())
        } else {
            None
        }
    });
    r.result.expect("reduction should succeed");
    // The call site now holds the body; the walk's later passes splice the
    // block into the surrounding list.
    assert!(
        r.output.contains("func Crasher() {\n\tpanic(\"inner\")\n}"),
        "got:\n{}",
        r.output
    );
    assert!(r.log.contains("inline call"), "log:\n{}", r.log);
}

#[test]
fn test_shadow_rename_on_block_inline() {
    // Inlining the block would collide the inner x with the outer one; the
    // engine renames the inner definition and its uses atomically.
    let input = "package p\n\nfunc Crasher() {\n\tx := 1\n\t{\n\t\tx := 2\n\t\tprintln(x)\n\t}\n\tprintln(x)\n\tpanic(\"boom\")\n}\n";
    let r = run_case(input, "boom", None, |src| {
        // Keep every statement alive so only the inline can win.
        if src.contains("panic(\"boom\")")
            && src.contains(":= 1")
            && src.contains(":= 2")
            && src.matches("println").count() == 2
        {
            Some("panic: boom".to_string())
        } else {
            None
        }
    });
    r.result.expect("reduction should succeed");
    assert!(r.output.contains("x_ := 2"), "got:\n{}", r.output);
    assert!(r.output.contains("println(x_)"), "got:\n{}", r.output);
    assert!(!r.output.contains("{\n\t\t"), "block should be gone:\n{}", r.output);
}
