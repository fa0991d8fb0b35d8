//! goshrink
//!
//! Reduce a Go program to a smaller one that still exhibits a failure.
//!
//! Usage: `goshrink --match 'index out of range' --call Crasher dir`

use clap::Parser;
use goshrink_reduce::{reduce, Error, Options};
use std::path::PathBuf;
use std::process;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "goshrink")]
#[command(about = "Reduce a Go program, keeping a failure reproducible")]
#[command(after_help = "\
The verification command defaults to building (and, for executables,
running) the package:

  go build -ldflags \"-w -s\" [-o out && ./out]

To catch a run-time error or crash:

  goshrink --match 'index out of range' --call Crasher .

To catch a build error with a custom command:

  goshrink --match 'internal compiler error' --run 'go build -gcflags -c=2' .
")]
struct Cli {
    /// Regexp matched against the verifier's combined output
    #[arg(long = "match", value_name = "regexp")]
    match_re: String,

    /// Shell command verifying that the failure still reproduces
    #[arg(long = "run", value_name = "cmd")]
    run: Option<String>,

    /// Top-level function to wrap in a generated main
    #[arg(long = "call", value_name = "name")]
    call: Option<String>,

    /// Log each applied rewrite to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Directory holding exactly one package
    dir: PathBuf,
}

/// Initialize logging with a default filter.
///
/// Use the `RUST_LOG` environment variable to override it.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,goshrink_reduce=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    let opts = Options {
        dir: cli.dir,
        match_re: cli.match_re,
        run: cli.run,
        call: cli.call,
        verbose: cli.verbose,
    };

    if let Err(err) = reduce(&opts, &mut std::io::stderr()) {
        error!("{}", err);
        let code = match err {
            Error::BadRegex(_) | Error::FuncNotFound(_) | Error::PackageCount(_) => 2,
            _ => 1,
        };
        process::exit(code);
    }
}
