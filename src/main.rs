// src/main.rs
//
// rendertext — print the rendered text of an HTML file
//
// - Walks from <body> (or the document when there is none) unless --root names
//   another element.
// - Text mode writes the stream as UTF-8; both newline polarities become '\n'.
// - --codes writes one integer per line instead, ending with -1.
// - Logging goes to stderr, and only when RUST_LOG is set.
//
// CLI flags:
//   --false-positive : negate boundary-detected newlines (-10)
//   --codes          : print the integer stream
//   --root <TAG>     : start element (default: body)
//   --offset <N>     : start offset inside the root node

use clap::{ArgAction, Parser};
use rendertext::{
    html, BugReportIter, DocumentTree, Error, NodeData, NodeId, StyleClassifier, Tree, Walker,
    END_OF_STREAM,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Once;
use tracing::{debug, error};

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Mark boundary-detected newlines as false positives (-10)
    #[arg(long = "false-positive", action = ArgAction::SetTrue)]
    false_positive: bool,

    /// Print the raw integer stream, one value per line
    #[arg(long, action = ArgAction::SetTrue)]
    codes: bool,

    /// Element to start from
    #[arg(long, value_name = "TAG")]
    root: Option<String>,

    /// Start offset (UTF-16 units) inside the root node
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Input file
    input: PathBuf,

    /// Output file (default: stdout)
    output: Option<PathBuf>,
}

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "rendertext failed");
            eprintln!("rendertext: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let tree = html::load(&cli.input)?;
    let root = pick_root(&tree, cli.root.as_deref())?;
    check_offset(&tree, root, cli.offset)?;
    debug!(?root, nodes = tree.len(), "walking");

    let mut iter = BugReportIter::with_offset(
        &tree,
        Walker::new(&tree, root),
        StyleClassifier::new(&tree),
        cli.offset,
    );

    let out = if cli.codes {
        let mut out = String::new();
        for code in iter.codes(cli.false_positive) {
            out.push_str(&code.to_string());
            out.push('\n');
        }
        out.push_str(&format!("{END_OF_STREAM}\n"));
        out
    } else {
        iter.collect_text(cli.false_positive)
    };

    match &cli.output {
        Some(path) => fs::write(path, out)?,
        None => io::stdout().lock().write_all(out.as_bytes())?,
    }
    Ok(())
}

/// Explicit roots must exist; the default `body` falls back to the document.
fn pick_root(tree: &Tree, requested: Option<&str>) -> Result<NodeId, Error> {
    match requested {
        Some(tag) => html::find_element(tree, tag),
        None => Ok(html::find_element(tree, "body").unwrap_or(NodeId::DOCUMENT)),
    }
}

/// Roots are elements or the document; only a `br` has a position past its
/// start (offset 1 skips its newline).
fn check_offset(tree: &Tree, root: NodeId, offset: usize) -> Result<(), Error> {
    let len = match tree.data(root) {
        NodeData::LineBreak => 1,
        _ => 0,
    };
    if offset > len {
        return Err(Error::OffsetOutOfRange { offset, len });
    }
    Ok(())
}
