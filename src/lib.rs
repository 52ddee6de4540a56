//! estree-eval - an evaluator for a small JavaScript subset
//!
//! Programs arrive as ESTree JSON (as produced by acorn) and are evaluated
//! over an explicit environment (name → address) and heap (address → value).

pub mod ast;
pub mod cli;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod heap;
pub mod parser;
pub mod printer;
pub mod stack;
pub mod value;

use std::sync::Once;

pub use environment::Environment;
pub use error::{Error, ParseError, Result, RuntimeError};
pub use evaluator::{evaluate, evaluate_program, Evaluation, RuntimeResult, Session};
pub use heap::{Address, Heap};
pub use parser::{parse_node, parse_str, Parser};
pub use value::Value;

/// Convenience function to parse and evaluate ESTree JSON
pub fn run(source: &str) -> Result<RuntimeResult> {
    let program = parse_str(source)?;
    Ok(evaluate_program(&program).result)
}

static TRACING_INIT: Once = Once::new();

/// Install the log subscriber.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=estree_eval=trace`.
/// Logs go to stderr so stdout only carries rendered output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

/// Version of the tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
