//! Front-end and tree-walking evaluator for a small arithmetic scripting
//! language with `let`/`const` bindings.
//!
//! ```
//! use tally::{evaluate, RuntimeVal};
//!
//! assert_eq!(evaluate("let x = 2; x = x + 3; x;"), Ok(RuntimeVal::Number(5.0)));
//! ```

pub mod error;
pub mod frontend;
pub mod interpreter;

pub use error::{Error, ErrorCategory};
pub use frontend::{parse, tokenize};
pub use interpreter::{Interpreter, RuntimeVal};

/// Evaluates `source` against a fresh root environment.
pub fn evaluate(source: &str) -> Result<RuntimeVal, Error> {
    Interpreter::new().run(source)
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, e.g. `RUST_LOG=tally=debug`.
/// Per-statement events also need the `trace-execution` feature.
///
/// Does nothing when `RUST_LOG` is unset or a global subscriber already exists.
pub fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
