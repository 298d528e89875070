//! chatcmd REPL entry point.
//!
//! Launch the interactive interpreter:
//! ```bash
//! cargo run -p chatcmd-repl
//! ```

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    chatcmd_repl::run()
}
