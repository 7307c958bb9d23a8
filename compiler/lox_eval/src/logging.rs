//! Tracing bootstrap for hosts embedding the evaluator.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=lox_eval=debug` or `RUST_LOG=lox_eval=trace`;
/// set `LOX_LOG_TREE=1` to render spans as an indented call tree.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let registry = tracing_subscriber::registry().with(filter);

        let installed = if std::env::var_os("LOX_LOG_TREE").is_some() {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_level(true))
                .try_init()
        };
        if let Err(err) = installed {
            // Another subscriber (e.g. the host's) is already global.
            eprintln!("lox_eval: tracing not installed: {err}");
        }
    });
}
