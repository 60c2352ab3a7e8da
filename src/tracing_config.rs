//! Tracing configuration for debugging translation decisions.
//!
//! Supports three output formats controlled by `TSDART_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Human-readable tree of rule lookups and canonicalizations
//! TSDART_LOG=debug TSDART_LOG_FORMAT=tree <driver> file.ts
//!
//! # Fine-grained filtering
//! TSDART_LOG="tsdart::substitution=trace" <driver> file.ts
//! ```
//!
//! The subscriber is only initialised when `TSDART_LOG` (or `RUST_LOG`) is
//! set, so there is zero overhead in normal builds.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse from the `TSDART_LOG_FORMAT` environment variable.
    fn from_env() -> Self {
        match std::env::var("TSDART_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Build an `EnvFilter` from `TSDART_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TSDART_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `TSDART_LOG` nor `RUST_LOG` is set. All
/// output goes to stderr so it never interferes with emitted target code
/// on stdout.
pub fn init_tracing() {
    let has_tsdart_log = std::env::var("TSDART_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_tsdart_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    let format = LogFormat::from_env();

    match format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
