//! # Observability & Tracing
//!
//! The builder logs through `tracing` with structured fields; this module only
//! installs a subscriber for binaries and tests that want to see them.
//!
//! ## What Gets Traced
//!
//! | Level   | Event                                                        |
//! |---------|--------------------------------------------------------------|
//! | `debug` | Every item built: `entity_type`, `id`, `depth`               |
//! | `debug` | Collections: item and include counts, sync flag              |
//! | `trace` | Links left unresolved (target not included, depth ceiling)   |
//! | `warn`  | Localized field blocks that are not `locale -> value` maps   |
//!
//! `Link::resolve` and `Resource::reload` open a span carrying the target's
//! identity, so fetcher logs nest under it.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo test -- --nocapture
//! RUST_LOG=content_graph=trace cargo test
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once: if a global subscriber is already set, the
/// call is a no-op.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type already says what is being built
        .compact()
        .try_init();
}
