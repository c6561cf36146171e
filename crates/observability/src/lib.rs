//! Process-wide tracing setup.

pub mod tracing;

pub use crate::tracing::{LogFormat, init_with};

/// Initialize JSON logging filtered by `RUST_LOG` (default `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
