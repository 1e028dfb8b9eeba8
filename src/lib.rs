//! Swap'em (workspace facade crate).
//!
//! Re-exports the member crates under stable names (`swapem::{core, store,
//! input, term, adapter, types}`) and hosts the terminal front-end pieces the
//! binary is built from.

pub use swapem_adapter as adapter;
pub use swapem_core as core;
pub use swapem_input as input;
pub use swapem_store as store;
pub use swapem_term as term;
pub use swapem_types as types;

pub mod app;
pub mod config;
pub mod logging;

pub use app::{App, Control, Screen};
pub use config::AppConfig;
