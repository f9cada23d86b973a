//! # tabula
//!
//! Application layer of Tabula: the HTTP API and the CLI commands built on
//! `tabula-core`. Exposed as a library so integration tests can drive the
//! router and the loaders directly.

pub mod api;
pub mod cli;
