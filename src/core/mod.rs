//! Core modules: the location store, its persistence, and the pieces the
//! CLI wires around it.

pub mod config;
pub mod error;
pub mod host;
pub mod ident;
pub mod journal;
pub mod output;
pub mod pattern;
pub mod session;
pub mod shell;
pub mod snapshot;
pub mod store;
