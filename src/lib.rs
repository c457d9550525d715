//! appreq: require-statement bookkeeping for JavaScript projects.
//!
//! Finds local files and declared dependencies, derives the identifier a
//! module is bound to, and keeps the import block at the top of a file
//! sorted and grouped (core modules first).

// Core infrastructure - re-exported from appreq-core
pub use appreq_core::catalog;
pub use appreq_core::classify;
pub use appreq_core::commands;
pub use appreq_core::config;
pub use appreq_core::document;
pub use appreq_core::error;
pub use appreq_core::exports;
pub use appreq_core::header;
pub use appreq_core::interaction;
pub use appreq_core::merge;
pub use appreq_core::naming;
pub use appreq_core::output;
pub use appreq_core::patch;
pub use appreq_core::text;
pub use appreq_core::types;

// Front door
pub mod cli;
pub mod terminal;
