//! Core infrastructure for appreq.
//!
//! This crate provides the editor-agnostic pieces of require bookkeeping:
//! - Identifier naming for modules and files
//! - Import-line classification over plain text
//! - Import block location, merging and sorting
//! - Export-line and copyright-header insertion
//! - Project catalog of local files and declared dependencies
//! - Settings resolution and compiled naming rules
//! - Host abstractions for documents and choice lists
//! - Error types and JSON output types for CLI responses

pub mod catalog;
pub mod classify;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod exports;
pub mod header;
pub mod interaction;
pub mod merge;
pub mod naming;
pub mod output;
pub mod patch;
pub mod text;
pub mod types;
