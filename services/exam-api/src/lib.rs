//! examplan exam administration library.
//!
//! This crate primarily ships the `exam-api` binary, but we expose a small
//! library surface to enable integration testing and reuse.

pub mod api;
pub mod config;
pub mod db;
pub mod state;
