//! # adhub-service
//!
//! The command-handling layer: one handler function per command type.
//! A handler resolves its actors through the unit-of-work's repository,
//! invokes exactly one entity behavior, persists the result and commits.
//! Entity failures cross this layer untranslated.

pub mod handlers;

pub use handlers::dispatch;
