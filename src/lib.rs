//! sheet-intake - form intake backed by a shared tabular store
//!
//! Accepts file uploads, appends one row per submitted entry to both a
//! per-sheet table and a consolidated table under a process-wide lock, and
//! mails an optional confirmation copy to the submitter.
//!
//! The external systems (tables, blob storage, mail, session cache, lock) are
//! traits so that the coordination logic can run against local or in-memory
//! implementations.

pub mod blob;
pub mod cache;
pub mod config;
pub mod error;
pub mod intake;
pub mod lock;
pub mod mail;
mod persist;
pub mod service;
pub mod store;
pub mod types;
