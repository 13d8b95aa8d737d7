//! Juwoo points library
//!
//! Exposes the ledger, rewards, learning and backup services behind the
//! HTTP server so they can be driven directly from tests.

pub mod app;
pub mod catalog;
pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod routes;
pub mod services;
