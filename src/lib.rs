//! Liso - single-process HTTP/1.1 static file server
//!
//! Many client connections share one readiness loop on one thread.

pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod http;
pub mod server;
