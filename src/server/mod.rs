//! Socket setup and the connection multiplexing loop.

pub mod event_loop;
pub mod listener;
pub mod registry;

pub use event_loop::Server;
pub use registry::Registry;
