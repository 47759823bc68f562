//! HTTP protocol implementation.
//!
//! # Architecture
//!
//! - **`connection`**: an accepted socket and its single-shot read
//! - **`parser`**: tokenizes the bytes of one read into a [`request::Request`]
//! - **`request`**: parsed request and method classification
//! - **`dispatch`**: picks a handler and decides whether the connection stays open
//! - **`handlers`**: GET, HEAD, POST and the error responder
//! - **`resource`**: target-to-path resolution and opened files
//! - **`response`**: status codes and ordered header blocks
//! - **`writer`**: writes serialized responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Request lifecycle
//!
//! ```text
//!        ┌─────────────┐
//!        │  Readable   │ ← one read of up to 8192 bytes
//!        └──────┬──────┘
//!               │ parse
//!               ▼
//!        ┌──────────────────┐
//!        │    Dispatch      │ ← version check, then method
//!        └──────┬───────────┘
//!               │ response written
//!               ├─ Continue → wait for the next readiness event
//!               └─ Close    → deregister and drop the socket
//! ```

pub mod connection;
pub mod dispatch;
pub mod handlers;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resource;
pub mod response;
pub mod writer;
