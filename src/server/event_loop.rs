//! The readiness loop.
//!
//! One task owns the listener, the registry and the dispatcher. It suspends
//! only while waiting for readiness; every read and response inside an
//! iteration runs to completion before the next descriptor is looked at.

use std::future::poll_fn;
use std::io;
use std::net::SocketAddr;
use std::os::fd::{AsRawFd, RawFd};
use std::task::Poll;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::SetupError;
use crate::http::connection::{Connection, ReadOutcome};
use crate::http::dispatch::{Dispatcher, Disposition};
use crate::http::parser::parse_request;
use crate::server::listener;
use crate::server::registry::Registry;

/// A descriptor reported ready by one readiness wait.
#[derive(Debug)]
enum Readiness {
    /// The listener produced a connection (or an accept error)
    Incoming(io::Result<(TcpStream, SocketAddr)>),
    Readable(RawFd),
}

pub struct Server {
    listener: TcpListener,
    registry: Registry,
    dispatcher: Dispatcher,
}

impl Server {
    /// Binds the listening socket and opens the log sink.
    pub async fn bind(cfg: &ServerConfig) -> Result<Self, SetupError> {
        let dispatcher = Dispatcher::from_config(cfg).map_err(|source| SetupError::LogSink {
            path: cfg.log_path.clone(),
            source,
        })?;
        let listener = listener::bind(cfg).await?;
        Ok(Self::with_parts(listener, dispatcher))
    }

    fn with_parts(listener: TcpListener, dispatcher: Dispatcher) -> Self {
        let registry = Registry::new(listener.as_raw_fd());
        Self {
            listener,
            registry,
            dispatcher,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves forever. Per-connection failures never end the loop.
    pub async fn run(mut self) {
        loop {
            for event in self.wait_ready().await {
                match event {
                    Readiness::Incoming(Ok((stream, peer))) => self.admit(stream, peer),
                    Readiness::Incoming(Err(e)) => {
                        warn!(error = %e, "Accept failed");
                        self.dispatcher.log(&format!("accept failed: {}", e));
                    }
                    Readiness::Readable(fd) => self.service(fd).await,
                }
            }
        }
    }

    /// Blocks until the listener or at least one registered connection is
    /// ready, and returns every ready descriptor.
    async fn wait_ready(&self) -> Vec<Readiness> {
        poll_fn(|cx| {
            let mut ready = Vec::new();

            if let Poll::Ready(res) = self.listener.poll_accept(cx) {
                ready.push(Readiness::Incoming(res));
            }

            for (fd, conn) in self.registry.iter() {
                // An error surfaces on the following read.
                if conn.poll_read_ready(cx).is_ready() {
                    ready.push(Readiness::Readable(fd));
                }
            }

            if ready.is_empty() {
                Poll::Pending
            } else {
                Poll::Ready(ready)
            }
        })
        .await
    }

    fn admit(&mut self, stream: TcpStream, peer: SocketAddr) {
        let fd = self.registry.register(Connection::new(stream, peer));
        info!(%peer, fd, "Accepted connection");
        debug!(
            live = self.registry.len(),
            max_fd = self.registry.max_fd(),
            "Registry updated"
        );
        self.dispatcher.log(&format!("new connection from {} on socket {}", peer, fd));
    }

    async fn service(&mut self, fd: RawFd) {
        let Some(conn) = self.registry.get_mut(fd) else {
            // Retired earlier in this batch.
            return;
        };

        let buf = match conn.read_once() {
            ReadOutcome::Data(buf) => buf,
            ReadOutcome::WouldBlock => return,
            ReadOutcome::Closed => {
                self.retire(fd, "hung up");
                return;
            }
            ReadOutcome::Failed(e) => {
                self.retire(fd, &format!("recv error: {}", e));
                return;
            }
        };

        debug!(fd, bytes = buf.len(), "Data received");

        let disposition = match parse_request(&buf) {
            Ok(request) => self.dispatcher.dispatch(conn.stream_mut(), &request).await,
            Err(e) => self.dispatcher.reject_unparsable(conn.stream_mut(), &e).await,
        };

        if disposition == Disposition::Close {
            self.retire(fd, "closed after response");
        }
    }

    /// Deregisters and closes a connection.
    fn retire(&mut self, fd: RawFd, why: &str) {
        if let Some(conn) = self.registry.deregister(fd) {
            info!(peer = %conn.peer(), fd, reason = why, "Connection closed");
            self.dispatcher.log(&format!("socket {} {}", fd, why));
            drop(conn);
        }
    }
}
