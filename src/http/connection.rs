use std::io;
use std::net::SocketAddr;
use std::os::fd::{AsRawFd, RawFd};
use std::task::{Context, Poll};

use bytes::BytesMut;
use tokio::net::TcpStream;

/// Bytes taken from a socket per readiness event.
pub const READ_BUFFER_SIZE: usize = 8192;

/// One accepted client socket.
///
/// Dropping the connection closes the descriptor.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    fd: RawFd,
}

/// Result of a single non-blocking read.
#[derive(Debug)]
pub enum ReadOutcome {
    /// Bytes received; the buffer holds exactly these
    Data(BytesMut),
    /// Peer performed an orderly shutdown
    Closed,
    /// Readiness was spurious; nothing to read yet
    WouldBlock,
    Failed(io::Error),
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        let fd = stream.as_raw_fd();
        Self { stream, peer, fd }
    }

    pub fn fd(&self) -> RawFd {
        self.fd
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn stream_mut(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    pub fn poll_read_ready(&self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.stream.poll_read_ready(cx)
    }

    /// Reads at most [`READ_BUFFER_SIZE`] bytes once. Nothing is retained
    /// between calls: each read is handled as a complete request.
    pub fn read_once(&self) -> ReadOutcome {
        let mut buf = BytesMut::with_capacity(READ_BUFFER_SIZE);

        match self.stream.try_read_buf(&mut buf) {
            Ok(0) => ReadOutcome::Closed,
            Ok(_) => ReadOutcome::Data(buf),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => ReadOutcome::WouldBlock,
            Err(e) => ReadOutcome::Failed(e),
        }
    }
}
