//! The set of live client connections and the listening descriptor.

use std::collections::BTreeMap;
use std::os::fd::RawFd;

use crate::http::connection::Connection;

/// Tracks live connections by descriptor, in ascending descriptor order.
///
/// `max_fd` is always at least the listening descriptor and every live
/// connection's descriptor.
#[derive(Debug)]
pub struct Registry {
    listener_fd: RawFd,
    connections: BTreeMap<RawFd, Connection>,
    max_fd: RawFd,
}

impl Registry {
    pub fn new(listener_fd: RawFd) -> Self {
        Self {
            listener_fd,
            connections: BTreeMap::new(),
            max_fd: listener_fd,
        }
    }

    pub fn listener_fd(&self) -> RawFd {
        self.listener_fd
    }

    pub fn max_fd(&self) -> RawFd {
        self.max_fd
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn contains(&self, fd: RawFd) -> bool {
        self.connections.contains_key(&fd)
    }

    /// Adds a freshly accepted connection and returns its descriptor.
    pub fn register(&mut self, conn: Connection) -> RawFd {
        let fd = conn.fd();
        self.max_fd = self.max_fd.max(fd);
        self.connections.insert(fd, conn);
        fd
    }

    /// Removes a connection. The caller owns it and closes it by dropping it.
    pub fn deregister(&mut self, fd: RawFd) -> Option<Connection> {
        let conn = self.connections.remove(&fd)?;

        if fd == self.max_fd {
            self.max_fd = self
                .connections
                .keys()
                .next_back()
                .copied()
                .map_or(self.listener_fd, |top| top.max(self.listener_fd));
        }

        Some(conn)
    }

    pub fn get_mut(&mut self, fd: RawFd) -> Option<&mut Connection> {
        self.connections.get_mut(&fd)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RawFd, &Connection)> {
        self.connections.iter().map(|(fd, conn)| (*fd, conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::fd::AsRawFd;
    use tokio::net::{TcpListener, TcpStream};

    async fn pair(listener: &TcpListener) -> (Connection, TcpStream) {
        let client = TcpStream::connect(listener.local_addr().unwrap())
            .await
            .unwrap();
        let (server, peer) = listener.accept().await.unwrap();
        (Connection::new(server, peer), client)
    }

    #[tokio::test]
    async fn max_fd_tracks_live_descriptors() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut registry = Registry::new(listener.as_raw_fd());
        assert_eq!(registry.listener_fd(), listener.as_raw_fd());
        assert_eq!(registry.max_fd(), listener.as_raw_fd());

        let (a, _ca) = pair(&listener).await;
        let (b, _cb) = pair(&listener).await;
        let fd_a = registry.register(a);
        let fd_b = registry.register(b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.max_fd(), fd_a.max(fd_b));

        let top = fd_a.max(fd_b);
        let low = fd_a.min(fd_b);
        assert!(registry.deregister(top).is_some());
        assert_eq!(registry.max_fd(), low.max(listener.as_raw_fd()));

        assert!(registry.deregister(low).is_some());
        assert_eq!(registry.max_fd(), listener.as_raw_fd());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn deregister_releases_once() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut registry = Registry::new(listener.as_raw_fd());

        let (conn, _client) = pair(&listener).await;
        let fd = registry.register(conn);

        assert!(registry.contains(fd));
        assert!(registry.deregister(fd).is_some());
        assert!(registry.deregister(fd).is_none());
        assert!(!registry.contains(fd));
    }
}
