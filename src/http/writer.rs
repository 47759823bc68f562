use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Pending output for one connection: a serialized head, optionally followed by a body.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    /// Head only. Used for HEAD responses and error replies.
    pub fn head(response: &Response) -> Self {
        Self::raw(response.head_bytes())
    }

    /// Head followed by the response body. Used for GET.
    pub fn full(response: &Response) -> Self {
        let mut buffer = response.head_bytes();
        buffer.extend_from_slice(&response.body);
        Self::raw(buffer)
    }

    fn raw(buffer: Vec<u8>) -> Self {
        Self { buffer, written: 0 }
    }

    pub async fn write_to<W>(&mut self, stream: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(std::io::ErrorKind::WriteZero.into());
            }

            self.written += n;
        }

        stream.flush().await
    }
}
