//! GET, HEAD and POST handlers plus the error responder.

use std::io;

use tokio::io::AsyncWrite;

use crate::http::dispatch::{Dispatcher, HandlerOutcome};
use crate::http::mime;
use crate::http::request::Request;
use crate::http::resource::StaticResource;
use crate::http::response::{
    HTTP_VERSION, Response, ResponseBuilder, SERVER_NAME, StatusCode, http_date, reason_for,
};
use crate::http::writer::ResponseWriter;

impl Dispatcher {
    /// Sends the header block for the target followed by the whole file.
    pub async fn get<W>(&mut self, conn: &mut W, request: &Request) -> io::Result<HandlerOutcome>
    where
        W: AsyncWrite + Unpin,
    {
        let Some(resource) = self.open_resource(conn, request).await? else {
            return Ok(HandlerOutcome::Fail);
        };

        let outcome = self.send_file(conn, resource).await?;
        if outcome == HandlerOutcome::Ok {
            tracing::debug!(uri = %request.target, "Served file");
        }
        Ok(outcome)
    }

    /// Reads an opened file and writes head and body together.
    ///
    /// Nothing is written before the read succeeds; a failed read is answered
    /// with 500 instead.
    pub(crate) async fn send_file<W>(
        &mut self,
        conn: &mut W,
        mut resource: StaticResource,
    ) -> io::Result<HandlerOutcome>
    where
        W: AsyncWrite + Unpin,
    {
        let body = match resource.read_contents().await {
            Ok(body) => body,
            Err(e) => {
                let context = format!("reading {}: {}", resource.path.display(), e);
                self.respond_error(conn, StatusCode::InternalServerError, HTTP_VERSION, &context)
                    .await?;
                return Ok(HandlerOutcome::Fail);
            }
        };

        let mut response = self.file_head(&resource);
        response.body = body;
        ResponseWriter::full(&response).write_to(conn).await?;
        Ok(HandlerOutcome::Ok)
    }

    /// Confirms the target exists and sends its header block. Never sends a body.
    pub async fn head<W>(&mut self, conn: &mut W, request: &Request) -> io::Result<HandlerOutcome>
    where
        W: AsyncWrite + Unpin,
    {
        let Some(resource) = self.open_resource(conn, request).await? else {
            return Ok(HandlerOutcome::Fail);
        };

        let response = self.file_head(&resource);
        ResponseWriter::head(&response).write_to(conn).await?;
        Ok(HandlerOutcome::Ok)
    }

    /// Acknowledges any POST without looking at its body.
    pub async fn post<W>(&mut self, conn: &mut W, request: &Request) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        tracing::debug!(uri = %request.target, body_len = request.body.len(), "POST acknowledged");

        let response = ResponseBuilder::new(StatusCode::Ok)
            .reason("No Content")
            .header("Server", SERVER_NAME)
            .header("Date", http_date(self.clock.now()))
            .header("Content-type", "text/html")
            .header("Content-length", "0")
            .build();

        ResponseWriter::head(&response).write_to(conn).await
    }

    /// Logs the error and writes a head-only reply for `code`.
    ///
    /// `Content-Length` carries the length of the reason phrase, which appears
    /// only on the status line.
    pub async fn respond_error<W>(
        &mut self,
        conn: &mut W,
        code: impl Into<u16>,
        version: &str,
        context: &str,
    ) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let code = code.into();
        let reason = reason_for(code);

        self.log.log(&format!("{} {}: {}", code, reason, context));

        let response = ResponseBuilder::with_code(code)
            .version(version)
            .header("Server", SERVER_NAME)
            .header("Date", http_date(self.clock.now()))
            .header("Content-Length", reason.len().to_string())
            .header("Content-Type", "text/html")
            .build();

        ResponseWriter::head(&response).write_to(conn).await
    }

    /// Resolves and opens the request target, answering 404 when that fails.
    async fn open_resource<W>(
        &mut self,
        conn: &mut W,
        request: &Request,
    ) -> io::Result<Option<StaticResource>>
    where
        W: AsyncWrite + Unpin,
    {
        let Some(path) = self.resolver.resolve(&request.target) else {
            let context = format!("target {} refused by path policy", request.target);
            self.respond_error(conn, StatusCode::NotFound, &request.version, &context)
                .await?;
            return Ok(None);
        };

        match StaticResource::open(path.clone()).await {
            Ok(resource) => Ok(Some(resource)),
            Err(e) => {
                let context = format!("cannot open {}: {}", path.display(), e);
                self.respond_error(conn, StatusCode::NotFound, &request.version, &context)
                    .await?;
                Ok(None)
            }
        }
    }

    /// Header block describing a file, without a body.
    pub fn file_head(&self, resource: &StaticResource) -> Response {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Server", SERVER_NAME)
            .header("Date", http_date(self.clock.now()))
            .header("Connection", "keep-alive")
            .header("Content-type", mime::content_type(&resource.path_str()))
            .header("Content-length", resource.size.to_string())
            .header("Last-modified", http_date(resource.modified))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;
    use crate::clock::FixedClock;
    use crate::diagnostics::LogSink;
    use crate::http::dispatch::Disposition;
    use crate::http::resource::{PathPolicy, Resolver};

    #[tokio::test]
    async fn unreadable_file_is_500_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, b"<p>long enough</p>").unwrap();

        let log = LogSink::open(dir.path().join("liso.log")).unwrap();
        let clock = FixedClock(UNIX_EPOCH + Duration::from_secs(1_729_668_480));
        let mut dispatcher =
            Dispatcher::new(Resolver::new(dir.path(), PathPolicy::Verbatim), log, Box::new(clock));

        let resource = StaticResource::open(path.clone()).await.unwrap();
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_len(2)
            .unwrap();

        let mut out = Vec::new();
        let outcome = dispatcher.send_file(&mut out, resource).await.unwrap();

        assert_eq!(outcome, HandlerOutcome::Fail);
        assert_eq!(Disposition::from(outcome), Disposition::Close);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "HTTP/1.1 500 Internal Server Error\r\nServer: Liso/1.0\r\n\
             Date: Wed, 23 Oct 2024 07:28:00 GMT\r\nContent-Length: 21\r\n\
             Content-Type: text/html\r\n\r\n"
        );

        let log = fs::read_to_string(dir.path().join("liso.log")).unwrap();
        assert_eq!(log.lines().count(), 1);
        assert!(log.contains("500 Internal Server Error: reading"));
    }

    #[tokio::test]
    async fn send_file_writes_head_and_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"abc").unwrap();

        let log = LogSink::open(dir.path().join("liso.log")).unwrap();
        let clock = FixedClock(UNIX_EPOCH);
        let mut dispatcher =
            Dispatcher::new(Resolver::new(dir.path(), PathPolicy::Verbatim), log, Box::new(clock));

        let resource = StaticResource::open(path).await.unwrap();
        let mut out = Vec::new();
        let outcome = dispatcher.send_file(&mut out, resource).await.unwrap();

        assert_eq!(outcome, HandlerOutcome::Ok);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Content-type: text/plain\r\nContent-length: 3\r\n"));
        assert!(text.ends_with("\r\n\r\nabc"));
    }
}
