//! Routes a parsed request to its handler and decides whether the connection
//! survives the exchange.

use std::io;

use tokio::io::AsyncWrite;

use crate::clock::{Clock, SystemClock};
use crate::config::ServerConfig;
use crate::diagnostics::LogSink;
use crate::http::parser::ParseError;
use crate::http::request::{Method, Request};
use crate::http::resource::Resolver;
use crate::http::response::{HTTP_VERSION, StatusCode};

/// What the event loop should do with a connection after a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Continue,
    Close,
}

/// Result of the GET and HEAD handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    Ok,
    Fail,
}

impl From<HandlerOutcome> for Disposition {
    fn from(outcome: HandlerOutcome) -> Self {
        match outcome {
            HandlerOutcome::Ok => Disposition::Continue,
            HandlerOutcome::Fail => Disposition::Close,
        }
    }
}

/// Owns everything a request needs: path resolution, the log sink and the clock.
pub struct Dispatcher {
    pub(crate) resolver: Resolver,
    pub(crate) log: LogSink,
    pub(crate) clock: Box<dyn Clock>,
}

impl Dispatcher {
    pub fn new(resolver: Resolver, log: LogSink, clock: Box<dyn Clock>) -> Self {
        Self {
            resolver,
            log,
            clock,
        }
    }

    /// Opens the configured log sink and uses the system clock.
    pub fn from_config(cfg: &ServerConfig) -> io::Result<Self> {
        let resolver = Resolver::new(&cfg.document_root, cfg.path_policy());
        let log = LogSink::open(&cfg.log_path)?;
        Ok(Self::new(resolver, log, Box::new(SystemClock)))
    }

    pub fn log(&mut self, message: &str) {
        self.log.log(message);
    }

    /// Serves one request on `conn`.
    ///
    /// A version other than HTTP/1.1 gets 505 and keeps the connection, while
    /// a failed GET or HEAD closes it. A write error always closes.
    pub async fn dispatch<W>(&mut self, conn: &mut W, request: &Request) -> Disposition
    where
        W: AsyncWrite + Unpin,
    {
        match self.route(conn, request).await {
            Ok(disposition) => disposition,
            Err(e) => {
                tracing::warn!(
                    method = %request.method,
                    uri = %request.target,
                    error = %e,
                    "Failed to write response"
                );
                Disposition::Close
            }
        }
    }

    async fn route<W>(&mut self, conn: &mut W, request: &Request) -> io::Result<Disposition>
    where
        W: AsyncWrite + Unpin,
    {
        tracing::debug!(
            method = %request.method,
            uri = %request.target,
            version = %request.version,
            "Dispatching request"
        );

        if !request.is_http11() {
            let context = format!("unsupported version {}", request.version);
            let code = StatusCode::HttpVersionNotSupported;
            self.respond_error(conn, code, &request.version, &context).await?;
            return Ok(Disposition::Continue);
        }

        match request.method() {
            Method::Get => Ok(self.get(conn, request).await?.into()),
            Method::Head => Ok(self.head(conn, request).await?.into()),
            Method::Post => {
                self.post(conn, request).await?;
                Ok(Disposition::Continue)
            }
            Method::Other(token) => {
                let context = format!("method {} not implemented", token);
                let code = StatusCode::NotImplemented;
                self.respond_error(conn, code, &request.version, &context).await?;
                Ok(Disposition::Continue)
            }
        }
    }

    /// Answers bytes the tokenizer rejected with 400 and keeps the connection.
    pub async fn reject_unparsable<W>(&mut self, conn: &mut W, err: &ParseError) -> Disposition
    where
        W: AsyncWrite + Unpin,
    {
        let context = format!("unparsable request: {}", err);
        match self
            .respond_error(conn, StatusCode::BadRequest, HTTP_VERSION, &context)
            .await
        {
            Ok(()) => Disposition::Continue,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to write 400 response");
                Disposition::Close
            }
        }
    }
}
