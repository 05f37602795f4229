use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::field::display;

use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::router::Router;
use crate::http::writer::ResponseWriter;

/// One client connection, from request bytes in to response bytes out.
///
/// Exactly one request is served. Once the response has been written the
/// write side is shut down and the connection is finished.
pub struct Connection<R, W> {
    reader: BufReader<R>,
    writer: W,
    router: Arc<Router>,
    peer: Option<SocketAddr>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<R, W> Connection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, router: Arc<Router>) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            router,
            peer: None,
            state: ConnectionState::Reading,
        }
    }

    /// Tags this connection's log events with the remote address.
    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.state = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => ConnectionState::Processing(self.read_request().await?),

                ConnectionState::Processing(req) => {
                    let response = self.router.respond(&req).await;
                    let user_agent = req.header("User-Agent").map(String::from_utf8_lossy);

                    tracing::info!(
                        peer = self.peer.map(display),
                        method = %req.method,
                        path = %req.path,
                        status = response.status.as_u16(),
                        content_length = response.header("Content-Length"),
                        user_agent = user_agent.as_deref(),
                        "Responding"
                    );

                    ConnectionState::Writing(ResponseWriter::new(response))
                }

                ConnectionState::Writing(mut writer) => {
                    let sent = writer
                        .write_to_stream(&mut self.writer)
                        .await
                        .context("failed to send response")?;
                    self.writer
                        .shutdown()
                        .await
                        .context("failed to close connection")?;

                    tracing::debug!(body_bytes = sent, "Response sent");
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    pub async fn read_request(&mut self) -> anyhow::Result<Request> {
        let req = parse_request(&mut self.reader)
            .await
            .context("HTTP parse error")?;

        tracing::debug!(
            peer = self.peer.map(display),
            method = %req.method,
            path = %req.path,
            minor_version = req.minor_version,
            body_bytes = req.body.as_ref().map_or(0, Vec::len),
            "Request parsed"
        );
        for (name, value) in req.headers.iter() {
            tracing::debug!(
                header = %String::from_utf8_lossy(name),
                value = %String::from_utf8_lossy(value),
                "Header"
            );
        }

        Ok(req)
    }
}
