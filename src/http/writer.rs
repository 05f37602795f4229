use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response};

/// Protocol version advertised on every status line, whatever the client sent.
pub const HTTP_VERSION: &str = "HTTP/1.0";

/// Files are copied to the socket in blocks of this size.
pub const BLOCK_SIZE: usize = 4096;

#[derive(Debug)]
pub enum WriteError {
    /// Writing to the client failed
    Io(io::Error),
    /// A file that was servable could not be opened or read
    Resource { path: PathBuf, source: io::Error },
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::Io(e) => write!(f, "failed to write to socket: {e}"),
            WriteError::Resource { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WriteError::Io(e) => Some(e),
            WriteError::Resource { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for WriteError {
    fn from(e: io::Error) -> Self {
        WriteError::Io(e)
    }
}

/// Serializes the status line and header block, blank line included.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

pub struct ResponseWriter {
    head: Vec<u8>,
    written: usize,
    body: Body,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        Self {
            head: serialize_head(&response),
            written: 0,
            body: response.body,
        }
    }

    /// Writes the whole response and flushes. Returns the number of body
    /// bytes sent.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> Result<u64, WriteError>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.head.len() {
            let n = stream.write(&self.head[self.written..]).await?;

            if n == 0 {
                return Err(WriteError::Io(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "connection closed while writing",
                )));
            }

            self.written += n;
        }

        let sent = match &self.body {
            Body::Empty => 0,
            Body::Bytes(bytes) => {
                stream.write_all(bytes).await?;
                bytes.len() as u64
            }
            Body::File { path, .. } => copy_file(path, stream).await?,
        };

        stream.flush().await?;
        Ok(sent)
    }
}

async fn copy_file<W>(path: &Path, stream: &mut W) -> Result<u64, WriteError>
where
    W: AsyncWrite + Unpin,
{
    let resource = |source: io::Error| WriteError::Resource {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).await.map_err(resource)?;
    let mut block = vec![0u8; BLOCK_SIZE];
    let mut sent = 0u64;

    loop {
        let n = file.read(&mut block).await.map_err(resource)?;
        if n == 0 {
            break;
        }
        stream.write_all(&block[..n]).await?;
        sent += n as u64;
    }

    Ok(sent)
}
