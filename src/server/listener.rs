use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::info;

use crate::http::connection::Connection;
use crate::http::router::Router;
use crate::server::supervisor::Supervisor;

/// Pending-connection queue length passed to `listen(2)`.
pub const MAX_BACKLOG: u32 = 2;

/// Binds `port` on all IPv4 interfaces.
pub fn bind(port: u16) -> io::Result<TcpListener> {
    bind_addr(SocketAddr::from(([0, 0, 0, 0], port)))
}

/// Binds `addr` with `SO_REUSEADDR` and a listen queue of [`MAX_BACKLOG`].
pub fn bind_addr(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(MAX_BACKLOG)
}

/// Accepts connections forever, one worker task per connection.
///
/// Only an accept failure ends the loop; everything that goes wrong inside a
/// worker stays inside that worker.
pub async fn serve(listener: TcpListener, router: Arc<Router>) -> anyhow::Result<()> {
    let local = listener.local_addr()?;
    info!(
        addr = %local,
        docroot = %router.docroot().display(),
        "Listening"
    );

    let mut supervisor = Supervisor::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = accepted.context("accept(2) failed")?;
                supervisor.reap();
                info!(peer = %peer, active = supervisor.len(), "Accepted connection");

                let router = router.clone();
                supervisor.spawn(peer, async move {
                    let (reader, writer) = socket.into_split();
                    let mut conn = Connection::new(reader, writer, router).with_peer(peer);
                    conn.run().await
                });
            }

            Some(()) = supervisor.join_next(), if !supervisor.is_empty() => {}
        }
    }
}
