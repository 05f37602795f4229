use std::sync::Arc;

use crate::http::connection::Connection;
use crate::http::router::Router;

/// Serves a single request read from stdin, writing the response to stdout.
pub async fn serve(router: Arc<Router>) -> anyhow::Result<()> {
    let mut conn = Connection::new(tokio::io::stdin(), tokio::io::stdout(), router);
    conn.run().await
}
