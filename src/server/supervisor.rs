use std::future::Future;
use std::net::SocketAddr;

use tokio::task::{JoinError, JoinSet};

/// Owns the per-connection worker tasks.
///
/// Workers are reaped as they finish via [`Supervisor::join_next`], which the
/// accept loop polls alongside `accept` so it never waits on a particular
/// worker. A worker that fails or panics is logged here and nowhere else.
pub struct Supervisor {
    workers: JoinSet<()>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            workers: JoinSet::new(),
        }
    }

    /// Starts a worker for the connection from `peer`.
    pub fn spawn<F>(&mut self, peer: SocketAddr, worker: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.workers.spawn(async move {
            if let Err(e) = worker.await {
                tracing::error!(peer = %peer, error = %format!("{e:#}"), "Connection error");
            }
        });
    }

    /// Number of workers not yet reaped.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Waits for the next worker to finish and records its outcome.
    ///
    /// Returns `None` when there are no workers. Cancel safe.
    pub async fn join_next(&mut self) -> Option<()> {
        let result = self.workers.join_next().await?;
        record(result);
        Some(())
    }

    /// Reaps every worker that has already finished, without waiting.
    pub fn reap(&mut self) -> usize {
        let mut reaped = 0;
        while let Some(result) = self.workers.try_join_next() {
            record(result);
            reaped += 1;
        }
        reaped
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

fn record(result: Result<(), JoinError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_panic() => tracing::error!(error = %e, "Worker panicked"),
        Err(e) => tracing::warn!(error = %e, "Worker cancelled"),
    }
}
