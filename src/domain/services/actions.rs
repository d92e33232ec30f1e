#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::BenchmarkRequest;
use crate::domain::models::Event;

async fn query(backend: BackendBox, tx: mpsc::UnboundedSender<Event>, question: String) -> Result<()> {
    match backend.query(&question).await {
        Ok(res) => tx.send(Event::BackendQueryResponse(res))?,
        Err(err) => tx.send(Event::BackendQueryError(err.to_string()))?,
    }

    return Ok(());
}

async fn benchmark(
    backend: BackendBox,
    tx: mpsc::UnboundedSender<Event>,
    request: BenchmarkRequest,
) -> Result<()> {
    let technique = request.technique();
    match backend.run_benchmark(request).await {
        Ok(res) => tx.send(Event::BenchmarkCompleted(technique, res))?,
        Err(err) => tx.send(Event::BenchmarkFailed(technique, err.to_string()))?,
    }

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs every action on its own task so chat and dashboard requests never
    /// wait on each other. Returns once the action channel closes; requests
    /// already sent keep running.
    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            let worker_backend = backend.clone();
            let worker_tx = tx.clone();

            match action {
                Action::BackendQuery(question) => {
                    tracing::debug!(question = %question, "Sending query");
                    tokio::spawn(async move {
                        if let Err(err) = query(worker_backend, worker_tx, question).await {
                            tracing::error!(error = ?err, "Failed to deliver query result");
                        }
                    });
                }
                Action::BackendBenchmark(request) => {
                    tracing::debug!(technique = %request.technique(), "Running benchmark");
                    tokio::spawn(async move {
                        if let Err(err) = benchmark(worker_backend, worker_tx, request).await {
                            tracing::error!(error = ?err, "Failed to deliver benchmark result");
                        }
                    });
                }
            }
        }

        return Ok(());
    }
}
