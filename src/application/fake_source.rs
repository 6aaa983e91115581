// In-memory overview source for tests
use crate::application::overview_source::{Endpoint, FetchError, OverviewSource};
use crate::domain::overview::OverviewAggregate;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

/// Holds a scripted overview response until the test releases it.
pub struct Gate {
    pub started: oneshot::Sender<()>,
    pub release: oneshot::Receiver<()>,
}

pub struct Scripted {
    pub result: Result<OverviewAggregate, FetchError>,
    pub gate: Option<Gate>,
}

#[derive(Default)]
pub struct FakeSource {
    overview: Mutex<VecDeque<Scripted>>,
    reloads: Mutex<VecDeque<Result<(), FetchError>>>,
    steady: Option<OverviewAggregate>,
    overview_calls: AtomicUsize,
    reload_calls: AtomicUsize,
}

impl FakeSource {
    /// Always answers with the same aggregate once scripted responses run out.
    pub fn steady(overview: OverviewAggregate) -> Self {
        Self {
            steady: Some(overview),
            ..Default::default()
        }
    }

    pub fn push_overview(&self, result: Result<OverviewAggregate, FetchError>) {
        self.overview
            .lock()
            .unwrap()
            .push_back(Scripted { result, gate: None });
    }

    /// Queue a response that waits for the returned sender before completing.
    /// The receiver fires once the call has started.
    pub fn push_gated_overview(
        &self,
        result: Result<OverviewAggregate, FetchError>,
    ) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.overview.lock().unwrap().push_back(Scripted {
            result,
            gate: Some(Gate {
                started: started_tx,
                release: release_rx,
            }),
        });
        (started_rx, release_tx)
    }

    pub fn push_reload(&self, result: Result<(), FetchError>) {
        self.reloads.lock().unwrap().push_back(result);
    }

    pub fn overview_calls(&self) -> usize {
        self.overview_calls.load(Ordering::SeqCst)
    }

    pub fn reload_calls(&self) -> usize {
        self.reload_calls.load(Ordering::SeqCst)
    }
}

pub fn status_error(endpoint: Endpoint, status: u16) -> FetchError {
    FetchError::Status { endpoint, status }
}

#[async_trait]
impl OverviewSource for FakeSource {
    async fn fetch_overview(&self) -> Result<OverviewAggregate, FetchError> {
        self.overview_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.overview.lock().unwrap().pop_front();

        match scripted {
            Some(Scripted { result, gate }) => {
                if let Some(gate) = gate {
                    let _ = gate.started.send(());
                    let _ = gate.release.await;
                }
                result
            }
            None => self.steady.clone().ok_or_else(|| FetchError::Transport {
                endpoint: Endpoint::Overview,
                message: "connection refused".to_string(),
            }),
        }
    }

    async fn reload(&self) -> Result<(), FetchError> {
        self.reload_calls.fetch_add(1, Ordering::SeqCst);
        self.reloads.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
