// Dashboard refresh client - fetches the SBC overview and owns what is on screen
use crate::application::overview_source::{FailureClass, FetchError, OverviewSource};
use crate::domain::dashboard::{DEFAULT_REGION_LIMIT, Dashboard};
use crate::domain::overview::OverviewAggregate;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const DEFAULT_UNAVAILABLE_MESSAGE: &str =
    "Fonte de dados SBC não disponível. Verifique se o arquivo CSV foi configurado no servidor.";
pub const DEFAULT_TRANSIENT_MESSAGE: &str =
    "Não foi possível atualizar o painel SBC. Tente recarregar em instantes.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardState {
    Loading,
    Displayed(Dashboard),
    Hidden,
    ErrorDisplayed(String),
}

impl DashboardState {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardState::Loading => "loading",
            DashboardState::Displayed(_) => "displayed",
            DashboardState::Hidden => "hidden",
            DashboardState::ErrorDisplayed(_) => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub region_limit: usize,
    pub unavailable_message: String,
    pub transient_message: String,
    /// Show a banner for transient failures instead of hiding the dashboard
    pub show_transient_errors: bool,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            region_limit: DEFAULT_REGION_LIMIT,
            unavailable_message: DEFAULT_UNAVAILABLE_MESSAGE.to_string(),
            transient_message: DEFAULT_TRANSIENT_MESSAGE.to_string(),
            show_transient_errors: false,
        }
    }
}

/// Busy flag behind the manual reload button.
#[derive(Debug, Default)]
pub struct ReloadControl {
    busy: AtomicBool,
}

impl ReloadControl {
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn begin(&self) -> ReloadGuard<'_> {
        self.busy.store(true, Ordering::SeqCst);
        ReloadGuard { control: self }
    }
}

/// Re-enables the reload button when dropped, whatever the outcome.
struct ReloadGuard<'a> {
    control: &'a ReloadControl,
}

impl Drop for ReloadGuard<'_> {
    fn drop(&mut self) {
        self.control.busy.store(false, Ordering::SeqCst);
    }
}

enum FetchOutcome {
    Fresh(OverviewAggregate),
    /// Refetch after a successful reload failed; a displayed snapshot survives this.
    RefetchFailed(FetchError),
    Failed(FetchError),
}

struct Inner {
    state: DashboardState,
    /// Last applied state, shown again if an in-flight cycle is abandoned
    settled: DashboardState,
    /// Snapshot currently on screen
    snapshot: Option<OverviewAggregate>,
    last_applied: u64,
    /// Cycle that most recently switched the region to `Loading`
    loading_sequence: u64,
}

/// Puts the settled state back if a cycle is dropped between showing
/// `Loading` and applying its result.
struct LoadingGuard<'a> {
    client: &'a DashboardRefreshClient,
    sequence: u64,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.client.lock_inner();
        if inner.loading_sequence == self.sequence && inner.state == DashboardState::Loading {
            tracing::debug!("Overview cycle #{} abandoned before applying", self.sequence);
            inner.state = inner.settled.clone();
        }
    }
}

pub struct DashboardRefreshClient {
    source: Arc<dyn OverviewSource>,
    settings: RefreshSettings,
    inner: Mutex<Inner>,
    next_sequence: AtomicU64,
    reload_control: ReloadControl,
}

impl DashboardRefreshClient {
    pub fn new(source: Arc<dyn OverviewSource>, settings: RefreshSettings) -> Self {
        Self {
            source,
            settings,
            inner: Mutex::new(Inner {
                state: DashboardState::Loading,
                settled: DashboardState::Loading,
                snapshot: None,
                last_applied: 0,
                loading_sequence: 0,
            }),
            next_sequence: AtomicU64::new(0),
            reload_control: ReloadControl::default(),
        }
    }

    /// Run one fetch cycle and return the state it leaves behind.
    ///
    /// With `force_reload` the backend cache is invalidated first. Results
    /// from a cycle that started before an already-applied one are dropped.
    pub async fn load(&self, force_reload: bool) -> DashboardState {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let _busy = force_reload.then(|| self.reload_control.begin());

        let mut loading = LoadingGuard {
            client: self,
            sequence,
            armed: false,
        };
        {
            let mut inner = self.lock_inner();
            if sequence > inner.last_applied {
                inner.state = DashboardState::Loading;
                inner.loading_sequence = sequence;
                loading.armed = true;
            }
        }

        let outcome = self.fetch(force_reload).await;
        loading.armed = false;
        self.apply(sequence, outcome)
    }

    pub fn state(&self) -> DashboardState {
        self.lock_inner().state.clone()
    }

    pub fn snapshot(&self) -> Option<OverviewAggregate> {
        self.lock_inner().snapshot.clone()
    }

    /// Sequence number of the last applied cycle, 0 before any.
    pub fn applied_sequence(&self) -> u64 {
        self.lock_inner().last_applied
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_control.is_busy()
    }

    async fn fetch(&self, force_reload: bool) -> FetchOutcome {
        if !force_reload {
            return match self.source.fetch_overview().await {
                Ok(overview) => FetchOutcome::Fresh(overview),
                Err(err) => FetchOutcome::Failed(err),
            };
        }

        if let Err(err) = self.source.reload().await {
            return FetchOutcome::Failed(err);
        }
        tracing::debug!("SBC backend cache reloaded, fetching fresh overview");

        match self.source.fetch_overview().await {
            Ok(overview) => FetchOutcome::Fresh(overview),
            Err(err) => FetchOutcome::RefetchFailed(err),
        }
    }

    // Never held across an await, so a dropped cycle can restore state from `Drop`
    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, sequence: u64, outcome: FetchOutcome) -> DashboardState {
        let mut guard = self.lock_inner();
        let inner = &mut *guard;

        if sequence <= inner.last_applied {
            tracing::debug!(
                "Discarding stale overview result #{} (already applied #{})",
                sequence,
                inner.last_applied
            );
            return inner.state.clone();
        }
        inner.last_applied = sequence;

        match outcome {
            FetchOutcome::Fresh(overview) => {
                let dashboard = Dashboard::from_overview(&overview, self.settings.region_limit);
                tracing::debug!(
                    "Overview #{} applied: {} SBCs, {} tiles",
                    sequence,
                    overview.total_sbcs,
                    dashboard.tiles.len()
                );
                inner.snapshot = Some(overview);
                inner.state = DashboardState::Displayed(dashboard);
            }
            FetchOutcome::RefetchFailed(err) if inner.snapshot.is_some() => {
                tracing::warn!("Keeping previous SBC overview after failed refetch: {}", err);
                if let Some(previous) = &inner.snapshot {
                    let dashboard = Dashboard::from_overview(previous, self.settings.region_limit);
                    inner.state = DashboardState::Displayed(dashboard);
                }
            }
            FetchOutcome::RefetchFailed(err) | FetchOutcome::Failed(err) => {
                inner.snapshot = None;
                inner.state = self.failure_state(&err);
            }
        }

        inner.settled = inner.state.clone();
        inner.state.clone()
    }

    fn failure_state(&self, err: &FetchError) -> DashboardState {
        match err.class() {
            FailureClass::Unauthorized => {
                tracing::info!(endpoint = %err.endpoint(), "Hiding SBC dashboard: {}", err);
                DashboardState::Hidden
            }
            FailureClass::SourceUnavailable => {
                tracing::warn!(endpoint = %err.endpoint(), "SBC data source unavailable: {}", err);
                DashboardState::ErrorDisplayed(self.settings.unavailable_message.clone())
            }
            FailureClass::Transient if self.settings.show_transient_errors => {
                tracing::warn!("SBC overview failed, showing retry banner: {}", err);
                DashboardState::ErrorDisplayed(self.settings.transient_message.clone())
            }
            FailureClass::Transient => {
                tracing::warn!("Hiding SBC dashboard after unclassified failure: {}", err);
                DashboardState::Hidden
            }
        }
    }
}
