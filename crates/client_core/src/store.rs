//! Observable state container for the listing and detail views.
//!
//! Every action mutates [`StoreState`] before and after its single network
//! call and never returns an error: failures end up in the state (records,
//! operator detail) or only in the log (statistics, expenses).
//!
//! The request of an action runs on a spawned task, so dropping the
//! action's future does not stop it from completing and updating the state.
//! Overlapping calls of the same action are not coordinated; whichever
//! response arrives last wins. Detail results for an operator other than
//! the one currently shown are dropped.

use std::{future::Future, sync::Arc};

use shared::{
    domain::{ExpenseRecord, OperatorRecord, Statistics},
    protocol::OperatorsQuery,
};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};

use crate::api::AnsApi;

pub const PAGE_LIMIT: u32 = 10;
pub const RECORDS_ERROR_MESSAGE: &str = "Erro ao carregar operadoras";
pub const OPERATOR_NOT_FOUND_MESSAGE: &str = "Operadora não encontrada";
pub const OPERATOR_ERROR_MESSAGE: &str = "Erro ao carregar operadora";

#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    pub records: Vec<OperatorRecord>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub loading: bool,
    pub error: Option<String>,
    pub statistics: Option<Statistics>,
    pub detail: DetailState,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
            page: 1,
            limit: PAGE_LIMIT,
            loading: false,
            error: None,
            statistics: None,
            detail: DetailState::default(),
        }
    }
}

/// State of the detail view. Operator and expenses always belong to `identifier`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailState {
    pub identifier: Option<String>,
    pub operator: Option<OperatorRecord>,
    pub expenses: Vec<ExpenseRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DetailState {
    /// Switches the view to `identifier`, dropping data that belongs to another operator.
    fn select(&mut self, identifier: &str) {
        if self.is_showing(identifier) {
            return;
        }
        *self = Self {
            identifier: Some(identifier.to_string()),
            ..Self::default()
        };
    }

    fn is_showing(&self, identifier: &str) -> bool {
        self.identifier.as_deref() == Some(identifier)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    RecordsLoading { page: u32, search: String },
    RecordsLoaded { page: u32, total: u64 },
    RecordsFailed { message: String },
    StatisticsLoaded,
    OperatorLoading { identifier: String },
    OperatorLoaded { identifier: String },
    OperatorFailed { identifier: String, message: String },
    ExpensesLoaded { identifier: String, count: usize },
}

pub struct AnsStore {
    api: Arc<dyn AnsApi>,
    state: RwLock<StoreState>,
    events: broadcast::Sender<StoreEvent>,
}

impl AnsStore {
    pub fn new(api: Arc<dyn AnsApi>) -> Arc<Self> {
        Self::with_state(api, StoreState::default())
    }

    pub fn with_state(api: Arc<dyn AnsApi>, state: StoreState) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            state: RwLock::new(state),
            events,
        })
    }

    pub async fn snapshot(&self) -> StoreState {
        self.state.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        let _ = self.events.send(event);
    }

    /// Loads page 1 without a search filter.
    pub async fn fetch_first_page(self: &Arc<Self>) {
        self.fetch_records(1, "").await;
    }

    pub async fn fetch_records(self: &Arc<Self>, page: u32, search_term: &str) {
        let query = {
            let mut guard = self.state.write().await;
            guard.loading = true;
            guard.error = None;
            OperatorsQuery {
                page,
                limit: guard.limit,
                search: search_term.to_string(),
            }
        };
        self.emit(StoreEvent::RecordsLoading {
            page,
            search: query.search.clone(),
        });

        let store = Arc::clone(self);
        run_detached("fetch_records", async move {
            let result = store.api.list_operators(&query).await;

            let mut guard = store.state.write().await;
            let event = match result {
                Ok(body) => {
                    guard.records = body.data;
                    guard.total = body.total;
                    guard.page = body.page;
                    info!(page = body.page, total = body.total, "loaded operators");
                    StoreEvent::RecordsLoaded {
                        page: body.page,
                        total: body.total,
                    }
                }
                Err(err) => {
                    error!(
                        error = %err,
                        page = query.page,
                        search = %query.search,
                        "failed to load operators"
                    );
                    guard.error = Some(RECORDS_ERROR_MESSAGE.to_string());
                    StoreEvent::RecordsFailed {
                        message: RECORDS_ERROR_MESSAGE.to_string(),
                    }
                }
            };
            guard.loading = false;
            drop(guard);
            store.emit(event);
        })
        .await;
    }

    pub async fn fetch_statistics(self: &Arc<Self>) {
        let store = Arc::clone(self);
        run_detached("fetch_statistics", async move {
            match store.api.statistics().await {
                Ok(statistics) => {
                    store.state.write().await.statistics = Some(statistics);
                    store.emit(StoreEvent::StatisticsLoaded);
                }
                Err(err) => error!(error = %err, "failed to load statistics"),
            }
        })
        .await;
    }

    pub async fn fetch_operator(self: &Arc<Self>, identifier: &str) {
        {
            let mut guard = self.state.write().await;
            guard.detail.select(identifier);
            guard.detail.loading = true;
            guard.detail.error = None;
        }
        self.emit(StoreEvent::OperatorLoading {
            identifier: identifier.to_string(),
        });

        let store = Arc::clone(self);
        let identifier = identifier.to_string();
        run_detached("fetch_operator", async move {
            let result = store.api.operator(&identifier).await;

            let mut guard = store.state.write().await;
            if !guard.detail.is_showing(&identifier) {
                debug!(%identifier, "discarding operator for a detail view no longer shown");
                return;
            }
            let event = match result {
                Ok(operator) => {
                    guard.detail.operator = Some(operator);
                    StoreEvent::OperatorLoaded {
                        identifier: identifier.clone(),
                    }
                }
                Err(err) => {
                    let message = if err.is_not_found() {
                        warn!(%identifier, "operator not found");
                        guard.detail.operator = None;
                        OPERATOR_NOT_FOUND_MESSAGE
                    } else {
                        error!(error = %err, %identifier, "failed to load operator");
                        OPERATOR_ERROR_MESSAGE
                    };
                    guard.detail.error = Some(message.to_string());
                    StoreEvent::OperatorFailed {
                        identifier: identifier.clone(),
                        message: message.to_string(),
                    }
                }
            };
            guard.detail.loading = false;
            drop(guard);
            store.emit(event);
        })
        .await;
    }

    pub async fn fetch_expenses(self: &Arc<Self>, identifier: &str) {
        self.state.write().await.detail.select(identifier);

        let store = Arc::clone(self);
        let identifier = identifier.to_string();
        run_detached("fetch_expenses", async move {
            match store.api.operator_expenses(&identifier).await {
                Ok(expenses) => {
                    let count = expenses.len();
                    {
                        let mut guard = store.state.write().await;
                        if !guard.detail.is_showing(&identifier) {
                            debug!(%identifier, "discarding expenses for a detail view no longer shown");
                            return;
                        }
                        guard.detail.expenses = expenses;
                    }
                    store.emit(StoreEvent::ExpensesLoaded { identifier, count });
                }
                Err(err) => error!(error = %err, %identifier, "failed to load expenses"),
            }
        })
        .await;
    }
}

/// Runs `work` on its own task and waits for it.
async fn run_detached<F>(action: &'static str, work: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Err(err) = tokio::spawn(work).await {
        error!(action, error = %err, "store action task aborted");
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
