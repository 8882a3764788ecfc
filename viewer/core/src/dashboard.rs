use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use domain_model::{DateRange, PortfolioResponse};
use viewer_chart_builder_api::Canvas;
use viewer_portfolio_api::{FetchError, PortfolioApi};

use crate::chart::{render_portfolios, RenderReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Fetching,
    Rendered,
    Failed,
}

/// Data of the last successful fetch, replaced as a whole by the next one.
#[derive(Debug)]
pub struct ViewModel {
    pub start_date: String,
    pub end_date: String,
    pub response: PortfolioResponse,
}

#[derive(Debug)]
pub enum FetchOutcome {
    Rendered(RenderReport),
    Failed(FetchError),
    Cancelled,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Start date '{start_date}' is after end date '{end_date}'")]
    InvertedRange { start_date: String, end_date: String },
    #[error("Dashboard is torn down")]
    TornDown,
}

struct View {
    state: ViewState,
    model: Option<Arc<ViewModel>>,
}

/// One dashboard view: submissions fetch portfolio values and draw them on
/// the canvas. Dropping the dashboard tears it down.
pub struct Dashboard {
    portfolio_api: Arc<dyn PortfolioApi>,
    canvas: Arc<dyn Canvas>,
    view: Arc<Mutex<View>>,
    lifetime: CancellationToken,
}

impl Dashboard {
    pub fn new(portfolio_api: Arc<dyn PortfolioApi>, canvas: Arc<dyn Canvas>) -> Self {
        Self {
            portfolio_api,
            canvas,
            view: Arc::new(Mutex::new(View {
                state: ViewState::Idle,
                model: None,
            })),
            lifetime: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> ViewState {
        self.view.lock().state
    }

    pub fn view_model(&self) -> Option<Arc<ViewModel>> {
        self.view.lock().model.clone()
    }

    /// Starts an independent fetch and render cycle. Must be called within a
    /// tokio runtime.
    pub fn submit(&self, start_date: &str, end_date: &str) -> Result<FetchHandle, DashboardError> {
        info!("Portfolio values requested from '{start_date}' to '{end_date}'");
        if self.lifetime.is_cancelled() {
            return Err(DashboardError::TornDown);
        }
        // unparsable dates still go to the backend, it reports the format error
        if let Ok(range) = DateRange::parse(start_date, end_date) {
            if range.is_inverted() {
                let err = DashboardError::InvertedRange {
                    start_date: start_date.to_string(),
                    end_date: end_date.to_string(),
                };
                error!("Rejected portfolio values request: {err}");
                self.view.lock().state = ViewState::Failed;
                return Err(err);
            }
        }

        self.view.lock().state = ViewState::Fetching;
        let token = self.lifetime.child_token();
        let task = FetchTask {
            portfolio_api: Arc::clone(&self.portfolio_api),
            canvas: Arc::clone(&self.canvas),
            view: Arc::clone(&self.view),
            token: token.clone(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        };
        Ok(FetchHandle {
            token,
            view: Arc::clone(&self.view),
            handle: tokio::spawn(task.run()),
        })
    }

    /// Cancels every in-flight submission. Once this returns nothing is
    /// delivered to the view anymore.
    pub fn teardown(&self) {
        let _view = self.view.lock();
        if !self.lifetime.is_cancelled() {
            debug!("Dashboard teardown");
            self.lifetime.cancel();
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Handle of one submission, awaited with [`FetchHandle::join`] or cancelled.
pub struct FetchHandle {
    token: CancellationToken,
    view: Arc<Mutex<View>>,
    handle: JoinHandle<FetchOutcome>,
}

impl FetchHandle {
    /// Once this returns the submission delivers nothing to the view.
    pub fn cancel(&self) {
        let _view = self.view.lock();
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn join(self) -> FetchOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => FetchOutcome::Cancelled,
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}

struct FetchTask {
    portfolio_api: Arc<dyn PortfolioApi>,
    canvas: Arc<dyn Canvas>,
    view: Arc<Mutex<View>>,
    token: CancellationToken,
    start_date: String,
    end_date: String,
}

impl FetchTask {
    async fn run(self) -> FetchOutcome {
        // dropping the pending request aborts it
        let result = tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!("Portfolio values request cancelled before response");
                return FetchOutcome::Cancelled;
            }
            result = self
                .portfolio_api
                .get_portfolio_values(&self.start_date, &self.end_date) => result,
        };

        let mut view = self.view.lock();
        if self.token.is_cancelled() {
            debug!("Portfolio values response dropped, request cancelled");
            return FetchOutcome::Cancelled;
        }
        match result {
            Ok(response) => {
                let model = Arc::new(ViewModel {
                    start_date: self.start_date,
                    end_date: self.end_date,
                    response,
                });
                view.model = Some(Arc::clone(&model));

                let targets = model
                    .response
                    .portfolios
                    .iter()
                    .flat_map(|portfolio| {
                        [portfolio.weight_chart_target(), portfolio.value_chart_target()]
                    })
                    .collect::<Vec<_>>();
                self.canvas.mount(&targets);
                let report = render_portfolios(self.canvas.as_ref(), &model.response);
                view.state = ViewState::Rendered;
                debug!("Portfolio values rendered: {report:?}");
                FetchOutcome::Rendered(report)
            }
            Err(err) => {
                error!("Error during portfolio values fetching: {err}");
                view.state = ViewState::Failed;
                FetchOutcome::Failed(err)
            }
        }
    }
}
