use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use viewer_chart_builder_api::ChartBuilderApi;
use viewer_core_api::ViewerApi;
use viewer_portfolio_api::PortfolioApi;

use crate::dashboard::{Dashboard, FetchOutcome};
use crate::page::Page;

/// Dates prefilled in the form when the page is opened without a query.
#[derive(Debug, Clone)]
pub struct FormDefaults {
    pub start_date: String,
    pub end_date: String,
}

pub struct Viewer {
    title: String,
    portfolio_api: Arc<dyn PortfolioApi>,
    chart_builder: Arc<dyn ChartBuilderApi>,
    defaults: FormDefaults,
}

impl Viewer {
    pub fn new(
        title: &str,
        portfolio_api: Arc<dyn PortfolioApi>,
        chart_builder: Arc<dyn ChartBuilderApi>,
        defaults: FormDefaults,
    ) -> Self {
        Self {
            title: title.to_string(),
            portfolio_api,
            chart_builder,
            defaults,
        }
    }
}

#[async_trait]
impl ViewerApi for Viewer {
    async fn get_dashboard_html(
        &self,
        start_date: Option<String>,
        end_date: Option<String>,
    ) -> Result<String> {
        let canvas = self.chart_builder.canvas();
        let dashboard = Dashboard::new(Arc::clone(&self.portfolio_api), Arc::clone(&canvas));

        let (start_date, end_date) = match (start_date, end_date) {
            (Some(start_date), Some(end_date)) => {
                match dashboard.submit(&start_date, &end_date) {
                    Ok(handle) => match handle.join().await {
                        FetchOutcome::Rendered(report) => debug!("Dashboard rendered: {report:?}"),
                        FetchOutcome::Failed(err) => warn!("Dashboard without charts: {err}"),
                        FetchOutcome::Cancelled => debug!("Dashboard submission cancelled"),
                    },
                    Err(err) => warn!("Dashboard without charts: {err}"),
                }
                (start_date, end_date)
            }
            _ => (
                self.defaults.start_date.clone(),
                self.defaults.end_date.clone(),
            ),
        };

        let charts = canvas.render()?;
        Ok(Page {
            title: &self.title,
            start_date: &start_date,
            end_date: &end_date,
            charts: &charts,
        }
        .render())
    }
}
