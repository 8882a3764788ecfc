use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use viewer_charming_builder::CharmingBuilder;
use viewer_config::CONFIG;
use viewer_core::{FormDefaults, Viewer};
use viewer_rest_client::PortfolioRestClient;

pub async fn run() -> Result<()> {
    info!("▶ viewer running...");
    let mut portfolio_client = PortfolioRestClient::new(&CONFIG.portfolio.url);
    if let Some(timeout) = CONFIG.portfolio.timeout() {
        portfolio_client = portfolio_client.with_timeout(timeout)?;
    }
    let viewer = Viewer::new(
        &CONFIG.application.name,
        Arc::new(portfolio_client),
        Arc::new(CharmingBuilder::default()),
        FormDefaults {
            start_date: CONFIG.form.start.clone(),
            end_date: CONFIG.form.end.clone(),
        },
    );
    viewer_rest_api_server::run(CONFIG.application.port, viewer).await
}
