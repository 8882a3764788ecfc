use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ViewerApi: Send + Sync + 'static {
    /// Renders the dashboard page, charts are drawn only when both dates are given.
    async fn get_dashboard_html(
        &self,
        start_date: Option<String>,
        end_date: Option<String>,
    ) -> Result<String>;
}
