use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_urlencoded::to_string;
use tracing::{debug, trace};

use domain_model::PortfolioResponse;
use viewer_portfolio_api::{FetchError, PortfolioApi};
use viewer_rest_api::path_queries::PortfolioValuesQuery;

pub struct PortfolioRestClient {
    url: String,
    client: Client,
}

impl PortfolioRestClient {
    pub fn new(url: &str) -> Self {
        let mut url = String::from(url);
        if !url.starts_with("http://") && !url.starts_with("https://") {
            url = format!("http://{url}");
        }
        Self {
            url,
            client: Client::new(),
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            ..self
        })
    }
}

#[async_trait]
impl PortfolioApi for PortfolioRestClient {
    async fn get_portfolio_values(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<PortfolioResponse, FetchError> {
        let query = PortfolioValuesQuery {
            fecha_inicio: start_date.to_string(),
            fecha_fin: end_date.to_string(),
        };

        let mut url = Url::parse(&self.url).map_err(|err| FetchError::Url(err.to_string()))?;
        url.set_query(Some(
            &to_string(&query).map_err(|err| FetchError::Url(err.to_string()))?,
        ));
        trace!("Request url: {url:?}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(Box::new(err)))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(Box::new(err)))?;
        let result: PortfolioResponse =
            serde_json::from_slice(&body).map_err(|err| FetchError::Decode(Box::new(err)))?;
        result.validate()?;
        debug!("Received {} portfolios", result.portfolios.len());
        Ok(result)
    }
}
