use std::error::Error as StdError;

use async_trait::async_trait;
use thiserror::Error;

use domain_model::{PortfolioResponse, SchemaError};

pub type BoxError = Box<dyn StdError + Send + Sync>;

#[async_trait]
pub trait PortfolioApi: Send + Sync + 'static {
    /// Dates are forwarded untouched, the backend is the one validating them.
    async fn get_portfolio_values(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<PortfolioResponse, FetchError>;
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid portfolio api url: {0}")]
    Url(String),
    #[error("Portfolio api request failed: {0}")]
    Transport(#[source] BoxError),
    #[error("Portfolio api responded with status {status}: '{body}'")]
    Status { status: u16, body: String },
    #[error("Cannot decode portfolio api response: {0}")]
    Decode(#[source] BoxError),
    #[error("Invalid portfolio api payload: {0}")]
    InvalidPayload(#[from] SchemaError),
}
