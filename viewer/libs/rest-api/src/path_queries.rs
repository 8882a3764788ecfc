use serde::{Deserialize, Serialize};

/// Query of the backend portfolio values endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct PortfolioValuesQuery {
    pub fecha_inicio: String,
    pub fecha_fin: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DashboardQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}
