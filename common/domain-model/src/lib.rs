use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type PortfolioId = u64;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn parse(start: &str, end: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            start: NaiveDate::parse_from_str(start, DATE_FORMAT)?,
            end: NaiveDate::parse_from_str(end, DATE_FORMAT)?,
        })
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PortfolioResponse {
    pub portfolios: Vec<Portfolio>,
}

impl PortfolioResponse {
    /// Checks the payload against the backend schema: every portfolio carries
    /// at least one point, values and weights are finite and non-negative.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.portfolios.iter().try_for_each(Portfolio::validate)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Portfolio {
    pub portfolio_id: PortfolioId,
    pub values: Vec<ValuePoint>,
}

impl Portfolio {
    pub fn weight_chart_target(&self) -> String {
        format!("weightChart{}", self.portfolio_id)
    }

    pub fn value_chart_target(&self) -> String {
        format!("valueChart{}", self.portfolio_id)
    }

    pub fn labels(&self) -> Vec<String> {
        self.values.iter().map(|value| value.t.clone()).collect()
    }

    /// Asset classes as keyed by the first point, in payload order.
    pub fn asset_classes(&self) -> Vec<&str> {
        self.values
            .first()
            .map(|value| value.weights.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if self.values.is_empty() {
            return Err(SchemaError::EmptyValues {
                portfolio_id: self.portfolio_id,
            });
        }
        for value in &self.values {
            if !is_non_negative(value.portfolio_value) {
                return Err(SchemaError::InvalidPortfolioValue {
                    portfolio_id: self.portfolio_id,
                    t: value.t.clone(),
                    value: value.portfolio_value,
                });
            }
            if let Some((asset_class, weight)) = value
                .weights
                .iter()
                .find(|(_, weight)| !is_non_negative(**weight))
            {
                return Err(SchemaError::InvalidWeight {
                    portfolio_id: self.portfolio_id,
                    t: value.t.clone(),
                    asset_class: asset_class.clone(),
                    weight: *weight,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValuePoint {
    pub t: String,
    pub portfolio_value: f64,
    pub weights: IndexMap<String, f64>,
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Portfolio '{portfolio_id}' has no values")]
    EmptyValues { portfolio_id: PortfolioId },
    #[error("Portfolio '{portfolio_id}' has invalid value '{value}' at '{t}'")]
    InvalidPortfolioValue {
        portfolio_id: PortfolioId,
        t: String,
        value: f64,
    },
    #[error("Portfolio '{portfolio_id}' has invalid weight '{weight}' for '{asset_class}' at '{t}'")]
    InvalidWeight {
        portfolio_id: PortfolioId,
        t: String,
        asset_class: String,
        weight: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{"portfolios":[{"portfolio_id":1,"values":[
        {"t":"2022-02-15","portfolio_value":1000,"weights":{"stocks":0.6,"bonds":0.4}},
        {"t":"2022-02-16","portfolio_value":1010,"weights":{"stocks":0.62,"bonds":0.38}}]}]}"#;

    #[test]
    fn test_deserialize_keeps_weights_order() {
        let response: PortfolioResponse = serde_json::from_str(RESPONSE).unwrap();
        let portfolio = response.portfolios.first().unwrap();
        assert_eq!(portfolio.portfolio_id, 1);
        assert_eq!(portfolio.asset_classes(), vec!["stocks", "bonds"]);
        assert_eq!(portfolio.labels(), vec!["2022-02-15", "2022-02-16"]);
        assert_eq!(portfolio.weight_chart_target(), "weightChart1");
        assert_eq!(portfolio.value_chart_target(), "valueChart1");
        assert!(response.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let response: PortfolioResponse =
            serde_json::from_str(r#"{"portfolios":[{"portfolio_id":7,"values":[]}]}"#).unwrap();
        assert_eq!(
            response.validate(),
            Err(SchemaError::EmptyValues { portfolio_id: 7 })
        );
    }

    #[test]
    fn test_validate_rejects_negative_numbers() {
        let mut response: PortfolioResponse = serde_json::from_str(RESPONSE).unwrap();
        response.portfolios[0].values[1]
            .weights
            .insert("bonds".to_string(), -0.1);
        assert!(matches!(
            response.validate(),
            Err(SchemaError::InvalidWeight { ref asset_class, .. }) if asset_class == "bonds"
        ));

        response.portfolios[0].values[1]
            .weights
            .insert("bonds".to_string(), 0.38);
        response.portfolios[0].values[0].portfolio_value = -1.0;
        assert!(matches!(
            response.validate(),
            Err(SchemaError::InvalidPortfolioValue { portfolio_id: 1, .. })
        ));
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::parse("2022-02-15", "2022-03-15").unwrap();
        assert!(!range.is_inverted());
        assert_eq!(range.to_string(), "2022-02-15..2022-03-15");

        let range = DateRange::parse("2022-03-15", "2022-02-15").unwrap();
        assert!(range.is_inverted());

        assert!(DateRange::parse("15/02/2022", "2022-03-15").is_err());
    }
}
