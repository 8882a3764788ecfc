use std::collections::HashSet;

use tracing::{debug, error, warn};

use domain_model::{Portfolio, PortfolioId, PortfolioResponse};
use viewer_chart_builder_api::{
    Axis, Canvas, ChartKind, ChartOptions, ChartSpec, Dataset, DatasetStyle, LegendPosition,
    RenderError, Tooltip, TooltipMode,
};

use crate::color::random_color;

const WEIGHTS_TITLE: &str = "Weights";
const VALUE_TITLE: &str = "Portfolio Value";
const VALUE_TENSION: f64 = 0.1;

/// Portfolios drawn and skipped by one pass of [`render_portfolios`].
///
/// A portfolio is skipped before any draw when one of its targets is
/// missing. When the value chart fails to draw, the weight chart already on
/// the canvas stays there and the portfolio is still reported as skipped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub rendered: Vec<PortfolioId>,
    pub skipped: Vec<PortfolioId>,
}

/// Stacked bars of the asset class weights over time.
///
/// Asset classes are taken from the first point. Classes showing up later are
/// dropped and classes missing later leave an empty bar, both are logged.
pub fn build_weight_chart(portfolio: &Portfolio) -> ChartSpec {
    let asset_classes = portfolio.asset_classes();
    report_asset_class_drift(portfolio, &asset_classes);

    let datasets = asset_classes
        .iter()
        .map(|asset_class| {
            let data = portfolio
                .values
                .iter()
                .map(|value| value.weights.get(*asset_class).copied())
                .collect();
            Dataset::new(
                asset_class,
                data,
                DatasetStyle::Bar {
                    background: random_color(),
                },
            )
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Bar,
        labels: portfolio.labels(),
        datasets,
        options: ChartOptions {
            responsive: true,
            legend: LegendPosition::Top,
            tooltip: index_tooltip(),
            x_axis: Axis {
                stacked: true,
                ..Axis::default()
            },
            y_axis: Axis {
                stacked: true,
                begin_at_zero: true,
                title: Some(WEIGHTS_TITLE.to_string()),
            },
        },
    }
}

/// Portfolio value over time, the y axis follows the data range.
pub fn build_value_chart(portfolio: &Portfolio) -> ChartSpec {
    let data = portfolio
        .values
        .iter()
        .map(|value| Some(value.portfolio_value))
        .collect();

    ChartSpec {
        kind: ChartKind::Line,
        labels: portfolio.labels(),
        datasets: vec![Dataset::new(
            VALUE_TITLE,
            data,
            DatasetStyle::Line {
                border: random_color(),
                fill: false,
                tension: VALUE_TENSION,
            },
        )],
        options: ChartOptions {
            responsive: true,
            legend: LegendPosition::Top,
            tooltip: index_tooltip(),
            x_axis: Axis::default(),
            y_axis: Axis {
                stacked: false,
                begin_at_zero: false,
                title: Some(VALUE_TITLE.to_string()),
            },
        },
    }
}

/// Draws both charts of every portfolio. A portfolio failing to render is
/// logged and skipped, the others are still drawn.
pub fn render_portfolios(canvas: &dyn Canvas, response: &PortfolioResponse) -> RenderReport {
    let mut report = RenderReport::default();
    for portfolio in &response.portfolios {
        match render_portfolio(canvas, portfolio) {
            Ok(()) => {
                debug!("Charts of portfolio '{}' rendered", portfolio.portfolio_id);
                report.rendered.push(portfolio.portfolio_id);
            }
            Err(err) => {
                error!(
                    "Cannot render charts of portfolio '{}': {err}",
                    portfolio.portfolio_id
                );
                report.skipped.push(portfolio.portfolio_id);
            }
        }
    }
    report
}

fn render_portfolio(canvas: &dyn Canvas, portfolio: &Portfolio) -> Result<(), RenderError> {
    let weight_target = portfolio.weight_chart_target();
    let value_target = portfolio.value_chart_target();

    let missing = [&weight_target, &value_target]
        .into_iter()
        .filter(|target| !canvas.has_target(target))
        .map(String::as_str)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(RenderError::TargetNotFound(missing.join(", ")));
    }

    canvas.draw(&weight_target, build_weight_chart(portfolio))?;
    canvas.draw(&value_target, build_value_chart(portfolio))?;
    Ok(())
}

fn index_tooltip() -> Tooltip {
    Tooltip {
        mode: TooltipMode::Index,
        intersect: false,
    }
}

fn report_asset_class_drift(portfolio: &Portfolio, asset_classes: &[&str]) {
    let known: HashSet<&str> = asset_classes.iter().copied().collect();
    for value in portfolio.values.iter().skip(1) {
        for asset_class in value.weights.keys() {
            if !known.contains(asset_class.as_str()) {
                warn!(
                    "Portfolio '{}' asset class '{asset_class}' at '{}' is absent from the first point and not charted",
                    portfolio.portfolio_id, value.t
                );
            }
        }
        for asset_class in asset_classes {
            if !value.weights.contains_key(*asset_class) {
                warn!(
                    "Portfolio '{}' has no '{asset_class}' weight at '{}'",
                    portfolio.portfolio_id, value.t
                );
            }
        }
    }
}
