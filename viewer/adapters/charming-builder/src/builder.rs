use charming::component::{Axis, Legend};
use charming::datatype::DataPoint;
use charming::element::{
    AreaStyle, AxisPointer, AxisPointerType, AxisType, ItemStyle, LineStyle, Tooltip, Trigger,
};
use charming::series::{Bar, Line};
use charming::Chart;

use viewer_chart_builder_api::{
    Axis as AxisOptions, ChartKind, ChartSpec, Dataset, DatasetStyle, LegendPosition,
    Tooltip as TooltipOptions, TooltipMode,
};

/// Stack shared by the bars of one chart.
const STACK: &str = "total";
/// Placeholder ECharts draws as a gap.
const EMPTY: &str = "-";

pub fn build_chart(spec: &ChartSpec) -> Chart {
    let mut chart = Chart::new();
    chart = add_legend(chart, spec);
    chart = add_tooltip(chart, spec.kind, &spec.options.tooltip);
    chart = add_x_axis(chart, &spec.labels, &spec.options.x_axis);
    chart = add_y_axis(chart, &spec.options.y_axis);
    add_series(chart, spec)
}

fn add_legend(chart: Chart, spec: &ChartSpec) -> Chart {
    let legend = spec
        .datasets
        .iter()
        .map(|dataset| dataset.label.clone())
        .collect();
    let legend = Legend::new().data(legend);
    let legend = match spec.options.legend {
        LegendPosition::Top => legend.top("top"),
    };
    chart.legend(legend)
}

fn add_tooltip(chart: Chart, kind: ChartKind, tooltip: &TooltipOptions) -> Chart {
    let tooltip = match tooltip.mode {
        TooltipMode::Index => {
            let pointer = match kind {
                ChartKind::Bar => AxisPointerType::Shadow,
                ChartKind::Line => AxisPointerType::Line,
            };
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(pointer))
        }
    };
    chart.tooltip(tooltip)
}

fn add_x_axis(chart: Chart, labels: &[String], options: &AxisOptions) -> Chart {
    let mut axis = Axis::new().type_(AxisType::Category).data(labels.to_vec());
    if let Some(title) = &options.title {
        axis = axis.name(title.as_str());
    }
    chart.x_axis(axis)
}

fn add_y_axis(chart: Chart, options: &AxisOptions) -> Chart {
    // scale lets the axis leave zero out of the range
    let mut axis = Axis::new()
        .type_(AxisType::Value)
        .scale(!options.begin_at_zero);
    if let Some(title) = &options.title {
        axis = axis.name(title.as_str());
    }
    chart.y_axis(axis)
}

fn add_series(mut chart: Chart, spec: &ChartSpec) -> Chart {
    let stacked = spec.options.x_axis.stacked || spec.options.y_axis.stacked;
    for dataset in &spec.datasets {
        let data = data_points(dataset);
        chart = match &dataset.style {
            DatasetStyle::Bar { background } => {
                let mut bar = Bar::new()
                    .name(dataset.label.as_str())
                    .item_style(ItemStyle::new().color(background.as_str()))
                    .data(data);
                if stacked {
                    bar = bar.stack(STACK);
                }
                chart.series(bar)
            }
            DatasetStyle::Line {
                border,
                fill,
                tension,
            } => {
                let mut line = Line::new()
                    .name(dataset.label.as_str())
                    .smooth(*tension)
                    .line_style(LineStyle::new().color(border.as_str()))
                    .item_style(ItemStyle::new().color(border.as_str()))
                    .data(data);
                if *fill {
                    line = line.area_style(AreaStyle::new());
                }
                if stacked {
                    line = line.stack(STACK);
                }
                chart.series(line)
            }
        };
    }
    chart
}

fn data_points(dataset: &Dataset) -> Vec<DataPoint> {
    dataset
        .data
        .iter()
        .map(|value| match value {
            Some(value) => DataPoint::from(*value),
            None => DataPoint::from(EMPTY),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use viewer_chart_builder_api::{ChartOptions, Color};

    use super::*;

    fn weight_chart() -> ChartSpec {
        ChartSpec {
            kind: ChartKind::Bar,
            labels: vec!["2022-02-15".to_string(), "2022-02-16".to_string()],
            datasets: vec![
                Dataset::new(
                    "stocks",
                    vec![Some(0.6), Some(0.62)],
                    DatasetStyle::Bar {
                        background: Color::new("#0A0B0C"),
                    },
                ),
                Dataset::new(
                    "bonds",
                    vec![Some(0.4), None],
                    DatasetStyle::Bar {
                        background: Color::new("#D0E0F0"),
                    },
                ),
            ],
            options: ChartOptions {
                responsive: true,
                legend: LegendPosition::Top,
                tooltip: TooltipOptions {
                    mode: TooltipMode::Index,
                    intersect: false,
                },
                x_axis: AxisOptions {
                    stacked: true,
                    ..AxisOptions::default()
                },
                y_axis: AxisOptions {
                    stacked: true,
                    begin_at_zero: true,
                    title: Some("Weights".to_string()),
                },
            },
        }
    }

    #[test]
    fn test_build_stacked_bar_chart() {
        let options = build_chart(&weight_chart()).to_string();
        assert!(options.contains("\"bar\""));
        assert!(options.contains("\"stocks\""));
        assert!(options.contains("\"bonds\""));
        assert!(options.contains("\"2022-02-16\""));
        assert!(options.contains("\"total\""));
        assert!(options.contains("#0A0B0C"));
        assert!(options.contains("\"Weights\""));
        assert!(options.contains("\"-\""));
    }

    #[test]
    fn test_build_line_chart() {
        let mut spec = weight_chart();
        spec.kind = ChartKind::Line;
        spec.datasets = vec![Dataset::new(
            "Portfolio Value",
            vec![Some(1000.0), Some(1010.0)],
            DatasetStyle::Line {
                border: Color::new("#123456"),
                fill: false,
                tension: 0.1,
            },
        )];
        spec.options.x_axis = AxisOptions::default();
        spec.options.y_axis = AxisOptions {
            stacked: false,
            begin_at_zero: false,
            title: Some("Portfolio Value".to_string()),
        };

        let options = build_chart(&spec).to_string();
        assert!(options.contains("\"line\""));
        assert!(options.contains("\"Portfolio Value\""));
        assert!(options.contains("#123456"));
        assert!(!options.contains("\"total\""));
    }
}
