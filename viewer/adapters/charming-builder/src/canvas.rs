use std::fmt::Write;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::trace;

use viewer_chart_builder_api::{Canvas, ChartBuilderApi, ChartSpec, RenderError};

use crate::builder::build_chart;

const DEFAULT_HEIGHT: u32 = 400;

pub struct CharmingBuilder {
    height: u32,
}

impl CharmingBuilder {
    pub fn new(height: u32) -> Self {
        Self { height }
    }
}

impl Default for CharmingBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HEIGHT)
    }
}

impl ChartBuilderApi for CharmingBuilder {
    fn canvas(&self) -> Arc<dyn Canvas> {
        Arc::new(CharmingCanvas::new(self.height))
    }
}

struct Drawn {
    options: String,
    responsive: bool,
}

/// Charts of one page keyed by target id, in mount order.
pub struct CharmingCanvas {
    height: u32,
    targets: Mutex<IndexMap<String, Option<Drawn>>>,
}

impl CharmingCanvas {
    pub fn new(height: u32) -> Self {
        Self {
            height,
            targets: Mutex::new(IndexMap::new()),
        }
    }
}

impl Canvas for CharmingCanvas {
    fn mount(&self, targets: &[String]) {
        let mut mounted = self.targets.lock();
        for target in targets {
            mounted.entry(target.clone()).or_insert(None);
        }
    }

    fn has_target(&self, target: &str) -> bool {
        self.targets.lock().contains_key(target)
    }

    fn draw(&self, target: &str, chart: ChartSpec) -> Result<(), RenderError> {
        let mut targets = self.targets.lock();
        let slot = targets
            .get_mut(target)
            .ok_or_else(|| RenderError::TargetNotFound(target.to_string()))?;
        let options = inline_script(&build_chart(&chart).to_string());
        trace!("Chart '{target}' options: {options}");
        *slot = Some(Drawn {
            options,
            responsive: chart.options.responsive,
        });
        Ok(())
    }

    fn render(&self) -> Result<String, RenderError> {
        let targets = self.targets.lock();
        let mut html = String::new();
        for target in targets.keys() {
            writeln!(
                html,
                r#"<div id="{target}" class="chart" style="width:100%;height:{}px;"></div>"#,
                self.height
            )
            .map_err(|err| RenderError::Render(err.to_string()))?;
        }

        let drawn = targets
            .iter()
            .filter_map(|(target, drawn)| drawn.as_ref().map(|drawn| (target, drawn)))
            .collect::<Vec<_>>();
        if drawn.is_empty() {
            return Ok(html);
        }

        html.push_str("<script>\n");
        for (target, drawn) in drawn {
            writeln!(
                html,
                "(function () {{\n  const chart = echarts.init(document.getElementById('{target}'));\n  chart.setOption({});",
                drawn.options
            )
            .map_err(|err| RenderError::Render(err.to_string()))?;
            if drawn.responsive {
                html.push_str("  window.addEventListener('resize', () => chart.resize());\n");
            }
            html.push_str("})();\n");
        }
        html.push_str("</script>\n");
        Ok(html)
    }
}

/// JSON safe to place inside a `<script>` element: `<` becomes the `\u003c`
/// escape, so no label can close the element or open a comment.
fn inline_script(json: &str) -> String {
    json.replace('<', "\\u003c")
}
