mod builder;
mod canvas;

pub use builder::build_chart;
pub use canvas::{CharmingBuilder, CharmingCanvas};
