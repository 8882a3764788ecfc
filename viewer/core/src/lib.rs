pub mod api;
pub mod chart;
pub mod color;
pub mod dashboard;
mod page;

pub use api::{FormDefaults, Viewer};
pub use dashboard::{Dashboard, DashboardError, FetchHandle, FetchOutcome, ViewModel, ViewState};
