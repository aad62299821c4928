pub mod chart_service;
pub mod data_service;
pub mod page_service;
pub mod series_builder;

pub use chart_service::{build_chart_config, render_svg, ChartRenderer, ChartView, Tooltip};
pub use data_service::{DataFetchError, DataService, ObjectKeys};
pub use page_service::{publish, PageShell, PageState, PageView};
pub use series_builder::{build_series, BuilderError};
