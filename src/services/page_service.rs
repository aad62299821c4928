//! Page shell: loads once, then composes header, chart and footer

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use super::chart_service::{render_svg, ChartRenderer, ChartView, RenderError};
use super::data_service::DataService;
use crate::api::storage::ObjectFetcher;
use crate::models::ForecastDataset;
use crate::utils::{error_chain, DisplayLocale};

pub const TITLE: &str = "Pulso Argentino";
pub const LOAD_ERROR_MESSAGE: &str =
    "Error al cargar los datos. Por favor, intente de nuevo más tarde.";
const FOOTER: &str = "Pulso Argentino · Pronóstico del dólar oficial";

#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    Loading,
    Ready(Arc<ForecastDataset>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: &'static str,
    pub subtitle: String,
}

/// Everything the page shows for the current state
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// Present only once the prediction is loaded
    pub header: Option<Header>,
    pub body: ChartView,
    pub footer: &'static str,
}

pub struct PageShell {
    state: PageState,
    renderer: ChartRenderer,
    locale: DisplayLocale,
    mounted: bool,
}

impl PageShell {
    pub fn new(locale: DisplayLocale) -> Self {
        Self {
            state: PageState::Loading,
            renderer: ChartRenderer::new(locale),
            locale,
            mounted: false,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Load both documents and settle into `Ready` or `Error`
    ///
    /// Runs at most once per shell; later calls return the settled state.
    pub async fn mount<F: ObjectFetcher>(&mut self, service: &DataService<F>) -> &PageState {
        if self.mounted {
            debug!("Page already mounted, skipping load");
            return &self.state;
        }
        self.mounted = true;

        let load_id = Uuid::new_v4();
        let span = info_span!("page_load", %load_id);
        let result = service.load_all().instrument(span).await;

        self.state = match result {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                match self.renderer.render(&dataset) {
                    Ok(_) => {
                        info!("✅ Page {} ready", load_id);
                        PageState::Ready(dataset)
                    }
                    Err(e) => {
                        error!("Page {} cannot build the chart: {}", load_id, e);
                        PageState::Error(LOAD_ERROR_MESSAGE.to_string())
                    }
                }
            }
            Err(e) => {
                error!("Page {} failed to load data: {}", load_id, error_chain(&e));
                PageState::Error(LOAD_ERROR_MESSAGE.to_string())
            }
        };

        &self.state
    }

    pub fn render(&mut self) -> PageView {
        match &self.state {
            PageState::Loading => PageView {
                header: None,
                body: ChartView::Loading,
                footer: FOOTER,
            },
            PageState::Error(message) => PageView {
                header: None,
                body: ChartView::Error(message.clone()),
                footer: FOOTER,
            },
            PageState::Ready(dataset) => {
                let generated_on = self
                    .locale
                    .format_long_date(dataset.prediction.prediction_generated_on);
                let dataset = Arc::clone(dataset);
                PageView {
                    header: Some(Header {
                        title: TITLE,
                        subtitle: format!("Pronóstico generado el: {}", generated_on),
                    }),
                    body: self.renderer.view(Some(&dataset)),
                    footer: FOOTER,
                }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("page has no chart to publish")]
    NoChart,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Files written for a ready page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedFiles {
    pub config: PathBuf,
    pub image: PathBuf,
}

/// Write the chart configuration and its SVG rendering into `dir`
pub fn publish(view: &PageView, dir: &Path, width: u32, height: u32) -> Result<PublishedFiles, PublishError> {
    let ChartView::Chart(config) = &view.body else {
        return Err(PublishError::NoChart);
    };

    std::fs::create_dir_all(dir)?;

    let config_path = dir.join("chart.json");
    std::fs::write(&config_path, serde_json::to_vec_pretty(config.as_ref())?)?;

    let image_path = dir.join("chart.svg");
    std::fs::write(&image_path, render_svg(config, width, height)?)?;

    info!(
        "💾 Wrote {} and {}",
        config_path.display(),
        image_path.display()
    );

    Ok(PublishedFiles {
        config: config_path,
        image: image_path,
    })
}
