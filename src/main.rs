use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pulso::api::storage::{GuestUrlSigner, StorageClient};
use pulso::config::Config;
use pulso::services::chart_service::ChartView;
use pulso::services::{publish, DataService, PageShell};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pulso=debug,reqwest=warn,hyper=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("📈 Starting Pulso...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let signer = match GuestUrlSigner::new(&config.storage_base_url, &config.access_prefix) {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid storage location: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let client = StorageClient::new(Box::new(signer), config.signed_url_expiry);
    let service = DataService::new(client, config.keys.clone());

    let mut page = PageShell::new(config.locale);
    page.mount(&service).await;
    let view = page.render();

    if let Some(header) = &view.header {
        println!("{}", header.title);
        println!("{}", header.subtitle);
    }

    let code = match &view.body {
        ChartView::Chart(_) => {
            match publish(&view, &config.output_dir, config.chart_width, config.chart_height) {
                Ok(files) => {
                    println!("{}", files.config.display());
                    println!("{}", files.image.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("Failed to write chart: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        ChartView::Error(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
        ChartView::Loading => ExitCode::FAILURE,
    };

    println!("{}", view.footer);
    code
}
