use anyhow::{Context, Result};
use clap::Parser;
use pdfsmith::Engines;
use pdfsmith_api::{app, AppState, Cli};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdfsmith_api=debug,pdfsmith=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let engine_config = cli.engine_config();
    let service_config = cli.service_config();
    info!(
        qpdf = %engine_config.tools.qpdf.display(),
        pdftoppm = %engine_config.tools.pdftoppm.display(),
        tesseract = %engine_config.tools.tesseract.display(),
        soffice = %engine_config.tools.soffice.display(),
        dpi = engine_config.dpi,
        ocr_language = %engine_config.ocr_language,
        scratch = %engine_config.scratch_root.display(),
        "engines configured"
    );

    let state = AppState::new(Engines::system(&engine_config), service_config);

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;

    info!("pdfsmith API listening on http://{}", cli.bind);

    axum::serve(listener, app(state))
        .await
        .context("server terminated")?;
    Ok(())
}
