use clap::Parser;
use tokio::sync::watch;

use folio::infrastructure::observability::{TracingConfig, init_tracing};
use folio::presentation::{Cli, Environment, PipelineFactory, Settings, load_document, render_output};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    let tracing_config = TracingConfig {
        environment: environment.to_string(),
        ..TracingConfig::default()
    }
    .with_overrides(settings.logging.enable_json, settings.logging.filter.as_deref());
    init_tracing(&tracing_config)?;

    let pipeline = PipelineFactory::create(&settings)?;
    let document = load_document(&cli.input, cli.media_type).await?;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling");
            let _ = cancel_tx.send(true);
        }
    });

    let result = pipeline
        .run_with_cancellation(&document, cli.topic.as_deref(), cancel_rx)
        .await;

    println!("{}", render_output(&result, cli.items_only, cli.compact)?);

    if !result.success() {
        std::process::exit(1);
    }
    Ok(())
}
