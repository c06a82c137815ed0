use anyhow::Context;
use clap::Parser;
use docrag::cli::commands::{Cli, Commands};
use docrag::config::Config;
use docrag::server::router::router;
use docrag::DocRag;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    docrag::logging::init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let app = DocRag::new(&config).context("Failed to initialize docrag")?;

    match cli.command {
        Commands::Serve { port } => {
            let bind_addr = format!("{}:{}", config.bind, port.unwrap_or(config.port));
            let listener = TcpListener::bind(&bind_addr)
                .await
                .with_context(|| format!("Failed to bind to {bind_addr}"))?;
            tracing::info!("Server running on {}", listener.local_addr()?);

            axum::serve(listener, router(Arc::new(app)))
                .await
                .context("Server error")?;
        }
        Commands::Insert { json } => {
            let id = app.insert(json.as_bytes()).await?;
            println!("Document inserted successfully ({id})");
        }
        Commands::Find { query, limit } => {
            let outcome = app.find(&query, limit).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}
