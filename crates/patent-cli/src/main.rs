mod app_cli;
mod bootstrap;

use app_cli::{Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("patentctl error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let app = bootstrap::App::init()?;

    match cli.command {
        Commands::Ingest(args) => {
            patent_ingest::run_ingest(
                &app.downloader,
                &app.store,
                &app.index,
                &app.embedder,
                &app.config,
                args.weeks,
                &args.cpc,
                args.since_last,
            )
            .await?;
        }
        Commands::Search(args) => {
            let result = patent_search::run_search(
                &app.index,
                &app.store,
                &app.embedder,
                &args.query,
                args.topk,
                args.topk_bm25,
                args.topk_vec,
                args.graph_expand,
            )
            .await?;
            let rendered = serde_json::to_string_pretty(&result)?;
            println!("{rendered}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("PATENTCTL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
