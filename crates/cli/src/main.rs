//! `jobpulse`: enrich a list of job listing URLs from the command line.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde_json::{Value, json};

use jobpulse_client::{ClientConfig, HttpMetricsClient, SessionContext};
use jobpulse_core::JobId;
use jobpulse_enricher::{
    ConfigUpdateHandler, Enricher, EnricherConfig, InMemoryConfigStore, InMemoryDocument, IndicatorView,
    LIMIT_KEY, SESSION_TOKEN_KEY,
};
use jobpulse_observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "jobpulse", about = "Annotate job listings with applicant, view and age metrics")]
struct Args {
    /// Applicant threshold; counts below it are highlighted.
    #[arg(long, env = "JOBPULSE_LIMIT")]
    limit: Option<String>,

    /// Session token sent as the CSRF header.
    #[arg(long, env = "JOBPULSE_SESSION_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Keep watching for this many seconds after the initial pass.
    #[arg(long, value_name = "SECS")]
    watch: Option<u64>,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Listing URLs (job view pages or search pages with `currentJobId`).
    #[arg(required = true)]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jobpulse_observability::init_with(LogFormat::Pretty);
    let args = Args::parse();

    let store = Arc::new(InMemoryConfigStore::new());
    if let Some(limit) = &args.limit {
        store.set(LIMIT_KEY, Value::String(limit.clone()));
    }
    if let Some(token) = &args.token {
        store.set(SESSION_TOKEN_KEY, Value::String(token.clone()));
    }

    let document = Arc::new(InMemoryDocument::new());
    let entries: Vec<_> = args
        .urls
        .iter()
        .map(|url| (url.clone(), document.add_listing(url.clone())))
        .collect();

    let session = SessionContext::new();
    let client_config = ClientConfig::from_env().context("invalid client configuration")?;
    let client = HttpMetricsClient::new(client_config, session.clone()).context("building HTTP client")?;
    let enricher_config = EnricherConfig::from_env().context("invalid enricher configuration")?;

    let enricher = Enricher::new(document.clone(), Arc::new(client), enricher_config);
    let handler = ConfigUpdateHandler::new(enricher, store, session);

    if !handler.refresh_session().await {
        tracing::warn!("no session token; every listing will show as unavailable");
    }

    match args.watch {
        Some(secs) => {
            let (_, pass, watcher) = handler.start().await;
            pass.settle().await;
            tokio::time::sleep(Duration::from_secs(secs)).await;
            watcher.shutdown().await;
        }
        None => {
            let threshold = handler.resolve_threshold().await;
            let report = handler.enricher().scan(threshold).settle().await;
            tracing::info!(?report, "enrichment finished");
        }
    }

    let rows: Vec<Value> = entries
        .iter()
        .map(|(url, entry)| {
            let view = document.indicator_view(*entry);
            json!({
                "url": url,
                "jobId": JobId::from_href(url).map(|id| id.to_string()),
                "summary": view.as_ref().map(IndicatorView::summary),
                "indicator": view.as_ref().map(IndicatorView::styled),
            })
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            let summary = row["summary"].as_str().unwrap_or("(no job id)");
            println!("{}\t{}", row["url"].as_str().unwrap_or_default(), summary);
        }
    }

    Ok(())
}
