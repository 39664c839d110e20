//! CLI client: submit transaction rows to a running prediction service
//! and print what each response did to the in-memory page.

use anyhow::Result;
use clap::Parser;
use fraudscope::config::Config;
use fraudscope::fragment::{HIDDEN_CLASS, PROBABILITY_TEXT_ID, RESULT_BOX_ID, RESULT_TEXT_ID};
use fraudscope::page::{InMemoryPage, PageSurface};
use fraudscope::schemas::{FormPayload, TransactionRecord};
use fraudscope::submit::SubmissionHandler;
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(
    name = "predict",
    about = "Submit transactions from a CSV file to a fraudscope service"
)]
struct Cli {
    /// CSV file with Time,V1..V28,Amount headers
    #[arg(long)]
    csv: std::path::PathBuf,

    /// Base URL of the prediction service (overrides FRAUD_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fraudscope::load_env();
    let cli = Cli::parse();

    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(config.runtime.log_level.clone())
        .with_ansi(false)
        .init();

    let endpoint = cli
        .endpoint
        .unwrap_or_else(|| config.runtime.endpoint.clone());
    let handler = SubmissionHandler::new(&endpoint, config.runtime.http_timeout_ms)?;
    let page = Mutex::new(InMemoryPage::prediction_page());

    println!("🚀 Submitting transactions from {} to {}", cli.csv.display(), endpoint);

    let mut reader = csv::Reader::from_path(&cli.csv)?;
    let mut row = 0usize;
    for record in reader.deserialize::<TransactionRecord>() {
        let record = record?;
        row += 1;

        let payload = FormPayload::from(&record);
        let outcome = handler.submit(&payload, &page).await?;

        if outcome.applied {
            println!(
                "row {:>4}: {} (probability {})",
                row,
                outcome.result.as_deref().unwrap_or(""),
                outcome.probability.as_deref().unwrap_or("")
            );
        } else {
            println!("row {:>4}: no prediction in response", row);
        }
    }

    let page = page.lock().await;
    if !page.has_class(RESULT_BOX_ID, HIDDEN_CLASS) {
        println!("\n📋 Final page state:");
        println!(
            "  {}: {}",
            RESULT_TEXT_ID,
            page.element_text(RESULT_TEXT_ID).unwrap_or_default()
        );
        println!(
            "  {}: {}",
            PROBABILITY_TEXT_ID,
            page.element_text(PROBABILITY_TEXT_ID).unwrap_or_default()
        );
    }

    Ok(())
}
