//! Stats command - collection sizes

use anyhow::Result;
use atlas_search_client::SearchService;
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonStatsOutput {
    endpoint: String,
    total_documents: u64,
    collections: Vec<CollectionCount>,
}

#[derive(Debug, Serialize)]
struct CollectionCount {
    name: String,
    num_documents: u64,
}

/// Show document counts for every collection
pub async fn run(format: &str) -> Result<()> {
    let service = SearchService::from_env()?;
    let stats = service.collection_stats().await?;
    let total: u64 = stats.iter().map(|info| info.num_documents).sum();

    if format == "json" {
        let output = JsonStatsOutput {
            endpoint: service.config().endpoint.clone(),
            total_documents: total,
            collections: stats
                .into_iter()
                .map(|info| CollectionCount {
                    name: info.name,
                    num_documents: info.num_documents,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
            .blue()
    );
    println!("  {}", "📊 Collection Stats".blue().bold());
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
            .blue()
    );
    println!();

    println!("  {:<12} {}", "Collection".dimmed(), "Documents".dimmed());
    for info in &stats {
        println!("  {:<12} {}", info.name, info.num_documents);
    }

    println!();
    println!("  Total: {}", total.to_string().bold());
    println!();

    Ok(())
}
