//! Health check command

use anyhow::Result;
use atlas_search_client::SearchService;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Serialize)]
struct JsonHealthOutput {
    endpoint: String,
    healthy: bool,
    response_time_ms: Option<u64>,
    collections: Vec<CollectionHealth>,
}

#[derive(Debug, Serialize)]
struct CollectionHealth {
    name: String,
    reachable: bool,
    num_documents: Option<u64>,
}

/// Check the index and each collection
pub async fn run(detailed: bool, format: &str) -> Result<()> {
    let service = SearchService::from_env()?;

    if format == "json" {
        return run_json(&service).await;
    }

    println!();
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
            .blue()
    );
    println!("  {}", "🏥 Index Health Check".blue().bold());
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
            .blue()
    );
    println!();
    println!("  Endpoint: {}", service.config().endpoint.dimmed());
    println!();

    let mut all_healthy = true;

    print!("  index:     ");
    let start = Instant::now();
    match service.health().await {
        Ok(true) => {
            let time_str = if detailed {
                format!(" ({}ms)", start.elapsed().as_millis())
            } else {
                String::new()
            };
            println!("{}{}", "✓ OK".green(), time_str.dimmed());
        }
        Ok(false) => {
            println!("{}", "✗ Unhealthy".red());
            all_healthy = false;
        }
        Err(_) => {
            println!("{}", "✗ Unreachable".red());
            all_healthy = false;
        }
    }

    match service.collection_stats().await {
        Ok(stats) => {
            for info in stats {
                println!(
                    "  {:<10} {} ({} documents)",
                    format!("{}:", info.name),
                    "✓ OK".green(),
                    info.num_documents
                );
            }
        }
        Err(e) => {
            println!("  collections: {} ({e})", "✗ Error".red());
            all_healthy = false;
        }
    }

    println!();
    if all_healthy {
        println!("  {} Index healthy", "✓".green().bold());
    } else {
        println!("  {} Index has issues", "⚠".yellow().bold());
    }
    println!();

    Ok(())
}

async fn run_json(service: &SearchService) -> Result<()> {
    let start = Instant::now();
    let healthy = service.health().await.unwrap_or(false);
    let response_time_ms = u64::try_from(start.elapsed().as_millis()).ok();

    let collections = match service.collection_stats().await {
        Ok(stats) => stats
            .into_iter()
            .map(|info| CollectionHealth {
                name: info.name,
                reachable: true,
                num_documents: Some(info.num_documents),
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    let output = JsonHealthOutput {
        endpoint: service.config().endpoint.clone(),
        healthy,
        response_time_ms,
        collections,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
