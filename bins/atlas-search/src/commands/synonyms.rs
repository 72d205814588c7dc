//! Synonyms command - curated synonym administration

use anyhow::Result;
use atlas_search_client::synonyms::{
    clear_place_synonyms, configure_place_synonyms, SynonymSyncReport, PLACE_SYNONYMS,
};
use atlas_search_client::IndexClient;
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonSyncOutput {
    configured: Vec<String>,
    failed: Vec<FailedSet>,
    complete: bool,
}

#[derive(Debug, Serialize)]
struct FailedSet {
    id: String,
    error: String,
}

/// List the curated sets without touching the index
pub fn list(format: &str) -> Result<()> {
    if format == "json" {
        let sets: Vec<serde_json::Value> = PLACE_SYNONYMS
            .iter()
            .map(|set| {
                serde_json::json!({
                    "id": set.id,
                    "root": set.root,
                    "synonyms": set.synonyms,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&sets)?);
        return Ok(());
    }

    println!();
    println!("  {} curated synonym sets:", PLACE_SYNONYMS.len());
    println!();
    for set in PLACE_SYNONYMS {
        println!(
            "  {} {} {}",
            set.root.bold(),
            "→".dimmed(),
            set.synonyms.join(", ").dimmed()
        );
    }
    println!();

    Ok(())
}

/// Upload every curated set to the index
pub async fn sync(format: &str) -> Result<()> {
    let client = IndexClient::new()?;
    if format != "json" {
        println!();
        println!("  Configuring {} synonym sets...", PLACE_SYNONYMS.len());
    }
    let report = configure_place_synonyms(&client).await;
    print_report(&report, "configured", format)
}

/// Delete every curated set from the index
pub async fn clear(format: &str) -> Result<()> {
    let client = IndexClient::new()?;
    if format != "json" {
        println!();
        println!("  Clearing {} synonym sets...", PLACE_SYNONYMS.len());
    }
    let report = clear_place_synonyms(&client).await;
    print_report(&report, "deleted", format)
}

fn print_report(report: &SynonymSyncReport, verb: &str, format: &str) -> Result<()> {
    if format == "json" {
        let output = JsonSyncOutput {
            configured: report.configured.clone(),
            failed: report
                .failed
                .iter()
                .map(|(id, error)| FailedSet {
                    id: id.clone(),
                    error: error.clone(),
                })
                .collect(),
            complete: report.is_complete(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!();
        for id in &report.configured {
            println!("  {} {id}", "✓".green());
        }
        for (id, error) in &report.failed {
            println!("  {} {id}: {error}", "✗".red());
        }
        println!();
        if report.is_complete() {
            println!("  {} All sets {verb}", "✓".green().bold());
        } else {
            println!(
                "  {} {} of {} sets {verb}",
                "⚠".yellow().bold(),
                report.configured.len(),
                report.configured.len() + report.failed.len()
            );
        }
        println!();
    }

    if report.is_complete() {
        Ok(())
    } else {
        anyhow::bail!("{} synonym sets failed", report.failed.len())
    }
}
