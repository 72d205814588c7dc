//! Suggest command - autocomplete preview

use anyhow::Result;
use atlas_search_client::SearchService;
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonSuggestOutput {
    prefix: String,
    count: usize,
    suggestions: Vec<Suggestion>,
}

#[derive(Debug, Serialize)]
struct Suggestion {
    title: String,
    content_type: String,
    city: Option<String>,
}

/// Show what the app's search-as-you-type would offer for a prefix
pub async fn run(prefix: &str, limit: usize, format: &str) -> Result<()> {
    let service = SearchService::from_env()?;
    let results = service.suggest(prefix, limit).await?;

    if format == "json" {
        let output = JsonSuggestOutput {
            prefix: prefix.to_string(),
            count: results.len(),
            suggestions: results
                .iter()
                .map(|r| Suggestion {
                    title: r.title.clone(),
                    content_type: r.content_type.to_string(),
                    city: r.city.clone(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    if results.is_empty() {
        println!(
            "  {} (prefixes shorter than 2 characters return nothing)",
            "No suggestions.".dimmed()
        );
    } else {
        println!("  Suggestions for {}:", prefix.bold());
        println!();
        for result in &results {
            let city = result
                .city
                .as_deref()
                .map(|c| format!(" · {c}"))
                .unwrap_or_default();
            println!(
                "  {} {}{}",
                "›".blue(),
                result.title,
                city.dimmed()
            );
        }
    }
    println!();

    Ok(())
}
