//! Search command

use anyhow::Result;
use atlas_geo::{km_to_miles, Coordinate};
use atlas_search_client::{
    ContentType, GeoOrigin, SearchFilters, SearchRequest, SearchResponse, SearchService,
    UnifiedResult,
};
use owo_colors::OwoColorize;

/// Run a unified search from the terminal
#[allow(clippy::too_many_arguments)]
pub async fn run(
    query: &str,
    types: Option<&str>,
    origin: Option<(f64, f64)>,
    radius: Option<f64>,
    limit: usize,
    categories: Option<&str>,
    format: &str,
    verbose: bool,
) -> Result<()> {
    let service = SearchService::from_env()?;

    let mut request = SearchRequest::new(query).with_limit(limit);

    if let Some(types) = types {
        request = request.with_types(parse_types(types)?);
    }

    if let Some((lat, lng)) = origin {
        let coordinate = Coordinate::try_new(lat, lng)?;
        let mut geo = GeoOrigin::new(coordinate);
        if let Some(radius) = radius {
            geo = geo.with_radius_km(radius);
        }
        request = request.with_origin(geo);
    }

    if let Some(categories) = categories {
        let filters = SearchFilters {
            categories: categories
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            ..SearchFilters::default()
        };
        request = request.with_filters(filters);
    }

    let response = service.search(request).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print_text(query, &response);

    if verbose {
        println!("  {}", "Session metrics".dimmed());
        println!(
            "{}",
            serde_json::to_string_pretty(&atlas_telemetry::metrics().snapshot())?
        );
    }
    Ok(())
}

fn parse_types(types: &str) -> Result<Vec<ContentType>> {
    types
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.parse::<ContentType>().map_err(Into::into))
        .collect()
}

fn print_text(query: &str, response: &SearchResponse) {
    println!();
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
            .blue()
    );
    println!("  {}", "🔎 Atlas Search".blue().bold());
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
            .blue()
    );
    println!();

    let shown_query = if query.trim().is_empty() { "*" } else { query };
    println!("  Query: {}", shown_query.bold());
    println!();

    if response.results.is_empty() {
        println!("  {}", "No results.".dimmed());
    } else {
        for (index, result) in response.results.iter().enumerate() {
            print_result(index + 1, result);
        }
    }

    println!();
    let cache_note = if response.cache_hit { " (cached)" } else { "" };
    println!(
        "  {} of {} results in {}ms{}",
        response.results.len(),
        response.total_found,
        response.elapsed_ms,
        cache_note.dimmed()
    );

    if response.is_degraded() {
        let names: Vec<String> = response
            .failed_collections
            .iter()
            .map(ToString::to_string)
            .collect();
        println!(
            "  {} Partial results: {} unavailable",
            "⚠".yellow().bold(),
            names.join(", ")
        );
    }
    println!();
}

fn print_result(rank: usize, result: &UnifiedResult) {
    let tag = match result.content_type {
        ContentType::Place => "place".green().to_string(),
        ContentType::Event => "event".magenta().to_string(),
        ContentType::Article => "article".cyan().to_string(),
    };

    let mut line = format!("  {rank:>2}. [{tag}] {}", result.title.bold());
    if let Some(distance) = result.distance_km {
        line.push_str(&format!(
            " · {distance:.1} km ({:.1} mi)",
            km_to_miles(distance)
        ));
    }
    println!("{line}");

    if let Some(description) = &result.description {
        println!("      {}", description.dimmed());
    }
    println!(
        "      {}",
        format!("score {:.0}", result.final_score).dimmed()
    );
}
