use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use geocode::{AddressResolver, BackendSource, GeoSource, NominatimSource};
use locations::LocationConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Resolve an address or preview autocomplete suggestions against the
/// configured geocoding sources. Reads MEALMAP_BACKEND_URL,
/// MEALMAP_NOMINATIM_URL and MEALMAP_USER_AGENT.
#[derive(Parser)]
#[command(name = "mealmap")]
struct Args {
    /// Address text to resolve or complete.
    query: String,

    /// List suggestions instead of resolving to a single address.
    #[arg(long)]
    suggest: bool,

    /// Maximum number of suggestions.
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = LocationConfig::from_env();
    let resolver = build_resolver(&config);

    if args.suggest {
        run_suggest(&resolver, &args).await
    } else {
        run_resolve(&resolver, &args).await
    }
}

fn build_resolver(config: &LocationConfig) -> AddressResolver {
    let mut sources: Vec<Arc<dyn GeoSource>> = Vec::new();
    if let Some(base_url) = &config.backend_api_url {
        sources.push(Arc::new(BackendSource::new(
            base_url.clone(),
            config.request_timeout,
        )));
    }
    sources.push(Arc::new(NominatimSource::new(
        config.nominatim_url.clone(),
        config.user_agent.clone(),
        config.request_timeout,
    )));
    AddressResolver::new(sources)
}

async fn run_resolve(resolver: &AddressResolver, args: &Args) -> ExitCode {
    match resolver.resolve_address(&args.query).await {
        Ok(resolved) => {
            let payload = serde_json::json!({
                "lat": resolved.point.lat,
                "lng": resolved.point.lng,
                "formatted_address": resolved.formatted_address,
                "source": resolved.source_id,
                "place_id": resolved.external_id,
            });
            println!("{payload}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_suggest(resolver: &AddressResolver, args: &Args) -> ExitCode {
    let cancel = CancellationToken::new();
    match resolver.suggest(&args.query, args.limit, &cancel).await {
        Ok(items) => {
            for suggestion in items {
                let payload = serde_json::json!({
                    "lat": suggestion.address.point.lat,
                    "lng": suggestion.address.point.lng,
                    "formatted_address": suggestion.address.formatted_address,
                    "source": suggestion.address.source_id,
                    "place_id": suggestion.address.external_id,
                    "name": suggestion.name,
                });
                println!("{payload}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
