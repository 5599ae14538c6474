//! CLI entry point for the NexTrip client.
//!
//! Lists providers, routes, stops and departures from the Metro Transit
//! NexTrip service. Without a subcommand it runs the demonstration fetch.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nextrip::{
    config::{ClientConfig, parse_timeout},
    infra::nextrip::NexTripClient,
    models::RouteId,
    output::{
        append_departures, format_departure, format_provider, format_route, format_stop,
        sorted_providers, to_json,
    },
    services::transit_api::{TransitApi, or_report},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEMO_ROUTE: RouteId = RouteId(902);
const DEMO_DIRECTION: i64 = 1;
const DEMO_STOP: &str = "EABK";

#[derive(Parser)]
#[command(name = "nextrip")]
#[command(about = "Fetch real-time transit data from Metro Transit NexTrip", long_about = None)]
struct Cli {
    /// API root, overrides NEXTRIP_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (0 disables), overrides NEXTRIP_TIMEOUT_SECS
    #[arg(long, global = true)]
    timeout: Option<String>,

    /// Print pretty JSON instead of text lines
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print providers, the first route and departures for one stop
    Demo,
    /// List transit providers
    Providers,
    /// List routes
    Routes {
        /// Print at most this many routes
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List stops on a route in one direction
    Stops {
        route: i64,
        /// Service-defined direction code (e.g. 1 south, 2 east, 3 west, 4 north)
        direction: i64,
    },
    /// List upcoming departures from a stop
    Departures {
        route: i64,
        direction: i64,
        stop_id: String,

        /// CSV file to append departures to
        #[arg(long, value_name = "FILE")]
        csv: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/nextrip.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("nextrip.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(secs) = &cli.timeout {
        config.timeout = parse_timeout(secs).context("--timeout")?;
    }
    let client = NexTripClient::new(config).context("failed to build HTTP client")?;
    info!(
        base_url = %client.config().base_url,
        timeout = ?client.config().timeout,
        "NexTrip client configured"
    );

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => demo(&client, cli.json).await?,
        Commands::Providers => {
            let providers = client.list_providers().await?;
            if cli.json {
                println!("{}", to_json(&providers)?);
            } else {
                for (id, name) in sorted_providers(&providers) {
                    println!("{}", format_provider(id, name));
                }
            }
        }
        Commands::Routes { limit } => {
            let routes = client.list_routes().await?;
            let shown = &routes[..limit.unwrap_or(routes.len()).min(routes.len())];
            if cli.json {
                println!("{}", to_json(shown)?);
            } else {
                for route in shown {
                    println!("{}", format_route(route));
                }
            }
        }
        Commands::Stops { route, direction } => {
            let stops = client.list_stops(RouteId(route), direction).await?;
            if cli.json {
                println!("{}", to_json(&stops)?);
            } else {
                for stop in &stops {
                    println!("{}", format_stop(stop));
                }
            }
        }
        Commands::Departures {
            route,
            direction,
            stop_id,
            csv,
        } => {
            let route = RouteId(route);
            let departures = client.list_departures(route, direction, &stop_id).await?;
            if let Some(path) = csv {
                append_departures(&path, route, direction, &stop_id, &departures)?;
                info!(path = %path, rows = departures.len(), "Departures appended");
            }
            if cli.json {
                println!("{}", to_json(&departures)?);
            } else {
                for departure in &departures {
                    println!("{}", format_departure(departure));
                }
            }
        }
    }

    Ok(())
}

/// Fetch failures are logged and treated as empty listings here, the
/// remaining steps still run.
#[tracing::instrument(skip(client))]
async fn demo<A: TransitApi>(client: &A, json: bool) -> Result<()> {
    let (providers, routes) = tokio::join!(client.list_providers(), client.list_routes());
    let providers = or_report(providers, "providers");
    let routes = or_report(routes, "routes");

    if json {
        println!("{}", to_json(&providers)?);
    } else {
        for (id, name) in sorted_providers(&providers) {
            println!("{}", format_provider(id, name));
        }
    }

    match routes.first() {
        Some(route) if json => println!("{}", to_json(route)?),
        Some(route) => println!("{}", format_route(route)),
        None => warn!("No routes returned"),
    }

    let departures = or_report(
        client
            .list_departures(DEMO_ROUTE, DEMO_DIRECTION, DEMO_STOP)
            .await,
        "departures",
    );
    if json {
        println!("{}", to_json(&departures)?);
    } else {
        for departure in &departures {
            println!("{}", format_departure(departure));
        }
    }

    Ok(())
}
