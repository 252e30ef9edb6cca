//! naviguide: route browser and offline sync CLI.

use clap::{Parser, Subcommand};
use naviguide::config::Config;
use naviguide::navigation::{self, DEFAULT_ARRIVAL_RADIUS_M, NavigationLinks, Position};
use naviguide::{Fetched, NaviguideError, Route};

/// Naviguide CLI
#[derive(Parser)]
#[command(name = "naviguide")]
#[command(version = naviguide::PKG_VERSION)]
#[command(about = "Browse touring routes and keep them available offline")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "NAVIGUIDE_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Route API base URL (overrides the config file).
    #[arg(long, env = "NAVIGUIDE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List routes
    Routes {
        /// Bypass the cache and refresh every route from the API
        #[arg(long)]
        refresh: bool,
    },

    /// Show a route and its waypoints
    Route {
        /// Route id
        id: u64,
    },

    /// Download every route for offline use
    Sync,

    /// Remove all cached routes
    Clear,

    /// Print navigation links for a waypoint
    Navigate {
        /// Route id
        route: u64,
        /// Waypoint id
        waypoint: u64,
    },

    /// List waypoints near a position
    Nearby {
        /// Route id
        route: u64,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in metres
        #[arg(long, default_value_t = 1_000.0)]
        radius: f64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    let service = config.service_builder().build()?;

    match args.command {
        Command::Routes { refresh } => {
            let routes = if refresh {
                Fetched::remote(service.force_refresh_routes().await?)
            } else {
                service.fetch_all_routes().await?
            };
            if routes.is_fallback() {
                eprintln!("offline: showing cached routes");
            }
            for route in &routes.value {
                println!("{:>5}  {}", route.id, route.name);
            }
        }

        Command::Route { id } => {
            let route = service.fetch_route_details(id).await?.into_inner();
            print_route(&route);
        }

        Command::Sync => {
            let report = service.synchronize_all().await?;
            println!("synced {}/{} routes", report.synced.len(), report.routes);
            for (id, error) in &report.failed {
                eprintln!("route {id}: {error}");
            }
            report.into_result()?;
        }

        Command::Clear => {
            service.clear_cache().await?;
            println!("cache cleared");
        }

        Command::Navigate { route, waypoint } => {
            let route = service.fetch_route_details(route).await?.into_inner();
            let wp = route.waypoint(waypoint).ok_or_else(|| {
                NaviguideError::NotFound(format!("waypoint {waypoint} in route {}", route.id))
            })?;
            let links = NavigationLinks::for_waypoint(wp);
            println!("{}", links.native);
            println!("{}", links.web);
        }

        Command::Nearby {
            route,
            lat,
            lng,
            radius,
        } => {
            let route = service.fetch_route_details(route).await?.into_inner();
            let here = Position::new(lat, lng);
            let near = navigation::waypoints_within(&route, here, radius);
            if near.is_empty() {
                println!("no waypoints within {radius} m");
            }
            for d in near {
                let marker = if d.distance_m <= DEFAULT_ARRIVAL_RADIUS_M {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{marker} {:>3}. {:<30} {:>8.0} m",
                    d.position, d.waypoint.name, d.distance_m
                );
            }
        }
    }

    Ok(())
}

fn print_route(route: &Route) {
    println!("{}: {}", route.id, route.name);
    if !route.description.is_empty() {
        println!("{}", route.description);
    }
    println!();
    for (i, wp) in route.waypoints.iter().enumerate() {
        println!("{:>3}. {} ({:.5}, {:.5})", i + 1, wp.name, wp.lat, wp.lng);
        if !wp.description.is_empty() {
            println!("     {}", wp.description);
        }
    }
}
