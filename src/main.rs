use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use clap::{Parser, Subcommand};
use serde_json::json;

use consignment_directory::loader::{Fallback, Origin};
use consignment_directory::nearby::{find_nearby, NearbyStrategy};
use consignment_directory::settings::Settings;
use consignment_directory::{render, server, views, Directory};

#[derive(Parser)]
#[command(name = "consignment_directory", about = "Consignment store directory site")]
struct Cli {
    /// Store data file (.json, .csv, .tsv, .xlsx); overrides discovery
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,
    /// Use the bundled sample stores when no data file loads
    #[arg(long, global = true)]
    sample: bool,
    /// Print machine-readable JSON instead of tables (stats, nearby, search)
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the directory over HTTP
    Serve {
        /// Bind address (default from settings)
        #[arg(long)]
        host: Option<String>,
        /// Port to try before the configured ones
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show load and hierarchy statistics
    Stats,
    /// States and their cities overview table
    Overview {
        /// Only this state (slug)
        #[arg(short, long)]
        state: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Cities near a city in the same state
    Nearby {
        /// State slug (e.g. "illinois")
        state: String,
        /// City slug (e.g. "springfield")
        city: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        #[arg(long, value_enum)]
        strategy: Option<NearbyStrategy>,
    },
    /// Search stores, cities and states
    Search {
        query: String,
        /// Max store rows to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Print sitemap.xml to stdout
    Sitemap {
        /// Absolute site URL used in <loc> entries
        #[arg(long, default_value = "http://localhost:5000")]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(path) = cli.data {
        settings.data_path = Some(path);
    }
    if cli.sample {
        settings.fallback = Fallback::Sample;
    }

    let dir = Directory::load(&settings);

    let result = match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.ports.retain(|&p| p != port);
                settings.server.ports.insert(0, port);
            }
            server::serve(&settings, dir).await
        }
        Commands::Stats => {
            let h = dir.hierarchy();
            let origin = match dir.origin() {
                Origin::File(path) => path.display().to_string(),
                Origin::Sample => "bundled sample".to_string(),
                Origin::Empty => "none".to_string(),
            };
            if cli.json {
                let summary = json!({
                    "source": origin,
                    "error": dir.load_error().map(|e| e.to_string()),
                    "rows": dir.table().len(),
                    "skipped": dir.skipped_rows(),
                    "excluded": h.excluded(),
                    "states": h.state_count(),
                    "cities": h.city_count(),
                    "stores": h.store_count(),
                    "reviews": h.total_reviews(),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }
            println!("Source:    {}", origin);
            if let Some(e) = dir.load_error() {
                println!("Error:     {}", e);
            }
            println!("Rows:      {}", dir.table().len());
            println!("Skipped:   {}", dir.skipped_rows());
            println!("Excluded:  {}", h.excluded());
            println!("States:    {}", h.state_count());
            println!("Cities:    {}", h.city_count());
            println!("Stores:    {}", h.store_count());
            println!("Reviews:   {}", h.total_reviews());
            Ok(())
        }
        Commands::Overview { state, limit } => {
            let h = dir.hierarchy();
            let states: Vec<_> = match &state {
                Some(slug) => h.state(slug).into_iter().collect(),
                None => h.states().iter().collect(),
            };
            if states.is_empty() {
                println!("No states found.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<20} | {:<24} | {:>6} | {:>8} | {:<24}",
                "#", "State", "City", "Stores", "Reviews", "Top store"
            );
            println!("{}", "-".repeat(100));

            let mut shown = 0;
            'outer: for s in &states {
                for c in &s.cities {
                    if shown == limit {
                        break 'outer;
                    }
                    shown += 1;
                    let top = c.stores.first().map(|st| st.name.as_str()).unwrap_or("-");
                    println!(
                        "{:>3} | {:<20} | {:<24} | {:>6} | {:>8} | {:<24}",
                        shown,
                        truncate(&s.name, 20),
                        truncate(&c.name, 24),
                        c.store_count,
                        c.total_reviews,
                        truncate(top, 24)
                    );
                }
            }

            println!("\n{} cities | url: /state/<state>/<city>", shown);
            Ok(())
        }
        Commands::Nearby { state, city, limit, strategy } => {
            let limit = limit.unwrap_or(settings.nearby.limit);
            let strategy = strategy.unwrap_or(settings.nearby.strategy);
            let nearby = find_nearby(dir.hierarchy(), &state, &city, limit, strategy);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&nearby)?);
                return Ok(());
            }
            if nearby.is_empty() {
                println!("No nearby cities for {}/{}.", state, city);
                return Ok(());
            }
            for (i, c) in nearby.iter().enumerate() {
                println!(
                    "{:>3}. {:<24} {:>4} stores  /state/{}/{}",
                    i + 1,
                    truncate(&c.name, 24),
                    c.store_count,
                    state,
                    c.slug
                );
            }
            Ok(())
        }
        Commands::Search { query, limit } => {
            let results = views::search(&dir, &query);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }
            if results.is_empty() {
                println!("No matches for \"{}\".", query.trim());
                return Ok(());
            }
            for s in &results.states {
                println!("state  {:<32} /state/{}", s.name, s.slug);
            }
            for c in &results.cities {
                println!(
                    "city   {:<32} /state/{}/{}",
                    format!("{}, {}", c.name, c.state),
                    c.state_slug,
                    c.city_slug
                );
            }
            for st in results.stores.iter().take(limit) {
                println!(
                    "store  {:<32} {:.1} ({}) {}, {}",
                    truncate(&st.name, 32),
                    st.rating,
                    st.review_count,
                    st.city,
                    st.state
                );
            }
            println!("\n{} results", results.total());
            Ok(())
        }
        Commands::Sitemap { base_url } => {
            let today = Local::now().date_naive();
            let entries = views::sitemap_entries(dir.hierarchy(), &base_url, today);
            println!("{}", render::sitemap_xml(&entries)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
