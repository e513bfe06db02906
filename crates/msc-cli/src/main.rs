use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "msc")]
#[command(about = "Market session clock: open/close state and countdowns", long_about = None)]
struct Cli {
    /// Roster paths in merge order (base -> site -> local). Built-in roster when omitted.
    #[arg(long = "roster", global = true)]
    roster_paths: Vec<String>,

    /// Pin the clock to an RFC 3339 instant, e.g. 2024-01-08T14:29:00Z
    #[arg(long, global = true)]
    at: Option<String>,

    /// Emit JSON instead of key=value lines
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every market's state and countdown, then the global next event
    Status,

    /// Print the soonest open/close across the roster
    Next,

    /// Re-evaluate the board on a fixed interval and print the headline
    Watch {
        /// Tick interval in milliseconds
        #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,

        /// Stop after this many ticks (runs until interrupted when omitted)
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Compute layered roster hash + print canonical JSON
    RosterHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::RosterHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = msc_config::load_layered_yaml(&path_refs)?;
            println!("roster_hash={}", loaded.roster_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Status => {
            let ctx = commands::Context::load(&cli.roster_paths, cli.at.as_deref())?;
            commands::board::status(&ctx, cli.json)?;
        }

        Commands::Next => {
            let ctx = commands::Context::load(&cli.roster_paths, cli.at.as_deref())?;
            commands::board::next(&ctx, cli.json)?;
        }

        Commands::Watch { interval_ms, ticks } => {
            let ctx = commands::Context::load(&cli.roster_paths, cli.at.as_deref())?;
            commands::watch::run(&ctx, interval_ms, ticks, cli.json).await?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
