use clap::{Parser, Subcommand};
use ipgeo::lens::utils::OutputFormat;
use ipgeo::IpgeoConfig;
use tracing::Level;

mod commands;

use commands::classify::ClassifyArgs;
use commands::config::ConfigArgs;
use commands::lookup::LookupArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.ipgeo/ipgeo.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long, global = true)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up geolocation and network information for an IP address or domain
    Lookup(LookupArgs),

    /// Classify inputs as IPv4 address, domain or invalid, without network access
    Classify(ClassifyArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(Level::DEBUG)
            .init();
    }

    let config = match IpgeoConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let ok = match cli.command {
        Commands::Lookup(args) => commands::lookup::run(&config, args, cli.format),
        Commands::Classify(args) => commands::classify::run(args, cli.format),
        Commands::Config(args) => commands::config::run(&config, args, cli.format),
    };

    if !ok {
        std::process::exit(1);
    }
}
