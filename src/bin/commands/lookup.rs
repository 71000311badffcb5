use clap::Args;
use indicatif::ProgressBar;
use ipgeo::lens::geo::{
    GeoLens, GeoLookupArgs, GeoResult, IpifyProvider, LookupProvider, MockProvider, Notifier,
};
use ipgeo::lens::utils::OutputFormat;
use ipgeo::IpgeoConfig;
use serde::Serialize;
use std::time::Duration;
use tabled::settings::Style;
use tabled::Table;

/// Arguments for the Lookup command
#[derive(Args)]
pub struct LookupArgs {
    /// IP address, domain name or URL to look up (default: your public IP)
    #[clap()]
    pub query: Option<String>,

    /// Print IP address only (e.g., for getting the public IP address quickly)
    #[clap(long)]
    pub simple: bool,

    /// Use a built-in fake response instead of calling the API
    #[clap(long)]
    pub mock: bool,

    /// Also print an OpenStreetMap link for the location
    #[clap(long)]
    pub map: bool,
}

/// Shows a spinner on stderr while a lookup is running
struct SpinnerNotifier {
    spinner: ProgressBar,
}

impl SpinnerNotifier {
    fn new() -> Self {
        Self {
            spinner: ProgressBar::new_spinner(),
        }
    }
}

impl Notifier for SpinnerNotifier {
    fn loading(&self, query: &str) {
        self.spinner.set_message(format!("Looking up {}...", query));
        self.spinner.enable_steady_tick(Duration::from_millis(100));
    }

    fn success(&self, _message: &str) {
        self.spinner.finish_and_clear();
    }

    fn failure(&self, _message: &str) {
        self.spinner.finish_and_clear();
    }
}

#[derive(Serialize)]
struct LookupOutput<'a> {
    #[serde(flatten)]
    result: &'a GeoResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    map_url: Option<String>,
}

pub fn run(config: &IpgeoConfig, args: LookupArgs, output_format: OutputFormat) -> bool {
    let LookupArgs {
        query,
        simple,
        mock,
        map,
    } = args;

    let provider: Box<dyn LookupProvider> = if mock {
        Box::new(MockProvider::new())
    } else {
        Box::new(IpifyProvider::from_config(config))
    };
    let mut lens = GeoLens::new(provider).with_notifier(Box::new(SpinnerNotifier::new()));

    let lookup_args = GeoLookupArgs { query };
    let result = match lens.lookup(&lookup_args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("ERROR: unable to get ip information: {}", e);
            return false;
        }
    };

    // Simple mode overrides output format
    if simple {
        println!("{}", result.ip);
        return true;
    }

    let map_url = map.then(|| result.coordinates.map_url(config.map_zoom));

    if output_format.is_json() {
        let output = LookupOutput {
            result: &result,
            map_url,
        };
        return super::print_json(&[output], output_format);
    }

    match output_format {
        OutputFormat::Psv => {
            println!("label|value");
            for d in &result.details {
                println!("{}|{}", d.label, d.value);
            }
            println!("Coordinates|{},{}", result.coordinates.lat, result.coordinates.lng);
            if let Some(url) = map_url {
                println!("Map|{}", url);
            }
        }
        _ => {
            let mut table = Table::new(&result.details);
            if output_format == OutputFormat::Markdown {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
            }
            println!("{}", table);

            println!(
                "Coordinates: {:.4}, {:.4}",
                result.coordinates.lat, result.coordinates.lng
            );
            if let Some(network) = &result.network {
                let name = network.name.as_deref().unwrap_or("-");
                let route = network.route.as_deref().unwrap_or("-");
                println!("Network:     AS{} {} ({})", network.asn, name, route);
            }
            if let Some(url) = map_url {
                println!("Map:         {}", url);
            }
        }
    }

    true
}
