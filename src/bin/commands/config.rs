use clap::Args;
use ipgeo::lens::utils::OutputFormat;
use ipgeo::IpgeoConfig;
use json_to_table::json_to_table;
use serde::Serialize;
use serde_json::json;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Print the plain-text summary instead of a table
    #[clap(short, long)]
    pub summary: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo<'a> {
    config_file: String,
    api_key: String,
    #[serde(flatten)]
    settings: &'a IpgeoConfig,
}

pub fn run(config: &IpgeoConfig, args: ConfigArgs, output_format: OutputFormat) -> bool {
    if args.summary {
        println!("{}", config.summary());
        return true;
    }

    let info = ConfigInfo {
        config_file: IpgeoConfig::config_file_path(),
        api_key: config.masked_api_key(),
        settings: config,
    };

    if output_format.is_json() {
        return super::print_json(&[info], output_format);
    }

    match output_format {
        OutputFormat::Psv => {
            println!("config_file|api_key|base_url|timeout_secs|map_zoom");
            println!(
                "{}|{}|{}|{}|{}",
                info.config_file,
                info.api_key,
                config.base_url,
                config.timeout_secs,
                config.map_zoom
            );
        }
        _ => {
            let json_value = json!(&info);
            let mut table = json_to_table(&json_value);
            table.collapse();
            println!("{}", table);
        }
    }

    true
}
