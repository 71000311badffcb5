pub mod classify;
pub mod config;
pub mod lookup;

use ipgeo::lens::utils::OutputFormat;
use serde::Serialize;

/// Print `items` in a JSON output format; returns false on serialization failure
pub(crate) fn print_json<T: Serialize>(items: &[T], output_format: OutputFormat) -> bool {
    match output_format.render_json(items) {
        Some(Ok(json)) => {
            println!("{}", json);
            true
        }
        Some(Err(e)) => {
            eprintln!("ERROR: Failed to serialize to JSON: {}", e);
            false
        }
        None => false,
    }
}
