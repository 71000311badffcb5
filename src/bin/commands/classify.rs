use clap::Args;
use ipgeo::lens::target::{TargetLens, TargetReport};
use ipgeo::lens::utils::OutputFormat;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Arguments for the Classify command
#[derive(Args)]
pub struct ClassifyArgs {
    /// Inputs to classify (IP addresses, domains or URLs)
    #[clap(required = true)]
    pub inputs: Vec<String>,
}

#[derive(Tabled)]
struct ClassifyRow {
    input: String,
    classification: String,
    normalized: String,
    query: String,
}

impl From<&TargetReport> for ClassifyRow {
    fn from(report: &TargetReport) -> Self {
        Self {
            input: report.input.clone(),
            classification: report.classification.to_string(),
            normalized: report.normalized.clone(),
            query: report
                .target
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub fn run(args: ClassifyArgs, output_format: OutputFormat) -> bool {
    let lens = TargetLens::new();
    let reports = lens.report_all(&args.inputs);

    if output_format.is_json() {
        return super::print_json(&reports, output_format);
    }

    let rows: Vec<ClassifyRow> = reports.iter().map(ClassifyRow::from).collect();
    match output_format {
        OutputFormat::Psv => {
            println!("input|classification|normalized|query");
            for r in &rows {
                println!(
                    "{}|{}|{}|{}",
                    r.input, r.classification, r.normalized, r.query
                );
            }
        }
        OutputFormat::Markdown => {
            println!("{}", Table::new(&rows).with(Style::markdown()));
        }
        _ => {
            println!("{}", Table::new(&rows).with(Style::rounded()));
        }
    }

    true
}
