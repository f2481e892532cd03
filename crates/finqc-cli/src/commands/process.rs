//! Process command - extract statements and SOP metrics from one document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use finqc_core::ExtractionBundle;

use super::{build_pipeline, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input document (text or markdown)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Stored classification response to merge into line items
    #[arg(long)]
    classifications: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON bundle
    Json,
    /// SOP summary as CSV
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension used for written outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pipeline = build_pipeline(config, args.classifications.as_deref())?;
    let data = fs::read(&args.input)?;
    let file_name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");

    let bundle = pipeline.process(&data, file_name).await?;
    debug!(
        "Extracted {} statements and {} line items",
        bundle.frames.len(),
        bundle.line_items.len()
    );

    let output = format_bundle(&bundle, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_bundle(bundle: &ExtractionBundle, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(bundle)?),
        OutputFormat::Csv => format_csv(bundle),
        OutputFormat::Text => Ok(format_text(bundle)),
    }
}

fn format_csv(bundle: &ExtractionBundle) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["metric", "value", "statement", "column", "source_line"])?;
    for result in &bundle.sop_summary {
        wtr.write_record([
            &result.metric,
            &result.value,
            &result.statement,
            &result.column,
            &result.source_line,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(bundle: &ExtractionBundle) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", bundle.file_name));
    output.push('\n');

    output.push_str("Statements:\n");
    if bundle.frames.is_empty() {
        output.push_str("  (none)\n");
    }
    for (statement, frame) in bundle.frames.iter() {
        let latest = bundle
            .sop_metadata
            .latest_columns
            .get(statement)
            .map(String::as_str)
            .unwrap_or("-");
        output.push_str(&format!(
            "  {:<22} {:>3} rows  latest: {}\n",
            statement,
            frame.len(),
            latest
        ));
    }
    output.push('\n');

    output.push_str("SOP summary:\n");
    for result in &bundle.sop_summary {
        if result.is_resolved() {
            output.push_str(&format!(
                "  {:<22} {:>16}  {} / {}\n",
                result.metric, result.value, result.statement, result.source_line
            ));
        } else {
            output.push_str(&format!("  {:<22} {:>16}\n", result.metric, result.value));
        }
    }
    output.push('\n');

    let classified = bundle
        .line_items
        .iter()
        .filter(|item| item.classification != finqc_core::models::line_item::UNASSIGNED)
        .count();
    output.push_str(&format!(
        "Line items: {} ({} classified)\n",
        bundle.line_items.len(),
        classified
    ));

    output
}
