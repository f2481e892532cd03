//! Metrics command - show the classification vocabulary and SOP metric order.

use clap::Args;
use console::style;

use finqc_core::build_candidate_metrics;

use super::load_config;

/// Arguments for the metrics command.
#[derive(Args)]
pub struct MetricsArgs {
    /// Additional candidate metric names
    #[arg(short, long = "extra", value_name = "NAME")]
    extra: Vec<String>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: MetricsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let mut extra = config.metrics.additional_candidate_metrics.clone();
    extra.extend(args.extra);
    let candidates = build_candidate_metrics(extra.as_slice());
    let taxonomy = config.taxonomy()?;

    if args.json {
        let value = serde_json::json!({
            "candidateMetrics": candidates,
            "sopMetrics": taxonomy.summary_order,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", style("Candidate metrics:").bold());
    for metric in &candidates {
        println!("  {}", metric);
    }

    println!();
    println!("{}", style("SOP metrics:").bold());
    for (idx, metric) in taxonomy.summary_order.iter().enumerate() {
        let derived = taxonomy.derived.iter().any(|d| &d.metric == metric);
        if derived {
            println!("  {:>2}. {} {}", idx + 1, metric, style("(derived)").dim());
        } else {
            println!("  {:>2}. {}", idx + 1, metric);
        }
    }

    Ok(())
}
