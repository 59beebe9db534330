//! Sweep mitigation payouts and write the rebate for each
//!
//! Usage: cargo run --bin rebate_schedule -- --losses losses.csv --max-payout 500000 --steps 20

use anyhow::{ensure, Context, Result};
use cat_premium::sample::load_losses;
use cat_premium::{PricingConfig, PricingEngine, RateParameters};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "rebate_schedule", about = "Premium rebate across a range of mitigation payouts")]
struct Args {
    /// CSV file with a `loss` column
    #[arg(long)]
    losses: PathBuf,
    /// JSON file of rate parameters
    #[arg(long)]
    params: Option<PathBuf>,
    #[arg(long, default_value_t = 0.0)]
    attachment: f64,
    #[arg(long, default_value_t = 1000)]
    resolution: usize,
    /// Largest payout in the sweep
    #[arg(long)]
    max_payout: f64,
    /// Number of equal payout increments from zero
    #[arg(long, default_value_t = 10)]
    steps: usize,
    #[arg(long, default_value = "rebate_schedule.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!(args.steps > 0, "--steps must be at least 1");

    let start = Instant::now();
    let sample = load_losses(&args.losses)
        .with_context(|| format!("Failed to load losses from {}", args.losses.display()))?;
    println!("Loaded {} simulated years in {:?}", sample.len(), start.elapsed());

    let params = match &args.params {
        Some(path) => RateParameters::from_json_path(path)
            .with_context(|| format!("Failed to load rate parameters from {}", path.display()))?,
        None => RateParameters::default(),
    };
    let config = PricingConfig::default()
        .with_attachment(args.attachment)
        .with_resolution(args.resolution);
    let engine = PricingEngine::new(params, config)?;

    let payouts: Vec<f64> = (0..=args.steps)
        .map(|i| args.max_payout * i as f64 / args.steps as f64)
        .collect();

    let sweep_start = Instant::now();
    let schedule = engine.rebate_schedule(&sample, &payouts)?;
    println!("Priced {} payouts in {:?}", schedule.len(), sweep_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Unable to create {}", args.output.display()))?;
    writer.write_record(["payout", "baseline_premium", "mitigated_premium", "rebate"])?;
    for row in &schedule {
        writer.write_record(&[
            format!("{:.2}", row.mitigation_payout),
            format!("{:.6}", row.baseline_premium),
            format!("{:.6}", row.mitigated_premium),
            format!("{:.6}", row.rebate_amount),
        ])?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());
    if let Some(last) = schedule.last() {
        println!(
            "  Baseline premium {:.2}; payout {:.2} earns a rebate of {:.2}",
            last.baseline_premium, last.mitigation_payout, last.rebate_amount
        );
    }
    Ok(())
}
