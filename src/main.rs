//! CAT Premium CLI
//!
//! Command-line interface for EP curves, premium rates and mitigation rebates

use anyhow::{Context, Result};
use cat_premium::curve::DEFAULT_RESOLUTION;
use cat_premium::sample::load_losses;
use cat_premium::{
    CompoundLossSampler, CountingMethod, DispersionBasis, LossSample, LossSampler,
    LossStatistics, PremiumResult, PricingConfig, PricingEngine, RateParameters, SeverityModel,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Return periods reported alongside a price (years)
const REPORT_RETURN_PERIODS: [f64; 5] = [10.0, 25.0, 50.0, 100.0, 250.0];

#[derive(Parser)]
#[command(name = "cat_premium", version, about = "EP curve pricing for famine CAT bonds")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the EP curve and write it as CSV (amount,probability)
    Curve {
        #[command(flatten)]
        sample: SampleArgs,
        #[command(flatten)]
        pricing: PricingArgs,
        /// Output file; stdout when absent
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Price a loss sample
    Price {
        #[command(flatten)]
        sample: SampleArgs,
        #[command(flatten)]
        pricing: PricingArgs,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Premium rebate from a mitigation payout
    Rebate {
        #[command(flatten)]
        sample: SampleArgs,
        #[command(flatten)]
        pricing: PricingArgs,
        /// Payout subtracted from every simulated loss
        #[arg(long)]
        payout: f64,
        #[arg(long)]
        json: bool,
    },
    /// Draw a loss sample and write it as CSV (year,loss)
    Simulate {
        #[command(flatten)]
        sampler: SamplerArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SampleArgs {
    /// CSV file with a `loss` column; the sampler flags are used when absent
    #[arg(long)]
    losses: Option<PathBuf>,
    #[command(flatten)]
    sampler: SamplerArgs,
}

impl SampleArgs {
    fn load(&self) -> Result<LossSample> {
        match &self.losses {
            Some(path) => load_losses(path)
                .with_context(|| format!("Failed to load losses from {}", path.display())),
            None => self.sampler.draw(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Severity {
    Lognormal,
    Pareto,
}

#[derive(Args)]
struct SamplerArgs {
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Number of simulated years
    #[arg(long, default_value_t = 10_000)]
    years: usize,
    /// Expected loss events per year
    #[arg(long, default_value_t = 0.2)]
    frequency: f64,
    #[arg(long, value_enum, default_value_t = Severity::Lognormal)]
    severity: Severity,
    /// Log-normal ln-space mean
    #[arg(long, default_value_t = 13.0)]
    mu: f64,
    /// Log-normal ln-space standard deviation
    #[arg(long, default_value_t = 1.0)]
    sigma: f64,
    /// Pareto minimum loss
    #[arg(long, default_value_t = 100_000.0)]
    scale: f64,
    /// Pareto tail index
    #[arg(long, default_value_t = 1.5)]
    shape: f64,
    /// Cap on each year's aggregate loss
    #[arg(long)]
    annual_limit: Option<f64>,
}

impl SamplerArgs {
    fn sampler(&self) -> CompoundLossSampler {
        let severity = match self.severity {
            Severity::Lognormal => SeverityModel::LogNormal { mu: self.mu, sigma: self.sigma },
            Severity::Pareto => SeverityModel::Pareto { scale: self.scale, shape: self.shape },
        };
        let sampler = CompoundLossSampler::new(self.frequency, severity);
        match self.annual_limit {
            Some(limit) => sampler.with_annual_limit(limit),
            None => sampler,
        }
    }

    fn draw(&self) -> Result<LossSample> {
        log::info!("sampling {} years with seed {}", self.years, self.seed);
        self.sampler()
            .sample_seeded(self.years, self.seed)
            .context("Failed to sample losses")
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Dispersion {
    /// Spread of the EP curve amounts above the attachment
    CurveGrid,
    /// Spread of the simulated losses
    LossSample,
}

#[derive(Clone, Copy, ValueEnum)]
enum Counting {
    Naive,
    Sorted,
}

#[derive(Args)]
struct PricingArgs {
    /// JSON file of rate parameters; missing fields take the defaults
    #[arg(long)]
    params: Option<PathBuf>,
    /// Attachment point (insured policy amount)
    #[arg(long, default_value_t = 0.0)]
    attachment: f64,
    /// Number of EP curve points
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    resolution: usize,
    #[arg(long, value_enum, default_value_t = Dispersion::CurveGrid)]
    dispersion: Dispersion,
    #[arg(long, value_enum, default_value_t = Counting::Sorted)]
    counting: Counting,
    /// Build the EP curve on all cores
    #[arg(long)]
    parallel: bool,
    /// Overrides the parameter file
    #[arg(long)]
    exposure_units: Option<f64>,
    /// Overrides the parameter file
    #[arg(long)]
    fixed_expense: Option<f64>,
}

impl PricingArgs {
    fn rate_parameters(&self) -> Result<RateParameters> {
        let mut params = match &self.params {
            Some(path) => RateParameters::from_json_path(path).with_context(|| {
                format!("Failed to load rate parameters from {}", path.display())
            })?,
            None => RateParameters::default(),
        };
        if let Some(units) = self.exposure_units {
            params.exposure_units = units;
        }
        if let Some(expense) = self.fixed_expense {
            params.fixed_expense = expense;
        }
        Ok(params)
    }

    fn engine(&self) -> Result<PricingEngine> {
        let config = PricingConfig {
            resolution: self.resolution,
            attachment: self.attachment,
            counting: match self.counting {
                Counting::Naive => CountingMethod::Naive,
                Counting::Sorted => CountingMethod::Sorted,
            },
            dispersion: match self.dispersion {
                Dispersion::CurveGrid => DispersionBasis::CurveGrid,
                Dispersion::LossSample => DispersionBasis::LossSample,
            },
            parallel: self.parallel,
        };
        PricingEngine::new(self.rate_parameters()?, config).context("Invalid pricing setup")
    }
}

#[derive(Serialize)]
struct PriceReport {
    years: usize,
    max_loss: f64,
    mean_loss: f64,
    attachment: f64,
    statistics: LossStatistics,
    premium: PremiumResult,
    probable_maximum_loss: Vec<ReturnPeriodLoss>,
}

#[derive(Serialize)]
struct ReturnPeriodLoss {
    return_period: f64,
    loss: Option<f64>,
}

#[derive(Serialize)]
struct SimulatedYear {
    year: usize,
    loss: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Curve { sample, pricing, output } => run_curve(&sample, &pricing, output),
        Command::Price { sample, pricing, json } => run_price(&sample, &pricing, json),
        Command::Rebate { sample, pricing, payout, json } => {
            run_rebate(&sample, &pricing, payout, json)
        }
        Command::Simulate { sampler, output } => run_simulate(&sampler, output),
    }
}

fn csv_writer(output: Option<PathBuf>) -> Result<csv::Writer<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            std::fs::File::create(&path)
                .with_context(|| format!("Unable to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    Ok(csv::Writer::from_writer(sink))
}

fn run_curve(sample: &SampleArgs, pricing: &PricingArgs, output: Option<PathBuf>) -> Result<()> {
    let losses = sample.load()?;
    let curve = pricing.engine()?.curve(&losses)?;

    let mut writer = csv_writer(output)?;
    for point in curve.points() {
        writer.serialize(point)?;
    }
    writer.flush()?;
    log::info!("wrote {} EP curve points", curve.len());
    Ok(())
}

fn run_price(sample: &SampleArgs, pricing: &PricingArgs, json: bool) -> Result<()> {
    let losses = sample.load()?;
    let engine = pricing.engine()?;
    let result = engine.price(&losses)?;

    let report = PriceReport {
        years: losses.len(),
        max_loss: losses.max(),
        mean_loss: losses.mean(),
        attachment: engine.config().attachment,
        statistics: result.statistics,
        premium: result.premium,
        probable_maximum_loss: REPORT_RETURN_PERIODS
            .iter()
            .map(|&rp| ReturnPeriodLoss {
                return_period: rp,
                loss: result.curve.probable_maximum_loss(rp),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Loss sample: {} years, mean {:.2}, max {:.2}",
        report.years, report.mean_loss, report.max_loss
    );
    println!("Attachment:  {:.2}", report.attachment);
    println!();
    println!("  AAL:              {:>14.4}", report.statistics.aal);
    println!("  Loss std dev:     {:>14.4}", report.statistics.loss_std_dev);
    println!("  Pure premium:     {:>14.4}", report.premium.pure_premium);
    println!("  Risk load:        {:>14.4}", report.premium.risk_load);
    println!("  Variable load:    {:>14.4}", report.premium.variable_load_fraction);
    println!("  Average rate:     {:>14.4}", report.premium.average_rate);
    println!();
    println!("Probable maximum loss:");
    for pml in &report.probable_maximum_loss {
        match pml.loss {
            Some(loss) => println!("  1-in-{:<5} {:>14.2}", pml.return_period, loss),
            None => println!("  1-in-{:<5} {:>14}", pml.return_period, "n/a"),
        }
    }
    Ok(())
}

fn run_rebate(sample: &SampleArgs, pricing: &PricingArgs, payout: f64, json: bool) -> Result<()> {
    let losses = sample.load()?;
    let result = pricing.engine()?.rebate(&losses, payout)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Mitigation payout:  {:>14.2}", result.mitigation_payout);
    println!("Baseline premium:   {:>14.4}", result.baseline_premium);
    println!("Mitigated premium:  {:>14.4}", result.mitigated_premium);
    println!("Rebate:             {:>14.4}", result.rebate_amount);
    Ok(())
}

fn run_simulate(sampler: &SamplerArgs, output: Option<PathBuf>) -> Result<()> {
    let losses = sampler.draw()?;

    let mut writer = csv_writer(output)?;
    for (idx, &loss) in losses.iter().enumerate() {
        writer.serialize(SimulatedYear { year: idx + 1, loss })?;
    }
    writer.flush()?;
    log::info!("wrote {} simulated years", losses.len());
    Ok(())
}
