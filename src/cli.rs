//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::console_report;
use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::frontier_csv::CsvFrontierReport;
use crate::domain::analysis::{
    AnalysisConfig, DEFAULT_SAMPLE_COUNT, load_price_table, run_analysis,
};
use crate::domain::config_validation::{
    default_profile_table, parse_weights, validate_analysis_config,
};
use crate::domain::error::SamToolError;
use crate::domain::portfolio_metrics::MetricsConfig;
use crate::domain::profiler::{InvestorFacts, LossTolerance, assess_risk_profile, qualify};
use crate::domain::statistics::TRADING_DAYS_PER_YEAR;
use crate::domain::weights::{RiskProfile, RiskProfileTable, WeightVector};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "samtool", about = "Risk-profile portfolio analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Risk profile to analyze (e.g. moderately-aggressive)
    #[arg(long, conflicts_with_all = ["age", "loss_tolerance"])]
    pub profile: Option<RiskProfile>,
    /// Investor age, used with --loss-tolerance to assess the profile
    #[arg(long, requires = "loss_tolerance")]
    pub age: Option<f64>,
    /// Comfort with loss: low (<10%), medium (10-50%), high (>50%)
    #[arg(long, requires = "age")]
    pub loss_tolerance: Option<LossTolerance>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct FactsArgs {
    /// Cash savings
    #[arg(long)]
    pub cash: Option<f64>,
    /// Total value of investments
    #[arg(long)]
    pub investments: Option<f64>,
    /// Total annual income
    #[arg(long)]
    pub income: Option<f64>,
    /// Average annual spending needs
    #[arg(long)]
    pub spending: Option<f64>,
}

impl FactsArgs {
    pub fn to_facts(&self) -> Option<InvestorFacts> {
        if self.cash.is_none()
            && self.investments.is_none()
            && self.income.is_none()
            && self.spending.is_none()
        {
            return None;
        }
        Some(InvestorFacts {
            cash: self.cash.unwrap_or(0.0),
            investments: self.investments.unwrap_or(0.0),
            annual_income: self.income.unwrap_or(0.0),
            annual_spending: self.spending.unwrap_or(0.0),
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze the risk-profile portfolio and sample the efficient frontier
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        profile: ProfileArgs,
        #[command(flatten)]
        facts: FactsArgs,
        /// Number of random portfolios to sample
        #[arg(long)]
        samples: Option<usize>,
        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
        /// Directory holding <SYMBOL>.csv price files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Write every sampled portfolio to this CSV file
        #[arg(long)]
        frontier: Option<PathBuf>,
    },
    /// Assess an investor's risk profile
    Profile {
        #[arg(long)]
        age: f64,
        #[arg(long)]
        loss_tolerance: LossTolerance,
        #[command(flatten)]
        facts: FactsArgs,
    },
    /// Validate an analysis configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            profile,
            facts,
            samples,
            seed,
            data_dir,
            frontier,
        } => run_analyze(AnalyzeOptions {
            config_path: config,
            profile,
            facts,
            samples,
            seed,
            data_dir,
            frontier,
        }),
        Command::Profile {
            age,
            loss_tolerance,
            facts,
        } => run_profile(age, loss_tolerance, &facts),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: SamToolError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(&err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SamToolError> {
    FileConfigAdapter::from_file(path).map_err(|e| SamToolError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn build_analysis_config(adapter: &dyn ConfigPort) -> Result<AnalysisConfig, SamToolError> {
    let symbols = adapter
        .get_list("analysis", "symbols")
        .ok_or_else(|| SamToolError::ConfigMissing {
            section: "analysis".into(),
            key: "symbols".into(),
        })?;
    let data_dir = adapter
        .get_string("analysis", "data_dir")
        .ok_or_else(|| SamToolError::ConfigMissing {
            section: "analysis".into(),
            key: "data_dir".into(),
        })?;
    let seed = match adapter.get_string("analysis", "seed") {
        Some(s) => Some(s.trim().parse::<u64>().map_err(|_| SamToolError::ConfigInvalid {
            section: "analysis".into(),
            key: "seed".into(),
            reason: "seed must be a non-negative integer".into(),
        })?),
        None => None,
    };
    let sample_count = adapter.get_int("analysis", "sample_count", DEFAULT_SAMPLE_COUNT as i64);

    Ok(AnalysisConfig {
        symbols,
        data_dir: PathBuf::from(data_dir.trim()),
        metrics: MetricsConfig {
            annualization_factor: adapter.get_double(
                "analysis",
                "annualization_factor",
                TRADING_DAYS_PER_YEAR,
            ),
            risk_free_rate: adapter.get_double("analysis", "risk_free_rate", 0.0),
        },
        sample_count: usize::try_from(sample_count).unwrap_or(0),
        seed,
    })
}

/// The `[profiles]` table when present, otherwise the built-in allocation
/// mapped onto the order of `symbols`.
pub fn build_profile_table(
    adapter: &dyn ConfigPort,
    symbols: &[String],
) -> Result<RiskProfileTable, SamToolError> {
    if adapter.keys("profiles").is_empty() {
        return default_profile_table(symbols);
    }
    let entries = RiskProfile::ALL
        .into_iter()
        .map(|profile| {
            let raw = parse_weights(adapter, profile.key(), symbols.len())?;
            Ok((profile, WeightVector::normalize(raw)?))
        })
        .collect::<Result<Vec<_>, SamToolError>>()?;
    RiskProfileTable::new(entries)
}

/// Flags win over the config; `moderate` is the fallback.
pub fn resolve_profile(
    args: &ProfileArgs,
    adapter: &dyn ConfigPort,
) -> Result<RiskProfile, SamToolError> {
    if let Some(profile) = args.profile {
        return Ok(profile);
    }
    if let (Some(age), Some(tolerance)) = (args.age, args.loss_tolerance) {
        return Ok(assess_risk_profile(age, tolerance));
    }
    match adapter.get_string("analysis", "profile") {
        Some(name) => name.parse(),
        None => {
            tracing::warn!("no risk profile given, using moderate");
            Ok(RiskProfile::Moderate)
        }
    }
}

/// Load prices, analyze, optionally export the frontier, and render the report.
pub fn run_analysis_pipeline(
    price_port: &dyn PricePort,
    report_port: &dyn ReportPort,
    config: &AnalysisConfig,
    profile: RiskProfile,
    profiles: &RiskProfileTable,
    frontier: Option<&Path>,
) -> Result<String, SamToolError> {
    let prices = load_price_table(price_port, &config.symbols)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let result = run_analysis(&prices, config, profile, profiles, &mut rng)?;

    if let Some(path) = frontier {
        report_port.write_frontier(&result.samples, &result.symbols, path)?;
    }

    let mut report = format!(
        "Analysis period: {} to {} ({} trading days)\n\n",
        result.first_date, result.last_date, result.price_rows
    );
    report.push_str(&console_report::asset_table(&result.asset_statistics));
    report.push('\n');
    report.push_str(&console_report::portfolio_block(
        &format!(
            "Portfolio Statistics per Client Risk Profile ({})",
            result.profile.title()
        ),
        &result.profile_portfolio,
        &result.symbols,
    ));
    report.push('\n');
    report.push_str(&console_report::optimal_blocks(
        &result.optimal,
        &result.symbols,
    ));
    Ok(report)
}

/// Relative data directories are taken from the config file's directory.
pub fn resolve_data_dir(config_path: &Path, data_dir: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if data_dir.is_relative() => parent.join(data_dir),
        _ => data_dir.to_path_buf(),
    }
}

/// Configured symbols with no price file in the data directory.
pub fn missing_price_files(
    price_port: &dyn PricePort,
    symbols: &[String],
) -> Result<Vec<String>, SamToolError> {
    let available = price_port.list_symbols()?;
    Ok(symbols
        .iter()
        .filter(|s| !available.contains(s))
        .cloned()
        .collect())
}

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub config_path: PathBuf,
    pub profile: ProfileArgs,
    pub facts: FactsArgs,
    pub samples: Option<usize>,
    pub seed: Option<u64>,
    pub data_dir: Option<PathBuf>,
    pub frontier: Option<PathBuf>,
}

fn prepare_analysis(
    options: &AnalyzeOptions,
) -> Result<(AnalysisConfig, RiskProfile, RiskProfileTable), SamToolError> {
    tracing::info!("loading config from {}", options.config_path.display());
    let adapter = load_config(&options.config_path)?;
    validate_analysis_config(&adapter)?;

    let mut config = build_analysis_config(&adapter)?;
    if let Some(samples) = options.samples {
        config.sample_count = samples;
    }
    if options.seed.is_some() {
        config.seed = options.seed;
    }
    if let Some(dir) = &options.data_dir {
        config.data_dir = dir.clone();
    }
    config.data_dir = resolve_data_dir(&options.config_path, &config.data_dir);

    let profiles = build_profile_table(&adapter, &config.symbols)?;
    let profile = resolve_profile(&options.profile, &adapter)?;

    if let Some(facts) = options.facts.to_facts() {
        let investable = qualify(&facts)?;
        tracing::info!(investable, "investor qualifies");
    }

    Ok((config, profile, profiles))
}

pub fn run_analyze(options: AnalyzeOptions) -> ExitCode {
    let (config, profile, profiles) = match prepare_analysis(&options) {
        Ok(prepared) => prepared,
        Err(e) => return fail(e),
    };
    tracing::info!(%profile, symbols = %config.symbols.join(","), "running analysis");

    let price_port = CsvPriceAdapter::new(config.data_dir.clone());
    match run_analysis_pipeline(
        &price_port,
        &CsvFrontierReport,
        &config,
        profile,
        &profiles,
        options.frontier.as_deref(),
    ) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_profile(age: f64, tolerance: LossTolerance, facts: &FactsArgs) -> ExitCode {
    if let Some(facts) = facts.to_facts() {
        match qualify(&facts) {
            Ok(investable) => println!("You are able to invest: {investable:.2}"),
            Err(e) => return fail(e),
        }
    }
    let profile = assess_risk_profile(age, tolerance);
    let table = RiskProfileTable::standard();
    println!("Your Risk Profile is: {}", profile.title());
    println!(
        "Suggested weighting (SPY, AGG, BTC) = {}",
        table.weights(profile)
    );
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    tracing::info!("validating {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    let checked = validate_analysis_config(&adapter)
        .and_then(|()| build_analysis_config(&adapter))
        .and_then(|config| {
            build_profile_table(&adapter, &config.symbols).map(|_| config)
        });
    match checked {
        Ok(config) => {
            let data_dir = resolve_data_dir(config_path, &config.data_dir);
            match missing_price_files(&CsvPriceAdapter::new(data_dir.clone()), &config.symbols) {
                Ok(missing) if !missing.is_empty() => tracing::warn!(
                    missing = %missing.join(","),
                    "no price file in {}",
                    data_dir.display()
                ),
                Ok(_) => {}
                Err(e) => tracing::warn!("{e}"),
            }
            println!("symbols:              {}", config.symbols.join(", "));
            println!("data_dir:             {}", config.data_dir.display());
            println!("annualization_factor: {}", config.metrics.annualization_factor);
            println!("risk_free_rate:       {}", config.metrics.risk_free_rate);
            println!("sample_count:         {}", config.sample_count);
            println!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}
