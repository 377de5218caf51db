//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::console_summary::render_summary;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::domain::analysis::{
    default_start_date, run_analysis, AnalysisOptions, AnalysisReport, AnalysisRequest,
    DEFAULT_RECENT_ROWS, DEFAULT_SYMBOL,
};
use crate::domain::config_validation::{validate_analysis_config, validate_provider_config};
use crate::domain::error::EtfLensError;
use crate::domain::returns::TRADING_DAYS_PER_YEAR;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_OUTPUT_PATH: &str = "report.html";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(name = "etflens", about = "Compare an ETF's return and risk against SPY")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch prices, print a summary and write an HTML report
    Analyze {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// First date to exclude (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Read `{SYMBOL}.csv` files from this directory instead of the network
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start the web dashboard
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct RequestOverrides {
    pub symbol: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            symbol,
            start,
            end,
            data_dir,
            output,
        } => {
            let overrides = RequestOverrides { symbol, start, end };
            run_analyze(
                config.as_ref(),
                &overrides,
                data_dir.as_ref(),
                output.as_ref(),
            )
        }
        Command::Serve { config } => run_serve(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn report_failure(e: &EtfLensError) -> ExitCode {
    eprintln!("error: {e}");
    e.into()
}

/// Resolve the query: flag, then config value, then built-in default.
/// The end date defaults to `today`.
pub fn build_request(
    config: &dyn ConfigPort,
    overrides: &RequestOverrides,
    today: NaiveDate,
) -> Result<AnalysisRequest, EtfLensError> {
    let symbol = match &overrides.symbol {
        Some(s) => s.clone(),
        None => config
            .get_string("analysis", "symbol")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
    };
    let start = match overrides.start {
        Some(d) => d,
        None => config
            .get_date("analysis", "start_date")?
            .unwrap_or_else(default_start_date),
    };
    let end = match overrides.end {
        Some(d) => d,
        None => config.get_date("analysis", "end_date")?.unwrap_or(today),
    };
    AnalysisRequest::new(&symbol, start, end)
}

pub fn build_options(config: &dyn ConfigPort) -> AnalysisOptions {
    AnalysisOptions {
        periods_per_year: config.get_double("analysis", "periods_per_year", TRADING_DAYS_PER_YEAR),
        align_dates: config.get_bool("analysis", "align_dates", true),
        recent_rows: config
            .get_int("analysis", "recent_rows", DEFAULT_RECENT_ROWS as i64)
            .max(1) as usize,
    }
}

/// Pick the price source. `--data-dir` forces the CSV adapter.
pub fn build_data_port(
    config: &dyn ConfigPort,
    data_dir_override: Option<&PathBuf>,
) -> Result<Arc<dyn DataPort + Send + Sync>, EtfLensError> {
    if let Some(dir) = data_dir_override {
        return Ok(Arc::new(CsvAdapter::new(dir.clone())));
    }

    let source = config
        .get_string("provider", "source")
        .unwrap_or_else(|| "yahoo".to_string())
        .trim()
        .to_lowercase();

    match source.as_str() {
        "yahoo" => Ok(Arc::new(YahooAdapter::from_config(config)?)),
        "csv" => {
            let dir = config
                .get_string("provider", "data_dir")
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| EtfLensError::ConfigMissing {
                    section: "provider".into(),
                    key: "data_dir".into(),
                })?;
            Ok(Arc::new(CsvAdapter::new(PathBuf::from(dir))))
        }
        other => Err(EtfLensError::config_invalid(
            "provider",
            "source",
            format!("unknown source {:?}", other),
        )),
    }
}

pub fn resolve_output(config: &dyn ConfigPort, output_override: Option<&PathBuf>) -> PathBuf {
    output_override.cloned().unwrap_or_else(|| {
        config
            .get_string("report", "output_path")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH))
    })
}

pub fn listen_addr(config: &dyn ConfigPort) -> Result<SocketAddr, EtfLensError> {
    let raw = config
        .get_string("web", "listen")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    raw.trim()
        .parse()
        .map_err(|_| EtfLensError::config_invalid("web", "listen", format!("invalid address {:?}", raw)))
}

/// Analyze, then write the report. Nothing is written when the analysis fails.
pub fn run_analysis_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    request: &AnalysisRequest,
    options: &AnalysisOptions,
    output: &Path,
) -> Result<AnalysisReport, EtfLensError> {
    let report = run_analysis(data_port, request, options)?;
    report_port.write(&report, &output.to_string_lossy())?;
    Ok(report)
}

fn run_analyze(
    config_path: Option<&PathBuf>,
    overrides: &RequestOverrides,
    data_dir: Option<&PathBuf>,
    output: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(c) => c,
                Err(code) => return code,
            }
        }
        None => FileConfigAdapter::empty(),
    };
    if let Err(e) = validate_analysis_config(&config) {
        return report_failure(&e);
    }
    if data_dir.is_none() {
        if let Err(e) = validate_provider_config(&config) {
            return report_failure(&e);
        }
    }

    // Stage 2: Build request, options and data source
    let request = match build_request(&config, overrides, Local::now().date_naive()) {
        Ok(r) => r,
        Err(e) => return report_failure(&e),
    };
    let options = build_options(&config);
    let data_port = match build_data_port(&config, data_dir) {
        Ok(p) => p,
        Err(e) => return report_failure(&e),
    };
    let output = resolve_output(&config, output);

    // Stage 3: Fetch, analyze, write report
    eprintln!(
        "Analyzing {} vs {}: {} to {}",
        request.symbol,
        request.benchmark(),
        request.start_date,
        request.end_date
    );
    let report = match run_analysis_pipeline(
        data_port.as_ref(),
        &HtmlReportAdapter::new(),
        &request,
        &options,
        &output,
    ) {
        Ok(r) => r,
        Err(e) => return report_failure(&e),
    };

    // Stage 4: Console summary
    println!("{}", render_summary(&report));
    eprintln!("Report written to: {}", output.display());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let checks = validate_analysis_config(&config)
        .and_then(|_| validate_provider_config(&config))
        .and_then(|_| listen_addr(&config).map(|_| ()));
    if let Err(e) = checks {
        return report_failure(&e);
    }

    let request = match build_request(
        &config,
        &RequestOverrides::default(),
        Local::now().date_naive(),
    ) {
        Ok(r) => r,
        Err(e) => return report_failure(&e),
    };
    let options = build_options(&config);

    eprintln!("  Symbol:    {} (benchmark {})", request.symbol, request.benchmark());
    eprintln!("  Range:     {} to {}", request.start_date, request.end_date);
    eprintln!(
        "  Source:    {}",
        config
            .get_string("provider", "source")
            .unwrap_or_else(|| "yahoo".to_string())
    );
    eprintln!(
        "  Options:   {} periods/year, align dates {}, {} recent rows",
        options.periods_per_year, options.align_dates, options.recent_rows
    );
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_serve(config_path: &Path) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };
        if let Err(e) = validate_analysis_config(&config)
            .and_then(|_| validate_provider_config(&config))
        {
            return report_failure(&e);
        }

        let addr = match listen_addr(&config) {
            Ok(a) => a,
            Err(e) => return report_failure(&e),
        };
        let defaults = match dashboard_defaults(&config) {
            Ok(d) => d,
            Err(e) => return report_failure(&e),
        };

        // The blocking HTTP client must be built, and finally dropped,
        // outside the async runtime.
        let data_port = match build_data_port(&config, None) {
            Ok(p) => p,
            Err(e) => return report_failure(&e),
        };

        let state = AppState {
            data_port: Arc::clone(&data_port),
            options: build_options(&config),
            defaults,
        };
        let router = build_router(state);

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("error: failed to start runtime: {e}");
                return ExitCode::from(1);
            }
        };

        eprintln!("Starting web server on http://{}", addr);
        let served = runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        });
        drop(runtime);
        drop(data_port);

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report_failure(&EtfLensError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}

#[cfg(feature = "web")]
fn dashboard_defaults(
    config: &dyn ConfigPort,
) -> Result<crate::adapters::web::DashboardDefaults, EtfLensError> {
    Ok(crate::adapters::web::DashboardDefaults {
        symbol: config
            .get_string("analysis", "symbol")
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
        start_date: config
            .get_date("analysis", "start_date")?
            .unwrap_or_else(default_start_date),
        end_date: config.get_date("analysis", "end_date")?,
    })
}
