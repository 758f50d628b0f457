use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{DEFAULT_PORT, run_http_server};
use crate::client::{HttpBackend, Projection, ProjectionService, Sequenced};
use crate::core::{
    DEFAULT_BREAK_MONTHS, DEFAULT_HORIZON_YEARS, FallbackDefaults, GrowthRates,
};
use crate::error::ProjectionError;
use crate::wire::{
    ChatRequestBody, GapCheckRequestBody, LifetimeRequestBody, SimulateRequestBody,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "equity-gap",
    about = "Career-break cost and lifetime pay-gap projections"
)]
pub struct Cli {
    #[command(flatten)]
    defaults: DefaultsArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct DefaultsArgs {
    #[arg(
        long,
        global = true,
        default_value_t = 3.0,
        help = "Annual salary growth in percent"
    )]
    annual_growth: f64,
    #[arg(
        long,
        global = true,
        default_value_t = 7.0,
        help = "Investment return in percent"
    )]
    investment_return: f64,
    #[arg(
        long,
        global = true,
        default_value_t = 4.0,
        help = "Employer retirement match in percent of salary"
    )]
    employer_match: f64,
    #[arg(
        long,
        global = true,
        default_value_t = 90.0,
        help = "Female average as a percent of the market average when no split data is available"
    )]
    female_to_male_ratio: f64,
    #[arg(
        long,
        global = true,
        default_value_t = 25_000.0,
        help = "Savings assumed when none are given"
    )]
    default_savings: f64,
    #[arg(
        long,
        global = true,
        default_value_t = 2_000.0,
        help = "Monthly spend assumed when none is given"
    )]
    default_monthly_spend: f64,
}

#[derive(Args, Debug, Clone)]
struct UpstreamArgs {
    #[arg(
        long,
        env = "EQUITY_GAP_UPSTREAM",
        help = "Base URL of the remote API; computed locally when absent or unreachable"
    )]
    upstream: Option<String>,
    #[arg(long, default_value_t = 10, help = "Remote request timeout in seconds")]
    timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API.
    Serve {
        #[arg(long, env = "EQUITY_GAP_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Cost of a career break spent living off savings.
    Simulate {
        #[arg(long, default_value_t = DEFAULT_BREAK_MONTHS as i64, allow_negative_numbers = true)]
        months: i64,
        #[arg(long, allow_negative_numbers = true)]
        monthly_spend: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        savings: Option<f64>,
        #[command(flatten)]
        upstream: UpstreamArgs,
    },
    /// Compounded cost of the pay gap for a role over a career.
    Lifetime {
        #[arg(long)]
        role: String,
        #[arg(long, default_value_t = DEFAULT_HORIZON_YEARS as i64)]
        years: i64,
        #[command(flatten)]
        upstream: UpstreamArgs,
    },
    /// Compare a salary against the market average for a role.
    GapCheck {
        #[arg(long)]
        role: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        current_salary: f64,
        #[command(flatten)]
        upstream: UpstreamArgs,
    },
    /// Ask the negotiation coach a question.
    Chat {
        #[arg(long, default_value = "")]
        message: String,
        #[command(flatten)]
        upstream: UpstreamArgs,
    },
}

fn build_defaults(args: &DefaultsArgs) -> Result<FallbackDefaults, CliError> {
    if !(-99.0..=100.0).contains(&args.annual_growth) {
        return Err(CliError::Config(
            "--annual-growth must be between -99 and 100".to_string(),
        ));
    }
    if !(-99.0..=100.0).contains(&args.investment_return) {
        return Err(CliError::Config(
            "--investment-return must be between -99 and 100".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&args.employer_match) {
        return Err(CliError::Config(
            "--employer-match must be between 0 and 100".to_string(),
        ));
    }
    if !(0.0..=200.0).contains(&args.female_to_male_ratio) {
        return Err(CliError::Config(
            "--female-to-male-ratio must be between 0 and 200".to_string(),
        ));
    }
    if !args.default_savings.is_finite() || args.default_savings < 0.0 {
        return Err(CliError::Config("--default-savings must be >= 0".to_string()));
    }
    if !args.default_monthly_spend.is_finite() || args.default_monthly_spend < 0.0 {
        return Err(CliError::Config(
            "--default-monthly-spend must be >= 0".to_string(),
        ));
    }

    Ok(FallbackDefaults {
        starting_savings: args.default_savings,
        monthly_spend: args.default_monthly_spend,
        rates: GrowthRates {
            annual_growth_rate: args.annual_growth / 100.0,
            investment_return_rate: args.investment_return / 100.0,
            employer_match_rate: args.employer_match / 100.0,
        },
        female_to_male_ratio: args.female_to_male_ratio / 100.0,
    })
}

fn build_service(
    upstream: &UpstreamArgs,
    defaults: FallbackDefaults,
) -> Result<ProjectionService, CliError> {
    match upstream.upstream.as_deref() {
        Some(url) if !url.trim().is_empty() => {
            let backend = HttpBackend::new(url.trim(), Duration::from_secs(upstream.timeout_secs))?;
            tracing::info!(upstream = backend.base_url(), "using remote backend");
            Ok(ProjectionService::with_backend(Arc::new(backend), defaults))
        }
        _ => Ok(ProjectionService::local(defaults)),
    }
}

pub fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let defaults = build_defaults(&cli.defaults)?;

    match cli.command {
        Command::Serve { port } => run_http_server(port, defaults).await?,
        Command::Simulate {
            months,
            monthly_spend,
            savings,
            upstream,
        } => {
            let service = build_service(&upstream, defaults)?;
            let out = service
                .simulate(SimulateRequestBody {
                    months: Some(months),
                    monthly_spend,
                    savings,
                })
                .await?;
            print_latest(&service, out)?;
        }
        Command::Lifetime {
            role,
            years,
            upstream,
        } => {
            let service = build_service(&upstream, defaults)?;
            let out = service
                .lifetime(LifetimeRequestBody {
                    role: Some(role),
                    years: Some(years),
                })
                .await?;
            print_latest(&service, out)?;
        }
        Command::GapCheck {
            role,
            location,
            current_salary,
            upstream,
        } => {
            let service = build_service(&upstream, defaults)?;
            let out = service
                .gap_check(GapCheckRequestBody {
                    role: Some(role),
                    location,
                    current_salary: Some(current_salary),
                })
                .await?;
            print_latest(&service, out)?;
        }
        Command::Chat { message, upstream } => {
            let service = build_service(&upstream, defaults)?;
            let out = service
                .chat(ChatRequestBody {
                    message,
                    context: serde_json::Value::Null,
                })
                .await?;
            print_latest(&service, out)?;
        }
    }
    Ok(())
}

fn print_latest<T: Serialize>(
    service: &ProjectionService,
    out: Sequenced<Projection<T>>,
) -> Result<(), CliError> {
    if let Some(projection) = service.accept(out) {
        println!("{}", serde_json::to_string_pretty(&projection)?);
    }
    Ok(())
}
