use super::money::format_currency;
use super::types::{FallbackDefaults, PopulationStats};
use crate::error::ProjectionError;

pub const DEFAULT_MARKET_AVERAGE: f64 = 90_000.0;
pub const BENCHMARK_SAMPLE_SIZE: u64 = 150;

const KNOWN_ROLES: &[(&str, f64)] = &[
    ("software engineer", 128_000.0),
    ("data analyst", 85_000.0),
    ("data scientist", 120_000.0),
    ("product manager", 135_000.0),
    ("ux designer", 95_000.0),
    ("marketing manager", 88_000.0),
    ("financial analyst", 78_000.0),
    ("project manager", 92_000.0),
    ("devops engineer", 130_000.0),
    ("machine learning engineer", 140_000.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct MarketBenchmark {
    pub role: String,
    pub average_salary: f64,
    pub salary_min: f64,
    pub salary_max: f64,
    pub sample_size: u64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    Underpaid,
    FairRate,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Underpaid => "UNDERPAID",
            Verdict::FairRate => "FAIR RATE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GapAssessment {
    pub verdict: Verdict,
    pub market_average: f64,
    pub gap_amount: f64,
    pub message: String,
}

/// Looks up the market benchmark for a role. Matching ignores case and
/// surrounding whitespace; unknown roles get the default market average.
pub fn benchmark_for(role: &str) -> MarketBenchmark {
    let key = role.trim().to_lowercase();
    let average_salary = KNOWN_ROLES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, avg)| avg)
        .unwrap_or(DEFAULT_MARKET_AVERAGE);

    MarketBenchmark {
        role: role.trim().to_string(),
        average_salary,
        salary_min: (average_salary * 0.8).trunc(),
        salary_max: (average_salary * 1.25).trunc(),
        sample_size: BENCHMARK_SAMPLE_SIZE,
    }
}

pub fn assess_gap(
    role: &str,
    current_salary: f64,
    benchmark: &MarketBenchmark,
) -> Result<GapAssessment, ProjectionError> {
    if role.trim().is_empty() {
        return Err(ProjectionError::invalid("role must not be empty"));
    }
    if !current_salary.is_finite() || current_salary < 0.0 {
        return Err(ProjectionError::invalid(
            "current salary must be a finite number >= 0",
        ));
    }

    let gap_amount = (benchmark.average_salary - current_salary).max(0.0);
    let (verdict, message) = if gap_amount > 0.0 {
        (
            Verdict::Underpaid,
            format!(
                "You are leaving {} on the table.",
                format_currency(gap_amount)
            ),
        )
    } else {
        (
            Verdict::FairRate,
            "Your salary is competitive with market rates. Keep negotiating to stay ahead!"
                .to_string(),
        )
    };

    Ok(GapAssessment {
        verdict,
        market_average: benchmark.average_salary,
        gap_amount,
        message,
    })
}

/// Population stats used when no disaggregated data is reachable: the market
/// average stands in for the male average and the female average is scaled by
/// the configured ratio.
pub fn fallback_population(role: &str, defaults: &FallbackDefaults) -> PopulationStats {
    let benchmark = benchmark_for(role);
    PopulationStats::new(
        benchmark.average_salary,
        benchmark.average_salary * defaults.female_to_male_ratio,
        defaults.rates,
    )
}
