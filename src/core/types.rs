pub const DEFAULT_STARTING_SAVINGS: f64 = 25_000.0;
pub const DEFAULT_MONTHLY_SPEND: f64 = 2_000.0;
pub const DEFAULT_BREAK_MONTHS: u32 = 6;
pub const DEFAULT_HORIZON_YEARS: u32 = 30;

pub const DEFAULT_ANNUAL_GROWTH_RATE: f64 = 0.03;
pub const DEFAULT_INVESTMENT_RETURN_RATE: f64 = 0.07;
pub const DEFAULT_EMPLOYER_MATCH_RATE: f64 = 0.04;
pub const DEFAULT_FEMALE_TO_MALE_RATIO: f64 = 0.90;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationRequest {
    pub months: u32,
    pub monthly_spend: f64,
    pub starting_savings: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Balance at the start of the break followed by the balance after each month.
    pub trajectory: Vec<f64>,
    pub total_lost: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LifetimeRequest {
    pub role: String,
    pub years: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthRates {
    pub annual_growth_rate: f64,
    pub investment_return_rate: f64,
    pub employer_match_rate: f64,
}

impl Default for GrowthRates {
    fn default() -> Self {
        Self {
            annual_growth_rate: DEFAULT_ANNUAL_GROWTH_RATE,
            investment_return_rate: DEFAULT_INVESTMENT_RETURN_RATE,
            employer_match_rate: DEFAULT_EMPLOYER_MATCH_RATE,
        }
    }
}

/// Average salaries for the two groups being compared, plus the rates used to
/// project them forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationStats {
    pub male_avg: f64,
    pub male_count: u64,
    pub female_avg: f64,
    pub female_count: u64,
    pub annual_growth_rate: f64,
    pub employer_match_rate: f64,
    pub investment_return_rate: f64,
}

impl PopulationStats {
    pub fn new(male_avg: f64, female_avg: f64, rates: GrowthRates) -> Self {
        Self {
            male_avg,
            male_count: 0,
            female_avg,
            female_count: 0,
            annual_growth_rate: rates.annual_growth_rate,
            employer_match_rate: rates.employer_match_rate,
            investment_return_rate: rates.investment_return_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LifetimeResult {
    pub male_trajectory: Vec<f64>,
    pub female_trajectory: Vec<f64>,
    pub year_labels: Vec<u32>,
    pub gap: f64,
    pub gap_percent: f64,
    pub total_lost_salary: f64,
    pub total_lost_investment: f64,
    pub total_lost_retirement: f64,
    pub total_compound_loss: f64,
}

/// Values the local engine falls back on when the remote backend cannot answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackDefaults {
    pub starting_savings: f64,
    pub monthly_spend: f64,
    pub rates: GrowthRates,
    pub female_to_male_ratio: f64,
}

impl Default for FallbackDefaults {
    fn default() -> Self {
        Self {
            starting_savings: DEFAULT_STARTING_SAVINGS,
            monthly_spend: DEFAULT_MONTHLY_SPEND,
            rates: GrowthRates::default(),
            female_to_male_ratio: DEFAULT_FEMALE_TO_MALE_RATIO,
        }
    }
}
