mod benchmark;
mod coach;
mod engine;
mod money;
mod rng;
mod types;

pub use benchmark::{
    DEFAULT_MARKET_AVERAGE, GapAssessment, MarketBenchmark, Verdict, assess_gap, benchmark_for,
    fallback_population,
};
pub use coach::{Coach, TipCategory, classify_message};
pub use engine::{project_lifetime, simulate_depletion};
pub use money::{format_currency, round_currency};
pub use types::{
    DEFAULT_ANNUAL_GROWTH_RATE, DEFAULT_BREAK_MONTHS, DEFAULT_EMPLOYER_MATCH_RATE,
    DEFAULT_FEMALE_TO_MALE_RATIO, DEFAULT_HORIZON_YEARS, DEFAULT_INVESTMENT_RETURN_RATE,
    DEFAULT_MONTHLY_SPEND, DEFAULT_STARTING_SAVINGS, FallbackDefaults, GrowthRates,
    LifetimeRequest, LifetimeResult, PopulationStats, SimulationRequest, SimulationResult,
};
