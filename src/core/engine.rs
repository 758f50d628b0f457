use super::money::format_currency;
use super::types::{
    LifetimeRequest, LifetimeResult, PopulationStats, SimulationRequest, SimulationResult,
};
use crate::error::ProjectionError;

/// Spends savings down month by month with no interest. The balance floors at
/// zero, so the trajectory never goes negative.
pub fn simulate_depletion(
    request: &SimulationRequest,
) -> Result<SimulationResult, ProjectionError> {
    validate_simulation(request)?;

    let months = request.months as usize;
    let mut trajectory = Vec::with_capacity(months + 1);
    let mut balance = request.starting_savings;
    trajectory.push(balance);
    for _ in 0..months {
        balance = (balance - request.monthly_spend).max(0.0);
        trajectory.push(balance);
    }

    let total_lost = trajectory[0] - trajectory[months];
    let message = format!(
        "A {}-month break costs you {} in savings.",
        request.months,
        format_currency(request.months as f64 * request.monthly_spend)
    );

    Ok(SimulationResult {
        trajectory,
        total_lost,
        message,
    })
}

/// Projects both salary trajectories over `years` and splits the cumulative gap
/// into lost salary, lost investment growth and lost employer match.
///
/// Each year's gap is treated as principal invested at the end of that year and
/// compounded at the investment return until the horizon. The investment figure
/// is the growth only; the principal is already counted as lost salary.
pub fn project_lifetime(
    request: &LifetimeRequest,
    stats: &PopulationStats,
) -> Result<LifetimeResult, ProjectionError> {
    validate_lifetime(request, stats)?;

    let years = request.years;
    let growth = 1.0 + stats.annual_growth_rate;
    let invest = 1.0 + stats.investment_return_rate;

    let points = years as usize + 1;
    let mut male_trajectory = Vec::with_capacity(points);
    let mut female_trajectory = Vec::with_capacity(points);
    let mut year_labels = Vec::with_capacity(points);
    for year in 0..=years {
        let raise_factor = growth.powf(year as f64);
        male_trajectory.push(stats.male_avg * raise_factor);
        female_trajectory.push(stats.female_avg * raise_factor);
        year_labels.push(year);
    }

    let mut lost_salary = 0.0;
    let mut invested_at_horizon = 0.0;
    let mut lost_retirement = 0.0;
    for year in 1..=years {
        let idx = year as usize;
        let annual_gap = male_trajectory[idx] - female_trajectory[idx];
        let horizon_factor = invest.powf((years - year) as f64);
        lost_salary += annual_gap;
        invested_at_horizon += annual_gap * horizon_factor;
        lost_retirement += annual_gap * stats.employer_match_rate * horizon_factor;
    }
    let lost_investment = invested_at_horizon - lost_salary;

    let gap = male_trajectory[0] - female_trajectory[0];
    let gap_percent = if male_trajectory[0] > 0.0 {
        (gap / male_trajectory[0] * 100.0).round()
    } else {
        0.0
    };

    Ok(LifetimeResult {
        male_trajectory,
        female_trajectory,
        year_labels,
        gap,
        gap_percent,
        total_lost_salary: lost_salary,
        total_lost_investment: lost_investment,
        total_lost_retirement: lost_retirement,
        total_compound_loss: lost_salary + lost_investment + lost_retirement,
    })
}

fn validate_simulation(request: &SimulationRequest) -> Result<(), ProjectionError> {
    if request.months == 0 {
        return Err(ProjectionError::invalid("months must be > 0"));
    }
    if !request.monthly_spend.is_finite() || request.monthly_spend < 0.0 {
        return Err(ProjectionError::invalid(
            "monthly spend must be a finite number >= 0",
        ));
    }
    if !request.starting_savings.is_finite() || request.starting_savings < 0.0 {
        return Err(ProjectionError::invalid(
            "starting savings must be a finite number >= 0",
        ));
    }
    Ok(())
}

fn validate_lifetime(
    request: &LifetimeRequest,
    stats: &PopulationStats,
) -> Result<(), ProjectionError> {
    if request.role.trim().is_empty() {
        return Err(ProjectionError::invalid("role must not be empty"));
    }
    if !stats.male_avg.is_finite() || stats.male_avg < 0.0 {
        return Err(ProjectionError::invalid(
            "male average must be a finite number >= 0",
        ));
    }
    if !stats.female_avg.is_finite() || stats.female_avg < 0.0 {
        return Err(ProjectionError::invalid(
            "female average must be a finite number >= 0",
        ));
    }
    if !stats.annual_growth_rate.is_finite() || stats.annual_growth_rate <= -1.0 {
        return Err(ProjectionError::invalid(
            "annual growth rate must be finite and > -100%",
        ));
    }
    if !stats.investment_return_rate.is_finite() || stats.investment_return_rate <= -1.0 {
        return Err(ProjectionError::invalid(
            "investment return rate must be finite and > -100%",
        ));
    }
    if !stats.employer_match_rate.is_finite() || stats.employer_match_rate < 0.0 {
        return Err(ProjectionError::invalid(
            "employer match rate must be a finite number >= 0",
        ));
    }
    Ok(())
}
