//! JSON bodies of the `/api/*` contract, shared by the server and the client so
//! both sides validate and convert requests the same way.
//!
//! Response bodies hold `f64` so they accept whatever numeric form a backend
//! sends, and serialize currency fields rounded to whole units.

use serde::{Deserialize, Serialize, Serializer};

use crate::core::{
    DEFAULT_BREAK_MONTHS, DEFAULT_HORIZON_YEARS, FallbackDefaults, GapAssessment, LifetimeRequest,
    LifetimeResult, PopulationStats, SimulationRequest, SimulationResult, round_currency,
};
use crate::error::ProjectionError;

pub const MIN_BREAK_MONTHS: i64 = 1;
pub const MAX_BREAK_MONTHS: i64 = 24;
pub const HORIZON_CHOICES: [u32; 4] = [10, 20, 30, 40];

fn whole<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(round_currency(*value))
}

fn whole_seq<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|v| round_currency(*v)))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulateRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_spend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<f64>,
}

impl SimulateRequestBody {
    /// Fills missing fields from `defaults` and rejects values outside the
    /// range the product offers.
    pub fn to_request(
        &self,
        defaults: &FallbackDefaults,
    ) -> Result<SimulationRequest, ProjectionError> {
        let months = self.months.unwrap_or(DEFAULT_BREAK_MONTHS as i64);
        if !(MIN_BREAK_MONTHS..=MAX_BREAK_MONTHS).contains(&months) {
            return Err(ProjectionError::invalid(format!(
                "months must be between {MIN_BREAK_MONTHS} and {MAX_BREAK_MONTHS}"
            )));
        }
        let monthly_spend = self.monthly_spend.unwrap_or(defaults.monthly_spend);
        if !monthly_spend.is_finite() || monthly_spend < 0.0 {
            return Err(ProjectionError::invalid("monthly_spend must be >= 0"));
        }
        let starting_savings = self.savings.unwrap_or(defaults.starting_savings);
        if !starting_savings.is_finite() || starting_savings < 0.0 {
            return Err(ProjectionError::invalid("savings must be >= 0"));
        }

        Ok(SimulationRequest {
            months: months as u32,
            monthly_spend,
            starting_savings,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulateResponseBody {
    #[serde(serialize_with = "whole")]
    pub lost: f64,
    #[serde(serialize_with = "whole_seq")]
    pub chart_data: Vec<f64>,
    #[serde(default)]
    pub message: String,
}

impl From<SimulationResult> for SimulateResponseBody {
    fn from(result: SimulationResult) -> Self {
        Self {
            lost: result.total_lost,
            chart_data: result.trajectory,
            message: result.message,
        }
    }
}

impl SimulateResponseBody {
    pub fn check_shape(&self, request: &SimulationRequest) -> Result<(), ProjectionError> {
        let expected = request.months as usize + 1;
        if self.chart_data.len() != expected {
            return Err(ProjectionError::MalformedResponse(format!(
                "chart_data has {} points, expected {expected}",
                self.chart_data.len()
            )));
        }
        if self.chart_data.iter().any(|v| !v.is_finite()) || !self.lost.is_finite() {
            return Err(ProjectionError::MalformedResponse(
                "simulation contains non-finite values".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifetimeRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<i64>,
}

impl LifetimeRequestBody {
    pub fn to_request(&self) -> Result<LifetimeRequest, ProjectionError> {
        let role = self.role.as_deref().unwrap_or_default().trim();
        if role.is_empty() {
            return Err(ProjectionError::invalid("role is required"));
        }
        let years = self.years.unwrap_or(DEFAULT_HORIZON_YEARS as i64);
        let years = HORIZON_CHOICES
            .into_iter()
            .find(|&choice| choice as i64 == years)
            .ok_or_else(|| ProjectionError::invalid("years must be one of 10, 20, 30 or 40"))?;

        Ok(LifetimeRequest {
            role: role.to_string(),
            years,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifetimeResponseBody {
    pub success: bool,
    pub role: String,
    #[serde(serialize_with = "whole")]
    pub male_avg: f64,
    pub male_count: u64,
    #[serde(serialize_with = "whole")]
    pub female_avg: f64,
    pub female_count: u64,
    #[serde(serialize_with = "whole")]
    pub gap: f64,
    #[serde(serialize_with = "whole")]
    pub gap_percent: f64,
    pub year_labels: Vec<u32>,
    #[serde(serialize_with = "whole_seq")]
    pub male_trajectory: Vec<f64>,
    #[serde(serialize_with = "whole_seq")]
    pub female_trajectory: Vec<f64>,
    #[serde(serialize_with = "whole")]
    pub total_lost_salary: f64,
    #[serde(serialize_with = "whole")]
    pub total_lost_investment: f64,
    #[serde(serialize_with = "whole")]
    pub total_lost_retirement: f64,
    #[serde(serialize_with = "whole")]
    pub total_compound_loss: f64,
}

impl LifetimeResponseBody {
    pub fn new(role: &str, stats: &PopulationStats, result: LifetimeResult) -> Self {
        Self {
            success: true,
            role: role.to_string(),
            male_avg: stats.male_avg,
            male_count: stats.male_count,
            female_avg: stats.female_avg,
            female_count: stats.female_count,
            gap: result.gap,
            gap_percent: result.gap_percent,
            year_labels: result.year_labels,
            male_trajectory: result.male_trajectory,
            female_trajectory: result.female_trajectory,
            total_lost_salary: result.total_lost_salary,
            total_lost_investment: result.total_lost_investment,
            total_lost_retirement: result.total_lost_retirement,
            total_compound_loss: result.total_compound_loss,
        }
    }

    /// Parses a backend reply, treating `{success: false}` and bodies that do
    /// not match the requested horizon as malformed.
    pub fn from_remote(
        value: serde_json::Value,
        request: &LifetimeRequest,
    ) -> Result<Self, ProjectionError> {
        if value.get("success").and_then(serde_json::Value::as_bool) != Some(true) {
            let reason = value
                .get("error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("backend reported failure");
            return Err(ProjectionError::MalformedResponse(reason.to_string()));
        }
        let body: Self = serde_json::from_value(value)
            .map_err(|e| ProjectionError::MalformedResponse(e.to_string()))?;

        let expected = request.years as usize + 1;
        if body.male_trajectory.len() != expected
            || body.female_trajectory.len() != expected
            || body.year_labels.len() != expected
        {
            return Err(ProjectionError::MalformedResponse(format!(
                "lifetime trajectories do not hold {expected} points"
            )));
        }
        Ok(body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifetimeFailureBody {
    pub success: bool,
    pub error: String,
}

impl LifetimeFailureBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapCheckRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_salary: Option<f64>,
}

impl GapCheckRequestBody {
    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or_default().trim()
    }

    pub fn current_salary(&self) -> f64 {
        self.current_salary.unwrap_or(0.0)
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        if self.role().is_empty() {
            return Err(ProjectionError::invalid("role is required"));
        }
        let salary = self.current_salary();
        if !salary.is_finite() || salary < 0.0 {
            return Err(ProjectionError::invalid("current_salary must be >= 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapCheckResponseBody {
    pub verdict: String,
    #[serde(serialize_with = "whole")]
    pub market_average: f64,
    #[serde(serialize_with = "whole")]
    pub gap_amount: f64,
    #[serde(default)]
    pub message: String,
}

impl From<GapAssessment> for GapCheckResponseBody {
    fn from(assessment: GapAssessment) -> Self {
        Self {
            verdict: assessment.verdict.as_str().to_string(),
            market_average: assessment.market_average,
            gap_amount: assessment.gap_amount,
            message: assessment.message,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatRequestBody {
    pub message: String,
    pub context: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponseBody {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::simulate_depletion;

    #[test]
    fn simulate_body_defaults_missing_fields() {
        let body: SimulateRequestBody = serde_json::from_str("{}").expect("valid json");
        let request = body
            .to_request(&FallbackDefaults::default())
            .expect("defaults are valid");
        assert_eq!(request.months, 6);
        assert_eq!(request.monthly_spend, 2_000.0);
        assert_eq!(request.starting_savings, 25_000.0);
    }

    #[test]
    fn simulate_body_rejects_months_outside_range() {
        for months in [0, -3, 25] {
            let body = SimulateRequestBody {
                months: Some(months),
                ..SimulateRequestBody::default()
            };
            let err = body
                .to_request(&FallbackDefaults::default())
                .expect_err("must reject months");
            assert!(err.to_string().contains("months"));
        }
    }

    #[test]
    fn simulate_response_rounds_on_the_wire() {
        let result = simulate_depletion(&SimulationRequest {
            months: 2,
            monthly_spend: 1_000.4,
            starting_savings: 5_000.0,
        })
        .expect("valid request");
        let json = serde_json::to_string(&SimulateResponseBody::from(result)).expect("serialize");
        assert!(json.contains("\"lost\":2001"));
        assert!(json.contains("\"chart_data\":[5000,4000,2999]"));
    }

    #[test]
    fn simulate_response_check_shape_flags_short_chart() {
        let body = SimulateResponseBody {
            lost: 0.0,
            chart_data: vec![25_000.0],
            message: String::new(),
        };
        let request = SimulationRequest {
            months: 3,
            monthly_spend: 0.0,
            starting_savings: 25_000.0,
        };
        assert!(matches!(
            body.check_shape(&request),
            Err(ProjectionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn lifetime_body_accepts_only_offered_horizons() {
        let ok = LifetimeRequestBody {
            role: Some(" Data Analyst ".to_string()),
            years: Some(20),
        }
        .to_request()
        .expect("valid");
        assert_eq!(ok.role, "Data Analyst");
        assert_eq!(ok.years, 20);

        let bad_years = LifetimeRequestBody {
            role: Some("Data Analyst".to_string()),
            years: Some(15),
        };
        assert!(bad_years.to_request().is_err());

        let no_role = LifetimeRequestBody {
            role: None,
            years: Some(10),
        };
        assert!(no_role.to_request().is_err());
    }

    #[test]
    fn lifetime_from_remote_rejects_failure_and_wrong_length() {
        let request = LifetimeRequest {
            role: "Data Analyst".to_string(),
            years: 10,
        };
        let failure = serde_json::json!({"success": false, "error": "no data"});
        assert!(matches!(
            LifetimeResponseBody::from_remote(failure, &request),
            Err(ProjectionError::MalformedResponse(msg)) if msg == "no data"
        ));

        let short = serde_json::json!({
            "success": true,
            "role": "Data Analyst",
            "male_avg": 100000,
            "male_count": 10,
            "female_avg": 90000,
            "female_count": 12,
            "gap": 10000,
            "gap_percent": 10,
            "year_labels": [0],
            "male_trajectory": [100000],
            "female_trajectory": [90000],
            "total_lost_salary": 0,
            "total_lost_investment": 0,
            "total_lost_retirement": 0,
            "total_compound_loss": 0
        });
        assert!(LifetimeResponseBody::from_remote(short, &request).is_err());
    }
}
