//! Answers each `/api/*` request with the local engine. The server uses these
//! as its authoritative implementation and the client uses them as its
//! fallback, so both produce identical bodies.

use crate::core::{
    Coach, FallbackDefaults, LifetimeRequest, SimulationRequest, assess_gap, benchmark_for,
    fallback_population, project_lifetime, simulate_depletion,
};
use crate::error::ProjectionError;
use crate::wire::{
    ChatRequestBody, ChatResponseBody, GapCheckRequestBody, GapCheckResponseBody,
    LifetimeResponseBody, SimulateResponseBody,
};

pub fn simulate(request: &SimulationRequest) -> Result<SimulateResponseBody, ProjectionError> {
    simulate_depletion(request).map(SimulateResponseBody::from)
}

pub fn lifetime(
    request: &LifetimeRequest,
    defaults: &FallbackDefaults,
) -> Result<LifetimeResponseBody, ProjectionError> {
    let stats = fallback_population(&request.role, defaults);
    let result = project_lifetime(request, &stats)?;
    Ok(LifetimeResponseBody::new(&request.role, &stats, result))
}

pub fn gap_check(body: &GapCheckRequestBody) -> Result<GapCheckResponseBody, ProjectionError> {
    let role = body.role();
    let benchmark = benchmark_for(role);
    assess_gap(role, body.current_salary(), &benchmark).map(GapCheckResponseBody::from)
}

pub fn chat(body: &ChatRequestBody, seed: u64) -> ChatResponseBody {
    ChatResponseBody {
        reply: Coach::new(seed).reply(&body.message),
    }
}
