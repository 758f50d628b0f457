//! Projection Service: asks the remote backend once and falls back to the
//! local engine when the backend cannot give a usable answer.

mod backend;
mod sequence;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

pub use backend::{DEFAULT_TIMEOUT, HttpBackend, ProjectionBackend};
pub use sequence::{Endpoint, RequestSequencer, Sequenced};

use crate::compute;
use crate::core::FallbackDefaults;
use crate::error::ProjectionError;
use crate::wire::{
    ChatRequestBody, ChatResponseBody, GapCheckRequestBody, GapCheckResponseBody,
    LifetimeRequestBody, LifetimeResponseBody, SimulateRequestBody, SimulateResponseBody,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Remote,
    Local,
}

/// A response body together with where it was computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection<T> {
    pub provenance: Provenance,
    #[serde(flatten)]
    pub value: T,
}

impl<T> Projection<T> {
    pub fn remote(value: T) -> Self {
        Self {
            provenance: Provenance::Remote,
            value,
        }
    }

    pub fn local(value: T) -> Self {
        Self {
            provenance: Provenance::Local,
            value,
        }
    }

    /// Local results are approximations of what the backend would say.
    pub fn is_approximate(&self) -> bool {
        self.provenance == Provenance::Local
    }
}

type ServiceResult<T> = Result<Sequenced<Projection<T>>, ProjectionError>;

pub struct ProjectionService {
    backend: Option<Arc<dyn ProjectionBackend>>,
    defaults: FallbackDefaults,
    simulate_seq: RequestSequencer,
    lifetime_seq: RequestSequencer,
    gap_check_seq: RequestSequencer,
    chat_seq: RequestSequencer,
}

impl ProjectionService {
    /// A service with no remote backend; every answer is computed locally.
    pub fn local(defaults: FallbackDefaults) -> Self {
        Self::build(None, defaults)
    }

    pub fn with_backend(backend: Arc<dyn ProjectionBackend>, defaults: FallbackDefaults) -> Self {
        Self::build(Some(backend), defaults)
    }

    fn build(backend: Option<Arc<dyn ProjectionBackend>>, defaults: FallbackDefaults) -> Self {
        Self {
            backend,
            defaults,
            simulate_seq: RequestSequencer::new(),
            lifetime_seq: RequestSequencer::new(),
            gap_check_seq: RequestSequencer::new(),
            chat_seq: RequestSequencer::new(),
        }
    }

    fn sequencer_for(&self, endpoint: Endpoint) -> &RequestSequencer {
        match endpoint {
            Endpoint::Simulate => &self.simulate_seq,
            Endpoint::Lifetime => &self.lifetime_seq,
            Endpoint::GapCheck => &self.gap_check_seq,
            Endpoint::Chat => &self.chat_seq,
        }
    }

    /// Unwraps a response if it answers the most recent request to the same
    /// endpoint.
    pub fn accept<T>(&self, response: Sequenced<T>) -> Option<T> {
        self.sequencer_for(response.endpoint).accept(response)
    }

    pub async fn simulate(&self, body: SimulateRequestBody) -> ServiceResult<SimulateResponseBody> {
        let endpoint = Endpoint::Simulate;
        let seq = self.sequencer_for(endpoint).issue();
        let request = body.to_request(&self.defaults)?;
        let resolved = SimulateRequestBody {
            months: Some(request.months as i64),
            monthly_spend: Some(request.monthly_spend),
            savings: Some(request.starting_savings),
        };

        let remote = match &self.backend {
            Some(backend) => Some(backend.simulate(&resolved).await.and_then(|response| {
                response.check_shape(&request)?;
                Ok(response)
            })),
            None => None,
        };
        let value = recover(endpoint, remote, || compute::simulate(&request))?;
        Ok(Sequenced {
            endpoint,
            seq,
            value,
        })
    }

    pub async fn lifetime(&self, body: LifetimeRequestBody) -> ServiceResult<LifetimeResponseBody> {
        let endpoint = Endpoint::Lifetime;
        let seq = self.sequencer_for(endpoint).issue();
        let request = body.to_request()?;
        let resolved = LifetimeRequestBody {
            role: Some(request.role.clone()),
            years: Some(request.years as i64),
        };

        let remote = match &self.backend {
            Some(backend) => Some(
                backend
                    .lifetime(&resolved)
                    .await
                    .and_then(|raw| LifetimeResponseBody::from_remote(raw, &request)),
            ),
            None => None,
        };
        let value = recover(endpoint, remote, || {
            compute::lifetime(&request, &self.defaults)
        })?;
        Ok(Sequenced {
            endpoint,
            seq,
            value,
        })
    }

    pub async fn gap_check(&self, body: GapCheckRequestBody) -> ServiceResult<GapCheckResponseBody> {
        let endpoint = Endpoint::GapCheck;
        let seq = self.sequencer_for(endpoint).issue();
        body.validate()?;

        let remote = match &self.backend {
            Some(backend) => Some(backend.gap_check(&body).await),
            None => None,
        };
        let value = recover(endpoint, remote, || compute::gap_check(&body))?;
        Ok(Sequenced {
            endpoint,
            seq,
            value,
        })
    }

    pub async fn chat(&self, body: ChatRequestBody) -> ServiceResult<ChatResponseBody> {
        let endpoint = Endpoint::Chat;
        let seq = self.sequencer_for(endpoint).issue();

        let remote = match &self.backend {
            Some(backend) => Some(backend.chat(&body).await),
            None => None,
        };
        let value = recover(endpoint, remote, || Ok(compute::chat(&body, seq)))?;
        Ok(Sequenced {
            endpoint,
            seq,
            value,
        })
    }
}

/// Keeps a remote answer, or computes locally when there was none or the
/// remote failed in a recoverable way. Input errors are passed through.
fn recover<T>(
    endpoint: Endpoint,
    remote: Option<Result<T, ProjectionError>>,
    local: impl FnOnce() -> Result<T, ProjectionError>,
) -> Result<Projection<T>, ProjectionError> {
    match remote {
        Some(Ok(value)) => Ok(Projection::remote(value)),
        Some(Err(err)) if err.is_recoverable() => {
            warn!(
                endpoint = endpoint.as_str(),
                error = %err,
                "remote projection failed, computing locally"
            );
            local().map(Projection::local)
        }
        Some(Err(err)) => Err(err),
        None => {
            debug!(
                endpoint = endpoint.as_str(),
                "no remote backend configured, computing locally"
            );
            local().map(Projection::local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend stub that replays fixed answers and counts calls.
    #[derive(Default)]
    struct StubBackend {
        simulate: Option<SimulateResponseBody>,
        lifetime: Option<serde_json::Value>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProjectionBackend for StubBackend {
        async fn simulate(
            &self,
            _body: &SimulateRequestBody,
        ) -> Result<SimulateResponseBody, ProjectionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.simulate
                .clone()
                .ok_or_else(|| ProjectionError::RemoteUnavailable("stub offline".to_string()))
        }

        async fn lifetime(
            &self,
            _body: &LifetimeRequestBody,
        ) -> Result<serde_json::Value, ProjectionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.lifetime
                .clone()
                .ok_or_else(|| ProjectionError::RemoteUnavailable("stub offline".to_string()))
        }

        async fn gap_check(
            &self,
            _body: &GapCheckRequestBody,
        ) -> Result<GapCheckResponseBody, ProjectionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ProjectionError::MalformedResponse("missing verdict".to_string()))
        }

        async fn chat(&self, _body: &ChatRequestBody) -> Result<ChatResponseBody, ProjectionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ChatResponseBody {
                reply: "remote tip".to_string(),
            })
        }
    }

    fn body(months: i64, spend: f64) -> SimulateRequestBody {
        SimulateRequestBody {
            months: Some(months),
            monthly_spend: Some(spend),
            savings: Some(25_000.0),
        }
    }

    #[tokio::test]
    async fn without_backend_results_are_local() {
        let service = ProjectionService::local(FallbackDefaults::default());
        let out = service.simulate(body(3, 3_000.0)).await.expect("valid");
        let projection = service.accept(out).expect("latest");

        assert!(projection.is_approximate());
        assert_eq!(
            projection.value.chart_data,
            vec![25_000.0, 22_000.0, 19_000.0, 16_000.0]
        );
        assert_eq!(projection.value.lost, 9_000.0);
    }

    #[tokio::test]
    async fn healthy_backend_answer_is_kept() {
        let stub = Arc::new(StubBackend {
            simulate: Some(SimulateResponseBody {
                lost: 6_100.0,
                chart_data: vec![25_000.0, 21_950.0, 18_900.0],
                message: "remote".to_string(),
            }),
            ..StubBackend::default()
        });
        let service = ProjectionService::with_backend(stub.clone(), FallbackDefaults::default());

        let out = service.simulate(body(2, 3_000.0)).await.expect("valid");
        assert_eq!(out.value.provenance, Provenance::Remote);
        assert_eq!(out.value.value.lost, 6_100.0);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_backend_answer_falls_back_once() {
        let stub = Arc::new(StubBackend {
            simulate: Some(SimulateResponseBody {
                lost: 0.0,
                chart_data: vec![25_000.0],
                message: String::new(),
            }),
            ..StubBackend::default()
        });
        let service = ProjectionService::with_backend(stub.clone(), FallbackDefaults::default());

        let out = service.simulate(body(2, 3_000.0)).await.expect("valid");
        assert_eq!(out.value.provenance, Provenance::Local);
        assert_eq!(out.value.value.chart_data, vec![25_000.0, 22_000.0, 19_000.0]);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_backend() {
        let stub = Arc::new(StubBackend::default());
        let service = ProjectionService::with_backend(stub.clone(), FallbackDefaults::default());

        let err = service
            .simulate(body(0, 3_000.0))
            .await
            .expect_err("must reject");
        assert!(matches!(err, ProjectionError::InvalidInput(_)));

        let err = service
            .lifetime(LifetimeRequestBody {
                role: Some("Data Analyst".to_string()),
                years: Some(15),
            })
            .await
            .expect_err("must reject");
        assert!(matches!(err, ProjectionError::InvalidInput(_)));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lifetime_failure_body_falls_back_to_local() {
        let stub = Arc::new(StubBackend {
            lifetime: Some(serde_json::json!({"success": false, "error": "no data"})),
            ..StubBackend::default()
        });
        let service = ProjectionService::with_backend(stub, FallbackDefaults::default());

        let out = service
            .lifetime(LifetimeRequestBody {
                role: Some("Data Analyst".to_string()),
                years: Some(10),
            })
            .await
            .expect("valid");
        assert!(out.value.is_approximate());
        assert_eq!(out.value.value.male_avg, 85_000.0);
        assert_eq!(out.value.value.year_labels.len(), 11);
    }

    #[tokio::test]
    async fn gap_check_and_chat_use_backend_when_possible() {
        let service =
            ProjectionService::with_backend(Arc::new(StubBackend::default()), FallbackDefaults::default());

        let gap = service
            .gap_check(GapCheckRequestBody {
                role: Some("UX Designer".to_string()),
                location: None,
                current_salary: Some(80_000.0),
            })
            .await
            .expect("valid");
        assert_eq!(gap.value.provenance, Provenance::Local);
        assert_eq!(gap.value.value.gap_amount, 15_000.0);

        let chat = service
            .chat(ChatRequestBody {
                message: "hello".to_string(),
                context: serde_json::Value::Null,
            })
            .await
            .expect("chat never fails");
        assert_eq!(chat.value.provenance, Provenance::Remote);
        assert_eq!(chat.value.value.reply, "remote tip");
    }

    #[tokio::test]
    async fn unreachable_http_backend_falls_back() {
        let backend = HttpBackend::new("http://127.0.0.1:1", std::time::Duration::from_secs(2))
            .expect("client builds");
        let service = ProjectionService::with_backend(Arc::new(backend), FallbackDefaults::default());

        let out = service.simulate(body(1, 3_000.0)).await.expect("valid");
        assert!(out.value.is_approximate());
        assert_eq!(out.value.value.chart_data, vec![25_000.0, 22_000.0]);
    }

    #[tokio::test]
    async fn superseded_response_is_discarded() {
        let service = ProjectionService::local(FallbackDefaults::default());
        let first = service.simulate(body(3, 2_000.0)).await.expect("valid");
        let second = service.simulate(body(4, 2_000.0)).await.expect("valid");

        assert!(service.accept(first).is_none());
        let latest = service.accept(second).expect("latest is kept");
        assert_eq!(latest.value.chart_data.len(), 5);
    }

    #[tokio::test]
    async fn requests_to_other_endpoints_do_not_supersede() {
        let service = ProjectionService::local(FallbackDefaults::default());
        let lifetime = service
            .lifetime(LifetimeRequestBody {
                role: Some("Data Analyst".to_string()),
                years: Some(10),
            })
            .await
            .expect("valid");
        let chat = service
            .chat(ChatRequestBody {
                message: "hello".to_string(),
                context: serde_json::Value::Null,
            })
            .await
            .expect("chat never fails");

        let kept = service.accept(lifetime).expect("lifetime is still latest");
        assert_eq!(kept.value.year_labels.len(), 11);
        assert!(service.accept(chat).is_some());
    }

    #[tokio::test]
    async fn server_error_status_falls_back_to_local() {
        use axum::{Router, http::StatusCode, routing::post};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let app = Router::new().route(
            "/api/simulate",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });

        let backend = HttpBackend::new(format!("http://{addr}"), std::time::Duration::from_secs(5))
            .expect("client builds");
        let service = ProjectionService::with_backend(Arc::new(backend), FallbackDefaults::default());

        let out = service.simulate(body(2, 3_000.0)).await.expect("valid");
        assert_eq!(out.value.provenance, Provenance::Local);
        assert_eq!(out.value.value.chart_data, vec![25_000.0, 22_000.0, 19_000.0]);
        assert_eq!(out.value.value.lost, 6_000.0);
    }

    #[test]
    fn projection_serializes_provenance_alongside_body() {
        let projection = Projection::local(ChatResponseBody {
            reply: "tip".to_string(),
        });
        let json = serde_json::to_string(&projection).expect("serialize");
        assert_eq!(json, r#"{"provenance":"local","reply":"tip"}"#);
    }
}
