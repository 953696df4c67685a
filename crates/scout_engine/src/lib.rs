//! Scout engine: backend transport, request coordination and effect execution.
mod coordinator;
mod debounce;
mod engine;
mod followers;
mod health;
mod render;
mod transport;
mod types;

pub use coordinator::{CallOptions, CallToken, Outcome, RequestCoordinator};
pub use debounce::Debouncer;
pub use engine::{EngineError, EngineHandle, EngineSettings};
pub use followers::{FollowerBackfill, FOLLOWER_BACKFILL_LIMIT};
pub use health::{check_health, spawn_health_monitor, HealthSettings};
pub use render::{ChannelRenderer, Renderer, UiEvent};
pub use transport::{ClientSettings, ReqwestTransport, Transport, DEFAULT_API_BASE_URL};
pub use types::{
    ApiStatus, Contributor, ContributorsResponse, HealthStatus, Recommendation,
    RecommendationAnalysis, RecommendationsResponse, RenderPayload, RepositoryInfo, ResultKind,
    Suggestion, SuggestionsResponse, UserProfile,
};
