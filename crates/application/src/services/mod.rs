//! Application services - Use case implementations

mod observation_query_service;
mod update_orchestrator;

pub use observation_query_service::{
    ComparisonHighlights, Lookup, ObservationQueryService, WindowSummary, window_from_hours,
};
pub use update_orchestrator::{
    LocationOutcome, OrchestratorConfig, UpdateOrchestrator, UpdateReport,
};
