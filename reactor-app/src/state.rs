use reactor_claims::ClaimDetector;
use reactor_gateway::Gateway;
use reactor_reputation::{DashboardSplit, TrustThresholds};
use std::sync::Arc;

/// Everything a request handler needs. Immutable after startup.
pub struct AppState {
    pub gateway: Gateway,
    pub detector: ClaimDetector,
    pub trust: TrustThresholds,
    pub split: DashboardSplit,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(gateway: Gateway, detector: ClaimDetector) -> Self {
        Self {
            gateway,
            detector,
            trust: TrustThresholds::default(),
            split: DashboardSplit::default(),
        }
    }

    pub fn with_reputation(mut self, trust: TrustThresholds, split: DashboardSplit) -> Self {
        self.trust = trust;
        self.split = split;
        self
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
