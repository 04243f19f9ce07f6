pub mod advisor;
pub mod project;
pub mod settings;

pub use advisor::{AdvisorState, ChatMessage, ChatRole};
pub use project::{
    block_display_name, block_summary, short_id, ProjectStore, SharedStore, StoreError,
    SubscriptionId,
};
pub use settings::{AdvisorSettings, AppSettings, DisplaySettings};

use crate::geometry::PlanarGeometry;

/// Combined application state
pub struct AppState {
    pub project: ProjectStore,
    pub advisor: AdvisorState,
    pub settings: AppSettings,
    pub geometry: PlanarGeometry,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            project: ProjectStore::with_currency(settings.currency.clone()),
            advisor: AdvisorState::default(),
            settings,
            geometry: PlanarGeometry,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppSettings::load())
    }
}
