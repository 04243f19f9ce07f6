//! Headless harness for driving a project without a map or window.
//!
//! Wraps an `AppState` built from default settings, so nothing is read from
//! or written to the user's config directory.

use shared::{Block, BlockId, BlockType, LandUpdate, Metrics, NewBlock, Polygon, Usage};

use crate::export::feasibility_report;
use crate::map_adapter::{self, BlockSketch, VolumeSpec};
use crate::massing::{apply_template, MassingTemplate};
use crate::state::{AppSettings, AppState, StoreError};

/// Headless test harness around the application state
pub struct TestHarness {
    pub state: AppState,
}

impl TestHarness {
    /// Create a harness with default settings and an empty project.
    pub fn new() -> Self {
        Self {
            state: AppState::new(AppSettings::default()),
        }
    }

    // ── Blocks ────────────────────────────────────────────────

    /// Add a podium by area and height, returning its ID
    pub fn add_podium(&mut self, name: &str, base_area: f64, height: f64) -> BlockId {
        self.add(name, BlockType::Podium, Usage::Retail, base_area, height)
    }

    /// Add a residential tower by area and height, returning its ID
    pub fn add_tower(&mut self, name: &str, base_area: f64, height: f64) -> BlockId {
        self.add(name, BlockType::Tower, Usage::Residential, base_area, height)
    }

    /// Add a block with explicit type and usage
    pub fn add(
        &mut self,
        name: &str,
        kind: BlockType,
        usage: Usage,
        base_area: f64,
        height: f64,
    ) -> BlockId {
        self.state.project.add_block(NewBlock {
            name: name.to_string(),
            kind,
            usage,
            height,
            base_area,
            ..Default::default()
        })
    }

    /// Draw a block footprint as if on the map
    pub fn draw_block(&mut self, polygon: Polygon, sketch: BlockSketch) -> BlockId {
        map_adapter::on_block_drawn(&mut self.state.project, &self.state.geometry, polygon, sketch)
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.state.project.get_block(id)
    }

    pub fn block_count(&self) -> usize {
        self.state.project.blocks().len()
    }

    // ── Land ──────────────────────────────────────────────────

    /// Replace the parcel polygon and area, as the map does after drawing
    pub fn draw_parcel(&mut self, polygon: Polygon, area_m2: f64) -> Metrics {
        map_adapter::on_polygon_drawn(&mut self.state.project, polygon, area_m2)
    }

    pub fn update_land(&mut self, update: LandUpdate) -> Metrics {
        self.state.project.update_land(update)
    }

    // ── Massing ───────────────────────────────────────────────

    /// Generate podium + tower from the settings template
    pub fn generate_massing(&mut self) -> Result<Vec<BlockId>, StoreError> {
        let template = self.state.settings.template.clone();
        self.generate_massing_with(&template)
    }

    pub fn generate_massing_with(
        &mut self,
        template: &MassingTemplate,
    ) -> Result<Vec<BlockId>, StoreError> {
        apply_template(&mut self.state.project, &self.state.geometry, template)
    }

    pub fn set_block_setback(&mut self, id: &str, setback_m: f64) -> Result<Metrics, StoreError> {
        map_adapter::apply_block_setback(&mut self.state.project, &self.state.geometry, id, setback_m)
    }

    pub fn volumes(&self) -> Vec<VolumeSpec> {
        map_adapter::volumes(&self.state.project)
    }

    // ── Results ───────────────────────────────────────────────

    pub fn metrics(&self) -> &Metrics {
        self.state.project.metrics()
    }

    /// Markdown feasibility report at the configured precision
    pub fn report(&self) -> String {
        feasibility_report(
            &self.state.project.snapshot(),
            self.state.settings.display.precision,
        )
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
