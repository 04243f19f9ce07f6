//! Template massing: podium + tower generated from the parcel outline

use serde::{Deserialize, Serialize};
use shared::{BlockId, BlockType, NewBlock, Usage};

use crate::geometry::GeometryService;
use crate::state::project::{ProjectStore, StoreError};

/// Parameters of a generated podium/tower pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassingTemplate {
    /// Podium inset from the parcel boundary, meters
    pub podium_setback: f64,
    pub podium_height: f64,
    pub podium_usage: Usage,
    /// Tower inset from the podium boundary, meters
    pub tower_setback: f64,
    pub tower_height: f64,
    pub tower_usage: Usage,
}

impl Default for MassingTemplate {
    fn default() -> Self {
        Self {
            podium_setback: 3.0,
            podium_height: 12.0,
            podium_usage: Usage::Retail,
            tower_setback: 8.0,
            tower_height: 45.0,
            tower_usage: Usage::Residential,
        }
    }
}

/// Add the template's podium and tower to the store; returns their ids
pub fn apply_template(
    store: &mut ProjectStore,
    geometry: &impl GeometryService,
    template: &MassingTemplate,
) -> Result<Vec<BlockId>, StoreError> {
    let parcel = store.land().geometry.clone().ok_or(StoreError::NoParcel)?;
    let podium = geometry
        .inset(&parcel, template.podium_setback)
        .ok_or(StoreError::NoParcel)?;
    let tower = geometry
        .inset(&podium, template.tower_setback)
        .ok_or(StoreError::NoParcel)?;

    let podium_area = geometry.area_m2(&podium);
    let tower_area = geometry.area_m2(&tower);

    let podium_id = store.add_block(NewBlock {
        name: "Podium".to_string(),
        kind: BlockType::Podium,
        usage: template.podium_usage,
        height: template.podium_height,
        base_area: podium_area,
        coordinates: podium,
        setback: template.podium_setback,
        color: None,
        is_custom: false,
    });
    let tower_id = store.add_block(NewBlock {
        name: "Tower".to_string(),
        kind: BlockType::Tower,
        usage: template.tower_usage,
        height: template.tower_height,
        base_area: tower_area,
        coordinates: tower,
        setback: template.tower_setback,
        color: None,
        is_custom: false,
    });

    tracing::info!(podium_area, tower_area, "massing template applied");
    Ok(vec![podium_id, tower_id])
}
