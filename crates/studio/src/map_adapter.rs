//! Bridge between map drawing events and the project store.
//!
//! The drawing layer reports finished polygons and setback edits here; the
//! renderer reads extrusion volumes back. Geometry coming from the map is
//! trusted as given.

use serde::{Deserialize, Serialize};
use shared::{
    BlockId, BlockType, BlockUpdate, LandUpdate, Metrics, NewBlock, Polygon, Usage,
};

use crate::geometry::GeometryService;
use crate::state::project::{ProjectStore, StoreError};

/// Attributes for a block drawn by hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSketch {
    pub name: String,
    pub kind: BlockType,
    pub usage: Usage,
    pub height: f64,
}

/// Extruded volume handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSpec {
    pub id: BlockId,
    pub polygon: Polygon,
    /// Extrusion base above ground, meters
    pub base: f64,
    /// Extrusion top above ground, meters
    pub top: f64,
    pub color: String,
}

/// A parcel polygon was finalized on the map
pub fn on_polygon_drawn(store: &mut ProjectStore, geometry: Polygon, area_m2: f64) -> Metrics {
    tracing::debug!(area_m2, "parcel drawn");
    store.update_land(LandUpdate {
        area: Some(area_m2),
        geometry: Some(geometry),
        ..Default::default()
    })
}

/// Setback preview for a polygon; degenerate results are passed through
pub fn on_setback_requested(
    geometry: &impl GeometryService,
    polygon: &Polygon,
    offset_m: f64,
) -> Option<Polygon> {
    geometry.inset(polygon, offset_m)
}

/// A block footprint was drawn by hand; its base area comes from the geometry service
pub fn on_block_drawn(
    store: &mut ProjectStore,
    geometry: &impl GeometryService,
    polygon: Polygon,
    sketch: BlockSketch,
) -> BlockId {
    let base_area = geometry.area_m2(&polygon);
    store.add_block(NewBlock {
        name: sketch.name,
        kind: sketch.kind,
        usage: sketch.usage,
        height: sketch.height,
        base_area,
        coordinates: polygon,
        setback: 0.0,
        color: None,
        is_custom: true,
    })
}

/// Boundary a block is inset from: towers sit inside the largest podium,
/// everything else inside the parcel
fn parent_boundary(store: &ProjectStore, id: &str, kind: BlockType) -> Option<Polygon> {
    if kind == BlockType::Tower {
        let podium = store
            .blocks()
            .iter()
            .filter(|b| b.kind == BlockType::Podium && b.id != id && !b.coordinates.is_empty())
            .max_by(|a, b| a.base_area.total_cmp(&b.base_area));
        if let Some(podium) = podium {
            return Some(podium.coordinates.clone());
        }
    }
    store.land().geometry.clone()
}

/// Regenerate a block's footprint from its parent boundary inset by `setback_m`
pub fn apply_block_setback(
    store: &mut ProjectStore,
    geometry: &impl GeometryService,
    id: &str,
    setback_m: f64,
) -> Result<Metrics, StoreError> {
    let kind = store
        .get_block(id)
        .map(|b| b.kind)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    let boundary = parent_boundary(store, id, kind).ok_or(StoreError::NoParcel)?;
    let footprint = geometry
        .inset(&boundary, setback_m)
        .ok_or(StoreError::NoParcel)?;
    let base_area = geometry.area_m2(&footprint);

    store.update_block(
        id,
        BlockUpdate {
            coordinates: Some(footprint),
            base_area: Some(base_area),
            setback: Some(setback_m),
            ..Default::default()
        },
    )
}

/// Volumes for every block in store order; towers start on top of the tallest podium
pub fn volumes(store: &ProjectStore) -> Vec<VolumeSpec> {
    let podium_top = store
        .blocks()
        .iter()
        .filter(|b| b.kind == BlockType::Podium && b.height.is_finite())
        .map(|b| b.height.max(0.0))
        .fold(0.0, f64::max);

    store
        .blocks()
        .iter()
        .map(|block| {
            let height = if block.height.is_finite() { block.height.max(0.0) } else { 0.0 };
            let base = match block.kind {
                BlockType::Podium => 0.0,
                BlockType::Tower => podium_top,
            };
            VolumeSpec {
                id: block.id.clone(),
                polygon: block.coordinates.clone(),
                base,
                top: base + height,
                color: block.color.clone(),
            }
        })
        .collect()
}
