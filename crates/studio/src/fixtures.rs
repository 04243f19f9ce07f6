//! Factory functions for test data.

use shared::*;

// ── Geometry ────────────────────────────────────────────────────

/// Axis-aligned rectangle in degrees, counter-clockwise, closed.
pub fn rect_polygon(min: Coordinate, max: Coordinate) -> Polygon {
    Polygon::new(vec![
        [min[0], min[1]],
        [max[0], min[1]],
        [max[0], max[1]],
        [min[0], max[1]],
        [min[0], min[1]],
    ])
}

/// Roughly `side_m` × `side_m` square parcel anchored at `origin` (lng, lat).
pub fn square_parcel(origin: Coordinate, side_m: f64) -> Polygon {
    let dlat = side_m / 110_540.0;
    let dlng = side_m / (111_320.0 * origin[1].to_radians().cos());
    rect_polygon(origin, [origin[0] + dlng, origin[1] + dlat])
}

// ── Blocks ──────────────────────────────────────────────────────

pub fn podium(id: &str, base_area: f64, height: f64) -> Block {
    Block::from_new(
        id.to_string(),
        NewBlock {
            name: "Podium".to_string(),
            kind: BlockType::Podium,
            usage: Usage::Retail,
            height,
            base_area,
            ..Default::default()
        },
    )
}

pub fn tower(id: &str, base_area: f64, height: f64) -> Block {
    Block::from_new(
        id.to_string(),
        NewBlock {
            name: "Tower".to_string(),
            kind: BlockType::Tower,
            usage: Usage::Residential,
            height,
            base_area,
            ..Default::default()
        },
    )
}

// ── Land / projects ─────────────────────────────────────────────

/// Land with the given area and defaults for everything else.
pub fn land(area: f64) -> Land {
    Land {
        area,
        ..Default::default()
    }
}

/// Podium 500 m² × 12 m plus tower 200 m² × 30 m on the default land.
pub fn podium_tower_project() -> ProjectFile {
    ProjectFile {
        blocks: vec![podium("p1", 500.0, 12.0), tower("t1", 200.0, 30.0)],
        land: Land::default(),
        currency: Some(DEFAULT_CURRENCY.to_string()),
    }
}

/// The same project as a JSON value, as a saved file would contain.
pub fn podium_tower_json() -> serde_json::Value {
    serde_json::to_value(podium_tower_project()).unwrap_or_default()
}
