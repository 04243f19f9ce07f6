use serde::{Deserialize, Deserializer, Serialize};

pub mod metrics;

pub use metrics::{calculate_metrics, floors_for_height, FLOOR_HEIGHT_M};

/// Unique block identifier
pub type BlockId = String;

/// Geographic coordinate `[lng, lat]`
pub type Coordinate = [f64; 2];

/// Closed or open ring of coordinates (first ring is the outer boundary)
pub type Ring = Vec<Coordinate>;

/// Polygon as an ordered list of rings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    /// Polygon with a single outer ring
    pub fn new(outer: Ring) -> Self {
        Self { rings: vec![outer] }
    }

    /// Outer ring, if any
    pub fn outer(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(|r| r.is_empty())
    }
}

// ============================================================================
// Blocks
// ============================================================================

/// Block kind: podium is the base volume, towers sit on top of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Podium,
    Tower,
}

impl BlockType {
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Podium => "Podium",
            BlockType::Tower => "Tower",
        }
    }
}

/// Program assigned to a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Usage {
    #[default]
    Residential,
    Corporate,
    Retail,
    Hotel,
    Parking,
    Amenities,
}

/// Fixed usage → color table
pub const USAGE_COLORS: [(Usage, &str); 6] = [
    (Usage::Residential, "#3b82f6"),
    (Usage::Corporate, "#6366f1"),
    (Usage::Retail, "#f59e0b"),
    (Usage::Hotel, "#ec4899"),
    (Usage::Parking, "#6b7280"),
    (Usage::Amenities, "#10b981"),
];

impl Usage {
    /// Display color for this usage
    pub fn color(&self) -> &'static str {
        match self {
            Usage::Residential => USAGE_COLORS[0].1,
            Usage::Corporate => USAGE_COLORS[1].1,
            Usage::Retail => USAGE_COLORS[2].1,
            Usage::Hotel => USAGE_COLORS[3].1,
            Usage::Parking => USAGE_COLORS[4].1,
            Usage::Amenities => USAGE_COLORS[5].1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Usage::Residential => "Residential",
            Usage::Corporate => "Corporate",
            Usage::Retail => "Retail",
            Usage::Hotel => "Hotel",
            Usage::Parking => "Parking",
            Usage::Amenities => "Amenities",
        }
    }

    /// All usages in table order
    pub fn all() -> &'static [Usage] {
        &[
            Usage::Residential,
            Usage::Corporate,
            Usage::Retail,
            Usage::Hotel,
            Usage::Parking,
            Usage::Amenities,
        ]
    }
}

fn default_block_height() -> f64 {
    FLOOR_HEIGHT_M
}

/// `null` height (a serialized NaN) reads as one storey
fn height_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(FLOOR_HEIGHT_M))
}

/// `null` area reads as zero
fn area_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// A single massing volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Empty in files that omit it; the store assigns a fresh id on load
    #[serde(default)]
    pub id: BlockId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: BlockType,
    #[serde(default)]
    pub usage: Usage,
    /// Meters
    #[serde(default = "default_block_height", deserialize_with = "height_or_default")]
    pub height: f64,
    /// Footprint of this block in m² (not cumulative across floors)
    #[serde(default, deserialize_with = "area_or_zero")]
    pub base_area: f64,
    #[serde(default)]
    pub coordinates: Polygon,
    /// Meters inset from the parent boundary
    #[serde(default)]
    pub setback: f64,
    /// Always `usage.color()`
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl Block {
    /// Build a block from creation data; the color is derived from usage
    pub fn from_new(id: BlockId, new: NewBlock) -> Self {
        Self {
            id,
            name: new.name,
            kind: new.kind,
            usage: new.usage,
            height: new.height,
            base_area: new.base_area,
            coordinates: new.coordinates,
            setback: new.setback,
            color: new.usage.color().to_string(),
            is_custom: new.is_custom,
        }
    }

    /// Merge a partial update, rederiving the color
    pub fn apply(&mut self, update: BlockUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(usage) = update.usage {
            self.usage = usage;
        }
        if let Some(height) = update.height {
            self.height = height;
        }
        if let Some(base_area) = update.base_area {
            self.base_area = base_area;
        }
        if let Some(coordinates) = update.coordinates {
            self.coordinates = coordinates;
        }
        if let Some(setback) = update.setback {
            self.setback = setback;
        }
        if let Some(is_custom) = update.is_custom {
            self.is_custom = is_custom;
        }
        self.color = self.usage.color().to_string();
    }

    /// Creation data carrying the same fields (used when duplicating)
    pub fn to_new(&self) -> NewBlock {
        NewBlock {
            name: self.name.clone(),
            kind: self.kind,
            usage: self.usage,
            height: self.height,
            base_area: self.base_area,
            coordinates: self.coordinates.clone(),
            setback: self.setback,
            color: Some(self.color.clone()),
            is_custom: self.is_custom,
        }
    }
}

/// Block creation data (everything but the id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlock {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: BlockType,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default = "default_block_height", deserialize_with = "height_or_default")]
    pub height: f64,
    #[serde(default, deserialize_with = "area_or_zero")]
    pub base_area: f64,
    #[serde(default)]
    pub coordinates: Polygon,
    #[serde(default)]
    pub setback: f64,
    /// Accepted for interchange compatibility, always replaced by the usage color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
}

impl Default for NewBlock {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: BlockType::Podium,
            usage: Usage::Residential,
            height: FLOOR_HEIGHT_M,
            base_area: 0.0,
            coordinates: Polygon::default(),
            setback: 0.0,
            color: None,
            is_custom: false,
        }
    }
}

/// Partial block update; `None` fields are left untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<BlockType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Polygon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setback: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
}

// ============================================================================
// Land
// ============================================================================

/// Demo parcel shown on first run (~40 m x 25 m)
pub fn default_parcel() -> Polygon {
    Polygon::new(vec![
        [-3.704_040, 40.416_800],
        [-3.703_568, 40.416_800],
        [-3.703_568, 40.417_026],
        [-3.704_040, 40.417_026],
        [-3.704_040, 40.416_800],
    ])
}

/// Parcel and its zoning/financial assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Land {
    /// m²
    pub area: f64,
    /// Total acquisition cost
    pub cost: f64,
    /// Revenue per m² of sellable area
    pub sell_price: f64,
    /// Construction cost per m² of gross floor area
    pub build_cost: f64,
    pub max_far: f64,
    /// Percent
    pub max_occupancy: f64,
    /// Net sellable / gross floor area, in (0, 1]
    pub efficiency: f64,
    #[serde(default)]
    pub geometry: Option<Polygon>,
}

impl Default for Land {
    fn default() -> Self {
        Self {
            area: 1000.0,
            cost: 1_000_000.0,
            sell_price: 10_000.0,
            build_cost: 3_000.0,
            max_far: 2.0,
            max_occupancy: 60.0,
            efficiency: 0.8,
            geometry: Some(default_parcel()),
        }
    }
}

impl Land {
    pub fn apply(&mut self, update: LandUpdate) {
        if let Some(area) = update.area {
            self.area = area;
        }
        if let Some(cost) = update.cost {
            self.cost = cost;
        }
        if let Some(sell_price) = update.sell_price {
            self.sell_price = sell_price;
        }
        if let Some(build_cost) = update.build_cost {
            self.build_cost = build_cost;
        }
        if let Some(max_far) = update.max_far {
            self.max_far = max_far;
        }
        if let Some(max_occupancy) = update.max_occupancy {
            self.max_occupancy = max_occupancy;
        }
        if let Some(efficiency) = update.efficiency {
            self.efficiency = efficiency;
        }
        if let Some(geometry) = update.geometry {
            self.geometry = Some(geometry);
        }
    }
}

/// Partial land update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LandUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_far: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_occupancy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Polygon>,
}

// ============================================================================
// Metrics and project interchange
// ============================================================================

/// Derived project metrics (never edited directly)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub gfa: f64,
    pub nsa: f64,
    pub revenue: f64,
    pub total_cost: f64,
    pub gross_profit: f64,
    /// Percent
    pub margin: f64,
    pub far: f64,
    /// Percent
    pub occupancy: f64,
    pub is_far_valid: bool,
    pub is_occupancy_valid: bool,
}

pub const DEFAULT_CURRENCY: &str = "USD";

/// Project file: `{blocks, land, currency?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub blocks: Vec<Block>,
    pub land: Land,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Read-only value handed to advisory consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub metrics: Metrics,
    pub land: Land,
    pub blocks: Vec<Block>,
    pub currency: String,
}

impl ProjectSnapshot {
    /// Evaluate a project file: colors rederived, metrics recomputed
    pub fn evaluate(file: ProjectFile) -> Self {
        let mut blocks = file.blocks;
        for block in &mut blocks {
            block.color = block.usage.color().to_string();
        }
        let metrics = calculate_metrics(&blocks, &file.land);
        Self {
            metrics,
            land: file.land,
            blocks,
            currency: file.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        }
    }
}

/// Advisor request from the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorRequest {
    pub message: String,
    pub snapshot: ProjectSnapshot,
}

/// Advisor reply text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorResponse {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_color_matches_table() {
        for (usage, color) in USAGE_COLORS {
            assert_eq!(usage.color(), color);
        }
        assert_eq!(Usage::all().len(), USAGE_COLORS.len());
    }

    #[test]
    fn test_usage_serde_lowercase() {
        let json = serde_json::to_string(&Usage::Amenities).unwrap();
        assert_eq!(json, r#""amenities""#);
        let u: Usage = serde_json::from_str(r#""hotel""#).unwrap();
        assert_eq!(u, Usage::Hotel);
    }

    #[test]
    fn test_block_wire_names_are_camel_case() {
        let block = Block::from_new(
            "b1".to_string(),
            NewBlock {
                name: "Podium".to_string(),
                base_area: 500.0,
                height: 9.0,
                is_custom: true,
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "podium");
        assert_eq!(json["baseArea"], 500.0);
        assert_eq!(json["isCustom"], true);
        assert_eq!(json["color"], Usage::Residential.color());
    }

    #[test]
    fn test_block_missing_fields_default() {
        let block: Block = serde_json::from_str(r#"{"name": "Bare", "type": "tower"}"#).unwrap();
        assert_eq!(block.id, "");
        assert_eq!(block.kind, BlockType::Tower);
        assert_eq!(block.height, FLOOR_HEIGHT_M);
        assert_eq!(block.base_area, 0.0);
        assert!(block.coordinates.is_empty());
    }

    #[test]
    fn test_block_null_numbers_default() {
        let block: Block =
            serde_json::from_str(r#"{"id": "a", "height": null, "baseArea": null}"#).unwrap();
        assert_eq!(block.height, FLOOR_HEIGHT_M);
        assert_eq!(block.base_area, 0.0);

        let new: NewBlock = serde_json::from_str(r#"{"height": null, "baseArea": 40}"#).unwrap();
        assert_eq!(new.height, FLOOR_HEIGHT_M);
        assert_eq!(new.base_area, 40.0);
    }

    #[test]
    fn test_new_block_color_is_overwritten() {
        let block = Block::from_new(
            "x".to_string(),
            NewBlock {
                usage: Usage::Parking,
                color: Some("#ffffff".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(block.color, Usage::Parking.color());
    }

    #[test]
    fn test_block_apply_usage_rederives_color() {
        let mut block = Block::from_new("x".to_string(), NewBlock::default());
        block.color = "stale".to_string();
        block.apply(BlockUpdate {
            usage: Some(Usage::Hotel),
            ..Default::default()
        });
        assert_eq!(block.color, Usage::Hotel.color());
    }

    #[test]
    fn test_block_apply_keeps_untouched_fields() {
        let mut block = Block::from_new(
            "x".to_string(),
            NewBlock {
                name: "A".to_string(),
                height: 30.0,
                base_area: 300.0,
                ..Default::default()
            },
        );
        block.apply(BlockUpdate {
            height: Some(33.0),
            ..Default::default()
        });
        assert_eq!(block.name, "A");
        assert_eq!(block.height, 33.0);
        assert_eq!(block.base_area, 300.0);
    }

    #[test]
    fn test_land_update_merges() {
        let mut land = Land::default();
        land.apply(LandUpdate {
            max_far: Some(3.5),
            ..Default::default()
        });
        assert_eq!(land.max_far, 3.5);
        assert_eq!(land.area, Land::default().area);
        assert!(land.geometry.is_some());
    }

    #[test]
    fn test_land_missing_geometry_is_none() {
        let land: Land = serde_json::from_str(r#"{"area": 500, "sellPrice": 9000}"#).unwrap();
        assert_eq!(land.area, 500.0);
        assert_eq!(land.sell_price, 9000.0);
        assert_eq!(land.max_far, Land::default().max_far);
        assert!(land.geometry.is_none());
    }

    #[test]
    fn test_polygon_is_transparent_rings() {
        let poly: Polygon = serde_json::from_str("[[[0,0],[1,0],[1,1],[0,0]]]").unwrap();
        assert_eq!(poly.rings.len(), 1);
        assert_eq!(poly.outer().unwrap().len(), 4);
        assert_eq!(serde_json::to_string(&poly).unwrap(), "[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]]");
    }

    #[test]
    fn test_project_file_currency_optional() {
        let json = r#"{"blocks": [], "land": {"area": 100}}"#;
        let file: ProjectFile = serde_json::from_str(json).unwrap();
        assert!(file.currency.is_none());
        let snapshot = ProjectSnapshot::evaluate(file);
        assert_eq!(snapshot.currency, DEFAULT_CURRENCY);
    }

    #[test]
    fn test_snapshot_evaluate_rederives_colors() {
        let json = r##"{"blocks": [{"id": "a", "usage": "retail", "color": "#000000", "baseArea": 100, "height": 6}], "land": {"area": 1000}}"##;
        let file: ProjectFile = serde_json::from_str(json).unwrap();
        let snapshot = ProjectSnapshot::evaluate(file);
        assert_eq!(snapshot.blocks[0].color, Usage::Retail.color());
        assert_eq!(snapshot.metrics.gfa, 200.0);
    }
}
