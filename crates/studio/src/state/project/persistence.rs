//! Project import/export and autosave

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use shared::{Metrics, ProjectFile};

use super::block_ops::new_block_id;
use super::{ProjectStore, StoreError};

const REQUIRED_FIELDS: [&str; 2] = ["blocks", "land"];

impl ProjectStore {
    /// Replace the project from loosely-shaped JSON data.
    ///
    /// `blocks` and `land` must both be present; otherwise nothing changes.
    pub fn load_project(&mut self, data: serde_json::Value) -> Result<Metrics, StoreError> {
        if let Some(missing) = REQUIRED_FIELDS.into_iter().find(|f| data.get(f).is_none()) {
            tracing::warn!(field = missing, "project load rejected");
            return Err(StoreError::MissingField(missing));
        }
        let file: ProjectFile = serde_json::from_value(data).map_err(|e| {
            tracing::warn!("project load rejected: {e}");
            StoreError::InvalidProject(e)
        })?;
        Ok(self.replace_project(file))
    }

    /// Replace the project from a JSON document
    pub fn load_project_json(&mut self, json: &str) -> Result<Metrics, StoreError> {
        let data: serde_json::Value = serde_json::from_str(json)?;
        self.load_project(data)
    }

    /// Replace blocks, land and (if given) currency wholesale
    pub fn replace_project(&mut self, file: ProjectFile) -> Metrics {
        let mut seen = HashSet::new();
        let mut blocks = file.blocks;
        for block in &mut blocks {
            if block.id.is_empty() || !seen.insert(block.id.clone()) {
                block.id = new_block_id();
                seen.insert(block.id.clone());
            }
            block.color = block.usage.color().to_string();
        }

        self.blocks = blocks;
        self.land = file.land;
        if let Some(currency) = file.currency {
            self.currency = currency;
        }
        tracing::info!(blocks = self.blocks.len(), currency = %self.currency, "project loaded");
        self.commit()
    }

    /// Current project as an interchange document
    pub fn export_project(&self) -> ProjectFile {
        ProjectFile {
            blocks: self.blocks.clone(),
            land: self.land.clone(),
            currency: Some(self.currency.clone()),
        }
    }

    /// Current project as pretty-printed JSON
    pub fn export_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.export_project())?)
    }

    /// Write the project file to `path`
    pub fn save_to_path(&self, path: &Path) -> Result<(), StoreError> {
        std::fs::write(path, self.export_json()?)?;
        tracing::info!(path = %path.display(), "project saved");
        Ok(())
    }

    /// Load a project file from `path`
    pub fn load_from_path(&mut self, path: &Path) -> Result<Metrics, StoreError> {
        let json = std::fs::read_to_string(path)?;
        self.load_project_json(&json)
    }

    /// Get autosave file path
    fn autosave_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "massing", "massing")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Save project to the autosave file
    pub fn autosave(&self) {
        let Some(path) = Self::autosave_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = self.save_to_path(&path) {
            tracing::warn!("autosave failed: {e}");
        }
    }

    /// Load the autosaved project file, if any
    pub fn load_autosave() -> Option<ProjectFile> {
        let path = Self::autosave_path()?;
        let json = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&json).ok()
    }

    /// Check if autosave file exists
    pub fn has_autosave() -> bool {
        Self::autosave_path()
            .map(|p| p.exists())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::{BlockType, Land, NewBlock, Usage};

    use super::*;

    fn sample_project() -> serde_json::Value {
        json!({
            "blocks": [
                {"id": "p1", "name": "Podium", "type": "podium", "usage": "retail",
                 "height": 9, "baseArea": 500, "color": "#000000"},
                {"id": "t1", "name": "Tower", "type": "tower", "usage": "residential",
                 "height": 30, "baseArea": 300}
            ],
            "land": {"area": 1000, "cost": 1000000, "sellPrice": 10000, "buildCost": 3000,
                     "maxFar": 2.0, "maxOccupancy": 60, "efficiency": 0.8, "geometry": null},
            "currency": "EUR"
        })
    }

    #[test]
    fn test_load_project_replaces_state() {
        let mut store = ProjectStore::new();
        store.add_block(NewBlock::default());

        let metrics = store.load_project(sample_project()).unwrap();

        assert_eq!(store.blocks().len(), 2);
        assert_eq!(store.blocks()[0].id, "p1");
        assert_eq!(store.currency(), "EUR");
        assert!(store.land().geometry.is_none());
        assert_eq!(metrics.gfa, 4500.0);
        assert!(!metrics.is_far_valid);
        assert_eq!(store.blocks()[0].color, Usage::Retail.color());
    }

    #[test]
    fn test_load_null_block_numbers_use_defaults() {
        let mut store = ProjectStore::new();
        let metrics = store
            .load_project(json!({
                "blocks": [
                    {"id": "a", "baseArea": 500, "height": null},
                    {"id": "b", "baseArea": null, "height": 9}
                ],
                "land": {"area": 1000}
            }))
            .unwrap();

        assert_eq!(store.blocks().len(), 2);
        assert_eq!(store.blocks()[0].height, 3.0);
        assert_eq!(store.blocks()[1].base_area, 0.0);
        // 500 m² x 1 floor, plus nothing from the area-less block
        assert_eq!(metrics.gfa, 500.0);
    }

    #[test]
    fn test_load_empty_object_is_rejected_without_change() {
        let mut store = ProjectStore::new();
        store.add_block(NewBlock::default());
        let blocks = store.blocks().to_vec();
        let land = store.land().clone();
        let version = store.version();

        let result = store.load_project(json!({}));

        assert!(matches!(result, Err(StoreError::MissingField("blocks"))));
        assert_eq!(store.blocks(), blocks.as_slice());
        assert_eq!(store.land(), &land);
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_load_missing_land_is_rejected() {
        let mut store = ProjectStore::new();
        let result = store.load_project(json!({"blocks": []}));
        assert!(matches!(result, Err(StoreError::MissingField("land"))));
        assert_eq!(store.land(), &Land::default());
    }

    #[test]
    fn test_load_non_object_is_rejected() {
        let mut store = ProjectStore::new();
        assert!(matches!(store.load_project(json!([1, 2, 3])), Err(StoreError::MissingField(_))));
        assert!(matches!(store.load_project(json!(null)), Err(StoreError::MissingField(_))));
    }

    #[test]
    fn test_load_wrongly_typed_fields_is_rejected() {
        let mut store = ProjectStore::new();
        let result = store.load_project(json!({"blocks": "nope", "land": {}}));
        assert!(matches!(result, Err(StoreError::InvalidProject(_))));
        assert!(store.blocks().is_empty());
    }

    #[test]
    fn test_load_assigns_ids_to_missing_and_duplicate_ids() {
        let mut store = ProjectStore::new();
        store
            .load_project(json!({
                "blocks": [
                    {"name": "no id", "baseArea": 10},
                    {"id": "same", "baseArea": 10},
                    {"id": "same", "baseArea": 10}
                ],
                "land": {}
            }))
            .unwrap();

        let ids: HashSet<_> = store.blocks().iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert!(store.blocks().iter().all(|b| !b.id.is_empty()));
        assert_eq!(store.blocks()[1].id, "same");
    }

    #[test]
    fn test_load_without_currency_keeps_current() {
        let mut store = ProjectStore::with_currency("GBP");
        store.load_project(json!({"blocks": [], "land": {}})).unwrap();
        assert_eq!(store.currency(), "GBP");
    }

    #[test]
    fn test_export_then_load_preserves_project() {
        let mut store = ProjectStore::with_currency("CHF");
        store.add_block(NewBlock {
            name: "Tower".to_string(),
            kind: BlockType::Tower,
            usage: Usage::Hotel,
            height: 42.0,
            base_area: 250.0,
            ..Default::default()
        });
        let json = store.export_json().unwrap();

        let mut other = ProjectStore::new();
        other.load_project_json(&json).unwrap();

        assert_eq!(other.blocks(), store.blocks());
        assert_eq!(other.land(), store.land());
        assert_eq!(other.currency(), "CHF");
        assert_eq!(other.metrics(), store.metrics());
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");

        let mut store = ProjectStore::new();
        store.add_block(NewBlock { base_area: 120.0, height: 6.0, ..Default::default() });
        store.save_to_path(&path).unwrap();

        let mut loaded = ProjectStore::new();
        loaded.load_from_path(&path).unwrap();
        assert_eq!(loaded.metrics().gfa, 240.0);
    }

    #[test]
    fn test_load_from_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProjectStore::new();
        let result = store.load_from_path(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn test_invalid_json_text_is_rejected() {
        let mut store = ProjectStore::new();
        assert!(matches!(store.load_project_json("{not json"), Err(StoreError::InvalidProject(_))));
    }
}
