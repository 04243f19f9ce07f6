//! Land and project metadata operations

use shared::{LandUpdate, Metrics};

use super::ProjectStore;

impl ProjectStore {
    /// Merge zoning/financial assumptions or a newly drawn parcel into the land record
    pub fn update_land(&mut self, update: LandUpdate) -> Metrics {
        self.land.apply(update);
        self.commit()
    }

    /// Currency code; display metadata only, metrics are unaffected
    pub fn set_currency(&mut self, code: impl Into<String>) {
        self.currency = code.into();
    }
}

#[cfg(test)]
mod tests {
    use shared::{default_parcel, BlockType, LandUpdate, NewBlock, Polygon};

    use super::*;

    #[test]
    fn test_update_land_recomputes_ratios() {
        let mut store = ProjectStore::new();
        store.add_block(NewBlock {
            kind: BlockType::Podium,
            base_area: 500.0,
            height: 9.0,
            ..Default::default()
        });
        assert_eq!(store.metrics().far, 1.5);

        let metrics = store.update_land(LandUpdate { area: Some(3000.0), ..Default::default() });

        assert_eq!(metrics.far, 0.5);
        assert_eq!(store.metrics(), &metrics);
    }

    #[test]
    fn test_zero_land_area_zeroes_ratios() {
        let mut store = ProjectStore::new();
        store.add_block(NewBlock { base_area: 500.0, height: 9.0, ..Default::default() });
        let metrics = store.update_land(LandUpdate { area: Some(0.0), ..Default::default() });
        assert_eq!(metrics.far, 0.0);
        assert_eq!(metrics.occupancy, 0.0);
    }

    #[test]
    fn test_update_land_commits_drawn_parcel() {
        let mut store = ProjectStore::new();
        let parcel = Polygon::new(vec![[1.0, 1.0], [1.001, 1.0], [1.001, 1.001], [1.0, 1.0]]);
        store.update_land(LandUpdate {
            area: Some(6100.0),
            geometry: Some(parcel.clone()),
            ..Default::default()
        });
        assert_eq!(store.land().area, 6100.0);
        assert_eq!(store.land().geometry.as_ref(), Some(&parcel));
        assert_ne!(store.land().geometry, Some(default_parcel()));
    }

    #[test]
    fn test_set_currency_does_not_touch_metrics() {
        let mut store = ProjectStore::new();
        let before = store.metrics().clone();
        store.set_currency("JPY");
        assert_eq!(store.currency(), "JPY");
        assert_eq!(store.metrics(), &before);
    }
}
