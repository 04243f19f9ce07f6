//! Project metrics: blocks + land assumptions → zoning and financial results.
//!
//! The computation is total: it never panics and every output is finite.
//! Areas and money totals are clamped at zero; `gross_profit` and `margin`
//! keep their sign so a loss stays visible.

use crate::{Block, BlockType, Land, Metrics};

/// Fixed storey height used to turn a block height into a floor count
pub const FLOOR_HEIGHT_M: f64 = 3.0;

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// `max(1, floor(height / 3))`; a non-finite height counts as one storey
pub fn floors_for_height(height: f64) -> u32 {
    let floors = (finite_or(height, FLOOR_HEIGHT_M) / FLOOR_HEIGHT_M).floor();
    if floors < 1.0 {
        1
    } else if floors >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        floors as u32
    }
}

/// Ground coverage and gross floor area of a block list.
///
/// The largest podium defines the footprint. Until a podium contributes, the
/// first non-podium block with area stands in for it, so tower-only layouts
/// still report some occupancy.
fn floor_areas(blocks: &[Block]) -> (f64, f64) {
    let mut gfa = 0.0;
    let mut footprint: f64 = 0.0;

    for block in blocks {
        let base_area = finite_or(block.base_area, 0.0);
        gfa += base_area * f64::from(floors_for_height(block.height));

        match block.kind {
            BlockType::Podium => footprint = footprint.max(base_area),
            _ if footprint == 0.0 => footprint += base_area,
            _ => {}
        }
    }

    (gfa, footprint)
}

/// Overflowing ratios pin to the largest finite value so compliance checks
/// still fail on a vanishing denominator
fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-f64::MAX, f64::MAX)
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Recompute all metrics from scratch
pub fn calculate_metrics(blocks: &[Block], land: &Land) -> Metrics {
    let (gfa, footprint) = floor_areas(blocks);
    let gfa = finite_or(gfa, 0.0).max(0.0);

    let efficiency = finite_or(land.efficiency, 0.0);
    let sell_price = finite_or(land.sell_price, 0.0);
    let build_cost = finite_or(land.build_cost, 0.0);
    let land_cost = finite_or(land.cost, 0.0);
    let land_area = finite_or(land.area, 0.0);

    let nsa = finite_or(gfa * efficiency, 0.0).max(0.0);
    let revenue = finite_or(nsa * sell_price, 0.0).max(0.0);
    let total_cost = finite_or(gfa * build_cost + land_cost, 0.0).max(0.0);
    let gross_profit = finite_or(revenue - total_cost, 0.0);
    let margin = saturate(ratio(gross_profit, revenue) * 100.0);

    let far = saturate(ratio(gfa, land_area)).max(0.0);
    let occupancy = saturate(ratio(footprint, land_area) * 100.0).max(0.0);

    Metrics {
        gfa,
        nsa,
        revenue,
        total_cost,
        gross_profit,
        margin,
        far,
        occupancy,
        is_far_valid: far <= land.max_far,
        is_occupancy_valid: occupancy <= land.max_occupancy,
    }
}
