//! Feasibility report rendering.
//!
//! Produces a Markdown summary of a project snapshot: land assumptions, the
//! block schedule, financial results and zoning compliance. Document layout
//! (PDF and the like) is left to whoever consumes the text.

use std::fmt::Write;

use shared::{floors_for_height, ProjectSnapshot};


/// Format a number with thousands separators and `precision` decimals
pub fn format_amount(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

fn compliance(valid: bool) -> &'static str {
    if valid {
        "OK"
    } else {
        "EXCEEDED"
    }
}

/// Render the Markdown feasibility report
pub fn feasibility_report(snapshot: &ProjectSnapshot, precision: usize) -> String {
    let ProjectSnapshot {
        metrics,
        land,
        blocks,
        currency,
    } = snapshot;
    let amount = |v: f64| format_amount(v, precision);
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "# Feasibility report\n");

    let _ = writeln!(out, "## Land\n");
    let _ = writeln!(out, "| Assumption | Value |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Area | {} m² |", amount(land.area));
    let _ = writeln!(out, "| Land cost | {} {currency} |", amount(land.cost));
    let _ = writeln!(out, "| Sell price | {} {currency}/m² |", amount(land.sell_price));
    let _ = writeln!(out, "| Build cost | {} {currency}/m² |", amount(land.build_cost));
    let _ = writeln!(out, "| Max FAR | {} |", amount(land.max_far));
    let _ = writeln!(out, "| Max occupancy | {} % |", amount(land.max_occupancy));
    let _ = writeln!(out, "| Efficiency | {} % |", amount(land.efficiency * 100.0));

    let _ = writeln!(out, "\n## Blocks\n");
    if blocks.is_empty() {
        let _ = writeln!(out, "_No blocks yet._");
    } else {
        let _ = writeln!(out, "| Block | Type | Usage | Floors | Base area (m²) | GFA (m²) |");
        let _ = writeln!(out, "|---|---|---|---|---|---|");
        for block in blocks {
            let floors = floors_for_height(block.height);
            let base_area = if block.base_area.is_finite() { block.base_area } else { 0.0 };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                block.name,
                block.kind.label(),
                block.usage.label(),
                floors,
                amount(base_area),
                amount(base_area * f64::from(floors)),
            );
        }
    }

    let _ = writeln!(out, "\n## Results\n");
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| GFA | {} m² |", amount(metrics.gfa));
    let _ = writeln!(out, "| NSA | {} m² |", amount(metrics.nsa));
    let _ = writeln!(out, "| Revenue | {} {currency} |", amount(metrics.revenue));
    let _ = writeln!(out, "| Total cost | {} {currency} |", amount(metrics.total_cost));
    let _ = writeln!(out, "| Gross profit | {} {currency} |", amount(metrics.gross_profit));
    let _ = writeln!(out, "| Margin | {} % |", amount(metrics.margin));
    let _ = writeln!(
        out,
        "| FAR | {} / {} ({}) |",
        amount(metrics.far),
        amount(land.max_far),
        compliance(metrics.is_far_valid)
    );
    let _ = writeln!(
        out,
        "| Occupancy | {} % / {} % ({}) |",
        amount(metrics.occupancy),
        amount(land.max_occupancy),
        compliance(metrics.is_occupancy_valid)
    );

    let mut warnings = Vec::new();
    if !metrics.is_far_valid {
        warnings.push("Floor-area ratio exceeds the zoning cap.");
    }
    if !metrics.is_occupancy_valid {
        warnings.push("Site occupancy exceeds the zoning cap.");
    }
    if metrics.gross_profit < 0.0 {
        warnings.push("Project runs at a loss.");
    }
    if !warnings.is_empty() {
        let _ = writeln!(out, "\n## Warnings\n");
        for warning in warnings {
            let _ = writeln!(out, "- {warning}");
        }
    }

    out
}
