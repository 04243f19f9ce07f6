//! Display helper functions for blocks

use shared::{floors_for_height, Block};

/// Get display name for a block
pub fn block_display_name(block: &Block) -> String {
    format!("{} ({})", block.name, short_id(&block.id))
}

/// One-line description, e.g. "Tower · Residential · 10 floors"
pub fn block_summary(block: &Block) -> String {
    let floors = floors_for_height(block.height);
    let unit = if floors == 1 { "floor" } else { "floors" };
    format!(
        "{} · {} · {} {}",
        block.kind.label(),
        block.usage.label(),
        floors,
        unit
    )
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use shared::{BlockType, NewBlock, Usage};

    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_block_summary() {
        let block = Block::from_new(
            "id".to_string(),
            NewBlock {
                kind: BlockType::Tower,
                usage: Usage::Residential,
                height: 30.0,
                ..Default::default()
            },
        );
        assert_eq!(block_summary(&block), "Tower · Residential · 10 floors");
    }

    #[test]
    fn test_block_display_name() {
        let block = Block::from_new(
            "0123456789".to_string(),
            NewBlock { name: "Podium".to_string(), height: 2.0, ..Default::default() },
        );
        assert_eq!(block_display_name(&block), "Podium (01234567)");
        assert_eq!(block_summary(&block), "Podium · Residential · 1 floor");
    }
}
