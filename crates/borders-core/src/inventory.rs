//! Inventory diffing between consecutive ticks.

use borders_types::ItemId;

use crate::state::InventoryCounts;

/// Items whose count went up since the previous scan, with the increase.
///
/// A player with no previous scan (just joined, or first tick after a reset
/// or restore) yields nothing, so whatever they already carry is never
/// treated as newly picked up.
pub fn detect_increased(
    previous: Option<&InventoryCounts>,
    current: &InventoryCounts,
) -> InventoryCounts {
    let Some(previous) = previous else {
        return InventoryCounts::new();
    };

    current
        .iter()
        .filter_map(|(item, &count)| {
            let before = previous.get(item).copied().unwrap_or(0);
            (count > before).then(|| (item.clone(), count.saturating_sub(before)))
        })
        .collect()
}

/// Fold `(item, count)` stacks, such as inventory slots, into totals.
pub fn total_counts<I>(stacks: I) -> InventoryCounts
where
    I: IntoIterator<Item = (ItemId, u32)>,
{
    let mut totals = InventoryCounts::new();
    for (item, count) in stacks {
        if count == 0 {
            continue;
        }
        let entry = totals.entry(item).or_insert(0);
        *entry = entry.saturating_add(count);
    }
    totals
}
