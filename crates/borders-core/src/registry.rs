//! Stock [`ItemRegistry`] implementations.

use std::collections::BTreeSet;

use borders_types::ItemId;
use tracing::warn;

use crate::host::ItemRegistry;

/// Registry that accepts every well-formed identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenRegistry;

impl ItemRegistry for OpenRegistry {
    fn resolve(&self, raw: &str) -> Option<ItemId> {
        ItemId::parse(raw).ok()
    }
}

/// Registry backed by a fixed list of identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownItems {
    items: BTreeSet<ItemId>,
}

impl KnownItems {
    /// Build a registry from raw identifiers. Malformed entries are logged
    /// and left out.
    pub fn from_raw<'a, I>(raw: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut items = BTreeSet::new();
        for entry in raw {
            match ItemId::parse(entry) {
                Ok(id) => {
                    items.insert(id);
                }
                Err(e) => warn!(entry, error = %e, "Skipping malformed item identifier"),
            }
        }
        Self { items }
    }

    /// Number of known items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry knows no items at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `item` is registered.
    pub fn contains(&self, item: &ItemId) -> bool {
        self.items.contains(item)
    }
}

impl ItemRegistry for KnownItems {
    fn resolve(&self, raw: &str) -> Option<ItemId> {
        let id = ItemId::parse(raw).ok()?;
        self.contains(&id).then_some(id)
    }
}
