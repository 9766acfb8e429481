//! Registry of well-known library items that desugarings refer to.

use derive_more::Display;
use indexmap::IndexMap;

use crate::DefId;

/// Library items that lowering needs to name directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum KnownItem {
    /// `Range { start, end }` for `a..b`
    Range,
    /// `RangeFrom { start }` for `a..`
    RangeFrom,
    /// `RangeTo { end }` for `..b`
    RangeTo,
    /// `RangeFull` for `..`
    RangeFull,
    /// `RangeToInclusive { end }` for `..=b`
    RangeToInclusive,
    /// `RangeInclusive::new` for `a..=b`
    RangeInclusiveNew,
}

/// Known items registered by the host, in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnownItems {
    items: IndexMap<KnownItem, DefId>,
}

impl KnownItems {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def` for `item`, replacing and returning any previous registration.
    pub fn register(&mut self, item: KnownItem, def: DefId) -> Option<DefId> {
        self.items.insert(item, def)
    }

    /// Looks up a known item.
    #[must_use]
    pub fn get(&self, item: KnownItem) -> Option<DefId> {
        self.items.get(&item).copied()
    }

    /// Iterates registrations in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = (KnownItem, DefId)> + '_ {
        self.items.iter().map(|(item, def)| (*item, *def))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FunctionId, TypeDefId};

    #[test]
    fn test_register_and_get() {
        let mut items = KnownItems::new();
        assert_eq!(items.get(KnownItem::Range), None);
        items.register(KnownItem::Range, DefId::Adt(TypeDefId(4)));
        items.register(KnownItem::RangeInclusiveNew, DefId::Function(FunctionId(9)));
        assert_eq!(items.get(KnownItem::Range), Some(DefId::Adt(TypeDefId(4))));
        let order: Vec<_> = items.iter().map(|(item, _)| item).collect();
        assert_eq!(order, vec![KnownItem::Range, KnownItem::RangeInclusiveNew]);
    }
}
