//! The baseline document.
//!
//! A `BaselineDocument` is the server's parse of one uploaded save. It is the
//! comparison point for every edit: a pending value that equals the baseline
//! is not a change. Fields are private so nothing can patch it after
//! construction; a new upload produces a new baseline, it never updates an
//! old one.

use serde::{Deserialize, Serialize};

use crate::bag::{BagData, ItemId};
use crate::dex::DexData;
use crate::ids::SaveRef;
use crate::trainer::{CoreData, CoreField, CoreValue};

/// Immutable snapshot of a parsed save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineDocument {
    ref_id: SaveRef,
    core: CoreData,
    bag: BagData,
    dex: DexData,
}

impl BaselineDocument {
    pub fn new(ref_id: SaveRef, core: CoreData, bag: BagData, dex: DexData) -> Self {
        Self {
            ref_id,
            core,
            bag,
            dex,
        }
    }

    /// Server handle to quote back in modify requests.
    pub fn ref_id(&self) -> SaveRef {
        self.ref_id
    }

    pub fn core(&self) -> &CoreData {
        &self.core
    }

    pub fn bag(&self) -> &BagData {
        &self.bag
    }

    pub fn dex(&self) -> &DexData {
        &self.dex
    }

    /// Baseline value of a core attribute.
    pub fn core_value(&self, field: CoreField) -> CoreValue {
        self.core.value(field)
    }

    /// Baseline quantity of a bag entry, `None` if the save has no such entry.
    pub fn quantity(&self, id: ItemId) -> Option<u32> {
        self.bag.quantity(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::BagEntry;
    use crate::trainer::{Gender, Language};

    fn doc() -> BaselineDocument {
        let mut bag = BagData::default();
        bag.entries.insert(ItemId(1), BagEntry { category: 0, quantity: 5 });
        BaselineDocument::new(
            SaveRef::new(),
            CoreData {
                name: "Ash".into(),
                gender: Gender::Male,
                tid: 12345,
                language: Language::English,
            },
            bag,
            DexData::default(),
        )
    }

    #[test]
    fn test_lookups() {
        let d = doc();
        assert_eq!(d.core_value(CoreField::Tid), CoreValue::Tid(12345));
        assert_eq!(d.quantity(ItemId(1)), Some(5));
        assert_eq!(d.quantity(ItemId(2)), None);
    }

    #[test]
    fn test_clone_is_equal_but_independent() {
        let a = doc();
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.ref_id(), b.ref_id());
    }
}
