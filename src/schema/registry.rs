//! Lazily built, shared lookup over the type catalog.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::{catalog, SchemaType};

static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::build);

/// Returns the shared registry, building it on first use.
pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

/// Immutable name to schema lookup for every catalog type.
#[derive(Debug)]
pub struct SchemaRegistry {
    types: BTreeMap<&'static str, SchemaType>,
}

impl SchemaRegistry {
    fn build() -> Self {
        let mut types = BTreeMap::new();
        for ty in catalog::types() {
            types.insert(ty.name(), ty);
        }
        SchemaRegistry { types }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.keys().copied()
    }
}
