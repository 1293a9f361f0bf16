use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::support::units::Dimension;

use super::quantity::Value;

/// Dense index of a quantity inside a built engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct QuantityId(pub(crate) usize);

/// Names and dimensions of every quantity known to an engine.
#[derive(Debug, Clone, Default)]
pub(crate) struct Catalog {
    names: Vec<String>,
    dimensions: Vec<Dimension>,
    index: HashMap<String, QuantityId>,
}

impl Catalog {
    pub(crate) fn insert(&mut self, name: &str, dimension: Dimension) -> QuantityId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = QuantityId(self.names.len());
        self.names.push(name.to_owned());
        self.dimensions.push(dimension);
        self.index.insert(name.to_owned(), id);
        id
    }

    pub(crate) fn id(&self, name: &str) -> Option<QuantityId> {
        self.index.get(name).copied()
    }

    pub(crate) fn name(&self, id: QuantityId) -> &str {
        &self.names[id.0]
    }

    pub(crate) fn dimension(&self, id: QuantityId) -> Dimension {
        self.dimensions[id.0]
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Errors raised by reads and writes of the per-run quantity store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown quantity `{name}`")]
    UnknownQuantity { name: String },
    #[error("quantity `{name}` has not been written yet")]
    Unset { name: String },
    #[error("quantity `{name}` expects dimension `{expected}`, got `{found}`")]
    UnitMismatch {
        name: String,
        expected: Dimension,
        found: Dimension,
    },
    #[error("quantity `{name}` changed shape between writes")]
    ShapeMismatch { name: String },
}

/// The single source of truth for quantity values during one run.
///
/// Every quantity has exactly one slot. Writes are checked against the
/// dimension the quantity was declared with, and a vector quantity keeps
/// its length once written. The engine addresses quantities by name when
/// binding parameters and warm starts, and by [`QuantityId`] on the hot
/// path.
#[derive(Debug, Clone)]
pub(crate) struct QuantityStore<'a> {
    catalog: &'a Catalog,
    values: Vec<Option<Value>>,
}

/// Saved values of a set of quantities, sorted by id.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Snapshot {
    entries: Vec<(QuantityId, Option<Value>)>,
}

impl Snapshot {
    pub(crate) fn get(&self, id: QuantityId) -> Option<&Value> {
        self.entries
            .binary_search_by_key(&id, |(entry, _)| *entry)
            .ok()
            .and_then(|i| self.entries[i].1.as_ref())
    }
}

impl<'a> QuantityStore<'a> {
    pub(crate) fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            values: vec![None; catalog.len()],
        }
    }

    fn lookup(&self, name: &str) -> Result<QuantityId, StoreError> {
        self.catalog
            .id(name)
            .ok_or_else(|| StoreError::UnknownQuantity {
                name: name.to_owned(),
            })
    }

    /// Returns the current value of a quantity.
    ///
    /// # Errors
    ///
    /// Fails if the name is not declared by any block or parameter, or if
    /// nothing has written the quantity yet.
    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Result<&Value, StoreError> {
        self.value(self.lookup(name)?)
    }

    /// Writes a quantity.
    ///
    /// # Errors
    ///
    /// Fails on an unknown name, a dimension other than the declared one,
    /// or a vector whose length differs from the previous write.
    pub(crate) fn set(&mut self, name: &str, value: Value) -> Result<(), StoreError> {
        let id = self.lookup(name)?;
        self.write(id, value)
    }

    /// Captures the quantities in `ids`.
    pub(crate) fn snapshot(&self, ids: &[QuantityId]) -> Snapshot {
        let mut entries: Vec<_> = ids
            .iter()
            .map(|&id| (id, self.values[id.0].clone()))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries.dedup_by_key(|(id, _)| *id);
        Snapshot { entries }
    }

    /// Puts back every quantity captured in `snapshot`.
    pub(crate) fn restore(&mut self, snapshot: &Snapshot) {
        for (id, value) in &snapshot.entries {
            self.values[id.0].clone_from(value);
        }
    }

    pub(crate) fn name(&self, id: QuantityId) -> &'a str {
        self.catalog.name(id)
    }

    pub(crate) fn value(&self, id: QuantityId) -> Result<&Value, StoreError> {
        self.values[id.0].as_ref().ok_or_else(|| StoreError::Unset {
            name: self.catalog.name(id).to_owned(),
        })
    }

    pub(crate) fn write(&mut self, id: QuantityId, value: Value) -> Result<(), StoreError> {
        let expected = self.catalog.dimension(id);
        if value.dimension() != expected {
            return Err(StoreError::UnitMismatch {
                name: self.catalog.name(id).to_owned(),
                expected,
                found: value.dimension(),
            });
        }
        if let Some(previous) = &self.values[id.0] {
            if !previous.same_shape(&value) {
                return Err(StoreError::ShapeMismatch {
                    name: self.catalog.name(id).to_owned(),
                });
            }
        }
        self.values[id.0] = Some(value);
        Ok(())
    }

    /// Consumes the store, keeping only quantities that were written.
    pub(crate) fn into_map(self) -> BTreeMap<String, Value> {
        let catalog = self.catalog;
        self.values
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| Some((catalog.name(QuantityId(i)).to_owned(), value?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{
        f64::{ElectricPotential, Mass},
        mass::kilogram,
    };

    use crate::support::units::SiQuantity;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.insert("battery:mass", Mass::dimension());
        catalog.insert("battery:voltage", ElectricPotential::dimension());
        catalog.insert("propeller:thrust_curve", f64::dimension());
        catalog
    }

    #[test]
    fn get_after_set() {
        let catalog = catalog();
        let mut store = QuantityStore::new(&catalog);

        assert_eq!(
            store.get("battery:mass"),
            Err(StoreError::Unset {
                name: "battery:mass".into()
            })
        );

        store
            .set("battery:mass", Value::new(Mass::new::<kilogram>(2.0)))
            .expect("write should succeed");
        assert_eq!(store.get("battery:mass").unwrap().as_scalar(), Some(2.0));
    }

    #[test]
    fn rejects_unknown_names() {
        let catalog = catalog();
        let mut store = QuantityStore::new(&catalog);

        let err = store.set("battery:masss", Value::dimensionless(1.0));
        assert_eq!(
            err,
            Err(StoreError::UnknownQuantity {
                name: "battery:masss".into()
            })
        );
        assert!(matches!(
            store.get("nope"),
            Err(StoreError::UnknownQuantity { .. })
        ));
    }

    #[test]
    fn rejects_wrong_dimension() {
        let catalog = catalog();
        let mut store = QuantityStore::new(&catalog);

        let err = store
            .set("battery:voltage", Value::new(Mass::new::<kilogram>(1.0)))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnitMismatch { ref name, .. } if name == "battery:voltage"));
    }

    #[test]
    fn vectors_keep_their_length() {
        let catalog = catalog();
        let mut store = QuantityStore::new(&catalog);

        store
            .set("propeller:thrust_curve", Value::vector([1.0, 2.0, 3.0]))
            .expect("first write should succeed");
        store
            .set("propeller:thrust_curve", Value::vector([4.0, 5.0, 6.0]))
            .expect("same-length write should succeed");
        assert_eq!(
            store.set("propeller:thrust_curve", Value::vector([1.0])),
            Err(StoreError::ShapeMismatch {
                name: "propeller:thrust_curve".into()
            })
        );
    }

    #[test]
    fn snapshot_and_restore() {
        let catalog = catalog();
        let mut store = QuantityStore::new(&catalog);
        let mass = catalog.id("battery:mass").unwrap();
        let voltage = catalog.id("battery:voltage").unwrap();
        store
            .set("battery:mass", Value::new(Mass::new::<kilogram>(2.0)))
            .unwrap();

        let saved = store.snapshot(&[voltage, mass]);
        assert_eq!(saved.get(mass).and_then(Value::as_scalar), Some(2.0));
        assert_eq!(saved.get(voltage), None);

        store
            .set("battery:mass", Value::new(Mass::new::<kilogram>(3.0)))
            .unwrap();
        store
            .set("battery:voltage", Value::si::<ElectricPotential>(22.2))
            .unwrap();

        store.restore(&saved);
        assert_eq!(store.get("battery:mass").unwrap().as_scalar(), Some(2.0));
        assert!(matches!(
            store.get("battery:voltage"),
            Err(StoreError::Unset { .. })
        ));
    }

    #[test]
    fn snapshot_covers_only_requested_quantities() {
        let catalog = catalog();
        let mut store = QuantityStore::new(&catalog);
        let curve = catalog.id("propeller:thrust_curve").unwrap();
        let mass = catalog.id("battery:mass").unwrap();
        store
            .set("propeller:thrust_curve", Value::vector([1.0, 2.0]))
            .unwrap();
        store
            .set("battery:mass", Value::new(Mass::new::<kilogram>(2.0)))
            .unwrap();

        let saved = store.snapshot(&[curve]);
        store
            .set("battery:mass", Value::new(Mass::new::<kilogram>(5.0)))
            .unwrap();
        store.restore(&saved);

        assert_eq!(saved.get(mass), None);
        assert_eq!(store.get("battery:mass").unwrap().as_scalar(), Some(5.0));
    }

    #[test]
    fn into_map_skips_unset() {
        let catalog = catalog();
        let mut store = QuantityStore::new(&catalog);
        store
            .set("battery:voltage", Value::si::<ElectricPotential>(22.2))
            .unwrap();

        let map = store.into_map();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("battery:voltage"));
    }
}
