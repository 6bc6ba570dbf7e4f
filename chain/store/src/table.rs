use std::collections::BTreeMap;

use taiyi_primitives::{ChainError, ChainResult};

/// A typed collection with a primary ordered index by an opaque, generated
/// `u64` id (`spec.md` §4.2/§9: "model each index as a sorted collection...
/// prefer a tagged-id arena so that secondary indexes store plain ids, not
/// raw references"). Callers declare whatever secondary indexes an entity
/// needs alongside this table in `Database` and keep them in sync inside
/// `modify`/`create`/`remove`.
#[derive(Debug, Default)]
pub struct IdTable<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> IdTable<T> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Assigns a fresh id, builds the row from it, and inserts it.
    pub fn create(&mut self, build: impl FnOnce(u64) -> T) -> (u64, &T) {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row);
        (id, self.rows.get(&id).expect("just inserted"))
    }

    pub fn find(&self, id: u64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn find_mut(&mut self, id: u64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub fn get(&self, id: u64) -> ChainResult<&T> {
        self.find(id)
            .ok_or_else(|| ChainError::not_found(format!("no row with id {id}")))
    }

    /// Applies `f` to the row, matching the "modify re-indexes atomically"
    /// contract — callers that maintain secondary indexes must recompute
    /// them around this call since `f` may change indexed fields.
    pub fn modify(&mut self, id: u64, f: impl FnOnce(&mut T)) -> ChainResult<()> {
        let row = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| ChainError::not_found(format!("no row with id {id}")))?;
        f(row);
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> Option<T> {
        self.rows.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u64, &T)> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A typed collection keyed directly by a caller-chosen, already-unique key
/// (account/contract/symbol names) rather than a generated id — no
/// `next_id` counter is needed because the key itself is the primary index.
#[derive(Debug, Default)]
pub struct NamedTable<K: Ord, T> {
    rows: BTreeMap<K, T>,
}

impl<K: Ord + Clone + std::fmt::Display, T> NamedTable<K, T> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    pub fn create(&mut self, key: K, row: T) -> ChainResult<&T> {
        if self.rows.contains_key(&key) {
            return Err(ChainError::validation(format!("{key} already exists")));
        }
        self.rows.insert(key.clone(), row);
        Ok(self.rows.get(&key).expect("just inserted"))
    }

    pub fn find(&self, key: &K) -> Option<&T> {
        self.rows.get(key)
    }

    pub fn find_mut(&mut self, key: &K) -> Option<&mut T> {
        self.rows.get_mut(key)
    }

    pub fn get(&self, key: &K) -> ChainResult<&T> {
        self.find(key)
            .ok_or_else(|| ChainError::not_found(format!("{key} not found")))
    }

    pub fn modify(&mut self, key: &K, f: impl FnOnce(&mut T)) -> ChainResult<()> {
        let row = self
            .rows
            .get_mut(key)
            .ok_or_else(|| ChainError::not_found(format!("{key} not found")))?;
        f(row);
        Ok(())
    }

    /// As `modify`, but `f` may itself fail (e.g. a mana charge that turns
    /// out to be insufficient); the row is still mutated up to the point
    /// `f` returned, matching `ManaBar::charge_or_fail`'s own no-op-on-
    /// failure contract.
    pub fn try_modify(&mut self, key: &K, f: impl FnOnce(&mut T) -> ChainResult<()>) -> ChainResult<()> {
        let row = self
            .rows
            .get_mut(key)
            .ok_or_else(|| ChainError::not_found(format!("{key} not found")))?;
        f(row)
    }

    pub fn remove(&mut self, key: &K) -> Option<T> {
        self.rows.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &T)> {
        self.rows.iter()
    }
}
