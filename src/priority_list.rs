//! # Priority List
//!
//! An ordered, name-keyed registry. Items are yielded by descending priority;
//! items sharing a priority are yielded in insertion order (FIFO), or newest
//! first once [`PriorityList::set_lifo`] is enabled.
//!
//! The order index is a `BTreeMap` keyed by `(Reverse(priority), ordinal)` so
//! iteration never needs a sort, and reverse iteration is the exact mirror of
//! forward iteration. A `HashMap` from name to key gives constant-time lookup
//! of an entry's position.
//!
//! ```rust
//! use routestack::PriorityList;
//!
//! let mut list = PriorityList::new();
//! list.insert("low", 1, 0);
//! list.insert("high", 2, 10);
//! list.insert("low-too", 3, 0);
//!
//! let names: Vec<&str> = list.iter().map(|(name, _)| name).collect();
//! assert_eq!(names, ["high", "low", "low-too"]);
//! ```

use std::cmp::Reverse;
use std::collections::{btree_map, BTreeMap, HashMap};
use std::iter::FusedIterator;
use std::sync::Arc;

type OrderKey = (Reverse<i32>, i64);

#[derive(Debug, Clone, Copy)]
struct Slot {
    priority: i32,
    serial: u64,
}

/// Name-keyed list ordered by `(priority desc, serial asc)`.
#[derive(Debug, Clone)]
pub struct PriorityList<T> {
    order: BTreeMap<OrderKey, (Arc<str>, T)>,
    index: HashMap<Arc<str>, Slot>,
    serial: u64,
    lifo: bool,
}

impl<T> Default for PriorityList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityList<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
            index: HashMap::new(),
            serial: 0,
            lifo: false,
        }
    }

    fn key(&self, slot: Slot) -> OrderKey {
        let serial = i64::try_from(slot.serial).unwrap_or(i64::MAX);
        let ordinal = if self.lifo { -serial } else { serial };
        (Reverse(slot.priority), ordinal)
    }

    /// Insert `item` under `name`.
    ///
    /// If the name already exists its item is replaced and the entry takes the
    /// new priority and a fresh serial, i.e. it moves behind every existing
    /// entry of the same priority. Returns the replaced item.
    pub fn insert(&mut self, name: impl Into<Arc<str>>, item: T, priority: i32) -> Option<T> {
        let name = name.into();
        let replaced = self.remove(&name);
        let slot = Slot {
            priority,
            serial: self.serial,
        };
        self.serial += 1;
        let key = self.key(slot);
        self.index.insert(Arc::clone(&name), slot);
        self.order.insert(key, (name, item));
        replaced
    }

    /// Remove the entry for `name`. Absent names are a no-op.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        let slot = self.index.remove(name)?;
        let key = self.key(slot);
        self.order.remove(&key).map(|(_, item)| item)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        let slot = self.index.get(name)?;
        self.order.get(&self.key(*slot)).map(|(_, item)| item)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        let slot = *self.index.get(name)?;
        let key = self.key(slot);
        self.order.get_mut(&key).map(|(_, item)| item)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn priority(&self, name: &str) -> Option<i32> {
        self.index.get(name).map(|slot| slot.priority)
    }

    /// Change the priority of an existing entry, keeping its serial.
    ///
    /// Returns `false` if `name` is not present.
    pub fn set_priority(&mut self, name: &str, priority: i32) -> bool {
        let Some(slot) = self.index.get(name).copied() else {
            return false;
        };
        let old_key = self.key(slot);
        let Some(entry) = self.order.remove(&old_key) else {
            return false;
        };
        let slot = Slot { priority, ..slot };
        let new_key = self.key(slot);
        self.index.insert(Arc::clone(&entry.0), slot);
        self.order.insert(new_key, entry);
        true
    }

    /// Switch tie-breaking among equal priorities between FIFO (default) and
    /// LIFO, re-sorting existing entries.
    pub fn set_lifo(&mut self, lifo: bool) {
        if self.lifo == lifo {
            return;
        }
        self.lifo = lifo;
        let entries = std::mem::take(&mut self.order);
        for (_, (name, item)) in entries {
            if let Some(slot) = self.index.get(&name).copied() {
                let key = self.key(slot);
                self.order.insert(key, (name, item));
            }
        }
    }

    #[must_use]
    pub fn is_lifo(&self) -> bool {
        self.lifo
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }

    /// Iterate `(name, item)` pairs in priority order.
    ///
    /// The iterator is double-ended: `.rev()` yields the exact reverse of the
    /// forward sequence, so FIFO ties come out LIFO.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.order.values(),
        }
    }

    /// Shorthand for `iter().rev()`.
    pub fn iter_rev(&self) -> std::iter::Rev<Iter<'_, T>> {
        self.iter().rev()
    }

    pub fn names(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.iter().map(|(name, _)| name)
    }
}

/// Iterator over a [`PriorityList`] in priority order.
pub struct Iter<'a, T> {
    inner: btree_map::Values<'a, OrderKey, (Arc<str>, T)>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a str, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, item)| (name.as_ref(), item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(name, item)| (name.as_ref(), item))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a PriorityList<T> {
    type Item = (&'a str, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
