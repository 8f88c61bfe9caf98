// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint order over shared shapes.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;

use crate::error::Error;
use crate::shape::ShapeKey;

/// Back-to-front paint order over shapes, with an integer z-index per shape.
///
/// Entries live in a slot arena linked in paint order; a hash map takes a
/// shape to its slot. Every operation is O(1) amortized.
///
/// Z-indices are unique and increase from back to front, but are not
/// contiguous: sending a shape to the back gives it one less than the
/// current minimum instead of renumbering everything else.
pub struct OrderedList<S: ?Sized> {
    entries: Vec<Option<Entry<S>>>,
    free_list: Vec<usize>,
    lookup: HashMap<ShapeKey, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

struct Entry<S: ?Sized> {
    shape: Rc<S>,
    z_index: i64,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<S: ?Sized> Default for OrderedList<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            lookup: HashMap::new(),
            head: None,
            tail: None,
        }
    }
}

impl<S: ?Sized> Debug for OrderedList<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrderedList")
            .field("len", &self.lookup.len())
            .field("slots", &self.entries.len())
            .field("front_z", &self.head.map(|i| self.entry(i).z_index))
            .field("back_z", &self.tail.map(|i| self.entry(i).z_index))
            .finish_non_exhaustive()
    }
}

impl<S: ?Sized> OrderedList<S> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked shapes.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Whether no shape is tracked.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Whether `shape` is tracked.
    pub fn contains(&self, shape: &Rc<S>) -> bool {
        self.lookup.contains_key(&ShapeKey::of(shape))
    }

    /// Track `shape` in front of everything else.
    ///
    /// The new z-index is one more than the current maximum, or 0 for an empty
    /// list. Inserting a tracked shape does nothing.
    pub fn insert(&mut self, shape: Rc<S>) {
        let key = ShapeKey::of(&shape);
        if self.lookup.contains_key(&key) {
            return;
        }
        let z_index = self.tail.map_or(0, |t| self.entry(t).z_index.saturating_add(1));
        let entry = Entry {
            shape,
            z_index,
            prev: None,
            next: None,
        };
        let idx = if let Some(idx) = self.free_list.pop() {
            self.entries[idx] = Some(entry);
            idx
        } else {
            self.entries.push(Some(entry));
            self.entries.len() - 1
        };
        self.lookup.insert(key, idx);
        self.link_after(idx, self.tail);
    }

    /// Stop tracking `shape`. Removing an untracked shape does nothing.
    pub fn remove(&mut self, shape: &Rc<S>) {
        let Some(idx) = self.lookup.remove(&ShapeKey::of(shape)) else {
            return;
        };
        self.unlink(idx);
        self.entries[idx] = None;
        self.free_list.push(idx);
    }

    /// Current z-index of `shape`.
    pub fn z_index(&self, shape: &Rc<S>) -> Result<i64, Error> {
        self.slot(shape).map(|idx| self.entry(idx).z_index)
    }

    /// Swap `shape` with the shape just in front of it, exchanging z-indices.
    ///
    /// Does nothing when `shape` is already frontmost.
    pub fn bring_forward(&mut self, shape: &Rc<S>) -> Result<(), Error> {
        let idx = self.slot(shape)?;
        let Some(next) = self.entry(idx).next else {
            return Ok(());
        };
        self.unlink(idx);
        self.link_after(idx, Some(next));
        self.swap_z(idx, next);
        Ok(())
    }

    /// Swap `shape` with the shape just behind it, exchanging z-indices.
    ///
    /// Does nothing when `shape` is already backmost.
    pub fn send_backward(&mut self, shape: &Rc<S>) -> Result<(), Error> {
        let idx = self.slot(shape)?;
        let Some(prev) = self.entry(idx).prev else {
            return Ok(());
        };
        let before_prev = self.entry(prev).prev;
        self.unlink(idx);
        self.link_after(idx, before_prev);
        self.swap_z(idx, prev);
        Ok(())
    }

    /// Move `shape` behind everything, one below the current minimum z-index.
    pub fn send_to_back(&mut self, shape: &Rc<S>) -> Result<(), Error> {
        let idx = self.slot(shape)?;
        let Some(head) = self.head.filter(|&h| h != idx) else {
            return Ok(());
        };
        let z_index = self.entry(head).z_index.saturating_sub(1);
        self.unlink(idx);
        self.link_after(idx, None);
        self.entry_mut(idx).z_index = z_index;
        Ok(())
    }

    /// Move `shape` in front of everything, one above the current maximum z-index.
    pub fn bring_to_front(&mut self, shape: &Rc<S>) -> Result<(), Error> {
        let idx = self.slot(shape)?;
        let Some(tail) = self.tail.filter(|&t| t != idx) else {
            return Ok(());
        };
        let z_index = self.entry(tail).z_index.saturating_add(1);
        self.unlink(idx);
        self.link_after(idx, Some(tail));
        self.entry_mut(idx).z_index = z_index;
        Ok(())
    }

    /// Sort `shapes` back to front by z-index.
    ///
    /// Fails with [`Error::NotFound`] if any shape is untracked, leaving
    /// `shapes` untouched.
    pub fn sort(&self, shapes: &mut [Rc<S>]) -> Result<(), Error> {
        let mut keyed = Vec::with_capacity(shapes.len());
        for shape in shapes.iter() {
            keyed.push((self.z_index(shape)?, Rc::clone(shape)));
        }
        keyed.sort_by_key(|(z, _)| *z);
        for (slot, (_, shape)) in shapes.iter_mut().zip(keyed) {
            *slot = shape;
        }
        Ok(())
    }

    /// Tracked shapes, back to front.
    pub fn iter(&self) -> Iter<'_, S> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Stop tracking every shape.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.free_list.clear();
        self.lookup.clear();
        self.head = None;
        self.tail = None;
    }

    fn slot(&self, shape: &Rc<S>) -> Result<usize, Error> {
        self.lookup
            .get(&ShapeKey::of(shape))
            .copied()
            .ok_or(Error::NotFound)
    }

    fn entry(&self, idx: usize) -> &Entry<S> {
        self.entries[idx]
            .as_ref()
            .expect("ordered list invariant violated: linked slot is empty")
    }

    fn entry_mut(&mut self, idx: usize) -> &mut Entry<S> {
        self.entries[idx]
            .as_mut()
            .expect("ordered list invariant violated: linked slot is empty")
    }

    fn swap_z(&mut self, a: usize, b: usize) {
        let za = self.entry(a).z_index;
        let zb = self.entry(b).z_index;
        self.entry_mut(a).z_index = zb;
        self.entry_mut(b).z_index = za;
    }

    /// Link a detached slot right after `after`, or at the head for `None`.
    fn link_after(&mut self, idx: usize, after: Option<usize>) {
        let next = match after {
            Some(a) => self.entry(a).next,
            None => self.head,
        };
        {
            let e = self.entry_mut(idx);
            e.prev = after;
            e.next = next;
        }
        match after {
            Some(a) => self.entry_mut(a).next = Some(idx),
            None => self.head = Some(idx),
        }
        match next {
            Some(n) => self.entry_mut(n).prev = Some(idx),
            None => self.tail = Some(idx),
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let e = self.entry(idx);
            (e.prev, e.next)
        };
        match prev {
            Some(p) => self.entry_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.entry_mut(n).prev = prev,
            None => self.tail = prev,
        }
        let e = self.entry_mut(idx);
        e.prev = None;
        e.next = None;
    }
}

/// Iterator over an [`OrderedList`], back to front.
pub struct Iter<'a, S: ?Sized> {
    list: &'a OrderedList<S>,
    cursor: Option<usize>,
}

impl<S: ?Sized> Debug for Iter<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<'a, S: ?Sized> Iterator for Iter<'a, S> {
    type Item = &'a Rc<S>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.list.entry(self.cursor?);
        self.cursor = entry.next;
        Some(&entry.shape)
    }
}
