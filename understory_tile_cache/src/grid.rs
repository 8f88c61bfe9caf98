// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The LRU-bounded tile grid.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;
use understory_view2d::{IPoint, IRect, ISize};

use crate::cell::{CacheCell, TileSurface};
use crate::error::Error;

/// Tile size, in grid-space pixels, unless configured otherwise.
pub const TILE_SIZE: ISize = ISize::new(500, 500);

/// Map a pixel coordinate to a tile coordinate along one axis (floor division).
#[inline]
fn tile_coord(value: i32, tile: i32) -> i32 {
    debug_assert!(tile > 0, "tile extent must be strictly positive");
    value.div_euclid(tile)
}

/// A bounded set of raster tiles keyed by tile coordinate.
///
/// Tile `(i, j)` covers grid pixels `i * w .. (i + 1) * w` by
/// `j * h .. (j + 1) * h`. Tiles are created on first use and evicted least
/// recently used first once `capacity` tiles are resident. Any access through
/// [`CacheGrid::cell`], [`CacheGrid::query_cells`], [`CacheGrid::visit_cells`],
/// or [`CacheGrid::mark_dirty`] counts as a use, and creates the tile if it
/// is not resident.
pub struct CacheGrid<T> {
    tile_size: ISize,
    capacity: usize,
    lookup: HashMap<IPoint, usize>,
    slots: Vec<Option<CacheCell<T>>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<T> Debug for CacheGrid<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let dirty = self.iter().filter(|c| c.dirty).count();
        f.debug_struct("CacheGrid")
            .field("tile_size", &self.tile_size)
            .field("capacity", &self.capacity)
            .field("resident", &self.lookup.len())
            .field("dirty", &dirty)
            .finish_non_exhaustive()
    }
}

impl<T: TileSurface> CacheGrid<T> {
    /// Create a grid of [`TILE_SIZE`] tiles holding at most `capacity` of them.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        Self::with_tile_size(capacity, TILE_SIZE)
    }

    /// Create a grid with a custom tile size.
    pub fn with_tile_size(capacity: usize, tile_size: ISize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidConfiguration("capacity must be non-zero"));
        }
        if tile_size.is_empty() {
            return Err(Error::InvalidConfiguration("tile size must be positive"));
        }
        Ok(Self {
            tile_size,
            capacity,
            lookup: HashMap::new(),
            slots: Vec::new(),
            free_list: Vec::new(),
            head: None,
            tail: None,
        })
    }

    /// Return the tile at `coord`, creating it if needed, and mark it most
    /// recently used.
    ///
    /// A new tile is blank and dirty. Creating one while at capacity first
    /// evicts the least recently used tiles.
    pub fn cell(&mut self, coord: IPoint) -> &mut CacheCell<T> {
        let idx = match self.lookup.get(&coord) {
            Some(&idx) => {
                self.unlink(idx);
                idx
            }
            None => {
                while self.lookup.len() >= self.capacity && self.evict_lru() {}
                self.create(coord)
            }
        };
        self.link_back(idx);
        self.slot_mut(idx)
    }

    /// Touch every tile overlapping `region` (grid pixels) and return them.
    ///
    /// Tiles come back row by row. When the region covers more tiles than the
    /// capacity, tiles touched early may already be evicted and are left out.
    pub fn query_cells(&mut self, region: IRect) -> Vec<&CacheCell<T>> {
        let mut coords = Vec::new();
        self.visit_cells(region, |cell| coords.push(cell.coord));
        let this: &Self = self;
        coords.iter().filter_map(|c| this.get(*c)).collect()
    }

    /// Touch every tile overlapping `region` (grid pixels) and call `f` on each,
    /// row by row.
    pub fn visit_cells<F>(&mut self, region: IRect, mut f: F)
    where
        F: FnMut(&mut CacheCell<T>),
    {
        let Some((min, max)) = self.tile_range(region) else {
            return;
        };
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                f(self.cell(IPoint::new(x, y)));
            }
        }
    }

    /// Mark every tile overlapping `region` (grid pixels) dirty, creating
    /// the tiles that are not resident.
    pub fn mark_dirty(&mut self, region: IRect) {
        self.visit_cells(region, |cell| cell.dirty = true);
    }
}

impl<T> CacheGrid<T> {
    /// Size of one tile in grid pixels.
    pub fn tile_size(&self) -> ISize {
        self.tile_size
    }

    /// Maximum number of resident tiles.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of resident tiles.
    pub fn size(&self) -> usize {
        self.lookup.len()
    }

    /// Whether no tile is resident.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Whether the tile at `coord` is resident.
    pub fn contains(&self, coord: IPoint) -> bool {
        self.lookup.contains_key(&coord)
    }

    /// The resident tile at `coord`, without touching it.
    pub fn get(&self, coord: IPoint) -> Option<&CacheCell<T>> {
        self.lookup.get(&coord).map(|&idx| self.slot(idx))
    }

    /// Mutable access to the resident tile at `coord`, without touching it.
    pub fn get_mut(&mut self, coord: IPoint) -> Option<&mut CacheCell<T>> {
        let idx = *self.lookup.get(&coord)?;
        Some(self.slot_mut(idx))
    }

    /// Inclusive range of tile coordinates overlapping `region`, or `None` for
    /// an empty region.
    pub fn tile_range(&self, region: IRect) -> Option<(IPoint, IPoint)> {
        if region.is_empty() {
            return None;
        }
        let (w, h) = (self.tile_size.width, self.tile_size.height);
        // Max edges are exclusive: the last covered pixel is x1 - 1.
        Some((
            IPoint::new(tile_coord(region.x0, w), tile_coord(region.y0, h)),
            IPoint::new(tile_coord(region.x1 - 1, w), tile_coord(region.y1 - 1, h)),
        ))
    }

    /// Mark every resident tile dirty.
    pub fn mark_all_dirty(&mut self) {
        for cell in self.slots.iter_mut().flatten() {
            cell.dirty = true;
        }
    }

    /// Change the capacity.
    ///
    /// Shrinking does not evict anything now; the surplus goes on the next
    /// miss in [`CacheGrid::cell`].
    pub fn set_size(&mut self, capacity: usize) -> Result<(), Error> {
        if capacity == 0 {
            return Err(Error::InvalidConfiguration("capacity must be non-zero"));
        }
        if capacity != self.capacity {
            log::debug!("tile cache capacity {} -> {capacity}", self.capacity);
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Drop every tile.
    pub fn clear(&mut self) {
        self.lookup.clear();
        self.slots.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
    }

    /// Resident tiles from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &CacheCell<T>> + '_ {
        let mut cursor = self.head;
        core::iter::from_fn(move || {
            let cell = self.slot(cursor?);
            cursor = cell.next;
            Some(cell)
        })
    }

    fn evict_lru(&mut self) -> bool {
        let Some(idx) = self.head else {
            return false;
        };
        self.unlink(idx);
        if let Some(cell) = self.slots[idx].take() {
            self.lookup.remove(&cell.coord);
            log::debug!("evicting tile {:?}", cell.coord);
        }
        self.free_list.push(idx);
        true
    }

    fn slot(&self, idx: usize) -> &CacheCell<T> {
        self.slots[idx]
            .as_ref()
            .expect("tile cache invariant violated: indexed slot is empty")
    }

    fn slot_mut(&mut self, idx: usize) -> &mut CacheCell<T> {
        self.slots[idx]
            .as_mut()
            .expect("tile cache invariant violated: indexed slot is empty")
    }

    fn link_back(&mut self, idx: usize) {
        let tail = self.tail;
        {
            let cell = self.slot_mut(idx);
            cell.prev = tail;
            cell.next = None;
        }
        match tail {
            Some(t) => self.slot_mut(t).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let cell = self.slot(idx);
            (cell.prev, cell.next)
        };
        match prev {
            Some(p) => self.slot_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slot_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }
}

impl<T: TileSurface> CacheGrid<T> {
    fn create(&mut self, coord: IPoint) -> usize {
        let size = self.tile_size;
        let origin = IPoint::new(
            coord.x.saturating_mul(size.width),
            coord.y.saturating_mul(size.height),
        );
        let cell = CacheCell {
            coord,
            rect: IRect::from_origin_size(origin, size),
            surface: T::blank(size),
            dirty: true,
            prev: None,
            next: None,
        };
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(cell);
            idx
        } else {
            self.slots.push(Some(cell));
            self.slots.len() - 1
        };
        self.lookup.insert(coord, idx);
        idx
    }
}
