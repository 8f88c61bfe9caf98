// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The quadtree: an arena of nodes that grows to contain whatever is inserted.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashSet;
use kurbo::{Point, Rect};
use smallvec::{SmallVec, smallvec};

use crate::error::Error;
use crate::ordered_list::OrderedList;
use crate::query::{Query, contains_point, filter, overlaps};
use crate::shape::{Shape, ShapeKey};

/// Handle of a node in the tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodeIdx(usize);

/// Children in NW, NE, SE, SW order.
type Quadrants = [NodeIdx; 4];

#[derive(Copy, Clone, Debug)]
enum NodeKind {
    Leaf,
    Branch(Quadrants),
}

struct Node<S: ?Sized> {
    region: Rect,
    // Shapes stored here; each one's bounds touch `region`.
    shapes: Vec<Rc<S>>,
    kind: NodeKind,
}

impl<S: ?Sized> Node<S> {
    fn new(region: Rect, kind: NodeKind) -> Self {
        Self {
            region,
            shapes: Vec::new(),
            kind,
        }
    }

    fn position(&self, key: ShapeKey) -> Option<usize> {
        self.shapes.iter().position(|s| ShapeKey::of(s) == key)
    }
}

/// A region quadtree over shared shapes.
///
/// Each node stores up to `capacity` shapes. An insert that reaches a full
/// node subdivides it into four quadrants and continues into every quadrant
/// the shape's bounds touch, so a shape straddling a split lives in several
/// nodes. Queries deduplicate these copies. Nodes never merge back.
///
/// The root is not fixed: inserting outside of it re-roots the tree around a
/// region twice as large, as many times as needed (see [`QuadTree::expand`]).
///
/// The tree owns the [`OrderedList`] holding the paint order of its shapes.
/// [`QuadTree::insert_item`] and [`QuadTree::delete_item`] keep both in sync;
/// [`QuadTree::reinsert_item`] and [`QuadTree::detach_item`] touch only the
/// spatial side, for shapes that leave the tree temporarily but must keep
/// their z-index.
pub struct QuadTree<S: ?Sized> {
    nodes: Vec<Node<S>>,
    root: NodeIdx,
    capacity: usize,
    order: OrderedList<S>,
}

impl<S: ?Sized> Debug for QuadTree<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let stored: usize = self.nodes.iter().map(|n| n.shapes.len()).sum();
        f.debug_struct("QuadTree")
            .field("region", &self.nodes[self.root.0].region)
            .field("capacity", &self.capacity)
            .field("nodes", &self.nodes.len())
            .field("stored", &stored)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl<S: Shape + ?Sized> QuadTree<S> {
    /// Shapes per node before it subdivides, unless configured otherwise.
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Create a tree rooted at `region` with [`Self::DEFAULT_CAPACITY`].
    pub fn new(region: Rect) -> Result<Self, Error> {
        Self::with_capacity(region, Self::DEFAULT_CAPACITY)
    }

    /// Create a tree rooted at `region` whose nodes hold up to `capacity` shapes.
    ///
    /// The region must be finite with a positive area, and `capacity` must
    /// be non-zero.
    pub fn with_capacity(region: Rect, capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidConfiguration("node capacity must be non-zero"));
        }
        if !region.is_finite() || !(region.width() > 0.0 && region.height() > 0.0) {
            return Err(Error::InvalidConfiguration(
                "root region must be finite with a positive area",
            ));
        }
        Ok(Self {
            nodes: alloc::vec![Node::new(region, NodeKind::Leaf)],
            root: NodeIdx(0),
            capacity,
            order: OrderedList::new(),
        })
    }

    /// The root region. It only ever grows.
    pub fn region(&self) -> Rect {
        self.nodes[self.root.0].region
    }

    /// Shapes per node before subdivision.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The paint order of the tree's shapes.
    pub fn order(&self) -> &OrderedList<S> {
        &self.order
    }

    /// Mutable access to the paint order, for raise and lower operations.
    pub fn order_mut(&mut self) -> &mut OrderedList<S> {
        &mut self.order
    }

    /// Index `shape` and put it in front of the paint order.
    pub fn insert_item(&mut self, shape: Rc<S>) {
        self.place(&shape);
        self.order.insert(shape);
    }

    /// Index `shape` without touching the paint order.
    ///
    /// Use this to bring back a shape removed with [`Self::detach_item`]; it
    /// keeps its z-index.
    pub fn reinsert_item(&mut self, shape: Rc<S>) {
        self.place(&shape);
    }

    /// Remove `shape` from the index and from the paint order.
    pub fn delete_item(&mut self, shape: &Rc<S>) {
        self.unplace(shape);
        self.order.remove(shape);
    }

    /// Remove `shape` from the index, keeping its z-index for a later
    /// [`Self::reinsert_item`].
    pub fn detach_item(&mut self, shape: &Rc<S>) {
        self.unplace(shape);
    }

    /// Move `shape` from the nodes touching `old_bounds` to the nodes touching
    /// its current bounding box.
    ///
    /// Both sets of nodes are visited in one pass. A node touching both boxes
    /// keeps the shape where it is.
    pub fn update_item(&mut self, shape: &Rc<S>, old_bounds: Rect) {
        let bounds = shape.bounding_box();
        if !bounds.is_finite() {
            log::warn!("quadtree ignoring move to non-finite bounds {bounds:?}");
            return;
        }
        self.expand_to(bounds);
        let key = ShapeKey::of(shape);
        // Each entry carries whether an ancestor already stores the shape.
        let mut stack: SmallVec<[(NodeIdx, bool); 32]> = smallvec![(self.root, false)];
        while let Some((idx, mut placed)) = stack.pop() {
            let capacity = self.capacity;
            let node = &mut self.nodes[idx.0];
            let in_old = overlaps(node.region, old_bounds);
            let in_new = overlaps(node.region, bounds);
            if !in_old && !in_new {
                continue;
            }
            if let Some(pos) = node.position(key) {
                if in_new && !placed {
                    placed = true;
                } else {
                    node.shapes.remove(pos);
                }
            }
            let mut split = false;
            if in_new && !placed {
                if node.shapes.len() < capacity {
                    node.shapes.push(Rc::clone(shape));
                    placed = true;
                } else {
                    split = true;
                }
            }
            let kind = node.kind;
            let children = match kind {
                NodeKind::Branch(children) => Some(children),
                NodeKind::Leaf if split => Some(self.subdivide(idx)),
                NodeKind::Leaf => None,
            };
            if let Some(children) = children {
                stack.extend(children.into_iter().map(|c| (c, placed)));
            }
        }
    }

    /// Remove and return every shape whose bounds touch `region`.
    ///
    /// The removed shapes also leave the paint order.
    pub fn delete_items(&mut self, region: Rect) -> Vec<Rc<S>> {
        let doomed = self.query_items(region);
        for shape in &doomed {
            self.delete_item(shape);
        }
        doomed
    }

    /// Every distinct shape whose bounding box touches `query`.
    ///
    /// Results come in traversal order. Use [`Self::reorder`] to paint them.
    pub fn query_items(&self, query: impl Into<Query>) -> Vec<Rc<S>> {
        self.query_items_with(query, filter::bounds_intersect)
    }

    /// Every distinct shape stored in a node touched by `query` for which
    /// `filter` returns true.
    ///
    /// See [`filter`](crate::filter) for the stock predicates.
    pub fn query_items_with<F>(&self, query: impl Into<Query>, mut filter: F) -> Vec<Rc<S>>
    where
        F: FnMut(&S, &Query) -> bool,
    {
        let query = query.into();
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack: SmallVec<[NodeIdx; 32]> = smallvec![self.root];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx.0];
            if !query.touches(node.region) {
                continue;
            }
            for shape in &node.shapes {
                if seen.insert(ShapeKey::of(shape)) && filter(shape, &query) {
                    out.push(Rc::clone(shape));
                }
            }
            if let NodeKind::Branch(children) = node.kind {
                stack.extend(children);
            }
        }
        out
    }

    /// Sort `shapes` back to front by z-index.
    ///
    /// Fails with [`Error::NotFound`] if a shape has no z-index.
    pub fn reorder(&self, shapes: &mut [Rc<S>]) -> Result<(), Error> {
        self.order.sort(shapes)
    }

    /// Every distinct shape in the tree.
    pub fn all_items(&self) -> Vec<Rc<S>> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .flat_map(|n| n.shapes.iter())
            .filter(|s| seen.insert(ShapeKey::of(s)))
            .cloned()
            .collect()
    }

    /// Shape slots across all nodes, counting every copy of a straddling shape.
    pub fn size(&self) -> usize {
        self.nodes.iter().map(|n| n.shapes.len()).sum()
    }

    /// Number of nodes, branches included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Regions of every node, for debug overlays.
    pub fn node_regions(&self) -> impl Iterator<Item = Rect> + '_ {
        self.nodes.iter().map(|n| n.region)
    }

    /// Drop every shape and node, keeping the current root region.
    pub fn clear(&mut self) {
        let region = self.region();
        self.nodes.clear();
        self.nodes.push(Node::new(region, NodeKind::Leaf));
        self.root = NodeIdx(0);
        self.order.clear();
    }

    /// Grow the tree until its root region contains `point`.
    ///
    /// Each step re-roots the tree under a node twice as wide and tall. When
    /// the point lies before the root's min corner on either axis, the new
    /// root extends toward the min corner and the old root becomes its SE
    /// quadrant; otherwise it extends toward the max corner and the old root
    /// becomes its NW quadrant. A point outside on both sides in different
    /// directions is reached by alternating steps.
    ///
    /// Non-finite points are ignored.
    pub fn expand(&mut self, point: Point) {
        if !point.is_finite() {
            log::warn!("quadtree ignoring expansion to non-finite point {point:?}");
            return;
        }
        while !contains_point(self.region(), point) {
            let r = self.region();
            self.grow(point.x < r.x0 || point.y < r.y0);
        }
    }

    fn expand_to(&mut self, bounds: Rect) {
        self.expand(Point::new(bounds.x0, bounds.y0));
        self.expand(Point::new(bounds.x1, bounds.y0));
        self.expand(Point::new(bounds.x1, bounds.y1));
        self.expand(Point::new(bounds.x0, bounds.y1));
    }

    fn grow(&mut self, toward_min: bool) {
        let old = self.root;
        let r = self.nodes[old.0].region;
        let (w, h) = (r.width(), r.height());
        let (region, children) = if toward_min {
            let nw = self.push_leaf(Rect::new(r.x0 - w, r.y0 - h, r.x0, r.y0));
            let ne = self.push_leaf(Rect::new(r.x0, r.y0 - h, r.x1, r.y0));
            let sw = self.push_leaf(Rect::new(r.x0 - w, r.y0, r.x0, r.y1));
            (Rect::new(r.x0 - w, r.y0 - h, r.x1, r.y1), [nw, ne, old, sw])
        } else {
            let ne = self.push_leaf(Rect::new(r.x1, r.y0, r.x1 + w, r.y1));
            let se = self.push_leaf(Rect::new(r.x1, r.y1, r.x1 + w, r.y1 + h));
            let sw = self.push_leaf(Rect::new(r.x0, r.y1, r.x1, r.y1 + h));
            (Rect::new(r.x0, r.y0, r.x1 + w, r.y1 + h), [old, ne, se, sw])
        };
        self.nodes.push(Node::new(region, NodeKind::Branch(children)));
        self.root = NodeIdx(self.nodes.len() - 1);
        log::debug!("quadtree re-rooted to {region:?}");
    }

    fn push_leaf(&mut self, region: Rect) -> NodeIdx {
        self.nodes.push(Node::new(region, NodeKind::Leaf));
        NodeIdx(self.nodes.len() - 1)
    }

    /// Split a leaf into four quadrants and return them.
    fn subdivide(&mut self, idx: NodeIdx) -> Quadrants {
        let r = self.nodes[idx.0].region;
        let mx = r.x0 + r.width() * 0.5;
        let my = r.y0 + r.height() * 0.5;
        let children = [
            self.push_leaf(Rect::new(r.x0, r.y0, mx, my)),
            self.push_leaf(Rect::new(mx, r.y0, r.x1, my)),
            self.push_leaf(Rect::new(mx, my, r.x1, r.y1)),
            self.push_leaf(Rect::new(r.x0, my, mx, r.y1)),
        ];
        self.nodes[idx.0].kind = NodeKind::Branch(children);
        log::trace!("quadtree subdivided {r:?}");
        children
    }

    fn place(&mut self, shape: &Rc<S>) {
        let bounds = shape.bounding_box();
        if !bounds.is_finite() {
            log::warn!("quadtree ignoring shape with non-finite bounds {bounds:?}");
            return;
        }
        self.expand_to(bounds);
        let key = ShapeKey::of(shape);
        let mut stack: SmallVec<[NodeIdx; 32]> = smallvec![self.root];
        while let Some(idx) = stack.pop() {
            let node = &mut self.nodes[idx.0];
            if !overlaps(node.region, bounds) || node.position(key).is_some() {
                continue;
            }
            if node.shapes.len() < self.capacity {
                node.shapes.push(Rc::clone(shape));
                continue;
            }
            let kind = node.kind;
            let children = match kind {
                NodeKind::Branch(children) => children,
                NodeKind::Leaf => self.subdivide(idx),
            };
            stack.extend(children);
        }
    }

    fn unplace(&mut self, shape: &Rc<S>) {
        let bounds = shape.bounding_box();
        let key = ShapeKey::of(shape);
        let mut stack: SmallVec<[NodeIdx; 32]> = smallvec![self.root];
        while let Some(idx) = stack.pop() {
            let node = &mut self.nodes[idx.0];
            if !overlaps(node.region, bounds) {
                continue;
            }
            if let Some(pos) = node.position(key) {
                node.shapes.remove(pos);
            }
            if let NodeKind::Branch(children) = node.kind {
                stack.extend(children);
            }
        }
    }
}
