// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The board: shapes, paint order, viewport, and tile cache kept consistent.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::{Point, Rect, Vec2};
use understory_quadtree::{Error as IndexError, OrderedList, QuadTree, Shape, filter};
use understory_tile_cache::{CacheGrid, TileSurface};
use understory_view2d::{CoordinateTransformer, IRect, ISize};

use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::frame::FrameRequest;
use crate::surface::{Draw, Screen};

/// Outcome of one render pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Tiles blitted to the screen.
    pub tiles: usize,
    /// Tiles redrawn because they were dirty.
    pub redrawn: usize,
}

/// An infinite whiteboard: a quadtree of shapes drawn through a tile cache.
///
/// Every mutation goes through the tree and then marks the affected world
/// region dirty in the cache. [`Board::render`] redraws dirty tiles under the
/// viewport, back to front, and blits every visible tile to a [`Screen`].
///
/// `S` is the shape type, usually a trait object combining [`Shape`] and
/// [`Draw`]; `T` is the tile surface.
pub struct Board<S: ?Sized, T> {
    tree: QuadTree<S>,
    cache: CacheGrid<T>,
    transformer: CoordinateTransformer,
    viewport: ISize,
    config: BoardConfig,
    pending: FrameRequest,
}

impl<S: ?Sized, T> Debug for Board<S, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Board")
            .field("tree", &self.tree)
            .field("cache", &self.cache)
            .field("transformer", &self.transformer)
            .field("viewport", &self.viewport)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<S, T> Board<S, T>
where
    S: Shape + Draw<T> + ?Sized,
    T: TileSurface,
{
    /// Create an empty board with an empty viewport.
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        let tree = QuadTree::with_capacity(config.initial_region, config.node_capacity)?;
        let cache = CacheGrid::with_tile_size(config.cache_capacity, config.tile_size)?;
        Ok(Self {
            tree,
            cache,
            transformer: CoordinateTransformer::default(),
            viewport: ISize::default(),
            config,
            pending: FrameRequest::RENDER,
        })
    }

    /// The spatial index.
    pub fn tree(&self) -> &QuadTree<S> {
        &self.tree
    }

    /// The tile cache.
    pub fn cache(&self) -> &CacheGrid<T> {
        &self.cache
    }

    /// Current zoom and offset.
    pub fn transformer(&self) -> &CoordinateTransformer {
        &self.transformer
    }

    /// Viewport size in view pixels.
    pub fn viewport(&self) -> ISize {
        self.viewport
    }

    /// Parameters the board was built with.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Work queued for the next [`Board::tick`].
    pub fn pending(&self) -> FrameRequest {
        self.pending
    }

    /// Ask the next tick to present the screen again, for overlay changes
    /// that do not touch shapes.
    pub fn request_update(&mut self) {
        self.pending |= FrameRequest::UPDATE;
    }

    /// Add a new shape on top of everything.
    pub fn insert(&mut self, shape: Rc<S>) {
        let bounds = shape.bounding_box();
        self.tree.insert_item(shape);
        self.invalidate(bounds);
    }

    /// Take a shape off the board, keeping its z-index for [`Board::restore`].
    pub fn remove(&mut self, shape: &Rc<S>) {
        self.tree.detach_item(shape);
        self.invalidate(shape.bounding_box());
    }

    /// Put back a shape taken off with [`Board::remove`], at its old z-index.
    pub fn restore(&mut self, shape: Rc<S>) {
        let bounds = shape.bounding_box();
        self.tree.reinsert_item(shape);
        self.invalidate(bounds);
    }

    /// Drop a shape from the board and from the paint order for good.
    pub fn delete(&mut self, shape: &Rc<S>) {
        self.tree.delete_item(shape);
        self.invalidate(shape.bounding_box());
    }

    /// Reindex a shape whose bounds changed from `old_bounds`.
    pub fn shape_moved(&mut self, shape: &Rc<S>, old_bounds: Rect) {
        self.tree.update_item(shape, old_bounds);
        self.invalidate(old_bounds);
        self.invalidate(shape.bounding_box());
    }

    /// Replace `members` with a group built from them.
    ///
    /// `build` receives the members back to front and returns the group
    /// shape. Members leave the index but keep their z-index, so a later
    /// [`Board::ungroup`] restores the original stacking. The group goes on
    /// top.
    pub fn group<F>(&mut self, members: &[Rc<S>], build: F) -> Result<Rc<S>, BoardError>
    where
        F: FnOnce(Vec<Rc<S>>) -> Rc<S>,
    {
        let mut ordered = members.to_vec();
        self.tree.reorder(&mut ordered)?;
        for member in &ordered {
            self.tree.detach_item(member);
        }
        let group = build(ordered);
        self.insert(Rc::clone(&group));
        Ok(group)
    }

    /// Replace `group` with its `members`, at the z-indices they had before
    /// grouping.
    pub fn ungroup(&mut self, group: &Rc<S>, members: &[Rc<S>]) {
        self.delete(group);
        for member in members {
            self.restore(Rc::clone(member));
        }
    }

    /// Swap `shape` with the shape just above it.
    pub fn bring_forward(&mut self, shape: &Rc<S>) -> Result<(), BoardError> {
        self.restack(shape, OrderedList::bring_forward)
    }

    /// Swap `shape` with the shape just below it.
    pub fn send_backward(&mut self, shape: &Rc<S>) -> Result<(), BoardError> {
        self.restack(shape, OrderedList::send_backward)
    }

    /// Move `shape` below everything.
    pub fn send_to_back(&mut self, shape: &Rc<S>) -> Result<(), BoardError> {
        self.restack(shape, OrderedList::send_to_back)
    }

    /// Move `shape` above everything.
    pub fn bring_to_front(&mut self, shape: &Rc<S>) -> Result<(), BoardError> {
        self.restack(shape, OrderedList::bring_to_front)
    }

    /// The topmost shape whose bounds contain a view-space point.
    pub fn pick(&self, view_point: Point) -> Option<Rc<S>> {
        let world = self.transformer.view_to_world(view_point);
        let mut hits = self.tree.query_items(world);
        paint_order(&self.tree, &mut hits);
        hits.pop()
    }

    /// Shapes entirely inside a view-space rectangle, back to front.
    pub fn select_in(&self, view_rect: Rect) -> Vec<Rc<S>> {
        let world = self.transformer.view_to_world(view_rect);
        let mut hits = self.tree.query_items_with(world, filter::bounds_inside);
        paint_order(&self.tree, &mut hits);
        hits
    }

    /// Every shape on the board, back to front.
    pub fn select_all(&self) -> Vec<Rc<S>> {
        let mut all = self.tree.all_items();
        paint_order(&self.tree, &mut all);
        all
    }

    /// Scroll by `delta` view pixels.
    ///
    /// Tiles live in grid space, which does not depend on the offset, so
    /// nothing is invalidated.
    pub fn pan_by(&mut self, delta: Vec2) {
        let offset = self.transformer.offset() + delta / self.transformer.zoom();
        self.transformer.set_offset(offset);
        self.pending |= FrameRequest::RENDER;
    }

    /// Change the zoom by `steps` multiples of the configured step, keeping
    /// the view point `anchor` (the viewport center by default) fixed.
    pub fn zoom_by(&mut self, steps: f64, anchor: Option<Point>) {
        let zoom = self.transformer.zoom() + steps * self.config.zoom_step;
        self.set_zoom(zoom, anchor);
    }

    /// Set the zoom factor, clamped to the configured minimum, keeping the
    /// view point `anchor` (the viewport center by default) fixed.
    ///
    /// Every tile is invalidated since grid space scales with the zoom.
    pub fn set_zoom(&mut self, zoom: f64, anchor: Option<Point>) {
        let zoom = zoom.max(self.config.min_zoom);
        if !zoom.is_finite() || zoom == self.transformer.zoom() {
            return;
        }
        let size = self.viewport.to_size();
        let anchor = anchor.unwrap_or(Point::new(size.width * 0.5, size.height * 0.5));
        self.transformer.zoom_about(zoom, anchor);
        self.cache.mark_all_dirty();
        self.pending |= FrameRequest::RENDER;
    }

    /// Record a new viewport size and size the tile budget to match.
    ///
    /// The budget is the configured factor times the number of tiles the
    /// viewport can straddle.
    pub fn resize(&mut self, viewport: ISize) -> Result<(), BoardError> {
        let tile = self.cache.tile_size();
        let span = |extent: i32, tile: i32| -> usize {
            let extent = u32::try_from(extent).unwrap_or(0);
            let tile = u32::try_from(tile).unwrap_or(1).max(1);
            usize::try_from(extent.div_ceil(tile)).unwrap_or(usize::MAX) + 1
        };
        let rows = span(viewport.height, tile.height);
        let cols = span(viewport.width, tile.width);
        let budget = self
            .config
            .tile_budget_factor
            .saturating_mul(rows)
            .saturating_mul(cols);
        self.cache.set_size(budget)?;
        self.viewport = viewport;
        self.pending |= FrameRequest::RENDER;
        Ok(())
    }

    /// Start over: no shapes, every tile dirty, default zoom and offset.
    pub fn reset(&mut self) {
        self.tree.clear();
        self.cache.mark_all_dirty();
        self.transformer = CoordinateTransformer::default();
        self.pending |= FrameRequest::RENDER;
        log::debug!("board reset");
    }

    /// Grid-space pixels covered by the viewport.
    pub fn grid_viewport(&self) -> IRect {
        let origin = self.transformer.world_to_grid(self.transformer.offset());
        IRect::round_out(Rect::from_origin_size(origin, self.viewport.to_size()))
    }

    /// Redraw the dirty tiles under the viewport and blit every tile under it.
    ///
    /// A dirty tile is cleared, then every shape touching its world rectangle
    /// is drawn onto it back to front.
    pub fn render(&mut self, screen: &mut impl Screen<T>) -> RenderStats {
        let region = self.grid_viewport();
        let tree = &self.tree;
        let transformer = &self.transformer;
        let zoom = transformer.zoom();
        let mut stats = RenderStats::default();
        self.cache.visit_cells(region, |cell| {
            if cell.is_dirty() {
                let world = transformer.grid_to_world(cell.rect().to_rect());
                let mut shapes = tree.query_items(world);
                paint_order(tree, &mut shapes);
                let surface = cell.surface_mut();
                surface.clear();
                for shape in &shapes {
                    shape.draw(surface, world.origin(), zoom);
                }
                cell.set_dirty(false);
                stats.redrawn += 1;
                log::trace!("redrew tile {:?} with {} shapes", cell.coord(), shapes.len());
            }
            screen.blit(cell.surface(), transformer.grid_to_view(cell.rect()));
            stats.tiles += 1;
        });
        self.pending.remove(FrameRequest::RENDER);
        stats
    }

    /// Run the work queued since the last tick.
    ///
    /// Returns whether the screen changed and must be presented.
    pub fn tick(&mut self, screen: &mut impl Screen<T>) -> bool {
        let pending = core::mem::take(&mut self.pending);
        if pending.contains(FrameRequest::RENDER) {
            self.render(screen);
        }
        !pending.is_empty()
    }

    fn restack(
        &mut self,
        shape: &Rc<S>,
        op: fn(&mut OrderedList<S>, &Rc<S>) -> Result<(), IndexError>,
    ) -> Result<(), BoardError> {
        op(self.tree.order_mut(), shape)?;
        self.invalidate(shape.bounding_box());
        Ok(())
    }

    /// Mark the tiles under a world rectangle dirty and request a render.
    fn invalidate(&mut self, world: Rect) {
        if !world.is_finite() {
            return;
        }
        let grid = IRect::round_out(self.transformer.world_to_grid(world));
        // One pixel of slack for antialiased edges.
        let grid = IRect::new(
            grid.x0.saturating_sub(1),
            grid.y0.saturating_sub(1),
            grid.x1.saturating_add(1),
            grid.y1.saturating_add(1),
        );
        self.cache.mark_dirty(grid);
        self.pending |= FrameRequest::RENDER;
    }
}

/// Sort back to front, tolerating shapes the paint order does not track.
///
/// Untracked shapes are a caller bug (for example a shape restored after
/// being deleted); they are drawn after the tracked ones.
fn paint_order<S: Shape + ?Sized>(tree: &QuadTree<S>, shapes: &mut [Rc<S>]) {
    if tree.reorder(shapes).is_ok() {
        return;
    }
    log::warn!("painting shapes missing from the z-order on top");
    let order = tree.order();
    shapes.sort_by_key(|s| order.z_index(s).map_or((1, 0), |z| (0, z)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::Cell;
    use understory_view2d::IPoint;

    /// Records draws instead of painting pixels.
    #[derive(Debug, Default)]
    struct Recorder {
        draws: Vec<(u32, Point, f64)>,
    }

    impl TileSurface for Recorder {
        fn blank(_size: ISize) -> Self {
            Self::default()
        }

        fn clear(&mut self) {
            self.draws.clear();
        }
    }

    #[derive(Default)]
    struct Blits(Vec<IRect>);

    impl Screen<Recorder> for Blits {
        fn blit(&mut self, _tile: &Recorder, dest: IRect) {
            self.0.push(dest);
        }
    }

    struct Sticker {
        id: u32,
        bounds: Cell<Rect>,
    }

    impl Shape for Sticker {
        fn bounding_box(&self) -> Rect {
            self.bounds.get()
        }
    }

    impl Draw<Recorder> for Sticker {
        fn draw(&self, surface: &mut Recorder, origin: Point, zoom: f64) {
            surface.draws.push((self.id, origin, zoom));
        }
    }

    fn sticker(id: u32, r: Rect) -> Rc<Sticker> {
        Rc::new(Sticker {
            id,
            bounds: Cell::new(r),
        })
    }

    fn board() -> Board<Sticker, Recorder> {
        let mut b = Board::new(BoardConfig::default()).unwrap();
        b.resize(ISize::new(1000, 1000)).unwrap();
        b
    }

    fn ids(shapes: &[Rc<Sticker>]) -> Vec<u32> {
        shapes.iter().map(|s| s.id).collect()
    }

    fn drawn(b: &Board<Sticker, Recorder>, tile: IPoint) -> Vec<u32> {
        let cell = b.cache().get(tile).unwrap();
        cell.surface().draws.iter().map(|d| d.0).collect()
    }

    #[test]
    fn resize_sets_tile_budget() {
        let mut b: Board<Sticker, Recorder> = Board::new(BoardConfig::default()).unwrap();
        b.resize(ISize::new(1000, 600)).unwrap();
        // rows = ceil(600 / 500) + 1 = 3, cols = ceil(1000 / 500) + 1 = 3.
        assert_eq!(b.cache().capacity(), 81, "9 tiles of budget per viewport tile");
        b.resize(ISize::new(0, 0)).unwrap();
        assert_eq!(b.cache().capacity(), 9, "an empty viewport still keeps one tile");
    }

    #[test]
    fn render_redraws_only_dirty_tiles() {
        let mut b = board();
        let mut screen = Blits::default();
        let s = sticker(1, Rect::new(10.0, 10.0, 20.0, 20.0));
        b.insert(s.clone());

        let first = b.render(&mut screen);
        assert_eq!(first.tiles, 4, "a 1000px viewport spans 2x2 tiles");
        assert_eq!(first.redrawn, 4, "fresh tiles are dirty");
        assert_eq!(drawn(&b, IPoint::new(0, 0)), vec![1], "the sticker is painted");
        assert!(drawn(&b, IPoint::new(1, 1)).is_empty(), "far tile stays empty");
        assert_eq!(screen.0[0], IRect::new(0, 0, 500, 500), "blit at the tile's view rect");

        let second = b.render(&mut screen);
        assert_eq!(second.redrawn, 0, "clean tiles are reused");

        let old = s.bounds.replace(Rect::new(610.0, 10.0, 620.0, 20.0));
        b.shape_moved(&s, old);
        let third = b.render(&mut screen);
        assert_eq!(third.redrawn, 2, "old and new tiles are redrawn");
        assert!(drawn(&b, IPoint::new(0, 0)).is_empty(), "old tile no longer shows it");
        assert_eq!(drawn(&b, IPoint::new(1, 0)), vec![1], "new tile shows it");
    }

    #[test]
    fn tiles_paint_back_to_front() {
        let mut b = board();
        let mut screen = Blits::default();
        let a = sticker(1, Rect::new(0.0, 0.0, 50.0, 50.0));
        let c = sticker(2, Rect::new(25.0, 25.0, 75.0, 75.0));
        b.insert(a.clone());
        b.insert(c.clone());
        b.render(&mut screen);
        assert_eq!(drawn(&b, IPoint::new(0, 0)), vec![1, 2], "insertion order paints");

        b.bring_to_front(&a).unwrap();
        assert!(b.cache().get(IPoint::new(0, 0)).unwrap().is_dirty(), "restack invalidates");
        b.render(&mut screen);
        assert_eq!(drawn(&b, IPoint::new(0, 0)), vec![2, 1], "raised shape paints last");
    }

    #[test]
    fn restacking_an_unknown_shape_is_not_found() {
        let mut b = board();
        let stray = sticker(9, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(
            b.send_to_back(&stray),
            Err(BoardError::Index(IndexError::NotFound)),
            "untracked shapes cannot be restacked"
        );
    }

    #[test]
    fn pick_returns_topmost() {
        let mut b = board();
        let low = sticker(1, Rect::new(0.0, 0.0, 100.0, 100.0));
        let high = sticker(2, Rect::new(50.0, 50.0, 150.0, 150.0));
        b.insert(low.clone());
        b.insert(high.clone());
        assert_eq!(b.pick(Point::new(75.0, 75.0)).map(|s| s.id), Some(2), "overlap: top wins");
        assert_eq!(b.pick(Point::new(10.0, 10.0)).map(|s| s.id), Some(1), "only low here");
        assert!(b.pick(Point::new(500.0, 500.0)).is_none(), "empty spot");

        b.pan_by(Vec2::new(50.0, 50.0));
        assert_eq!(
            b.pick(Point::new(25.0, 25.0)).map(|s| s.id),
            Some(2),
            "picking follows the offset"
        );
    }

    #[test]
    fn select_in_requires_full_containment() {
        let mut b = board();
        b.insert(sticker(1, Rect::new(10.0, 10.0, 20.0, 20.0)));
        b.insert(sticker(2, Rect::new(15.0, 15.0, 300.0, 300.0)));
        b.insert(sticker(3, Rect::new(30.0, 30.0, 40.0, 40.0)));
        let picked = b.select_in(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(ids(&picked), vec![1, 3], "partially covered shape is skipped");
        assert_eq!(ids(&b.select_all()), vec![1, 2, 3], "select all is in paint order");
    }

    #[test]
    fn remove_and_restore_keep_stacking() {
        let mut b = board();
        let under = sticker(1, Rect::new(0.0, 0.0, 50.0, 50.0));
        let over = sticker(2, Rect::new(0.0, 0.0, 50.0, 50.0));
        b.insert(under.clone());
        b.insert(over.clone());
        b.remove(&under);
        assert_eq!(ids(&b.select_all()), vec![2], "removed shape is gone");
        b.restore(under.clone());
        assert_eq!(ids(&b.select_all()), vec![1, 2], "restored below as before");
        b.delete(&under);
        assert!(!b.tree().order().contains(&under), "delete forgets the z-index");
    }

    #[test]
    fn group_and_ungroup_round_trip() {
        let mut b = board();
        let a = sticker(1, Rect::new(0.0, 0.0, 10.0, 10.0));
        let c = sticker(2, Rect::new(20.0, 0.0, 30.0, 10.0));
        let top = sticker(3, Rect::new(100.0, 100.0, 110.0, 110.0));
        b.insert(a.clone());
        b.insert(c.clone());
        b.insert(top.clone());

        let mut seen = Vec::new();
        let group = b
            .group(&[c.clone(), a.clone()], |members| {
                seen = ids(&members);
                sticker(10, Rect::new(0.0, 0.0, 30.0, 10.0))
            })
            .unwrap();
        assert_eq!(seen, vec![1, 2], "members arrive back to front");
        assert_eq!(ids(&b.select_all()), vec![3, 10], "group replaces members, on top");

        b.ungroup(&group, &[a.clone(), c.clone()]);
        assert_eq!(ids(&b.select_all()), vec![1, 2, 3], "members return to their stacking");
        assert!(!b.tree().order().contains(&group), "group left the paint order");
    }

    #[test]
    fn zoom_clamps_keeps_anchor_and_invalidates() {
        let mut b = board();
        let mut screen = Blits::default();
        b.insert(sticker(1, Rect::new(0.0, 0.0, 10.0, 10.0)));
        b.render(&mut screen);

        let anchor = Point::new(200.0, 300.0);
        let world = b.transformer().view_to_world(anchor);
        b.zoom_by(5.0, Some(anchor));
        let zoom = b.transformer().zoom();
        assert!(zoom > 1.5 - 1e-12 && zoom < 1.5 + 1e-12, "five steps of 0.1");
        let back = b.transformer().world_to_view(world);
        assert!((back - anchor).hypot() < 1e-9, "anchor stays put");
        assert!(b.cache().iter().all(|c| c.is_dirty()), "zoom dirties every tile");

        b.zoom_by(-100.0, None);
        assert_eq!(b.transformer().zoom(), 0.1, "zoom is clamped to the minimum");
    }

    #[test]
    fn render_draws_with_tile_origin_and_zoom() {
        let mut b = board();
        let mut screen = Blits::default();
        b.set_zoom(2.0, Some(Point::ZERO));
        b.insert(sticker(1, Rect::new(260.0, 10.0, 270.0, 20.0)));
        b.render(&mut screen);
        // Grid x 520..540 falls in tile (1, 0), whose world origin is 250.
        let draws = &b.cache().get(IPoint::new(1, 0)).unwrap().surface().draws;
        assert_eq!(draws.len(), 1, "drawn once in the covering tile");
        assert_eq!(draws[0].1, Point::new(250.0, 0.0), "origin is the tile's world corner");
        assert_eq!(draws[0].2, 2.0, "zoom is passed through");
    }

    #[test]
    fn pan_reuses_tiles() {
        let mut b = board();
        let mut screen = Blits::default();
        b.render(&mut screen);
        b.pan_by(Vec2::new(500.0, 0.0));
        assert!(
            b.cache().iter().all(|c| !c.is_dirty()),
            "panning invalidates nothing"
        );
        let stats = b.render(&mut screen);
        assert_eq!(stats.redrawn, 2, "only the newly exposed column is drawn");
    }

    #[test]
    fn tick_runs_queued_work() {
        let mut b = board();
        let mut screen = Blits::default();
        assert!(b.tick(&mut screen), "a new board renders once");
        assert!(!b.tick(&mut screen), "idle ticks do nothing");
        b.insert(sticker(1, Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(b.pending().contains(FrameRequest::RENDER), "insert queues a render");
        assert!(b.tick(&mut screen), "queued render runs");
        b.request_update();
        let blits = screen.0.len();
        assert!(b.tick(&mut screen), "update requests a present");
        assert_eq!(screen.0.len(), blits, "update alone blits nothing");
    }

    #[test]
    fn reset_clears_shapes_and_view() {
        let mut b = board();
        let mut screen = Blits::default();
        b.insert(sticker(1, Rect::new(0.0, 0.0, 1.0, 1.0)));
        b.pan_by(Vec2::new(30.0, 40.0));
        b.render(&mut screen);
        b.reset();
        assert_eq!(b.tree().size(), 0, "no shapes remain");
        assert_eq!(b.transformer().offset(), Point::ZERO, "offset is reset");
        assert!(b.cache().iter().all(|c| c.is_dirty()), "every tile is dirty");
    }
}
