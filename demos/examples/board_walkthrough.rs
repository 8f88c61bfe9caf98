// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Board walkthrough.
//!
//! Place a few shapes, render through the tile cache, pan, zoom, restack, and
//! print the screen as ASCII after each step.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example board_walkthrough`

use std::rc::Rc;

use kurbo::{Circle, Point, Rect, Shape as _, Vec2};
use understory_board::{Board, BoardConfig, Draw, Screen};
use understory_quadtree::Shape;
use understory_tile_cache::Pixels;
use understory_view2d::{IRect, ISize};

/// Anything the board can hold.
trait Item: Shape + Draw<Pixels> {}

impl<T: Shape + Draw<Pixels>> Item for T {}

struct Fill {
    rect: Rect,
    ink: u8,
}

impl Shape for Fill {
    fn bounding_box(&self) -> Rect {
        self.rect
    }
}

impl Draw<Pixels> for Fill {
    fn draw(&self, surface: &mut Pixels, origin: Point, zoom: f64) {
        paint(surface, origin, zoom, self.rect, self.ink, |_| true);
    }
}

struct Disc {
    circle: Circle,
    ink: u8,
}

impl Shape for Disc {
    fn bounding_box(&self) -> Rect {
        self.circle.bounding_box()
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        let c = self.circle.center;
        let nearest = Point::new(c.x.clamp(rect.x0, rect.x1), c.y.clamp(rect.y0, rect.y1));
        (nearest - c).hypot() <= self.circle.radius
    }
}

impl Draw<Pixels> for Disc {
    fn draw(&self, surface: &mut Pixels, origin: Point, zoom: f64) {
        let c = self.circle;
        paint(surface, origin, zoom, self.bounding_box(), self.ink, |p| {
            (p - c.center).hypot() <= c.radius
        });
    }
}

/// Fill the pixels of `world` whose centers pass `inside`.
fn paint(
    surface: &mut Pixels,
    origin: Point,
    zoom: f64,
    world: Rect,
    ink: u8,
    inside: impl Fn(Point) -> bool,
) {
    let size = surface.size();
    let x0 = (((world.x0 - origin.x) * zoom).floor() as i32).max(0);
    let y0 = (((world.y0 - origin.y) * zoom).floor() as i32).max(0);
    let x1 = (((world.x1 - origin.x) * zoom).ceil() as i32).min(size.width);
    let y1 = (((world.y1 - origin.y) * zoom).ceil() as i32).min(size.height);
    for y in y0..y1 {
        for x in x0..x1 {
            let center = Point::new(
                origin.x + (f64::from(x) + 0.5) / zoom,
                origin.y + (f64::from(y) + 0.5) / zoom,
            );
            if inside(center) {
                if let Some(px) = surface.pixel_mut(x, y) {
                    *px = [ink, ink, ink, 255];
                }
            }
        }
    }
}

/// The window: a pixel buffer the size of the viewport.
struct Framebuffer {
    size: ISize,
    data: Vec<u8>,
}

impl Framebuffer {
    fn new(size: ISize) -> Self {
        Self {
            size,
            data: vec![0; (size.width * size.height) as usize],
        }
    }

    /// One character per 40x40 block, sampled at its center.
    fn print(&self, title: &str) {
        println!("-- {title}");
        for by in (20..self.size.height).step_by(40) {
            let mut line = String::new();
            for bx in (20..self.size.width).step_by(40) {
                let ink = self.data[(by * self.size.width + bx) as usize];
                line.push(match ink {
                    0 => '.',
                    1..=99 => '+',
                    100..=199 => 'o',
                    _ => '#',
                });
            }
            println!("{line}");
        }
    }
}

impl Screen<Pixels> for Framebuffer {
    fn blit(&mut self, tile: &Pixels, dest: IRect) {
        let src = tile.size();
        for y in 0..src.height.min(dest.height()) {
            let sy = dest.y0 + y;
            if !(0..self.size.height).contains(&sy) {
                continue;
            }
            for x in 0..src.width.min(dest.width()) {
                let sx = dest.x0 + x;
                if !(0..self.size.width).contains(&sx) {
                    continue;
                }
                if let Some(px) = tile.pixel(x, y) {
                    self.data[(sy * self.size.width + sx) as usize] = px[0];
                }
            }
        }
    }
}

fn main() {
    env_logger::init();

    let viewport = ISize::new(800, 480);
    let mut board: Board<dyn Item, Pixels> =
        Board::new(BoardConfig::default()).expect("default config is valid");
    board.resize(viewport).expect("viewport is not empty");
    let mut window = Framebuffer::new(viewport);

    let back: Rc<dyn Item> = Rc::new(Fill {
        rect: Rect::new(80.0, 80.0, 400.0, 320.0),
        ink: 80,
    });
    let disc: Rc<dyn Item> = Rc::new(Disc {
        circle: Circle::new((360.0, 240.0), 120.0),
        ink: 160,
    });
    let far: Rc<dyn Item> = Rc::new(Fill {
        rect: Rect::new(-2_000.0, 100.0, -1_800.0, 300.0),
        ink: 255,
    });
    board.insert(back.clone());
    board.insert(disc.clone());
    board.insert(far.clone());
    println!(
        "{} shapes in {} nodes, root {:?}",
        board.tree().size(),
        board.tree().node_count(),
        board.tree().region()
    );

    let stats = board.render(&mut window);
    println!("{stats:?}");
    window.print("initial");

    board.bring_to_front(&back).expect("shape is on the board");
    board.tick(&mut window);
    window.print("rectangle raised above the disc");

    let hit = board.pick(Point::new(420.0, 240.0));
    println!("pick at (420, 240): {:?}", hit.map(|s| s.bounding_box()));

    board.pan_by(Vec2::new(-2_100.0, 0.0));
    window = Framebuffer::new(viewport);
    let stats = board.render(&mut window);
    println!("{stats:?}");
    window.print("panned to the far shape");

    board.pan_by(Vec2::new(2_100.0, 0.0));
    board.zoom_by(-5.0, Some(Point::ZERO));
    window = Framebuffer::new(viewport);
    let stats = board.render(&mut window);
    println!("{stats:?}");
    window.print("zoomed out");

    println!(
        "cache holds {} of {} tiles",
        board.cache().size(),
        board.cache().capacity()
    );
}
