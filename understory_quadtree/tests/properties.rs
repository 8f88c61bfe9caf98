// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized checks of growth, query exactness, and z-order bookkeeping.

use std::collections::BTreeSet;
use std::rc::Rc;

use kurbo::{Point, Rect};
use proptest::prelude::*;
use understory_quadtree::QuadTree;

fn rect() -> impl Strategy<Value = Rect> {
    (-2_000.0_f64..2_000.0, -2_000.0_f64..2_000.0, 0.0_f64..300.0, 0.0_f64..300.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, x + w, y + h))
}

fn touches(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

fn contains(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.x1 <= outer.x1 && inner.y0 >= outer.y0 && inner.y1 <= outer.y1
}

#[derive(Clone, Debug)]
enum Op {
    Forward(usize),
    Backward(usize),
    ToBack(usize),
    ToFront(usize),
}

fn op(n: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..n).prop_map(Op::Forward),
        (0..n).prop_map(Op::Backward),
        (0..n).prop_map(Op::ToBack),
        (0..n).prop_map(Op::ToFront),
    ]
}

proptest! {
    #[test]
    fn expand_contains_arbitrary_points(
        x in -1e12_f64..1e12,
        y in -1e12_f64..1e12,
    ) {
        let mut tree = QuadTree::<Rect>::new(Rect::new(0.0, 0.0, 500.0, 500.0)).unwrap();
        let p = Point::new(x, y);
        tree.expand(p);
        let r = tree.region();
        prop_assert!(p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1);
    }

    #[test]
    fn root_contains_every_inserted_shape(shapes in prop::collection::vec(rect(), 1..40)) {
        let mut tree = QuadTree::with_capacity(Rect::new(0.0, 0.0, 100.0, 100.0), 2).unwrap();
        let mut inserted: Vec<Rect> = Vec::new();
        for r in shapes {
            tree.insert_item(Rc::new(r));
            inserted.push(r);
            for s in &inserted {
                prop_assert!(contains(tree.region(), *s));
            }
        }
    }

    #[test]
    fn query_is_exact(
        shapes in prop::collection::vec(rect(), 0..60),
        query in rect(),
        capacity in 1_usize..6,
    ) {
        let mut tree = QuadTree::with_capacity(Rect::new(0.0, 0.0, 500.0, 500.0), capacity).unwrap();
        let handles: Vec<Rc<Rect>> = shapes.into_iter().map(Rc::new).collect();
        for h in &handles {
            tree.insert_item(h.clone());
        }
        let hits = tree.query_items(query);
        let got: BTreeSet<usize> = hits.iter().map(|h| Rc::as_ptr(h) as usize).collect();
        prop_assert_eq!(got.len(), hits.len(), "duplicates in the result");
        let expected: BTreeSet<usize> = handles
            .iter()
            .filter(|h| touches(***h, query))
            .map(|h| Rc::as_ptr(h) as usize)
            .collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn delete_leaves_no_trace(
        shapes in prop::collection::vec(rect(), 1..40),
        capacity in 1_usize..4,
    ) {
        let mut tree = QuadTree::with_capacity(Rect::new(0.0, 0.0, 500.0, 500.0), capacity).unwrap();
        let handles: Vec<Rc<Rect>> = shapes.into_iter().map(Rc::new).collect();
        for h in &handles {
            tree.insert_item(h.clone());
        }
        for h in handles.iter().step_by(2) {
            tree.delete_item(h);
        }
        let remaining = tree.all_items();
        prop_assert_eq!(remaining.len(), handles.len() / 2);
        prop_assert_eq!(tree.order().len(), remaining.len());
        for h in handles.iter().step_by(2) {
            prop_assert!(!remaining.iter().any(|r| Rc::ptr_eq(r, h)));
        }
    }

    #[test]
    fn z_order_stays_strict_and_consistent(ops in prop::collection::vec(op(8), 0..64)) {
        let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        let handles: Vec<Rc<Rect>> = (0..8)
            .map(|i| Rc::new(Rect::new(f64::from(i), 0.0, f64::from(i) + 1.0, 1.0)))
            .collect();
        for h in &handles {
            tree.insert_item(h.clone());
        }
        for op in ops {
            let order = tree.order_mut();
            match op {
                Op::Forward(i) => order.bring_forward(&handles[i]).unwrap(),
                Op::Backward(i) => order.send_backward(&handles[i]).unwrap(),
                Op::ToBack(i) => {
                    order.send_to_back(&handles[i]).unwrap();
                    let z = order.z_index(&handles[i]).unwrap();
                    prop_assert!(handles.iter().all(|h| order.z_index(h).unwrap() >= z));
                }
                Op::ToFront(i) => {
                    order.bring_to_front(&handles[i]).unwrap();
                    let z = order.z_index(&handles[i]).unwrap();
                    prop_assert!(handles.iter().all(|h| order.z_index(h).unwrap() <= z));
                }
            }
        }
        let mut all = handles.clone();
        tree.reorder(&mut all).unwrap();
        let zs: Vec<i64> = all.iter().map(|h| tree.order().z_index(h).unwrap()).collect();
        prop_assert!(zs.windows(2).all(|w| w[0] < w[1]), "z-indices are unique");
        let walked: Vec<*const Rect> = tree.order().iter().map(Rc::as_ptr).collect();
        let sorted: Vec<*const Rect> = all.iter().map(Rc::as_ptr).collect();
        prop_assert_eq!(walked, sorted, "list order agrees with z order");
    }
}
