//! Layout Engine Tests
//!
//! Taffy-backed flex layout of container children: row and column
//! placement, per-child styles, and re-layout after the child list changes.

use stagecraft_core::systems::{DirtyRegions, FlexLayout};
use stagecraft_core::{Actor, ActorId, SceneGraph};
use taffy::prelude::*;

fn laid_out(layout: FlexLayout, sizes: &[(f32, f32)]) -> (SceneGraph, ActorId, Vec<ActorId>) {
    let mut graph = SceneGraph::new();
    let root = graph.add_container(Actor::new().with_bounds(0.0, 0.0, 100.0, 100.0));
    graph.set_layout(root, Box::new(layout)).unwrap();
    let kids = sizes
        .iter()
        .map(|&(w, h)| {
            let id = graph.add_actor(Actor::new().with_bounds(0.0, 0.0, w, h));
            graph.add_child(root, id).unwrap();
            id
        })
        .collect();
    graph.animate(root, 0.0, &mut DirtyRegions::new(false));
    (graph, root, kids)
}

fn position(graph: &SceneGraph, id: ActorId) -> (f32, f32) {
    let a = graph.actor(id).unwrap();
    (a.x, a.y)
}

#[test]
fn row_places_children_with_gap_and_padding() {
    let (graph, _, kids) = laid_out(
        FlexLayout::row().with_gap(10.0).with_padding(5.0).with_align(AlignItems::FlexStart),
        &[(20.0, 20.0), (30.0, 20.0)],
    );
    assert_eq!(position(&graph, kids[0]), (5.0, 5.0));
    assert_eq!(position(&graph, kids[1]), (35.0, 5.0));
}

#[test]
fn column_centers_along_the_main_axis() {
    let (graph, _, kids) = laid_out(
        FlexLayout::column().with_justify(JustifyContent::Center),
        &[(20.0, 20.0), (20.0, 20.0)],
    );
    assert_eq!(position(&graph, kids[0]), (0.0, 30.0));
    assert_eq!(position(&graph, kids[1]), (0.0, 50.0));
}

#[test]
fn explicit_child_style_sets_size() {
    let mut graph = SceneGraph::new();
    let root = graph.add_container(Actor::new().with_bounds(0.0, 0.0, 100.0, 100.0));
    graph
        .set_layout(root, Box::new(FlexLayout::row().with_align(AlignItems::FlexStart)))
        .unwrap();
    let fixed = graph.add_actor(Actor::new().with_bounds(0.0, 0.0, 10.0, 10.0));
    let grow = graph.add_actor(Actor::new());
    graph.add_child(root, fixed).unwrap();
    graph
        .add_child_with_style(
            root,
            grow,
            Style {
                flex_grow: 1.0,
                size: Size {
                    width: Dimension::auto(),
                    height: length(15.0),
                },
                ..Default::default()
            },
        )
        .unwrap();
    graph.animate(root, 0.0, &mut DirtyRegions::new(false));

    let g = graph.actor(grow).unwrap();
    assert_eq!((g.x, g.width, g.height), (10.0, 90.0, 15.0));
}

#[test]
fn removing_a_child_reflows_the_rest() {
    let (mut graph, root, kids) = laid_out(
        FlexLayout::row().with_align(AlignItems::FlexStart),
        &[(20.0, 20.0), (20.0, 20.0), (20.0, 20.0)],
    );
    assert_eq!(position(&graph, kids[2]).0, 40.0);
    graph.remove_child(root, kids[0]).unwrap();
    graph.animate(root, 16.0, &mut DirtyRegions::new(false));
    assert_eq!(position(&graph, kids[1]).0, 0.0);
    assert_eq!(position(&graph, kids[2]).0, 20.0);
}
