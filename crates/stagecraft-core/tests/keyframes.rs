//! Keyframes Tests
//!
//! Named keyframe sets registered on the director and attached to actors:
//! per-actor independence, multi-track sampling, cycling and
//! discardable removal.

use stagecraft_core::keyframes::{KeyframeTrack, KeyframesEvent};
use stagecraft_core::types::Property;
use stagecraft_core::{
    Actor, ActorId, Director, DirectorConfig, Interpolator, Keyframes, KeyframesContainer,
};
use std::cell::RefCell;
use std::rc::Rc;

fn pulse() -> KeyframesContainer {
    let track = KeyframeTrack::new(Property::Alpha)
        .with_stop(0.0, 0.0, Interpolator::linear())
        .with_stop(0.5, 1.0, Interpolator::linear())
        .with_stop(1.0, 0.0, Interpolator::linear());
    let grow = KeyframeTrack::new(Property::Width)
        .with_stop(0.0, 10.0, Interpolator::linear())
        .with_stop(1.0, 30.0, Interpolator::linear());
    KeyframesContainer::new("pulse", 0.0, 1000.0)
        .with_keyframes(Keyframes::new("pulse", 0.0, 1000.0).with_track(track).with_track(grow))
}

fn stage_with(count: usize) -> (Director, Vec<ActorId>) {
    let mut director = Director::new(DirectorConfig::new(100, 100));
    let scene = director.create_scene();
    let actors = (0..count)
        .map(|_| {
            let id = director.graph.add_actor(Actor::new().with_bounds(0.0, 0.0, 10.0, 10.0));
            director.graph.add_child(scene, id).unwrap();
            id
        })
        .collect();
    (director, actors)
}

#[test]
fn attached_sets_sample_every_track() {
    let (mut director, actors) = stage_with(1);
    director.keyframes.register("pulse", pulse());
    assert!(director.attach_keyframes(actors[0], "pulse"));

    director.animate(250.0);
    let a = director.graph.actor(actors[0]).unwrap();
    assert!((a.alpha - 0.5).abs() < 1e-3);
    assert!((a.width - 15.0).abs() < 1e-3);

    director.animate(250.0);
    assert!((director.graph.actor(actors[0]).unwrap().alpha - 1.0).abs() < 1e-3);

    director.animate(600.0);
    let a = director.graph.actor(actors[0]).unwrap();
    assert!(a.alpha.abs() < 1e-3);
    assert!((a.width - 30.0).abs() < 1e-3);
    assert!(a.keyframes()[0].is_expired());
}

#[test]
fn each_actor_gets_an_independent_copy() {
    let (mut director, actors) = stage_with(2);
    director.keyframes.register("pulse", pulse());
    director.attach_keyframes(actors[0], "pulse");
    director.animate(2000.0);
    director.attach_keyframes(actors[1], "pulse");

    let first = director.graph.actor(actors[0]).unwrap();
    let second = director.graph.actor(actors[1]).unwrap();
    assert!(first.keyframes()[0].is_expired());
    assert!(!second.keyframes()[0].is_expired());
}

#[test]
fn unknown_names_are_skipped() {
    let (mut director, actors) = stage_with(1);
    assert!(!director.attach_keyframes(actors[0], "nope"));
    assert!(director.graph.actor(actors[0]).unwrap().keyframes().is_empty());
}

#[test]
fn cyclic_container_restarts_children() {
    let (mut director, actors) = stage_with(1);
    let expiries = Rc::new(RefCell::new(0));
    let sink = expiries.clone();
    let slide = Keyframes::new("slide", 0.0, 100.0)
        .with_track(
            KeyframeTrack::new(Property::X)
                .with_stop(0.0, 0.0, Interpolator::linear())
                .with_stop(1.0, 100.0, Interpolator::linear()),
        )
        .on_expire(move |_, e| {
            if matches!(e, KeyframesEvent::Expired { .. }) {
                *sink.borrow_mut() += 1;
            }
        });
    director.keyframes.register(
        "loop",
        KeyframesContainer::new("loop", 0.0, 100.0).with_keyframes(slide).with_cycle(true),
    );
    director.attach_keyframes(actors[0], "loop");

    director.animate(130.0);
    assert!((director.graph.actor(actors[0]).unwrap().x - 30.0).abs() < 1e-3);
    director.animate(50.0);
    director.animate(40.0);
    assert!((director.graph.actor(actors[0]).unwrap().x - 20.0).abs() < 1e-3);
    assert!(!director.graph.actor(actors[0]).unwrap().keyframes()[0].is_expired());
    assert_eq!(*expiries.borrow(), 0);
}

#[test]
fn discardable_sets_are_dropped_after_expiry() {
    let (mut director, actors) = stage_with(1);
    let mut set = pulse();
    set.discardable = true;
    director.keyframes.register("once", set);
    director.attach_keyframes(actors[0], "once");
    director.animate(1500.0);
    assert!(director.graph.actor(actors[0]).unwrap().keyframes().is_empty());
}
