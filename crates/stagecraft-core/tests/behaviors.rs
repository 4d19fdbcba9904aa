//! Behavior Integration Tests
//!
//! Behaviors attached through the scene graph and driven by director frames:
//! path motion with auto-rotation, color fades, generic callbacks,
//! cycling, discardable sweeping and listener ordering.

use stagecraft_core::behavior::{
    Axis, BehaviorEvent, ColorBehavior, ContainerBehavior, Facing, GenericBehavior, PathBehavior,
    Scale1Behavior,
};
use stagecraft_core::path::MotionPath;
use stagecraft_core::types::{ImageTransform, Property};
use stagecraft_core::{
    Actor, ActorId, Behavior, BehaviorStatus, Color, Director, DirectorConfig, Interpolator, Point,
};
use std::cell::RefCell;
use std::rc::Rc;

fn stage() -> (Director, ActorId) {
    let mut director = Director::new(DirectorConfig::new(400, 300));
    let scene = director.create_scene();
    (director, scene)
}

fn spawn(director: &mut Director, scene: ActorId, actor: Actor) -> ActorId {
    let id = director.graph.add_actor(actor);
    director.graph.add_child(scene, id).unwrap();
    id
}

#[test]
fn path_moves_actor_by_arc_length() {
    let (mut director, scene) = stage();
    let ship = spawn(&mut director, scene, Actor::new().with_bounds(0.0, 0.0, 10.0, 10.0));
    let path = MotionPath::polyline(
        &[Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)],
        false,
    );
    director.graph.add_behavior(
        ship,
        Behavior::new(PathBehavior::new(path)).with_frame_time(0.0, 1000.0),
    );

    director.animate(250.0);
    let a = director.graph.actor(ship).unwrap();
    assert!((a.x - 50.0).abs() < 0.5 && a.y.abs() < 0.5);

    director.animate(500.0);
    let a = director.graph.actor(ship).unwrap();
    assert!((a.x - 100.0).abs() < 0.5 && (a.y - 50.0).abs() < 0.5);
}

#[test]
fn path_auto_rotate_faces_travel_direction() {
    let (mut director, scene) = stage();
    let ship = spawn(&mut director, scene, Actor::new().with_bounds(0.0, 0.0, 10.0, 10.0));
    director.graph.add_behavior(
        ship,
        Behavior::new(
            PathBehavior::new(MotionPath::linear(100.0, 0.0, 0.0, 0.0))
                .with_auto_rotate(true, Facing::Right),
        )
        .with_frame_time(0.0, 1000.0),
    );

    director.animate(100.0);
    director.animate(100.0);
    let a = director.graph.actor(ship).unwrap();
    assert_eq!(a.image_transform, ImageTransform::FlipHorizontal);
    assert!((a.rotation_angle - 2.0 * std::f32::consts::PI).abs() < 1e-3);
}

#[test]
fn color_behavior_blends_fill() {
    let (mut director, scene) = stage();
    let tile = spawn(&mut director, scene, Actor::new().with_bounds(0.0, 0.0, 10.0, 10.0));
    director.graph.add_behavior(
        tile,
        Behavior::new(ColorBehavior::new(Color::BLACK, Color::WHITE)).with_frame_time(0.0, 100.0),
    );
    director.animate(50.0);
    let fill = director.graph.actor(tile).unwrap().fill_color.unwrap();
    assert!((fill.r - 0.5).abs() < 1e-4 && (fill.a - 1.0).abs() < 1e-4);
}

#[test]
fn generic_behavior_drives_named_property_and_callback() {
    let (mut director, scene) = stage();
    let knob = spawn(&mut director, scene, Actor::new().with_bounds(0.0, 0.0, 10.0, 10.0));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    director.graph.add_behavior(
        knob,
        Behavior::new(GenericBehavior::property(0.0, 200.0, Property::Y)).with_frame_time(0.0, 100.0),
    );
    director.graph.add_behavior(
        knob,
        Behavior::new(GenericBehavior::callback(1.0, 3.0, move |v, _actor| {
            sink.borrow_mut().push(v)
        }))
        .with_frame_time(0.0, 100.0),
    );

    director.animate(50.0);
    assert_eq!(director.graph.actor(knob).unwrap().y, 100.0);
    assert_eq!(*seen.borrow(), vec![2.0]);
}

#[test]
fn cyclic_rotation_never_expires() {
    let (mut director, scene) = stage();
    let wheel = spawn(&mut director, scene, Actor::new().with_bounds(0.0, 0.0, 10.0, 10.0));
    let id = director
        .graph
        .add_behavior(
            wheel,
            Behavior::rotate(0.0, 1.0).with_frame_time(0.0, 100.0).with_cycle(true),
        )
        .unwrap();
    for _ in 0..25 {
        director.animate(33.0);
    }
    let actor = director.graph.actor(wheel).unwrap();
    assert_eq!(actor.behavior(id).unwrap().status(), BehaviorStatus::Started);
    assert!((actor.rotation_angle - 0.25).abs() < 1e-4);
}

#[test]
fn discardable_behaviors_are_removed_after_expiry() {
    let (mut director, scene) = stage();
    let actor = spawn(&mut director, scene, Actor::new().with_bounds(0.0, 0.0, 10.0, 10.0));
    let kept = director
        .graph
        .add_behavior(actor, Behavior::alpha(1.0, 0.0).with_frame_time(0.0, 50.0))
        .unwrap();
    let dropped = director
        .graph
        .add_behavior(
            actor,
            Behavior::alpha(1.0, 0.0).with_frame_time(0.0, 50.0).with_discardable(true),
        )
        .unwrap();

    director.animate(60.0);
    let a = director.graph.actor(actor).unwrap();
    assert!(a.behavior(kept).is_some_and(Behavior::is_expired));
    assert!(a.behavior(dropped).is_none());
    assert_eq!(a.alpha, 0.0);
}

#[test]
fn nested_container_drives_single_axis_scale() {
    let (mut director, scene) = stage();
    let bar = spawn(&mut director, scene, Actor::new().with_bounds(0.0, 0.0, 100.0, 10.0));
    let grow = Behavior::new(Scale1Behavior::new(0.5, 1.5, Axis::X).with_anchor(0.0, 0.0))
        .with_frame_time(100.0, 100.0);
    director.graph.add_behavior(
        bar,
        Behavior::new(ContainerBehavior::new().with_behavior(grow)).with_frame_time(0.0, 300.0),
    );

    director.animate(150.0);
    let a = director.graph.actor(bar).unwrap();
    assert!((a.scale_x - 1.0).abs() < 1e-4);
    assert_eq!(a.scale_y, 1.0);
}

#[test]
fn listeners_fire_in_registration_order() {
    let (mut director, scene) = stage();
    let actor = spawn(&mut director, scene, Actor::new());
    let log = Rc::new(RefCell::new(Vec::new()));
    let (first, second) = (log.clone(), log.clone());
    let mut behavior = Behavior::alpha(0.0, 1.0)
        .with_frame_time(0.0, 10.0)
        .with_interpolator(Interpolator::linear());
    behavior.add_listener(move |_, e| {
        if matches!(e, BehaviorEvent::Expired { .. }) {
            first.borrow_mut().push("first")
        }
    });
    behavior.add_listener(move |_, e| {
        if matches!(e, BehaviorEvent::Expired { .. }) {
            second.borrow_mut().push("second")
        }
    });
    director.graph.add_behavior(actor, behavior);

    director.animate(20.0);
    director.animate(20.0);
    assert_eq!(*log.borrow(), vec!["first", "second"]);
}
