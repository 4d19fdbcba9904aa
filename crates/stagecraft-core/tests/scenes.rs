//! Scene Switching Tests
//!
//! Director-level scene management: immediate switches, animated
//! transitions of every kind, settle order, input gating and per-scene
//! clocks with timers.

use stagecraft_core::input::PointerKind;
use stagecraft_core::systems::{Anchor, SceneTransition, TransitionKind, TransitionLeg};
use stagecraft_core::timer::TimerTask;
use stagecraft_core::{Actor, Director, DirectorConfig, Interpolator, RecordingSurface};
use std::cell::Cell;
use std::rc::Rc;

fn two_scenes() -> Director {
    let mut director = Director::new(DirectorConfig::new(200, 100));
    director.create_scene();
    director.create_scene();
    director
}

#[test]
fn immediate_switch_replaces_the_visible_scene() {
    let mut director = two_scenes();
    let b = director.scene(1).unwrap();
    director.switch_to_scene(1, None).unwrap();
    assert_eq!(director.visible_scenes(), vec![b]);
    assert_eq!(director.current_scene(), Some(b));
    assert!(!director.is_transitioning());
}

#[test]
fn every_transition_kind_settles_on_the_incoming_scene() {
    let legs = [
        (TransitionKind::Translate, Anchor::Top, Anchor::Bottom),
        (TransitionKind::Scale, Anchor::BottomRight, Anchor::Left),
        (TransitionKind::Rotate, Anchor::Center, Anchor::TopLeft),
    ];
    for (kind, out_anchor, in_anchor) in legs {
        let mut director = two_scenes();
        let (a, b) = (director.scene(0).unwrap(), director.scene(1).unwrap());
        let transition = SceneTransition::new(
            300.0,
            TransitionLeg::new(kind, out_anchor),
            TransitionLeg::new(kind, in_anchor).with_interpolator(Interpolator::exponential_out(2.0)),
        )
        .with_alpha(true);
        director.switch_to_scene(1, Some(transition)).unwrap();

        director.animate(150.0);
        assert_eq!(director.visible_scenes(), vec![a, b], "{kind:?} mid-transition");
        let incoming = director.graph.actor(b).unwrap();
        assert!(incoming.alpha > 0.0 && incoming.alpha < 1.0);

        director.animate(150.0);
        assert_eq!(director.visible_scenes(), vec![b], "{kind:?} settled");
        let settled = director.graph.actor(b).unwrap();
        assert_eq!((settled.x, settled.y, settled.alpha), (0.0, 0.0, 1.0));
        assert!(settled.behaviors().is_empty());
        assert!(settled.mouse_enabled);
    }
}

#[test]
fn translation_moves_both_scenes_together() {
    let mut director = two_scenes();
    let (a, b) = (director.scene(0).unwrap(), director.scene(1).unwrap());
    director
        .switch_to_scene(1, Some(SceneTransition::translate(100.0, Anchor::Left, Anchor::Right)))
        .unwrap();
    director.animate(50.0);
    assert!((director.graph.actor(a).unwrap().x + 100.0).abs() < 1e-3);
    assert!((director.graph.actor(b).unwrap().x - 100.0).abs() < 1e-3);
}

#[test]
fn set_scene_cancels_a_running_transition() {
    let mut director = two_scenes();
    let a = director.scene(0).unwrap();
    director
        .switch_to_scene(1, Some(SceneTransition::rotate(500.0, Anchor::Center, Anchor::Center)))
        .unwrap();
    director.animate(100.0);
    director.set_scene(0).unwrap();

    let scene = director.graph.actor(a).unwrap();
    assert_eq!(scene.rotation_angle, 0.0);
    assert!(scene.behaviors().is_empty());
    assert_eq!(director.visible_scenes(), vec![a]);
    director.animate(1000.0);
    assert_eq!(director.current_scene(), Some(a));
}

#[test]
fn input_is_ignored_while_transitioning() {
    let mut director = two_scenes();
    let b = director.scene(1).unwrap();
    let button = director.graph.add_actor(Actor::new().with_bounds(0.0, 0.0, 50.0, 50.0));
    director.graph.add_child(b, button).unwrap();
    director
        .switch_to_scene(1, Some(SceneTransition::scale(100.0, Anchor::Center, Anchor::Center)))
        .unwrap();
    director.animate(50.0);
    assert_eq!(director.dispatch_pointer(PointerKind::Down, 10.0, 10.0), None);
    director.animate(50.0);
    assert_eq!(director.dispatch_pointer(PointerKind::Down, 10.0, 10.0), Some(button));
}

#[test]
fn scene_timers_run_on_the_scene_clock() {
    let mut director = two_scenes();
    let ticks = Rc::new(Cell::new(0));
    let done = Rc::new(Cell::new(false));
    let (t, d) = (ticks.clone(), done.clone());
    let scene = director.scene(0).unwrap();
    director.graph.scene_state_mut(scene).unwrap().timers.add(
        TimerTask::new(0.0, 100.0)
            .on_tick(move |_, _| t.set(t.get() + 1))
            .on_timeout(move |_, _| d.set(true)),
    );
    director.set_time_scale(0, 2.0).unwrap();

    let mut surface = RecordingSurface::new();
    director.render(25.0, &mut surface).unwrap();
    director.render(25.0, &mut surface).unwrap();
    assert_eq!((ticks.get(), done.get()), (1, true));
    assert_eq!(director.scene_time(0), Some(100.0));
    assert_eq!(director.time(), 50.0);
}

#[test]
fn hidden_scenes_do_not_advance() {
    let mut director = two_scenes();
    director.animate(100.0);
    assert_eq!(director.scene_time(1), Some(0.0));
    director.resume_scene(1).unwrap();
    assert!(director.pause_scene(5).is_err());
}
