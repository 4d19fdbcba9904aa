//! Rendering Tests
//!
//! The paint pass through both surfaces: command order and state balance
//! on the recording surface, dirty-rectangle skipping, alpha inheritance,
//! image mirroring, missing assets, and real pixels from the raster backend.

use stagecraft_core::systems::DrawCommand;
use stagecraft_core::types::ImageTransform;
use stagecraft_core::{
    Actor, Color, Director, DirectorConfig, ImageRegion, Matrix, RasterSurface, RecordingSurface,
    Rect, RenderSurface,
};
use std::rc::Rc;

const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
const GREEN: Color = Color { r: 0.0, g: 1.0, b: 0.0, a: 1.0 };
const BLUE: Color = Color { r: 0.0, g: 0.0, b: 1.0, a: 1.0 };

fn boxed(x: f32, y: f32, color: Color) -> Actor {
    Actor::new().with_bounds(x, y, 10.0, 10.0).with_fill(color)
}

#[test]
fn children_paint_in_z_order_with_balanced_state() {
    let mut director = Director::new(DirectorConfig::new(100, 100));
    let scene = director.create_scene();
    let group = director.graph.add_container(Actor::new().with_bounds(10.0, 10.0, 50.0, 50.0));
    let back = director.graph.add_actor(boxed(0.0, 0.0, RED));
    let front = director.graph.add_actor(boxed(5.0, 5.0, BLUE));
    let top = director.graph.add_actor(boxed(50.0, 50.0, GREEN));
    director.graph.add_child(scene, group).unwrap();
    director.graph.add_child(group, back).unwrap();
    director.graph.add_child(group, front).unwrap();
    director.graph.add_child(scene, top).unwrap();

    let mut surface = RecordingSurface::new();
    director.render(16.0, &mut surface).unwrap();
    assert_eq!(surface.fills(), vec![RED, BLUE, GREEN]);
    assert!(surface.is_balanced());
    assert!(surface
        .commands
        .contains(&DrawCommand::SetTransform(Matrix::translate(15.0, 15.0))));

    director.graph.set_z_order(group, back, 5).unwrap();
    surface.clear_commands();
    director.render(16.0, &mut surface).unwrap();
    assert_eq!(surface.fills(), vec![BLUE, RED, GREEN]);
}

#[test]
fn out_of_frame_actors_are_not_painted() {
    let mut director = Director::new(DirectorConfig::new(100, 100));
    let scene = director.create_scene();
    let early = director.graph.add_actor(boxed(0.0, 0.0, RED).with_frame_time(0.0, 50.0));
    let late = director.graph.add_actor(boxed(0.0, 0.0, BLUE).with_frame_time(100.0, 50.0));
    director.graph.add_child(scene, early).unwrap();
    director.graph.add_child(scene, late).unwrap();

    let mut surface = RecordingSurface::new();
    director.render(10.0, &mut surface).unwrap();
    assert_eq!(surface.fills(), vec![RED]);
    surface.clear_commands();
    director.render(100.0, &mut surface).unwrap();
    assert_eq!(surface.fills(), vec![BLUE]);
}

#[test]
fn dirty_rects_skip_static_actors() {
    let mut config = DirectorConfig::new(100, 100);
    config.dirty_rects = true;
    config.clear_color = Color::WHITE;
    let mut director = Director::new(config);
    let scene = director.create_scene();
    let still = director.graph.add_actor(boxed(80.0, 80.0, RED));
    let mover = director.graph.add_actor(boxed(0.0, 0.0, BLUE));
    director.graph.add_child(scene, still).unwrap();
    director.graph.add_child(scene, mover).unwrap();
    director.graph.add_behavior(
        mover,
        stagecraft_core::Behavior::new(stagecraft_core::behavior::GenericBehavior::property(
            0.0,
            20.0,
            stagecraft_core::types::Property::X,
        ))
        .with_frame_time(0.0, 1000.0),
    );

    let mut surface = RecordingSurface::new();
    director.render(0.0, &mut surface).unwrap();
    assert!(surface.fills().contains(&RED));

    surface.clear_commands();
    director.render(500.0, &mut surface).unwrap();
    let fills = surface.fills();
    assert!(fills.contains(&BLUE));
    assert!(!fills.contains(&RED));
    assert!(surface
        .commands
        .iter()
        .any(|c| matches!(c, DrawCommand::ClearRect { color, .. } if *color == Color::WHITE)));
    assert!(surface.commands.iter().any(|c| matches!(c, DrawCommand::Clip(rects) if !rects.is_empty())));
    assert_eq!(surface.commands.last(), Some(&DrawCommand::ResetClip));
}

#[test]
fn dirty_repaint_leaves_untouched_pixels_alone() {
    let mut config = DirectorConfig::new(100, 20);
    config.dirty_rects = true;
    config.clear_color = Color::BLACK;
    let mut director = Director::new(config);
    let scene = director.create_scene();
    let veil = director.graph.add_actor(
        Actor::new()
            .with_bounds(0.0, 0.0, 100.0, 20.0)
            .with_fill(Color::new(1.0, 1.0, 1.0, 0.5)),
    );
    let mover = director.graph.add_actor(boxed(0.0, 0.0, RED));
    director.graph.add_child(scene, veil).unwrap();
    director.graph.add_child(scene, mover).unwrap();

    let mut surface = RasterSurface::new(100, 20).unwrap();
    director.render(0.0, &mut surface).unwrap();
    let veiled = surface.pixel(80, 15);
    assert_eq!(surface.pixel(2, 5), Some([255, 0, 0, 255]));

    director.graph.actor_mut(mover).unwrap().set_location(5.0, 0.0);
    director.render(10.0, &mut surface).unwrap();
    // Outside the dirty area nothing is blended a second time.
    assert_eq!(surface.pixel(80, 15), veiled);
    assert_eq!(surface.pixel(50, 5), veiled);
    // Inside it the frame matches a full repaint.
    assert_eq!(surface.pixel(2, 5), veiled);
    assert_eq!(surface.pixel(12, 5), Some([255, 0, 0, 255]));
    assert_eq!(surface.pixel(12, 15), veiled);
}

#[test]
fn global_alpha_multiplies_down_the_tree() {
    let mut director = Director::new(DirectorConfig::new(100, 100));
    let scene = director.create_scene();
    let group = director.graph.add_container(Actor::new().with_bounds(0.0, 0.0, 50.0, 50.0));
    let leaf = director.graph.add_actor(boxed(0.0, 0.0, RED));
    director.graph.add_child(scene, group).unwrap();
    director.graph.add_child(group, leaf).unwrap();
    director.graph.actor_mut(group).unwrap().set_alpha(0.5).is_global_alpha = true;
    director.graph.actor_mut(leaf).unwrap().set_alpha(0.5);

    director.animate(0.0);
    assert_eq!(director.graph.actor(leaf).unwrap().frame_alpha(), 0.25);

    director.graph.actor_mut(group).unwrap().is_global_alpha = false;
    director.animate(0.0);
    assert_eq!(director.graph.actor(leaf).unwrap().frame_alpha(), 0.5);
}

#[test]
fn mirrored_images_and_missing_assets() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut director = Director::new(DirectorConfig::new(100, 100));
    let scene = director.create_scene();
    let mut sprite = Actor::new()
        .with_bounds(0.0, 0.0, 20.0, 10.0)
        .with_image(ImageRegion::new("hero", Rect::from_wh(20.0, 10.0)));
    sprite.image_transform = ImageTransform::FlipHorizontal;
    let missing = Actor::new()
        .with_bounds(0.0, 0.0, 5.0, 5.0)
        .with_image(ImageRegion::new("ghost", Rect::from_wh(5.0, 5.0)));
    let sprite = director.graph.add_actor(sprite);
    let missing = director.graph.add_actor(missing);
    let after = director.graph.add_actor(boxed(0.0, 0.0, GREEN));
    for id in [sprite, missing, after] {
        director.graph.add_child(scene, id).unwrap();
    }

    let mut surface = RecordingSurface::with_images(["hero"]);
    director.render(0.0, &mut surface).unwrap();
    assert_eq!(surface.images(), vec!["hero"]);
    assert_eq!(surface.fills(), vec![GREEN]);

    let mut mirror = Matrix::translate(20.0, 0.0);
    mirror.multiply(&Matrix::scale(-1.0, 1.0));
    assert!(surface.commands.contains(&DrawCommand::SetTransform(mirror)));
}

#[test]
fn paint_hooks_replace_leaf_paint() {
    let mut director = Director::new(DirectorConfig::new(100, 100));
    let scene = director.create_scene();
    let mut custom = boxed(0.0, 0.0, RED);
    custom.paint_hook = Some(Rc::new(|actor: &Actor, surface: &mut dyn RenderSurface, _time: f64| {
        surface.fill_rect(Rect::from_wh(actor.width / 2.0, actor.height), GREEN);
    }));
    let id = director.graph.add_actor(custom);
    director.graph.add_child(scene, id).unwrap();

    let mut surface = RecordingSurface::new();
    director.render(0.0, &mut surface).unwrap();
    assert_eq!(surface.fills(), vec![GREEN]);
}

#[test]
fn raster_backend_produces_pixels() {
    let mut director = Director::new(DirectorConfig::new(40, 40));
    let scene = director.create_scene();
    let square = director.graph.add_actor(boxed(10.0, 10.0, RED));
    director.graph.add_child(scene, square).unwrap();
    director
        .graph
        .actor_mut(square)
        .unwrap()
        .set_scale_anchored(2.0, 2.0, 0.0, 0.0);

    let mut surface = RasterSurface::new(40, 40).unwrap();
    director.render(0.0, &mut surface).unwrap();
    assert_eq!(surface.pixel(25, 25), Some([255, 0, 0, 255]));
    assert_eq!(surface.pixel(5, 5), Some([0, 0, 0, 255]));
    assert_eq!(surface.pixel(35, 35), Some([0, 0, 0, 255]));
    assert!(!surface.encode_png().unwrap().is_empty());
}
