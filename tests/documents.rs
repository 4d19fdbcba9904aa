//! Stage Document Tests
//!
//! JSON documents loaded through an asset loader, built into a stage and
//! rendered with both surfaces.

use anyhow::{anyhow, Result};
use stagecraft::pipeline::{load_document, parse_document};
use stagecraft::{AssetLoader, Color, RasterSurface, Rect, RenderSurface};
use std::collections::HashMap;

#[derive(Default)]
struct MemoryLoader {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    fn with(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_string(), bytes.into());
        self
    }
}

impl AssetLoader for MemoryLoader {
    fn load_bytes(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no such asset: {path}"))
    }
}

fn red_png() -> Vec<u8> {
    let mut s = RasterSurface::new(4, 4).unwrap();
    s.fill_rect(Rect::from_wh(4.0, 4.0), Color::new(1.0, 0.0, 0.0, 1.0));
    s.encode_png().unwrap()
}

const DOC: &str = r##"{
    "width": 40,
    "height": 40,
    "fps": 20,
    "clear_color": { "r": 0.0, "g": 0.0, "b": 1.0, "a": 1.0 },
    "images": [
        { "name": "tile", "src": "tile.png" },
        { "name": "gone", "src": "missing.png" }
    ],
    "scenes": [{
        "actors": [
            { "type": "actor", "x": 10, "y": 10, "width": 4, "height": 4, "image": "tile" },
            { "type": "actor", "x": 30, "y": 30, "width": 4, "height": 4, "image": "gone" },
            { "type": "actor", "name": "fader", "x": 0, "y": 30, "width": 8, "height": 8,
              "fill": "#FFFFFF",
              "behaviors": [{ "type": "alpha", "from": 1, "to": 0, "duration": 100 }] }
        ]
    }]
}"##;

#[test]
fn raster_document_with_images() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let loader = MemoryLoader::default()
        .with("stage.json", DOC)
        .with("tile.png", red_png());
    let mut stage = load_document("stage.json", &loader).unwrap();

    let mut surface = RasterSurface::new(40, 40).unwrap();
    assert_eq!(stage.load_images(&mut surface, &loader), 1);
    assert!(surface.has_image("tile"));
    assert!(!surface.has_image("gone"));

    // 50 ms per frame; the missing image is skipped without failing the frame.
    let stats = stage.step(&mut surface).unwrap();
    assert_eq!(stats.frame, 1);
    assert_eq!(stats.total_actors, 4);
    assert_eq!(surface.pixel(12, 12), Some([255, 0, 0, 255]));
    assert_eq!(surface.pixel(31, 31), Some([0, 0, 255, 255]));

    stage.step(&mut surface).unwrap();
    // The fader has expired at alpha 0, leaving the clear color.
    assert_eq!(surface.pixel(4, 34), Some([0, 0, 255, 255]));
}

#[test]
fn load_errors_carry_the_path() {
    let loader = MemoryLoader::default().with("broken.json", "{ \"scenes\": [ ");
    let err = load_document("broken.json", &loader).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));

    assert!(load_document("absent.json", &loader).is_err());
    assert!(parse_document(r#"{ "scenes": [{ "actors": [{ "type": "sprite" }] }] }"#).is_err());
}

#[test]
fn frame_stats_follow_the_clock() {
    let json = r#"{ "fps": 25, "dirty_rects": true, "scenes": [{ "actors": [
        { "type": "container", "children": [ { "type": "actor", "width": 5, "height": 5 } ] }
    ] }] }"#;
    let stats = stagecraft::render_document(json, 3).unwrap();
    let times: Vec<f64> = stats.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![40.0, 80.0, 120.0]);
    assert!(stats.iter().all(|s| s.total_actors == 3 && s.active_actors == 3));
    let encoded = serde_json::to_value(stats[0]).unwrap();
    assert_eq!(encoded["frame"], 1);
}
