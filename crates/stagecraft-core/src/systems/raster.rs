//! Software raster backend over a `tiny_skia::Pixmap`.

use crate::errors::RenderError;
use crate::AssetLoader;
use crate::matrix::Matrix;
use crate::systems::renderer::RenderSurface;
use crate::types::{Color, Rect};
use std::collections::HashMap;
use std::path::Path;
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, Mask, Paint, PathBuilder, Pattern, Pixmap, SpreadMode,
    Transform,
};
use tracing::debug;

fn to_transform(m: &Matrix) -> Transform {
    Transform::from_row(m.m[0], m.m[3], m.m[1], m.m[4], m.m[2], m.m[5])
}

fn to_skia_rect(r: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(r.x, r.y, r.width, r.height)
}

/// Renders into an owned RGBA pixmap.
pub struct RasterSurface {
    pixmap: Pixmap,
    images: HashMap<String, Pixmap>,
    transform: Transform,
    alpha: f32,
    stack: Vec<(Transform, f32)>,
    clip: Option<Mask>,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("images", &self.images.len())
            .finish()
    }
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::SurfaceFailure)?;
        Ok(Self {
            pixmap,
            images: HashMap::new(),
            transform: Transform::identity(),
            alpha: 1.0,
            stack: Vec::new(),
            clip: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn insert_image(&mut self, name: impl Into<String>, image: Pixmap) {
        self.images.insert(name.into(), image);
    }

    /// Decodes a PNG file and registers it under `name`.
    pub fn load_image(&mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        let image = Pixmap::load_png(path).map_err(|e| RenderError::Raster(format!("{}: {e}", path.display())))?;
        let name = name.into();
        debug!(image = %name, path = %path.display(), "image loaded");
        self.images.insert(name, image);
        Ok(())
    }

    /// Fetches PNG bytes through `loader` and registers them under `name`.
    pub fn load_image_with(
        &mut self,
        loader: &dyn AssetLoader,
        name: impl Into<String>,
        path: &str,
    ) -> Result<(), RenderError> {
        let bytes = loader.load_bytes(path)?;
        let image = Pixmap::decode_png(&bytes).map_err(|e| RenderError::Raster(format!("{path}: {e}")))?;
        let name = name.into();
        debug!(image = %name, path, "image loaded");
        self.images.insert(name, image);
        Ok(())
    }

    pub fn has_image(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Unpremultiplied RGBA at a pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap.encode_png().map_err(|e| RenderError::Raster(e.to_string()))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.pixmap.save_png(path).map_err(|e| RenderError::Raster(e.to_string()))
    }
}

impl RenderSurface for RasterSurface {
    fn save(&mut self) {
        self.stack.push((self.transform, self.alpha));
    }

    fn restore(&mut self) {
        if let Some((transform, alpha)) = self.stack.pop() {
            self.transform = transform;
            self.alpha = alpha;
        }
    }

    fn set_transform(&mut self, matrix: &Matrix) {
        self.transform = to_transform(matrix);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(r) = to_skia_rect(rect) else {
            return;
        };
        let [red, green, blue, alpha] = color.with_alpha_factor(self.alpha).to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(red, green, blue, alpha);
        paint.anti_alias = true;
        self.pixmap.fill_rect(r, &paint, self.transform, self.clip.as_ref());
    }

    fn draw_image(&mut self, image: &str, src: Rect, dst: Rect) -> Result<(), RenderError> {
        let source = self
            .images
            .get(image)
            .ok_or_else(|| RenderError::AssetNotFound(image.to_string()))?;
        let (Some(target), false) = (to_skia_rect(dst), src.is_empty()) else {
            return Ok(());
        };
        let pattern_transform = Transform::from_translate(dst.x, dst.y)
            .pre_scale(dst.width / src.width, dst.height / src.height)
            .pre_translate(-src.x, -src.y);
        let paint = Paint {
            shader: Pattern::new(
                source.as_ref(),
                SpreadMode::Pad,
                FilterQuality::Bilinear,
                self.alpha,
                pattern_transform,
            ),
            anti_alias: true,
            ..Default::default()
        };
        self.pixmap.fill_rect(target, &paint, self.transform, self.clip.as_ref());
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba8();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    fn clear_rect(&mut self, rect: Rect, color: Color) {
        let Some(r) = to_skia_rect(rect) else {
            return;
        };
        let [red, green, blue, alpha] = color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(red, green, blue, alpha);
        paint.blend_mode = BlendMode::Source;
        self.pixmap.fill_rect(r, &paint, Transform::identity(), self.clip.as_ref());
    }

    fn clip_rects(&mut self, rects: &[Rect]) {
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        for r in rects.iter().filter_map(|r| to_skia_rect(*r)) {
            let path = PathBuilder::from_rect(r);
            mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
        }
        self.clip = Some(mask);
    }

    fn reset_clip(&mut self) {
        self.clip = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_respects_transform_and_alpha() {
        let mut s = RasterSurface::new(20, 20).unwrap();
        s.clear(Color::BLACK);
        s.set_transform(&Matrix::translate(10.0, 10.0));
        s.fill_rect(Rect::from_wh(5.0, 5.0), Color::WHITE);
        assert_eq!(s.pixel(12, 12), Some([255, 255, 255, 255]));
        assert_eq!(s.pixel(2, 2), Some([0, 0, 0, 255]));

        s.set_global_alpha(0.0);
        s.fill_rect(Rect::from_wh(5.0, 5.0), Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(s.pixel(12, 12), Some([255, 255, 255, 255]));
    }

    #[test]
    fn save_restore_round_trips_state() {
        let mut s = RasterSurface::new(4, 4).unwrap();
        s.save();
        s.set_transform(&Matrix::translate(100.0, 0.0));
        s.set_global_alpha(0.2);
        s.restore();
        s.fill_rect(Rect::from_wh(4.0, 4.0), Color::WHITE);
        assert_eq!(s.pixel(1, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn clip_confines_fills_to_the_rects() {
        let mut s = RasterSurface::new(20, 10).unwrap();
        s.clear(Color::BLACK);
        s.clip_rects(&[Rect::new(0.0, 0.0, 5.0, 10.0), Rect::new(15.0, 0.0, 5.0, 10.0)]);
        s.fill_rect(Rect::from_wh(20.0, 10.0), Color::WHITE);
        assert_eq!(s.pixel(2, 5), Some([255, 255, 255, 255]));
        assert_eq!(s.pixel(10, 5), Some([0, 0, 0, 255]));
        assert_eq!(s.pixel(17, 5), Some([255, 255, 255, 255]));

        s.reset_clip();
        s.clear_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::TRANSPARENT);
        assert_eq!(s.pixel(2, 5), Some([0, 0, 0, 0]));
        assert_eq!(s.pixel(17, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn missing_image_is_reported() {
        let mut s = RasterSurface::new(4, 4).unwrap();
        let err = s.draw_image("ghost", Rect::from_wh(1.0, 1.0), Rect::from_wh(1.0, 1.0));
        assert!(matches!(err, Err(RenderError::AssetNotFound(_))));
    }

    #[test]
    fn image_blit_copies_pixels() {
        let mut s = RasterSurface::new(8, 8).unwrap();
        let mut sprite = Pixmap::new(2, 2).unwrap();
        sprite.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        s.insert_image("blue", sprite);
        s.draw_image("blue", Rect::from_wh(2.0, 2.0), Rect::new(2.0, 2.0, 4.0, 4.0))
            .unwrap();
        assert_eq!(s.pixel(4, 4), Some([0, 0, 255, 255]));
        assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    struct MemoryLoader(Vec<u8>);

    impl AssetLoader for MemoryLoader {
        fn load_bytes(&self, path: &str) -> anyhow::Result<Vec<u8>> {
            match path {
                "sprite.png" => Ok(self.0.clone()),
                other => anyhow::bail!("no asset {other}"),
            }
        }
    }

    #[test]
    fn loader_feeds_the_image_table() {
        let mut sprite = Pixmap::new(2, 2).unwrap();
        sprite.fill(tiny_skia::Color::from_rgba8(0, 255, 0, 255));
        let loader = MemoryLoader(sprite.encode_png().unwrap());
        let mut s = RasterSurface::new(4, 4).unwrap();
        s.load_image_with(&loader, "green", "sprite.png").unwrap();
        assert!(s.has_image("green"));
        let err = s.load_image_with(&loader, "other", "missing.png");
        assert!(matches!(err, Err(RenderError::Anyhow(_))));
    }
}
