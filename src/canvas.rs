//! Isolated raster drawing surface for a single label.
//!
//! Each label is painted into its own surface sized to the label's own
//! geometry (not the sheet page) and exported as PNG bytes; the render
//! pipeline then composites those rasters onto pages. This isolation lets
//! grid templates and tape templates share one rendering contract.
//!
//! Coordinates are in points with the origin at the lower-left and y
//! increasing upwards (the paged-output convention); the canvas flips into
//! pixel space internally.

use crate::font::{FontFace, OutlineSink};
use crate::qr::QrMatrix;
use crate::units::Pt;
use crate::LabelError;
use std::io::Cursor;
use tiny_skia::{
    FillRule, Paint, PathBuilder, Pixmap, Rect as SkiaRect, Stroke, Transform,
};

/// Converts [OutlineSink] callbacks into a tiny-skia path. Outlines arrive
/// in font design units (y-up); the transform applied at fill time scales
/// them and flips the axis.
struct GlyphPathBuilder {
    builder: PathBuilder,
}

impl GlyphPathBuilder {
    fn new() -> GlyphPathBuilder {
        GlyphPathBuilder {
            builder: PathBuilder::new(),
        }
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineSink for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

pub struct Canvas {
    pixmap: Pixmap,
    /// Pixels per point.
    scale: f32,
    height: Pt,
}

impl Canvas {
    /// Creates a white surface of `width` x `height` points rasterized at
    /// `dpi`.
    pub fn new(width: Pt, height: Pt, dpi: u32) -> Result<Canvas, LabelError> {
        let scale = dpi as f32 / 72.0;
        let width_px = (width.0 * scale).round().max(1.0) as u32;
        let height_px = (height.0 * scale).round().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width_px, height_px).ok_or(LabelError::Raster {
            width: width_px,
            height: height_px,
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        Ok(Canvas {
            pixmap,
            scale,
            height,
        })
    }

    fn black() -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.anti_alias = true;
        paint
    }

    /// Maps a y-up point coordinate to a y-down pixel coordinate.
    fn to_px_y(&self, y: Pt) -> f32 {
        (self.height - y).0 * self.scale
    }

    fn to_px_x(&self, x: Pt) -> f32 {
        x.0 * self.scale
    }

    /// Draws `text` with its baseline at (`x`, `baseline`). Characters the
    /// face has no glyph for take no space, matching the measurement rule.
    pub fn draw_text(&mut self, x: Pt, baseline: Pt, text: &str, face: &dyn FontFace, size: Pt) {
        let glyph_scale = size.0 / face.units_per_em() as f32 * self.scale;
        let base_y = self.to_px_y(baseline);
        let mut pen_x = self.to_px_x(x);
        let paint = Self::black();

        for ch in text.chars() {
            let mut sink = GlyphPathBuilder::new();
            if face.outline_glyph(ch, &mut sink) {
                if let Some(path) = sink.finish() {
                    // scale design units to pixels and flip y to tiny-skia's
                    // y-down frame
                    let transform =
                        Transform::from_row(glyph_scale, 0.0, 0.0, -glyph_scale, pen_x, base_y);
                    self.pixmap
                        .fill_path(&path, &paint, FillRule::Winding, transform, None);
                }
            }
            pen_x += face.glyph_advance(ch).unwrap_or(0) as f32 * glyph_scale;
        }
    }

    /// Draws `text` centered horizontally on `center_x`.
    pub fn draw_text_centered(
        &mut self,
        center_x: Pt,
        baseline: Pt,
        text: &str,
        face: &dyn FontFace,
        size: Pt,
    ) {
        let width = face.measure(text, size);
        self.draw_text(center_x - width / 2.0, baseline, text, face, size);
    }

    pub fn draw_line(&mut self, x1: Pt, y1: Pt, x2: Pt, y2: Pt, line_width: Pt) {
        let mut builder = PathBuilder::new();
        builder.move_to(self.to_px_x(x1), self.to_px_y(y1));
        builder.line_to(self.to_px_x(x2), self.to_px_y(y2));
        let Some(path) = builder.finish() else {
            return;
        };
        let stroke = Stroke {
            width: line_width.0 * self.scale,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &Self::black(), &stroke, Transform::identity(), None);
    }

    /// Strokes a rectangle given its lower-left corner and extent.
    pub fn stroke_rect(&mut self, x: Pt, y: Pt, width: Pt, height: Pt, line_width: Pt) {
        let Some(rect) = SkiaRect::from_xywh(
            self.to_px_x(x),
            self.to_px_y(y + height),
            width.0 * self.scale,
            height.0 * self.scale,
        ) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let stroke = Stroke {
            width: line_width.0 * self.scale,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &Self::black(), &stroke, Transform::identity(), None);
    }

    /// Paints a QR symbol into the square with lower-left corner (`x`, `y`)
    /// and the given side length.
    pub fn draw_qr(&mut self, qr: &QrMatrix, x: Pt, y: Pt, side: Pt) {
        let modules = qr.width();
        if modules == 0 {
            return;
        }
        let left = self.to_px_x(x);
        let top = self.to_px_y(y + side);
        let module_px = side.0 * self.scale / modules as f32;
        let paint = Self::black();

        for row in 0..modules {
            for col in 0..modules {
                if !qr.is_dark(row, col) {
                    continue;
                }
                if let Some(rect) = SkiaRect::from_xywh(
                    left + col as f32 * module_px,
                    top + row as f32 * module_px,
                    module_px,
                    module_px,
                ) {
                    self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                }
            }
        }
    }

    fn to_rgba(self) -> Result<image::RgbaImage, LabelError> {
        let width = self.pixmap.width();
        let height = self.pixmap.height();
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image::RgbaImage::from_raw(width, height, data).ok_or(LabelError::Raster { width, height })
    }

    fn encode_png(rgba: image::RgbaImage) -> Result<Vec<u8>, LabelError> {
        let mut bytes: Vec<u8> = Vec::new();
        image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)?;
        Ok(bytes)
    }

    /// Consumes the surface and returns PNG bytes.
    pub fn into_png(self) -> Result<Vec<u8>, LabelError> {
        Self::encode_png(self.to_rgba()?)
    }

    /// Consumes the surface and returns PNG bytes rotated a quarter turn
    /// counter-clockwise. Vertical-orientation labels are laid out in a
    /// swapped-axis frame and the finished raster is rotated here as a
    /// post-process; rotating glyph runs at draw time is not supported by
    /// the baseline text primitive.
    pub fn into_png_rotated(self) -> Result<Vec<u8>, LabelError> {
        let rgba = self.to_rgba()?;
        Self::encode_png(image::imageops::rotate270(&rgba))
    }
}
