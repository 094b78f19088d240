use crate::{LabelError, Pt};
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use std::collections::HashMap;
use std::sync::Arc;

/// Receiver for glyph outline segments, in font design units (y-up).
///
/// This decouples glyph producers (a parsed TTF face, or a test double) from
/// consumers (the raster canvas), so neither side depends on the other's
/// path representation.
pub trait OutlineSink {
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32);
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32);
    fn close(&mut self);
}

/// A resolved, immutable font: raw metrics in design units plus glyph
/// outlines. Everything the text-fit engine and the canvas need, and nothing
/// about where the font bytes came from; font acquisition belongs to the
/// caller.
pub trait FontFace: Send + Sync {
    fn units_per_em(&self) -> u16;
    fn ascender(&self) -> i16;
    fn descender(&self) -> i16;
    /// Horizontal advance of the glyph for `ch`, in design units. `None`
    /// when the face has no glyph for the character; such characters take no
    /// horizontal space when measured or drawn.
    fn glyph_advance(&self, ch: char) -> Option<u16>;
    /// Emits the outline for `ch` into `sink`. Returns false when the face
    /// has no outline for the character.
    fn outline_glyph(&self, ch: char, sink: &mut dyn OutlineSink) -> bool;

    /// Calculate the width of a given string of text at the given font size.
    /// Ignores newlines and any glyphs not in the font.
    fn measure(&self, text: &str, size: Pt) -> Pt {
        let scaling: Pt = size / self.units_per_em() as f32;
        text.chars()
            .filter_map(|ch| self.glyph_advance(ch))
            .map(|advance| scaling * advance as f32)
            .sum()
    }

    /// Distance from the baseline to the top of the font at the given size.
    fn ascent(&self, size: Pt) -> Pt {
        let scaling: Pt = size / self.units_per_em() as f32;
        scaling * self.ascender() as f32
    }

    /// Distance from the baseline to the bottom of the font at the given
    /// size. Note: this is usually negative.
    fn descent(&self, size: Pt) -> Pt {
        let scaling: Pt = size / self.units_per_em() as f32;
        scaling * self.descender() as f32
    }

    /// Baseline-to-baseline distance at the given size.
    fn line_height(&self, size: Pt) -> Pt {
        self.ascent(size) - self.descent(size)
    }
}

/// A parsed font object. Fonts can be TTF or OTF fonts.
pub struct Font {
    face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error
    /// if the font could not be parsed.
    pub fn load(bytes: Vec<u8>) -> Result<Font, LabelError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }
}

/// Forwards ttf-parser outline callbacks into an [OutlineSink].
struct SinkBridge<'a>(&'a mut dyn OutlineSink);

impl owned_ttf_parser::OutlineBuilder for SinkBridge<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.curve_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

impl FontFace for Font {
    fn units_per_em(&self) -> u16 {
        self.face.as_face_ref().units_per_em()
    }

    fn ascender(&self) -> i16 {
        self.face.as_face_ref().ascender()
    }

    fn descender(&self) -> i16 {
        self.face.as_face_ref().descender()
    }

    fn glyph_advance(&self, ch: char) -> Option<u16> {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .and_then(|gid| face.glyph_hor_advance(gid))
    }

    fn outline_glyph(&self, ch: char, sink: &mut dyn OutlineSink) -> bool {
        let face = self.face.as_face_ref();
        let Some(gid) = face.glyph_index(ch) else {
            return false;
        };
        face.outline_glyph(gid, &mut SinkBridge(sink)).is_some()
    }
}

/// A logical font weight. Numerical values map as in CSS/OpenType:
/// 400 normal, 500 medium, 600 semi-bold, 700 bold.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const REGULAR: FontWeight = FontWeight(400);
    pub const MEDIUM: FontWeight = FontWeight(500);
    pub const SEMI_BOLD: FontWeight = FontWeight(600);
    pub const BOLD: FontWeight = FontWeight(700);
}

/// Supplies a ready-to-use face for a logical weight. Implemented by the
/// font-acquisition collaborator (file cache, embedded bytes, variable-font
/// instancer); templates only declare which weights they need.
pub trait FontResolver {
    fn resolve(&self, weight: FontWeight) -> Result<Arc<dyn FontFace>, LabelError>;
}

impl FontResolver for HashMap<FontWeight, Arc<dyn FontFace>> {
    fn resolve(&self, weight: FontWeight) -> Result<Arc<dyn FontFace>, LabelError> {
        self.get(&weight)
            .cloned()
            .ok_or(LabelError::MissingWeight { weight: weight.0 })
    }
}

/// A face paired with the size a template zone renders it at.
#[derive(Clone)]
pub struct FontBinding {
    pub face: Arc<dyn FontFace>,
    pub size: Pt,
}

impl FontBinding {
    pub fn new(face: Arc<dyn FontFace>, size: Pt) -> FontBinding {
        FontBinding { face, size }
    }
}

impl std::fmt::Debug for FontBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBinding")
            .field("face", &"<dyn FontFace>")
            .field("size", &self.size)
            .finish()
    }
}

/// The three text roles every template renders: a title/identifier zone, a
/// primary content zone, and a small-print zone.
#[derive(Clone, Debug)]
pub struct FontConfig {
    pub title: FontBinding,
    pub content: FontBinding,
    pub label: FontBinding,
}
