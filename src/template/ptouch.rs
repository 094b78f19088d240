//! Brother P-Touch continuous tape template (18mm TZe cartridges).
//!
//! Tape is the inverse of a sheet grid: the physical label width is derived
//! from the content's measured text, clamped to a printable range, and every
//! label is its own page (one label, one cut). There is no pagination state
//! to carry between calls.

use crate::canvas::Canvas;
use crate::content::{or_fallback, LabelContent};
use crate::font::{FontBinding, FontConfig, FontFace, FontResolver, FontWeight};
use crate::geometry::LabelGeometry;
use crate::qr::QrMatrix;
use crate::textfit::{shrink_to_fit, wrap_to_width_bounded, BoundedWrap, DEFAULT_SHRINK_STEP};
use crate::units::{Pt, PT_PER_MM};
use crate::LabelError;

const TAPE_HEIGHT: Pt = Pt(18.0 * PT_PER_MM);
const MARGIN: Pt = Pt(3.0 * PT_PER_MM);
const QR_GAP: Pt = Pt(1.0 * PT_PER_MM);
const TEXT_GAP: Pt = Pt(1.0 * PT_PER_MM);

const MIN_WIDTH: Pt = Pt(30.0 * PT_PER_MM);
const MAX_WIDTH: Pt = Pt(75.0 * PT_PER_MM);

/// P-Touch heads print at 180dpi.
const DPI: u32 = 180;

const NAME_FLOOR: Pt = Pt(10.0);

#[derive(Debug)]
pub struct TapeTemplate {
    fonts: FontConfig,
}

impl TapeTemplate {
    pub fn new(fonts: &dyn FontResolver) -> Result<TapeTemplate, LabelError> {
        Ok(TapeTemplate {
            fonts: FontConfig {
                title: FontBinding::new(fonts.resolve(FontWeight::SEMI_BOLD)?, Pt(14.0)),
                content: FontBinding::new(fonts.resolve(FontWeight::REGULAR)?, Pt(24.0)),
                label: FontBinding::new(fonts.resolve(FontWeight::REGULAR)?, Pt(12.0)),
            },
        })
    }

    /// Tape width for `content`: margins, the QR square, and the widest of
    /// the candidate text lines measured at their configured sizes, clamped
    /// to the printable range. Text size drives physical size here, the
    /// reverse of the sheet case.
    pub fn compute_width(&self, content: &LabelContent) -> Pt {
        let widest = [
            self.fonts.title.face.measure(&content.display_id, self.fonts.title.size),
            self.fonts.content.face.measure(&content.name, self.fonts.content.size),
            self.fonts.label.face.measure(&content.labels_joined(), self.fonts.label.size),
        ]
        .into_iter()
        .fold(Pt(0.0), Pt::max);

        (MARGIN + TAPE_HEIGHT + QR_GAP + widest + MARGIN).clamp(MIN_WIDTH, MAX_WIDTH)
    }

    /// Every call is a fresh cut of tape. Without content the narrowest
    /// printable label is assumed.
    pub fn next_geometry(&self, content: Option<&LabelContent>) -> LabelGeometry {
        let width = content.map_or(MIN_WIDTH, |c| self.compute_width(c));
        LabelGeometry {
            left: Pt(0.0),
            bottom: Pt(0.0),
            right: width,
            top: TAPE_HEIGHT,
            on_new_page: true,
        }
    }

    pub fn render(&self, content: &LabelContent) -> Result<Vec<u8>, LabelError> {
        let width = self.compute_width(content);
        let mut canvas = Canvas::new(width, TAPE_HEIGHT, DPI)?;

        if !content.url.trim().is_empty() {
            let qr = QrMatrix::encode(content.url.trim())?;
            canvas.draw_qr(&qr, MARGIN, Pt(0.0), TAPE_HEIGHT);
        }

        let text_left = MARGIN + TAPE_HEIGHT + QR_GAP;
        let text_width = width - text_left - MARGIN;

        // Identifier line along the top edge.
        let title = or_fallback(&content.display_id, "N/A");
        let title_face = self.fonts.title.face.as_ref();
        let title_max = self.fonts.title.size;
        let title_size = shrink_to_fit(
            title_face,
            title,
            text_width,
            title_max,
            (title_max / 2.0).max(Pt(6.0)),
            DEFAULT_SHRINK_STEP,
        );
        let title_baseline = TAPE_HEIGHT - title_size;
        canvas.draw_text(text_left, title_baseline, title, title_face, title_size);

        // Name block: up to two lines, shrunk until the block also fits the
        // vertical room under the identifier.
        let name = or_fallback(&content.name, "Unnamed");
        let name_face = self.fonts.content.face.as_ref();
        let available = title_baseline - TEXT_GAP * 2.0;
        let wrap = self.fit_name_block(name, available, text_width);

        let mut baseline = title_baseline - TEXT_GAP - wrap.size;
        for line in &wrap.lines {
            canvas.draw_text(text_left, baseline, line, name_face, wrap.size);
            baseline = baseline - (wrap.size + TEXT_GAP);
        }

        canvas.into_png()
    }

    fn fit_name_block(&self, name: &str, available: Pt, text_width: Pt) -> BoundedWrap {
        let face = self.fonts.content.face.as_ref();
        let mut size = self.fonts.content.size;
        loop {
            let wrap =
                wrap_to_width_bounded(face, name, size, text_width, 2, NAME_FLOOR, DEFAULT_SHRINK_STEP);
            let block = wrap.size * wrap.lines.len().max(1) as f32
                + TEXT_GAP * wrap.lines.len().saturating_sub(1) as f32;
            if block <= available || wrap.size <= NAME_FLOOR {
                return wrap;
            }
            size = (wrap.size - Pt(DEFAULT_SHRINK_STEP)).max(NAME_FLOOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::FixedResolver;
    use float_cmp::approx_eq;

    fn template() -> TapeTemplate {
        TapeTemplate::new(&FixedResolver).unwrap()
    }

    fn content(name: &str) -> LabelContent {
        LabelContent::new("BIN.07", name, "http://inv/item/7")
    }

    #[test]
    fn empty_content_uses_the_narrowest_tape() {
        let t = template();
        assert_eq!(t.compute_width(&LabelContent::default()), MIN_WIDTH);
        let g = t.next_geometry(Some(&LabelContent::default()));
        assert_eq!(g.width(), MIN_WIDTH);
        assert_eq!(g.height(), TAPE_HEIGHT);
    }

    #[test]
    fn width_grows_with_the_longest_line() {
        let t = template();
        let narrow = t.compute_width(&content("Bolts"));
        let wide = t.compute_width(&content("Stainless hex bolts M6"));
        assert!(wide >= narrow);
    }

    #[test]
    fn width_never_leaves_the_printable_range() {
        let t = template();
        let w = t.compute_width(&content(&"x".repeat(400)));
        assert_eq!(w, MAX_WIDTH);
        assert!(t.compute_width(&content("")) >= MIN_WIDTH);
    }

    #[test]
    fn every_label_is_its_own_page() {
        let t = template();
        let c = content("Bolts");
        assert!(t.next_geometry(Some(&c)).on_new_page);
        assert!(t.next_geometry(None).on_new_page);
        assert_eq!(t.next_geometry(None).width(), MIN_WIDTH);
    }

    #[test]
    fn raster_matches_the_computed_geometry() {
        let t = template();
        let c = content("Bolts");
        let png = t.render(&c).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        let scale = DPI as f32 / 72.0;
        let expected_w = (t.compute_width(&c).0 * scale).round() as u32;
        let expected_h = (TAPE_HEIGHT.0 * scale).round() as u32;
        assert_eq!((img.width(), img.height()), (expected_w, expected_h));
    }

    #[test]
    fn rendering_is_deterministic() {
        let t = template();
        let c = content("Stainless hex bolts M6");
        assert_eq!(t.render(&c).unwrap(), t.render(&c).unwrap());
    }

    #[test]
    fn tape_height_is_eighteen_millimetres() {
        assert!(approx_eq!(f32, TAPE_HEIGHT.0, 51.0236, epsilon = 1e-3));
    }
}
