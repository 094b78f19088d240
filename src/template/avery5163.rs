//! Avery 5163 sheet template: US-letter pages of ten 4x2 inch adhesive
//! labels in a 2x5 grid.
//!
//! Pagination is a cycling slot counter; the emitted geometry uses the
//! pre-advance slot index, and `on_new_page` fires exactly when that index
//! wraps to 0. Rendering supports two orientations of the same content:
//! horizontal (QR column + text column) and vertical (stacked sections in a
//! swapped-axis frame, rotated as a raster post-process).

use crate::canvas::Canvas;
use crate::content::{or_fallback, LabelContent};
use crate::font::{FontBinding, FontConfig, FontFace, FontResolver, FontWeight};
use crate::geometry::LabelGeometry;
use crate::qr::QrMatrix;
use crate::template::TemplateOption;
use crate::textfit::{
    ellipsize_block, lines_fitting, shrink_to_fit, wrap_to_width_bounded, DEFAULT_SHRINK_STEP,
};
use crate::units::Pt;
use crate::LabelError;

const PAGE_WIDTH: Pt = Pt(612.0);
const PAGE_HEIGHT: Pt = Pt(792.0);

const LABEL_WIDTH: Pt = Pt(288.0);
const LABEL_HEIGHT: Pt = Pt(144.0);

const COLUMNS: usize = 2;
const ROWS: usize = 5;
const SLOTS: usize = COLUMNS * ROWS;

const MARGIN_LEFT: Pt = Pt(12.24);
const MARGIN_RIGHT: Pt = Pt(12.24);
const MARGIN_TOP: Pt = Pt(36.0);
const MARGIN_BOTTOM: Pt = Pt(36.0);
const COLUMN_GAP: Pt = Pt(11.52);
const ROW_GAP: Pt = Pt(0.0);

/// Padding inside a label, shared by both orientations.
const PADDING: Pt = Pt(7.2);

/// Width of the QR/identifier column in the horizontal layout.
const ID_COLUMN_WIDTH: Pt = Pt(108.0);
const ID_BASELINE: Pt = Pt(10.8);

const DPI: u32 = 300;
const GEOMETRY_TOLERANCE: f32 = 0.1;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    fn parse(value: &str) -> Option<Orientation> {
        match value {
            "horizontal" => Some(Orientation::Horizontal),
            "vertical" => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct SheetTemplate {
    slot_index: usize,
    orientation: Orientation,
    horizontal: HorizontalLayout,
    vertical: VerticalLayout,
}

impl SheetTemplate {
    pub const OPTIONS: &'static [TemplateOption] = &[TemplateOption {
        name: "orientation",
        allowed: &["horizontal", "vertical"],
    }];

    pub fn new(fonts: &dyn FontResolver) -> Result<SheetTemplate, LabelError> {
        check_grid_fills_page()?;
        Ok(SheetTemplate {
            slot_index: 0,
            orientation: Orientation::Horizontal,
            horizontal: HorizontalLayout::new(fonts)?,
            vertical: VerticalLayout::new(fonts)?,
        })
    }

    pub fn page_size(&self) -> (Pt, Pt) {
        (PAGE_WIDTH, PAGE_HEIGHT)
    }

    pub fn reset(&mut self) {
        self.slot_index = 0;
    }

    /// Emits the current slot's placement, then advances the slot counter
    /// modulo the grid size.
    pub fn next_geometry(&mut self) -> LabelGeometry {
        let slot = self.slot_index;
        self.slot_index = (self.slot_index + 1) % SLOTS;

        let row = slot / COLUMNS;
        let column = slot % COLUMNS;

        let left = MARGIN_LEFT + (LABEL_WIDTH + COLUMN_GAP) * column as f32;
        let top = PAGE_HEIGHT - MARGIN_TOP - (LABEL_HEIGHT + ROW_GAP) * row as f32;

        LabelGeometry {
            left,
            bottom: top - LABEL_HEIGHT,
            right: left + LABEL_WIDTH,
            top,
            on_new_page: slot == 0,
        }
    }

    /// Renders one label. A per-label `orientation` override is honored when
    /// it names a known orientation and falls back to the run default
    /// otherwise; only run-level selections are validated strictly.
    pub fn render(&self, content: &LabelContent) -> Result<Vec<u8>, LabelError> {
        let orientation = content
            .option("orientation")
            .and_then(Orientation::parse)
            .unwrap_or(self.orientation);
        match orientation {
            Orientation::Horizontal => self.horizontal.render(content),
            Orientation::Vertical => self.vertical.render(content),
        }
    }

    pub(crate) fn set_option(&mut self, name: &str, value: &str) {
        if name == "orientation" {
            if let Some(orientation) = Orientation::parse(value) {
                self.orientation = orientation;
            }
        }
    }
}

/// The margin/label/gap sums must reproduce the page dimensions, otherwise
/// every label on the sheet prints offset from its adhesive outline.
fn check_grid_fills_page() -> Result<(), LabelError> {
    let width = MARGIN_LEFT
        + LABEL_WIDTH * COLUMNS as f32
        + COLUMN_GAP * (COLUMNS - 1) as f32
        + MARGIN_RIGHT;
    if (width - PAGE_WIDTH).0.abs() > GEOMETRY_TOLERANCE {
        return Err(LabelError::PageGeometryMismatch {
            axis: "width",
            expected: PAGE_WIDTH.0,
            actual: width.0,
        });
    }

    let height = MARGIN_TOP
        + LABEL_HEIGHT * ROWS as f32
        + ROW_GAP * (ROWS - 1) as f32
        + MARGIN_BOTTOM;
    if (height - PAGE_HEIGHT).0.abs() > GEOMETRY_TOLERANCE {
        return Err(LabelError::PageGeometryMismatch {
            axis: "height",
            expected: PAGE_HEIGHT.0,
            actual: height.0,
        });
    }
    Ok(())
}

/// QR + identifier in a left column, name and detail text in the right
/// column.
#[derive(Debug)]
struct HorizontalLayout {
    fonts: FontConfig,
}

impl HorizontalLayout {
    fn new(fonts: &dyn FontResolver) -> Result<HorizontalLayout, LabelError> {
        Ok(HorizontalLayout {
            fonts: FontConfig {
                title: FontBinding::new(fonts.resolve(FontWeight::MEDIUM)?, Pt(22.0)),
                content: FontBinding::new(fonts.resolve(FontWeight::SEMI_BOLD)?, Pt(24.0)),
                label: FontBinding::new(fonts.resolve(FontWeight::MEDIUM)?, Pt(12.0)),
            },
        })
    }

    fn render(&self, content: &LabelContent) -> Result<Vec<u8>, LabelError> {
        let mut canvas = Canvas::new(LABEL_WIDTH, LABEL_HEIGHT, DPI)?;

        // Identifier column: code centered beneath the QR.
        let title = or_fallback(&content.display_id, "N/A");
        let title_face = self.fonts.title.face.as_ref();
        let title_max = self.fonts.title.size;
        let title_size = shrink_to_fit(
            title_face,
            title,
            ID_COLUMN_WIDTH - PADDING * 2.0,
            title_max,
            (title_max / 2.0).max(Pt(8.0)),
            DEFAULT_SHRINK_STEP,
        );
        canvas.draw_text_centered(ID_COLUMN_WIDTH / 2.0, ID_BASELINE, title, title_face, title_size);

        if !content.url.trim().is_empty() {
            let qr = QrMatrix::encode(content.url.trim())?;
            let side = ID_COLUMN_WIDTH - PADDING * 2.0;
            canvas.draw_qr(&qr, PADDING, ID_BASELINE + title_size, side);
        }

        // Column divider and name rule.
        let rule_y = LABEL_HEIGHT * 0.75;
        canvas.draw_line(ID_COLUMN_WIDTH, Pt(0.0), ID_COLUMN_WIDTH, LABEL_HEIGHT, Pt(0.5));
        canvas.draw_line(ID_COLUMN_WIDTH, rule_y, LABEL_WIDTH, rule_y, Pt(0.5));

        // Name zone above the rule.
        let text_left = ID_COLUMN_WIDTH + PADDING;
        let text_width = LABEL_WIDTH - ID_COLUMN_WIDTH - PADDING * 2.0;
        let name = or_fallback(&content.name, "Unnamed");
        let name_face = self.fonts.content.face.as_ref();
        let name_max = self.fonts.content.size;
        let name_size = shrink_to_fit(
            name_face,
            name,
            text_width,
            name_max,
            (name_max / 2.0).max(Pt(6.0)),
            DEFAULT_SHRINK_STEP,
        );
        canvas.draw_text(text_left, rule_y + PADDING, name, name_face, name_size);

        // Detail zone below the rule: emphasized tag list first, then the
        // description, each ellipsized to the vertical room left above the
        // bottom padding.
        let size = self.fonts.label.size;
        let blocks = [
            (content.labels_joined(), self.fonts.content.face.as_ref()),
            (content.description.clone(), self.fonts.label.face.as_ref()),
        ];
        let mut baseline = rule_y - PADDING - size;
        for (text, face) in blocks {
            if text.trim().is_empty() || baseline < PADDING {
                continue;
            }
            let gap = size + PADDING / 2.0;
            let budget = lines_fitting(baseline - PADDING, size, gap);
            for line in ellipsize_block(face, &text, size, text_width, budget) {
                canvas.draw_text(text_left, baseline, &line, face, size);
                baseline = baseline - gap;
            }
            baseline = baseline - PADDING / 2.0;
        }

        canvas.into_png()
    }
}

/// QR on top, then identifier, name, and detail sections reading downwards
/// in a swapped-axis frame; the finished raster is rotated a quarter turn so
/// the label reads sideways on the sheet. Rotating the bitmap rather than
/// the glyph runs keeps text shaping on the fast axis-aligned path.
#[derive(Debug)]
struct VerticalLayout {
    fonts: FontConfig,
}

/// QR side length in the vertical layout: 80% of the label's short edge.
const VERTICAL_QR_SIDE: Pt = Pt(115.2);
const SECTION_GAP: Pt = Pt(7.2);
const LINE_GAP: Pt = Pt(4.32);

impl VerticalLayout {
    fn new(fonts: &dyn FontResolver) -> Result<VerticalLayout, LabelError> {
        Ok(VerticalLayout {
            fonts: FontConfig {
                title: FontBinding::new(fonts.resolve(FontWeight::SEMI_BOLD)?, Pt(20.0)),
                content: FontBinding::new(fonts.resolve(FontWeight::SEMI_BOLD)?, Pt(26.0)),
                label: FontBinding::new(fonts.resolve(FontWeight::MEDIUM)?, Pt(12.0)),
            },
        })
    }

    fn render(&self, content: &LabelContent) -> Result<Vec<u8>, LabelError> {
        // Swapped-axis frame: the label's short edge becomes the frame width.
        let frame_width = LABEL_HEIGHT;
        let frame_height = LABEL_WIDTH;
        let mut canvas = Canvas::new(frame_width, frame_height, DPI)?;

        let center = frame_width / 2.0;
        let text_width = frame_width - PADDING * 2.0;

        // QR section.
        let qr_bottom = frame_height - SECTION_GAP - VERTICAL_QR_SIDE;
        if !content.url.trim().is_empty() {
            let qr = QrMatrix::encode(content.url.trim())?;
            canvas.draw_qr(&qr, center - VERTICAL_QR_SIDE / 2.0, qr_bottom, VERTICAL_QR_SIDE);
        }

        // Identifier beneath the QR.
        let title = or_fallback(&content.display_id, "N/A");
        let title_face = self.fonts.title.face.as_ref();
        let title_max = self.fonts.title.size;
        let title_size = shrink_to_fit(
            title_face,
            title,
            text_width,
            title_max,
            (title_max / 2.0).max(Pt(8.0)),
            DEFAULT_SHRINK_STEP,
        );
        let title_baseline = qr_bottom - SECTION_GAP - title_size;
        canvas.draw_text_centered(center, title_baseline, title, title_face, title_size);

        let rule_y = title_baseline - SECTION_GAP;
        canvas.draw_line(PADDING, rule_y, frame_width - PADDING, rule_y, Pt(0.5));

        // Name: up to two lines, shrunk to fit the cap.
        let name = or_fallback(&content.name, "Unnamed");
        let name_face = self.fonts.content.face.as_ref();
        let name_max = self.fonts.content.size;
        let wrap = wrap_to_width_bounded(
            name_face,
            name,
            name_max,
            text_width,
            2,
            (name_max / 2.0).max(Pt(8.0)),
            DEFAULT_SHRINK_STEP,
        );
        let mut baseline = rule_y - SECTION_GAP - wrap.size;
        for line in &wrap.lines {
            canvas.draw_text_centered(center, baseline, line, name_face, wrap.size);
            baseline = baseline - (name_face.line_height(wrap.size) + LINE_GAP);
        }

        let rule_y = baseline + wrap.size - SECTION_GAP;
        canvas.draw_line(PADDING, rule_y, frame_width - PADDING, rule_y, Pt(0.5));

        // Detail sections: location breadcrumb, description, tag list.
        let detail = self.fonts.label.face.as_ref();
        let size = self.fonts.label.size;
        let mut sections: Vec<(String, usize)> = Vec::new();
        if !content.parent.trim().is_empty() {
            sections.push((format!("Loc: {}", content.parent.trim()), 2));
        }
        if !content.description.trim().is_empty() {
            sections.push((content.description.clone(), 3));
        }
        if !content.labels.is_empty() {
            sections.push((content.labels_joined(), 2));
        }

        let mut baseline = rule_y - SECTION_GAP - size;
        for (text, max_lines) in sections {
            let wrap =
                wrap_to_width_bounded(detail, &text, size, text_width, max_lines, Pt(8.0), DEFAULT_SHRINK_STEP);
            for line in &wrap.lines {
                if baseline < PADDING {
                    break;
                }
                canvas.draw_text_centered(center, baseline, line, detail, wrap.size);
                baseline = baseline - (detail.line_height(wrap.size) + LINE_GAP);
            }
            baseline = baseline - SECTION_GAP;
        }

        canvas.into_png_rotated()
    }
}
