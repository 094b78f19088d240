//! Label templates: one per physical media type.
//!
//! A template couples three things behind one contract: a pagination state
//! machine that yields the next slot's [LabelGeometry], a renderer that
//! paints one [LabelContent] into an isolated raster sized to that slot, and
//! a small schema of enumerated options (validated up front, never silently
//! ignored).
//!
//! The set of media is closed, so templates are a sum type rather than an
//! open trait object: callers match or go through the delegating methods
//! here.

use crate::content::LabelContent;
use crate::font::FontResolver;
use crate::geometry::LabelGeometry;
use crate::LabelError;
use std::collections::HashMap;

pub mod avery5163;
pub mod ptouch;

pub use avery5163::SheetTemplate;
pub use ptouch::TapeTemplate;

/// One entry of a template's option schema.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TemplateOption {
    pub name: &'static str,
    pub allowed: &'static [&'static str],
}

impl TemplateOption {
    pub(crate) fn permits(&self, value: &str) -> bool {
        self.allowed.contains(&value)
    }
}

/// All supported label media.
#[derive(Debug)]
pub enum Template {
    /// Avery 5163: a letter sheet of ten 4x2 inch adhesive labels.
    Avery5163(SheetTemplate),
    /// Brother P-Touch continuous 18mm tape; width derives from content.
    PTouch(TapeTemplate),
}

const AVAILABLE: &[&str] = &["avery5163", "ptouch"];

impl Template {
    /// Looks up a template by its user-facing name. `"5163"` is accepted as
    /// a shorthand for the Avery sheet.
    pub fn by_name(name: &str, fonts: &dyn FontResolver) -> Result<Template, LabelError> {
        match name.to_ascii_lowercase().as_str() {
            "avery5163" | "5163" => Ok(Template::Avery5163(SheetTemplate::new(fonts)?)),
            "ptouch" => Ok(Template::PTouch(TapeTemplate::new(fonts)?)),
            _ => Err(LabelError::UnknownTemplate {
                name: name.to_string(),
                available: AVAILABLE.join(", "),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Template::Avery5163(_) => "avery5163",
            Template::PTouch(_) => "ptouch",
        }
    }

    /// `Some` for fixed-sheet media, `None` for media sized per label.
    pub fn page_size(&self) -> Option<(crate::Pt, crate::Pt)> {
        match self {
            Template::Avery5163(t) => Some(t.page_size()),
            Template::PTouch(_) => None,
        }
    }

    /// Zeroes pagination state. Must run before the first `next_geometry`
    /// of a batch; templates are never shared across concurrent runs.
    pub fn reset(&mut self) {
        match self {
            Template::Avery5163(t) => t.reset(),
            Template::PTouch(_) => {}
        }
    }

    /// Advances one slot and returns its placement. Sheet templates ignore
    /// `content`; tape templates derive the slot width from it.
    pub fn next_geometry(&mut self, content: Option<&LabelContent>) -> LabelGeometry {
        match self {
            Template::Avery5163(t) => t.next_geometry(),
            Template::PTouch(t) => t.next_geometry(content),
        }
    }

    /// Renders one label into its own raster and returns PNG bytes.
    pub fn render(&self, content: &LabelContent) -> Result<Vec<u8>, LabelError> {
        match self {
            Template::Avery5163(t) => t.render(content),
            Template::PTouch(t) => t.render(content),
        }
    }

    pub fn available_options(&self) -> &'static [TemplateOption] {
        match self {
            Template::Avery5163(_) => SheetTemplate::OPTIONS,
            Template::PTouch(_) => &[],
        }
    }

    /// Applies run-level option selections. Unknown names and values outside
    /// the allowed set fail here, before any rendering begins.
    pub fn apply_options(&mut self, selections: &HashMap<String, String>) -> Result<(), LabelError> {
        for (name, value) in selections {
            let option = self
                .available_options()
                .iter()
                .find(|o| o.name == name.as_str())
                .ok_or_else(|| LabelError::UnknownOption {
                    option: name.clone(),
                    template: self.name().to_string(),
                })?;
            if !option.permits(value) {
                return Err(LabelError::InvalidOptionValue {
                    option: name.clone(),
                    value: value.clone(),
                    allowed: option.allowed.join(", "),
                });
            }
            match self {
                Template::Avery5163(t) => t.set_option(option.name, value),
                Template::PTouch(_) => {}
            }
        }
        Ok(())
    }
}
