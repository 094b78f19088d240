//! Render printable labels (QR code plus structured text) for physical
//! storage locations and assets onto fixed-geometry media: adhesive sheet
//! grids become a multi-page PDF, continuous tape becomes one PNG per label.
//!
//! The crate is the template engine only. Content acquisition, font file
//! acquisition, and the CLI/web surface are the caller's collaborators: the
//! caller supplies an ordered batch of [LabelContent] and a [FontResolver],
//! picks a [Template] by name, and drives a [render] run.

pub(crate) mod canvas;

mod content;
pub use content::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod geometry;
pub use geometry::*;

pub(crate) mod pdf;

mod pipeline;
pub use pipeline::*;

mod qr;
pub use qr::*;

pub(crate) mod refs;

mod template;
pub use template::{SheetTemplate, TapeTemplate, Template, TemplateOption};

/// Adaptive typography: fit, wrap, and truncate text into fixed zones.
pub mod textfit;

mod units;
pub use units::*;
