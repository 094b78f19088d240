use thiserror::Error;

/// All errors that the crate can generate.
///
/// Configuration problems (unknown templates, bad option values, page
/// geometry that does not add up) are always raised before any rendering
/// starts; a run never partially applies an invalid configuration. Text that
/// does not fit its zone is *not* an error — the text-fit engine degrades to
/// its floor font size and overflow is accepted.
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("unknown template '{name}'; available templates: {available}")]
    UnknownTemplate { name: String, available: String },

    #[error("invalid value '{value}' for option '{option}'; allowed values: {allowed}")]
    InvalidOptionValue {
        option: String,
        value: String,
        allowed: String,
    },

    #[error("template '{template}' has no option named '{option}'")]
    UnknownOption { option: String, template: String },

    /// The template's margins, label dimensions, and gaps do not sum to the
    /// page dimension. Raised at construction so a misconfigured grid can
    /// never silently misprint a whole sheet.
    #[error("label grid does not fill the page {axis}: expected {expected}pt, computed {actual}pt")]
    PageGeometryMismatch {
        axis: &'static str,
        expected: f32,
        actual: f32,
    },

    /// A template emitted a slot with non-positive width or height. This is
    /// a template bug, not recoverable input; the run aborts.
    #[error("template produced a degenerate label geometry ({width}pt x {height}pt)")]
    DegenerateGeometry { width: f32, height: f32 },

    #[error("option '{option}' is not compatible with template '{template}'")]
    IncompatibleOption {
        option: &'static str,
        template: String,
    },

    #[error("font resolver provided no face for weight {weight}")]
    MissingWeight { weight: u16 },

    #[error("failed to allocate a {width}x{height} raster surface")]
    Raster { width: u32, height: u32 },

    #[error(transparent)]
    /// The QR encoder rejected the payload
    Qr(#[from] qrcode::types::QrError),

    #[error(transparent)]
    /// [image] failed to decode or encode a raster
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),
}
