use std::collections::HashMap;

/// Textual payload to render into one physical label.
///
/// All string fields are expected to arrive pre-trimmed from the content
/// source; the crate treats an empty string as "absent" and substitutes a
/// display fallback ("N/A", "Unnamed") where a zone requires text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelContent {
    /// Short identifier or code, e.g. `BOX.001`.
    pub display_id: String,
    /// Primary descriptive text.
    pub name: String,
    /// Encoded into the QR code. No QR is drawn when empty.
    pub url: String,
    /// Ancestor/location breadcrumb shown as a context line.
    pub parent: String,
    /// Tag names; joined with ", " for display.
    pub labels: Vec<String>,
    /// Free text; may be long and is wrapped or truncated to fit.
    pub description: String,
    /// Per-label option overrides (e.g. `orientation=vertical`). Keys are
    /// option names defined by the active template.
    pub template_options: HashMap<String, String>,
}

impl LabelContent {
    pub fn new(
        display_id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> LabelContent {
        LabelContent {
            display_id: display_id.into(),
            name: name.into(),
            url: url.into(),
            ..LabelContent::default()
        }
    }

    /// Tag names joined for display, e.g. `"tools, garage"`.
    pub fn labels_joined(&self) -> String {
        self.labels.join(", ")
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.template_options.get(name).map(String::as_str)
    }
}

/// Returns `text` if non-blank, otherwise the fallback.
pub(crate) fn or_fallback<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_labels_for_display() {
        let mut content = LabelContent::new("BOX.001", "Box 1", "http://inv/location/1");
        content.labels = vec!["tools".into(), "garage".into()];
        assert_eq!(content.labels_joined(), "tools, garage");
    }

    #[test]
    fn blank_text_falls_back() {
        assert_eq!(or_fallback("", "N/A"), "N/A");
        assert_eq!(or_fallback("   ", "N/A"), "N/A");
        assert_eq!(or_fallback(" Box ", "N/A"), "Box");
    }
}
