use crate::units::Pt;

/// Placement rectangle for one label slot on a page, plus the pagination
/// signal for the slot.
///
/// Coordinates follow the PDF convention: origin at the lower-left of the
/// page, y increasing upwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelGeometry {
    pub left: Pt,
    pub bottom: Pt,
    pub right: Pt,
    pub top: Pt,
    /// True exactly when this slot must start a fresh physical page.
    pub on_new_page: bool,
}

impl LabelGeometry {
    /// Derived width; a degenerate rectangle reads as zero rather than a
    /// negative value so the pipeline can detect it and abort.
    pub fn width(&self) -> Pt {
        (self.right - self.left).max(Pt(0.0))
    }

    /// Derived height, clamped to zero like [`LabelGeometry::width`].
    pub fn height(&self) -> Pt {
        (self.top - self.bottom).max(Pt(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_and_height_are_derived() {
        let geometry = LabelGeometry {
            left: Pt(10.0),
            bottom: Pt(20.0),
            right: Pt(110.0),
            top: Pt(60.0),
            on_new_page: false,
        };
        assert_eq!(geometry.width(), Pt(100.0));
        assert_eq!(geometry.height(), Pt(40.0));
    }

    #[test]
    fn degenerate_rectangles_clamp_to_zero() {
        let geometry = LabelGeometry {
            left: Pt(100.0),
            bottom: Pt(50.0),
            right: Pt(10.0),
            top: Pt(20.0),
            on_new_page: false,
        };
        assert_eq!(geometry.width(), Pt(0.0));
        assert_eq!(geometry.height(), Pt(0.0));
    }
}
