use derive_more::{Add, AddAssign, Display, Div, From, Into, Mul, MulAssign, Sub, Sum};

/// A distance in PostScript points (1/72 of an inch). All geometry in the
/// crate is expressed in points; templates convert from the inch/millimetre
/// datasheet values of their physical media at the edge.
#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    Mul,
    MulAssign,
    Div,
    Sum,
    From,
    Into,
    Display,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

pub const PT_PER_INCH: f32 = 72.0;
pub const PT_PER_MM: f32 = 72.0 / 25.4;

impl Pt {
    pub fn from_inches(inches: f32) -> Pt {
        Pt(inches * PT_PER_INCH)
    }

    pub fn from_mm(mm: f32) -> Pt {
        Pt(mm * PT_PER_MM)
    }

    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    /// Clamps to `[low, high]`.
    pub fn clamp(self, low: Pt, high: Pt) -> Pt {
        self.max(low).min(high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn converts_inches_and_millimetres() {
        assert!(approx_eq!(f32, Pt::from_inches(8.5).0, 612.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, Pt::from_mm(25.4).0, 72.0, epsilon = 1e-4));
    }

    #[test]
    fn clamp_orders_bounds() {
        assert_eq!(Pt(10.0).clamp(Pt(20.0), Pt(30.0)), Pt(20.0));
        assert_eq!(Pt(40.0).clamp(Pt(20.0), Pt(30.0)), Pt(30.0));
        assert_eq!(Pt(25.0).clamp(Pt(20.0), Pt(30.0)), Pt(25.0));
    }
}
