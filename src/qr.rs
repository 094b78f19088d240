use crate::LabelError;
use qrcode::{Color, QrCode};

/// An encoded QR symbol as a square grid of dark/light modules, with no
/// quiet zone: labels are small and their own padding serves as the quiet
/// zone, matching how the physical sheets are laid out.
pub struct QrMatrix {
    width: usize,
    modules: Vec<Color>,
}

impl QrMatrix {
    /// Encode `data` (typically the label's URL) at the smallest version
    /// that holds it.
    pub fn encode(data: &str) -> Result<QrMatrix, LabelError> {
        let code = QrCode::new(data.as_bytes())?;
        Ok(QrMatrix {
            width: code.width(),
            modules: code.to_colors(),
        })
    }

    /// Modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        self.modules[row * self.width + col] == Color::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_url() {
        let qr = QrMatrix::encode("http://inventory.local/location/abc-123").unwrap();
        assert!(qr.width() >= 21);
        // the finder pattern corner is always dark
        assert!(qr.is_dark(0, 0));
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = QrMatrix::encode("http://inventory.local/item/1").unwrap();
        let b = QrMatrix::encode("http://inventory.local/item/1").unwrap();
        assert_eq!(a.width(), b.width());
        for row in 0..a.width() {
            for col in 0..a.width() {
                assert_eq!(a.is_dark(row, col), b.is_dark(row, col));
            }
        }
    }
}
