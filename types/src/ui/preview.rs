//! Downscaled image previews.

/// A tiny RGB raster, row-major, `width * height` pixels.
///
/// Produced on the preview worker thread and handed to the control thread
/// by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    width: u16,
    height: u16,
    pixels: Vec<[u8; 3]>,
}

impl Preview {
    /// Returns `None` if the pixel buffer does not match the dimensions.
    #[must_use]
    pub fn new(width: u16, height: u16, pixels: Vec<[u8; 3]>) -> Option<Self> {
        (pixels.len() == usize::from(width) * usize::from(height)).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn pixel(&self, x: u16, y: u16) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(usize::from(y) * usize::from(self.width) + usize::from(x))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::Preview;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(Preview::new(2, 2, vec![[0, 0, 0]; 3]).is_none());
    }

    #[test]
    fn pixel_lookup() {
        let preview = Preview::new(2, 1, vec![[1, 2, 3], [4, 5, 6]]).expect("valid");
        assert_eq!(preview.pixel(1, 0), Some([4, 5, 6]));
        assert_eq!(preview.pixel(2, 0), None);
    }
}
