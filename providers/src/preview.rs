//! Wallpaper thumbnails decoded with `image`.

use std::path::Path;

use halo_engine::PreviewDecoder;
use halo_types::ProviderError;
use halo_types::ui::Preview;
use image::imageops::FilterType;

/// Scales images to a fixed raster, cropping to fill.
#[derive(Debug, Clone, Copy)]
pub struct ImagePreviews {
    width: u16,
    height: u16,
}

impl ImagePreviews {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> ProviderError {
    ProviderError::Parse {
        program: "image".to_string(),
        output: format!("{}: {err}", path.display()),
    }
}

impl PreviewDecoder for ImagePreviews {
    fn decode(&self, path: &Path) -> Result<Preview, ProviderError> {
        let image = image::open(path).map_err(|err| decode_error(path, err))?;
        let thumb = image
            .resize_to_fill(u32::from(self.width), u32::from(self.height), FilterType::Triangle)
            .to_rgb8();
        let (width, height) = thumb.dimensions();
        let pixels = thumb.pixels().map(|pixel| pixel.0).collect();
        Preview::new(width as u16, height as u16, pixels)
            .ok_or_else(|| decode_error(path, "thumbnail size mismatch"))
    }
}
