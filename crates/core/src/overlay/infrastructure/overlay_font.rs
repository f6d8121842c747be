use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use thiserror::Error;

use crate::overlay::domain::text_layout::TextMeasure;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a usable TrueType/OpenType font")]
    Invalid(String),
}

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// TrueType font used for every overlay label.
#[derive(Clone)]
pub struct OverlayFont {
    font: FontArc,
}

impl OverlayFont {
    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let bytes = fs::read(path).map_err(|source| FontError::Read {
            path: path.display().to_string(),
            source,
        })?;
        FontArc::try_from_vec(bytes)
            .map(|font| Self { font })
            .map_err(|_| FontError::Invalid(path.display().to_string()))
    }

    /// Tries `preferred` first, then well-known system font locations.
    pub fn discover(preferred: Option<&Path>) -> Option<Self> {
        let candidates = preferred
            .map(Path::to_path_buf)
            .into_iter()
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

        for path in candidates {
            match Self::from_file(&path) {
                Ok(font) => {
                    log::debug!("overlay font: {}", path.display());
                    return Some(font);
                }
                Err(e @ FontError::Invalid(_)) => log::warn!("{e}"),
                Err(FontError::Read { .. }) if preferred == Some(path.as_path()) => {
                    log::warn!("configured font {} not found", path.display());
                }
                Err(_) => {}
            }
        }
        None
    }

    /// Draws `text` with its baseline at `baseline_y`.
    pub fn draw(&self, image: &mut RgbImage, text: &str, x: i32, baseline_y: i32, scale: f32, color: Rgb<u8>) {
        let scale = PxScale::from(scale);
        let ascent = self.font.as_scaled(scale).ascent().round() as i32;
        draw_text_mut(image, color, x, baseline_y - ascent, scale, &self.font, text);
    }
}

impl TextMeasure for OverlayFont {
    fn text_width(&self, text: &str, scale: f32) -> u32 {
        text_size(PxScale::from(scale), &self.font, text).0
    }
}
