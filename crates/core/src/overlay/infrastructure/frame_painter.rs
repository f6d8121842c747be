use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::detection::domain::detection::Detection;
use crate::overlay::domain::panel_layout::{
    first_with_snippet, layout_tip_panel, LineStyle, PanelGeometry,
};
use crate::search::domain::parsed_tip::ParsedTip;
use crate::search::domain::search_result::SearchResult;
use crate::shared::region::FaceRegion;

use super::overlay_font::OverlayFont;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_THICKNESS: i32 = 2;
const LABEL_SCALE: f32 = 14.0;
const LABEL_RAISE: i32 = 5;
const STATUS_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const STATUS_SCALE: f32 = 18.0;
const STATUS_POS: (i32, i32) = (10, 30);
/// Panel opacity in percent.
const PANEL_ALPHA: u16 = 70;

fn line_color(style: LineStyle) -> Rgb<u8> {
    match style {
        LineStyle::Name => Rgb([255, 255, 255]),
        LineStyle::Overview => Rgb([255, 200, 200]),
        LineStyle::TipsHeader => Rgb([200, 255, 255]),
        LineStyle::Tip => Rgb([0, 255, 0]),
    }
}

/// Draws detection boxes, the tips panel and the search status onto frames.
///
/// Without a font, shapes are still drawn and text is skipped.
pub struct FramePainter {
    font: Option<OverlayFont>,
}

impl FramePainter {
    pub fn new(font: Option<OverlayFont>) -> Self {
        if font.is_none() {
            log::warn!("No overlay font available; labels and tips will not be drawn");
        }
        Self { font }
    }

    /// Outlines every detection with its confidence and returns the first
    /// detection's region.
    pub fn draw_detections(&self, image: &mut RgbImage, detections: &[Detection]) -> Option<FaceRegion> {
        let (w, h) = image.dimensions();
        let mut first = None;

        for detection in detections {
            let region = detection.region(0, w, h);
            first.get_or_insert(region);
            draw_box(image, &region);

            if let (Some(font), Some(confidence)) = (&self.font, detection.confidence) {
                font.draw(
                    image,
                    &format!("{confidence:.2}"),
                    region.x1,
                    region.y1 - LABEL_RAISE,
                    LABEL_SCALE,
                    BOX_COLOR,
                );
            }
        }
        first
    }

    /// Blends the tips panel for the first result with a snippet over the
    /// right half of the frame. No-op when there is nothing to show.
    pub fn render_tip_panel(&self, image: &mut RgbImage, results: &[SearchResult]) {
        let Some(result) = first_with_snippet(results) else {
            return;
        };
        let (w, h) = image.dimensions();
        let panel = PanelGeometry::right_half(w, h);
        if panel.width == 0 || h == 0 {
            return;
        }

        let mut overlay = image.clone();
        draw_filled_rect_mut(
            &mut overlay,
            Rect::at(panel.x, 0).of_size(panel.width, h),
            Rgb([0, 0, 0]),
        );

        if let Some(font) = &self.font {
            let tip = ParsedTip::parse(&result.snippet);
            for line in layout_tip_panel(&tip, panel, font) {
                font.draw(
                    &mut overlay,
                    &line.text,
                    line.x,
                    line.y,
                    line.style.scale(),
                    line_color(line.style),
                );
            }
        }

        blend_columns(image, &overlay, panel.x as u32, PANEL_ALPHA);
    }

    /// In-flight search indicator in the top-left corner.
    pub fn draw_status(&self, image: &mut RgbImage, status: &str) {
        let Some(font) = &self.font else {
            return;
        };
        let text = if status.is_empty() {
            "Searching...".to_string()
        } else {
            format!("Searching... {status}")
        };
        font.draw(image, &text, STATUS_POS.0, STATUS_POS.1, STATUS_SCALE, STATUS_COLOR);
    }
}

fn draw_box(image: &mut RgbImage, region: &FaceRegion) {
    for inset in 0..BOX_THICKNESS {
        let width = region.width() - 2 * inset + 1;
        let height = region.height() - 2 * inset + 1;
        if width <= 0 || height <= 0 {
            break;
        }
        let rect = Rect::at(region.x1 + inset, region.y1 + inset).of_size(width as u32, height as u32);
        draw_hollow_rect_mut(image, rect, BOX_COLOR);
    }
}

/// `image = alpha% * overlay + (100 - alpha)% * image` for columns `x >= from_x`.
fn blend_columns(image: &mut RgbImage, overlay: &RgbImage, from_x: u32, alpha: u16) {
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        if x < from_x {
            continue;
        }
        let top = overlay.get_pixel(x, y);
        for c in 0..3 {
            let mixed = alpha * top[c] as u16 + (100 - alpha) * pixel[c] as u16;
            pixel[c] = ((mixed + 50) / 100) as u8;
        }
    }
}
