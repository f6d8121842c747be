use crate::search::domain::parsed_tip::ParsedTip;
use crate::search::domain::search_result::SearchResult;

use super::text_layout::{fit_to_width, truncate_chars, wrap_words, TextMeasure};

const TOP_Y: i32 = 30;
const TEXT_INSET: i32 = 10;
const BOTTOM_MARGIN: i32 = 10;
const NAME_ADVANCE: i32 = 25;
const LINE_ADVANCE: i32 = 20;
const HEADER_OFFSET: i32 = 5;
const HEADER_ADVANCE: i32 = 25;
const OVERVIEW_WRAP_CHARS: usize = 40;
const TIP_MAX_CHARS: usize = 40;
const TIP_BULLET: &str = "• ";

/// Visual role of a panel line; decides its size and color when drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Name,
    Overview,
    TipsHeader,
    Tip,
}

impl LineStyle {
    pub fn scale(self) -> f32 {
        match self {
            LineStyle::Name => 17.0,
            LineStyle::Overview => 14.0,
            LineStyle::TipsHeader => 15.0,
            LineStyle::Tip => 13.0,
        }
    }
}

/// One positioned line; `y` is the text baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub style: LineStyle,
}

/// The tips panel occupies the right half of the frame, full height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelGeometry {
    pub x: i32,
    pub width: u32,
    pub frame_height: u32,
}

impl PanelGeometry {
    pub fn right_half(frame_width: u32, frame_height: u32) -> Self {
        let width = frame_width / 2;
        Self {
            x: (frame_width - width) as i32,
            width,
            frame_height,
        }
    }

    fn max_text_width(&self) -> u32 {
        self.width.saturating_sub(2 * TEXT_INSET as u32)
    }
}

/// First result whose snippet has any content.
pub fn first_with_snippet(results: &[SearchResult]) -> Option<&SearchResult> {
    results.iter().find(|r| !r.snippet.trim().is_empty())
}

/// Positions the name, wrapped overview, header and tips of one parsed
/// snippet. Lines that would start below `frame_height - 10` are dropped.
pub fn layout_tip_panel(
    tip: &ParsedTip,
    panel: PanelGeometry,
    measure: &dyn TextMeasure,
) -> Vec<PanelLine> {
    let mut cursor = Cursor {
        lines: Vec::new(),
        x: panel.x + TEXT_INSET,
        y: TOP_Y,
        limit: panel.frame_height as i32 - BOTTOM_MARGIN,
        max_width: panel.max_text_width(),
        measure,
    };

    if !cursor.push(&format!("Name: {}", tip.name), LineStyle::Name, 0, NAME_ADVANCE) {
        return cursor.lines;
    }
    for line in wrap_words(&tip.overview, OVERVIEW_WRAP_CHARS) {
        if !cursor.push(&line, LineStyle::Overview, 0, LINE_ADVANCE) {
            return cursor.lines;
        }
    }
    if !cursor.push("Tips:", LineStyle::TipsHeader, HEADER_OFFSET, HEADER_ADVANCE) {
        return cursor.lines;
    }
    for tip in &tip.tips {
        let text = format!("{TIP_BULLET}{}", truncate_chars(tip, TIP_MAX_CHARS));
        if !cursor.push(&text, LineStyle::Tip, 0, LINE_ADVANCE) {
            break;
        }
    }
    cursor.lines
}

struct Cursor<'a> {
    lines: Vec<PanelLine>,
    x: i32,
    y: i32,
    limit: i32,
    max_width: u32,
    measure: &'a dyn TextMeasure,
}

impl Cursor<'_> {
    /// Adds a fitted line at `y + offset` and advances; false once out of room.
    fn push(&mut self, text: &str, style: LineStyle, offset: i32, advance: i32) -> bool {
        if self.y > self.limit {
            return false;
        }
        self.lines.push(PanelLine {
            text: fit_to_width(text, style.scale(), self.max_width, self.measure),
            x: self.x,
            y: self.y + offset,
            style,
        });
        self.y += advance;
        true
    }
}
