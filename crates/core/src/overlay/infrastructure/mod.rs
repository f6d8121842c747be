pub mod frame_painter;
pub mod overlay_font;
