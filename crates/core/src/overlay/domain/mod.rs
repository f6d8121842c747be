pub mod panel_layout;
pub mod text_layout;
