pub mod detection;
pub mod face_locator;
