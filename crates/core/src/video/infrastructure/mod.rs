pub mod image_file_writer;
pub mod webcam_source;
