pub mod detection_worker;
pub mod search_worker;
