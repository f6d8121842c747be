use std::sync::Arc;
use std::thread;

use crossbeam_channel::Receiver;

use facetips_core::pipeline::identify_face_use_case::IdentifyFaceUseCase;
use facetips_core::search::domain::search_result::SearchResult;
use facetips_core::shared::frame::Frame;

pub enum SearchMessage {
    Status(String),
    Results(Vec<SearchResult>),
    Complete,
}

/// Runs the identity search for one face crop on a background thread.
pub fn spawn(use_case: Arc<IdentifyFaceUseCase>, face: Frame) -> Receiver<SearchMessage> {
    let (tx, rx) = crossbeam_channel::unbounded::<SearchMessage>();

    thread::spawn(move || {
        let tx_status = tx.clone();
        let on_status = move |status: &str| {
            log::info!("{status}");
            let _ = tx_status.send(SearchMessage::Status(status.to_string()));
        };

        let results = use_case.execute(&face, &on_status);
        if !results.is_empty() {
            let _ = tx.send(SearchMessage::Results(results));
        }
        let _ = tx.send(SearchMessage::Complete);
    });

    rx
}
