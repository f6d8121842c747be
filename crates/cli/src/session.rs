use std::sync::Arc;

use crossbeam_channel::{Receiver, TryRecvError};
use image::RgbImage;

use facetips_core::detection::domain::detection::Predictions;
use facetips_core::detection::infrastructure::fallback_locator::FallbackLocator;
use facetips_core::overlay::infrastructure::frame_painter::FramePainter;
use facetips_core::pipeline::identify_face_use_case::IdentifyFaceUseCase;
use facetips_core::search::domain::search_result::SearchResult;
use facetips_core::shared::frame::Frame;
use facetips_core::shared::region::FACE_CROP_MARGIN;

use crate::workers::detection_worker::{self, DetectionMessage};
use crate::workers::search_worker::{self, SearchMessage};

/// Foreground state of the main loop.
///
/// A task is in flight exactly while its receiver is held. Each receiver is
/// drained once per frame; a disconnected channel also ends the task.
pub struct Session {
    locator: Option<FallbackLocator>,
    use_case: Option<Arc<IdentifyFaceUseCase>>,
    detection_rx: Option<Receiver<DetectionMessage>>,
    search_rx: Option<Receiver<SearchMessage>>,
    predictions: Predictions,
    results: Vec<SearchResult>,
    status: String,
    show_overlay: bool,
}

impl Session {
    /// `use_case` is `None` when search credentials are missing.
    pub fn new(locator: FallbackLocator, use_case: Option<Arc<IdentifyFaceUseCase>>) -> Self {
        Self {
            locator: Some(locator),
            use_case,
            detection_rx: None,
            search_rx: None,
            predictions: Predictions::default(),
            results: Vec::new(),
            status: String::new(),
            show_overlay: false,
        }
    }

    pub fn is_detecting(&self) -> bool {
        self.detection_rx.is_some()
    }

    pub fn is_searching(&self) -> bool {
        self.search_rx.is_some()
    }

    pub fn predictions(&self) -> &Predictions {
        &self.predictions
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn overlay_visible(&self) -> bool {
        self.show_overlay
    }

    /// Starts face location on `frame` unless a run is already in flight.
    pub fn start_detection(&mut self, frame: &Frame) -> bool {
        if self.is_detecting() {
            return false;
        }
        let Some(locator) = self.locator.take() else {
            return false;
        };
        self.detection_rx = Some(detection_worker::spawn(locator, frame.clone()));
        true
    }

    /// Searches the first detected face, grown by the crop margin.
    ///
    /// Ignored while a search runs, when no face is cached or when search
    /// is not configured.
    pub fn trigger_search(&mut self, frame: &Frame) -> bool {
        if self.is_searching() {
            return false;
        }
        let Some(use_case) = self.use_case.clone() else {
            log::warn!("Search is not configured; set the ImgBB and SerpAPI keys");
            return false;
        };
        let Some(face) = self.predictions.primary() else {
            log::info!("No face to search");
            return false;
        };

        let region = face.region(FACE_CROP_MARGIN, frame.width(), frame.height());
        let crop = frame.crop(&region);
        self.show_overlay = true;
        self.status.clear();
        self.search_rx = Some(search_worker::spawn(use_case, crop));
        true
    }

    pub fn toggle_overlay(&mut self) {
        self.show_overlay = !self.show_overlay;
    }

    /// Applies every message that arrived since the last call.
    pub fn poll(&mut self) {
        self.poll_detection();
        self.poll_search();
    }

    fn poll_detection(&mut self) {
        let Some(rx) = self.detection_rx.as_ref() else {
            return;
        };
        let mut finished = false;
        loop {
            match rx.try_recv() {
                Ok(DetectionMessage::Detections(predictions)) => self.predictions = predictions,
                Ok(DetectionMessage::Complete(locator)) => {
                    self.locator = Some(locator);
                    finished = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Detection worker exited without returning the locator");
                    finished = true;
                    break;
                }
            }
        }
        if finished {
            self.detection_rx = None;
        }
    }

    fn poll_search(&mut self) {
        let Some(rx) = self.search_rx.as_ref() else {
            return;
        };
        let mut finished = false;
        loop {
            match rx.try_recv() {
                Ok(SearchMessage::Status(status)) => self.status = status,
                Ok(SearchMessage::Results(results)) => {
                    self.results = results;
                    self.show_overlay = true;
                }
                Ok(SearchMessage::Complete) | Err(TryRecvError::Disconnected) => {
                    finished = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }
        if finished {
            self.search_rx = None;
        }
    }

    /// Draws boxes, then either the search indicator or the tips panel.
    pub fn render(&self, frame: Frame, painter: &FramePainter) -> RgbImage {
        let mut image = frame.into_rgb_image();
        let face = painter.draw_detections(&mut image, &self.predictions.predictions);

        if self.is_searching() {
            painter.draw_status(&mut image, &self.status);
        } else if self.show_overlay && face.is_some() && !self.results.is_empty() {
            painter.render_tip_panel(&mut image, &self.results);
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use facetips_core::detection::domain::detection::Detection;
    use facetips_core::detection::domain::face_locator::FaceLocator;
    use facetips_core::search::domain::image_host::ImageHost;
    use facetips_core::search::domain::page_scraper::PageScraper;
    use facetips_core::search::domain::results_store::ResultsStore;
    use facetips_core::search::domain::reverse_image_search::ReverseImageSearch;
    use facetips_core::search::domain::tip_summarizer::TipSummarizer;
    use facetips_core::video::infrastructure::image_file_writer::ImageFileWriter;

    // --- Stubs ---

    struct FixedLocator(Vec<Detection>);

    impl FaceLocator for FixedLocator {
        fn locate(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Host;
    impl ImageHost for Host {
        fn upload(&self, _jpeg: &[u8]) -> Result<String, Box<dyn std::error::Error>> {
            Ok("https://i.ibb.co/face.jpg".into())
        }
    }

    struct Search;
    impl ReverseImageSearch for Search {
        fn find_pages(&self, _image_url: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
            Ok(vec!["https://a.example/jane".into()])
        }
    }

    struct Scraper;
    impl PageScraper for Scraper {
        fn scrape(&self, _url: &str) -> Result<String, Box<dyn std::error::Error>> {
            Ok("Jane Doe is a marine biologist. ".repeat(10))
        }
    }

    struct Summarizer;
    impl TipSummarizer for Summarizer {
        fn summarize(&self, _text: &str) -> Result<String, Box<dyn std::error::Error>> {
            Ok("Name: Jane Doe\nOverview: Biologist\n- Ask about reefs".into())
        }
    }

    struct NoStore;
    impl ResultsStore for NoStore {
        fn save(&self, _results: &[SearchResult]) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }
    }

    fn use_case() -> Arc<IdentifyFaceUseCase> {
        Arc::new(IdentifyFaceUseCase::new(
            Box::new(ImageFileWriter::default()),
            Box::new(Host),
            Box::new(Search),
            Box::new(Scraper),
            Box::new(Summarizer),
            Box::new(NoStore),
        ))
    }

    fn session(faces: Vec<Detection>) -> Session {
        Session::new(
            FallbackLocator::new(vec![Box::new(FixedLocator(faces))]),
            Some(use_case()),
        )
    }

    fn frame() -> Frame {
        Frame::new(vec![100; 64 * 48 * 3], 64, 48, 0)
    }

    fn face() -> Detection {
        Detection::new(20.0, 20.0, 10.0, 10.0, Some(0.9))
    }

    /// Polls until `done` holds or two seconds pass.
    fn poll_until(session: &mut Session, done: impl Fn(&Session) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !done(session) && Instant::now() < deadline {
            session.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(done(session), "timed out waiting for workers");
    }

    // --- Detection ---

    #[test]
    fn test_detection_caches_predictions_and_returns_locator() {
        let mut s = session(vec![face()]);

        assert!(s.start_detection(&frame()));
        assert!(s.is_detecting());
        poll_until(&mut s, |s| !s.is_detecting());

        assert_eq!(s.predictions().predictions, vec![face()]);
        assert!(s.start_detection(&frame()), "locator handed back for reuse");
    }

    struct PanickingLocator;

    impl FaceLocator for PanickingLocator {
        fn locate(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            panic!("malformed provider response");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_detection_survives_panicking_provider() {
        let mut s = Session::new(
            FallbackLocator::new(vec![Box::new(PanickingLocator)]),
            Some(use_case()),
        );

        assert!(s.start_detection(&frame()));
        poll_until(&mut s, |s| !s.is_detecting());

        assert!(s.predictions().is_empty());
        assert!(s.start_detection(&frame()), "locator returned after the panic");
    }

    #[test]
    fn test_second_detection_ignored_while_in_flight() {
        let mut s = session(vec![]);
        assert!(s.start_detection(&frame()));
        assert!(!s.start_detection(&frame()));
    }

    // --- Search ---

    #[test]
    fn test_search_without_faces_is_ignored() {
        let mut s = session(vec![]);
        assert!(!s.trigger_search(&frame()));
        assert!(!s.is_searching());
    }

    #[test]
    fn test_search_without_configuration_is_ignored() {
        let mut s = Session::new(
            FallbackLocator::new(vec![Box::new(FixedLocator(vec![face()]))]),
            None,
        );
        s.start_detection(&frame());
        poll_until(&mut s, |s| !s.is_detecting());

        assert!(!s.trigger_search(&frame()));
    }

    #[test]
    fn test_search_delivers_results_and_shows_overlay() {
        let mut s = session(vec![face()]);
        s.start_detection(&frame());
        poll_until(&mut s, |s| !s.is_detecting());

        assert!(s.trigger_search(&frame()));
        assert!(!s.trigger_search(&frame()), "only one search at a time");
        poll_until(&mut s, |s| !s.is_searching());

        assert_eq!(s.results().len(), 1);
        assert_eq!(s.results()[0].title, "a.example");
        assert_eq!(s.status(), "Search complete");
        assert!(s.overlay_visible());
    }

    #[test]
    fn test_toggle_overlay() {
        let mut s = session(vec![]);
        assert!(!s.overlay_visible());
        s.toggle_overlay();
        assert!(s.overlay_visible());
        s.toggle_overlay();
        assert!(!s.overlay_visible());
    }

    // --- Rendering ---

    #[test]
    fn test_render_without_state_returns_plain_frame() {
        let s = session(vec![]);
        let painter = FramePainter::new(None);

        let image = s.render(frame(), &painter);

        assert_eq!(image.dimensions(), (64, 48));
        assert_eq!(image.get_pixel(60, 40).0, [100, 100, 100]);
    }

    #[test]
    fn test_render_draws_panel_once_results_arrive() {
        let mut s = session(vec![face()]);
        s.start_detection(&frame());
        poll_until(&mut s, |s| !s.is_detecting());
        s.trigger_search(&frame());
        poll_until(&mut s, |s| !s.is_searching());

        let image = s.render(frame(), &FramePainter::new(None));

        // right half blended toward black: 0.3 * 100
        assert_eq!(image.get_pixel(60, 40).0, [30, 30, 30]);
    }

    #[test]
    fn test_hidden_overlay_not_drawn() {
        let mut s = session(vec![face()]);
        s.start_detection(&frame());
        poll_until(&mut s, |s| !s.is_detecting());
        s.trigger_search(&frame());
        poll_until(&mut s, |s| !s.is_searching());
        s.toggle_overlay();

        let image = s.render(frame(), &FramePainter::new(None));

        assert_eq!(image.get_pixel(60, 40).0, [100, 100, 100]);
    }
}
