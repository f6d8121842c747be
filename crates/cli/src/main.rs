mod session;
mod settings;
mod window;
mod workers;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;

use facetips_core::detection::domain::face_locator::FaceLocator;
use facetips_core::detection::infrastructure::cascade_locator::CascadeLocator;
use facetips_core::detection::infrastructure::fallback_locator::FallbackLocator;
use facetips_core::detection::infrastructure::model_resolver::ModelResolver;
use facetips_core::detection::infrastructure::roboflow_locator::{
    RoboflowConfig, RoboflowLocator, RoboflowTarget,
};
use facetips_core::overlay::infrastructure::frame_painter::FramePainter;
use facetips_core::overlay::infrastructure::overlay_font::OverlayFont;
use facetips_core::pipeline::identify_face_use_case::IdentifyFaceUseCase;
use facetips_core::search::infrastructure::http_page_scraper::HttpPageScraper;
use facetips_core::search::infrastructure::imgbb_host::ImgbbHost;
use facetips_core::search::infrastructure::json_results_store::JsonResultsStore;
use facetips_core::search::infrastructure::openai_summarizer::OpenAiSummarizer;
use facetips_core::search::infrastructure::serpapi_search::SerpApiSearch;
use facetips_core::shared::constants::{CASCADE_MODEL_NAME, CASCADE_MODEL_URL};
use facetips_core::video::domain::frame_source::FrameSource;
use facetips_core::video::infrastructure::image_file_writer::ImageFileWriter;
use facetips_core::video::infrastructure::webcam_source::WebcamSource;

use session::Session;
use settings::Settings;
use window::{DisplayWindow, KeyCommand};

const WINDOW_TITLE: &str = "Face Tips";
const BUNDLED_MODELS_DIR: &str = "models";

/// Live webcam face detection with reverse-image socializing tips.
///
/// Keys: R searches the detected face, H toggles the tips panel, Q or Esc quits.
#[derive(Parser)]
#[command(name = "facetips")]
struct Cli {
    /// Camera device index.
    #[arg(long, default_value = "0")]
    camera: u32,

    /// Frame width in pixels (overrides the settings file).
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels (overrides the settings file).
    #[arg(long)]
    height: Option<u32>,

    /// Settings file (default: platform config dir/FaceTips/settings.json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// TrueType font for overlay text.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Where the latest search results are written.
    #[arg(long)]
    results: Option<PathBuf>,

    /// Save the effective settings to the settings file and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = effective_settings(&cli);

    if cli.write_config {
        let path = settings.save(cli.config.as_deref())?;
        println!("Settings written to {}", path.display());
        return Ok(());
    }

    let locator = build_locator(&settings);
    if locator.is_empty() {
        log::warn!("No face locator available; detection is disabled");
    }
    let use_case = build_use_case(&settings);
    let painter = FramePainter::new(OverlayFont::discover(settings.font_path.as_deref()));

    let (width, height) = (settings.frame_width, settings.frame_height);
    let mut camera = WebcamSource::open(cli.camera, width, height)?;
    log::info!("Streaming from {}", camera.name());
    let mut window = DisplayWindow::open(WINDOW_TITLE, width, height)?;
    let mut session = Session::new(locator, use_case);

    run_loop(&mut camera, &mut window, &mut session, &painter);

    remove_temp_frame(&settings.temp_frame_path);
    Ok(())
}

fn effective_settings(cli: &Cli) -> Settings {
    let mut settings =
        Settings::load(cli.config.as_deref()).with_env_overrides(|key| std::env::var(key).ok());
    if let Some(width) = cli.width {
        settings.frame_width = width;
    }
    if let Some(height) = cli.height {
        settings.frame_height = height;
    }
    if let Some(font) = &cli.font {
        settings.font_path = Some(font.clone());
    }
    if let Some(results) = &cli.results {
        settings.results_path = results.clone();
    }
    settings
}

fn run_loop(
    camera: &mut WebcamSource,
    window: &mut DisplayWindow,
    session: &mut Session,
    painter: &FramePainter,
) {
    while window.is_open() {
        let frame = match camera.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                log::error!("Camera read failed: {e}");
                break;
            }
        };

        session.poll();
        session.start_detection(&frame);

        for command in window.commands() {
            match command {
                KeyCommand::Quit => return,
                KeyCommand::TriggerSearch => {
                    session.trigger_search(&frame);
                }
                KeyCommand::ToggleOverlay => session.toggle_overlay(),
            }
        }

        let image = session.render(frame, painter);
        let (w, h) = image.dimensions();
        if let Err(e) = window.show(image.as_raw(), w, h) {
            log::error!("Display update failed: {e}");
            break;
        }
    }
}

/// Remote provider first when configured, then the local classifier.
fn build_locator(settings: &Settings) -> FallbackLocator {
    let mut providers: Vec<Box<dyn FaceLocator>> = Vec::new();

    if settings.remote_detection_enabled() {
        let target = match &settings.detection_workflow {
            Some(wf) => RoboflowTarget::Workflow {
                workspace: wf.workspace.clone(),
                workflow_id: wf.workflow_id.clone(),
            },
            None => RoboflowTarget::Model {
                model_id: settings.detection_model.clone(),
            },
        };
        let config = RoboflowConfig::new(
            &settings.roboflow_api_key,
            target,
            settings.temp_frame_path.clone(),
        );
        providers.push(Box::new(RoboflowLocator::new(config)));
    } else {
        log::info!("Remote detection not configured; using the local classifier only");
    }

    match load_cascade() {
        Ok(cascade) => providers.push(Box::new(cascade)),
        Err(e) => log::warn!("Local face classifier unavailable: {e}"),
    }

    FallbackLocator::new(providers)
}

fn load_cascade() -> Result<CascadeLocator, Box<dyn std::error::Error>> {
    let path = ModelResolver::new()?
        .with_bundled_dir(BUNDLED_MODELS_DIR)
        .resolve(CASCADE_MODEL_NAME, CASCADE_MODEL_URL)?;
    Ok(CascadeLocator::from_file(&path)?)
}

fn build_use_case(settings: &Settings) -> Option<Arc<IdentifyFaceUseCase>> {
    if !settings.search_enabled() {
        log::warn!("ImgBB or SerpAPI key missing; face search is disabled");
        return None;
    }
    if settings.openai_api_key.is_empty() {
        log::warn!("OpenAI key missing; every result will use the generic tips");
    }

    Some(Arc::new(IdentifyFaceUseCase::new(
        Box::new(ImageFileWriter::default()),
        Box::new(ImgbbHost::new(&settings.imgbb_api_key)),
        Box::new(SerpApiSearch::new(&settings.serpapi_api_key)),
        Box::new(HttpPageScraper::new()),
        Box::new(OpenAiSummarizer::new(&settings.openai_api_key).with_model(&settings.openai_model)),
        Box::new(JsonResultsStore::new(settings.results_path.clone())),
    )))
}

fn remove_temp_frame(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("Removed {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove {}: {e}", path.display()),
    }
}
