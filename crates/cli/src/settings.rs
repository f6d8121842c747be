use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use facetips_core::shared::constants::DEFAULT_OPENAI_MODEL;

/// A named multi-step detection workflow in a Roboflow workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSettings {
    pub workspace: String,
    pub workflow_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub roboflow_api_key: String,
    pub detection_model: String,
    pub detection_workflow: Option<WorkflowSettings>,
    pub imgbb_api_key: String,
    pub serpapi_api_key: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub results_path: PathBuf,
    pub temp_frame_path: PathBuf,
    pub font_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            roboflow_api_key: String::new(),
            detection_model: String::new(),
            detection_workflow: None,
            imgbb_api_key: String::new(),
            serpapi_api_key: String::new(),
            openai_api_key: String::new(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            frame_width: 640,
            frame_height: 480,
            results_path: PathBuf::from("search_results.json"),
            temp_frame_path: PathBuf::from("temp_frame.jpg"),
            font_path: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceTips").join("settings.json"))
    }

    /// Reads `path` (or the default config file), falling back to defaults
    /// when it is missing or unreadable.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).or_else(Self::config_path);
        let Some(path) = path else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed settings {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::config_path)
            .ok_or("No config directory available")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Non-empty API key variables replace the file's values.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fields = [
            ("ROBOFLOW_API_KEY", &mut self.roboflow_api_key),
            ("IMGBB_API_KEY", &mut self.imgbb_api_key),
            ("SERPAPI_API_KEY", &mut self.serpapi_api_key),
            ("OPENAI_API_KEY", &mut self.openai_api_key),
        ];
        for (var, field) in fields {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
        self
    }

    /// Remote detection needs a key plus a model or workflow.
    pub fn remote_detection_enabled(&self) -> bool {
        !self.roboflow_api_key.is_empty()
            && (!self.detection_model.is_empty() || self.detection_workflow.is_some())
    }

    pub fn search_enabled(&self) -> bool {
        !self.imgbb_api_key.is_empty() && !self.serpapi_api_key.is_empty()
    }
}
