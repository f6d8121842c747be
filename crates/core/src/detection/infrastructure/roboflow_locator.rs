use std::fs;
use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use serde_json::{json, Value};
use thiserror::Error;

use crate::detection::domain::detection::Detection;
use crate::detection::domain::face_locator::FaceLocator;
use crate::shared::constants::ROBOFLOW_API_URL;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::infrastructure::image_file_writer::ImageFileWriter;

#[derive(Error, Debug)]
pub enum RemoteLocateError {
    #[error("inference request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("inference service returned HTTP {0}")]
    Status(u16),
    #[error("inference response has no predictions")]
    MissingPredictions,
    #[error("malformed prediction: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// What the hosted inference service should run on each frame.
#[derive(Clone, Debug, PartialEq)]
pub enum RoboflowTarget {
    /// A single hosted detection model, e.g. `face-detection/3`.
    Model { model_id: String },
    /// A named multi-step workflow inside a workspace.
    Workflow {
        workspace: String,
        workflow_id: String,
    },
}

#[derive(Clone, Debug)]
pub struct RoboflowConfig {
    pub api_url: String,
    pub api_key: String,
    pub target: RoboflowTarget,
    /// JPEG written before every call; overwritten each detection cycle.
    pub payload_path: PathBuf,
}

impl RoboflowConfig {
    pub fn new(api_key: &str, target: RoboflowTarget, payload_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url: ROBOFLOW_API_URL.to_string(),
            api_key: api_key.to_string(),
            target,
            payload_path: payload_path.into(),
        }
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }
}

/// Remote face locator backed by Roboflow hosted inference.
pub struct RoboflowLocator {
    client: reqwest::blocking::Client,
    config: RoboflowConfig,
    writer: ImageFileWriter,
}

impl RoboflowLocator {
    pub fn new(config: RoboflowConfig) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            config,
            writer: ImageFileWriter::default(),
        }
    }

    fn infer(&self, image_b64: String) -> Result<Value, RemoteLocateError> {
        let request = match &self.config.target {
            RoboflowTarget::Model { model_id } => self
                .client
                .post(format!("{}/{}", self.config.api_url, model_id))
                .query(&[("api_key", self.config.api_key.as_str())])
                .header(
                    reqwest::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(image_b64),
            RoboflowTarget::Workflow {
                workspace,
                workflow_id,
            } => self
                .client
                .post(format!(
                    "{}/infer/workflows/{}/{}",
                    self.config.api_url, workspace, workflow_id
                ))
                .json(&json!({
                    "api_key": self.config.api_key,
                    "inputs": { "image": { "type": "base64", "value": image_b64 } },
                })),
        };

        let response = request.send()?;
        if !response.status().is_success() {
            return Err(RemoteLocateError::Status(response.status().as_u16()));
        }
        Ok(response.json()?)
    }
}

impl FaceLocator for RoboflowLocator {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        self.writer.write(&self.config.payload_path, frame)?;
        let payload = fs::read(&self.config.payload_path)?;

        let body = self.infer(B64.encode(payload))?;
        let detections = match self.config.target {
            RoboflowTarget::Model { .. } => parse_predictions(&body)?,
            RoboflowTarget::Workflow { .. } => parse_workflow_outputs(&body)?,
        };
        log::debug!("{}: {} face(s)", self.name(), detections.len());
        Ok(detections)
    }

    fn name(&self) -> &str {
        "roboflow"
    }
}

/// Parses a single-model response: `{"predictions": [...]}`.
pub fn parse_predictions(body: &Value) -> Result<Vec<Detection>, RemoteLocateError> {
    let list = body
        .get("predictions")
        .filter(|v| v.is_array())
        .ok_or(RemoteLocateError::MissingPredictions)?;
    let detections: Vec<Detection> = serde_json::from_value(list.clone())?;
    Ok(detections.into_iter().map(Detection::sanitized).collect())
}

/// Parses a workflow response: the first `predictions` array nested
/// anywhere under `outputs`.
pub fn parse_workflow_outputs(body: &Value) -> Result<Vec<Detection>, RemoteLocateError> {
    let outputs = body
        .get("outputs")
        .ok_or(RemoteLocateError::MissingPredictions)?;
    let list = find_prediction_array(outputs).ok_or(RemoteLocateError::MissingPredictions)?;
    let detections: Vec<Detection> = serde_json::from_value(list.clone())?;
    Ok(detections.into_iter().map(Detection::sanitized).collect())
}

fn find_prediction_array(value: &Value) -> Option<&Value> {
    match value {
        Value::Object(map) => {
            if let Some(list @ Value::Array(_)) = map.get("predictions") {
                return Some(list);
            }
            map.values().find_map(find_prediction_array)
        }
        Value::Array(items) => items.iter().find_map(find_prediction_array),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn frame() -> Frame {
        Frame::new(vec![90u8; 64 * 48 * 3], 64, 48, 0)
    }

    fn locator(server: &mockito::Server, target: RoboflowTarget, dir: &tempfile::TempDir) -> RoboflowLocator {
        let config = RoboflowConfig::new("secret", target, dir.path().join("temp_frame.jpg"))
            .with_api_url(&server.url());
        RoboflowLocator::new(config)
    }

    fn model() -> RoboflowTarget {
        RoboflowTarget::Model {
            model_id: "faces/2".into(),
        }
    }

    // ── Single model ─────────────────────────────────────────────────

    #[test]
    fn test_model_call_returns_predictions() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/faces/2")
            .match_query(Matcher::UrlEncoded("api_key".into(), "secret".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"predictions":[{"x":100,"y":100,"width":50,"height":50,"confidence":0.95,"class":"face"}]}"#,
            )
            .create();
        let dir = tempfile::tempdir().unwrap();
        let mut loc = locator(&server, model(), &dir);

        let detections = loc.locate(&frame()).unwrap();

        mock.assert();
        assert_eq!(detections, vec![Detection::new(100.0, 100.0, 50.0, 50.0, Some(0.95))]);
    }

    #[test]
    fn test_payload_file_is_written() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/faces/2")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"predictions":[]}"#)
            .create();
        let dir = tempfile::tempdir().unwrap();
        let mut loc = locator(&server, model(), &dir);

        loc.locate(&frame()).unwrap();

        let payload = std::fs::read(dir.path().join("temp_frame.jpg")).unwrap();
        assert_eq!(&payload[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_response_without_predictions_is_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/faces/2")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message":"model not found"}"#)
            .create();
        let dir = tempfile::tempdir().unwrap();
        let mut loc = locator(&server, model(), &dir);

        let err = loc.locate(&frame()).unwrap_err();
        assert!(err.to_string().contains("no predictions"), "{err}");
    }

    #[test]
    fn test_http_error_status_is_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/faces/2")
            .match_query(Matcher::Any)
            .with_status(403)
            .create();
        let dir = tempfile::tempdir().unwrap();
        let mut loc = locator(&server, model(), &dir);

        let err = loc.locate(&frame()).unwrap_err();
        assert!(err.to_string().contains("403"), "{err}");
    }

    // ── Workflow ─────────────────────────────────────────────────────

    #[test]
    fn test_workflow_call_posts_json_and_finds_nested_predictions() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/infer/workflows/acme/find-faces")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "api_key": "secret",
                "inputs": { "image": { "type": "base64" } }
            })))
            .with_status(200)
            .with_body(
                r#"{"outputs":[{"predictions":{"image":{"width":64,"height":48},
                    "predictions":[{"x":10,"y":12,"width":8,"height":9,"confidence":0.7}]}}]}"#,
            )
            .create();
        let dir = tempfile::tempdir().unwrap();
        let target = RoboflowTarget::Workflow {
            workspace: "acme".into(),
            workflow_id: "find-faces".into(),
        };
        let mut loc = locator(&server, target, &dir);

        let detections = loc.locate(&frame()).unwrap();

        mock.assert();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].confidence, Some(0.7));
    }

    #[test]
    fn test_workflow_without_predictions_is_error() {
        let body = serde_json::json!({ "outputs": [{ "count": 0 }] });
        assert!(matches!(
            parse_workflow_outputs(&body),
            Err(RemoteLocateError::MissingPredictions)
        ));
    }

    #[test]
    fn test_parse_predictions_rejects_non_array() {
        let body = serde_json::json!({ "predictions": "none" });
        assert!(matches!(
            parse_predictions(&body),
            Err(RemoteLocateError::MissingPredictions)
        ));
    }

    #[test]
    fn test_parse_predictions_rejects_malformed_entries() {
        let body = serde_json::json!({ "predictions": [{ "x": "left" }] });
        assert!(matches!(
            parse_predictions(&body),
            Err(RemoteLocateError::Malformed(_))
        ));
    }
}
