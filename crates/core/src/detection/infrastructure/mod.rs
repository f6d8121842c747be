pub mod cascade_locator;
pub mod fallback_locator;
pub mod model_resolver;
pub mod roboflow_locator;
