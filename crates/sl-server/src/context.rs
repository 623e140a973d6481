//! Application context.
//!
//! [`AppContext`] is the central struct shared across all route handlers via
//! Axum state. Everything in it is immutable after startup and cheap to clone.

use std::sync::Arc;

use sl_core::config::Config;
use sl_vision::{AnalysisParams, ObjectDetector, PlaceholderDetector};

use crate::storage::FileStore;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub store: Arc<FileStore>,
    pub detector: Arc<dyn ObjectDetector>,
    pub params: AnalysisParams,
}

impl AppContext {
    /// Build a context from configuration with the placeholder detector.
    pub fn new(config: Config) -> Self {
        Self::with_detector(config, Arc::new(PlaceholderDetector))
    }

    /// Build a context with a specific detector.
    pub fn with_detector(config: Config, detector: Arc<dyn ObjectDetector>) -> Self {
        let store = Arc::new(FileStore::from_config(&config.storage));
        let params = AnalysisParams::from(&config.analysis);
        Self {
            config: Arc::new(config),
            store,
            detector,
            params,
        }
    }
}
