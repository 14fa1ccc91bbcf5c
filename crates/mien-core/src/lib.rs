//! Facial geometric metrics and composite scoring.
//!
//! Turns a face-mesh landmark set into ten geometric measurements, scores
//! each on a 0–100 scale, aggregates them into a tiered composite and
//! selects explanation and advice text. The pipeline is synchronous and
//! holds no state between calls: identical input yields identical output.

pub mod analyzer;
pub mod composite;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod explain;
pub mod geometry;
pub mod landmarks;
pub mod metrics;
pub mod normalize;
pub mod reference;
pub mod types;

pub use analyzer::Analyzer;
pub use composite::{CompositeScore, Tier};
pub use config::EngineConfig;
pub use error::{AnalysisError, ConfigError};
pub use evaluate::{MetricResult, MetricSummary, Status};
pub use landmarks::{CoordinateSpace, LandmarkPoint, LandmarkSet, LANDMARK_COUNT};
pub use metrics::MetricKind;
pub use types::{AnalysisResult, ImageInfo};
