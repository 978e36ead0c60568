// THEORY:
// Strategies are the proposal layer of the engine. Each one looks at the cover
// through a different lens and suggests zero or more scored colors:
//
// - `CenterRegionStrategy`: fixed title and center regions, colors that stand out
//   from the background brightness.
// - `EdgeStrategy`: colors sitting on strong edges (lettering, line art).
// - `VibrantColorStrategy`: the loudest colors anywhere on a coarse copy.
// - `OutlierStrategy`: on very dark or very light covers, the single most
//   extreme pixel of each border and band.
//
// Every strategy implements `AccentStrategy`: a pure function of the pixels and
// the cover analysis. Strategies share nothing mutable, so the pipeline can run
// them in any order or all at once, and the ranker never needs to know which
// strategies exist. Producing no candidates is a normal outcome.

pub mod center_region;
pub mod edge;
pub mod outlier;
pub mod vibrant;

use crate::core_modules::cover_analyzer::CoverAnalysis;
use crate::core_modules::pixel::pixel::Hsb;
use crate::core_modules::pixel_access::PixelAccess;
use crate::pipeline::PipelineConfig;
use std::fmt;
use std::sync::Arc;

pub use center_region::CenterRegionStrategy;
pub use edge::EdgeStrategy;
pub use outlier::OutlierStrategy;
pub use vibrant::VibrantColorStrategy;

/// Which strategy proposed a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    Center,
    Edge,
    Vibrant,
    Outlier,
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CandidateSource::Center => "center",
            CandidateSource::Edge => "edge",
            CandidateSource::Vibrant => "vibrant",
            CandidateSource::Outlier => "outlier",
        };
        f.write_str(name)
    }
}

/// A scored color proposal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccentCandidate {
    pub color: Hsb,
    /// Unbounded; only meaningful relative to other candidates.
    pub score: f32,
    pub source: CandidateSource,
}

impl AccentCandidate {
    pub fn new(color: Hsb, score: f32, source: CandidateSource) -> Self {
        Self {
            color,
            score,
            source,
        }
    }
}

/// A single proposal lens over a cover.
pub trait AccentStrategy: Send + Sync {
    fn source(&self) -> CandidateSource;

    fn propose(&self, pixels: &PixelAccess, analysis: &CoverAnalysis) -> Vec<AccentCandidate>;
}

/// The standard strategy set, in ranking-input order.
pub fn default_strategies(config: &PipelineConfig) -> Vec<Arc<dyn AccentStrategy>> {
    vec![
        Arc::new(CenterRegionStrategy::new(config.center_stride)),
        Arc::new(EdgeStrategy::new(config.edge_stride, config.edge_threshold)),
        Arc::new(VibrantColorStrategy::new(
            config.analysis_max_width,
            config.analysis_max_height,
            config.vibrant_stride,
        )),
        Arc::new(OutlierStrategy::new(config.outlier_stride)),
    ]
}
