// THEORY:
// The `pipeline` module is the top-level API of the accent engine. It wires the
// stages together into a single call: analyze the cover, let the gold override
// short-circuit if it fires, otherwise gather proposals from every strategy, rank
// them and fall back when nothing survives. Every accent, whatever its origin, is
// softened by the post-processor before it leaves.
//
// The pipeline owns no per-call state. One `AccentPipeline` can serve any number
// of covers, from any number of threads, and the same bytes always produce the
// same accent.

use crate::core_modules::candidate_ranker::{CandidateRanker, TIE_BREAK_WINDOW};
use crate::core_modules::cover_analyzer::{
    ANALYSIS_MAX_HEIGHT, ANALYSIS_MAX_WIDTH, ANALYSIS_STRIDE, CoverAnalysis, CoverAnalyzer,
};
use crate::core_modules::fallback;
use crate::core_modules::gold_override::{
    GOLD_PROBE_STRIDE, GOLD_SCAN_STRIDE, GOLD_TRIGGER_RATIO, GoldOverrideDetector,
};
use crate::core_modules::pixel::pixel::Hsb;
use crate::core_modules::pixel_access::PixelAccess;
use crate::core_modules::post_processor;
use crate::core_modules::strategies::center_region::CENTER_STRIDE;
use crate::core_modules::strategies::edge::{EDGE_STRIDE, EDGE_THRESHOLD};
use crate::core_modules::strategies::outlier::OUTLIER_STRIDE;
use crate::core_modules::strategies::vibrant::VIBRANT_STRIDE;
use crate::core_modules::strategies::{
    AccentCandidate, AccentStrategy, CandidateSource, default_strategies,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// RGB (1.0, 0.55, 0.26): the accent for covers that cannot be analyzed.
pub const DEFAULT_ACCENT: Hsb = Hsb::new(0.0653, 0.74, 1.0);

/// Tunable strides and thresholds for every stage.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub analysis_max_width: u32,
    pub analysis_max_height: u32,
    pub analysis_stride: u32,
    pub gold_probe_stride: u32,
    /// Fraction of probe samples that must be gold for the override to fire.
    pub gold_trigger_ratio: f32,
    pub gold_scan_stride: u32,
    pub center_stride: u32,
    pub edge_stride: u32,
    /// Normalized edge magnitude a sample must exceed to count as an edge.
    pub edge_threshold: f32,
    pub vibrant_stride: u32,
    pub outlier_stride: u32,
    pub tie_break_window: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            analysis_max_width: ANALYSIS_MAX_WIDTH,
            analysis_max_height: ANALYSIS_MAX_HEIGHT,
            analysis_stride: ANALYSIS_STRIDE,
            gold_probe_stride: GOLD_PROBE_STRIDE,
            gold_trigger_ratio: GOLD_TRIGGER_RATIO,
            gold_scan_stride: GOLD_SCAN_STRIDE,
            center_stride: CENTER_STRIDE,
            edge_stride: EDGE_STRIDE,
            edge_threshold: EDGE_THRESHOLD,
            vibrant_stride: VIBRANT_STRIDE,
            outlier_stride: OUTLIER_STRIDE,
            tie_break_window: TIE_BREAK_WINDOW,
        }
    }
}

/// Where the returned accent came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentOrigin {
    GoldOverride,
    Candidate(CandidateSource),
    Fallback,
    DegenerateInput,
}

impl fmt::Display for AccentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccentOrigin::GoldOverride => f.write_str("gold-override"),
            AccentOrigin::Candidate(source) => write!(f, "candidate:{source}"),
            AccentOrigin::Fallback => f.write_str("fallback"),
            AccentOrigin::DegenerateInput => f.write_str("degenerate-input"),
        }
    }
}

/// The accent together with the evidence that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct AccentReport {
    pub accent: Hsb,
    pub origin: AccentOrigin,
    /// `None` only for degenerate input.
    pub analysis: Option<CoverAnalysis>,
    /// Ranked candidates with their final scores, best first. Empty when the
    /// gold override fired.
    pub candidates: Vec<AccentCandidate>,
}

impl AccentReport {
    pub(crate) fn degenerate() -> Self {
        Self {
            accent: DEFAULT_ACCENT,
            origin: AccentOrigin::DegenerateInput,
            analysis: None,
            candidates: Vec::new(),
        }
    }
}

/// Result of the stages that run before the strategies.
pub(crate) enum Survey {
    Gold(AccentReport),
    Open(CoverAnalysis),
}

pub struct AccentPipeline {
    config: PipelineConfig,
    analyzer: CoverAnalyzer,
    gold: GoldOverrideDetector,
    strategies: Vec<Arc<dyn AccentStrategy>>,
    ranker: CandidateRanker,
}

impl Default for AccentPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl AccentPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let strategies = default_strategies(&config);
        Self::with_strategies(config, strategies)
    }

    /// Builds a pipeline around a custom strategy set. Candidates reach the
    /// ranker in the order of `strategies`.
    pub fn with_strategies(
        config: PipelineConfig,
        strategies: Vec<Arc<dyn AccentStrategy>>,
    ) -> Self {
        Self {
            analyzer: CoverAnalyzer::new(
                config.analysis_max_width,
                config.analysis_max_height,
                config.analysis_stride,
            ),
            gold: GoldOverrideDetector::new(
                config.gold_probe_stride,
                config.gold_trigger_ratio,
                config.gold_scan_stride,
            ),
            ranker: CandidateRanker::new(config.tie_break_window),
            strategies,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The accent for a packed RGBA buffer. Never fails: degenerate buffers
    /// yield `DEFAULT_ACCENT`.
    pub fn extract_accent(&self, rgba: &[u8], width: u32, height: u32) -> Hsb {
        self.extract_from_rgba(rgba, width, height).accent
    }

    pub fn extract_from_rgba(&self, rgba: &[u8], width: u32, height: u32) -> AccentReport {
        match PixelAccess::from_rgba(width, height, rgba) {
            Ok(pixels) => self.generate_report(&pixels),
            Err(error) => {
                debug!(%error, "cover cannot be analyzed, using default accent");
                AccentReport::degenerate()
            }
        }
    }

    pub fn generate_report(&self, pixels: &PixelAccess) -> AccentReport {
        let analysis = match self.survey(pixels) {
            Survey::Gold(report) => return report,
            Survey::Open(analysis) => analysis,
        };

        let candidates: Vec<AccentCandidate> = self
            .strategies
            .iter()
            .flat_map(|strategy| {
                let proposed = strategy.propose(pixels, &analysis);
                trace!(source = %strategy.source(), count = proposed.len(), "strategy proposals");
                proposed
            })
            .collect();

        self.conclude(analysis, candidates)
    }

    pub(crate) fn strategies(&self) -> &[Arc<dyn AccentStrategy>] {
        &self.strategies
    }

    /// Cover analysis followed by the gold override check.
    pub(crate) fn survey(&self, pixels: &PixelAccess) -> Survey {
        let analysis = self.analyzer.analyze(pixels);
        debug!(
            average_brightness = analysis.average_brightness,
            dominant_hue = analysis.dominant_hue,
            average_saturation = analysis.average_saturation,
            high_contrast = analysis.has_high_contrast,
            monochromatic = analysis.is_monochromatic,
            light_blue_gray = analysis.is_light_blue_gray,
            "cover analyzed"
        );

        match self.gold.detect(pixels) {
            Some(gold) => Survey::Gold(AccentReport {
                accent: post_processor::soften(gold),
                origin: AccentOrigin::GoldOverride,
                analysis: Some(analysis),
                candidates: Vec::new(),
            }),
            None => Survey::Open(analysis),
        }
    }

    /// Ranking, selection or fallback, then post-processing.
    pub(crate) fn conclude(
        &self,
        analysis: CoverAnalysis,
        candidates: Vec<AccentCandidate>,
    ) -> AccentReport {
        let ranked = self.ranker.rank(candidates, &analysis);
        let (chosen, origin) = match self.ranker.select(&ranked) {
            Some(winner) => {
                debug!(
                    source = %winner.source,
                    score = winner.score,
                    color = %winner.color.hex(),
                    contenders = ranked.len(),
                    "candidate selected"
                );
                (winner.color, AccentOrigin::Candidate(winner.source))
            }
            None => (fallback::generate(&analysis), AccentOrigin::Fallback),
        };

        AccentReport {
            accent: post_processor::soften(chosen),
            origin,
            analysis: Some(analysis),
            candidates: ranked,
        }
    }
}
