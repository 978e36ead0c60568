// THEORY:
// This file is the entry point for the `cover_accent` library crate. It exposes
// the accent pipelines and the data they return as the public API; the analyzers,
// strategies and ranking rules live in `core_modules` and can be used piecemeal
// when a caller needs only one stage (for example the cover analysis on its own).
//
// A call flows top to bottom through the modules:
// pixels -> cover analysis -> gold override? -> strategies -> ranker
//        -> (fallback) -> post-processing -> accent

pub mod core_modules;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::cover_analyzer::CoverAnalysis;
pub use core_modules::pixel::pixel::Hsb;
pub use core_modules::pixel_access::{PixelAccess, PixelBufferError};
pub use core_modules::strategies::{AccentCandidate, AccentStrategy, CandidateSource};
pub use parallel_pipeline::ParallelAccentPipeline;
pub use pipeline::{AccentOrigin, AccentPipeline, AccentReport, DEFAULT_ACCENT, PipelineConfig};
