// THEORY:
// `ParallelAccentPipeline` runs the same stages as `AccentPipeline`, but spreads
// the strategies over tokio's blocking pool. The cover analysis and the gold
// override still run first, because every strategy reads the analysis.
//
// Strategy results are joined in the fixed strategy order, not in completion
// order, so the ranker sees exactly the candidate list the sequential pipeline
// would have built and both pipelines return the same accent for the same cover.
//
// `extract_many` processes a batch of covers concurrently. A semaphore sized to
// the machine's cores bounds how many covers are in flight at once.

use crate::core_modules::pixel_access::PixelAccess;
use crate::core_modules::strategies::AccentCandidate;
use crate::pipeline::{AccentPipeline, AccentReport, PipelineConfig, Survey};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task;
use tracing::{debug, trace, warn};

#[derive(Clone)]
pub struct ParallelAccentPipeline {
    inner: Arc<AccentPipeline>,
    worker_limit: Arc<Semaphore>,
}

impl Default for ParallelAccentPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl ParallelAccentPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self::from_pipeline(AccentPipeline::new(config))
    }

    pub fn from_pipeline(pipeline: AccentPipeline) -> Self {
        let workers = num_cpus::get().max(1);
        debug!(workers, "parallel accent pipeline ready");
        Self {
            inner: Arc::new(pipeline),
            worker_limit: Arc::new(Semaphore::new(workers)),
        }
    }

    pub async fn extract(&self, pixels: Arc<PixelAccess>) -> AccentReport {
        let survey = {
            let inner = Arc::clone(&self.inner);
            let pixels = Arc::clone(&pixels);
            task::spawn_blocking(move || inner.survey(&pixels)).await
        };
        let analysis = match survey {
            Ok(Survey::Gold(report)) => return report,
            Ok(Survey::Open(analysis)) => analysis,
            Err(error) => {
                warn!(%error, "cover survey task failed, using default accent");
                return AccentReport::degenerate();
            }
        };

        let jobs = self.inner.strategies().iter().map(|strategy| {
            let strategy = Arc::clone(strategy);
            let pixels = Arc::clone(&pixels);
            let source = strategy.source();
            let handle = task::spawn_blocking(move || strategy.propose(&pixels, &analysis));
            async move { (source, handle.await) }
        });

        let mut candidates: Vec<AccentCandidate> = Vec::new();
        for (source, outcome) in join_all(jobs).await {
            match outcome {
                Ok(proposed) => {
                    trace!(%source, count = proposed.len(), "strategy proposals");
                    candidates.extend(proposed);
                }
                Err(error) => {
                    warn!(%source, %error, "strategy task failed, skipping its proposals")
                }
            }
        }

        self.inner.conclude(analysis, candidates)
    }

    /// Like `AccentPipeline::extract_from_rgba`, taking ownership of the buffer.
    pub async fn extract_rgba(&self, rgba: Vec<u8>, width: u32, height: u32) -> AccentReport {
        match PixelAccess::from_rgba(width, height, &rgba) {
            Ok(pixels) => self.extract(Arc::new(pixels)).await,
            Err(error) => {
                debug!(%error, "cover cannot be analyzed, using default accent");
                AccentReport::degenerate()
            }
        }
    }

    /// Reports for every cover, in input order.
    pub async fn extract_many(&self, covers: Vec<PixelAccess>) -> Vec<AccentReport> {
        let jobs = covers.into_iter().map(|cover| async move {
            // The semaphore is never closed, so acquiring cannot fail.
            let _permit = self.worker_limit.acquire().await.ok();
            self.extract(Arc::new(cover)).await
        });
        join_all(jobs).await
    }
}
