pub mod candidate_ranker;
pub mod color_buckets;
pub mod cover_analyzer;
pub mod edge_map;
pub mod fallback;
pub mod gold_override;
pub mod pixel;
pub mod pixel_access;
pub mod post_processor;
pub mod strategies;

#[cfg(test)]
pub(crate) mod test_covers;
