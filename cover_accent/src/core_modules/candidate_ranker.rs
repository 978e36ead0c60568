// THEORY:
// The `CandidateRanker` is the decision layer. Strategies score candidates in
// isolation; the ranker re-scores all of them against the cover as a whole and
// picks one.
//
// Algorithm steps:
// 1.  **Background echo filter**: a candidate whose luma and saturation match the
//     cover averages, and whose hue is the cover's dominant hue (or which has no
//     hue to speak of), is the background itself. It is dropped before scoring.
// 2.  **Re-scoring**: a fixed sequence of bonuses and penalties rewards gold,
//     contrast with the cover, strong saturation and the lenses that find
//     intentional design (edges, center regions). The classification of the cover
//     (light blue-gray, monochrome, colorful) selects which adjustments apply.
// 3.  **Ordering**: candidates are sorted by final score, highest first. The sort is
//     stable, so equal scores keep strategy order.
// 4.  **Tie-break**: every candidate within a small window of the best score is a
//     contender; the most saturated contender wins.

use crate::core_modules::cover_analyzer::CoverAnalysis;
use crate::core_modules::gold_override::{GOLD_HUE_HIGH, GOLD_HUE_LOW};
use crate::core_modules::pixel::pixel::{Hsb, hue_distance};
use crate::core_modules::strategies::{AccentCandidate, CandidateSource};

pub const TIE_BREAK_WINDOW: f32 = 0.2;

const GOLD_MIN_SATURATION: f32 = 0.3;
const GOLD_MIN_BRIGHTNESS: f32 = 0.4;
const GOLD_BONUS: f32 = 1.5;

const CONTRAST_BRIGHT_CANDIDATE: f32 = 0.6;
const CONTRAST_DARK_CANDIDATE: f32 = 0.4;
const CONTRAST_BONUS: f32 = 0.5;

const VIVID_SATURATION: f32 = 0.7;
const VIVID_BONUS: f32 = 0.3;

const BLUE_HUE_LOW: f32 = 0.5;
const BLUE_HUE_HIGH: f32 = 0.75;
const BLUE_GRAY_INK_BONUS: f32 = 1.0;
const BLUE_GRAY_MATCH_MAX_SATURATION: f32 = 0.3;
const BLUE_GRAY_MATCH_MIN_BRIGHTNESS: f32 = 0.5;
const BLUE_GRAY_MATCH_PENALTY: f32 = 0.3;

const MONOCHROME_BLUE_BONUS: f32 = 0.5;
const MONOCHROME_NEUTRAL_SATURATION: f32 = 0.15;
const MONOCHROME_NEUTRAL_BONUS: f32 = 0.3;

const DOMINANT_HUE_WINDOW: f32 = 0.1;
const DOMINANT_HUE_PENALTY: f32 = 0.8;

const EDGE_SOURCE_BONUS: f32 = 1.0;
const CENTER_SOURCE_BONUS: f32 = 0.8;

const ECHO_MAX_LUMA_DIFFERENCE: f32 = 0.1;
const ECHO_MAX_SATURATION_DIFFERENCE: f32 = 0.1;
const ECHO_NEUTRAL_SATURATION: f32 = 0.15;
const ECHO_HUE_WINDOW: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct CandidateRanker {
    tie_break_window: f32,
}

impl Default for CandidateRanker {
    fn default() -> Self {
        Self::new(TIE_BREAK_WINDOW)
    }
}

impl CandidateRanker {
    pub fn new(tie_break_window: f32) -> Self {
        Self { tie_break_window }
    }

    /// Filters, re-scores and sorts the candidates, best first.
    pub fn rank(
        &self,
        candidates: Vec<AccentCandidate>,
        analysis: &CoverAnalysis,
    ) -> Vec<AccentCandidate> {
        let mut ranked: Vec<AccentCandidate> = candidates
            .into_iter()
            .filter(|candidate| !echoes_background(&candidate.color, analysis))
            .map(|candidate| AccentCandidate {
                score: adjusted_score(&candidate, analysis),
                ..candidate
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// The most saturated candidate within the tie-break window of the top score.
    /// Expects `ranked` to be sorted best first.
    pub fn select(&self, ranked: &[AccentCandidate]) -> Option<AccentCandidate> {
        let top_score = ranked.first()?.score;
        let mut winner = ranked[0];
        for candidate in ranked
            .iter()
            .skip(1)
            .take_while(|candidate| top_score - candidate.score <= self.tie_break_window)
        {
            if candidate.color.saturation > winner.color.saturation {
                winner = *candidate;
            }
        }
        Some(winner)
    }
}

/// True when the color is indistinguishable from the cover's own background.
pub fn echoes_background(color: &Hsb, analysis: &CoverAnalysis) -> bool {
    let same_tone = (color.luma() - analysis.average_brightness).abs() < ECHO_MAX_LUMA_DIFFERENCE
        && (color.saturation - analysis.average_saturation).abs() < ECHO_MAX_SATURATION_DIFFERENCE;
    let same_hue = color.saturation < ECHO_NEUTRAL_SATURATION
        || hue_distance(color.hue, analysis.dominant_hue) < ECHO_HUE_WINDOW;
    same_tone && same_hue
}

/// The candidate's strategy score after cover-aware adjustments.
pub fn adjusted_score(candidate: &AccentCandidate, analysis: &CoverAnalysis) -> f32 {
    let color = &candidate.color;
    let mut score = candidate.score;

    let is_gold = color.hue_in(GOLD_HUE_LOW, GOLD_HUE_HIGH)
        && color.saturation > GOLD_MIN_SATURATION
        && color.brightness > GOLD_MIN_BRIGHTNESS;
    if is_gold {
        score += GOLD_BONUS;
    }

    if (analysis.is_dark() && color.brightness > CONTRAST_BRIGHT_CANDIDATE)
        || (analysis.is_light() && color.brightness < CONTRAST_DARK_CANDIDATE)
    {
        score += CONTRAST_BONUS;
    }

    if color.saturation > VIVID_SATURATION {
        score += VIVID_BONUS;
    }

    let is_blue = color.hue_in(BLUE_HUE_LOW, BLUE_HUE_HIGH);
    if analysis.is_light_blue_gray {
        if color.brightness < CONTRAST_DARK_CANDIDATE || color.saturation > VIVID_SATURATION {
            score += BLUE_GRAY_INK_BONUS;
        }
        if is_blue
            && color.saturation < BLUE_GRAY_MATCH_MAX_SATURATION
            && color.brightness > BLUE_GRAY_MATCH_MIN_BRIGHTNESS
        {
            score *= BLUE_GRAY_MATCH_PENALTY;
        }
    } else if analysis.is_monochromatic {
        if analysis.has_blue_dominant_hue() && is_blue {
            score += MONOCHROME_BLUE_BONUS;
        }
        if color.saturation < MONOCHROME_NEUTRAL_SATURATION {
            score += MONOCHROME_NEUTRAL_BONUS;
        }
    } else if !is_gold && hue_distance(color.hue, analysis.dominant_hue) < DOMINANT_HUE_WINDOW {
        score *= DOMINANT_HUE_PENALTY;
    }

    score += match candidate.source {
        CandidateSource::Edge => EDGE_SOURCE_BONUS,
        CandidateSource::Center => CENTER_SOURCE_BONUS,
        CandidateSource::Vibrant | CandidateSource::Outlier => 0.0,
    };

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(average_brightness: f32, dominant_hue: f32) -> CoverAnalysis {
        CoverAnalysis {
            average_brightness,
            dominant_hue,
            has_high_contrast: false,
            is_monochromatic: false,
            is_light_blue_gray: false,
            average_saturation: 0.3,
        }
    }

    fn candidate(
        hue: f32,
        saturation: f32,
        brightness: f32,
        score: f32,
        source: CandidateSource,
    ) -> AccentCandidate {
        AccentCandidate::new(Hsb::new(hue, saturation, brightness), score, source)
    }

    #[test]
    fn gold_and_contrast_bonuses_stack() {
        let dark = analysis(0.1, 0.6);
        let gold = candidate(0.12, 0.8, 0.9, 1.0, CandidateSource::Vibrant);
        // 1.0 + gold 1.5 + contrast 0.5 + vivid 0.3
        assert!((adjusted_score(&gold, &dark) - 3.3).abs() < 1e-5);
    }

    #[test]
    fn dominant_hue_match_is_penalized_on_colorful_covers() {
        let cover = analysis(0.5, 0.0);
        let red = candidate(0.02, 0.5, 0.5, 1.0, CandidateSource::Outlier);
        assert!((adjusted_score(&red, &cover) - 0.8).abs() < 1e-5);

        // Circular: 0.97 is as close to 0.0 as 0.03.
        let crimson = candidate(0.97, 0.5, 0.5, 1.0, CandidateSource::Outlier);
        assert!((adjusted_score(&crimson, &cover) - 0.8).abs() < 1e-5);
    }

    #[test]
    fn light_blue_gray_cover_penalizes_matching_tones() {
        let mut cover = analysis(0.65, 7.0 / 12.0);
        cover.is_light_blue_gray = true;
        cover.is_monochromatic = true;
        let match_tone = candidate(0.6, 0.2, 0.7, 2.0, CandidateSource::Vibrant);
        let ink = candidate(0.6, 0.5, 0.3, 2.0, CandidateSource::Vibrant);
        assert!((adjusted_score(&match_tone, &cover) - 0.6).abs() < 1e-5);
        // 2.0 + contrast 0.5 + dark ink 1.0
        assert!((adjusted_score(&ink, &cover) - 3.5).abs() < 1e-5);
    }

    #[test]
    fn monochrome_cover_rewards_blue_on_blue_and_neutrals() {
        let mut blue_cover = analysis(0.5, 7.0 / 12.0);
        blue_cover.is_monochromatic = true;
        let blue = candidate(0.6, 0.5, 0.5, 1.0, CandidateSource::Vibrant);
        let neutral = candidate(0.0, 0.1, 0.5, 1.0, CandidateSource::Vibrant);
        assert!((adjusted_score(&blue, &blue_cover) - 1.5).abs() < 1e-5);
        assert!((adjusted_score(&neutral, &blue_cover) - 1.3).abs() < 1e-5);

        // Without a blue dominant hue there is no blue bonus, and the dominant
        // hue penalty does not apply on monochrome covers.
        let mut green_cover = analysis(0.5, 0.3);
        green_cover.is_monochromatic = true;
        let on_hue = candidate(0.3, 0.5, 0.5, 1.0, CandidateSource::Vibrant);
        assert!((adjusted_score(&blue, &green_cover) - 1.0).abs() < 1e-5);
        assert!((adjusted_score(&on_hue, &green_cover) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn gold_is_exempt_from_the_dominant_hue_penalty() {
        let amber_cover = analysis(0.5, 0.1);
        let gold = candidate(0.12, 0.5, 0.6, 1.0, CandidateSource::Vibrant);
        let muted = candidate(0.12, 0.2, 0.6, 1.0, CandidateSource::Vibrant);
        assert!((adjusted_score(&gold, &amber_cover) - 2.5).abs() < 1e-5);
        assert!((adjusted_score(&muted, &amber_cover) - 0.8).abs() < 1e-5);
    }

    #[test]
    fn source_bonus_prefers_edge_then_center() {
        let cover = analysis(0.5, 0.3);
        let score_from = |source| adjusted_score(&candidate(0.7, 0.5, 0.5, 1.0, source), &cover);
        let edge = score_from(CandidateSource::Edge);
        let center = score_from(CandidateSource::Center);
        let vibrant = score_from(CandidateSource::Vibrant);
        assert!(edge > center && center > vibrant);
    }

    #[test]
    fn tie_break_prefers_saturation_within_window() {
        let cover = analysis(0.5, 0.3);
        let ranker = CandidateRanker::default();
        let ranked = ranker.rank(
            vec![
                candidate(0.8, 0.4, 0.5, 3.0, CandidateSource::Vibrant),
                candidate(0.9, 0.65, 0.5, 2.85, CandidateSource::Vibrant),
                candidate(0.7, 0.69, 0.5, 2.0, CandidateSource::Vibrant),
            ],
            &cover,
        );
        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));

        let winner = ranker.select(&ranked).unwrap();
        assert!((winner.color.hue - 0.9).abs() < 1e-6);
    }

    #[test]
    fn background_echo_is_dropped() {
        let mut cover = analysis(0.5, 0.0);
        cover.average_saturation = 0.0;
        let gray = Hsb::gray(0.5);
        assert!(echoes_background(&gray, &cover));
        assert!(!echoes_background(&Hsb::gray(0.9), &cover));

        let ranked = CandidateRanker::default().rank(
            vec![AccentCandidate::new(gray, 5.0, CandidateSource::Center)],
            &cover,
        );
        assert!(ranked.is_empty());
        assert_eq!(CandidateRanker::default().select(&ranked), None);
    }
}
