// src/memory/classifier/mod.rs

//! Memory-type classification: cue counts in, episodic/semantic decision out.
//!
//! The scoring constants below are the decisive policy of the whole
//! classifier. Temporal and emotional cues are the strongest episodic
//! signals, conversational cues weaker; factual cues outweigh profile cues
//! on the semantic side. Tune them through [`ScoringWeights`], not inline.

pub mod features;

use serde::{Deserialize, Serialize};

use crate::memory::types::{MemoryType, RecordContext};
use features::FeatureCounts;

/// Discrete handling decision derived from the continuous confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// confidence >= 0.7: use the predicted type as-is.
    High,
    /// 0.3 <= confidence < 0.7: use the predicted type, but flag the result
    /// for optional secondary review by the caller.
    Medium,
    /// confidence < 0.3: too ambiguous — override to semantic.
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= 0.7 {
            ConfidenceBand::High
        } else if confidence >= 0.3 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}

/// Per-category score multipliers plus flat bonuses for caller-supplied
/// context hints. Defaults encode the documented policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub temporal: i32,
    pub emotional: i32,
    pub conversational: i32,
    pub factual: i32,
    pub profile: i32,
    /// Bonus when the context carries a conversation id or speaker.
    pub conversation_hint: i32,
    /// Bonus when the context carries emotion metadata.
    pub emotion_hint: i32,
    /// Bonus when the context names an explicit fact type.
    pub fact_type_hint: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            temporal: 3,
            emotional: 3,
            conversational: 2,
            factual: 3,
            profile: 2,
            conversation_hint: 2,
            emotion_hint: 3,
            fact_type_hint: 5,
        }
    }
}

/// Outcome of one classification call. Created fresh per call and never
/// persisted by the core; persistence is the caller's business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub predicted_type: MemoryType,
    pub confidence: f32,
    pub episodic_score: f32,
    pub semantic_score: f32,
    pub feature_counts: FeatureCounts,
    pub band: ConfidenceBand,
    pub explanation: String,
}

impl ClassificationResult {
    /// Medium-band results should get a second look from the caller before
    /// long-term commitments (the caller decides what that means).
    pub fn needs_review(&self) -> bool {
        self.band == ConfidenceBand::Medium
    }
}

/// Converts cue counts (plus optional context hints) into a typed decision
/// with a confidence band and an explanatory trace. Total: never errors,
/// negative counts are treated as zero.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    weights: ScoringWeights,
}

impl Classifier {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn classify(
        &self,
        counts: FeatureCounts,
        context: Option<&RecordContext>,
    ) -> ClassificationResult {
        let w = &self.weights;

        // Malformed (negative) counts clamp to zero.
        let temporal = counts.temporal.max(0);
        let emotional = counts.emotional.max(0);
        let conversational = counts.conversational.max(0);
        let factual = counts.factual.max(0);
        let profile = counts.profile.max(0);

        let mut episodic_score =
            w.temporal * temporal + w.emotional * emotional + w.conversational * conversational;
        let mut semantic_score = w.factual * factual + w.profile * profile;

        let mut hint_notes: Vec<&str> = Vec::new();
        if let Some(ctx) = context {
            if ctx.conversation_id.is_some() || ctx.speaker.is_some() {
                episodic_score += w.conversation_hint;
                hint_notes.push("conversation hint");
            }
            if ctx.emotion.is_some() {
                episodic_score += w.emotion_hint;
                hint_notes.push("emotion hint");
            }
            if ctx.fact_type.is_some() {
                semantic_score += w.fact_type_hint;
                hint_notes.push("fact-type hint");
            }
        }

        let total = episodic_score + semantic_score;
        let (mut predicted_type, confidence) = if total == 0 {
            // No lexical signal at all. Semantic is the safer default: it
            // carries no time-sensitive speaker/emotion metadata.
            (MemoryType::Semantic, 0.0)
        } else {
            let winner = if episodic_score > semantic_score {
                MemoryType::Episodic
            } else {
                MemoryType::Semantic
            };
            let top = episodic_score.max(semantic_score) as f32;
            (winner, top / total as f32)
        };

        let band = ConfidenceBand::from_confidence(confidence);
        if band == ConfidenceBand::Low {
            predicted_type = MemoryType::Semantic;
        }

        let explanation = build_explanation(
            predicted_type,
            confidence,
            band,
            &FeatureCounts {
                temporal,
                emotional,
                conversational,
                factual,
                profile,
            },
            &hint_notes,
        );

        ClassificationResult {
            predicted_type,
            confidence,
            episodic_score: episodic_score as f32,
            semantic_score: semantic_score as f32,
            feature_counts: counts,
            band,
            explanation,
        }
    }
}

fn build_explanation(
    predicted: MemoryType,
    confidence: f32,
    band: ConfidenceBand,
    counts: &FeatureCounts,
    hints: &[&str],
) -> String {
    let mut reasons = Vec::new();
    for (name, count) in [
        ("temporal", counts.temporal),
        ("emotional", counts.emotional),
        ("conversational", counts.conversational),
        ("factual", counts.factual),
        ("profile", counts.profile),
    ] {
        if count > 0 {
            reasons.push(format!("{} x{}", name, count));
        }
    }
    reasons.extend(hints.iter().map(|h| h.to_string()));

    let signals = if reasons.is_empty() {
        "no lexical signal".to_string()
    } else {
        reasons.join(", ")
    };

    format!(
        "classified as {} (confidence {:.2}, {} band): {}",
        predicted,
        confidence,
        band.as_str(),
        signals
    )
}

#[cfg(test)]
mod tests {
    use super::features::FeatureCounts;
    use super::*;

    fn counts(t: i32, e: i32, c: i32, f: i32, p: i32) -> FeatureCounts {
        FeatureCounts {
            temporal: t,
            emotional: e,
            conversational: c,
            factual: f,
            profile: p,
        }
    }

    #[test]
    fn zero_signal_defaults_to_semantic_with_zero_confidence() {
        let result = Classifier::default().classify(FeatureCounts::default(), None);
        assert_eq!(result.predicted_type, MemoryType::Semantic);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.band, ConfidenceBand::Low);
        assert!(result.explanation.contains("no lexical signal"));
    }

    #[test]
    fn scores_follow_documented_weights() {
        let result = Classifier::default().classify(counts(2, 1, 1, 1, 2), None);
        assert_eq!(result.episodic_score, 11.0); // 3*2 + 3*1 + 2*1
        assert_eq!(result.semantic_score, 7.0); // 3*1 + 2*2
        assert_eq!(result.predicted_type, MemoryType::Episodic);
    }

    #[test]
    fn confidence_stays_in_unit_interval() {
        for c in [
            counts(0, 0, 0, 0, 0),
            counts(10, 0, 0, 0, 0),
            counts(1, 1, 1, 1, 1),
            counts(0, 0, 0, 7, 7),
        ] {
            let result = Classifier::default().classify(c, None);
            assert!((0.0..=1.0).contains(&result.confidence));
            assert!(result.episodic_score >= 0.0);
            assert!(result.semantic_score >= 0.0);
        }
    }

    #[test]
    fn negative_counts_clamp_to_zero() {
        let result = Classifier::default().classify(counts(-5, -1, 0, 1, 0), None);
        assert_eq!(result.episodic_score, 0.0);
        assert_eq!(result.semantic_score, 3.0);
        assert_eq!(result.predicted_type, MemoryType::Semantic);
    }

    #[test]
    fn exactly_point_seven_is_high_band() {
        // episodic = 3*1 + 2*2 = 7, semantic = 3 → confidence 7/10 = 0.7
        let result = Classifier::default().classify(counts(1, 0, 2, 1, 0), None);
        assert_eq!(result.confidence, 0.7);
        assert_eq!(result.band, ConfidenceBand::High);
        assert_eq!(result.predicted_type, MemoryType::Episodic);
    }

    #[test]
    fn band_boundaries_are_inclusive() {
        // The winner's share is always >= 0.5 once any signal fired, so the
        // 0.3 boundary is only reachable through the banding function itself.
        assert_eq!(ConfidenceBand::from_confidence(0.7), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(0.3), ConfidenceBand::Medium);
        assert_eq!(
            ConfidenceBand::from_confidence(0.29999998),
            ConfidenceBand::Low
        );
    }

    #[test]
    fn tie_goes_to_semantic() {
        // episodic = 3*2 = 6, semantic = 3*2 = 6 → winner semantic at 0.5.
        let result = Classifier::default().classify(counts(2, 0, 0, 2, 0), None);
        assert_eq!(result.predicted_type, MemoryType::Semantic);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.band, ConfidenceBand::Medium);
        assert!(result.needs_review());
    }

    #[test]
    fn context_hints_shift_the_decision() {
        let classifier = Classifier::default();
        let ctx = RecordContext {
            conversation_id: Some("c-1".into()),
            emotion: Some(Default::default()),
            ..Default::default()
        };
        // Bare counts favor semantic; conversation (+2) and emotion (+3)
        // hints flip it: episodic 5 vs semantic 3.
        let without = classifier.classify(counts(0, 0, 0, 1, 0), None);
        let with = classifier.classify(counts(0, 0, 0, 1, 0), Some(&ctx));
        assert_eq!(without.predicted_type, MemoryType::Semantic);
        assert_eq!(with.predicted_type, MemoryType::Episodic);
        assert!(with.explanation.contains("conversation hint"));
    }

    #[test]
    fn explicit_fact_type_hint_reinforces_semantic() {
        let ctx = RecordContext {
            fact_type: Some("personal_fact".into()),
            ..Default::default()
        };
        let result = Classifier::default().classify(counts(1, 0, 0, 1, 1), Some(&ctx));
        // episodic 3 vs semantic 3 + 2 + 5 = 10
        assert_eq!(result.predicted_type, MemoryType::Semantic);
        assert_eq!(result.band, ConfidenceBand::High);
    }
}
