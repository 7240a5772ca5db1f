// src/memory/router.rs
// Decides which collection an incoming record belongs to. One code path
// serves both the classify-preview endpoint and the insertion gate, so the
// two can never drift apart.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::memory::classifier::features::{CueTable, FeatureExtractor};
use crate::memory::classifier::{ClassificationResult, Classifier, ScoringWeights};
use crate::memory::types::{MemoryType, RecordContext};

/// Where a record goes and why. `classification` is `None` exactly when the
/// caller supplied an explicit type: the manual path is a pure passthrough
/// with no scoring artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub memory_type: MemoryType,
    pub collection: String,
    pub classification: Option<ClassificationResult>,
}

/// Stateless router over the pure extractor + classifier pair.
#[derive(Debug, Clone, Default)]
pub struct MemoryRouter {
    extractor: FeatureExtractor,
    classifier: Classifier,
}

impl MemoryRouter {
    pub fn new(cues: CueTable, weights: ScoringWeights) -> Self {
        Self {
            extractor: FeatureExtractor::new(cues),
            classifier: Classifier::new(weights),
        }
    }

    /// Routes a record. An explicit type skips classification entirely and is
    /// echoed back unchanged.
    pub fn route(
        &self,
        text: &str,
        context: Option<&RecordContext>,
        explicit: Option<MemoryType>,
    ) -> RoutingDecision {
        if let Some(memory_type) = explicit {
            return RoutingDecision {
                memory_type,
                collection: memory_type.collection().to_string(),
                classification: None,
            };
        }

        let result = self.classify(text, context);
        let memory_type = result.predicted_type;
        debug!(
            memory_type = memory_type.as_str(),
            confidence = result.confidence,
            band = result.band.as_str(),
            "routed memory"
        );
        RoutingDecision {
            memory_type,
            collection: memory_type.collection().to_string(),
            classification: Some(result),
        }
    }

    /// Classification preview: same extractor and classifier as the routing
    /// path, nothing stored, nothing mutated.
    pub fn classify(&self, text: &str, context: Option<&RecordContext>) -> ClassificationResult {
        let counts = self.extractor.extract(text);
        self.classifier.classify(counts, context)
    }
}
