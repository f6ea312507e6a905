use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::warn;

use crate::error::Error;
use crate::labels::LabelTable;
use crate::ledger::{Ledger, LedgerEntry};
use crate::mapping::{self, WasteCategory};
use crate::model::Classifier;
use crate::postprocess::predict_class;
use crate::preprocess::Processor;

/// Result of one classification request.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub label: String,
    pub category: WasteCategory,
    pub instruction: &'static str,
    pub bin: &'static str,
    pub points: u32,
    pub confidence: f32,
    /// False when the ledger was unavailable and the score update was
    /// dropped; the classification itself is still valid.
    pub recorded: bool,
}

/// The composed inference-to-reward pipeline. Built once at startup and
/// shared across request handlers; the classifier sits behind a mutex since
/// the underlying runtime is not assumed re-entrant.
pub struct ClassificationEngine<C: Classifier> {
    classifier: Mutex<C>,
    processor: Processor,
    labels: LabelTable,
    ledger: Ledger,
}

impl<C: Classifier> ClassificationEngine<C> {
    pub fn new(classifier: C, processor: Processor, labels: LabelTable, ledger: Ledger) -> Self {
        Self {
            classifier: Mutex::new(classifier),
            processor,
            labels,
            ledger,
        }
    }

    fn classifier(&self) -> MutexGuard<'_, C> {
        self.classifier.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Classify one image and credit the resulting points to `username`.
    ///
    /// Fails with [`Error::Decode`] on malformed bytes (before any ledger
    /// write) and [`Error::ModelUnavailable`] if inference fails. A ledger
    /// failure does not fail the request: the score update is dropped with a
    /// warning and `recorded` is false. Every completed classification is
    /// recorded, including zero-point `Unknown` ones.
    pub fn classify_and_score(
        &self,
        image_bytes: &[u8],
        username: &str,
    ) -> Result<Classification, Error> {
        let tensor = self.processor.tensor_from_bytes(image_bytes)?;
        let scores = self.classifier().class_scores(&tensor)?;
        let (index, confidence) = predict_class(&scores);

        let label = self.labels.resolve(index).to_string();
        let info = mapping::waste_info(&label);
        let points = mapping::reward_points(info.category);

        let recorded = match self.ledger.record_classification(username, points) {
            Ok(_) => true,
            Err(e) => {
                warn!(username, error = %e, "score update dropped");
                false
            }
        };

        Ok(Classification {
            label,
            category: info.category,
            instruction: info.instruction,
            bin: mapping::bin_label(info.category),
            points,
            confidence,
            recorded,
        })
    }

    /// Current leaderboard, best first.
    pub fn top_n(&self, n: usize) -> Result<Vec<LedgerEntry>, Error> {
        self.ledger.top_n(n)
    }

    pub fn user_entry(&self, username: &str) -> Result<Option<LedgerEntry>, Error> {
        self.ledger.entry(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::PreprocessConfig;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use ndarray::Array4;
    use std::collections::HashMap;
    use std::io::Cursor;

    /// Fixed-output classifier standing in for the ONNX session.
    struct StubClassifier {
        scores: Vec<f32>,
    }

    impl Classifier for StubClassifier {
        fn class_scores(&self, _input: &Array4<f32>) -> Result<Vec<f32>, Error> {
            Ok(self.scores.clone())
        }
    }

    fn trashnet_labels() -> LabelTable {
        let table: HashMap<String, usize> = [
            ("cardboard", 0),
            ("glass", 1),
            ("metal", 2),
            ("paper", 3),
            ("plastic", 4),
            ("trash", 5),
        ]
        .into_iter()
        .map(|(label, idx)| (label.to_string(), idx))
        .collect();
        LabelTable::from_class_indices(table)
    }

    fn engine_predicting(scores: Vec<f32>) -> ClassificationEngine<StubClassifier> {
        ClassificationEngine::new(
            StubClassifier { scores },
            Processor::new(PreprocessConfig::default()),
            trashnet_labels(),
            Ledger::open_in_memory().unwrap(),
        )
    }

    fn jar_photo() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(160, 120, Rgb([90, 140, 110])));
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn glass_jar_earns_ten_points() {
        // argmax lands on index 1 = "glass"
        let engine = engine_predicting(vec![0.1, 9.0, 0.2, 0.1, 0.3, 0.1]);
        let result = engine.classify_and_score(&jar_photo(), "alice").unwrap();

        assert_eq!(result.label, "glass");
        assert_eq!(result.category, WasteCategory::Glass);
        assert_eq!(result.category.to_string(), "Glass Waste");
        assert_eq!(result.instruction, "Recycle in glass bin.");
        assert_eq!(result.bin, "Blue Bin");
        assert_eq!(result.points, 10);
        assert!(result.recorded);

        let entry = engine.user_entry("alice").unwrap().unwrap();
        assert_eq!(entry.points, 10);
        assert_eq!(entry.correct_classifications, 1);
    }

    #[test]
    fn scores_accumulate_across_requests() {
        let engine = engine_predicting(vec![0.0, 8.0, 0.0, 0.0, 0.0, 0.0]);
        engine.classify_and_score(&jar_photo(), "alice").unwrap();
        engine.classify_and_score(&jar_photo(), "alice").unwrap();

        let entry = engine.user_entry("alice").unwrap().unwrap();
        assert_eq!(entry.points, 20);
        assert_eq!(entry.correct_classifications, 2);
    }

    #[test]
    fn malformed_bytes_fail_without_touching_the_ledger() {
        let engine = engine_predicting(vec![1.0; 6]);
        let err = engine.classify_and_score(b"not an image", "alice").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert_eq!(engine.user_entry("alice").unwrap(), None);
    }

    #[test]
    fn class_outside_the_label_table_scores_zero_but_is_recorded() {
        // seven scores, argmax at index 6, which the six-label table lacks
        let engine = engine_predicting(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0]);
        let result = engine.classify_and_score(&jar_photo(), "bob").unwrap();

        assert_eq!(result.label, "unknown");
        assert_eq!(result.category, WasteCategory::Unknown);
        assert_eq!(result.instruction, "Check locally.");
        assert_eq!(result.points, 0);

        let entry = engine.user_entry("bob").unwrap().unwrap();
        assert_eq!(entry.points, 0);
        assert_eq!(entry.correct_classifications, 1);
    }

    #[test]
    fn ledger_outage_does_not_hide_the_classification() {
        let engine = engine_predicting(vec![0.1, 9.0, 0.2, 0.1, 0.3, 0.1]);
        engine.ledger.drop_backing_table();

        let result = engine.classify_and_score(&jar_photo(), "alice").unwrap();
        assert_eq!(result.category, WasteCategory::Glass);
        assert_eq!(result.instruction, "Recycle in glass bin.");
        assert_eq!(result.points, 10);
        assert!(!result.recorded);
    }

    #[test]
    fn leaderboard_view_passes_through() {
        let engine = engine_predicting(vec![0.0, 8.0, 0.0, 0.0, 0.0, 0.0]);
        engine.classify_and_score(&jar_photo(), "alice").unwrap();
        engine.classify_and_score(&jar_photo(), "bob").unwrap();
        engine.classify_and_score(&jar_photo(), "bob").unwrap();

        let top: Vec<_> = engine
            .top_n(2)
            .unwrap()
            .into_iter()
            .map(|e| (e.username, e.points))
            .collect();
        assert_eq!(top, [("bob".to_string(), 20), ("alice".to_string(), 10)]);
    }
}
