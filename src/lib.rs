pub mod cli;
pub mod error;
pub mod labels;
pub mod ledger;
pub mod mapping;
pub mod model;
pub mod postprocess;
pub mod preprocess;
pub mod service;

pub use crate::cli::Args;
pub use crate::error::Error;
pub use crate::labels::{LabelTable, UNKNOWN_LABEL};
pub use crate::ledger::{Ledger, LedgerEntry};
pub use crate::mapping::{WasteCategory, WasteInfo, bin_label, reward_points, waste_info};
pub use crate::model::{Classifier, OnnxClassifier};
pub use crate::postprocess::{argmax_and_max, predict_class, softmax};
pub use crate::preprocess::{Normalization, PreprocessConfig, Processor};
pub use crate::service::{Classification, ClassificationEngine};
