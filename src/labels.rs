use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::warn;

use crate::error::Error;

/// Sentinel returned for a class index the table does not cover. A table that
/// disagrees with the model's output width must never abort a request.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Immutable index-to-label table, loaded once at process start from the
/// training artifact's `labels.json` (`{"label": index, ...}`, inverted here).
#[derive(Debug)]
pub struct LabelTable {
    by_index: HashMap<usize, String>,
}

impl LabelTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::ModelUnavailable(format!("label table {}: {e}", path.display())))?;
        let class_indices: HashMap<String, usize> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::ModelUnavailable(format!("label table {}: {e}", path.display())))?;
        Ok(Self::from_class_indices(class_indices))
    }

    pub fn from_class_indices(class_indices: HashMap<String, usize>) -> Self {
        let mut by_index = HashMap::with_capacity(class_indices.len());
        for (label, index) in class_indices {
            if let Some(dropped) = by_index.insert(index, label) {
                warn!(index, dropped = %dropped, "duplicate class index in label table");
            }
        }
        Self { by_index }
    }

    /// Total lookup: a missing index resolves to [`UNKNOWN_LABEL`].
    pub fn resolve(&self, index: usize) -> &str {
        self.by_index
            .get(&index)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}
