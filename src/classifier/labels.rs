use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::error::ClassifierError;

/// Ordered list of class names indexed by class id.
///
/// Loaded once at startup from a plain text file, one label per line. The
/// line number (zero-based) is the class id the model's output vector is
/// indexed by.
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Reads a label table from a text file, one label per line.
    ///
    /// # Errors
    /// - `LabelError` if the file does not exist or cannot be read
    /// - `LabelError` if the file contains no labels
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ClassifierError::LabelError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let mut labels = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| {
                ClassifierError::LabelError(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let label = line.trim();
            if !label.is_empty() {
                labels.push(label.to_string());
            }
        }

        if labels.is_empty() {
            return Err(ClassifierError::LabelError(format!(
                "Label file {} contains no labels",
                path.display()
            )));
        }

        Ok(Self { labels })
    }

    pub fn from_labels(labels: Vec<String>) -> Result<Self, ClassifierError> {
        if labels.is_empty() {
            return Err(ClassifierError::LabelError(
                "Label table cannot be empty".into(),
            ));
        }
        Ok(Self { labels })
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.labels.get(class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_labels_from_file() {
        let dir = std::env::temp_dir().join("colorseason-test-labels");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("labels.txt");
        fs::write(&path, "winter\nspring\nsummer\nautumn\n").unwrap();

        let table = LabelTable::from_file(&path).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(0), Some("winter"));
        assert_eq!(table.get(3), Some("autumn"));
        assert_eq!(table.get(4), None);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let dir = std::env::temp_dir().join("colorseason-test-labels-blank");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("labels.txt");
        fs::write(&path, "winter\n\nspring\n").unwrap();

        let table = LabelTable::from_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), Some("spring"));
    }

    #[test]
    fn test_missing_file_fails() {
        let result = LabelTable::from_file("/nonexistent/labels.txt");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(LabelTable::from_labels(Vec::new()).is_err());
    }
}
