use std::fs;
use std::io;
use std::path::Path;

use log::warn;

/// One line of a labeled dataset list: an image path and its ground-truth
/// class id, whitespace-delimited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub filepath: String,
    pub class_id: i64,
}

/// Parses a whitespace-delimited dataset list file.
///
/// Malformed lines (missing fields, non-numeric class id) are skipped with a
/// warning; a missing file is an error.
pub fn read_filelist<P: AsRef<Path>>(path: P) -> io::Result<Vec<DatasetEntry>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut entries = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let filepath = fields.next();
        let class_id = fields.next().and_then(|f| f.parse::<i64>().ok());
        match (filepath, class_id) {
            (Some(filepath), Some(class_id)) => entries.push(DatasetEntry {
                filepath: filepath.to_string(),
                class_id,
            }),
            _ => warn!(
                "Skipping malformed line {} in {}: {:?}",
                lineno + 1,
                path.display(),
                line
            ),
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_filelist() {
        let dir = std::env::temp_dir().join("colorseason-test-filelist");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("train.txt");
        fs::write(
            &path,
            "/data/a.jpg 0\n/data/b.jpg 3\n\nmalformed-line\n/data/c.jpg not-a-number\n",
        )
        .unwrap();

        let entries = read_filelist(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            DatasetEntry {
                filepath: "/data/a.jpg".to_string(),
                class_id: 0
            }
        );
        assert_eq!(entries[1].class_id, 3);
    }

    #[test]
    fn test_missing_filelist_is_an_error() {
        assert!(read_filelist("/nonexistent/train.txt").is_err());
    }
}
