use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{
    error::{DatasetErr, Result},
    record::Record,
};

/// Reads every record of the dataset stored in `dir`.
///
/// Data files are the regular files of `dir` with a `json` or `jsonl` extension whose name does
/// not start with `_` or `.`. They are read in lexicographic order, one JSON object per line,
/// skipping blank lines.
///
/// # Errors
/// Fails if the directory cannot be listed, holds no data files or a line is not a valid record.
pub fn read_dataset(dir: &Path) -> Result<Vec<Record>> {
    let files = data_files(dir)?;
    if files.is_empty() {
        return Err(DatasetErr::NoDataFiles {
            path: dir.to_path_buf(),
        });
    }

    let mut records = Vec::new();
    for path in &files {
        let before = records.len();
        read_file(path, &mut records)?;
        debug!("read {} records from {}", records.len() - before, path.display());
    }

    info!(
        "read {} records from {} file(s) in {}",
        records.len(),
        files.len(),
        dir.display()
    );
    Ok(records)
}

fn data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |source| DatasetErr::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();

        if !entry.file_type().map_err(io_err)?.is_file() || !is_data_file(&path) {
            continue;
        }

        files.push(path);
    }

    files.sort();
    Ok(files)
}

fn is_data_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_none_or(|name| name.starts_with('_') || name.starts_with('.'));

    let json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "json" || ext == "jsonl");

    !hidden && json
}

fn read_file(path: &Path, records: &mut Vec<Record>) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|source| DatasetErr::Io {
        path: path.to_path_buf(),
        source,
    })?;

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let record = serde_json::from_str(line).map_err(|source| DatasetErr::Json {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;

        records.push(record);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{context::FEATURE_GROUPS_FILE, record::Value};

    #[test]
    fn reads_files_in_order_and_skips_metadata() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FEATURE_GROUPS_FILE), "[[], []]").unwrap();
        fs::write(dir.path().join("part-00001.json"), "{\"x\": 3}\n").unwrap();
        fs::write(dir.path().join("part-00000.json"), "{\"x\": 1}\n\n{\"x\": 2}\n").unwrap();
        fs::write(dir.path().join("README.txt"), "not data").unwrap();

        let records = read_dataset(dir.path()).unwrap();
        let xs: Vec<_> = records.iter().map(|r| r["x"].clone()).collect();

        assert_eq!(xs, [Value::Scalar(1.0), Value::Scalar(2.0), Value::Scalar(3.0)]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_dataset(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetErr::NoDataFiles { .. }));
    }

    #[test]
    fn bad_line_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("part-0.jsonl"), "{\"x\": 1}\n{\"x\": \"a\"}\n").unwrap();

        let err = read_dataset(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetErr::Json { line: 2, .. }));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_dataset(&dir.path().join("train")).unwrap_err();
        assert!(matches!(err, DatasetErr::Io { .. }));
    }
}
