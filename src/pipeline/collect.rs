//! Resolve command-line paths into workflow files

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{RamjamError, Result};

/// File name suffixes recognized as workflow documents
pub const WORKFLOW_SUFFIXES: &[&str] = &[".yaml", ".yml"];

/// Resolve every input path, in input order.
///
/// Fails if no paths were given or if nothing resolves to a workflow file.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if paths.is_empty() {
        return Err(RamjamError::NoPaths);
    }

    let mut files = Vec::new();
    for path in paths {
        files.extend(collect_path(path)?);
    }

    if files.is_empty() {
        return Err(RamjamError::NoFiles);
    }
    Ok(files)
}

/// Resolve one path: a file is returned as-is, a directory yields its workflow files
/// sorted by name. Subdirectories are not descended into.
pub fn collect_path(path: &Path) -> Result<Vec<PathBuf>> {
    let access_error = |source| RamjamError::Access {
        path: path.display().to_string(),
        source,
    };

    let metadata = fs::metadata(path).map_err(access_error)?;
    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(access_error)? {
        let entry = entry.map_err(access_error)?;
        if entry.file_type().map_err(access_error)?.is_dir() {
            continue;
        }
        if is_workflow_file(&entry.file_name().to_string_lossy()) {
            files.push(entry.path());
        }
    }
    files.sort();

    Ok(files)
}

fn is_workflow_file(name: &str) -> bool {
    WORKFLOW_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "workflow: []\n").unwrap();
        path
    }

    #[test]
    fn test_single_file_returned_as_is() {
        let dir = tempfile::tempdir().unwrap();
        // Explicit files are accepted regardless of suffix
        let file = touch(dir.path(), "flow.txt");
        assert_eq!(collect_path(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_directory_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.yml");
        touch(dir.path(), "a.yaml");
        touch(dir.path(), "notes.md");
        touch(dir.path(), "c.yaml.bak");
        fs::create_dir(dir.path().join("nested.yaml")).unwrap();
        touch(&dir.path().join("nested.yaml"), "inner.yaml");

        let files = collect_path(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yml"]);
    }

    #[test]
    fn test_missing_path_is_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = collect_path(&missing).unwrap_err();
        assert!(matches!(err, RamjamError::Access { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_multiple_paths_keep_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("suite");
        fs::create_dir(&sub).unwrap();
        touch(&sub, "2.yaml");
        touch(&sub, "1.yaml");
        let single = touch(dir.path(), "z.yaml");

        let files = collect_files(&[single.clone(), sub.clone()]).unwrap();
        assert_eq!(files, vec![single, sub.join("1.yaml"), sub.join("2.yaml")]);
    }

    #[test]
    fn test_no_paths_and_no_files() {
        assert!(matches!(collect_files(&[]), Err(RamjamError::NoPaths)));

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "readme.txt");
        let err = collect_files(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, RamjamError::NoFiles));
        assert_eq!(err.to_string(), "no files found");
    }
}
