use crate::error::{Error, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories skipped by default, in addition to hidden ones
pub const DEFAULT_EXCLUDES: &[&str] = &["target"];

/// Collects the Rust sources whose type declarations feed the descriptor table.
///
/// Hidden directories and the names in [`DEFAULT_EXCLUDES`] are skipped.
/// Files come back sorted so the first-wins registration in the
/// [`TypeResolver`](crate::type_resolver::TypeResolver) does not depend on
/// directory iteration order.
///
/// # Example
///
/// ```no_run
/// use openapi_type_schema::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project")).exclude("generated");
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    excludes: Vec<String>,
}

/// Files found by [`FileScanner::scan`] and the entries it could not read
#[derive(Debug, Default)]
pub struct ScanResult {
    pub rust_files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Also skips directories named `name`.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excludes.push(name.into());
        self
    }

    /// Walks the tree below the root and collects every `.rs` file.
    ///
    /// Unreadable entries are recorded as warnings and the walk continues.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the root is not a directory.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            return Err(Error::InvalidArgument(format!(
                "不是目录: {}",
                self.root_path.display()
            )));
        }

        let mut result = ScanResult::default();
        let walker = WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_excluded(e));

        for entry in walker {
            match entry {
                Ok(entry) if is_rust_file(entry.path()) => {
                    result.rust_files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    result.warnings.push(warning);
                }
            }
        }

        result.rust_files.sort();
        debug!(
            "Scanned {}: {} Rust files",
            self.root_path.display(),
            result.rust_files.len()
        );
        Ok(result)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.')
            || (entry.file_type().is_dir() && self.excludes.iter().any(|e| *e == name))
    }
}

fn is_rust_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn relative_names(root: &Path, result: &ScanResult) -> Vec<String> {
        result
            .rust_files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_collects_sorted_rust_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/models")).unwrap();
        fs::write(root.join("src/models/order.rs"), "pub struct Order;").unwrap();
        fs::write(root.join("src/lib.rs"), "pub mod models;").unwrap();
        fs::write(root.join("build.rs"), "fn main() {}").unwrap();
        fs::write(root.join("README.md"), "# Models").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert!(result.warnings.is_empty());
        assert_eq!(
            relative_names(root, &result),
            vec!["build.rs", "src/lib.rs", "src/models/order.rs"]
        );
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileScanner::new(temp_dir.path().to_path_buf()).scan().unwrap();

        assert!(result.rust_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_skips_target_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("target/debug")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("target/debug/out.rs"), "fn main() {}").unwrap();
        fs::write(root.join(".git/hook.rs"), "fn main() {}").unwrap();
        fs::write(root.join("lib.rs"), "pub struct Kept;").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(relative_names(root, &result), vec!["lib.rs"]);
    }

    #[test]
    fn test_scan_with_extra_exclude() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("generated")).unwrap();
        fs::write(root.join("generated/bindings.rs"), "pub struct Skipped;").unwrap();
        fs::write(root.join("models.rs"), "pub struct Kept;").unwrap();

        let result = FileScanner::new(root.to_path_buf())
            .exclude("generated")
            .scan()
            .unwrap();

        assert_eq!(relative_names(root, &result), vec!["models.rs"]);
    }

    #[test]
    fn test_scan_rejects_file_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("lib.rs");
        fs::write(&file, "").unwrap();

        let result = FileScanner::new(file).scan();
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
