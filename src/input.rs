use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Whether a path looks like a Markdown document
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "md" | "markdown"))
}

/// Check if a path should be skipped while walking a directory
pub fn should_ignore(path: &Path) -> bool {
    const IGNORED_DIRS: &[&str] = &["target", "node_modules", ".git", ".svn", ".hg"];

    path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
    })
}

/// Expand the given inputs into Markdown files.
///
/// Files are taken as-is whatever their extension; directories are walked
/// for `.md` / `.markdown` files, sorted so output order is stable.
pub fn collect_markdown_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let metadata = fs::metadata(input)
            .with_context(|| format!("Failed to read input: {}", input.display()))?;

        if metadata.is_file() {
            files.push(input.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(input)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !should_ignore(e.path().strip_prefix(input).unwrap_or(e.path())))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && is_markdown(entry.path()) {
                found.push(entry.into_path());
            }
        }

        found.sort();
        debug!(dir = %input.display(), files = found.len(), "walked input directory");
        files.extend(found);
    }

    info!(files = files.len(), "collected markdown inputs");
    Ok(files)
}

/// Read a document as UTF-8, replacing invalid sequences
pub fn read_document(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("report.md")));
        assert!(is_markdown(Path::new("notes/Q4.MARKDOWN")));
        assert!(!is_markdown(Path::new("report.pdf")));
        assert!(!is_markdown(Path::new("README")));
    }

    #[test]
    fn test_should_ignore() {
        assert!(should_ignore(Path::new("target/debug/out.md")));
        assert!(should_ignore(Path::new("docs/.git/HEAD")));
        assert!(!should_ignore(Path::new("filings/2024/10-K.md")));
    }

    #[test]
    fn test_collect_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("2024")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("2024/b.md"), "# B").unwrap();
        fs::write(root.join("a.md"), "# A").unwrap();
        fs::write(root.join("notes.txt"), "skip").unwrap();
        fs::write(root.join("target/c.md"), "# C").unwrap();

        let files = collect_markdown_files(&[root.to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(names, vec!["2024/b.md", "a.md"]);
    }

    #[test]
    fn test_explicit_file_taken_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filing.txt");
        fs::write(&path, "Plain text").unwrap();

        let files = collect_markdown_files(&[path.clone()]).unwrap();
        assert_eq!(files, vec![path.clone()]);
        assert_eq!(read_document(&path).unwrap(), "Plain text");
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let err = collect_markdown_files(&[PathBuf::from("/definitely/not/here.md")]).unwrap_err();
        assert!(err.to_string().contains("Failed to read input"));
    }
}
