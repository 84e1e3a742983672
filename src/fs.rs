use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ConvertOptions;
use crate::error::{ConvertError, ConvertResult};

pub const MARKDOWN_EXTENSION: &str = "md";

pub fn prepare_output_dir(output_dir: &Path) -> ConvertResult<()> {
    if !output_dir.is_dir() {
        println!("Creating output directory: {}", output_dir.display());
    }
    fs::create_dir_all(output_dir).map_err(|source| ConvertError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })
}

/// Files directly inside `source_dir` carrying the configured extension,
/// sorted by name.
pub fn list_source_files(source_dir: &Path, options: &ConvertOptions) -> ConvertResult<Vec<PathBuf>> {
    if !source_dir.is_dir() {
        return Err(ConvertError::SourceDirMissing(source_dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {e}", source_dir.display());
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && options.matches_extension(path) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// `<output_dir>/<input stem>.md`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    // Not set_extension: stems like "v1.2" keep their inner dot.
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(MARKDOWN_EXTENSION);
    output_dir.join(name)
}

pub fn write_markdown(path: &Path, markdown: &str) -> ConvertResult<()> {
    let write_error = |source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(write_error)?);
    writer.write_all(markdown.as_bytes()).map_err(write_error)?;
    writer.flush().map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn output_path_swaps_extension() {
        assert_eq!(
            output_path_for(Path::new("/in/Road map.xmind"), Path::new("/out")),
            PathBuf::from("/out/Road map.md")
        );
        assert_eq!(
            output_path_for(Path::new("/in/v1.2.xmind"), Path::new("/out")),
            PathBuf::from("/out/v1.2.md")
        );
    }

    #[test]
    fn lists_only_matching_top_level_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.xmind"), "").unwrap();
        fs::write(temp.path().join("a.XMIND"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/c.xmind"), "").unwrap();
        fs::create_dir(temp.path().join("dir.xmind")).unwrap();

        let files = list_source_files(temp.path(), &ConvertOptions::default()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.XMIND", "b.xmind"]);
    }

    #[test]
    fn missing_source_dir_is_reported() {
        let temp = TempDir::new().unwrap();
        let result = list_source_files(&temp.path().join("absent"), &ConvertOptions::default());
        assert!(matches!(result, Err(ConvertError::SourceDirMissing(_))));
    }

    #[test]
    fn prepare_output_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("a/b/c");
        prepare_output_dir(&out).unwrap();
        fs::write(out.join("keep.md"), "x").unwrap();
        prepare_output_dir(&out).unwrap();
        assert_eq!(fs::read_to_string(out.join("keep.md")).unwrap(), "x");
    }

    #[test]
    fn write_failure_is_typed() {
        let temp = TempDir::new().unwrap();
        let result = write_markdown(&temp.path().join("missing/out.md"), "# x\n");
        assert!(matches!(result, Err(ConvertError::Write { .. })));
    }
}
