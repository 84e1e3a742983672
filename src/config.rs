use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::{ConvertError, ConvertResult};

pub const DEFAULT_SOURCE_EXTENSION: &str = "xmind";

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert a directory of XMind mind maps to Markdown", long_about = None)]
pub struct Args {
    /// Directory holding the .xmind files
    pub source_dir: PathBuf,

    /// Directory receiving the .md files, created if missing
    pub output_dir: PathBuf,

    /// Extension of the files to convert
    #[arg(short, long)]
    pub extension: Option<String>,

    /// YAML file with conversion options
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Leave topic notes out of the output
    #[arg(long)]
    pub no_notes: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Options shared by every file of a batch run.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertOptions {
    pub source_extension: String,
    pub include_notes: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            include_notes: true,
        }
    }
}

impl ConvertOptions {
    pub fn from_yaml_file(path: &Path) -> ConvertResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| ConvertError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&raw).map_err(|reason| ConvertError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn from_yaml_str(raw: &str) -> Result<Self, String> {
        if raw.trim().is_empty() {
            return Ok(ConvertOptions::default());
        }
        serde_yaml::from_str(raw).map_err(|e| e.to_string())
    }

    /// Config file first, then command-line flags on top.
    pub fn from_args(args: &Args) -> ConvertResult<Self> {
        let mut options = match &args.config {
            Some(path) => Self::from_yaml_file(path)?,
            None => ConvertOptions::default(),
        };
        if let Some(ext) = &args.extension {
            options.source_extension = ext.trim_start_matches('.').to_string();
        }
        if args.no_notes {
            options.include_notes = false;
        }
        tracing::debug!(?options, "resolved conversion options");
        Ok(options)
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.source_extension))
    }
}
