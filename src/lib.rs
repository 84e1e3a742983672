use std::path::Path;

use crate::content::render_markdown;
use crate::fs::{list_source_files, output_path_for, prepare_output_dir, write_markdown};
use crate::xmind::read_xmind;

pub mod config;
pub mod content;
pub mod domain;
pub mod error;
pub mod exitcode;
pub mod fs;
pub mod xmind;

pub use config::{Args, ConvertOptions};
pub use domain::{Summary, Topic};
pub use error::{ConvertError, ConvertResult};

/// Converts one XMind file into one Markdown file.
///
/// The whole document is rendered before `output` is created, so a file that
/// fails to parse leaves nothing behind.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> ConvertResult<()> {
    let root = read_xmind(input)?;
    let markdown = render_markdown(&root, options).map_err(|source| ConvertError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    write_markdown(output, &markdown)?;
    tracing::debug!(output = %output.display(), bytes = markdown.len(), "wrote markdown");
    Ok(())
}

/// Converts every matching file of `source_dir` into `output_dir`.
///
/// Only a missing source directory or an output directory that cannot be
/// created abort the run; per-file failures are counted in the summary.
pub fn convert_directory(
    source_dir: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> ConvertResult<Summary> {
    let inputs = list_source_files(source_dir, options)?;
    prepare_output_dir(output_dir)?;
    tracing::info!(
        count = inputs.len(),
        "found .{} files in {}",
        options.source_extension,
        source_dir.display()
    );

    let mut summary = Summary::default();
    for input in &inputs {
        let name = input.file_name().unwrap_or_default().to_string_lossy();
        println!("Converting: {name}");

        let outcome = convert_file(input, &output_path_for(input, output_dir), options);
        match &outcome {
            Ok(()) => println!("Success: {name}"),
            Err(e) => {
                tracing::warn!("{e}");
                println!("Failed: {name}");
            }
        }
        summary.record(&outcome);
    }

    println!(
        "\nDone! Successful: {}, Failed: {}",
        summary.succeeded, summary.failed
    );
    Ok(summary)
}
