use std::io::{self, Write};

use crate::config::ConvertOptions;
use crate::domain::Topic;

/// Deepest level that still gets a dedicated layout.
pub const MAX_FORMATTED_DEPTH: usize = 8;

const INDENT: &str = "    ";

/// Formats a single title line (without the trailing newline) for a topic at
/// `depth`, the root being depth 1.
///
/// Levels 1 and 2 become headings, level 3 bold text and levels 4 to 8
/// bullets indented by four spaces per level past 4. Anything deeper keeps
/// its raw `#`-prefixed form. Line breaks inside the title are folded into
/// single spaces so every topic stays on one line.
pub fn format_title(depth: usize, title: &str) -> String {
    let title = single_line(title);
    match depth {
        1 => format!("# {title}"),
        2 => format!("## {title}"),
        3 => format!("**{title}**"),
        4..=MAX_FORMATTED_DEPTH => format!("{}- {title}", INDENT.repeat(depth - 4)),
        _ => format!("{} {title}", "#".repeat(depth)),
    }
}

fn single_line(title: &str) -> String {
    title
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes `topic` and its subtree in pre-order, starting at `depth`.
pub fn write_topic<W: Write>(
    out: &mut W,
    topic: &Topic,
    depth: usize,
    options: &ConvertOptions,
) -> io::Result<()> {
    let title = topic.title.trim();
    if !title.is_empty() {
        writeln!(out, "{}", format_title(depth, title))?;
    }

    if options.include_notes {
        if let Some(note) = topic.note.as_deref().map(str::trim) {
            if !note.is_empty() {
                write!(out, "{note}\n\n")?;
            }
        }
    }

    for child in &topic.children {
        write_topic(out, child, depth + 1, options)?;
    }
    Ok(())
}

/// Renders a whole document, `root` at depth 1.
pub fn render_markdown(root: &Topic, options: &ConvertOptions) -> io::Result<String> {
    let mut buf = Vec::new();
    write_topic(&mut buf, root, 1, options)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
