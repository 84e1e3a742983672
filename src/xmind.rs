//! Reading XMind containers.
//!
//! An `.xmind` file is a ZIP archive. XMind Zen and later store the map in
//! `content.json`; XMind 8 and earlier use `content.xml`. Newer files still
//! ship a placeholder `content.xml`, so the JSON part always wins. Only the
//! first sheet and its attached topics are read.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Deserialize;
use tracing::debug;
use zip::ZipArchive;

use crate::domain::Topic;
use crate::error::{ConvertError, ConvertResult};

const JSON_CONTENT: &str = "content.json";
const XML_CONTENT: &str = "content.xml";

pub fn read_xmind(path: &Path) -> ConvertResult<Topic> {
    let file = File::open(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    read_xmind_from(BufReader::new(file), path)
}

/// Parses a container from any seekable reader. `path` is only used in errors.
pub fn read_xmind_from<R: Read + Seek>(reader: R, path: &Path) -> ConvertResult<Topic> {
    let mut archive = ZipArchive::new(reader).map_err(|source| ConvertError::Archive {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(json) = read_entry(&mut archive, JSON_CONTENT, path)? {
        debug!(path = %path.display(), "parsing {JSON_CONTENT}");
        return parse_content_json(&json, path);
    }
    if let Some(xml) = read_entry(&mut archive, XML_CONTENT, path)? {
        debug!(path = %path.display(), "parsing {XML_CONTENT}");
        return parse_content_xml(&xml, path);
    }
    Err(ConvertError::MissingContent(path.to_path_buf()))
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    path: &Path,
) -> ConvertResult<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(source) => {
            return Err(ConvertError::Archive {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(content))
}

#[derive(Deserialize, Debug)]
struct JsonSheet {
    #[serde(rename = "rootTopic")]
    root_topic: Option<JsonTopic>,
}

#[derive(Deserialize, Debug)]
struct JsonTopic {
    title: Option<String>,
    notes: Option<JsonNotes>,
    children: Option<JsonChildren>,
}

#[derive(Deserialize, Debug)]
struct JsonNotes {
    plain: Option<JsonPlain>,
}

#[derive(Deserialize, Debug)]
struct JsonPlain {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct JsonChildren {
    attached: Option<Vec<JsonTopic>>,
}

impl From<JsonTopic> for Topic {
    fn from(topic: JsonTopic) -> Self {
        Topic {
            title: topic.title.unwrap_or_default(),
            note: topic
                .notes
                .and_then(|notes| notes.plain)
                .and_then(|plain| plain.content),
            children: topic
                .children
                .and_then(|children| children.attached)
                .unwrap_or_default()
                .into_iter()
                .map(Topic::from)
                .collect(),
        }
    }
}

/// Deep maps nest three JSON levels per topic, so serde_json's default
/// recursion limit would cap them at about 42 topics; the stack grows on
/// demand instead.
pub fn parse_content_json(raw: &str, path: &Path) -> ConvertResult<Topic> {
    let json_error = |source| ConvertError::Json {
        path: path.to_path_buf(),
        source,
    };
    let mut de = serde_json::Deserializer::from_str(raw.trim_start_matches('\u{feff}'));
    de.disable_recursion_limit();
    let sheets = Vec::<JsonSheet>::deserialize(serde_stacker::Deserializer::new(&mut de))
        .map_err(json_error)?;
    de.end().map_err(json_error)?;
    sheets
        .into_iter()
        .next()
        .and_then(|sheet| sheet.root_topic)
        .map(Topic::from)
        .ok_or_else(|| ConvertError::EmptyDocument(path.to_path_buf()))
}

#[derive(Default)]
struct TopicDraft {
    title: String,
    note: String,
    children: Vec<Topic>,
}

impl TopicDraft {
    fn finish(self) -> Topic {
        Topic {
            title: self.title,
            note: (!self.note.is_empty()).then_some(self.note),
            children: self.children,
        }
    }
}

enum TextTarget {
    Title,
    Note,
}

/// Builds the topic tree from the element stream of `content.xml`.
///
/// Elements outside the tree we care about (later sheets, detached or
/// summary topic groups) are skipped as whole subtrees.
#[derive(Default)]
struct XmlTreeBuilder {
    elements: Vec<Vec<u8>>,
    drafts: Vec<TopicDraft>,
    root: Option<Topic>,
    skipped_from: Option<usize>,
}

impl XmlTreeBuilder {
    fn open(&mut self, e: &BytesStart) {
        let name = e.local_name().as_ref().to_vec();
        if self.skipped_from.is_none() && !self.accepts(&name, e) {
            self.skipped_from = Some(self.elements.len());
        }
        if self.skipped_from.is_none() && name == b"topic" {
            self.drafts.push(TopicDraft::default());
        }
        self.elements.push(name);
    }

    fn accepts(&self, name: &[u8], e: &BytesStart) -> bool {
        let parent = self.elements.last().map(Vec::as_slice);
        match name {
            b"sheet" => self.root.is_none(),
            b"topics" => is_attached_group(e),
            b"topic" => matches!(parent, Some(b"sheet") | Some(b"topics")),
            _ => true,
        }
    }

    fn close(&mut self) {
        let Some(name) = self.elements.pop() else {
            return;
        };
        match self.skipped_from {
            Some(depth) if depth == self.elements.len() => {
                self.skipped_from = None;
                return;
            }
            Some(_) => return,
            None => {}
        }
        if name != b"topic" {
            return;
        }
        if let Some(draft) = self.drafts.pop() {
            let topic = draft.finish();
            match self.drafts.last_mut() {
                Some(parent) => parent.children.push(topic),
                None => {
                    if self.root.is_none() {
                        self.root = Some(topic);
                    }
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.skipped_from.is_some() {
            return;
        }
        let target = if self.path_ends_with(&[b"topic", b"title"]) {
            TextTarget::Title
        } else if self.path_ends_with(&[b"topic", b"notes", b"plain"]) {
            TextTarget::Note
        } else {
            return;
        };
        if let Some(draft) = self.drafts.last_mut() {
            match target {
                TextTarget::Title => draft.title.push_str(text),
                TextTarget::Note => draft.note.push_str(text),
            }
        }
    }

    fn path_ends_with(&self, tail: &[&[u8]]) -> bool {
        self.elements.len() >= tail.len()
            && self.elements[self.elements.len() - tail.len()..]
                .iter()
                .zip(tail)
                .all(|(element, expected)| element.as_slice() == *expected)
    }
}

fn is_attached_group(e: &BytesStart) -> bool {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"type" {
            return attr.value.as_ref() == b"attached";
        }
    }
    true
}

pub fn parse_content_xml(raw: &str, path: &Path) -> ConvertResult<Topic> {
    let xml_error = |reason: String| ConvertError::Xml {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = Reader::from_str(raw);
    let mut buf = Vec::new();
    let mut builder = XmlTreeBuilder::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => builder.open(e),
            Ok(Event::Empty(ref e)) => {
                builder.open(e);
                builder.close();
            }
            Ok(Event::End(_)) => builder.close(),
            Ok(Event::Text(ref t)) => builder.text(&String::from_utf8_lossy(t)),
            Ok(Event::CData(ref c)) => builder.text(&String::from_utf8_lossy(c)),
            Ok(Event::GeneralRef(ref r)) => {
                let name = String::from_utf8_lossy(r);
                let resolved = match r.resolve_char_ref() {
                    Ok(Some(ch)) => ch.to_string(),
                    Ok(None) => match quick_xml::escape::resolve_predefined_entity(&name) {
                        Some(value) => value.to_string(),
                        None => format!("&{name};"),
                    },
                    Err(e) => return Err(xml_error(e.to_string())),
                };
                builder.text(&resolved);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(xml_error(format!(
                    "{e} at byte {}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    if !builder.elements.is_empty() {
        return Err(xml_error("unexpected end of document".to_string()));
    }
    builder
        .root
        .ok_or_else(|| ConvertError::EmptyDocument(path.to_path_buf()))
}
