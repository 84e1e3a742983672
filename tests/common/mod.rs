#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;

/// Writes a ZIP container holding the given parts.
pub fn write_container(path: &Path, parts: &[(&str, &str)]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, body) in parts {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

/// An XMind Zen style file with a single sheet whose root topic is `root`.
pub fn write_json_map(path: &Path, root: &str) {
    let content = format!(r#"[{{"id":"sheet","class":"sheet","rootTopic":{root}}}]"#);
    write_container(path, &[("content.json", &content)]);
}

pub const PLAN_JSON: &str = r#"{
  "title": "Plan",
  "children": { "attached": [
    { "title": "Step 1", "children": { "attached": [ { "title": "Detail" } ] } }
  ] }
}"#;

pub const PLAN_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xmap-content xmlns="urn:xmind:xmap:xmlns:content:2.0" version="2.0">
  <sheet id="s1">
    <topic id="root"><title>Plan</title>
      <children><topics type="attached">
        <topic id="t1"><title>Step 1</title>
          <children><topics type="attached">
            <topic id="t2"><title>Detail</title></topic>
          </topics></children>
        </topic>
      </topics></children>
    </topic>
    <title>Sheet 1</title>
  </sheet>
</xmap-content>"#;

pub const PLAN_MARKDOWN: &str = "# Plan\n## Step 1\n**Detail**\n";

/// A root with a chain of `depth - 1` descendants titled `L1`..`L<depth>`.
pub fn chain_json(depth: usize) -> String {
    let mut topic = format!(r#"{{"title":"L{depth}"}}"#);
    for level in (1..depth).rev() {
        topic = format!(r#"{{"title":"L{level}","children":{{"attached":[{topic}]}}}}"#);
    }
    topic
}
