// Ground-truth plagiarism annotations.
//
// Training mode needs to know, per suspicious document, which source
// documents the corpus annotates as plagiarized. The PAN corpora ship this
// as one XML file next to each suspicious text:
//
//   <feature name="plagiarism" ... source_reference="source-document02176.txt"
//            this_offset="128" this_length="2503"
//            source_offset="111" source_length="2466" ... />
//
// The pipeline only consumes the trait below; the bundled reader pulls the
// attributes it needs out of the `<feature>` tags with regex-lite rather
// than a full XML parser — the annotation files are flat, attribute-only
// documents.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex_lite::Regex;

use crate::error::{CribError, Result};

/// One annotated plagiarism passage in a suspicious document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlagiarismRef {
    /// File name of the plagiarized source document.
    pub source_file: String,
    pub this_offset: Option<u64>,
    pub this_length: Option<u64>,
    pub source_offset: Option<u64>,
    pub source_length: Option<u64>,
}

/// Where the scoring pipeline gets ground-truth references from.
///
/// The seam exists so tests (and alternative corpus formats) can stand in
/// for the XML reader.
pub trait AnnotationSource: Send + Sync {
    /// All plagiarism references recorded for the suspicious document whose
    /// annotation file lives at `xml`.
    fn plagiarized_refs(&self, xml: &Path) -> Result<Vec<PlagiarismRef>>;
}

/// Reader for PAN-style XML annotation files.
pub struct XmlAnnotations {
    feature_tag: Regex,
    attribute: Regex,
}

impl XmlAnnotations {
    pub fn new() -> Self {
        Self {
            // Literal patterns, compilation cannot fail.
            feature_tag: Regex::new(r"<feature\b[^>]*>").expect("feature tag pattern"),
            attribute: Regex::new(r#"([a-zA-Z_]+)\s*=\s*"([^"]*)""#).expect("attribute pattern"),
        }
    }

    /// Parse the plagiarism features out of raw XML text.
    pub fn parse(&self, xml: &str) -> Vec<PlagiarismRef> {
        let mut refs = Vec::new();
        for tag in self.feature_tag.find_iter(xml) {
            let attrs: HashMap<&str, &str> = self
                .attribute
                .captures_iter(tag.as_str())
                .map(|cap| {
                    let key = cap.get(1).map_or("", |m| m.as_str());
                    let value = cap.get(2).map_or("", |m| m.as_str());
                    (key, value)
                })
                .collect();

            if attrs.get("name") != Some(&"plagiarism") {
                continue;
            }
            let Some(source_file) = attrs.get("source_reference") else {
                continue;
            };
            refs.push(PlagiarismRef {
                source_file: source_file.to_string(),
                this_offset: parse_attr(&attrs, "this_offset"),
                this_length: parse_attr(&attrs, "this_length"),
                source_offset: parse_attr(&attrs, "source_offset"),
                source_length: parse_attr(&attrs, "source_length"),
            });
        }
        refs
    }
}

impl Default for XmlAnnotations {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationSource for XmlAnnotations {
    fn plagiarized_refs(&self, xml: &Path) -> Result<Vec<PlagiarismRef>> {
        if !xml.exists() {
            return Err(CribError::FileNotFound(xml.to_path_buf()));
        }
        let text = fs::read_to_string(xml)?;
        Ok(self.parse(&text))
    }
}

fn parse_attr(attrs: &HashMap<&str, &str>, key: &str) -> Option<u64> {
    attrs.get(key).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<document reference="suspicious-document00007.txt">
  <feature name="about" authors="unknown" />
  <feature name="plagiarism" type="artificial" obfuscation="none"
           this_language="en" this_offset="128" this_length="2503"
           source_reference="source-document02176.txt" source_language="en"
           source_offset="111" source_length="2466" />
  <feature name="plagiarism" source_reference="source-document00004.txt"
           this_offset="9000" this_length="120"
           source_offset="40" source_length="118" />
</document>
"#;

    #[test]
    fn test_parses_plagiarism_features_only() {
        let refs = XmlAnnotations::new().parse(SAMPLE);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].source_file, "source-document02176.txt");
        assert_eq!(refs[0].this_offset, Some(128));
        assert_eq!(refs[0].source_length, Some(2466));
        assert_eq!(refs[1].source_file, "source-document00004.txt");
    }

    #[test]
    fn test_document_without_annotations() {
        let refs = XmlAnnotations::new()
            .parse(r#"<document reference="suspicious-document00001.txt"></document>"#);
        assert!(refs.is_empty());
    }
}
