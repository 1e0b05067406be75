//! Debian Control File reader and writer.

use crate::error::{IndexError, Result};

/// One DCF record: an ordered list of `Field: value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DcfRecord {
    fields: Vec<(String, String)>,
}

impl DcfRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field value by name (case-sensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a field, replacing an existing value in place or appending.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Iterate over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy only the named fields, in the order given.
    pub fn project(&self, names: &[&str]) -> DcfRecord {
        let mut out = DcfRecord::new();
        for name in names {
            if let Some(value) = self.get(name) {
                out.insert(*name, value);
            }
        }
        out
    }
}

fn is_field_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '@' | '/'))
}

/// Parse a DCF document into records.
///
/// Records are separated by blank lines. Continuation lines (starting with
/// whitespace) are folded into the previous field with a single space.
pub fn parse_dcf(text: &str) -> Result<Vec<DcfRecord>> {
    let mut records = Vec::new();
    let mut current = DcfRecord::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            let Some((_, value)) = current.fields.last_mut() else {
                return Err(IndexError::MalformedDcf {
                    line: line_no,
                    detail: "continuation line without a field".to_string(),
                });
            };
            let extra = line.trim();
            // A lone "." marks an empty line inside a folded value.
            if extra != "." {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(extra);
            }
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(IndexError::MalformedDcf {
                line: line_no,
                detail: format!("expected 'Field: value', got '{line}'"),
            });
        };
        if !is_field_name(name) {
            return Err(IndexError::MalformedDcf {
                line: line_no,
                detail: format!("invalid field name '{name}'"),
            });
        }
        current.fields.push((name.to_string(), value.trim().to_string()));
    }

    if !current.is_empty() {
        records.push(current);
    }
    Ok(records)
}

/// Render records as a DCF document, one blank line between records.
pub fn write_dcf(records: &[DcfRecord]) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for (name, value) in record.iter() {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_multiple_records() {
        let text = "Package: alpha\nVersion: 1.0\n\nPackage: beta\nVersion: 0.2-1\nLicense: MIT\n";
        let records = parse_dcf(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Package"), Some("alpha"));
        assert_eq!(records[1].get("Version"), Some("0.2-1"));
        assert_eq!(records[1].get("License"), Some("MIT"));
        assert_eq!(records[0].get("License"), None);
    }

    #[test]
    fn continuation_lines_are_folded() {
        let text = "Package: gamma\nDepends: R (>= 3.5.0),\n    methods,\n\tutils\nDescription: First.\n .\n Second.\n";
        let records = parse_dcf(text).unwrap();
        assert_eq!(records[0].get("Depends"), Some("R (>= 3.5.0), methods, utils"));
        assert_eq!(records[0].get("Description"), Some("First. Second."));
    }

    #[test]
    fn extra_blank_lines_and_crlf() {
        let text = "\r\n\r\nPackage: a\r\nVersion: 1\r\n\r\n\r\n\r\nPackage: b\r\nVersion: 2\r\n";
        let records = parse_dcf(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("Package"), Some("b"));
    }

    #[test]
    fn reject_line_without_colon() {
        let err = parse_dcf("Package: a\nnonsense\n").unwrap_err();
        assert!(matches!(err, IndexError::MalformedDcf { line: 2, .. }));
    }

    #[test]
    fn reject_leading_continuation() {
        assert!(parse_dcf("  floating\n").is_err());
    }

    #[test]
    fn write_separates_records_with_blank_line() {
        let mut a = DcfRecord::new();
        a.insert("Package", "a");
        a.insert("Version", "1.0");
        let mut b = DcfRecord::new();
        b.insert("Package", "b");
        b.insert("Version", "2.0");

        let text = write_dcf(&[a.clone(), b]);
        assert_eq!(text, "Package: a\nVersion: 1.0\n\nPackage: b\nVersion: 2.0\n");
        assert_eq!(parse_dcf(&text).unwrap()[0], a);
    }

    #[test]
    fn insert_replaces_in_place_and_project_filters() {
        let mut r = DcfRecord::new();
        r.insert("Package", "a");
        r.insert("Title", "Thing");
        r.insert("Version", "1");
        r.insert("Package", "b");
        assert_eq!(r.len(), 3);
        assert_eq!(r.iter().next(), Some(("Package", "b")));

        let p = r.project(&["Version", "Package", "Depends"]);
        let names: Vec<_> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Version", "Package"]);
    }

    #[test]
    fn empty_document() {
        assert!(parse_dcf("").unwrap().is_empty());
        assert_eq!(write_dcf(&[]), "");
    }
}
