//! Read-only preview of a whole document
//!
//! Every section becomes a key/value table; rows governed by a field
//! definition are flagged so the editing surface can highlight them. The view
//! is rebuilt from scratch on each change.

use std::fmt::Write as _;
use tracing::debug;

use crate::catalog::{FieldKey, HighlightSet};
use crate::document::Document;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub key: String,
    pub value: String,
    pub highlighted: bool,
}

impl PreviewRow {
    /// Hover text shown in the status bar
    pub fn status_text(&self) -> String {
        format!("{} = {}", self.key, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub name: String,
    pub rows: Vec<PreviewRow>,
}

pub fn render(document: &Document, highlight: &HighlightSet) -> Vec<SectionView> {
    let views: Vec<SectionView> = document
        .sections()
        .map(|section| SectionView {
            name: section.name().to_string(),
            rows: section
                .iter()
                .map(|(key, value)| PreviewRow {
                    key: key.to_string(),
                    value: value.to_string(),
                    highlighted: highlight.contains(&FieldKey::new(section.name(), key)),
                })
                .collect(),
        })
        .collect();

    debug!(sections = views.len(), "Rendered preview");
    views
}

/// Plain-text table; highlighted rows are marked with `*`
pub fn format_table(views: &[SectionView]) -> String {
    let mut out = String::new();
    for view in views {
        let _ = writeln!(out, "[{}]", view.name);
        let width = view.rows.iter().map(|r| r.key.chars().count()).max().unwrap_or(0);
        for row in &view.rows {
            let marker = if row.highlighted { '*' } else { ' ' };
            let _ = writeln!(out, " {marker} {:<width$}  {}", row.key, row.value);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;

    fn highlight(keys: &[(&str, &str)]) -> HighlightSet {
        keys.iter().map(|(s, o)| FieldKey::new(*s, *o)).collect()
    }

    #[test]
    fn test_render_flags_managed_keys() {
        let doc = parse("[NET]\nHOST=a\nPORT=80\n[LOG]\nPORT=1\n").unwrap();
        let views = render(&doc, &highlight(&[("NET", "PORT")]));

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].name, "NET");
        let flags: Vec<_> = views[0].rows.iter().map(|r| (r.key.as_str(), r.highlighted)).collect();
        assert_eq!(flags, vec![("HOST", false), ("PORT", true)]);

        // Same option name in another section is not managed
        assert!(!views[1].rows[0].highlighted);
    }

    #[test]
    fn test_render_highlight_independent_of_order() {
        let a = parse("[X]\none=1\ntwo=2\n[Y]\nthree=3\n").unwrap();
        let b = parse("[Y]\nthree=3\n[X]\ntwo=2\none=1\n").unwrap();
        let set = highlight(&[("X", "two"), ("Y", "three")]);

        let flagged = |views: Vec<SectionView>| {
            let mut keys: Vec<(String, String)> = views
                .iter()
                .flat_map(|v| {
                    v.rows
                        .iter()
                        .filter(|r| r.highlighted)
                        .map(|r| (v.name.clone(), r.key.clone()))
                        .collect::<Vec<_>>()
                })
                .collect();
            keys.sort();
            keys
        };

        assert_eq!(flagged(render(&a, &set)), flagged(render(&b, &set)));
        assert_eq!(flagged(render(&a, &set)).len(), 2);
    }

    #[test]
    fn test_render_highlight_is_case_sensitive() {
        let doc = parse("[NET]\nport=80\n").unwrap();
        let views = render(&doc, &highlight(&[("NET", "PORT")]));
        assert!(!views[0].rows[0].highlighted);
    }

    #[test]
    fn test_render_empty_section() {
        let mut doc = Document::new();
        doc.ensure_section("Empty");
        let views = render(&doc, &HighlightSet::new());
        assert_eq!(views.len(), 1);
        assert!(views[0].rows.is_empty());
    }

    #[test]
    fn test_status_text_and_table() {
        let doc = parse("[NET]\nPORT=80\nHOSTNAME=box\n").unwrap();
        let views = render(&doc, &highlight(&[("NET", "PORT")]));
        assert_eq!(views[0].rows[0].status_text(), "PORT = 80");

        let table = format_table(&views);
        assert_eq!(table, "[NET]\n * PORT      80\n   HOSTNAME  box\n\n");
    }
}
