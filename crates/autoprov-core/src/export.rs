//! Print/export documents.
//!
//! A [`Document`] is a read-only rendering of a draft, grouped into numbered
//! sections of rows, checks and free-text paragraphs. It is produced by a pure
//! transform of the draft and carries no interaction.

use std::fmt;

const LABEL_WIDTH: usize = 34;
const EMPTY_VALUE: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Row { label: String, value: String },
    Check { label: String, checked: bool },
    Paragraph { label: String, text: String },
    Numbered(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub lines: Vec<Line>,
}

impl Section {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            lines: Vec::new(),
        }
    }

    /// Add a labelled value. Blank values render as a dash.
    pub fn row(mut self, label: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        let value = if value.trim().is_empty() {
            EMPTY_VALUE.to_string()
        } else {
            value
        };
        self.lines.push(Line::Row {
            label: label.to_string(),
            value,
        });
        self
    }

    pub fn check(mut self, label: &str, checked: bool) -> Self {
        self.lines.push(Line::Check {
            label: label.to_string(),
            checked,
        });
        self
    }

    /// Add a block of free text. Skipped when the text is blank.
    pub fn paragraph(mut self, label: &str, text: &str) -> Self {
        if !text.trim().is_empty() {
            self.lines.push(Line::Paragraph {
                label: label.to_string(),
                text: text.to_string(),
            });
        }
        self
    }

    pub fn numbered(mut self, items: &[String]) -> Self {
        if !items.is_empty() {
            self.lines.push(Line::Numbered(items.to_vec()));
        }
        self
    }

    /// Value of the first row with this label.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Row { label: l, value } if l == label => Some(value.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub subtitle: String,
    /// Draft identifier shown in the header and footer.
    pub reference: String,
    /// Date the document was produced, `YYYY-MM-DD`.
    pub generated_on: String,
    pub sections: Vec<Section>,
    pub footer: String,
}

impl Document {
    pub fn new(title: impl Into<String>, reference: impl Into<String>, generated_on: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: String::new(),
            reference: reference.into(),
            generated_on: generated_on.into(),
            sections: Vec::new(),
            footer: String::new(),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Find a section by heading.
    pub fn find(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.title)?;
        if !self.subtitle.is_empty() {
            writeln!(f, "{}", self.subtitle)?;
        }
        writeln!(f, "Reference: {}  ·  Generated: {}", self.reference, self.generated_on)?;
        writeln!(f)?;

        for section in &self.sections {
            writeln!(f, "{}", section.heading)?;
            for line in &section.lines {
                match line {
                    Line::Row { label, value } => {
                        writeln!(f, "  {:<width$} {}", label, value, width = LABEL_WIDTH)?
                    }
                    Line::Check { label, checked } => {
                        writeln!(f, "  [{}] {}", if *checked { "x" } else { " " }, label)?
                    }
                    Line::Paragraph { label, text } => {
                        writeln!(f, "  {label}:")?;
                        for l in text.lines() {
                            writeln!(f, "    {l}")?;
                        }
                    }
                    Line::Numbered(items) => {
                        for (i, item) in items.iter().enumerate() {
                            writeln!(f, "  {}. {}", i + 1, item)?;
                        }
                    }
                }
            }
            writeln!(f)?;
        }

        if !self.footer.is_empty() {
            writeln!(f, "{}", self.footer)?;
        }
        Ok(())
    }
}

/// Suggested print filename: `<stem>_<key>_<date>`.
///
/// Key and date keep only ASCII letters, digits, `_` and `-`, so the result is
/// always a single path component. A key left blank becomes `placeholder`.
pub fn suggested_filename(stem: &str, key_field: &str, placeholder: &str, date: &str) -> String {
    let key = filename_safe(key_field);
    let key = if key.is_empty() { placeholder.to_string() } else { key };
    match filename_safe(date) {
        date if date.is_empty() => format!("{stem}_{key}"),
        date => format!("{stem}_{key}_{date}"),
    }
}

fn filename_safe(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .collect()
}

pub fn yes_no(v: bool) -> &'static str {
    if v { "Yes" } else { "No" }
}

/// Format a whole number with thousands separators, e.g. `45,120`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_strips_whitespace() {
        assert_eq!(
            suggested_filename("Dispute_Response", "AB12 CDE", "VEHICLE", "2026-10-19"),
            "Dispute_Response_AB12CDE_2026-10-19"
        );
    }

    #[test]
    fn filename_placeholder_when_blank() {
        assert_eq!(
            suggested_filename("Distance_Sale_Pack", "  ", "UNKNOWN", "2026-10-19"),
            "Distance_Sale_Pack_UNKNOWN_2026-10-19"
        );
    }

    #[test]
    fn filename_drops_path_separators() {
        assert_eq!(
            suggested_filename("Distance_Sale_Pack", "../AB12", "UNKNOWN", "19/10/2026"),
            "Distance_Sale_Pack_AB12_19102026"
        );
        assert_eq!(
            suggested_filename("PDI_Report", "/", "VEHICLE", "..\\"),
            "PDI_Report_VEHICLE"
        );
    }

    #[test]
    fn blank_rows_render_dash() {
        let s = Section::new("Vehicle").row("VIN", "  ");
        assert_eq!(s.value("VIN"), Some("—"));
    }

    #[test]
    fn blank_paragraphs_are_skipped() {
        let s = Section::new("Notes").paragraph("Additional Notes", "");
        assert!(s.lines.is_empty());
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(45_120), "45,120");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn renders_sections_in_order() {
        let doc = Document::new("Pack", "DSS-1", "2026-10-19")
            .section(Section::new("1. Dealer").row("Business Name", "Acme Motors"))
            .section(Section::new("2. Checks").check("Inspected", true).check("Keys", false))
            .footer("end");
        let text = doc.to_string();
        let dealer = text.find("1. Dealer").unwrap();
        let checks = text.find("2. Checks").unwrap();
        assert!(dealer < checks);
        assert!(text.contains("[x] Inspected"));
        assert!(text.contains("[ ] Keys"));
        assert!(text.starts_with("=== Pack ==="));
        assert!(text.trim_end().ends_with("end"));
    }
}
