//! The citation style table.
//!
//! One immutable [`StyleRule`] per supported style, defined once and looked
//! up by [`CitationStyle`]. Pure table indexing — no algorithm beyond that.

use paperform_shared::{CitationStyle, MetadataField, PaperformError, Result};

/// How in-text citations are rendered for a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InTextPattern {
    /// MLA: `(Author Page)`.
    AuthorPage,
    /// APA/Harvard: `(Author, Year)` (APA appends `p. N` when present).
    AuthorYear,
    /// Chicago: `(Author Year p. N)`.
    AuthorYearPage,
    /// IEEE: `[n]`.
    Numbered,
}

/// Ordering of entries in the works-cited section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Alphabetical by author surname, case-insensitive; unknown authors last.
    AuthorSurname,
    /// First-appearance order, entries numbered `[1]`, `[2]`, ...
    CitationOrder,
}

/// Fields of a works-cited entry, in the order a style emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationField {
    Author,
    Year,
    Title,
    Source,
    Page,
}

/// Formatting rules for a single academic style. Immutable; defined once
/// at process start via [`style_rule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub style: CitationStyle,
    /// Human-readable style name (e.g. "Modern Language Association").
    pub display_name: &'static str,
    pub margins: &'static str,
    pub spacing: &'static str,
    pub font: &'static str,
    /// Page-header convention described to the model and shown in `styles`.
    pub header: &'static str,
    pub paragraph_indent: &'static str,
    pub quote_rule: &'static str,
    /// In-text citation rendering.
    pub in_text: InTextPattern,
    /// Heading of the bibliography section ("Works Cited", "References", ...).
    pub works_cited_heading: &'static str,
    /// Field order for works-cited entries.
    pub field_order: &'static [CitationField],
    pub sort_key: SortKey,
    /// Metadata fields the title page requires.
    pub title_page_fields: &'static [MetadataField],
    /// Whether the style expects an abstract section.
    pub expects_abstract: bool,
    /// Whether the title page carries a running head (APA).
    pub running_head: bool,
}

const TITLE_PAGE_FULL: &[MetadataField] = &[
    MetadataField::Title,
    MetadataField::Author,
    MetadataField::Course,
    MetadataField::Instructor,
    MetadataField::DueDate,
];

static MLA: StyleRule = StyleRule {
    style: CitationStyle::Mla,
    display_name: "MLA (Modern Language Association)",
    margins: "1 inch on all sides",
    spacing: "Double-spaced",
    font: "Times New Roman, 12pt",
    header: "Last name and page number",
    paragraph_indent: "0.5 inch for paragraphs",
    quote_rule: "Double quotes for short quotes, block quotes for 4+ lines",
    in_text: InTextPattern::AuthorPage,
    works_cited_heading: "Works Cited",
    field_order: &[
        CitationField::Author,
        CitationField::Title,
        CitationField::Source,
        CitationField::Year,
        CitationField::Page,
    ],
    sort_key: SortKey::AuthorSurname,
    title_page_fields: TITLE_PAGE_FULL,
    expects_abstract: false,
    running_head: false,
};

static APA: StyleRule = StyleRule {
    style: CitationStyle::Apa,
    display_name: "APA (American Psychological Association)",
    margins: "1 inch on all sides",
    spacing: "Double-spaced",
    font: "Times New Roman, 12pt",
    header: "Running head with title",
    paragraph_indent: "0.5 inch for paragraphs",
    quote_rule: "Double quotes for short quotes, block quotes for 40+ words",
    in_text: InTextPattern::AuthorYear,
    works_cited_heading: "References",
    field_order: &[
        CitationField::Author,
        CitationField::Year,
        CitationField::Title,
        CitationField::Source,
        CitationField::Page,
    ],
    sort_key: SortKey::AuthorSurname,
    title_page_fields: TITLE_PAGE_FULL,
    expects_abstract: true,
    running_head: true,
};

static CHICAGO: StyleRule = StyleRule {
    style: CitationStyle::Chicago,
    display_name: "Chicago",
    margins: "1 inch on all sides",
    spacing: "Double-spaced",
    font: "Times New Roman, 12pt",
    header: "Page number in header",
    paragraph_indent: "0.5 inch for paragraphs",
    quote_rule: "Double quotes for short quotes, block quotes for 5+ lines",
    in_text: InTextPattern::AuthorYearPage,
    works_cited_heading: "Bibliography",
    field_order: &[
        CitationField::Author,
        CitationField::Title,
        CitationField::Source,
        CitationField::Year,
        CitationField::Page,
    ],
    sort_key: SortKey::AuthorSurname,
    title_page_fields: TITLE_PAGE_FULL,
    expects_abstract: false,
    running_head: false,
};

static HARVARD: StyleRule = StyleRule {
    style: CitationStyle::Harvard,
    display_name: "Harvard",
    margins: "1 inch on all sides",
    spacing: "Double-spaced",
    font: "Times New Roman, 12pt",
    header: "Page number in header",
    paragraph_indent: "0.5 inch for paragraphs",
    quote_rule: "Single quotes for short quotes, block quotes for 30+ words",
    in_text: InTextPattern::AuthorYear,
    works_cited_heading: "Reference List",
    field_order: &[
        CitationField::Author,
        CitationField::Year,
        CitationField::Title,
        CitationField::Source,
    ],
    sort_key: SortKey::AuthorSurname,
    title_page_fields: TITLE_PAGE_FULL,
    expects_abstract: false,
    running_head: false,
};

static IEEE: StyleRule = StyleRule {
    style: CitationStyle::Ieee,
    display_name: "IEEE",
    margins: "1 inch on all sides",
    spacing: "Single-spaced",
    font: "Times New Roman, 10pt",
    header: "Title and page number",
    paragraph_indent: "0.5 inch for paragraphs",
    quote_rule: "Double quotes for short quotes, block quotes for 40+ words",
    in_text: InTextPattern::Numbered,
    works_cited_heading: "References",
    field_order: &[
        CitationField::Author,
        CitationField::Title,
        CitationField::Source,
        CitationField::Year,
        CitationField::Page,
    ],
    sort_key: SortKey::CitationOrder,
    title_page_fields: &[MetadataField::Title, MetadataField::Author],
    expects_abstract: true,
    running_head: false,
};

/// Return the rule table entry for a style.
pub fn style_rule(style: CitationStyle) -> &'static StyleRule {
    match style {
        CitationStyle::Mla => &MLA,
        CitationStyle::Apa => &APA,
        CitationStyle::Chicago => &CHICAGO,
        CitationStyle::Harvard => &HARVARD,
        CitationStyle::Ieee => &IEEE,
    }
}

/// Look up a rule by style identifier. Fails with `UnknownStyle` for
/// unrecognized identifiers.
pub fn lookup(name: &str) -> Result<&'static StyleRule> {
    let style: CitationStyle = name
        .parse()
        .map_err(|_| PaperformError::UnknownStyle { name: name.into() })?;
    Ok(style_rule(style))
}

impl StyleRule {
    /// One-paragraph rule summary handed to the external model so the
    /// restructured text matches the style's conventions.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} margins; {}; {}; header: {}; paragraph indent {}; {}; \
             in-text citations {}; bibliography section titled \"{}\"{}",
            self.display_name,
            self.margins,
            self.spacing,
            self.font,
            self.header,
            self.paragraph_indent,
            self.quote_rule,
            match self.in_text {
                InTextPattern::AuthorPage => "as (Author Page)",
                InTextPattern::AuthorYear => "as (Author, Year)",
                InTextPattern::AuthorYearPage => "as (Author Year p. N)",
                InTextPattern::Numbered => "as numbered brackets [n]",
            },
            self.works_cited_heading,
            if self.expects_abstract {
                "; abstract expected"
            } else {
                ""
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_style_has_a_fully_populated_rule() {
        for style in CitationStyle::ALL {
            let rule = style_rule(style);
            assert_eq!(rule.style, style);
            assert!(!rule.display_name.is_empty());
            assert!(!rule.margins.is_empty());
            assert!(!rule.spacing.is_empty());
            assert!(!rule.font.is_empty());
            assert!(!rule.works_cited_heading.is_empty());
            assert!(!rule.field_order.is_empty());
            assert!(!rule.title_page_fields.is_empty());
        }
    }

    #[test]
    fn lookup_by_identifier() {
        assert_eq!(lookup("apa").unwrap().works_cited_heading, "References");
        assert_eq!(lookup("MLA").unwrap().works_cited_heading, "Works Cited");
        assert_eq!(
            lookup("chicago").unwrap().works_cited_heading,
            "Bibliography"
        );
    }

    #[test]
    fn unknown_style_lookup_fails() {
        let err = lookup("vancouver").unwrap_err();
        assert!(matches!(err, PaperformError::UnknownStyle { .. }));
    }

    #[test]
    fn ieee_is_citation_ordered_and_single_spaced() {
        let rule = style_rule(CitationStyle::Ieee);
        assert_eq!(rule.sort_key, SortKey::CitationOrder);
        assert_eq!(rule.in_text, InTextPattern::Numbered);
        assert_eq!(rule.spacing, "Single-spaced");
    }

    #[test]
    fn only_apa_has_running_head() {
        for style in CitationStyle::ALL {
            let rule = style_rule(style);
            assert_eq!(rule.running_head, style == CitationStyle::Apa);
        }
    }

    #[test]
    fn summary_mentions_heading() {
        let summary = style_rule(CitationStyle::Harvard).summary();
        assert!(summary.contains("Reference List"));
        assert!(summary.contains("Double-spaced"));
    }
}
