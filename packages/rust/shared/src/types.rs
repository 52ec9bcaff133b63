//! Core domain types for Paperform documents.

use serde::{Deserialize, Serialize};

use crate::error::PaperformError;

// ---------------------------------------------------------------------------
// CitationStyle
// ---------------------------------------------------------------------------

/// A supported academic citation/formatting convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    Mla,
    Apa,
    Chicago,
    Harvard,
    Ieee,
}

impl CitationStyle {
    /// All supported styles, in display order.
    pub const ALL: [CitationStyle; 5] = [
        Self::Mla,
        Self::Apa,
        Self::Chicago,
        Self::Harvard,
        Self::Ieee,
    ];

    /// Canonical lowercase identifier (config values, filenames).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mla => "mla",
            Self::Apa => "apa",
            Self::Chicago => "chicago",
            Self::Harvard => "harvard",
            Self::Ieee => "ieee",
        }
    }
}

impl std::fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CitationStyle {
    type Err = PaperformError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mla" => Ok(Self::Mla),
            "apa" => Ok(Self::Apa),
            "chicago" => Ok(Self::Chicago),
            "harvard" => Ok(Self::Harvard),
            "ieee" => Ok(Self::Ieee),
            other => Err(PaperformError::UnknownStyle { name: other.into() }),
        }
    }
}

// ---------------------------------------------------------------------------
// DocumentMetadata
// ---------------------------------------------------------------------------

/// User-supplied document metadata. All fields are free-form and optional;
/// a style decides which of them its title page requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Named metadata fields, used by style rules to declare title-page
/// requirements and by the assembler for placeholder substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Author,
    Title,
    Course,
    Instructor,
    DueDate,
}

impl MetadataField {
    /// Field name as it appears in placeholders and flag labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Title => "title",
            Self::Course => "course",
            Self::Instructor => "instructor",
            Self::DueDate => "due date",
        }
    }
}

impl DocumentMetadata {
    /// Look up a field value by name.
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        let value = match field {
            MetadataField::Author => &self.author,
            MetadataField::Title => &self.title,
            MetadataField::Course => &self.course,
            MetadataField::Instructor => &self.instructor,
            MetadataField::DueDate => &self.due_date,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Citation
// ---------------------------------------------------------------------------

/// The shape of an extracted in-text citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationKind {
    /// `(Author Page)` or `(Author, Year)` style reference.
    AuthorYear,
    /// `[1]`-style numbered reference.
    Numbered,
    /// A quoted title with no author information.
    Title,
}

/// How a citation was delimited in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationDelimiter {
    Parentheses,
    Brackets,
    /// Bare `Author Year` reference with no enclosing delimiter.
    Inline,
}

/// A single in-text citation extracted from document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Raw citation text as matched (without enclosing brackets).
    pub text: String,
    pub kind: CitationKind,
    /// Delimiter the citation was extracted from. Rewriting only touches
    /// this spelling, so unrelated text with the same characters survives.
    pub delimiter: CitationDelimiter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Sequence number for numbered (IEEE) references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// Byte offset of the match within the document.
    pub position: usize,
}

// ---------------------------------------------------------------------------
// Missing information
// ---------------------------------------------------------------------------

/// Where a missing-information flag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagOrigin {
    /// Deterministic structure analysis of the input document.
    Analysis,
    /// Reported by the external model.
    Model,
    /// A title-page field the style requires but metadata lacks.
    Metadata,
}

/// A flag indicating information the chosen style requires but the
/// document lacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingInfo {
    pub label: String,
    pub origin: FlagOrigin,
}

impl MissingInfo {
    pub fn analysis(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            origin: FlagOrigin::Analysis,
        }
    }

    pub fn model(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            origin: FlagOrigin::Model,
        }
    }

    pub fn metadata(field: MetadataField) -> Self {
        Self {
            label: format!("Title page field: {}", field.as_str()),
            origin: FlagOrigin::Metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// FormattedDocument
// ---------------------------------------------------------------------------

/// The assembled output: final document text plus flagged missing
/// information. Produced once per request; never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedDocument {
    /// Full formatted text: title page, body, works cited, flag footer.
    pub text: String,
    /// Ordered, deduplicated missing-information markers.
    pub missing: Vec<MissingInfo>,
    /// Style used, recorded for the artifact filename.
    pub style: CitationStyle,
}

impl FormattedDocument {
    /// Suggested filename for the downloaded artifact.
    pub fn suggested_filename(&self) -> String {
        format!("formatted_document_{}.txt", self.style)
    }
}
