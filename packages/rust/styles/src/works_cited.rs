//! Works-cited / references section generation.
//!
//! Builds one entry per distinct citation in the style's field order and
//! punctuation, sorted per the style's sort key: alphabetical by author
//! surname for the author-keyed styles, first-appearance order with `[n]`
//! numbering for IEEE. Repeated MLA authors collapse to `---.`.

use paperform_shared::Citation;

use crate::extract::number_citations;
use crate::rules::{SortKey, StyleRule};

const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Generate the works-cited section (heading plus entries) for a style.
/// Returns an empty string when there are no citations.
pub fn generate_works_cited(citations: &[Citation], rule: &StyleRule) -> String {
    let entries = distinct_citations(citations);
    if entries.is_empty() {
        return String::new();
    }

    let ordered = match rule.sort_key {
        SortKey::AuthorSurname => sort_by_surname(entries),
        SortKey::CitationOrder => {
            // Callers normally number citations before rendering; cover
            // un-numbered input here rather than emitting a bogus index.
            let mut entries = entries;
            number_citations(&mut entries);
            entries
        }
    };

    let mut out = format!("{}\n\n", rule.works_cited_heading);
    let mut previous_author: Option<String> = None;

    for (index, citation) in ordered.iter().enumerate() {
        let entry = match rule.style {
            paperform_shared::CitationStyle::Mla => {
                let author = display_author(citation);
                let repeated = previous_author.as_deref() == Some(author.as_str());
                previous_author = Some(author.clone());
                mla_entry(citation, &author, repeated)
            }
            paperform_shared::CitationStyle::Apa => apa_entry(citation),
            paperform_shared::CitationStyle::Chicago => chicago_entry(citation),
            paperform_shared::CitationStyle::Harvard => harvard_entry(citation),
            paperform_shared::CitationStyle::Ieee => {
                let number = citation.number.unwrap_or(index as u32 + 1);
                ieee_entry(citation, number)
            }
        };
        out.push_str(&entry);
        out.push_str("\n\n");
    }

    out
}

/// Drop repeated citations (same raw text), keeping first-appearance order.
fn distinct_citations(citations: &[Citation]) -> Vec<Citation> {
    let mut seen = std::collections::HashSet::new();
    citations
        .iter()
        .filter(|c| seen.insert(c.text.clone()))
        .cloned()
        .collect()
}

/// Sort by author surname, case-insensitive; unknown authors last.
fn sort_by_surname(mut entries: Vec<Citation>) -> Vec<Citation> {
    entries.sort_by_key(|c| {
        let surname = c
            .author
            .as_deref()
            .and_then(|a| a.split_whitespace().last())
            .map(|s| s.trim_end_matches(',').to_ascii_lowercase());
        (surname.is_none(), surname, c.position)
    });
    entries
}

fn display_author(citation: &Citation) -> String {
    citation
        .author
        .clone()
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

// Entry renderers. Segments are joined with spaces; `finalize` repairs a
// dangling comma when an optional trailing field is absent.

fn mla_entry(citation: &Citation, author: &str, repeated: bool) -> String {
    let mut segments = vec![if repeated {
        "---.".to_string()
    } else {
        format!("{author}.")
    }];
    if let Some(title) = &citation.title {
        segments.push(format!("\"{title}.\""));
    }
    if let Some(source) = &citation.source {
        segments.push(format!("{source},"));
    }
    if let Some(year) = &citation.year {
        segments.push(format!("{year},"));
    }
    if let Some(page) = &citation.page {
        segments.push(format!("p. {page}."));
    }
    finalize(segments)
}

fn apa_entry(citation: &Citation) -> String {
    let mut segments = vec![format!("{}.", display_author(citation))];
    if let Some(year) = &citation.year {
        segments.push(format!("({year})."));
    }
    if let Some(title) = &citation.title {
        segments.push(format!("{title}."));
    }
    if let Some(source) = &citation.source {
        segments.push(format!("{source}."));
    }
    if let Some(page) = &citation.page {
        segments.push(format!("p. {page}."));
    }
    finalize(segments)
}

fn chicago_entry(citation: &Citation) -> String {
    let mut segments = vec![format!("{}.", display_author(citation))];
    if let Some(title) = &citation.title {
        segments.push(format!("\"{title}.\""));
    }
    if let Some(source) = &citation.source {
        segments.push(format!("{source},"));
    }
    if let Some(year) = &citation.year {
        segments.push(format!("{year}."));
    }
    if let Some(page) = &citation.page {
        segments.push(format!("{page}."));
    }
    finalize(segments)
}

fn harvard_entry(citation: &Citation) -> String {
    let mut segments = vec![format!("{}.", display_author(citation))];
    if let Some(year) = &citation.year {
        segments.push(format!("({year})."));
    }
    if let Some(title) = &citation.title {
        segments.push(format!("{title}."));
    }
    if let Some(source) = &citation.source {
        segments.push(format!("{source}."));
    }
    finalize(segments)
}

fn ieee_entry(citation: &Citation, number: u32) -> String {
    let mut segments = vec![format!("[{number}]")];
    if let Some(author) = &citation.author {
        segments.push(format!("{author},"));
    }
    if let Some(title) = &citation.title {
        segments.push(format!("\"{title},\""));
    }
    if let Some(source) = &citation.source {
        segments.push(format!("{source},"));
    }
    if let Some(year) = &citation.year {
        segments.push(format!("{year}."));
    }
    if let Some(page) = &citation.page {
        segments.push(format!("pp. {page}."));
    }
    finalize(segments)
}

fn finalize(segments: Vec<String>) -> String {
    let mut entry = segments.join(" ");
    if entry.ends_with(',') {
        entry.pop();
        entry.push('.');
    }
    if !entry.ends_with('.') && !entry.ends_with('"') {
        entry.push('.');
    }
    entry
}
