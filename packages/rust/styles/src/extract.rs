//! In-text citation extraction.
//!
//! Scans document content for parenthetical, bracketed, and inline
//! author-year references, then analyzes each match into components
//! (author, year, page, numbered reference, quoted title).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use paperform_shared::{Citation, CitationDelimiter, CitationKind};

static PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("valid regex"));
static BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid regex"));
static INLINE_AUTHOR_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z][a-z]+ [A-Z][a-z]+ \d{4})").expect("valid regex"));
static INLINE_AUTHOR_COMMA_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z][a-z]+, \d{4})").expect("valid regex"));

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("valid regex"));
static PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*$").expect("valid regex"));
static QUOTED_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([^"']+)["']"#).expect("valid regex"));

// Author name shapes, tried in order: "First Last", "Last, First", "Name".
static AUTHOR_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^([A-Z][a-z]+ [A-Z][a-z]+)").expect("valid regex"),
        Regex::new(r"^([A-Z][a-z]+, [A-Z][a-z]+)").expect("valid regex"),
        Regex::new(r"^([A-Z][a-z]+)").expect("valid regex"),
    ]
});

/// Extract all recognizable in-text citations from document content,
/// ordered by position and deduplicated by (text, position).
pub fn extract_citations(content: &str) -> Vec<Citation> {
    let mut seen: HashSet<(String, usize)> = HashSet::new();
    let mut citations = Vec::new();

    let scans: [(&Regex, CitationDelimiter); 4] = [
        (&PAREN_RE, CitationDelimiter::Parentheses),
        (&BRACKET_RE, CitationDelimiter::Brackets),
        (&INLINE_AUTHOR_YEAR_RE, CitationDelimiter::Inline),
        (&INLINE_AUTHOR_COMMA_YEAR_RE, CitationDelimiter::Inline),
    ];

    for (re, delimiter) in scans {
        for caps in re.captures_iter(content) {
            let m = caps.get(1).expect("capture group");
            let text = m.as_str().trim().to_string();
            let position = m.start();

            if !seen.insert((text.clone(), position)) {
                continue;
            }

            if let Some(citation) = analyze_citation(&text, position, delimiter) {
                citations.push(citation);
            }
        }
    }

    citations.sort_by(|a, b| a.position.cmp(&b.position).then(a.text.cmp(&b.text)));

    debug!(count = citations.len(), "citations extracted");
    citations
}

/// Assign sequence numbers to citations in first-appearance order,
/// reusing the number for repeated citation text. Used by IEEE rendering.
pub fn number_citations(citations: &mut [Citation]) {
    let mut next = 1u32;
    let mut assigned: Vec<(String, u32)> = Vec::new();

    for citation in citations.iter_mut() {
        if let Some(n) = citation.number {
            // Explicit [n] references keep their own number.
            assigned.push((citation.text.clone(), n));
            next = next.max(n + 1);
            continue;
        }
        let existing = assigned
            .iter()
            .find(|(text, _)| *text == citation.text)
            .map(|(_, n)| *n);
        let n = match existing {
            Some(n) => n,
            None => {
                let n = next;
                next += 1;
                assigned.push((citation.text.clone(), n));
                n
            }
        };
        citation.number = Some(n);
    }
}

/// Analyze one citation text into components. Returns `None` when the
/// text does not look like a citation at all.
fn analyze_citation(
    text: &str,
    position: usize,
    delimiter: CitationDelimiter,
) -> Option<Citation> {
    // IEEE-style numbered reference: "[1]", "[2]", ... A bare number in
    // parentheses is an equation or list reference, not a citation.
    if NUMBERED_RE.is_match(text) {
        if delimiter != CitationDelimiter::Brackets {
            return None;
        }
        let number: u32 = text.parse().ok()?;
        return Some(Citation {
            text: text.to_string(),
            kind: CitationKind::Numbered,
            delimiter,
            author: None,
            year: None,
            page: None,
            title: None,
            source: None,
            number: Some(number),
            position,
        });
    }

    // Author-led citations: "Smith 42", "Smith, 2019", "Jane Smith 2019".
    for author_re in AUTHOR_RES.iter() {
        if let Some(m) = author_re.captures(text) {
            let author = m.get(1).expect("capture group").as_str().to_string();
            let remaining = text[m.get(0).expect("match").end()..].trim();

            let year = YEAR_RE
                .captures(remaining)
                .map(|c| c[1].to_string());

            // Trailing digits are a page number unless they are the year itself.
            let page = PAGE_RE
                .captures(remaining)
                .map(|c| c[1].to_string())
                .filter(|p| year.as_deref() != Some(p.as_str()));

            return Some(Citation {
                text: text.to_string(),
                kind: CitationKind::AuthorYear,
                delimiter,
                author: Some(author),
                year,
                page,
                title: None,
                source: None,
                number: None,
                position,
            });
        }
    }

    // Quoted title with no author information.
    if let Some(m) = QUOTED_TITLE_RE.captures(text) {
        return Some(Citation {
            text: text.to_string(),
            kind: CitationKind::Title,
            delimiter,
            author: None,
            year: None,
            page: None,
            title: Some(m[1].to_string()),
            source: None,
            number: None,
            position,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_author_page_citation() {
        let citations = extract_citations("Borrowed language shapes thought (Whorf 213).");
        assert_eq!(citations.len(), 1);
        let c = &citations[0];
        assert_eq!(c.kind, CitationKind::AuthorYear);
        assert_eq!(c.author.as_deref(), Some("Whorf"));
        assert_eq!(c.page.as_deref(), Some("213"));
        assert_eq!(c.year, None);
    }

    #[test]
    fn extracts_author_year_citation() {
        let citations = extract_citations("As shown earlier (Smith, 2019).");
        assert_eq!(citations.len(), 1);
        let c = &citations[0];
        assert_eq!(c.author.as_deref(), Some("Smith"));
        assert_eq!(c.year.as_deref(), Some("2019"));
        // A trailing year must not double as a page number.
        assert_eq!(c.page, None);
    }

    #[test]
    fn extracts_numbered_reference() {
        let citations = extract_citations("Deep networks generalize [3].");
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].kind, CitationKind::Numbered);
        assert_eq!(citations[0].number, Some(3));
    }

    #[test]
    fn extracts_quoted_title() {
        let citations = extract_citations(r#"(see "The Waste Land")"#);
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].kind, CitationKind::Title);
        assert_eq!(citations[0].title.as_deref(), Some("The Waste Land"));
    }

    #[test]
    fn non_citation_parentheses_are_skipped() {
        let citations = extract_citations("water (aqueous) boils at 100C (i.e. at sea level)");
        // "aqueous" and "i.e. at sea level" don't match any citation shape.
        assert!(citations.is_empty());
    }

    #[test]
    fn citations_ordered_by_position() {
        let content = "First (Zimmer, 2020) then (Adams 7) then [2].";
        let citations = extract_citations(content);
        assert_eq!(citations.len(), 3);
        assert_eq!(citations[0].author.as_deref(), Some("Zimmer"));
        assert_eq!(citations[1].author.as_deref(), Some("Adams"));
        assert_eq!(citations[2].number, Some(2));
    }

    #[test]
    fn parenthesized_number_is_not_a_citation() {
        // "(3)" is an equation or list reference; only "[3]" is a citation.
        let citations = extract_citations("See equation (3). Deep networks generalize [3].");
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].delimiter, CitationDelimiter::Brackets);
        assert_eq!(citations[0].number, Some(3));
    }

    #[test]
    fn duplicate_matches_dedupe() {
        // Same span matched by two patterns must appear once.
        let citations = extract_citations("(Smith, 2019)");
        assert_eq!(citations.len(), 1);
    }

    #[test]
    fn number_citations_assigns_in_first_appearance_order() {
        let mut citations = extract_citations("(Adams 7) and (Brown 9) and (Adams 7)");
        number_citations(&mut citations);
        assert_eq!(citations[0].number, Some(1));
        assert_eq!(citations[1].number, Some(2));
        assert_eq!(citations[2].number, Some(1));
    }

    #[test]
    fn number_citations_keeps_explicit_numbers() {
        let mut citations = extract_citations("[4] and (Brown 9)");
        number_citations(&mut citations);
        assert_eq!(citations[0].number, Some(4));
        assert_eq!(citations[1].number, Some(5));
    }
}
