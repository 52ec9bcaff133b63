//! In-text citation rendering.
//!
//! Rewrites extracted citations into the target style's parenthetical or
//! bracketed form, both as standalone strings and in place within body text.

use paperform_shared::{Citation, CitationDelimiter};

use crate::rules::{InTextPattern, StyleRule};

/// Render a single citation in the style's in-text form.
pub fn format_in_text(citation: &Citation, rule: &StyleRule) -> String {
    match rule.in_text {
        InTextPattern::AuthorPage => {
            let mut parts = Vec::new();
            if let Some(author) = &citation.author {
                parts.push(author.clone());
            }
            if let Some(page) = &citation.page {
                parts.push(page.clone());
            }
            if parts.is_empty() {
                format!("({})", citation.text)
            } else {
                format!("({})", parts.join(" "))
            }
        }
        InTextPattern::AuthorYear => {
            let mut parts = Vec::new();
            if let Some(author) = &citation.author {
                parts.push(author.clone());
            }
            if let Some(year) = &citation.year {
                parts.push(year.clone());
            }
            if let Some(page) = &citation.page {
                parts.push(format!("p. {page}"));
            }
            if parts.is_empty() {
                format!("({})", citation.text)
            } else {
                format!("({})", parts.join(", "))
            }
        }
        InTextPattern::AuthorYearPage => {
            let mut parts = Vec::new();
            if let Some(author) = &citation.author {
                parts.push(author.clone());
            }
            if let Some(year) = &citation.year {
                parts.push(year.clone());
            }
            if let Some(page) = &citation.page {
                parts.push(format!("p. {page}"));
            }
            if parts.is_empty() {
                format!("({})", citation.text)
            } else {
                format!("({})", parts.join(" "))
            }
        }
        InTextPattern::Numbered => match citation.number {
            Some(n) => format!("[{n}]"),
            None => format!("[{}]", citation.text),
        },
    }
}

/// Rewrite every extracted citation within the body into the style's form.
///
/// Only the spelling the citation was extracted in is replaced, so text
/// that merely shares its characters (an equation reference `(3)` next to
/// citation `[3]`) is left untouched. Bare inline references stay as
/// written.
pub fn rewrite_citations(body: &str, citations: &[Citation], rule: &StyleRule) -> String {
    let mut result = body.to_string();

    for citation in citations {
        let original = match citation.delimiter {
            CitationDelimiter::Parentheses => format!("({})", citation.text),
            CitationDelimiter::Brackets => format!("[{}]", citation.text),
            CitationDelimiter::Inline => continue,
        };

        let formatted = format_in_text(citation, rule);
        if original != formatted {
            result = result.replace(&original, &formatted);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract_citations, number_citations};
    use crate::rules::style_rule;
    use paperform_shared::CitationStyle;

    fn one(content: &str) -> Citation {
        let citations = extract_citations(content);
        assert_eq!(citations.len(), 1, "expected one citation in {content:?}");
        citations.into_iter().next().unwrap()
    }

    #[test]
    fn mla_author_page() {
        let c = one("(Whorf 213)");
        let out = format_in_text(&c, style_rule(CitationStyle::Mla));
        assert_eq!(out, "(Whorf 213)");
    }

    #[test]
    fn apa_author_year_page() {
        let mut c = one("(Whorf 213)");
        c.year = Some("1956".into());
        let out = format_in_text(&c, style_rule(CitationStyle::Apa));
        assert_eq!(out, "(Whorf, 1956, p. 213)");
    }

    #[test]
    fn chicago_space_joined() {
        let mut c = one("(Whorf 213)");
        c.year = Some("1956".into());
        let out = format_in_text(&c, style_rule(CitationStyle::Chicago));
        assert_eq!(out, "(Whorf 1956 p. 213)");
    }

    #[test]
    fn harvard_author_year() {
        let c = one("(Smith, 2019)");
        let out = format_in_text(&c, style_rule(CitationStyle::Harvard));
        assert_eq!(out, "(Smith, 2019)");
    }

    #[test]
    fn ieee_numbered() {
        let mut citations = extract_citations("(Smith, 2019)");
        number_citations(&mut citations);
        let out = format_in_text(&citations[0], style_rule(CitationStyle::Ieee));
        assert_eq!(out, "[1]");
    }

    #[test]
    fn rewrite_converts_author_year_to_mla() {
        let body = "Sapir argued this first (Smith, 2019) and later (Adams 7).";
        let citations = extract_citations(body);
        let out = rewrite_citations(body, &citations, style_rule(CitationStyle::Mla));
        // Smith has no page, so MLA renders author alone.
        assert!(out.contains("(Smith)"));
        assert!(out.contains("(Adams 7)"));
    }

    #[test]
    fn rewrite_leaves_equation_references_alone() {
        let body = "Substituting into (3) gives the bound in [3].";
        let mut citations = extract_citations(body);
        number_citations(&mut citations);
        let out = rewrite_citations(body, &citations, style_rule(CitationStyle::Ieee));
        assert_eq!(out, "Substituting into (3) gives the bound in [3].");
    }

    #[test]
    fn rewrite_converts_everything_to_ieee_numbers() {
        let body = "First claim (Smith, 2019). Second claim (Adams 7).";
        let mut citations = extract_citations(body);
        number_citations(&mut citations);
        let out = rewrite_citations(body, &citations, style_rule(CitationStyle::Ieee));
        assert_eq!(out, "First claim [1]. Second claim [2].");
    }
}
