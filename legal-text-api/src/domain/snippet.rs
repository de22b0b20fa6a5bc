//! Excerpts for search hits.
//!
//! The full-text index decides *which* articles match; this module decides
//! *what to show* for each of them. The first match wins, in tier order:
//!
//! 1. the article title,
//! 2. a section subtitle,
//! 3. a paragraph of section content, shown as a window around the match.
//!
//! Matching is case-insensitive substring containment. The index also
//! matches stemmed variants, so an article it returns may have no literal
//! match here; [`extract`] then returns `None`.

use super::models::{Article, Section, SectionHeading, SnippetResult};

/// Default excerpt length in characters.
pub const DEFAULT_SNIPPET_WINDOW: usize = 400;

/// Marks text cut off at either end of an excerpt.
pub const ELLIPSIS: char = '…';

/// Builds the snippet for `article`, or `None` when no tier matches `query`.
pub fn extract(article: &Article, query: &str, window: usize) -> Option<SnippetResult> {
    let needle: Vec<char> = query.chars().collect();

    if contains_ignore_case(&article.title, &needle) {
        return Some(SnippetResult {
            title: article.title.clone(),
            art_number: article.number,
            fragment: None,
            context: None,
        });
    }

    let subtitle_match = article.legal.iter().find_map(|section| match section {
        Section::Header(heading) if contains_ignore_case(&heading.subtitle, &needle) => {
            Some(heading)
        }
        _ => None,
    });
    if let Some(heading) = subtitle_match {
        return Some(heading_result(article, Some(heading), None));
    }

    // Content blocks belong to the nearest heading before them.
    let mut heading: Option<&SectionHeading> = None;
    for section in &article.legal {
        match section {
            Section::Header(h) => heading = Some(h),
            Section::Content(block) => {
                for paragraph in &block.content {
                    let text: Vec<char> = paragraph.chars().collect();
                    if let Some(at) = find_ignore_case(&text, &needle) {
                        let context = excerpt(&text, at, needle.len(), window);
                        return Some(heading_result(article, heading, Some(context)));
                    }
                }
            }
        }
    }

    None
}

fn heading_result(
    article: &Article,
    heading: Option<&SectionHeading>,
    context: Option<String>,
) -> SnippetResult {
    match heading {
        Some(heading) => SnippetResult {
            title: heading.display_title(),
            art_number: article.number,
            fragment: Some(heading.fragment()),
            context,
        },
        None => SnippetResult {
            title: article.title.clone(),
            art_number: article.number,
            fragment: None,
            context,
        },
    }
}

/// Cuts `window` characters centred on the match at `at`.
///
/// A leading ellipsis marks a cut start. A trailing one is added unless the
/// window ends exactly at the paragraph's end, so a window reaching past a
/// short paragraph is still marked.
fn excerpt(text: &[char], at: usize, match_len: usize, window: usize) -> String {
    let half = window.saturating_sub(match_len) / 2;
    let begin = at.saturating_sub(half);
    let end = at + match_len + half;

    let mut context = String::with_capacity(window + 2 * ELLIPSIS.len_utf8());
    if begin > 0 {
        context.push(ELLIPSIS);
    }
    context.extend(&text[begin..end.min(text.len())]);
    if end != text.len() {
        context.push(ELLIPSIS);
    }
    context
}

fn contains_ignore_case(haystack: &str, needle: &[char]) -> bool {
    let haystack: Vec<char> = haystack.chars().collect();
    find_ignore_case(&haystack, needle).is_some()
}

/// Character index of the first case-insensitive occurrence of `needle`.
fn find_ignore_case(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&start| {
        haystack[start..start + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| chars_eq_ignore_case(*a, *b))
    })
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
