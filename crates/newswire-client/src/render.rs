//! Plain-text rendering of list and detail payloads.

use std::fmt::Write;

use newswire_protocol::{HeadlineDetails, HeadlineSummary, SourceDetails, SourceSummary};

const NOT_PROVIDED: &str = "(not provided)";

/// Renders one headline list, one row per line.
#[must_use]
pub fn headline_list(rows: &[HeadlineSummary]) -> String {
    if rows.is_empty() {
        return "No headlines matched.\n".to_owned();
    }
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{:>3}. {} ({}, {})",
            row.index, row.title, row.source, row.author
        );
    }
    out
}

/// Renders one source list, one row per line.
#[must_use]
pub fn source_list(rows: &[SourceSummary]) -> String {
    if rows.is_empty() {
        return "No sources matched.\n".to_owned();
    }
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{:>3}. {}", row.index, row.name);
    }
    out
}

/// Renders the full detail block for a headline.
#[must_use]
pub fn headline_details(details: &HeadlineDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Title:       {}", details.title);
    let _ = writeln!(out, "Source:      {}", details.source);
    let _ = writeln!(out, "Author:      {}", optional(details.author.as_deref()));
    let _ = writeln!(out, "Published:   {}", optional(details.published_at.as_deref()));
    let _ = writeln!(out, "URL:         {}", optional(details.url.as_deref()));
    let _ = writeln!(
        out,
        "Description: {}",
        optional(details.description.as_deref())
    );
    let _ = writeln!(out, "Content:     {}", optional(details.content.as_deref()));
    out
}

/// Renders the full detail block for a source.
#[must_use]
pub fn source_details(details: &SourceDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Name:        {}", details.name);
    let _ = writeln!(out, "Country:     {}", optional(details.country.as_deref()));
    let _ = writeln!(out, "Language:    {}", optional(details.language.as_deref()));
    let _ = writeln!(out, "Category:    {}", optional(details.category.as_deref()));
    let _ = writeln!(out, "URL:         {}", optional(details.url.as_deref()));
    let _ = writeln!(
        out,
        "Description: {}",
        optional(details.description.as_deref())
    );
    out
}

fn optional(value: Option<&str>) -> &str {
    value.filter(|text| !text.is_empty()).unwrap_or(NOT_PROVIDED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headline_rows_are_numbered_as_listed() {
        let rows = vec![
            HeadlineSummary {
                index: 1,
                source: "Reuters".into(),
                author: "A. Reporter".into(),
                title: "Markets rally".into(),
            },
            HeadlineSummary {
                index: 2,
                source: "BBC News".into(),
                author: "Unknown".into(),
                title: "Quake off Hokkaido".into(),
            },
        ];
        let text = headline_list(&rows);
        assert!(text.contains("  1. Markets rally (Reuters, A. Reporter)"));
        assert!(text.contains("  2. Quake off Hokkaido (BBC News, Unknown)"));
    }

    #[test]
    fn empty_lists_get_a_message_instead_of_silence() {
        assert_eq!(headline_list(&[]), "No headlines matched.\n");
        assert_eq!(source_list(&[]), "No sources matched.\n");
    }

    #[test]
    fn missing_detail_fields_render_a_placeholder() {
        let details = SourceDetails {
            name: "BBC News".into(),
            country: Some("gb".into()),
            description: None,
            url: Some(String::new()),
            category: None,
            language: None,
        };
        let text = source_details(&details);
        assert!(text.contains("Name:        BBC News"));
        assert!(text.contains("Country:     gb"));
        assert!(text.contains("URL:         (not provided)"));
        assert!(text.contains("Description: (not provided)"));
    }
}
