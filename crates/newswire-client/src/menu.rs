//! Interactive menu loop.
//!
//! The loop is generic over its console streams and the [`ServerLink`] so the
//! whole flow can be driven by scripted input in tests. One iteration of the
//! main menu maps to at most one list query; detail lookups run in an inner
//! loop against whichever list the server most recently confirmed.

use std::io::{BufRead, Write};

use strum::IntoEnumIterator;

use newswire_protocol::{
    Category, Country, HeadlineDetails, HeadlineSummary, Language, Request, Response, ResultKind,
    SourceDetails, SourceSummary,
};

use crate::errors::AppError;
use crate::render;
use crate::transport::ServerLink;

/// Runs the menu loop until the user quits or the console reaches EOF.
///
/// # Errors
///
/// Returns an [`AppError`] when the console or the server connection fails.
pub fn run_session<L, R, W>(link: &mut L, input: &mut R, output: &mut W) -> Result<(), AppError>
where
    L: ServerLink,
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(output)?;
        writeln!(output, "== Newswire ==")?;
        writeln!(output, "  1) Top headlines")?;
        writeln!(output, "  2) News sources")?;
        writeln!(output, "  q) Quit")?;
        let Some(choice) = prompt(input, output, "> ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => headlines_flow(link, input, output)?,
            "2" => sources_flow(link, input, output)?,
            "q" | "quit" => return Ok(()),
            "" => {}
            other => writeln!(output, "Unrecognised choice '{other}'.")?,
        }
    }
}

fn headlines_flow<L, R, W>(link: &mut L, input: &mut R, output: &mut W) -> Result<(), AppError>
where
    L: ServerLink,
    R: BufRead,
    W: Write,
{
    writeln!(output, "Filter headlines by:")?;
    writeln!(output, "  1) Keyword")?;
    writeln!(output, "  2) Category")?;
    writeln!(output, "  3) Country")?;
    writeln!(output, "  4) No filter")?;
    writeln!(output, "  b) Back")?;
    let Some(choice) = prompt(input, output, "> ")? else {
        return Ok(());
    };

    let mut request = Request::new("headlines");
    match choice.as_str() {
        "1" => {
            let Some(term) = prompt(input, output, "Search term: ")? else {
                return Ok(());
            };
            if !term.is_empty() {
                request = request.with_text("keyword", term);
            }
        }
        "2" => {
            let labels: Vec<(String, String)> = Category::iter()
                .map(|category| (category.to_string(), category.to_string()))
                .collect();
            match select_catalogue(input, output, "Category", &labels)? {
                Some(value) => request = request.with_text("category", value),
                None => return Ok(()),
            }
        }
        "3" => {
            let labels: Vec<(String, String)> = Country::iter()
                .map(|country| (country.to_string(), country.display_name().to_owned()))
                .collect();
            match select_catalogue(input, output, "Country", &labels)? {
                Some(value) => request = request.with_text("country", value),
                None => return Ok(()),
            }
        }
        "4" => {}
        _ => return Ok(()),
    }

    let response = link.exchange(&request)?;
    if !response.is_success() {
        writeln!(output, "{}", error_text(&response))?;
        return Ok(());
    }
    let Ok(rows) = response.decode_data::<Vec<HeadlineSummary>>() else {
        writeln!(output, "The server sent an unexpected payload.")?;
        return Ok(());
    };
    if let Some(message) = &response.message {
        writeln!(output, "{message}")?;
    }
    write!(output, "{}", render::headline_list(&rows))?;
    if rows.is_empty() {
        return Ok(());
    }

    details_loop(link, input, output, ResultKind::Headline)
}

fn sources_flow<L, R, W>(link: &mut L, input: &mut R, output: &mut W) -> Result<(), AppError>
where
    L: ServerLink,
    R: BufRead,
    W: Write,
{
    writeln!(output, "Filter sources by:")?;
    writeln!(output, "  1) Category")?;
    writeln!(output, "  2) Country")?;
    writeln!(output, "  3) Language")?;
    writeln!(output, "  4) No filter")?;
    writeln!(output, "  b) Back")?;
    let Some(choice) = prompt(input, output, "> ")? else {
        return Ok(());
    };

    let mut request = Request::new("sources");
    match choice.as_str() {
        "1" => {
            let labels: Vec<(String, String)> = Category::iter()
                .map(|category| (category.to_string(), category.to_string()))
                .collect();
            match select_catalogue(input, output, "Category", &labels)? {
                Some(value) => request = request.with_text("category", value),
                None => return Ok(()),
            }
        }
        "2" => {
            let labels: Vec<(String, String)> = Country::iter()
                .map(|country| (country.to_string(), country.display_name().to_owned()))
                .collect();
            match select_catalogue(input, output, "Country", &labels)? {
                Some(value) => request = request.with_text("country", value),
                None => return Ok(()),
            }
        }
        "3" => {
            let labels: Vec<(String, String)> = Language::iter()
                .map(|language| (language.to_string(), language.display_name().to_owned()))
                .collect();
            match select_catalogue(input, output, "Language", &labels)? {
                Some(value) => request = request.with_text("language", value),
                None => return Ok(()),
            }
        }
        "4" => {}
        _ => return Ok(()),
    }

    let response = link.exchange(&request)?;
    if !response.is_success() {
        writeln!(output, "{}", error_text(&response))?;
        return Ok(());
    }
    let Ok(rows) = response.decode_data::<Vec<SourceSummary>>() else {
        writeln!(output, "The server sent an unexpected payload.")?;
        return Ok(());
    };
    if let Some(message) = &response.message {
        writeln!(output, "{message}")?;
    }
    write!(output, "{}", render::source_list(&rows))?;
    if rows.is_empty() {
        return Ok(());
    }

    details_loop(link, input, output, ResultKind::Source)
}

fn details_loop<L, R, W>(
    link: &mut L,
    input: &mut R,
    output: &mut W,
    kind: ResultKind,
) -> Result<(), AppError>
where
    L: ServerLink,
    R: BufRead,
    W: Write,
{
    loop {
        let Some(choice) = prompt(
            input,
            output,
            "Enter an item number for details (0 to go back): ",
        )?
        else {
            return Ok(());
        };
        let Ok(index) = choice.parse::<i64>() else {
            writeln!(output, "Enter a number.")?;
            continue;
        };
        if index == 0 {
            return Ok(());
        }

        let response = link.exchange(&Request::details(kind, index))?;
        if !response.is_success() {
            writeln!(output, "{}", error_text(&response))?;
            continue;
        }
        let rendered = match kind {
            ResultKind::Headline => response
                .decode_data::<HeadlineDetails>()
                .map(|details| render::headline_details(&details)),
            ResultKind::Source => response
                .decode_data::<SourceDetails>()
                .map(|details| render::source_details(&details)),
        };
        match rendered {
            Ok(text) => write!(output, "{text}")?,
            Err(_) => writeln!(output, "The server sent an unexpected payload.")?,
        }
    }
}

/// Presents a numbered catalogue and returns the chosen wire value.
fn select_catalogue<R, W>(
    input: &mut R,
    output: &mut W,
    title: &str,
    entries: &[(String, String)],
) -> Result<Option<String>, AppError>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{title}:")?;
    for (position, (_, label)) in entries.iter().enumerate() {
        writeln!(output, "  {}) {label}", position + 1)?;
    }
    let Some(choice) = prompt(input, output, "> ")? else {
        return Ok(None);
    };
    let selected = choice
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|position| entries.get(position));
    match selected {
        Some((value, _)) => Ok(Some(value.clone())),
        None => {
            writeln!(output, "No such entry.")?;
            Ok(None)
        }
    }
}

/// Prints a prompt and reads one trimmed line; `None` means console EOF.
fn prompt<R, W>(input: &mut R, output: &mut W, text: &str) -> Result<Option<String>, AppError>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{text}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

fn error_text(response: &Response) -> String {
    response
        .message
        .clone()
        .unwrap_or_else(|| "The server reported an error.".to_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::Cursor;

    use serde_json::json;

    use newswire_protocol::{PayloadKind, RequestParam};

    use super::*;

    struct ScriptedLink {
        responses: VecDeque<Response>,
        requests: Vec<Request>,
    }

    impl ScriptedLink {
        fn new(responses: Vec<Response>) -> Self {
            Self {
                responses: responses.into(),
                requests: Vec::new(),
            }
        }
    }

    impl ServerLink for ScriptedLink {
        fn exchange(&mut self, request: &Request) -> Result<Response, AppError> {
            self.requests.push(request.clone());
            Ok(self.responses.pop_front().expect("scripted response"))
        }
    }

    fn drive(link: &mut ScriptedLink, script: &str) -> String {
        let mut input = Cursor::new(script.to_owned());
        let mut output = Vec::new();
        run_session(link, &mut input, &mut output).expect("session");
        String::from_utf8(output).expect("utf-8 output")
    }

    fn headline_rows() -> Vec<HeadlineSummary> {
        vec![
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
        ]
    }

    #[test]
    fn quitting_sends_no_requests() {
        let mut link = ScriptedLink::new(Vec::new());
        let shown = drive(&mut link, "q\n");
        assert!(shown.contains("== Newswire =="));
        assert!(link.requests.is_empty());
    }

    #[test]
    fn category_filter_and_detail_selection() {
        let list = Response::success(
            PayloadKind::HeadlinesList,
            &headline_rows(),
            Some("Found 2 headlines".into()),
        )
        .expect("list response");
        let detail = Response::success(
            PayloadKind::HeadlineDetails,
            &json!({
                "source": "BBC News",
                "author": null,
                "title": "Quake off Hokkaido",
                "url": "https://example.com/quake",
                "description": null,
                "publishedAt": "2026-08-20T02:00:00Z",
                "content": null
            }),
            None,
        )
        .expect("detail response");
        let mut link = ScriptedLink::new(vec![list, detail]);

        // Main menu 1, category filter, Sports (fifth entry), detail 2, back, quit.
        let shown = drive(&mut link, "1\n2\n5\n2\n0\nq\n");

        assert!(shown.contains("Found 2 headlines"));
        assert!(shown.contains("  2. Quake off Hokkaido (BBC News, Unknown)"));
        assert!(shown.contains("Title:       Quake off Hokkaido"));
        assert!(shown.contains("Author:      (not provided)"));

        assert_eq!(link.requests.len(), 2);
        assert_eq!(link.requests[0].option, "headlines");
        assert_eq!(
            link.requests[0].parameters.get("category"),
            Some(&RequestParam::Text("sports".into()))
        );
        assert_eq!(link.requests[1].option, "details");
        assert_eq!(
            link.requests[1].parameters.get("index"),
            Some(&RequestParam::Number(2))
        );
        assert_eq!(
            link.requests[1].parameters.get("kind"),
            Some(&RequestParam::Text("headline".into()))
        );
    }

    #[test]
    fn server_errors_are_shown_and_the_menu_continues() {
        let mut link = ScriptedLink::new(vec![Response::error(
            "provider rejected the query: rate limited",
        )]);
        let shown = drive(&mut link, "2\n4\nq\n");
        assert!(shown.contains("provider rejected the query: rate limited"));
        assert_eq!(link.requests.len(), 1);
        assert_eq!(link.requests[0].option, "sources");
        assert!(link.requests[0].parameters.is_empty());
    }

    #[test]
    fn out_of_range_catalogue_choice_backs_out() {
        let mut link = ScriptedLink::new(Vec::new());
        let shown = drive(&mut link, "2\n3\n9\nq\n");
        assert!(shown.contains("No such entry."));
        assert!(link.requests.is_empty());
    }
}
