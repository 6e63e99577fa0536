//! Interactive browse loop.
//!
//! Reads one intent per line, parses it with clap in multicall mode, feeds the
//! resulting [`TableEvent`] to the session and renders the new view. Parse
//! errors and refused intents are reported and the loop carries on; only I/O
//! and render failures end it.

use super::render::{format_message, Renderer};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use todotable::api::CmdMessage;
use todotable::error::{Result, TableError};
use todotable::paginate::PageLimit;
use todotable::pipeline::{FilterKey, SortKey};
use todotable::session::{TableEvent, TableSession};

#[derive(Parser, Debug)]
#[command(multicall = true, name = "browse")]
struct BrowseLine {
    #[command(subcommand)]
    intent: Intent,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Intent {
    /// Search all fields (3+ characters; shorter text clears the search)
    Search {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Clear the search
    Clear,
    /// Sort by one or more keys; no keys clears sorting
    Sort { keys: Vec<SortKey> },
    /// Filter by completion: done, pending or none
    Filter { key: String },
    /// Rows per page: a number or "all"
    Limit { limit: PageLimit },
    /// Jump to a page
    Page { number: usize },
    /// Next page
    Next,
    /// Previous page
    Prev,
    /// Render the current view again
    Show,
    /// Leave browse mode
    #[command(alias = "exit", alias = "q")]
    Quit,
}

enum Step {
    Event(TableEvent),
    Show,
    Quit,
}

fn parse_filter(key: &str) -> Result<Option<FilterKey>> {
    if key.eq_ignore_ascii_case("none") || key.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        key.parse().map(Some)
    }
}

fn to_step(intent: Intent) -> Result<Step> {
    let event = match intent {
        Intent::Search { text } => TableEvent::SearchInput(text.join(" ")),
        Intent::Clear => TableEvent::SearchClear,
        Intent::Sort { keys } => TableEvent::SortChange(keys),
        Intent::Filter { key } => TableEvent::FilterChange(parse_filter(&key)?),
        Intent::Limit { limit } => TableEvent::LimitChange(limit),
        Intent::Page { number } => TableEvent::PageClick(number),
        Intent::Next => TableEvent::NextClick,
        Intent::Prev => TableEvent::PrevClick,
        Intent::Show => return Ok(Step::Show),
        Intent::Quit => return Ok(Step::Quit),
    };
    Ok(Step::Event(event))
}

/// Runs the loop until `quit` or end of input.
pub fn run_browse<R: BufRead, W: Write>(
    session: &mut TableSession,
    renderer: &Renderer,
    input: R,
    out: &mut W,
    prompt: bool,
) -> Result<()> {
    writeln!(out, "{}", renderer.render_table(&session.view())?)?;

    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        let intent = match BrowseLine::try_parse_from(tokens) {
            Ok(parsed) => parsed.intent,
            Err(e) => {
                // Covers `help` as well as genuine mistakes.
                writeln!(out, "{}", e.render())?;
                continue;
            }
        };

        let event = match to_step(intent) {
            Ok(Step::Event(event)) => event,
            Ok(Step::Show) => {
                writeln!(out, "{}", renderer.render_table(&session.view())?)?;
                continue;
            }
            Ok(Step::Quit) => break,
            Err(e) => {
                writeln!(out, "{}", format_message(&CmdMessage::warning(e.to_string())))?;
                continue;
            }
        };

        match session.dispatch(event) {
            Ok(view) => writeln!(out, "{}", renderer.render_table(&view)?)?,
            Err(e @ (TableError::LimitUnavailable { .. } | TableError::InvalidInput(_))) => {
                writeln!(out, "{}", format_message(&CmdMessage::warning(e.to_string())))?
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use todotable::model::Record;
    use todotable::records::RecordStore;
    use todotable::session::TableOptions;

    fn session(count: usize) -> TableSession {
        let records = (1..=count)
            .map(|i| Record::todo(i as i64, &format!("todo number {}", i), i % 3 == 0, 1))
            .collect();
        TableSession::new(RecordStore::new(records), TableOptions::default())
    }

    fn browse(s: &mut TableSession, script: &str) -> String {
        colored::control::set_override(false);
        let renderer = Renderer::new(false).unwrap();
        let mut out = Vec::new();
        run_browse(s, &renderer, script.as_bytes(), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn parse(line: &str) -> Intent {
        BrowseLine::try_parse_from(line.split_whitespace())
            .unwrap()
            .intent
    }

    #[test]
    fn test_parse_intents() {
        assert_eq!(
            parse("search todo number"),
            Intent::Search {
                text: vec!["todo".into(), "number".into()]
            }
        );
        assert_eq!(
            parse("sort title-asc id_desc"),
            Intent::Sort {
                keys: vec![SortKey::TitleAsc, SortKey::IdDesc]
            }
        );
        assert_eq!(parse("limit all"), Intent::Limit { limit: PageLimit::All });
        assert_eq!(parse("q"), Intent::Quit);
    }

    #[test]
    fn test_filter_none_clears() {
        assert_eq!(parse_filter("none").unwrap(), None);
        assert_eq!(parse_filter("done").unwrap(), Some(FilterKey::CompletedTrue));
        assert!(parse_filter("maybe").is_err());
    }

    #[test]
    fn test_script_drives_session() {
        let mut s = session(23);
        let output = browse(&mut s, "next\nnext\nlimit all\nquit\nnext\n");
        assert_eq!(s.state().page, 1);
        assert_eq!(s.state().limit, PageLimit::All);
        assert!(output.contains("Showing 21-23 of 23 records"));
        assert!(output.contains("Showing 1-23 of 23 records"));
    }

    #[test]
    fn test_refused_limit_keeps_going() {
        let mut s = session(12);
        let output = browse(&mut s, "limit 50\npage 2\n");
        assert!(output.contains("Page size 50 is unavailable for 12 records"));
        assert_eq!(s.state().page, 2);
    }

    #[test]
    fn test_unknown_intent_is_reported() {
        let mut s = session(5);
        let output = browse(&mut s, "dance\nsearch number 4\n");
        assert!(output.contains("unrecognized subcommand"));
        assert_eq!(s.working_set().len(), 1);
    }

    #[test]
    fn test_end_of_input_stops() {
        let mut s = session(5);
        let output = browse(&mut s, "");
        assert!(output.contains("Showing 1-5 of 5 records"));
    }
}
