//! Interactive commands
//!
//! One command per input line. Parsing is kept separate from execution so it
//! can be tested without a backend.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jobdeck_core::domain::job::JobType;
use jobdeck_dashboard::JobForm;
use jobdeck_dashboard::view::{SortColumn, StatusFilter};
use serde_json::Value as JsonValue;

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set the search text; empty clears it
    Search(String),
    Filter(StatusFilter),
    Sort(SortColumn),
    Page(usize),
    Next,
    Prev,
    Size(usize),
    Expand(String),
    Compact,
    Scroll(u32),
    Copy(String),
    Show(String),
    Submit(JobForm),
    Window(Duration),
    Export(Option<PathBuf>),
    Refresh,
    Help,
    Quit,
}

/// Split off the first whitespace-delimited word
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

fn required<'a>(args: &'a str, usage: &str) -> Result<&'a str, String> {
    let args = args.trim();
    if args.is_empty() {
        Err(format!("usage: {}", usage))
    } else {
        Ok(args)
    }
}

fn number<T: FromStr>(raw: &str, what: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("invalid {} '{}'", what, raw))
}

fn parse_submit(args: &str) -> Result<JobForm, String> {
    const USAGE: &str = "submit <type> [priority] [threads] [json-payload]";

    let (kind, rest) = split_word(args);
    if kind.is_empty() {
        return Err(format!("usage: {}", USAGE));
    }
    let mut form = JobForm::new(JobType::from(kind));

    let mut rest = rest;
    for slot in ["priority", "threads"] {
        if rest.is_empty() || rest.starts_with(['{', '[']) {
            break;
        }
        let (word, remaining) = split_word(rest);
        match slot {
            "priority" => form.priority = number(word, slot)?,
            _ => form.thread_demand = number(word, slot)?,
        }
        rest = remaining;
    }

    if !rest.is_empty() {
        let payload: JsonValue =
            serde_json::from_str(rest).map_err(|e| format!("invalid payload JSON: {}", e))?;
        form.payload = Some(payload);
    }

    Ok(form)
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (name, args) = split_word(line);

        match name.to_ascii_lowercase().as_str() {
            "search" | "/" => Ok(Command::Search(args.trim().to_string())),
            "filter" => required(args, "filter <all|pending|running|completed|failed>")?
                .parse()
                .map(Command::Filter),
            "sort" => required(args, "sort <created|priority|status|type>")?
                .parse()
                .map(Command::Sort),
            "page" => number(required(args, "page <n>")?, "page").map(Command::Page),
            "next" | "n" => Ok(Command::Next),
            "prev" | "p" => Ok(Command::Prev),
            "size" => {
                let size: usize = number(required(args, "size <n>")?, "page size")?;
                if size == 0 {
                    return Err("page size must be at least 1".to_string());
                }
                Ok(Command::Size(size))
            }
            "expand" | "x" => Ok(Command::Expand(required(args, "expand <id>")?.to_string())),
            "compact" => Ok(Command::Compact),
            "scroll" => number(required(args, "scroll <px>")?, "offset").map(Command::Scroll),
            "copy" => Ok(Command::Copy(required(args, "copy <id>")?.to_string())),
            "show" => Ok(Command::Show(required(args, "show <id>")?.to_string())),
            "submit" => parse_submit(args).map(Command::Submit),
            "window" => {
                let minutes: u64 = number(required(args, "window <minutes>")?, "minutes")?;
                if minutes == 0 {
                    return Err("window must be at least one minute".to_string());
                }
                let seconds = minutes
                    .checked_mul(60)
                    .ok_or_else(|| format!("window of {} minutes is too large", minutes))?;
                Ok(Command::Window(Duration::from_secs(seconds)))
            }
            "export" => {
                let dir = args.trim();
                Ok(Command::Export((!dir.is_empty()).then(|| PathBuf::from(dir))))
            }
            "refresh" | "r" => Ok(Command::Refresh),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{}', type 'help'", other)),
        }
    }
}

/// Help text listing every command
pub const HELP: &[(&str, &str)] = &[
    ("search <text>", "Filter by id, type or result (empty clears)"),
    ("filter <status>", "Show all, pending, running, completed or failed jobs"),
    ("sort <column>", "Sort by created, priority, status or type; repeat to flip"),
    ("page <n> | next | prev", "Move between pages"),
    ("size <n>", "Rows per page"),
    ("expand <id>", "Open or close a row's details"),
    ("compact", "Toggle compact rows"),
    ("scroll <px>", "Scroll the virtualized table"),
    ("copy <id>", "Print a job id on its own line"),
    ("show <id>", "Fetch one job from the backend"),
    ("submit <type> [priority] [threads] [json]", "Submit a new job"),
    ("window <minutes>", "Window for the average completion time"),
    ("export [dir]", "Write the filtered jobs to CSV"),
    ("refresh", "Refresh jobs now"),
    ("quit", "Exit"),
];
