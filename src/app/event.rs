use crate::app::error::{Error, Result};
use crate::configuration::constants::common::{PASS_MARKER, SCREENSHOT_MARKER};
use serde_derive::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Run,
    Pause,
    Cont,
    Pass,
    Fail,
    Skip,
    Bench,
    Output,
    Other,
}

impl Action {
    /// `pass`, `fail` and `skip` close a test.
    pub fn is_terminal(self) -> bool {
        matches!(self, Action::Pass | Action::Fail | Action::Skip)
    }
}

impl From<&str> for Action {
    fn from(action: &str) -> Self {
        match action {
            "run" => Action::Run,
            "pause" => Action::Pause,
            "cont" => Action::Cont,
            "pass" => Action::Pass,
            "fail" => Action::Fail,
            "skip" => Action::Skip,
            "bench" => Action::Bench,
            "output" => Action::Output,
            _ => Action::Other,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawEvent {
    time: String,
    test: String,
    action: String,
    package: String,
    elapsed: f64,
    output: String,
}

/// One line of `go test -json` output.
#[derive(Debug, Clone, PartialEq)]
pub struct TestEvent {
    pub time: String,
    pub test: String,
    pub action: Action,
    pub package: String,
    pub elapsed: f64,
    pub output: String,
    pub screenshots: Vec<String>,
}

impl From<RawEvent> for TestEvent {
    fn from(raw: RawEvent) -> Self {
        let output = if raw.output.contains(PASS_MARKER) {
            raw.output.trim().to_owned()
        } else {
            raw.output
        };
        let screenshots = parse_screenshots(&output);
        Self {
            time: raw.time,
            test: raw.test,
            action: Action::from(raw.action.as_str()),
            package: raw.package,
            elapsed: raw.elapsed,
            output,
            screenshots,
        }
    }
}

/// Decodes one input line. Empty lines yield `None`; anything that is not a
/// JSON object is fatal.
pub fn decode_line(line: &str, line_number: usize) -> Result<Option<TestEvent>> {
    if line.is_empty() {
        return Ok(None);
    }
    let raw: RawEvent = serde_json::from_str(line).map_err(|source| Error::Decode {
        line: line_number,
        source,
    })?;
    Ok(Some(raw.into()))
}

/// Extracts screenshot paths from a line of the form
/// `... Screenshots : [path/a.png path/b.png]`.
///
/// The segment after the first marker is trimmed and its first and last
/// characters are dropped as list delimiters, whatever they are.
pub fn parse_screenshots(output: &str) -> Vec<String> {
    let segment = match output.split(SCREENSHOT_MARKER).nth(1) {
        Some(segment) => segment.trim(),
        None => return Vec::new(),
    };
    let mut chars = segment.chars();
    if chars.next().is_none() || chars.next_back().is_none() {
        return Vec::new();
    }
    chars
        .as_str()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}
