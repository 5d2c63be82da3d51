use crate::app::error::{Error, Result};
use crate::app::event::{decode_line, Action, TestEvent};
use crate::app::locate::SourceLocation;
use serde_derive::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// (package, test name)
pub type TestKey = (String, String);

/// Final result of one test function in one package.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestOutcome {
    pub test_name: String,
    pub package: String,
    pub elapsed_time: f64,
    pub output: Vec<String>,
    pub passed: bool,
    pub skipped: bool,
    pub test_file_name: String,
    pub test_function_detail: FunctionPosition,
    pub screenshots: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionPosition {
    pub line: usize,
    pub col: usize,
}

impl TestOutcome {
    fn new(package: &str, test_name: &str) -> Self {
        Self {
            test_name: test_name.to_owned(),
            package: package.to_owned(),
            ..Self::default()
        }
    }

    pub fn failed(&self) -> bool {
        !self.passed && !self.skipped
    }

    pub fn attach_location(&mut self, location: &SourceLocation) {
        self.test_file_name = location.file_name.clone();
        self.test_function_detail = FunctionPosition {
            line: location.line,
            col: location.column,
        };
    }

    fn apply(&mut self, event: TestEvent) {
        if event.action.is_terminal() {
            self.passed = event.action == Action::Pass;
            self.skipped = event.action == Action::Skip;
            self.elapsed_time = event.elapsed;
        }
        self.output.push(event.output);
        self.screenshots.extend(event.screenshots);
    }
}

/// Folds test events into one outcome per (package, test name).
#[derive(Debug, Default)]
pub struct Aggregator {
    outcomes: HashMap<TestKey, TestOutcome>,
    packages: BTreeSet<String>,
    verbose: bool,
}

impl Aggregator {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    /// Reads and folds a whole `go test -json` stream. `-` reads stdin.
    pub fn read_path(&mut self, path: &Path) -> Result<()> {
        if path == Path::new("-") {
            return self.read(std::io::stdin().lock());
        }
        let file = File::open(path).map_err(|source| Error::Input {
            path: path.to_path_buf(),
            source,
        })?;
        self.read_from(BufReader::new(file), path)
    }

    pub fn read<R: BufRead>(&mut self, reader: R) -> Result<()> {
        self.read_from(reader, Path::new("-"))
    }

    fn read_from<R: BufRead>(&mut self, reader: R, path: &Path) -> Result<()> {
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| Error::Input {
                path: path.to_path_buf(),
                source,
            })?;
            if let Some(event) = decode_line(&line, index + 1)? {
                self.push(event);
            }
        }
        debug!(
            "Aggregated {} tests from {} packages",
            self.outcomes.len(),
            self.packages.len()
        );
        Ok(())
    }

    pub fn push(&mut self, event: TestEvent) {
        if event.test.is_empty() {
            return;
        }
        if self.verbose {
            print!("{}", event.output);
        }
        trace!(
            "[{}] {} {:?} {}",
            event.time, event.package, event.action, event.test
        );
        self.packages.insert(event.package.clone());
        self.outcomes
            .entry((event.package.clone(), event.test.clone()))
            .or_insert_with(|| TestOutcome::new(&event.package, &event.test))
            .apply(event);
    }

    pub fn packages(&self) -> &BTreeSet<String> {
        &self.packages
    }

    pub fn finish(self) -> (HashMap<TestKey, TestOutcome>, BTreeSet<String>) {
        (self.outcomes, self.packages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(input: &str) -> HashMap<TestKey, TestOutcome> {
        let mut aggregator = Aggregator::new(false);
        aggregator.read(input.as_bytes()).unwrap();
        aggregator.finish().0
    }

    fn key(package: &str, test: &str) -> TestKey {
        (package.to_owned(), test.to_owned())
    }

    #[test]
    fn test_single_pass() {
        let outcomes = aggregate(r#"{"Test":"A","Package":"p","Action":"pass","Elapsed":0.1}"#);

        assert_eq!(outcomes.len(), 1);
        let outcome = &outcomes[&key("p", "A")];
        assert!(outcome.passed);
        assert!(!outcome.skipped);
        assert_eq!(outcome.elapsed_time, 0.1);
    }

    #[test]
    fn test_one_outcome_per_package_and_name() {
        let input = r#"{"Action":"start","Package":"p"}
{"Test":"A","Package":"p","Action":"run"}
{"Test":"A","Package":"q","Action":"run"}

{"Test":"B","Package":"p","Action":"run"}
{"Test":"A","Package":"p","Action":"pass","Elapsed":0.2}
{"Package":"p","Action":"pass","Elapsed":1.5}
"#;
        let outcomes = aggregate(input);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.contains_key(&key("p", "A")));
        assert!(outcomes.contains_key(&key("q", "A")));
        assert!(outcomes.contains_key(&key("p", "B")));
    }

    #[test]
    fn test_output_events_do_not_set_terminal_state() {
        let input = r#"{"Test":"A","Package":"p","Action":"run","Output":"=== RUN   A\n"}
{"Test":"A","Package":"p","Action":"output","Elapsed":9.9,"Output":"log line\n"}
"#;
        let outcomes = aggregate(input);
        let outcome = &outcomes[&key("p", "A")];

        assert!(!outcome.passed);
        assert!(!outcome.skipped);
        assert_eq!(outcome.elapsed_time, 0.0);
        assert_eq!(outcome.output, vec!["=== RUN   A\n", "log line\n"]);
        assert!(outcome.failed());
    }

    #[test]
    fn test_last_terminal_action_wins() {
        let input = r#"{"Test":"A","Package":"p","Action":"skip","Elapsed":0.1}
{"Test":"A","Package":"p","Action":"output","Output":"rerun\n"}
{"Test":"A","Package":"p","Action":"pass","Elapsed":0.3}
{"Test":"B","Package":"p","Action":"pass","Elapsed":0.1}
{"Test":"B","Package":"p","Action":"fail","Elapsed":0.4}
{"Test":"C","Package":"p","Action":"pass","Elapsed":0.1}
{"Test":"C","Package":"p","Action":"skip","Elapsed":0.0}
"#;
        let outcomes = aggregate(input);

        let a = &outcomes[&key("p", "A")];
        assert!(a.passed && !a.skipped);
        assert_eq!(a.elapsed_time, 0.3);

        let b = &outcomes[&key("p", "B")];
        assert!(b.failed());
        assert_eq!(b.elapsed_time, 0.4);

        let c = &outcomes[&key("p", "C")];
        assert!(!c.passed && c.skipped);
    }

    #[test]
    fn test_screenshots_accumulate() {
        let input = r#"{"Test":"A","Package":"p","Action":"output","Output":"Screenshots : [a.png]\n"}
{"Test":"A","Package":"p","Action":"output","Output":"Screenshots : [b.png c.png]\n"}
"#;
        let outcomes = aggregate(input);
        assert_eq!(
            outcomes[&key("p", "A")].screenshots,
            vec!["a.png", "b.png", "c.png"]
        );
    }

    #[test]
    fn test_packages_seen() {
        let input = r#"{"Package":"z","Action":"start"}
{"Test":"A","Package":"q","Action":"run"}
{"Test":"A","Package":"p","Action":"run"}
"#;
        let mut aggregator = Aggregator::new(false);
        aggregator.read(input.as_bytes()).unwrap();
        let packages: Vec<&String> = aggregator.packages().iter().collect();
        assert_eq!(packages, vec!["p", "q"]);
    }

    #[test]
    fn test_malformed_line_aborts() {
        let input = "{\"Test\":\"A\",\"Package\":\"p\",\"Action\":\"run\"}\n{oops\n";
        let mut aggregator = Aggregator::new(false);
        match aggregator.read(input.as_bytes()) {
            Err(Error::Decode { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_input_file() {
        let mut aggregator = Aggregator::new(false);
        let result = aggregator.read_path(Path::new("/nonexistent/go-test.json"));
        assert!(matches!(result, Err(Error::Input { .. })));
    }
}
