use crate::app::aggregate::{TestKey, TestOutcome};
use crate::app::locate::LocationsByPackage;
use serde_derive::Serialize;
use std::collections::HashMap;

/// A bucket of at most `group_size` outcomes, shown as one clickable indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportGroup {
    pub failure_indicator: String,
    pub skipped_indicator: String,
    pub test_results: Vec<TestOutcome>,
}

impl ReportGroup {
    pub fn failed(&self) -> bool {
        !self.failure_indicator.is_empty()
    }

    pub fn skipped(&self) -> bool {
        self.failure_indicator.is_empty() && !self.skipped_indicator.is_empty()
    }

    fn push(&mut self, outcome: TestOutcome, tally: &mut Tally) {
        if outcome.failed() {
            self.failure_indicator = "failed".to_owned();
            tally.fail += 1;
        } else if outcome.skipped {
            self.skipped_indicator = "skipped".to_owned();
            tally.skip += 1;
        } else {
            tally.pass += 1;
        }
        self.test_results.push(outcome);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.pass + self.fail + self.skip
    }
}

/// Sorts outcomes by test name (package breaks ties), attaches source
/// locations and cuts the result into groups of `group_size`.
pub fn group_outcomes(
    outcomes: HashMap<TestKey, TestOutcome>,
    locations: &LocationsByPackage,
    group_size: usize,
) -> (Vec<ReportGroup>, Tally) {
    let group_size = group_size.max(1);
    let mut sorted: Vec<TestOutcome> = outcomes.into_values().collect();
    sorted.sort_by(|a, b| {
        a.test_name
            .cmp(&b.test_name)
            .then_with(|| a.package.cmp(&b.package))
    });

    let mut tally = Tally::default();
    let mut groups: Vec<ReportGroup> =
        Vec::with_capacity((sorted.len() + group_size - 1) / group_size);
    for mut outcome in sorted {
        if let Some(location) = locations
            .get(&outcome.package)
            .and_then(|by_test| by_test.get(&outcome.test_name))
        {
            outcome.attach_location(location);
        }
        let full = groups
            .last()
            .map_or(true, |group| group.test_results.len() >= group_size);
        if full {
            groups.push(ReportGroup::default());
        }
        if let Some(group) = groups.last_mut() {
            group.push(outcome, &mut tally);
        }
    }
    (groups, tally)
}
