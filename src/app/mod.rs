pub(crate) mod aggregate;
pub(crate) mod error;
pub(crate) mod event;
pub(crate) mod group;
pub(crate) mod locate;

use crate::app::aggregate::Aggregator;
use crate::app::error::Result;
use crate::app::group::{group_outcomes, Tally};
use crate::app::locate::{locate_by_lookup, locate_from_manifest, GoList, LocationsByPackage};
use crate::configuration::constants::common::{END_TIME_ENV, START_TIME_ENV};
use crate::configuration::settings::ReportConfig;
use crate::reporter::status::Status;
use crate::reporter::{ReportSummary, Renderer};
use crate::time::{elapsed_between, format_duration, format_execution_date, parse_unix_date};
use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct App {
    config: ReportConfig,
    renderer: Renderer,
}

impl App {
    pub fn new(config: ReportConfig) -> Result<Self> {
        Ok(App {
            config,
            renderer: Renderer::new()?,
        })
    }

    /// Reads the test events, locates test sources, writes the status file and
    /// the HTML report.
    pub async fn run(&self) -> Result<Tally> {
        let config = &self.config;
        let start_time = env_date(START_TIME_ENV).unwrap_or_else(Local::now);

        info!("Reading test events from {}", config.input.display());
        let mut aggregator = Aggregator::new(config.verbose);
        aggregator.read_path(&config.input)?;
        info!("Collected tests from {} packages", aggregator.packages().len());
        let (outcomes, packages) = aggregator.finish();

        let end_time = env_date(END_TIME_ENV).unwrap_or_else(Local::now);
        let test_duration = format_duration(elapsed_between(&start_time, &end_time));

        let locations = self.locate(&packages).await?;
        let (groups, tally) = group_outcomes(outcomes, &locations, config.group_size);
        info!(
            "{} tests in {} groups: {} passed, {} failed, {} skipped",
            tally.total(),
            groups.len(),
            tally.pass,
            tally.fail,
            tally.skip
        );
        debug!(
            "{} groups with failures, {} groups with skips only",
            groups.iter().filter(|group| group.failed()).count(),
            groups.iter().filter(|group| group.skipped()).count()
        );

        let status = Status::from(&tally);
        status.write(&config.status_env)?;

        let mut summary = ReportSummary::new(&config.title, config.size, groups, &tally);
        summary.test_duration = test_duration;
        summary.execution_date = format_execution_date(&Local::now());
        summary.input_filename = config.input.display().to_string();
        summary.output_filename = config.output.display().to_string();
        summary.server_info = config.server_info.clone();

        status
            .with_elapsed_time(summary.test_duration.clone())
            .write(&config.status_env)?;
        self.renderer.render_to_file(&summary, &config.output)?;
        Ok(tally)
    }

    async fn locate(&self, packages: &BTreeSet<String>) -> Result<LocationsByPackage> {
        match &self.config.list {
            Some(list) => {
                info!("Reading package list from {}", list.display());
                locate_from_manifest(list)
            }
            None => {
                info!("Looking up {} packages", packages.len());
                let lookup = Arc::new(GoList::new(&self.config.lookup_command)?);
                locate_by_lookup(lookup, packages, self.config.jobs).await
            }
        }
    }
}

fn env_date(name: &str) -> Option<DateTime<Local>> {
    let value = std::env::var(name).ok()?;
    let parsed = parse_unix_date(&value);
    if parsed.is_none() {
        warn!("Ignoring {}='{}', expected a `date` formatted timestamp", name, value);
    }
    parsed
}
