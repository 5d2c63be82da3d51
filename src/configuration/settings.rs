use crate::app::error::{Error, Result};
use crate::configuration::command_line::Opt;
use crate::configuration::constants::common::{MAX_PARALLEL_LOOKUPS, SETTINGS_ENV_PREFIX};
use crate::configuration::constants::defaults;
use crate::configuration::server_info::{parse_server_info, ServerInfo};
use crate::configuration::size::IndicatorSize;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde_derive::Deserialize;
use std::path::{Path, PathBuf};

/// Raw settings as merged from defaults, config file, environment and flags.
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub status_env: PathBuf,
    pub title: String,
    pub size: String,
    pub group_size: i64,
    pub list: Option<PathBuf>,
    #[serde(default)]
    pub server_info: String,
    #[serde(default)]
    pub verbose: bool,
    pub jobs: i64,
    pub lookup_command: Vec<String>,
}

/// Validated configuration the pipeline runs with.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status_env: PathBuf,
    pub title: String,
    pub size: IndicatorSize,
    pub group_size: usize,
    pub list: Option<PathBuf>,
    pub server_info: Vec<ServerInfo>,
    pub verbose: bool,
    pub jobs: usize,
    pub lookup_command: Vec<String>,
}

impl Settings {
    pub fn load(opt: &Opt) -> Result<Self> {
        let lookup_command: Vec<String> = defaults::LOOKUP_COMMAND
            .iter()
            .map(|part| part.to_string())
            .collect();
        let mut builder = Config::builder()
            .set_default("title", defaults::TITLE)?
            .set_default("size", defaults::SIZE)?
            .set_default("group_size", defaults::GROUP_SIZE)?
            .set_default("output", defaults::OUTPUT)?
            .set_default("status_env", defaults::STATUS_ENV)?
            .set_default("server_info", "")?
            .set_default("verbose", false)?
            .set_default("jobs", MAX_PARALLEL_LOOKUPS as i64)?
            .set_default("lookup_command", lookup_command)?;
        if let Some(file) = &opt.config {
            builder = builder.add_source(File::from(file.as_path()));
        }
        builder = builder.add_source(
            Environment::with_prefix(SETTINGS_ENV_PREFIX)
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("lookup_command"),
        );
        builder = apply_flags(builder, opt)?;

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn validate(self) -> Result<ReportConfig> {
        let input = self
            .input
            .ok_or_else(|| Error::Configuration("an input file is required (--input)".to_owned()))?;
        let size = self.size.parse::<IndicatorSize>()?;
        if self.group_size <= 0 {
            return Err(Error::Configuration(format!(
                "group size must be positive, got {}",
                self.group_size
            )));
        }
        if self.jobs <= 0 {
            return Err(Error::Configuration(format!(
                "amount of parallel lookups must be positive, got {}",
                self.jobs
            )));
        }
        if self.lookup_command.is_empty() {
            return Err(Error::Configuration(
                "lookup command must name a program".to_owned(),
            ));
        }
        Ok(ReportConfig {
            input,
            output: self.output,
            status_env: self.status_env,
            title: self.title,
            size,
            group_size: self.group_size as usize,
            list: self.list,
            server_info: parse_server_info(&self.server_info),
            verbose: self.verbose,
            jobs: self.jobs as usize,
            lookup_command: self.lookup_command,
        })
    }
}

fn apply_flags(
    mut builder: ConfigBuilder<DefaultState>,
    opt: &Opt,
) -> Result<ConfigBuilder<DefaultState>> {
    if let Some(input) = &opt.input {
        builder = builder.set_override("input", path_value(input))?;
    }
    if let Some(output) = &opt.output {
        builder = builder.set_override("output", path_value(output))?;
    }
    if let Some(status_env) = &opt.status_env {
        builder = builder.set_override("status_env", path_value(status_env))?;
    }
    if let Some(list) = &opt.list {
        builder = builder.set_override("list", path_value(list))?;
    }
    if let Some(title) = &opt.title {
        builder = builder.set_override("title", title.as_str())?;
    }
    if let Some(size) = &opt.size {
        builder = builder.set_override("size", size.as_str())?;
    }
    if let Some(group_size) = opt.group_size {
        builder = builder.set_override("group_size", group_size)?;
    }
    if let Some(server_info) = &opt.server_info {
        builder = builder.set_override("server_info", server_info.as_str())?;
    }
    if let Some(jobs) = opt.jobs {
        builder = builder.set_override("jobs", jobs as i64)?;
    }
    if opt.verbose {
        builder = builder.set_override("verbose", true)?;
    }
    Ok(builder)
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
