#[macro_use]
extern crate log;

mod app;
mod configuration;
mod reporter;
mod time;

use log::LevelFilter;
use std::{path::PathBuf, process::exit, time::Instant};
use structopt::StructOpt;

use self::app::App;
use self::{
    configuration::command_line::{LogLevel, Opt},
    configuration::settings::Settings,
};

#[tokio::main]
async fn main() {
    let started = Instant::now();
    let options = Opt::from_args();

    if let Err(e) = init_logging(
        options.logging.unwrap_or(LogLevel::Info).into(),
        &options.log_output_file,
    ) {
        eprintln!("Failed to initialize logging: {}", e);
        exit(1);
    }

    let config = match Settings::load(&options).and_then(Settings::validate) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            exit(1);
        }
    };
    debug!("Initiated configuration {:#?}", config);

    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };
    match app.run().await {
        Ok(_) => println!(
            "[report] finished in {}",
            time::format_duration(started.elapsed())
        ),
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    }
}

fn init_logging(level: LevelFilter, output: &Option<PathBuf>) -> Result<(), fern::InitError> {
    let mut dispatcher = fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record
                    .line()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "".to_owned()),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(log_file) = output {
        dispatcher = dispatcher.chain(fern::log_file(log_file)?)
    }
    dispatcher.apply()?;
    debug!("Logging level {} enabled", level);
    Ok(())
}
