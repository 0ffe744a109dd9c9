use std::path::PathBuf;

use anyhow::{self, format_err};
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use cidets::interfaces::cli::{log_heading, Cli};
use cidets::interfaces::input::Input;
use cidets::interfaces::InputHandle;
use cidets::io::read_cidets_yaml;

/// Builds the logging configuration.
///
/// Diagnostics go to standard error. The main output goes to `<output>.out` when an output name
/// is given, and to standard output otherwise.
fn logging_config(output: Option<&PathBuf>, debug: bool) -> Result<Config, anyhow::Error> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t}] {m}{n}")))
        .build();
    let output_appender: Box<dyn log4rs::append::Append> = if let Some(name) = output {
        let mut path = name.clone();
        path.set_extension("out");
        Box::new(
            FileAppender::builder()
                .append(false)
                .encoder(Box::new(PatternEncoder::new("{m}{n}")))
                .build(path)?,
        )
    } else {
        Box::new(
            ConsoleAppender::builder()
                .encoder(Box::new(PatternEncoder::new("{m}{n}")))
                .build(),
        )
    };

    Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .appender(Appender::builder().build("output", output_appender))
        .logger(
            Logger::builder()
                .appender("output")
                .additive(false)
                .build("cidets-output", LevelFilter::Info),
        )
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|err| format_err!(err))
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    log4rs::init_config(logging_config(cli.output.as_ref(), cli.debug)?)?;

    log_heading();
    let inp = read_cidets_yaml::<Input, _>(&cli.config)?;
    inp.handle()
}
