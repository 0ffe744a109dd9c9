use std::path::PathBuf;

use clap::Parser;

use crate::io::format::cidets_output;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs a nicely formatted `cidets` heading to the `cidets-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    cidets_output!("╭─────────────────────────────────────────────────────────────────────────────────────────────────────╮");
    cidets_output!("│                                                                                                     │");
    cidets_output!("│               ██████╗██╗██████╗ ███████╗████████╗███████╗                                           │");
    cidets_output!("│              ██╔════╝██║██╔══██╗██╔════╝╚══██╔══╝██╔════╝                                           │");
    cidets_output!("│              ██║     ██║██║  ██║█████╗     ██║   ███████╗                                           │");
    cidets_output!("│              ██║     ██║██║  ██║██╔══╝     ██║   ╚════██║                                           │");
    cidets_output!("│              ╚██████╗██║██████╔╝███████╗   ██║   ███████║                                           │");
    cidets_output!("│               ╚═════╝╚═╝╚═════╝ ╚══════╝   ╚═╝   ╚══════╝                                           │");
    cidets_output!("│                                                                                                     │");
    cidets_output!("│              Excited determinants for configuration interaction                     {version:>15} │");
    cidets_output!("│                                                                                                     │");
    cidets_output!("╰─────────────────────────────────────────────────────────────────────────────────────────────────────╯");
    cidets_output!("");
}

/// Command-line arguments of the `cidets` binary.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// The YAML configuration file.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Optional name of the file to which the main output is written. If not given, the main
    /// output is written to the console.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Turns on debug logging on the console.
    #[arg(short, long)]
    pub debug: bool,
}
