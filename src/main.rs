mod app;

use clap::Parser;
use std::process;

use app::cli::Cli;
use app::diagnostics::LogDiagnostics;

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli);

    if let Err(e) = app::run(&cli, &LogDiagnostics) {
        log::error!("{:#}", e);
        process::exit(1);
    }
}

fn setup_logging(cli: &Cli) {
    let level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    // RUST_LOG, when set, overrides the flags.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
    log::trace!("Logger initialized with level: {:?}", level);
}
