pub mod cli;
pub mod settings;

use clap::Parser;
use cli::Cli;
use nekoweb_api::NotificationLevel;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
///
/// `log` records from the library crate reach it through the `tracing-log`
/// bridge installed by `try_init`.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let notification = runtime.block_on(cli::execute(cli));
    match notification.level {
        NotificationLevel::Info => {
            println!("{}", notification);
            ExitCode::SUCCESS
        }
        NotificationLevel::Warning | NotificationLevel::Error => {
            eprintln!("{}", notification);
            ExitCode::FAILURE
        }
    }
}
