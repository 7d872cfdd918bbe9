use dlticker_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Diagnostics go to a file so they never land inside the live frame.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("dlticker error: {:#}", err);
        std::process::exit(1);
    }
}
