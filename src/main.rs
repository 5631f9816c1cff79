use std::process::ExitCode;

use clap::Parser;

use cinecsv::config::{self, ApiKeys, Cli, Command};

mod logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::setup_logging();
    config::load_dotenv();

    let result = match cli.command {
        Command::FilterDates(args) => cinecsv::run_date_filter(&args).map(|_| ()),
        Command::Enrich(args) => {
            async { cinecsv::run_enricher(&args, ApiKeys::from_env()?).await }
                .await
                .map(|_| ())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", report(&e));
            ExitCode::FAILURE
        }
    }
}

/// The error followed by each of its sources.
fn report(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
