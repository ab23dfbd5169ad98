use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use ledgerbook_cli::{Cli, run};

fn main() -> ExitCode {
    let cli = Cli::parse();
    ledgerbook_observability::init(cli.log_format.into());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match run(&cli, &mut out).and_then(|()| out.flush().map_err(Into::into)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "report failed");
            eprintln!("could not compute: {err:#}");
            ExitCode::FAILURE
        }
    }
}
