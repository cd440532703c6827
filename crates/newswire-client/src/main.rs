//! Entrypoint for the interactive newswire client.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use newswire_client::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    match newswire_client::run(cli, &mut input, &mut output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("newswire: {error}");
            ExitCode::FAILURE
        }
    }
}
