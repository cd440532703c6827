use std::process::ExitCode;

use newswire_config::Config;

fn main() -> ExitCode {
    let config = Config::load();
    match newswired::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("newswired: {error}");
            ExitCode::FAILURE
        }
    }
}
