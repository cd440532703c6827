//! Interactive terminal client for the newswire daemon.
//!
//! The client connects, sends the newline-terminated identity line, then
//! drives the framed request/response protocol from a text menu. All console
//! interaction goes through generic reader/writer parameters so the full flow
//! is testable without a terminal.

pub mod cli;
pub mod errors;
pub mod menu;
pub mod render;
pub mod transport;

use std::io::{BufRead, Write};

pub use cli::Cli;
pub use errors::AppError;

use crate::transport::Connection;

const FALLBACK_NAME: &str = "client";

/// Connects and runs the interactive session to completion.
///
/// # Errors
///
/// Returns an [`AppError`] when the connection cannot be established or a
/// console or socket operation fails mid-session.
pub fn run<R, W>(cli: Cli, input: &mut R, output: &mut W) -> Result<(), AppError>
where
    R: BufRead,
    W: Write,
{
    let name = match cli.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => prompt_name(input, output)?,
    };

    writeln!(output, "Connecting to {} as {name}...", cli.server)?;
    let mut link = Connection::open(&cli.server, &name)?;
    writeln!(output, "Connected.")?;
    menu::run_session(&mut link, input, output)
}

fn prompt_name<R, W>(input: &mut R, output: &mut W) -> Result<String, AppError>
where
    R: BufRead,
    W: Write,
{
    write!(output, "Enter your name: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let name = line.trim();
    if name.is_empty() {
        Ok(FALLBACK_NAME.to_owned())
    } else {
        Ok(name.to_owned())
    }
}
