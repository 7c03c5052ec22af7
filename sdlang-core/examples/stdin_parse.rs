use std::io::Read;
use std::process::ExitCode;

use sdlang_core::{push_value, EventLog, Scanner};

fn main() -> ExitCode {
    if std::env::var("RUST_LOG").is_ok() {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }

    let mut input = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("read failed: {}", err);
        return ExitCode::FAILURE;
    }

    let mut log = EventLog::new();
    let outcome = push_value(&mut Scanner::new(&input), &mut log);
    for event in &log.events {
        eprintln!("EVENT: {}", event);
    }
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR [{}]: {}", err.code(), err);
            ExitCode::FAILURE
        }
    }
}
