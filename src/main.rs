//! jsondb command-line interpreter
//!
//! Reads one `;`-terminated statement per line from stdin (or `-c` / `-f`),
//! prints each result, and saves every database on exit.

use std::io::{self, BufRead, Write};

use clap::Parser as _;
use jsondb::{
    config::{Args, Config},
    error::Error,
    sql::{engine::Session, parser::Parser},
    storage::engine::Storage,
};
use tracing_subscriber::EnvFilter;

/// What the caller should do after a line
enum Flow {
    Continue,
    Exit,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jsondb=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from(args);
    let mut session = config.open_session()?;

    if let Some(command) = &args.command {
        handle_line(&mut session, command);
    } else if let Some(file) = &args.file {
        let content = std::fs::read_to_string(file)?;
        for line in content.lines() {
            if let Flow::Exit = handle_line(&mut session, line) {
                break;
            }
        }
    } else {
        run_repl(&mut session)?;
    }

    session.shutdown()?;
    Ok(())
}

fn run_repl<S: Storage + 'static>(session: &mut Session<S>) -> io::Result<()> {
    println!("jsondb - type HELP; for commands, EXIT; to quit");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("jsondb ({})> ", session.current_database().unwrap_or("none"));
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            break;
        };
        if let Flow::Exit = handle_line(session, &line) {
            break;
        }
    }
    println!("Goodbye!");
    Ok(())
}

fn handle_line<S: Storage + 'static>(session: &mut Session<S>, line: &str) -> Flow {
    let line = line.trim();
    if Parser::is_ignorable(line) {
        return Flow::Continue;
    }
    let Some(command) = line.strip_suffix(';') else {
        eprintln!("Multi-line statements are not supported, end each statement with ';'.");
        return Flow::Continue;
    };
    if matches!(command.trim().to_uppercase().as_str(), "EXIT" | "QUIT") {
        return Flow::Exit;
    }

    match session.execute_line(line) {
        Ok(Some(result)) => println!("{}", result),
        Ok(None) => {}
        Err(err @ Error::Io(_)) => {
            eprintln!("{} (in-memory state may be ahead of disk)", err)
        }
        Err(err) => eprintln!("{}", err),
    }
    Flow::Continue
}
