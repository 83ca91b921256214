// src/main.rs

use termwatch::errors::{self, SupervisorError};
use termwatch::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("termwatch error: {err:?}");
    }

    let description = args.command.join(" ");
    let outcome = run(args).await;
    match &outcome {
        Ok(_) => println!("Command {description} completed successfully."),
        Err(SupervisorError::EmptyCommand) => println!("{}", cli::usage()),
        Err(err) => eprintln!("Command {description} failed: {err}"),
    }
    std::process::exit(errors::exit_code(&outcome));
}
