use clap::Parser;

use taskdesk_app::presentation::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    if let Err(err) = cli::run(args).await {
        log::error!("[cli] command failed: {}", err);
        eprintln!("error: {}", err);
        if let Some(hint) = err.hint() {
            eprintln!("{}", hint);
        }
        std::process::exit(err.exit_code());
    }
}
