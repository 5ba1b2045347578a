use clap::Parser;

use cpg_explorer::cli::{run, Cli};
use cpg_explorer::observability::init_logging;

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        tracing::error!(error = %err, "fatal");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
