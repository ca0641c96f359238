use clap::Parser;
use tracing_subscriber::EnvFilter;

use rover_teleop::cli::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logs go to stderr so the status line on stdout stays on one row (RUST_LOG=debug for more)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = rover_teleop::runtime::run(args.into_config()).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
