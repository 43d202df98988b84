mod app;

use app::{AppConfig, Cli};
use clap::Parser;

fn main() {
    tracing_subscriber::fmt::init();
    let config = AppConfig::from_env();
    if let Err(err) = app::run(config, Cli::parse()) {
        eprintln!("habits: {err}");
        std::process::exit(1);
    }
}
