// src/main.rs

use goreload::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level, args.debug) {
        eprintln!("goreload: failed to initialise logging: {err:?}");
    }

    if let Err(err) = run(args).await {
        eprintln!("goreload error: {err}");
        std::process::exit(err.exit_code());
    }
}
