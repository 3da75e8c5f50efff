//! Binary entrypoint for the tasktrack tool

#[tokio::main]
async fn main() {
    if let Err(e) = tasktrack::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
