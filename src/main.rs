use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = backhaul::cli::Cli::parse();
    if let Err(e) = backhaul::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
