use clap::Parser;
use pitboss::players::fish::Fish;
use pitboss::protocol::mirror::Mirror;
use tokio::net::TcpListener;

/// Reference bot runner: serves a random-play agent on one port.
#[derive(Parser)]
#[command(name = "skeleton", about = "serve an example bot for the engine to play")]
struct Args {
    /// address to listen on
    #[arg(long, default_value = "127.0.0.1:50051")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    pitboss::log();
    let listener = TcpListener::bind(&args.bind).await?;
    log::info!("bot listening on {}", args.bind);
    Mirror::new(Fish).run(listener).await
}
