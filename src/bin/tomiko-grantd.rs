use clap::Parser;
use tracing::{event, Level};

#[tokio::main]
async fn main() -> Result<(), ()> {
    use tomiko_grant::util::cli::*;

    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let opts = Options::parse();
    tomiko_grantd(opts).await.map_err(|e| {
        event!(Level::ERROR, error = %e, "Failed to start grant server");
    })
}
