mod application;
mod config;
mod domain;
mod infra;
mod utils;

#[tokio::main]
async fn main() -> tokio::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = config::Config::load().await?;
    let mut messenger = application::Messenger::new_default(config).await?;

    messenger.run().await
}
