use std::sync::Arc;

use clap::Parser;
use tracing::info;

use miniblog::{api, Config, Server};

#[tokio::main]
async fn main() -> Result<(), miniblog::Error> {
    let config = Config::parse();
    config.init_tracing();

    let store = Arc::new(config.build_store());
    info!(posts = store.len(), seeded = !config.no_seed, "post store ready");

    Server::bind(config.addr).serve(api::router(store)).await
}
