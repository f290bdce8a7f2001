//! rampart server binary.
//!
//! Reads `./app.yml` (or `./configs/app.yml`), installs logging and serves
//! the demonstration routes until SIGTERM / Ctrl-C.
//!
//!   RUST_LOG=debug cargo run
//!   curl -H 'Api-Key: change-me' http://localhost:8080/hello

use std::sync::Arc;

use anyhow::Context;
use rampart::hello::hello;
use rampart::{logging, Router, Server, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = Settings::load().context("loading settings")?;
    logging::init(&loaded.settings.log).context("initialising logging")?;
    loaded.log();
    let settings = Arc::new(loaded.settings);

    let app = Router::new().get("/hello", hello);

    Server::new(settings)
        .serve(app)
        .await
        .context("server error")
}
