pub mod api;

use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Context;

use crate::config::Config;
use crate::network::prefix::compiled_prefixes;

/// Run the HTTP API until the process is interrupted.
pub fn start(config: &Config) -> anyhow::Result<()> {
    // Compile the table before accepting requests so bad entries are logged once.
    let entries = compiled_prefixes().len();

    let sys = actix_rt::System::new();
    sys.block_on(async {
        let server = HttpServer::new(|| {
            App::new()
                .wrap(Logger::default())
                .service(api::health)
                .service(api::classify_endpoint)
                .service(api::known_prefixes)
        })
        .workers(config.workers)
        .bind(config.bind_addr.as_str())
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

        tracing::info!(
            bind_addr = %config.bind_addr,
            workers = config.workers,
            entries,
            "starting web server"
        );

        server.run().await.context("web server stopped unexpectedly")
    })
}
