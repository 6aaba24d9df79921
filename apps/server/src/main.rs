use anyhow::Context;
use qdeck::kernel::config::load_config;
use qdeck_logger::Logger;
use qdeck_runtime::RuntimeConfig;
use qdeck_server::Server;

fn main() -> anyhow::Result<()> {
    qdeck_runtime::build_runtime_with_config(&RuntimeConfig::high_performance())?.block_on(
        async {
            let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).init()?;

            let cfg =
                load_config(Some("server")).context("Critical: Configuration is malformed")?;

            Server::builder().config(cfg).build().await?.run().await
        },
    )
}
