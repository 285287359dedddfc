//! Command-line and environment configuration.
//!
//! Every flag has an environment fallback so the binary runs unchanged
//! under a process manager:
//!
//! | Flag | Env | Default |
//! |---|---|---|
//! | `--addr` | `MINIBLOG_ADDR` | `127.0.0.1:8000` |
//! | `--log-level` | `MINIBLOG_LOG` | `info` |
//! | `--no-seed` | `MINIBLOG_NO_SEED` | off |
//!
//! `RUST_LOG`, when set, overrides `--log-level`.

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::store::PostStore;

#[derive(Debug, Clone, Parser)]
#[command(name = "miniblog", version, about = "A small in-memory blog post service")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "MINIBLOG_ADDR", default_value = "127.0.0.1:8000")]
    pub addr: SocketAddr,

    /// Default log filter, e.g. `info` or `miniblog=debug`.
    #[arg(long, env = "MINIBLOG_LOG", default_value = "info")]
    pub log_level: String,

    /// Start with an empty store instead of the sample posts.
    #[arg(long, env = "MINIBLOG_NO_SEED")]
    pub no_seed: bool,
}

impl Config {
    /// Installs the global `tracing` subscriber.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    pub fn build_store(&self) -> PostStore {
        if self.no_seed {
            PostStore::new()
        } else {
            PostStore::seeded()
        }
    }
}
