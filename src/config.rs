//! Server settings resolved from CLI flags and environment

use anyhow::{bail, Result};
use clap::Args;
use std::net::SocketAddr;
use tracing::warn;

/// Value of `--database-url` that selects the in-memory store
pub const MEMORY_STORE: &str = "memory";

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Database URL (postgres://..., sqlite://..., or "memory")
    #[arg(long, env = "DB_URI", default_value = "sqlite://./taskly.db?mode=rwc")]
    pub database_url: String,

    /// Database name, replaces the database in a server URL
    #[arg(long, env = "DB_NAME")]
    pub database_name: Option<String>,

    /// Secret used to sign session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Address to bind the API server
    #[arg(long, env = "TASKLY_BIND", default_value = "127.0.0.1:4000")]
    pub bind: SocketAddr,

    /// Allow cross-origin requests from localhost
    #[arg(long, env = "TASKLY_CORS")]
    pub cors: bool,
}

/// Where user records live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Memory,
    Database(String),
}

#[derive(Clone)]
pub struct ServerSettings {
    pub store: StoreTarget,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub enable_cors: bool,
}

impl ServeArgs {
    pub fn into_settings(self) -> Result<ServerSettings> {
        if self.jwt_secret.trim().is_empty() {
            bail!("JWT secret must not be empty (set --jwt-secret or JWT_SECRET)");
        }

        let store = if self.database_url == MEMORY_STORE {
            StoreTarget::Memory
        } else {
            StoreTarget::Database(resolve_database_url(
                &self.database_url,
                self.database_name.as_deref(),
            ))
        };

        Ok(ServerSettings {
            store,
            jwt_secret: self.jwt_secret,
            bind_addr: self.bind,
            enable_cors: self.cors,
        })
    }
}

fn resolve_database_url(url: &str, name: Option<&str>) -> String {
    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return url.to_string();
    };

    match taskly_store::with_database_name(url, name) {
        Some(resolved) => resolved,
        None => {
            warn!("Ignoring database name '{}' for {}", name, url);
            url.to_string()
        }
    }
}
