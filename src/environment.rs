//! Decides whether the client runs embedded in a WordPress host or standalone.

use std::env;
use std::sync::RwLock;

use lazy_static::lazy_static;
use serde::Serialize;

use crate::enums::ApiMode;

pub const WP_HOME_URL_VAR: &str = "BLACKCNOTE_WP_HOME_URL";
pub const WP_NONCE_VAR: &str = "BLACKCNOTE_WP_NONCE";
pub const API_BASE_URL_VAR: &str = "BLACKCNOTE_API_BASE_URL";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;

/// What the resolver decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentConfig {
    pub mode: ApiMode,
    pub api_base_url: String,
    /// Site-issued nonce; only ever present in embedded mode.
    pub auth_token: Option<String>,
}

impl EnvironmentConfig {
    pub fn standalone(api_base_url: impl Into<String>) -> Self {
        Self {
            mode: ApiMode::Standalone,
            api_base_url: trim_base(&api_base_url.into()),
            auth_token: None,
        }
    }

    pub fn embedded(home_url: impl Into<String>, nonce: Option<String>) -> Self {
        Self {
            mode: ApiMode::Embedded,
            api_base_url: trim_base(&home_url.into()),
            auth_token: nonce.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Snapshot of the inputs the resolver looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeContext {
    pub wp_home_url: Option<String>,
    pub wp_nonce: Option<String>,
    pub api_base_url: Option<String>,
    pub server_host: Option<String>,
    pub server_port: Option<String>,
}

impl RuntimeContext {
    pub fn capture() -> Self {
        Self {
            wp_home_url: env::var(WP_HOME_URL_VAR).ok(),
            wp_nonce: env::var(WP_NONCE_VAR).ok(),
            api_base_url: env::var(API_BASE_URL_VAR).ok(),
            server_host: env::var("SERVER_HOST").ok(),
            server_port: env::var("SERVER_PORT").ok(),
        }
    }

    fn same_origin(&self) -> String {
        let host = match non_blank(&self.server_host) {
            Some(h) if h != "0.0.0.0" && h != "::" => h,
            _ => DEFAULT_HOST.to_string(),
        };
        let port = non_blank(&self.server_port)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        format!("http://{}:{}", host, port)
    }
}

/// Memoizes the last resolution; recomputes only when the runtime context changes.
#[derive(Debug, Default)]
pub struct EnvironmentResolver {
    resolved: RwLock<Option<(RuntimeContext, EnvironmentConfig)>>,
}

impl EnvironmentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure mapping from a context to a config. Never fails.
    pub fn resolve_context(context: &RuntimeContext) -> EnvironmentConfig {
        if let Some(home_url) = non_blank(&context.wp_home_url) {
            return EnvironmentConfig::embedded(home_url, non_blank(&context.wp_nonce));
        }

        match non_blank(&context.api_base_url) {
            Some(base) => EnvironmentConfig::standalone(base),
            None => EnvironmentConfig::standalone(context.same_origin()),
        }
    }

    pub fn resolve(&self) -> EnvironmentConfig {
        self.resolve_with(RuntimeContext::capture())
    }

    pub fn resolve_with(&self, context: RuntimeContext) -> EnvironmentConfig {
        // A poisoned lock only means another reader panicked; the cached value is still sound.
        {
            let guard = self.resolved.read().unwrap_or_else(|e| e.into_inner());
            if let Some((cached_context, config)) = guard.as_ref() {
                if *cached_context == context {
                    return config.clone();
                }
            }
        }

        let config = Self::resolve_context(&context);
        tracing::debug!(
            "Resolved API environment: mode={} base_url={}",
            config.mode,
            config.api_base_url
        );

        let mut guard = self.resolved.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some((context, config.clone()));
        config
    }
}

lazy_static! {
    static ref PROCESS_RESOLVER: EnvironmentResolver = EnvironmentResolver::new();
}

/// Resolve against the current process environment.
pub fn resolve() -> EnvironmentConfig {
    PROCESS_RESOLVER.resolve()
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
