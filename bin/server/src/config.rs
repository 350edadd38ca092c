//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables.
//!
//! ```text
//! BASE_URL=https://cloud.example.com
//! WEB_ROOT=/cloud
//! GATE__MODE=federated
//! GATE__PROVIDERS=1=Okta,2=Azure AD
//! GATE__DESKTOP_CLIENTS_ALLOWED=true
//! ```

use crate::error::ServerError;
use rootcause::Report;
use serde::Deserialize;
use sso_gate_platform_access::{
    AuthConfig, AuthMode, GateSnapshot, IdentityProvider, ProviderRegistry,
};

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Scheme and host absolute URLs are built from (e.g. "https://cloud.example.com").
    pub base_url: String,

    /// Path prefix the application is served under (e.g. "/cloud").
    #[serde(default)]
    pub web_root: String,

    /// Language of user-facing messages.
    #[serde(default = "default_language")]
    pub language: String,

    /// Request gate configuration.
    #[serde(default)]
    pub gate: GateSettings,
}

/// Request gate settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GateSettings {
    /// Authentication mode: "none", "federated" or "header-derived".
    #[serde(default)]
    pub mode: AuthMode,

    /// Send anonymous desktop sync clients through federated login.
    #[serde(default)]
    pub desktop_clients_allowed: bool,

    /// Whether additional (non-federated) user backends are enabled.
    #[serde(default)]
    pub allow_multiple_backends: bool,

    /// Configured identity providers as a comma-separated list of
    /// `id=Display Name` entries, in priority order.
    #[serde(default)]
    pub providers: String,

    /// Header carrying the identity asserted by a fronting proxy in
    /// header-derived mode.
    #[serde(default = "default_trusted_header")]
    pub trusted_header: String,

    /// Reject requests without the trusted header in header-derived mode.
    #[serde(default)]
    pub require_trusted_header: bool,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_trusted_header() -> String {
    "x-remote-user".to_string()
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            mode: AuthMode::default(),
            desktop_clients_allowed: false,
            allow_multiple_backends: false,
            providers: String::new(),
            trusted_header: default_trusted_header(),
            require_trusted_header: false,
        }
    }
}

impl GateSettings {
    /// Parses the provider list.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry has an empty id.
    pub fn identity_providers(&self) -> Result<Vec<IdentityProvider>, Report<ServerError>> {
        self.providers
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (id, name) = entry.split_once('=').unwrap_or((entry, entry));
                let id = id.trim();
                if id.is_empty() {
                    return Err(ServerError::InvalidConfig {
                        details: format!("identity provider entry '{entry}' has no id"),
                    }
                    .into());
                }
                Ok(IdentityProvider::new(id, name.trim()))
            })
            .collect()
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Builds the gate's read-only configuration snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider list or base URL is malformed.
    pub fn gate_snapshot(&self) -> Result<GateSnapshot, Report<ServerError>> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ServerError::InvalidConfig {
                details: format!("base_url '{}' must be an http(s) URL", self.base_url),
            }
            .into());
        }

        let registry = self
            .gate
            .identity_providers()?
            .into_iter()
            .fold(ProviderRegistry::new(), ProviderRegistry::with_provider)
            .with_multiple_backends(self.gate.allow_multiple_backends);
        let auth =
            AuthConfig::new(self.gate.mode).with_desktop_clients(self.gate.desktop_clients_allowed);

        Ok(GateSnapshot::new(auth, registry).with_web_root(self.web_root.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(providers: &str) -> ServerConfig {
        ServerConfig {
            listen_addr: default_listen_addr(),
            base_url: "https://cloud.example.com".to_string(),
            web_root: "/cloud/".to_string(),
            language: default_language(),
            gate: GateSettings {
                providers: providers.to_string(),
                ..GateSettings::default()
            },
        }
    }

    #[test]
    fn gate_settings_have_correct_defaults() {
        let settings = GateSettings::default();
        assert_eq!(settings.mode, AuthMode::Federated);
        assert!(!settings.desktop_clients_allowed);
        assert!(!settings.allow_multiple_backends);
        assert_eq!(settings.trusted_header, "x-remote-user");
        assert!(!settings.require_trusted_header);
    }

    #[test]
    fn providers_parse_in_order() {
        let providers = config("2=Azure AD, 1=Okta,,3")
            .gate
            .identity_providers()
            .expect("providers");

        let ids: Vec<_> = providers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
        assert_eq!(providers[0].display_name, "Azure AD");
        assert_eq!(providers[2].display_name, "3");
    }

    #[test]
    fn provider_without_id_is_rejected() {
        let result = config("=Okta").gate.identity_providers();
        assert!(result.is_err());
    }

    #[test]
    fn snapshot_carries_settings() {
        let mut config = config("1=Okta");
        config.gate.desktop_clients_allowed = true;

        let snapshot = config.gate_snapshot().expect("snapshot");

        assert!(snapshot.auth.desktop_clients_allowed);
        assert_eq!(snapshot.registry.len(), 1);
        assert_eq!(snapshot.web_root, "/cloud");
    }

    #[test]
    fn snapshot_rejects_relative_base_url() {
        let mut config = config("1=Okta");
        config.base_url = "cloud.example.com".to_string();
        assert!(config.gate_snapshot().is_err());
    }

    #[test]
    fn settings_deserialize_from_json() {
        let json = r#"{ "mode": "header-derived", "providers": "1=Okta" }"#;
        let settings: GateSettings = serde_json::from_str(json).expect("deserialize");
        assert_eq!(settings.mode, AuthMode::HeaderDerived);
        assert_eq!(settings.trusted_header, "x-remote-user");
    }
}
