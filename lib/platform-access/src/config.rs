//! Read-only configuration snapshot consumed by the gate.
//!
//! The snapshot is loaded once at boot (see the server's `ServerConfig`) and
//! shared immutably between concurrent requests. Nothing in the gate ever
//! mutates it.

use serde::{Deserialize, Serialize};
use sso_gate_core::ProviderId;

/// Which pre-authentication strategy the gate applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// Federated login is not configured; the gate lets everything through.
    None,
    /// Requests are routed through the federated login flow.
    #[default]
    Federated,
    /// Identity is asserted by a fronting proxy through request headers.
    HeaderDerived,
}

/// Authentication settings relevant to request gating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The active authentication mode.
    #[serde(default)]
    pub mode: AuthMode,
    /// Whether unauthenticated desktop sync clients are sent through
    /// federated login when they hit a data-access endpoint.
    #[serde(default)]
    pub desktop_clients_allowed: bool,
}

impl AuthConfig {
    /// Creates settings for the given mode with desktop clients disabled.
    #[must_use]
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            desktop_clients_allowed: false,
        }
    }

    /// Enables or disables federated login for desktop sync clients.
    #[must_use]
    pub fn with_desktop_clients(mut self, allowed: bool) -> Self {
        self.desktop_clients_allowed = allowed;
        self
    }
}

/// Display metadata for one configured identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProvider {
    /// The provider's identifier, forwarded as the `idp` login parameter.
    pub id: ProviderId,
    /// Name shown on the provider selection page.
    #[serde(default)]
    pub display_name: String,
}

impl IdentityProvider {
    /// Creates a provider entry.
    #[must_use]
    pub fn new(id: impl Into<ProviderId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Ordered set of configured identity providers.
///
/// Registration order is preserved and defines the default provider: the
/// first entry is the one a single-provider login redirect targets.
/// Registering an id twice keeps the first entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RegistryRepr", into = "RegistryRepr")]
pub struct ProviderRegistry {
    providers: Vec<IdentityProvider>,
    allow_multiple_backends: bool,
}

impl ProviderRegistry {
    /// Creates an empty registry with a single user backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a provider, ignoring ids that are already registered.
    #[must_use]
    pub fn with_provider(mut self, provider: IdentityProvider) -> Self {
        self.push(provider);
        self
    }

    /// Sets whether additional (non-federated) user backends are enabled.
    #[must_use]
    pub fn with_multiple_backends(mut self, allow: bool) -> Self {
        self.allow_multiple_backends = allow;
        self
    }

    fn push(&mut self, provider: IdentityProvider) {
        if !self.providers.iter().any(|p| p.id == provider.id) {
            self.providers.push(provider);
        }
    }

    /// Returns the providers in registration order.
    #[must_use]
    pub fn providers(&self) -> &[IdentityProvider] {
        &self.providers
    }

    /// Returns the number of configured providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true when no provider is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Returns the provider a direct login redirect targets, if any.
    #[must_use]
    pub fn default_provider(&self) -> Option<&ProviderId> {
        self.providers.first().map(|p| &p.id)
    }

    /// Returns true if additional user backends are enabled.
    #[must_use]
    pub fn allows_multiple_backends(&self) -> bool {
        self.allow_multiple_backends
    }

    /// Returns true when a login must go through provider selection.
    #[must_use]
    pub fn shows_login_options(&self) -> bool {
        self.allow_multiple_backends || self.providers.len() > 1
    }
}

#[derive(Serialize, Deserialize)]
struct RegistryRepr {
    #[serde(default)]
    providers: Vec<IdentityProvider>,
    #[serde(default)]
    allow_multiple_backends: bool,
}

impl From<RegistryRepr> for ProviderRegistry {
    fn from(repr: RegistryRepr) -> Self {
        let mut registry = Self::new().with_multiple_backends(repr.allow_multiple_backends);
        for provider in repr.providers {
            registry.push(provider);
        }
        registry
    }
}

impl From<ProviderRegistry> for RegistryRepr {
    fn from(registry: ProviderRegistry) -> Self {
        Self {
            providers: registry.providers,
            allow_multiple_backends: registry.allow_multiple_backends,
        }
    }
}

/// Everything the gate reads from configuration, captured at boot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSnapshot {
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Configured identity providers.
    #[serde(default)]
    pub registry: ProviderRegistry,
    /// Path prefix the application is served under (e.g. `/cloud`).
    #[serde(default)]
    pub web_root: String,
}

impl GateSnapshot {
    /// Creates a snapshot from its parts with an empty web root.
    #[must_use]
    pub fn new(auth: AuthConfig, registry: ProviderRegistry) -> Self {
        Self {
            auth,
            registry,
            web_root: String::new(),
        }
    }

    /// Sets the web root, dropping any trailing slash.
    #[must_use]
    pub fn with_web_root(mut self, web_root: impl Into<String>) -> Self {
        let web_root = web_root.into();
        self.web_root = web_root.trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_federated() {
        assert_eq!(AuthConfig::default().mode, AuthMode::Federated);
        assert!(!AuthConfig::default().desktop_clients_allowed);
    }

    #[test]
    fn registry_preserves_registration_order() {
        let registry = ProviderRegistry::new()
            .with_provider(IdentityProvider::new("2", "Second"))
            .with_provider(IdentityProvider::new("1", "First"));

        assert_eq!(registry.default_provider(), Some(&ProviderId::from("2")));
        let ids: Vec<_> = registry.providers().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn registry_ignores_duplicate_ids() {
        let registry = ProviderRegistry::new()
            .with_provider(IdentityProvider::new("1", "Okta"))
            .with_provider(IdentityProvider::new("1", "Okta again"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.providers()[0].display_name, "Okta");
    }

    #[test]
    fn empty_registry_has_no_default_provider() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.default_provider().is_none());
        assert!(!registry.shows_login_options());
    }

    #[test]
    fn login_options_shown_for_multiple_providers_or_backends() {
        let single = ProviderRegistry::new().with_provider(IdentityProvider::new("1", "A"));
        assert!(!single.shows_login_options());

        let backends = single.clone().with_multiple_backends(true);
        assert!(backends.shows_login_options());

        let several = single.with_provider(IdentityProvider::new("2", "B"));
        assert!(several.shows_login_options());
    }

    #[test]
    fn snapshot_deserializes_with_defaults() {
        let json = r#"{
            "auth": { "mode": "header-derived" },
            "registry": {
                "providers": [
                    { "id": "1", "display_name": "Okta" },
                    { "id": "2" }
                ]
            }
        }"#;

        let snapshot: GateSnapshot = serde_json::from_str(json).expect("deserialize");

        assert_eq!(snapshot.auth.mode, AuthMode::HeaderDerived);
        assert!(!snapshot.auth.desktop_clients_allowed);
        assert_eq!(snapshot.registry.len(), 2);
        assert!(!snapshot.registry.allows_multiple_backends());
        assert_eq!(snapshot.registry.providers()[1].display_name, "");
        assert_eq!(snapshot.web_root, "");
    }

    #[test]
    fn web_root_drops_trailing_slash() {
        let snapshot = GateSnapshot::default().with_web_root("/cloud/");
        assert_eq!(snapshot.web_root, "/cloud");
    }
}
