//! Host-side implementations of the gate's collaborators.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rootcause::Report;
use sso_gate_core::RouteName;
use sso_gate_platform_access::{
    CsrfTokenIssuer, DISABLED_ACCOUNT_MESSAGE, GateError, HeaderAuthOutcome, HeaderAuthenticator,
    Localizer, RequestContext, UrlGenerator,
};
use std::collections::{BTreeMap, HashMap};
use ulid::Ulid;

/// Builds absolute URLs under the configured base URL and web root.
#[derive(Debug, Clone)]
pub struct RouteUrls {
    base_url: String,
    web_root: String,
}

impl RouteUrls {
    /// Creates a URL builder. Trailing slashes are dropped from both parts.
    #[must_use]
    pub fn new(base_url: &str, web_root: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            web_root: web_root.trim_end_matches('/').to_string(),
        }
    }
}

impl UrlGenerator for RouteUrls {
    fn link_to_route_absolute(
        &self,
        route: RouteName,
        params: &BTreeMap<String, String>,
    ) -> Result<String, Report<GateError>> {
        let mut url = format!("{}{}{}", self.base_url, self.web_root, route.path());
        let query = params
            .iter()
            .map(|(name, value)| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }

    /// Targets are always resolved against the base URL, so a full URL to
    /// another host ends up as a path on this one.
    fn absolute_url(&self, target: &str) -> Result<String, Report<GateError>> {
        if target.contains(['\r', '\n']) {
            return Err(GateError::AbsoluteUrl {
                target: target.escape_debug().to_string(),
                reason: "line break in target".to_string(),
            }
            .into());
        }
        let separator = if target.starts_with('/') { "" } else { "/" };
        Ok(format!("{}{separator}{target}", self.base_url))
    }
}

/// Static message catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: HashMap<&'static str, &'static str>,
}

impl Catalog {
    /// Returns the catalog for a language; unknown languages fall back to
    /// the English source text.
    #[must_use]
    pub fn for_language(language: &str) -> Self {
        let entries = match language {
            "de" => HashMap::from([(
                DISABLED_ACCOUNT_MESSAGE,
                "Dieses Benutzerkonto ist deaktiviert, bitte kontaktieren Sie Ihren Administrator.",
            )]),
            "fr" => HashMap::from([(
                DISABLED_ACCOUNT_MESSAGE,
                "Ce compte utilisateur est désactivé, veuillez contacter votre administrateur.",
            )]),
            _ => HashMap::new(),
        };
        Self { entries }
    }
}

impl Localizer for Catalog {
    fn translate(&self, message_id: &str) -> Result<String, Report<GateError>> {
        Ok(self
            .entries
            .get(message_id)
            .copied()
            .unwrap_or(message_id)
            .to_string())
    }
}

/// Issues request tokens for the federated login form.
///
/// The token is fixed for the process; each issued value is masked with a
/// fresh one-time pad and rendered as `base64(token ^ pad):base64(pad)`.
#[derive(Debug, Clone)]
pub struct MaskedTokens {
    token: [u8; 16],
}

impl MaskedTokens {
    /// Creates an issuer with a random token.
    #[must_use]
    pub fn new() -> Self {
        Self::with_token(Ulid::new().to_bytes())
    }

    /// Creates an issuer for a known token.
    #[must_use]
    pub fn with_token(token: [u8; 16]) -> Self {
        Self { token }
    }

    /// Recovers the token from an issued value.
    #[must_use]
    pub fn unmask(value: &str) -> Option<Vec<u8>> {
        let (masked, pad) = value.split_once(':')?;
        let masked = STANDARD.decode(masked).ok()?;
        let pad = STANDARD.decode(pad).ok()?;
        if masked.len() != pad.len() {
            return None;
        }
        Some(masked.iter().zip(&pad).map(|(m, p)| m ^ p).collect())
    }

    /// Returns true if an issued value carries this issuer's token.
    #[must_use]
    pub fn verify(&self, value: &str) -> bool {
        Self::unmask(value).is_some_and(|token| token == self.token)
    }
}

impl Default for MaskedTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl CsrfTokenIssuer for MaskedTokens {
    fn encrypted_token(&self) -> Result<String, Report<GateError>> {
        let pad = Ulid::new().to_bytes();
        let masked: Vec<u8> = self.token.iter().zip(&pad).map(|(t, p)| t ^ p).collect();
        Ok(format!("{}:{}", STANDARD.encode(masked), STANDARD.encode(pad)))
    }
}

/// Reads the identity a fronting proxy asserts in a trusted header.
#[derive(Debug, Clone)]
pub struct TrustedHeader {
    header: String,
    required: bool,
}

impl TrustedHeader {
    /// Creates a trigger for the given header.
    #[must_use]
    pub fn new(header: impl Into<String>, required: bool) -> Self {
        Self {
            header: header.into(),
            required,
        }
    }
}

impl HeaderAuthenticator for TrustedHeader {
    fn authenticate(
        &self,
        request: &RequestContext,
    ) -> Result<HeaderAuthOutcome, Report<GateError>> {
        match request.header(&self.header).map(str::trim) {
            Some(uid) if !uid.is_empty() => {
                tracing::debug!(uid, header = %self.header, "identity asserted by proxy");
                Ok(HeaderAuthOutcome::Continue)
            }
            _ if self.required => {
                tracing::info!(header = %self.header, "trusted identity header missing");
                Ok(HeaderAuthOutcome::Responded)
            }
            _ => Ok(HeaderAuthOutcome::Continue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_links_include_web_root_and_encoded_params() {
        let urls = RouteUrls::new("https://cloud.example.com/", "/cloud/");
        let params = BTreeMap::from([
            ("idp".to_string(), "1".to_string()),
            ("originalUrl".to_string(), "https://cloud.example.com/a b".to_string()),
        ]);

        let url = urls
            .link_to_route_absolute(RouteName::Login, &params)
            .expect("url");

        assert_eq!(
            url,
            "https://cloud.example.com/cloud/apps/user_saml/saml/login?idp=1&originalUrl=https%3A%2F%2Fcloud.example.com%2Fa%20b"
        );
    }

    #[test]
    fn route_links_without_params_have_no_query() {
        let urls = RouteUrls::new("https://cloud.example.com", "");
        let url = urls
            .link_to_route_absolute(RouteName::GenericError, &BTreeMap::new())
            .expect("url");
        assert_eq!(url, "https://cloud.example.com/apps/user_saml/saml/error");
    }

    #[test]
    fn absolute_url_stays_on_host() {
        let urls = RouteUrls::new("https://cloud.example.com", "");
        assert_eq!(
            urls.absolute_url("/apps/files").expect("url"),
            "https://cloud.example.com/apps/files"
        );
        assert_eq!(
            urls.absolute_url("https://evil.example").expect("url"),
            "https://cloud.example.com/https://evil.example"
        );
        assert!(urls.absolute_url("/x\r\nSet-Cookie: a=b").is_err());
    }

    #[test]
    fn catalog_translates_known_messages() {
        let de = Catalog::for_language("de");
        assert!(
            de.translate(DISABLED_ACCOUNT_MESSAGE)
                .expect("message")
                .starts_with("Dieses Benutzerkonto")
        );

        let en = Catalog::for_language("en");
        assert_eq!(
            en.translate(DISABLED_ACCOUNT_MESSAGE).expect("message"),
            DISABLED_ACCOUNT_MESSAGE
        );
    }

    #[test]
    fn masked_tokens_unmask_to_same_token() {
        let token = [7u8; 16];
        let issuer = MaskedTokens::with_token(token);

        let first = issuer.encrypted_token().expect("token");
        let second = issuer.encrypted_token().expect("token");

        assert_ne!(first, second);
        assert_eq!(MaskedTokens::unmask(&first), Some(token.to_vec()));
        assert_eq!(MaskedTokens::unmask(&second), Some(token.to_vec()));
        assert_eq!(MaskedTokens::unmask("not-a-token"), None);
    }

    #[test]
    fn masked_tokens_verify_only_their_own_values() {
        let issuer = MaskedTokens::with_token([1u8; 16]);
        let other = MaskedTokens::with_token([2u8; 16]);
        let value = issuer.encrypted_token().expect("token");

        assert!(issuer.verify(&value));
        assert!(!other.verify(&value));
        assert!(!issuer.verify(""));
    }

    #[test]
    fn trusted_header_outcomes() {
        let optional = TrustedHeader::new("X-Remote-User", false);
        let required = TrustedHeader::new("X-Remote-User", true);
        let with_header = RequestContext::new("/", "/").with_header("x-remote-user", "alice");
        let without = RequestContext::new("/", "/");

        assert_eq!(
            optional.authenticate(&with_header).expect("outcome"),
            HeaderAuthOutcome::Continue
        );
        assert_eq!(
            optional.authenticate(&without).expect("outcome"),
            HeaderAuthOutcome::Continue
        );
        assert_eq!(
            required.authenticate(&with_header).expect("outcome"),
            HeaderAuthOutcome::Continue
        );
        assert_eq!(
            required.authenticate(&without).expect("outcome"),
            HeaderAuthOutcome::Responded
        );
    }
}
