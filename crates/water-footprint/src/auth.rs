//! HS256 bearer tokens.
//!
//! Tokens are standard compact JWTs (`header.claims.signature`, base64url
//! without padding) signed with HMAC-SHA256. Decoding never reports why a token
//! was rejected; callers only see `None`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;

use crate::config::AuthConfig;
use crate::error::{Result, WaterError};

type HmacSha256 = Hmac<Sha256>;

const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Issues and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Vec<u8>,
    default_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: impl AsRef<[u8]>, default_ttl: Duration) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            default_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            Duration::minutes(config.access_token_expire_minutes),
        )
    }

    /// Sign `claims` with an `exp` claim `ttl` (or the default) from now.
    pub fn create_access_token(
        &self,
        claims: Map<String, Value>,
        ttl: Option<Duration>,
    ) -> Result<String> {
        let mut claims = claims;
        let expire = Utc::now() + ttl.unwrap_or(self.default_ttl);
        claims.insert("exp".to_string(), Value::from(expire.timestamp()));

        let header = URL_SAFE_NO_PAD.encode(HEADER);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&Value::Object(claims))?);
        let signing_input = format!("{header}.{payload}");
        let signature = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes())?);

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Claims of a valid, unexpired token; `None` otherwise.
    pub fn decode_access_token(&self, token: &str) -> Option<Map<String, Value>> {
        let mut parts = token.split('.');
        let (header, payload, signature) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }

        let header: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header).ok()?).ok()?;
        if header.get("alg")?.as_str()? != "HS256" {
            return None;
        }

        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(token[..token.rfind('.')?].as_bytes());
        mac.verify_slice(&signature).ok()?;

        let claims: Map<String, Value> =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).ok()?).ok()?;
        let exp = claims.get("exp")?.as_i64()?;
        if exp <= Utc::now().timestamp() {
            tracing::debug!("rejected expired access token");
            return None;
        }

        Some(claims)
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| WaterError::auth(format!("invalid signing key: {e}")))
    }

    fn sign(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut mac = self.mac()?;
        mac.update(input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}
