//! Bearer token validation.
//!
//! `JwtTokenVerifier` checks an HMAC-signed JWT and turns its `sub` claim into
//! an [`Identity`]. It is the only place an `Identity` can be constructed, so
//! every identity that reaches the store came from a verified token.

use std::fmt;

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Caller identity extracted from a verified token's subject claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(Uuid);

impl Identity {
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Token validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is invalid: {0}")]
    Invalid(String),
    #[error("access token expired")]
    Expired,
    #[error("token signing secret is not configured")]
    MissingSigningSecret,
}

impl TokenError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            TokenError::Invalid(_) => 2001,
            TokenError::Expired => 2002,
            TokenError::MissingSigningSecret => 2003,
        }
    }
}

/// Capability to turn a raw bearer token into an [`Identity`].
pub trait TokenVerifier: Send + Sync {
    fn validate(&self, token: &str) -> Result<Identity, TokenError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    exp: Option<u64>,
}

/// HMAC (HS256/HS384/HS512) JWT verifier with a single shared secret.
pub struct JwtTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// Build a verifier. An empty secret is a startup misconfiguration.
    ///
    /// # Examples
    /// ```
    /// use service::token::{JwtTokenVerifier, TokenError};
    /// assert_eq!(JwtTokenVerifier::new("").err(), Some(TokenError::MissingSigningSecret));
    /// assert!(JwtTokenVerifier::new("secret").is_ok());
    /// ```
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.trim().is_empty() {
            return Err(TokenError::MissingSigningSecret);
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);
        Ok(Self { key: DecodingKey::from_secret(secret.as_bytes()), validation })
    }
}

impl fmt::Debug for JwtTokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenVerifier").field("algorithms", &self.validation.algorithms).finish()
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn validate(&self, token: &str) -> Result<Identity, TokenError> {
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() {
            return Err(TokenError::Invalid("empty token".into()));
        }

        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(classify)?
            .claims;

        if matches!(claims.exp, None | Some(0)) {
            return Err(TokenError::Expired);
        }
        let sub = claims
            .sub
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| TokenError::Invalid("missing subject".into()))?;
        let id = Uuid::parse_str(sub.trim())
            .map_err(|_| TokenError::Invalid("subject is not a valid identifier".into()))?;
        Ok(Identity(id))
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::MissingRequiredClaim(claim) if claim == "exp" => TokenError::Expired,
        _ => TokenError::Invalid(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mint_token, now_secs, TEST_SECRET};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn verifier() -> JwtTokenVerifier {
        JwtTokenVerifier::new(TEST_SECRET).unwrap()
    }

    fn sign(claims: serde_json::Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes())).unwrap()
    }

    #[test]
    fn valid_token_yields_subject() {
        let user_id = Uuid::new_v4();
        let token = mint_token(&user_id.to_string(), now_secs() + 3600);
        let id = verifier().validate(&token).unwrap();
        assert_eq!(id.as_uuid(), user_id);
    }

    #[test]
    fn bearer_prefix_is_accepted() {
        let user_id = Uuid::new_v4();
        let token = mint_token(&user_id.to_string(), now_secs() + 3600);
        let id = verifier().validate(&format!("Bearer {token}")).unwrap();
        assert_eq!(id.as_uuid(), user_id);
    }

    #[test]
    fn hs512_tokens_are_accepted() {
        let user_id = Uuid::new_v4();
        let claims = json!({"sub": user_id.to_string(), "exp": now_secs() + 60});
        let token = encode(&Header::new(Algorithm::HS512), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes())).unwrap();
        assert_eq!(verifier().validate(&token).unwrap().as_uuid(), user_id);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = mint_token(&Uuid::new_v4().to_string(), now_secs() - 10);
        assert_eq!(verifier().validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn zero_expiry_is_rejected_as_expired() {
        let token = sign(json!({"sub": Uuid::new_v4().to_string(), "exp": 0}));
        assert_eq!(verifier().validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn missing_expiry_is_rejected_as_expired() {
        let token = sign(json!({"sub": Uuid::new_v4().to_string()}));
        assert_eq!(verifier().validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let claims = json!({"sub": Uuid::new_v4().to_string(), "exp": now_secs() + 60});
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"other-secret")).unwrap();
        assert!(matches!(verifier().validate(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn swapped_payload_is_invalid() {
        let a = mint_token(&Uuid::new_v4().to_string(), now_secs() + 60);
        let b = mint_token(&Uuid::new_v4().to_string(), now_secs() + 60);
        let a_parts: Vec<&str> = a.split('.').collect();
        let b_parts: Vec<&str> = b.split('.').collect();
        let forged = format!("{}.{}.{}", a_parts[0], b_parts[1], a_parts[2]);
        assert!(matches!(verifier().validate(&forged), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn tampered_signature_is_invalid_even_when_expired() {
        let token = mint_token(&Uuid::new_v4().to_string(), now_secs() - 100);
        let (head, _) = token.rsplit_once('.').unwrap();
        let forged = format!("{head}.c2lnbmF0dXJlLXRoYXQtZG9lcy1ub3QtbWF0Y2gtYXQtYWxs");
        assert!(matches!(verifier().validate(&forged), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn unexpected_algorithm_is_invalid() {
        let token = mint_token(&Uuid::new_v4().to_string(), now_secs() + 60);
        let rest = token.split_once('.').unwrap().1;
        // {"alg":"RS256","typ":"JWT"}
        let rs256 = format!("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.{rest}");
        assert!(matches!(verifier().validate(&rs256), Err(TokenError::Invalid(_))));
        // {"alg":"none","typ":"JWT"}
        let none = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{rest}");
        assert!(matches!(verifier().validate(&none), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn missing_or_malformed_subject_is_invalid() {
        let no_sub = sign(json!({"exp": now_secs() + 60}));
        assert!(matches!(verifier().validate(&no_sub), Err(TokenError::Invalid(_))));

        let empty_sub = sign(json!({"sub": "", "exp": now_secs() + 60}));
        assert!(matches!(verifier().validate(&empty_sub), Err(TokenError::Invalid(_))));

        let not_uuid = sign(json!({"sub": "alice@example.com", "exp": now_secs() + 60}));
        assert!(matches!(verifier().validate(&not_uuid), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_and_empty_tokens_are_invalid() {
        assert!(matches!(verifier().validate(""), Err(TokenError::Invalid(_))));
        assert!(matches!(verifier().validate("Bearer "), Err(TokenError::Invalid(_))));
        assert!(matches!(verifier().validate("not.a.jwt"), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn blank_secret_is_missing() {
        assert_eq!(JwtTokenVerifier::new("   ").err(), Some(TokenError::MissingSigningSecret));
    }

    #[test]
    fn codes_are_distinct() {
        assert_eq!(TokenError::Invalid(String::new()).code(), 2001);
        assert_eq!(TokenError::Expired.code(), 2002);
        assert_eq!(TokenError::MissingSigningSecret.code(), 2003);
    }
}
