use std::{sync::Arc, time::Duration};

use hmac::{Hmac, Mac};
use jwt::{SigningAlgorithm, VerifyingAlgorithm};
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use sha2::Sha256;
use thiserror::Error;

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// The validity of the token
    #[serde_as(as = "DurationSeconds")]
    pub token_validity: Duration,
    /// Secret used to sign the tokens
    ///
    /// If missing a random one is generated at each boot, invalidating all
    /// the tokens given out before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_validity: Duration::from_secs(7 * 24 * 60 * 60),
            secret: None,
        }
    }
}

#[derive(Debug, Error)]
#[error("The secret cannot be used as a signing key")]
pub struct InvalidSecret;

#[derive(Debug, Clone)]
pub struct AuthKey {
    key: Arc<Hmac<Sha256>>,
    token_validity: Duration,
}
impl AuthKey {
    pub fn new(
        AuthConfig {
            token_validity,
            secret,
        }: AuthConfig,
    ) -> Result<Self, InvalidSecret> {
        let key = match secret {
            Some(secret) => Hmac::new_from_slice(secret.as_bytes()).map_err(|_| InvalidSecret)?,
            None => {
                tracing::info!("Generating authentication key");
                let secret: [u8; 32] = thread_rng().gen();
                Hmac::new_from_slice(&secret).map_err(|_| InvalidSecret)?
            }
        };
        Ok(Self {
            key: Arc::new(key),
            token_validity,
        })
    }

    pub(super) const fn token_validity(&self) -> Duration {
        self.token_validity
    }
}
impl SigningAlgorithm for AuthKey {
    fn algorithm_type(&self) -> jwt::AlgorithmType {
        SigningAlgorithm::algorithm_type(&*self.key)
    }

    fn sign(&self, header: &str, claims: &str) -> Result<String, jwt::Error> {
        self.key.sign(header, claims)
    }
}
impl VerifyingAlgorithm for AuthKey {
    fn algorithm_type(&self) -> jwt::AlgorithmType {
        VerifyingAlgorithm::algorithm_type(&*self.key)
    }

    fn verify_bytes(
        &self,
        header: &str,
        claims: &str,
        signature: &[u8],
    ) -> Result<bool, jwt::Error> {
        self.key.verify_bytes(header, claims, signature)
    }

    fn verify(&self, header: &str, claims: &str, signature: &str) -> Result<bool, jwt::Error> {
        VerifyingAlgorithm::verify(&*self.key, header, claims, signature)
    }
}
