use clipscribe_core::Outcome;
use engine_logging::{engine_debug, engine_error, engine_warn};
use thiserror::Error;

use crate::{ContentGenerator, Credential};

pub const ALL_EXHAUSTED_REASON: &str = "all credentials exhausted";
pub const EMPTY_CONTENT_REASON: &str = "generator returned empty content";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no usable credentials configured")]
    NoCredentials,
}

/// Ordered credentials plus the set that hit their quota during this run.
///
/// Order is fixed at construction. Exhaustion is permanent for the lifetime
/// of the pool.
#[derive(Debug)]
pub struct CredentialPool {
    credentials: Vec<Credential>,
    exhausted: Vec<bool>,
}

impl CredentialPool {
    /// Blank tokens are discarded; nothing left over is a configuration error.
    pub fn new(credentials: Vec<Credential>) -> Result<Self, ConfigError> {
        let credentials: Vec<Credential> = credentials
            .into_iter()
            .filter(|credential| !credential.is_blank())
            .collect();
        if credentials.is_empty() {
            return Err(ConfigError::NoCredentials);
        }
        let exhausted = vec![false; credentials.len()];
        Ok(Self {
            credentials,
            exhausted,
        })
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.exhausted.iter().filter(|done| !**done).count()
    }

    pub fn is_exhausted(&self, index: usize) -> bool {
        self.exhausted.get(index).copied().unwrap_or(false)
    }

    pub fn all_exhausted(&self) -> bool {
        self.exhausted.iter().all(|done| *done)
    }

    pub fn mark_exhausted(&mut self, index: usize) {
        let Some(slot) = self.exhausted.get_mut(index) else {
            return;
        };
        if *slot {
            return;
        }
        *slot = true;
        engine_warn!(
            "Credential #{} ({}) exhausted; {} of {} still active",
            index + 1,
            self.credentials[index],
            self.active_count(),
            self.len()
        );
        if self.all_exhausted() {
            engine_error!("All {} credentials are exhausted", self.len());
        }
    }

    /// Generate content for `input`, failing over on rate limits only.
    ///
    /// Always starts from the first credential that is still active.
    pub async fn attempt(&mut self, input: &str, generator: &dyn ContentGenerator) -> Outcome {
        for index in 0..self.credentials.len() {
            if self.exhausted[index] {
                continue;
            }
            engine_debug!("Trying credential #{} for {}", index + 1, input);
            let result = generator.generate(&self.credentials[index], input).await;
            match result {
                Ok(text) if text.trim().is_empty() => {
                    return Outcome::Failure(EMPTY_CONTENT_REASON.to_string());
                }
                Ok(text) => return Outcome::Success(text),
                Err(err) if err.is_rate_limit() => {
                    engine_warn!("Credential #{} rate limited: {}", index + 1, err.message);
                    self.mark_exhausted(index);
                }
                Err(err) => return Outcome::Failure(err.to_string()),
            }
        }
        Outcome::Failure(ALL_EXHAUSTED_REASON.to_string())
    }
}
