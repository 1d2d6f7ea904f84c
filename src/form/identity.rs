//! Identity tokens derived from the primary section's identity-source field.
//!
//! Generation is asynchronous and may overlap with further edits. Every request
//! carries a sequence number; only the most recently issued request may write
//! its token back.

use anyhow::Result;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGenerator: Send + Sync {
    /// Produce an opaque token for `seed`.
    async fn generate(&self, seed: &str) -> Result<String>;
}

/// A random UUID followed by the first 32 hex digits of the seed's SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIdentityGenerator;

#[async_trait]
impl IdentityGenerator for DefaultIdentityGenerator {
    async fn generate(&self, seed: &str) -> Result<String> {
        let digest = Sha256::digest(seed.as_bytes());
        let hash: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
        Ok(format!("{}{}", Uuid::new_v4(), &hash[..32]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRequest {
    pub sequence: u64,
    pub seed: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityResolution {
    pub request: IdentityRequest,
    pub token: String,
}

impl IdentityRequest {
    pub async fn run(self, generator: &dyn IdentityGenerator) -> Result<IdentityResolution> {
        let token = generator.generate(&self.seed).await?;
        Ok(IdentityResolution {
            request: self,
            token,
        })
    }
}

/// Issues request numbers and decides which completions may apply.
#[derive(Debug, Clone, Default)]
pub struct IdentitySequencer {
    issued: u64,
    latest: Option<u64>,
}

impl IdentitySequencer {
    pub fn issue(&mut self, seed: impl Into<String>) -> IdentityRequest {
        self.issued += 1;
        self.latest = Some(self.issued);
        IdentityRequest {
            sequence: self.issued,
            seed: seed.into(),
        }
    }

    /// Consumes the pending slot when `request` is the latest one issued.
    pub fn accept(&mut self, request: &IdentityRequest) -> bool {
        if self.latest == Some(request.sequence) {
            self.latest = None;
            true
        } else {
            false
        }
    }

    /// Forget any outstanding request so that late completions are dropped.
    pub fn invalidate(&mut self) {
        self.latest = None;
    }

    pub fn pending(&self) -> Option<u64> {
        self.latest
    }
}
