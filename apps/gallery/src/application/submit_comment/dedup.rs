use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio::time::Instant;

/// The most recently accepted comment, remembered by content digest until an
/// explicit deadline. Only identical (trimmed) text inside the window is
/// blocked; anything else, or the same text later, goes through.
#[derive(Debug, Clone)]
pub struct RecentSubmission {
    digest: [u8; 32],
    expires_at: Instant,
}

impl RecentSubmission {
    pub fn new(content: &str, cooldown: Duration, now: Instant) -> Self {
        Self {
            digest: content_digest(content),
            expires_at: now + cooldown,
        }
    }

    pub fn blocks(&self, content: &str, now: Instant) -> bool {
        !self.is_expired(now) && self.digest == content_digest(content)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

fn content_digest(content: &str) -> [u8; 32] {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(content.trim().as_bytes()));
    digest
}
