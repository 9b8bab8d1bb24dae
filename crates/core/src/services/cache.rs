//! In-memory preview cache with sliding expiration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::preview::PreviewPayload;

/// Cache entry with its current deadline.
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: PreviewPayload,
    expires_at: Instant,
}

/// In-memory cache for preview payloads.
///
/// Expiration is sliding: every hit pushes the deadline out by the full
/// window again, so an entry only falls out after going unread for the
/// whole window.
#[derive(Clone)]
pub struct PreviewCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl PreviewCache {
    /// Create a cache with the given expiration window.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Look up a payload, renewing its deadline on a hit.
    pub async fn get(&self, key: &str) -> Option<PreviewPayload> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                entry.expires_at = Instant::now() + self.ttl;
                Some(entry.payload.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a payload under `key`.
    pub async fn insert(&self, key: String, payload: PreviewPayload) {
        let entry = CacheEntry {
            payload,
            expires_at: Instant::now() + self.ttl,
        };

        let mut entries = self.entries.write().await;
        entries.insert(key, entry);

        // Clean up expired entries occasionally
        if entries.len() > 1000 {
            let now = Instant::now();
            entries.retain(|_, e| e.expires_at > now);
        }
    }
}
