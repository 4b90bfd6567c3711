//! Advisory per-user session timer
//!
//! Not consulted by submission; it only tells the form when to warn the
//! user that their session ran out.

use crate::cache::SessionCache;
use crate::error::Result;
use crate::types::SessionStatus;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Tracks when each user's session started
pub struct SessionGuard {
    cache: Arc<dyn SessionCache>,
    ttl: Duration,
}

fn session_key(user: &str) -> String {
    format!("session_start:{user}")
}

impl SessionGuard {
    /// Create a guard whose sessions last `ttl`
    pub fn new(cache: Arc<dyn SessionCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Start (or restart) `user`'s session now
    pub async fn start(&self, user: &str) -> Result<()> {
        self.start_at(user, Utc::now()).await
    }

    /// Start `user`'s session at `now`
    pub async fn start_at(&self, user: &str, now: DateTime<Utc>) -> Result<()> {
        self.cache
            .put(&session_key(user), &now.to_rfc3339(), self.ttl)
            .await?;
        debug!("Session started for {user}");
        Ok(())
    }

    /// Check `user`'s session now
    pub async fn check(&self, user: &str) -> Result<SessionStatus> {
        self.check_at(user, Utc::now()).await
    }

    /// Check `user`'s session as of `now`, evicting it once past its lifetime
    pub async fn check_at(&self, user: &str, now: DateTime<Utc>) -> Result<SessionStatus> {
        let key = session_key(user);
        let Some(raw) = self.cache.get(&key).await? else {
            return Ok(SessionStatus { expired: true });
        };

        let started = match DateTime::parse_from_rfc3339(&raw) {
            Ok(t) => t.with_timezone(&Utc),
            Err(e) => {
                warn!("Dropping unreadable session start {raw:?} for {user}: {e}");
                self.cache.remove(&key).await?;
                return Ok(SessionStatus { expired: true });
            }
        };

        let elapsed = (now - started).to_std().unwrap_or_default();
        if elapsed > self.ttl {
            self.cache.remove(&key).await?;
            debug!("Session for {user} expired after {}s", elapsed.as_secs());
            return Ok(SessionStatus { expired: true });
        }

        Ok(SessionStatus { expired: false })
    }
}
