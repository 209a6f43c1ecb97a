//! Session token lifecycle for providers with expiring credentials

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::core::errors::Result;
use crate::core::models::SessionToken;

/// Source of the current time for expiry checks
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to; used to exercise token expiry
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Clock stopped at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Exchanges the long-lived API key for a short-lived bearer token
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Request a new token from the issuing service
    async fn issue_token(&self) -> Result<String>;
}

/// Holds the current bearer token and refreshes it before it expires
///
/// States are `NO_TOKEN` (`None`) and `HAS_TOKEN(expiry)`. The lock is held
/// across a refresh, so concurrent callers wait for one acquisition instead
/// of racing their own.
#[derive(Debug, Clone)]
pub struct SessionManager {
    token: Arc<Mutex<Option<SessionToken>>>,
    lease: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    /// Create a manager in the `NO_TOKEN` state
    pub fn new(lease: Duration) -> Self {
        Self::with_clock(lease, Arc::new(SystemClock))
    }

    /// Create a manager in the `NO_TOKEN` state that reads time from `clock`
    pub fn with_clock(lease: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            token: Arc::new(Mutex::new(None)),
            lease,
            clock,
        }
    }

    /// How long each acquired token stays valid
    pub fn lease(&self) -> Duration {
        self.lease
    }

    /// Whether a token has ever been acquired
    pub async fn has_token(&self) -> bool {
        self.token.lock().await.is_some()
    }

    /// Expiry of the current token, if any
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.lock().await.as_ref().map(|t| t.expires_at)
    }

    /// `NO_TOKEN -> HAS_TOKEN`
    pub async fn acquire(&self, issuer: &dyn TokenIssuer) -> Result<()> {
        let mut slot = self.token.lock().await;
        self.issue_into(&mut slot, issuer).await?;
        Ok(())
    }

    /// `HAS_TOKEN -> HAS_TOKEN(new expiry)`; always allowed
    pub async fn refresh(&self, issuer: &dyn TokenIssuer) -> Result<()> {
        self.acquire(issuer).await
    }

    /// Return a token that is valid now, refreshing first if needed
    pub async fn bearer(&self, issuer: &dyn TokenIssuer) -> Result<String> {
        let mut slot = self.token.lock().await;
        let now = self.clock.now();

        if let Some(token) = slot.as_ref().filter(|t| !t.is_expired(now)) {
            return Ok(token.token.clone());
        }

        if slot.is_some() {
            debug!("Session token expired, refreshing");
        }
        self.issue_into(&mut slot, issuer).await
    }

    /// Drop the current token so the next call acquires a new one
    pub async fn invalidate(&self) {
        *self.token.lock().await = None;
    }

    async fn issue_into(
        &self,
        slot: &mut Option<SessionToken>,
        issuer: &dyn TokenIssuer,
    ) -> Result<String> {
        let token = issuer.issue_token().await?;
        let issued = SessionToken::new(token.clone(), self.clock.now(), self.lease);

        info!("Acquired session token, expires at {}", issued.expires_at);

        // Replaced, never mutated in place.
        *slot = Some(issued);
        Ok(token)
    }
}
