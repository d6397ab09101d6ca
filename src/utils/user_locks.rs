use std::sync::Arc;
use std::time::Duration;

use futures::lock::{Mutex, OwnedMutexGuard};
use moka::future::Cache;

/// Idle locks are dropped after this long.
const LOCK_IDLE_TTL: Duration = Duration::from_secs(3600);

/// One async mutex per username.
///
/// Check-then-write sequences (leave conflict check + insert, activity batch
/// replacement) run under the user's lock so two requests from the same user
/// are applied one after the other, while different users never contend.
#[derive(Clone)]
pub struct UserLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self {
            locks: Cache::builder().time_to_idle(LOCK_IDLE_TTL).build(),
        }
    }

    /// Waits for and holds the lock of `username`.
    pub async fn acquire(&self, username: &str) -> OwnedMutexGuard<()> {
        self.lock_for(username).await.lock_owned().await
    }

    /// Returns the guard only if nobody holds the user's lock.
    #[cfg(test)]
    pub async fn try_acquire(&self, username: &str) -> Option<OwnedMutexGuard<()>> {
        self.lock_for(username).await.try_lock_owned()
    }

    async fn lock_for(&self, username: &str) -> Arc<Mutex<()>> {
        self.locks
            .get_with(username.to_string(), async { Arc::new(Mutex::new(())) })
            .await
    }
}

impl Default for UserLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn same_user_is_exclusive() {
        let locks = UserLocks::new();
        let held = locks.acquire("asha").await;
        assert!(locks.try_acquire("asha").await.is_none());
        assert!(locks.try_acquire("ravi").await.is_some());
        drop(held);
        assert!(locks.try_acquire("asha").await.is_some());
    }
}
