use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process cache of "does this user have a saved profile".
///
/// Clients poll profile status on nearly every view; this avoids a table
/// round-trip for each poll. Writers must call `set` (or `invalidate`) when
/// preferences are saved, which is the only mutation path.
#[derive(Clone, Default)]
pub struct ProfileStatusCache {
    inner: Arc<RwLock<HashMap<Uuid, bool>>>,
}

impl ProfileStatusCache {
    pub async fn get(&self, user_id: Uuid) -> Option<bool> {
        self.inner.read().await.get(&user_id).copied()
    }

    pub async fn set(&self, user_id: Uuid, complete: bool) {
        self.inner.write().await.insert(user_id, complete);
    }

    pub async fn invalidate(&self, user_id: Uuid) {
        self.inner.write().await.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_invalidate() {
        let cache = ProfileStatusCache::default();
        let user = Uuid::new_v4();

        assert_eq!(cache.get(user).await, None);

        cache.set(user, true).await;
        assert_eq!(cache.get(user).await, Some(true));

        cache.invalidate(user).await;
        assert_eq!(cache.get(user).await, None);
    }

    #[tokio::test]
    async fn entries_are_per_user() {
        let cache = ProfileStatusCache::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        cache.set(a, true).await;
        cache.set(b, false).await;

        assert_eq!(cache.get(a).await, Some(true));
        assert_eq!(cache.get(b).await, Some(false));
    }
}
