use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

pub type KeyGuard = OwnedMutexGuard<()>;

/// Registry of per-key async locks. Callers touching the same key are
/// serialized; callers on different keys proceed in parallel.
#[derive(Clone, Default)]
pub struct KeyedMutex {
    inner: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl KeyedMutex {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap();
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    pub async fn lock(&self, key: &str) -> KeyGuard {
        self.entry(key).lock_owned().await
    }

    /// Lock two distinct keys together. Acquisition follows lexicographic
    /// key order, so concurrent callers taking overlapping pairs in any
    /// argument order cannot deadlock.
    pub async fn lock_pair(&self, a: &str, b: &str) -> (KeyGuard, KeyGuard) {
        debug_assert_ne!(a, b);
        if a <= b {
            let guard_a = self.lock(a).await;
            let guard_b = self.lock(b).await;
            (guard_a, guard_b)
        } else {
            let guard_b = self.lock(b).await;
            let guard_a = self.lock(a).await;
            (guard_a, guard_b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = KeyedMutex::new();

        let guard = locks.lock("truck:1").await;

        let second = tokio::time::timeout(Duration::from_millis(50), locks.lock("truck:1")).await;
        assert!(second.is_err(), "second lock on the same key should block");

        drop(guard);

        let third = tokio::time::timeout(Duration::from_millis(50), locks.lock("truck:1")).await;
        assert!(third.is_ok(), "lock should be available after release");
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = KeyedMutex::new();

        let _guard = locks.lock("truck:1").await;

        let other = tokio::time::timeout(Duration::from_millis(50), locks.lock("truck:2")).await;
        assert!(other.is_ok(), "a different key should not block");
    }

    #[tokio::test]
    async fn test_pair_acquisition_order_does_not_deadlock() {
        let locks = KeyedMutex::new();

        for _ in 0..100 {
            let locks_a = locks.clone();
            let locks_b = locks.clone();

            let task_a = tokio::spawn(async move {
                let _guards = locks_a.lock_pair("sensor:A1", "truck:1").await;
            });
            let task_b = tokio::spawn(async move {
                let _guards = locks_b.lock_pair("truck:1", "sensor:A1").await;
            });

            let joined = tokio::time::timeout(Duration::from_secs(5), async {
                task_a.await.unwrap();
                task_b.await.unwrap();
            })
            .await;
            assert!(joined.is_ok(), "cross-order pair acquisition deadlocked");
        }
    }
}
