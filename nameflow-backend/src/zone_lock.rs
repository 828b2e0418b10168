//! 按区域的互斥锁
//!
//! Full-replace 型 Backend 的变更是「取回整集 → 计算 → 整集提交」，
//! 同一 zone 的并发变更会互相覆盖。调用方在变更前通过 [`ZoneLocks`]
//! 拿到该 zone 的守卫，把读改写序列串行化。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// 锁表容量上限，超过后清理空闲条目
const DEFAULT_MAX_ENTRIES: usize = 1024;
/// 条目空闲多久后可被清理
const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(300);

struct Entry {
    lock: Arc<Mutex<()>>,
    last_used: Instant,
}

/// 按 zone 名分发互斥守卫的锁表
///
/// zone 名大小写不敏感。锁表有界：条目数达到上限时清理
/// 空闲且无人持有的条目。
pub struct ZoneLocks {
    inner: Mutex<HashMap<String, Entry>>,
    max_entries: usize,
    idle_ttl: Duration,
}

impl ZoneLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_ENTRIES, DEFAULT_IDLE_TTL)
    }

    #[must_use]
    pub fn with_limits(max_entries: usize, idle_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            max_entries,
            idle_ttl,
        }
    }

    /// 获取指定 zone 的互斥守卫，guard 释放前同 zone 的后续获取会等待
    pub async fn acquire(&self, zone: &str) -> OwnedMutexGuard<()> {
        let key = zone.to_ascii_lowercase();
        let lock = {
            let mut map = self.inner.lock().await;
            if map.len() >= self.max_entries {
                let idle_ttl = self.idle_ttl;
                // 保留仍被持有或近期使用过的条目
                map.retain(|_, e| {
                    Arc::strong_count(&e.lock) > 1 || e.last_used.elapsed() < idle_ttl
                });
            }
            let entry = map.entry(key).or_insert_with(|| Entry {
                lock: Arc::new(Mutex::new(())),
                last_used: Instant::now(),
            });
            entry.last_used = Instant::now();
            Arc::clone(&entry.lock)
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

impl Default for ZoneLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_zone_serializes() {
        let locks = Arc::new(ZoneLocks::new());
        let counter = Arc::new(std::sync::atomic::AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("example.com").await;
                // 持锁期间读改写不应交错
                let seen = counter.load(std::sync::atomic::Ordering::SeqCst);
                tokio::task::yield_now().await;
                counter.store(seen + 1, std::sync::atomic::Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn different_zones_do_not_block() {
        let locks = ZoneLocks::new();
        let _a = locks.acquire("a.example").await;
        // 不同 zone 可以同时持有
        let _b = locks.acquire("b.example").await;
    }

    #[tokio::test]
    async fn zone_names_case_insensitive() {
        let locks = Arc::new(ZoneLocks::new());
        let _guard = locks.acquire("Example.COM").await;

        let locks2 = Arc::clone(&locks);
        let blocked = tokio::spawn(async move {
            let _g = locks2.acquire("example.com").await;
        });
        tokio::task::yield_now().await;
        assert!(!blocked.is_finished());
        drop(_guard);
        blocked.await.unwrap();
    }

    #[tokio::test]
    async fn idle_entries_evicted_at_capacity() {
        let locks = ZoneLocks::with_limits(4, Duration::from_millis(0));
        for i in 0..4 {
            let guard = locks.acquire(&format!("zone{i}.example")).await;
            drop(guard);
        }
        assert_eq!(locks.len().await, 4);

        // 第五次获取触发清理：前四个条目空闲且未被持有
        let _guard = locks.acquire("zone4.example").await;
        assert_eq!(locks.len().await, 1);
    }
}
