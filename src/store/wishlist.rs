use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock, RwLockWriteGuard};

use crate::models::{Movie, MovieId};
use crate::store::storage::KeyValueStorage;

/// Storage entry holding the serialized wishlist
pub const WISHLIST_KEY: &str = "movieflix-wishlist";

/// Handle returned by [`WishlistStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&[Movie]) + Send + Sync>;

/// The user's favorited movies.
///
/// Entries are unique by movie id and kept in insertion order. Every
/// successful mutation is written back to storage and then reported to all
/// subscribers with the committed list. When mutations race, a list that is
/// already superseded may be skipped, but never delivered after a newer one.
/// Storage failures are logged and otherwise ignored; the in-memory list
/// stays authoritative.
pub struct WishlistStore {
    entries: RwLock<Vec<Movie>>,
    storage: Arc<dyn KeyValueStorage>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
    revision: AtomicU64,
    // Last revision handed to storage and subscribers. Reentrant so a
    // subscriber may itself mutate the wishlist.
    published: ReentrantMutex<Cell<u64>>,
}

impl WishlistStore {
    /// Restores the wishlist from storage. Missing or unreadable data gives an
    /// empty wishlist.
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let entries = match storage.get(WISHLIST_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Movie>>(&json) {
                Ok(movies) => dedup_by_id(movies),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unparseable persisted wishlist");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Persisted wishlist unavailable");
                Vec::new()
            }
        };

        tracing::info!(count = entries.len(), "Wishlist loaded");

        Self {
            entries: RwLock::new(entries),
            storage,
            subscribers: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            revision: AtomicU64::new(0),
            published: ReentrantMutex::new(Cell::new(0)),
        }
    }

    /// Appends `movie` unless an entry with the same id exists.
    /// Returns whether it was inserted.
    pub fn add(&self, movie: Movie) -> bool {
        let movie_id = movie.id;
        let mut entries = self.entries.write();
        if entries.iter().any(|m| m.id == movie_id) {
            return false;
        }
        entries.push(movie);

        tracing::debug!(movie_id = movie_id, count = entries.len(), "Added to wishlist");
        self.commit(entries);
        true
    }

    /// Removes the entry for `id` if present. Returns whether one was removed.
    pub fn remove(&self, id: MovieId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|m| m.id != id);
        if entries.len() == before {
            return false;
        }

        tracing::debug!(movie_id = id, count = entries.len(), "Removed from wishlist");
        self.commit(entries);
        true
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.entries.read().iter().any(|m| m.id == id)
    }

    /// Snapshot of the entries in insertion order
    pub fn list(&self) -> Vec<Movie> {
        self.entries.read().clone()
    }

    pub fn count(&self) -> usize {
        self.entries.read().len()
    }

    /// Registers `callback` to receive the full list after every mutation
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&[Movie]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push((id, Arc::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// Publishes a mutation: writes it to storage, then notifies subscribers.
    ///
    /// Revisions are numbered while the entries guard is held, so they follow
    /// commit order. Storage and subscribers are reached only after the guard
    /// is released, and a revision older than the last published one is
    /// dropped. Whatever finishes last, storage and every subscriber end on
    /// the latest list.
    fn commit(&self, entries: RwLockWriteGuard<'_, Vec<Movie>>) {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = entries.clone();
        drop(entries);

        let published = self.published.lock();
        if published.get() > revision {
            tracing::trace!(revision = revision, "Skipping superseded wishlist revision");
            return;
        }
        published.set(revision);

        self.persist(&snapshot);
        self.notify(&snapshot, || published.get() == revision);
    }

    fn persist(&self, entries: &[Movie]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Wishlist serialization failed");
                return;
            }
        };

        if let Err(e) = self.storage.set(WISHLIST_KEY, &json) {
            tracing::warn!(error = %e, "Failed to persist wishlist");
        }
    }

    // Runs without the entries lock held, so subscribers may read the store.
    // A subscriber that mutates the store publishes a newer revision; the
    // remaining subscribers then skip this one.
    fn notify(&self, snapshot: &[Movie], is_current: impl Fn() -> bool) {
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();

        for subscriber in subscribers {
            if !is_current() {
                break;
            }
            subscriber(snapshot);
        }
    }
}

/// Keeps the first occurrence of each id
fn dedup_by_id(movies: Vec<Movie>) -> Vec<Movie> {
    let mut seen = std::collections::HashSet::new();
    movies.into_iter().filter(|m| seen.insert(m.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use crate::store::storage::{FileStorage, MemoryStorage};
    use std::sync::atomic::AtomicUsize;

    fn movie(id: MovieId) -> Movie {
        serde_json::from_value(serde_json::json!({ "id": id, "title": format!("Movie {}", id) }))
            .unwrap()
    }

    fn ids(store: &WishlistStore) -> Vec<MovieId> {
        store.list().iter().map(|m| m.id).collect()
    }

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::Storage("disk on fire".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(AppError::Storage("quota exceeded".into()))
        }
    }

    #[test]
    fn test_scenario_add_remove_reload() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let store = WishlistStore::load(storage.clone());
        assert_eq!(store.count(), 0);

        assert!(store.add(movie(550)));
        assert_eq!(store.count(), 1);
        assert!(store.contains(550));

        assert!(!store.add(movie(550)));
        assert_eq!(store.count(), 1);

        store.add(movie(27));
        assert_eq!(ids(&store), vec![550, 27]);

        assert!(store.remove(550));
        assert_eq!(store.count(), 1);
        assert!(!store.contains(550));
        assert_eq!(ids(&store), vec![27]);

        let reloaded = WishlistStore::load(storage);
        assert_eq!(reloaded.count(), 1);
        assert_eq!(ids(&reloaded), vec![27]);
    }

    #[test]
    fn test_insertion_order_and_removal() {
        let store = WishlistStore::load(Arc::new(MemoryStorage::new()));
        store.add(movie(1));
        store.add(movie(2));
        store.add(movie(3));
        assert_eq!(ids(&store), vec![1, 2, 3]);

        store.remove(2);
        assert_eq!(ids(&store), vec![1, 3]);
    }

    #[test]
    fn test_repeated_add_is_not_move_to_front() {
        let store = WishlistStore::load(Arc::new(MemoryStorage::new()));
        store.add(movie(1));
        store.add(movie(2));
        store.add(movie(1));
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_count_tracks_distinct_ids() {
        let store = WishlistStore::load(Arc::new(MemoryStorage::new()));
        let ops: Vec<(bool, MovieId)> = vec![
            (true, 5),
            (true, 5),
            (false, 9),
            (true, 9),
            (true, 7),
            (false, 5),
            (false, 5),
            (true, 5),
        ];

        let mut expected: Vec<MovieId> = Vec::new();
        for (is_add, id) in ops {
            if is_add {
                store.add(movie(id));
                if !expected.contains(&id) {
                    expected.push(id);
                }
            } else {
                store.remove(id);
                expected.retain(|x| *x != id);
            }
            assert_eq!(store.count(), expected.len());
            assert_eq!(store.count(), store.list().len());
        }
        assert_eq!(ids(&store), expected);
    }

    #[test]
    fn test_remove_missing_is_noop_without_notification() {
        let store = WishlistStore::load(Arc::new(MemoryStorage::new()));
        store.add(movie(1));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!store.remove(42));
        assert_eq!(ids(&store), vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_persisted_round_trip_via_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::new(dir.path()));

        let store = WishlistStore::load(storage.clone());
        store.add(movie(3));
        store.add(movie(1));
        store.add(movie(2));
        let before = store.list();

        let reloaded = WishlistStore::load(storage);
        assert_eq!(reloaded.list(), before);
    }

    #[test]
    fn test_corrupted_data_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(WISHLIST_KEY, "{not json").unwrap();

        let store = WishlistStore::load(storage.clone());
        assert_eq!(store.count(), 0);

        storage.set(WISHLIST_KEY, r#"{"id": 1}"#).unwrap();
        assert_eq!(WishlistStore::load(storage).count(), 0);
    }

    #[test]
    fn test_duplicate_ids_in_persisted_data_are_collapsed() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(
                WISHLIST_KEY,
                r#"[{"id": 1, "title": "A"}, {"id": 2, "title": "B"}, {"id": 1, "title": "A again"}]"#,
            )
            .unwrap();

        let store = WishlistStore::load(storage);
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.list()[0].title, "A");
    }

    #[test]
    fn test_storage_failures_are_absorbed() {
        let store = WishlistStore::load(Arc::new(BrokenStorage));
        assert_eq!(store.count(), 0);

        assert!(store.add(movie(8)));
        assert!(store.contains(8));
        assert!(store.remove(8));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_subscribers_see_committed_state() {
        let store = Arc::new(WishlistStore::load(Arc::new(MemoryStorage::new())));
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let sink = seen.clone();
        let reader = Arc::clone(&store);
        store.subscribe(move |snapshot| {
            // Re-reading from inside a notification must not deadlock
            assert_eq!(reader.count(), snapshot.len());
            sink.lock().push(snapshot.iter().map(|m| m.id).collect::<Vec<_>>());
        });

        store.add(movie(1));
        store.add(movie(1));
        store.add(movie(2));
        store.remove(1);

        assert_eq!(*seen.lock(), vec![vec![1], vec![1, 2], vec![2]]);
    }

    #[test]
    fn test_concurrent_mutations_leave_subscribers_on_latest_state() {
        for _ in 0..200 {
            let store = Arc::new(WishlistStore::load(Arc::new(MemoryStorage::new())));
            let last_seen = Arc::new(parking_lot::Mutex::new(None));

            let sink = last_seen.clone();
            store.subscribe(move |snapshot| {
                if snapshot.len() == 1 {
                    // Widen the gap between commit and delivery
                    std::thread::sleep(std::time::Duration::from_micros(50));
                }
                *sink.lock() = Some(snapshot.len());
            });

            let handles: Vec<_> = (1..=2)
                .map(|id| {
                    let store = Arc::clone(&store);
                    std::thread::spawn(move || store.add(movie(id)))
                })
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap());
            }

            assert_eq!(store.count(), 2);
            assert_eq!(*last_seen.lock(), Some(2));
        }
    }

    #[test]
    fn test_concurrent_mutations_persist_latest_state() {
        for _ in 0..50 {
            let storage = Arc::new(MemoryStorage::new());
            let store = Arc::new(WishlistStore::load(storage.clone()));

            let handles: Vec<_> = (1..=4)
                .map(|id| {
                    let store = Arc::clone(&store);
                    std::thread::spawn(move || {
                        store.add(movie(id));
                        store.remove(id);
                        store.add(movie(id));
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            let reloaded = WishlistStore::load(storage);
            assert_eq!(reloaded.list(), store.list());
            assert_eq!(reloaded.count(), 4);
        }
    }

    #[test]
    fn test_subscriber_may_mutate_the_store() {
        let store = Arc::new(WishlistStore::load(Arc::new(MemoryStorage::new())));
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let writer = Arc::clone(&store);
        store.subscribe(move |snapshot| {
            if snapshot.iter().any(|m| m.id == 1) && !writer.contains(2) {
                writer.add(movie(2));
            }
        });
        let sink = seen.clone();
        store.subscribe(move |snapshot| {
            sink.lock().push(snapshot.iter().map(|m| m.id).collect::<Vec<_>>());
        });

        store.add(movie(1));

        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(seen.lock().last(), Some(&vec![1, 2]));
    }

    #[test]
    fn test_multiple_subscribers_and_unsubscribe() {
        let store = WishlistStore::load(Arc::new(MemoryStorage::new()));
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));

        let ca = a.clone();
        let sub_a = store.subscribe(move |_| {
            ca.fetch_add(1, Ordering::SeqCst);
        });
        let cb = b.clone();
        store.subscribe(move |_| {
            cb.fetch_add(1, Ordering::SeqCst);
        });

        store.add(movie(1));
        assert!(store.unsubscribe(sub_a));
        assert!(!store.unsubscribe(sub_a));
        store.add(movie(2));

        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 2);
    }
}
