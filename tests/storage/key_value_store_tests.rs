//! KeyValueStore interface tests.
//!
//! These tests verify the contract of the KeyValueStore trait.
//! Each storage implementation should run these tests. Keys are made unique
//! per run so the suite can share a database with other data, except for
//! the flush test which must run last.

use uuid::Uuid;

use redis_cache::KeyValueStore;

/// Build a key that no other test run uses.
pub fn unique_key(name: &str) -> String {
    format!("test_{}_{}", name, Uuid::new_v4().simple())
}

// =============================================================================
// KeyValueStore::get / set tests
// =============================================================================

pub async fn test_get_nonexistent<S: KeyValueStore>(store: &S) {
    let key = unique_key("get_missing");

    let value = store.get(&key).await.expect("get should succeed");
    assert!(value.is_none(), "nonexistent key should be None");
}

pub async fn test_set_then_get<S: KeyValueStore>(store: &S) {
    let key = unique_key("set_get");

    store
        .set(&key, b"value".to_vec())
        .await
        .expect("set should succeed");

    let value = store.get(&key).await.expect("get should succeed");
    assert_eq!(value, Some(b"value".to_vec()));
}

pub async fn test_set_preserves_binary<S: KeyValueStore>(store: &S) {
    let key = unique_key("set_binary");
    let data = vec![0u8, 1, 2, 127, 128, 200, 255];

    store.set(&key, data.clone()).await.expect("set should succeed");

    let value = store.get(&key).await.expect("get should succeed");
    assert_eq!(value, Some(data));
}

pub async fn test_set_overwrites<S: KeyValueStore>(store: &S) {
    let key = unique_key("set_overwrite");

    store.set(&key, b"first".to_vec()).await.expect("first set");
    store.set(&key, b"second".to_vec()).await.expect("second set");

    let value = store.get(&key).await.expect("get should succeed");
    assert_eq!(value, Some(b"second".to_vec()));
}

// =============================================================================
// KeyValueStore::incr tests
// =============================================================================

pub async fn test_incr_creates_counter<S: KeyValueStore>(store: &S) {
    let key = unique_key("incr_new");

    let count = store.incr(&key).await.expect("incr should succeed");
    assert_eq!(count, 1);
}

pub async fn test_incr_is_monotonic<S: KeyValueStore>(store: &S) {
    let key = unique_key("incr_many");

    for expected in 1..=5 {
        let count = store.incr(&key).await.expect("incr should succeed");
        assert_eq!(count, expected);
    }

    let raw = store.get(&key).await.expect("get should succeed");
    assert_eq!(raw, Some(b"5".to_vec()));
}

// =============================================================================
// KeyValueStore::append / range tests
// =============================================================================

pub async fn test_append_returns_length<S: KeyValueStore>(store: &S) {
    let key = unique_key("append_len");

    assert_eq!(store.append(&key, "a").await.expect("append"), 1);
    assert_eq!(store.append(&key, "b").await.expect("append"), 2);
    assert_eq!(store.append(&key, "c").await.expect("append"), 3);
}

pub async fn test_range_all_preserves_order<S: KeyValueStore>(store: &S) {
    let key = unique_key("range_all");
    for item in ["first", "second", "third"] {
        store.append(&key, item).await.expect("append");
    }

    let items = store.range(&key, 0, -1).await.expect("range should succeed");
    assert_eq!(
        items,
        vec![b"first".to_vec(), b"second".to_vec(), b"third".to_vec()]
    );
}

pub async fn test_range_inclusive_bounds<S: KeyValueStore>(store: &S) {
    let key = unique_key("range_bounds");
    for item in ["a", "b", "c", "d", "e"] {
        store.append(&key, item).await.expect("append");
    }

    let middle = store.range(&key, 1, 3).await.expect("range");
    assert_eq!(middle, vec![b"b".to_vec(), b"c".to_vec(), b"d".to_vec()]);

    let last_two = store.range(&key, -2, -1).await.expect("range");
    assert_eq!(last_two, vec![b"d".to_vec(), b"e".to_vec()]);

    let past_end = store.range(&key, 10, 20).await.expect("range");
    assert!(past_end.is_empty());
}

pub async fn test_range_missing_key<S: KeyValueStore>(store: &S) {
    let key = unique_key("range_missing");

    let items = store.range(&key, 0, -1).await.expect("range should succeed");
    assert!(items.is_empty());
}

// =============================================================================
// KeyValueStore::flush tests
// =============================================================================

pub async fn test_flush_removes_all_kinds<S: KeyValueStore>(store: &S) {
    let value_key = unique_key("flush_value");
    let counter_key = unique_key("flush_counter");
    let list_key = unique_key("flush_list");

    store.set(&value_key, b"v".to_vec()).await.expect("set");
    store.incr(&counter_key).await.expect("incr");
    store.append(&list_key, "x").await.expect("append");

    store.flush().await.expect("flush should succeed");

    assert!(store.get(&value_key).await.expect("get").is_none());
    assert!(store.get(&counter_key).await.expect("get").is_none());
    assert!(store.range(&list_key, 0, -1).await.expect("range").is_empty());
}

/// Run all KeyValueStore tests against a store implementation.
#[macro_export]
macro_rules! run_key_value_store_tests {
    ($store:expr) => {
        use $crate::storage::key_value_store_tests::*;

        // get/set tests
        test_get_nonexistent($store).await;
        println!("  test_get_nonexistent: PASSED");

        test_set_then_get($store).await;
        println!("  test_set_then_get: PASSED");

        test_set_preserves_binary($store).await;
        println!("  test_set_preserves_binary: PASSED");

        test_set_overwrites($store).await;
        println!("  test_set_overwrites: PASSED");

        // incr tests
        test_incr_creates_counter($store).await;
        println!("  test_incr_creates_counter: PASSED");

        test_incr_is_monotonic($store).await;
        println!("  test_incr_is_monotonic: PASSED");

        // append/range tests
        test_append_returns_length($store).await;
        println!("  test_append_returns_length: PASSED");

        test_range_all_preserves_order($store).await;
        println!("  test_range_all_preserves_order: PASSED");

        test_range_inclusive_bounds($store).await;
        println!("  test_range_inclusive_bounds: PASSED");

        test_range_missing_key($store).await;
        println!("  test_range_missing_key: PASSED");

        // flush tests (destructive, keep last)
        test_flush_removes_all_kinds($store).await;
        println!("  test_flush_removes_all_kinds: PASSED");
    };
}
