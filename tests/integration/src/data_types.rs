//! End-to-end scenarios per data type.

use cinder_core::{Aggregate, Error, InsertPosition};

use crate::helpers::open_store;

// --- hashes ---

#[test]
fn hash_set_get_incrby() {
    let (_dir, store) = open_store();

    assert_eq!(store.hset(b"H", b"f", b"1").unwrap(), 1);
    assert_eq!(store.hget(b"H", b"f").unwrap(), b"1");
    assert_eq!(store.hincrby(b"H", b"f", 100).unwrap(), 101);
    assert_eq!(store.hget(b"H", b"f").unwrap(), b"101");
    assert!(matches!(
        store.hincrby(b"H", b"f", i64::MAX),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn hash_round_trip() {
    let (_dir, store) = open_store();
    store.hset(b"H", b"field", b"value").unwrap();
    assert_eq!(store.hget(b"H", b"field").unwrap(), b"value");
    assert_eq!(store.hlen(b"H").unwrap(), 1);
}

// --- lists ---

#[test]
fn list_sparse_indices() {
    let (_dir, store) = open_store();

    // pushes "a" then "b" then "c", each to the left
    assert_eq!(store.lpush(b"L", &[b"a", b"b", b"c"]).unwrap(), 3);
    assert_eq!(
        store.lrange(b"L", 0, -1).unwrap(),
        vec![b"c".to_vec(), b"b".to_vec(), b"a".to_vec()]
    );

    store.rpush(b"L", &[b"x"]).unwrap();
    assert_eq!(
        store.lrange(b"L", 0, -1).unwrap(),
        vec![b"c".to_vec(), b"b".to_vec(), b"a".to_vec(), b"x".to_vec()]
    );
    assert_eq!(store.llen(b"L").unwrap(), 4);
}

#[test]
fn list_push_pop_leaves_prior_state() {
    let (_dir, store) = open_store();
    store.rpush(b"L", &[b"a", b"b"]).unwrap();
    store.lpush(b"L", &[b"v"]).unwrap();
    assert_eq!(store.lpop(b"L").unwrap(), b"v");
    assert_eq!(
        store.lrange(b"L", 0, -1).unwrap(),
        vec![b"a".to_vec(), b"b".to_vec()]
    );
}

#[test]
fn list_insert_correct_on_either_side() {
    let (_dir, store) = open_store();
    store
        .rpush(b"L", &[b"a", b"b", b"c", b"d", b"e", b"f"])
        .unwrap();
    // pivot in the left half
    store
        .linsert(b"L", InsertPosition::Before, b"b", b"X")
        .unwrap();
    // pivot in the right half
    store
        .linsert(b"L", InsertPosition::After, b"e", b"Y")
        .unwrap();
    assert_eq!(
        store.lrange(b"L", 0, -1).unwrap(),
        vec![
            b"a".to_vec(),
            b"X".to_vec(),
            b"b".to_vec(),
            b"c".to_vec(),
            b"d".to_vec(),
            b"e".to_vec(),
            b"Y".to_vec(),
            b"f".to_vec()
        ]
    );
}

// --- sets ---

#[test]
fn sadd_is_idempotent() {
    let (_dir, store) = open_store();
    assert_eq!(store.sadd(b"S", &[b"m"]).unwrap(), 1);
    assert_eq!(store.sadd(b"S", &[b"m"]).unwrap(), 0);
    assert_eq!(store.scard(b"S").unwrap(), 1);
}

// --- zsets ---

#[test]
fn zset_union_with_weights() {
    let (_dir, store) = open_store();
    store.zadd(b"A", &[(1.0, b"x"), (2.0, b"y")]).unwrap();
    store.zadd(b"B", &[(10.0, b"y"), (20.0, b"z")]).unwrap();

    let n = store
        .zunionstore(b"D", &[b"A", b"B"], &[2.0, 3.0], Aggregate::Sum)
        .unwrap();
    assert_eq!(n, 3);
    assert_eq!(store.zscore(b"D", b"x").unwrap(), 2.0);
    assert_eq!(store.zscore(b"D", b"y").unwrap(), 34.0);
    assert_eq!(store.zscore(b"D", b"z").unwrap(), 60.0);
}

#[test]
fn zadd_then_zscore_round_trip() {
    let (_dir, store) = open_store();
    store.zadd(b"Z", &[(1.5, b"m")]).unwrap();
    assert_eq!(store.zscore(b"Z", b"m").unwrap(), 1.5);
    // re-adding the same pair changes nothing
    assert_eq!(store.zadd(b"Z", &[(1.5, b"m")]).unwrap(), 0);
    assert_eq!(store.zcard(b"Z").unwrap(), 1);
}

#[test]
fn zrangebyscore_exclusive_endpoints() {
    let (_dir, store) = open_store();
    store
        .zadd(b"Z", &[(1.0, b"a"), (2.0, b"b"), (3.0, b"c")])
        .unwrap();
    let inner = store.zrangebyscore(b"Z", 1.0, 3.0, false, false).unwrap();
    assert_eq!(inner.len(), 1);
    assert_eq!(inner[0].member, b"b".to_vec());
}

// --- strings ---

#[test]
fn setex_rejects_non_positive_ttl() {
    let (_dir, store) = open_store();
    assert!(matches!(
        store.setex(b"k", b"v", 0),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        store.setex(b"k", b"v", -1),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn values_survive_reopen() {
    let (dir, store) = open_store();
    store.set(b"k", b"v").unwrap();
    store.rpush(b"L", &[b"a", b"b"]).unwrap();
    store.zadd(b"Z", &[(1.0, b"m")]).unwrap();
    drop(store);

    let store = crate::helpers::reopen(&dir);
    assert_eq!(store.get(b"k").unwrap(), b"v");
    assert_eq!(store.llen(b"L").unwrap(), 2);
    assert_eq!(store.zscore(b"Z", b"m").unwrap(), 1.0);
}
