//! Compaction-driven garbage collection and the meta-count invariants.

use crate::helpers::open_store;

#[test]
fn reads_stay_correct_across_compaction() {
    let (_dir, store) = open_store();

    // build a generation, orphan it, build another
    store
        .hmset(b"H", &[(b"a", b"1"), (b"b", b"2"), (b"c", b"3")])
        .unwrap();
    store.del(&[b"H"]);
    store.hset(b"H", b"d", b"4").unwrap();

    store.compact().unwrap();

    assert_eq!(
        store.hgetall(b"H").unwrap(),
        vec![(b"d".to_vec(), b"4".to_vec())]
    );
    assert_eq!(store.hlen(b"H").unwrap(), 1);
}

#[test]
fn expired_strings_vanish_after_compaction() {
    let (_dir, store) = open_store();
    store.set(b"gone", b"v").unwrap();
    store.expireat(b"gone", 1);
    store.set(b"kept", b"v").unwrap();

    store.compact().unwrap();

    assert!(store.get(b"gone").unwrap_err().is_not_found());
    assert_eq!(store.get(b"kept").unwrap(), b"v");
    // a new write after reclamation starts clean
    store.set(b"gone", b"back").unwrap();
    assert_eq!(store.get(b"gone").unwrap(), b"back");
}

#[test]
fn orphaned_zset_entries_stay_invisible() {
    let (_dir, store) = open_store();
    store
        .zadd(b"Z", &[(1.0, b"a"), (2.0, b"b"), (3.0, b"c")])
        .unwrap();
    store.del(&[b"Z"]);
    store.zadd(b"Z", &[(9.0, b"x")]).unwrap();

    store.compact().unwrap();

    let entries = store.zrange(b"Z", 0, -1).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].member, b"x".to_vec());
    assert_eq!(store.zcard(b"Z").unwrap(), 1);
    assert!(store.zscore(b"Z", b"a").unwrap_err().is_not_found());
}

#[test]
fn list_generations_are_isolated() {
    let (_dir, store) = open_store();
    store.rpush(b"L", &[b"a", b"b", b"c"]).unwrap();
    store.del(&[b"L"]);
    store.rpush(b"L", &[b"z"]).unwrap();

    store.compact().unwrap();

    assert_eq!(store.lrange(b"L", 0, -1).unwrap(), vec![b"z".to_vec()]);
    assert_eq!(store.llen(b"L").unwrap(), 1);
}

/// Meta count equals the number of reachable sub-records after a random-ish
/// mix of adds and removes.
#[test]
fn meta_count_matches_sub_records() {
    let (_dir, store) = open_store();
    let members: Vec<Vec<u8>> = (0..40).map(|i| format!("member-{i:02}").into_bytes()).collect();
    let refs: Vec<&[u8]> = members.iter().map(Vec::as_slice).collect();

    store.sadd(b"S", &refs[..30]).unwrap();
    store.srem(b"S", &refs[5..15]).unwrap();
    store.sadd(b"S", &refs[20..]).unwrap();
    store.spop(b"S").unwrap();

    let card = store.scard(b"S").unwrap() as usize;
    assert_eq!(card, store.smembers(b"S").unwrap().len());

    // same invariant for hashes
    store.hmset(b"H", &[(b"a", b"1"), (b"b", b"2")]).unwrap();
    store.hdel(b"H", &[b"a"]).unwrap();
    assert_eq!(
        store.hlen(b"H").unwrap() as usize,
        store.hgetall(b"H").unwrap().len()
    );

    // and for zsets, on both of its column families
    store
        .zadd(b"Z", &[(1.0, b"a"), (2.0, b"b"), (3.0, b"c")])
        .unwrap();
    store.zrem(b"Z", &[b"b"]).unwrap();
    let by_score = store.zrange(b"Z", 0, -1).unwrap();
    assert_eq!(by_score.len(), store.zcard(b"Z").unwrap() as usize);
    for entry in &by_score {
        assert_eq!(store.zscore(b"Z", &entry.member).unwrap(), entry.score);
    }
}
