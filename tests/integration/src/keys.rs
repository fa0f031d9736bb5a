//! Cross-type key commands: EXPIRE, DEL, TTL.

use std::thread;
use std::time::Duration;

use cinder_core::DataType;

use crate::helpers::open_store;

#[test]
fn expiration_renders_reads_not_found_and_writes_reinitialize() {
    let (_dir, store) = open_store();
    store.set(b"k", b"v").unwrap();
    let (count, _) = store.expire(b"k", 1);
    assert_eq!(count, 1);

    thread::sleep(Duration::from_secs(2));
    assert!(store.get(b"k").unwrap_err().is_not_found());

    store.set(b"k", b"v2").unwrap();
    assert_eq!(store.get(b"k").unwrap(), b"v2");
}

#[test]
fn cross_type_expire_reporting() {
    let (_dir, store) = open_store();
    store.set(b"K", b"v").unwrap();
    store.hset(b"K", b"f", b"w").unwrap();

    let (count, statuses) = store.expire(b"K", 100);
    assert_eq!(count, 2);
    assert!(statuses[&DataType::Strings].is_ok());
    assert!(statuses[&DataType::Hashes].is_ok());
    for dead in [DataType::Sets, DataType::Lists, DataType::ZSets] {
        assert!(statuses[&dead]
            .as_ref()
            .err()
            .is_some_and(cinder_core::Error::is_not_found));
    }
}

#[test]
fn del_then_set_reads_new_value() {
    let (_dir, store) = open_store();
    store.hset(b"K", b"old", b"1").unwrap();
    let (count, _) = store.del(&[b"K"]);
    assert_eq!(count, 1);
    assert!(store.hget(b"K", b"old").unwrap_err().is_not_found());

    // sub-records of the earlier version may still exist physically;
    // the new generation must not see them
    store.hset(b"K", b"new", b"2").unwrap();
    assert_eq!(
        store.hgetall(b"K").unwrap(),
        vec![(b"new".to_vec(), b"2".to_vec())]
    );
}

#[test]
fn del_counts_keys_with_any_type_removed() {
    let (_dir, store) = open_store();
    store.set(b"a", b"v").unwrap();
    store.sadd(b"a", &[b"m"]).unwrap();
    store.rpush(b"b", &[b"v"]).unwrap();
    let (count, _) = store.del(&[b"a", b"b", b"ghost"]);
    assert_eq!(count, 2);
}

#[test]
fn ttl_per_type_values() {
    let (_dir, store) = open_store();
    store.set(b"K", b"v").unwrap();
    store.sadd(b"K", &[b"m"]).unwrap();
    let (count, _) = store.expire(b"K", 200);
    assert_eq!(count, 2);

    let ttls = store.ttl(b"K").unwrap();
    assert!((198..=200).contains(&ttls[&DataType::Strings]));
    assert!((198..=200).contains(&ttls[&DataType::Sets]));
    assert_eq!(ttls[&DataType::Hashes], -2);

    let (count, _) = store.persist(b"K");
    assert_eq!(count, 2);
    let ttls = store.ttl(b"K").unwrap();
    assert_eq!(ttls[&DataType::Strings], -1);
    assert_eq!(ttls[&DataType::Sets], -1);
}

#[test]
fn ttl_is_minus_two_exactly_when_reads_fail() {
    let (_dir, store) = open_store();
    store.rpush(b"K", &[b"v"]).unwrap();
    let ttls = store.ttl(b"K").unwrap();
    assert_eq!(ttls[&DataType::Lists], -1);

    store.expireat(b"K", 1);
    let ttls = store.ttl(b"K").unwrap();
    assert_eq!(ttls[&DataType::Lists], -2);
    assert!(store.lpop(b"K").unwrap_err().is_not_found());
}
