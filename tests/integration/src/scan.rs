//! Paged SCAN across the typed keyspaces.

use crate::helpers::open_store;

#[test]
fn scan_with_cursor_store() {
    let (_dir, store) = open_store();
    store
        .mset(&[
            (b"SCAN_K1", b"1"),
            (b"SCAN_K2", b"2"),
            (b"SCAN_K3", b"3"),
            (b"SCAN_K4", b"4"),
            (b"SCAN_K5", b"5"),
        ])
        .unwrap();

    let (cursor, page) = store.scan(0, b"SCAN*", 3).unwrap();
    assert_eq!(
        page,
        vec![b"SCAN_K1".to_vec(), b"SCAN_K2".to_vec(), b"SCAN_K3".to_vec()]
    );
    assert_ne!(cursor, 0);

    let (cursor, page) = store.scan(cursor, b"SCAN*", 3).unwrap();
    assert_eq!(page, vec![b"SCAN_K4".to_vec(), b"SCAN_K5".to_vec()]);
    assert_eq!(cursor, 0);
}

#[test]
fn scan_advances_through_every_type() {
    let (_dir, store) = open_store();
    store.set(b"t_string", b"v").unwrap();
    store.hset(b"t_hash", b"f", b"v").unwrap();
    store.sadd(b"t_set", &[b"m"]).unwrap();
    store.rpush(b"t_list", &[b"v"]).unwrap();
    store.zadd(b"t_zset", &[(1.0, b"m")]).unwrap();

    // a budget larger than any single keyspace must keep advancing
    let (cursor, page) = store.scan(0, b"t_*", 100).unwrap();
    assert_eq!(cursor, 0);
    let mut found = page;
    found.sort();
    assert_eq!(
        found,
        vec![
            b"t_hash".to_vec(),
            b"t_list".to_vec(),
            b"t_set".to_vec(),
            b"t_string".to_vec(),
            b"t_zset".to_vec()
        ]
    );
}

#[test]
fn scan_pattern_filters_but_still_pages() {
    let (_dir, store) = open_store();
    store
        .mset(&[(b"match_1", b"1"), (b"skip_1", b"2"), (b"match_2", b"3")])
        .unwrap();

    let mut cursor = 0;
    let mut matched = Vec::new();
    loop {
        let (next, mut page) = store.scan(cursor, b"match*", 1).unwrap();
        matched.append(&mut page);
        if next == 0 {
            break;
        }
        cursor = next;
    }
    matched.sort();
    assert_eq!(matched, vec![b"match_1".to_vec(), b"match_2".to_vec()]);
}

#[test]
fn concurrent_scans_do_not_collide() {
    let (_dir, store) = open_store();
    store
        .mset(&[(b"a1", b"1"), (b"a2", b"2"), (b"a3", b"3")])
        .unwrap();

    // two interleaved scans with the same requested cursor base
    let (c1, p1) = store.scan(0, b"a*", 1).unwrap();
    let (c2, p2) = store.scan(0, b"a*", 1).unwrap();
    assert_ne!(c1, c2);
    assert_eq!(p1, vec![b"a1".to_vec()]);
    assert_eq!(p2, vec![b"a1".to_vec()]);

    let (_, p1next) = store.scan(c1, b"a*", 1).unwrap();
    let (_, p2next) = store.scan(c2, b"a*", 1).unwrap();
    assert_eq!(p1next, vec![b"a2".to_vec()]);
    assert_eq!(p2next, vec![b"a2".to_vec()]);
}

#[test]
fn sscan_resumes_from_stored_member() {
    let (_dir, store) = open_store();
    let members: Vec<Vec<u8>> = (0..7).map(|i| format!("m{i}").into_bytes()).collect();
    let refs: Vec<&[u8]> = members.iter().map(Vec::as_slice).collect();
    store.sadd(b"S", &refs).unwrap();

    let (cursor, first) = store.sscan(b"S", 0, b"*", 3).unwrap();
    let (cursor, second) = store.sscan(b"S", cursor, b"*", 3).unwrap();
    let (cursor, third) = store.sscan(b"S", cursor, b"*", 3).unwrap();
    assert_eq!(cursor, 0);

    let mut all: Vec<Vec<u8>> = first.into_iter().chain(second).chain(third).collect();
    all.sort();
    assert_eq!(all, members);
}
