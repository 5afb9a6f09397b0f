//! Property tests for the seven invariants a conforming volume must hold.
//!
//! Properties 4 and 5 are pure functions of `(handle, bucket_count)` and
//! `(handle, i)` and need no device at all — they call straight into
//! `hashfs::probe` and `hashfs::fnv`, the same functions the volume itself
//! probes and rehashes with. The rest run against a small in-memory volume
//! sized to comfortably hold the generated payload.

use hashfs::fnv::{rehash_n, Handle};
use hashfs::probe::{advance, fold, step_for};
use hashfs::testing::MemoryCard;
use hashfs::{Error, Volume};
use proptest::prelude::*;

const BUCKET_COUNT: u32 = 512;

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,23}"
}

fn payload_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..=max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// 1. Round-trip: create + append, then a full read reproduces the
    /// payload exactly and fills the destination completely.
    #[test]
    fn prop_roundtrip(name in name_strategy(), payload in payload_strategy(505 * 4)) {
        let mut fs = Volume::mount(MemoryCard::new(BUCKET_COUNT)).unwrap();
        let h = Volume::<MemoryCard>::handle(&name);
        fs.create_file(h, &name, None).unwrap();
        if !payload.is_empty() {
            fs.append_file(h, &payload).unwrap();
        }

        let mut dest = vec![0u8; payload.len()];
        let filled = fs.read_file(h, 0, &mut dest).unwrap();
        prop_assert_eq!(filled, payload.len());
        prop_assert_eq!(dest, payload);
    }

    /// 2. Idempotent stat: repeated stat_file calls after a mutation agree.
    #[test]
    fn prop_stat_file_is_idempotent(name in name_strategy(), payload in payload_strategy(505 * 2)) {
        let mut fs = Volume::mount(MemoryCard::new(BUCKET_COUNT)).unwrap();
        let h = Volume::<MemoryCard>::handle(&name);
        fs.create_file(h, &name, None).unwrap();
        if !payload.is_empty() {
            fs.append_file(h, &payload).unwrap();
        }

        let first = fs.stat_file(h).unwrap();
        let second = fs.stat_file(h).unwrap();
        prop_assert_eq!(first, second);
    }

    /// 3. Segment count monotonicity across append/truncate/delete.
    #[test]
    fn prop_segment_count_tracks_mutations(name in name_strategy(), payload in payload_strategy(505 * 3)) {
        let mut fs = Volume::mount(MemoryCard::new(BUCKET_COUNT)).unwrap();
        let h = Volume::<MemoryCard>::handle(&name);
        fs.create_file(h, &name, None).unwrap();
        let (start, _) = fs.stat_file(h).unwrap();
        prop_assert_eq!(start.segment_count, 1);

        if !payload.is_empty() {
            fs.append_file(h, &payload).unwrap();
            let expected_growth = (payload.len() + 504) / 505; // ceil(len / 505)
            let (after_append, _) = fs.stat_file(h).unwrap();
            prop_assert_eq!(after_append.segment_count as usize, 1 + expected_growth);

            if after_append.segment_count > 1 {
                fs.truncate_file(h, 1).unwrap();
                let (after_truncate, _) = fs.stat_file(h).unwrap();
                prop_assert_eq!(after_truncate.segment_count, after_append.segment_count - 1);
            }
        }

        fs.delete_file(h).unwrap();
        prop_assert_eq!(fs.stat_file(h).unwrap_err(), Error::FileNotFound);
    }

    /// 4. Probe determinism: `probe::fold` and the full `probe::advance`
    /// walk from any `a0` are pure functions of their inputs.
    #[test]
    fn prop_probe_is_deterministic(handle in any::<u32>(), bucket_count in 3u32..4096) {
        let first = probe_walk(handle, bucket_count);
        let second = probe_walk(handle, bucket_count);
        prop_assert_eq!(first, second);
    }

    /// 5. Rehash determinism: the i-th `fnv::rehash` is a pure function of
    /// the handle and the rehash count.
    #[test]
    fn prop_rehash_is_deterministic(seed in any::<u32>(), steps in 0u16..64) {
        let h = Handle::from(seed);
        let a = rehash_n(h, steps);
        let b = rehash_n(h, steps);
        prop_assert_eq!(a, b);
    }

    /// 6. Hidden-file exclusion: creating/deleting a "__"-prefixed file
    /// leaves the journal's length untouched.
    #[test]
    fn prop_hidden_files_excluded_from_journal(suffix in "[a-z]{1,10}") {
        let mut fs = Volume::mount(MemoryCard::new(BUCKET_COUNT)).unwrap();
        let before = log_len(&mut fs);

        let name = format!("__{suffix}");
        let h = Volume::<MemoryCard>::handle(&name);
        fs.create_file(h, &name, None).unwrap();
        fs.delete_file(h).unwrap();

        let after = log_len(&mut fs);
        prop_assert_eq!(after, before);
    }

    /// 7. Journal append: each visible create/delete appends exactly 5
    /// bytes, tagged 'c' or 'd'.
    #[test]
    fn prop_journal_append_is_five_bytes(name in name_strategy()) {
        let mut fs = Volume::mount(MemoryCard::new(BUCKET_COUNT)).unwrap();
        let before = log_len(&mut fs);

        let h = Volume::<MemoryCard>::handle(&name);
        fs.create_file(h, &name, None).unwrap();
        let after_create = log_len(&mut fs);
        prop_assert_eq!(after_create, before + 5);

        fs.delete_file(h).unwrap();
        let after_delete = log_len(&mut fs);
        prop_assert_eq!(after_delete, after_create + 5);
    }
}

// Walks the whole ring starting from `fold(handle, bucket_count)`, using the
// crate's own `probe::advance`, and collects every address visited in
// order. Terminates because `advance` is a bijection on `1..=bucket_count-1`
// and the walk stops the moment it returns to `a0`.
fn probe_walk(handle: u32, bucket_count: u32) -> Vec<u32> {
    let a0 = fold(handle, bucket_count);
    let step = step_for(a0);
    let mut addr = a0;
    let mut walk = vec![addr];
    loop {
        addr = advance(addr, step, bucket_count);
        if addr == a0 {
            break;
        }
        walk.push(addr);
    }
    walk
}

fn log_len(fs: &mut Volume<MemoryCard>) -> usize {
    let handle = Volume::<MemoryCard>::handle(hashfs::LOG_NAME);
    let (info, _) = fs.stat_file(handle).unwrap();
    let mut total = 0usize;
    for seg in 1..info.segment_count {
        let addr = fs.find_segment_by_index(handle, seg).unwrap();
        total += fs.stat_segment(addr).unwrap().length as usize;
    }
    total
}
