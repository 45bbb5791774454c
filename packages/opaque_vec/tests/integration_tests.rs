//! Integration tests for the `opaque_vec` package.
//!
//! These exercise the public API the way a caller storing records of a known layout would,
//! checking the element order, capacity and ownership guarantees across operations.

use std::thread;

use new_zealand::nz;
use opaque_vec::{Error, OpaqueVec};

/// A record with padding-free layout, so it can be copied as bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
struct Record {
    id: u32,
    weight: u32,
}

impl Record {
    fn new(id: u32) -> Self {
        Self {
            id,
            weight: id.wrapping_mul(3),
        }
    }

    fn to_bytes(self) -> [u8; 8] {
        let mut bytes = [0_u8; 8];
        bytes[..4].copy_from_slice(&self.id.to_ne_bytes());
        bytes[4..].copy_from_slice(&self.weight.to_ne_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            id: u32::from_ne_bytes(bytes[..4].try_into().unwrap()),
            weight: u32::from_ne_bytes(bytes[4..].try_into().unwrap()),
        }
    }
}

fn records(vec: &OpaqueVec) -> Vec<Record> {
    vec.as_bytes()
        .chunks_exact(vec.element_size())
        .map(Record::from_bytes)
        .collect()
}

fn record_vec(ids: &[u32]) -> OpaqueVec {
    let mut vec = OpaqueVec::builder().layout_of::<Record>().build();
    for &id in ids {
        vec.push(&Record::new(id).to_bytes());
    }
    vec
}

fn ids(vec: &OpaqueVec) -> Vec<u32> {
    records(vec).iter().map(|record| record.id).collect()
}

#[test]
fn records_survive_many_reallocations() {
    let mut vec = record_vec(&[]);

    for id in 0..5000 {
        vec.push(&Record::new(id).to_bytes());
    }

    assert_eq!(vec.len(), 5000);
    assert!(vec.capacity() >= 5000);
    assert!(vec.capacity() < 10_000);

    for (index, record) in records(&vec).into_iter().enumerate() {
        assert_eq!(record, Record::new(u32::try_from(index).unwrap()));
    }
}

#[test]
fn record_access_by_pointer_cast() {
    let vec = record_vec(&[7, 8, 9]);

    let element = vec.at(2);
    assert_eq!(element.as_ptr().align_offset(align_of::<Record>()), 0);

    // SAFETY: The vector was built with the layout of Record, element 2 is live and Record
    // is valid for any bit pattern.
    let record = unsafe { element.as_ptr().cast::<Record>().read() };
    assert_eq!(record, Record::new(9));
}

#[test]
fn capacity_only_grows() {
    let mut vec = record_vec(&[1, 2, 3, 4, 5]);
    let mut previous = vec.capacity();

    for step in 0..200 {
        match step % 4 {
            0 => vec.push(&Record::new(step).to_bytes()),
            1 => vec.resize(vec.len() / 2),
            2 => vec.ensure_capacity(vec.len() + 3),
            _ => vec.clear(),
        }

        assert!(vec.capacity() >= previous);
        assert!(vec.len() <= vec.capacity());
        previous = vec.capacity();
    }
}

#[test]
fn resize_then_set_fills_gaps() {
    let mut vec = record_vec(&[1]);

    vec.resize(4);
    assert_eq!(records(&vec)[1..], [Record { id: 0, weight: 0 }; 3]);

    vec.set(3, &Record::new(4).to_bytes());
    assert_eq!(ids(&vec), [1, 0, 0, 4]);
}

#[test]
fn stack_usage_round_trips() {
    let mut vec = record_vec(&[]);

    for id in 0..10 {
        vec.push(&Record::new(id).to_bytes());
    }

    let mut out = [0_u8; 8];
    for id in (0..10).rev() {
        vec.pop(&mut out);
        assert_eq!(Record::from_bytes(&out), Record::new(id));
    }

    assert!(vec.is_empty());
    assert!(matches!(
        vec.try_pop(&mut out),
        Err(Error::Underflow {
            requested: 1,
            len: 0
        })
    ));
}

#[test]
fn erase_variants_keep_the_same_survivors() {
    let mut ordered = record_vec(&[0, 1, 2, 3, 4, 5, 6]);
    let mut unordered = ordered.clone();

    ordered.erase(2);
    unordered.erase_unordered(2);

    assert_eq!(ids(&ordered), [0, 1, 3, 4, 5, 6]);

    let mut survivors = ids(&unordered);
    survivors.sort_unstable();
    assert_eq!(survivors, ids(&ordered));
}

#[test]
fn join_then_split_restores_both_halves() {
    let mut first = record_vec(&[1, 2]);
    let second = record_vec(&[3, 4]);

    first.join(second);
    assert_eq!(ids(&first), [1, 2, 3, 4]);

    let mut second = record_vec(&[]);
    first.split(2, &mut second);

    assert_eq!(ids(&first), [1, 2]);
    assert_eq!(ids(&second), [3, 4]);

    first.split(10, &mut second);
    assert_eq!(ids(&first), [1, 2]);
    assert_eq!(ids(&second), [3, 4]);
}

#[test]
fn join_with_different_element_size_is_rejected() {
    let mut wide = record_vec(&[1]);
    let bytes = OpaqueVec::from_bytes(nz!(1), &[1, 2, 3]);

    let error = wide.try_join(bytes).unwrap_err();

    assert!(matches!(
        error,
        Error::SizeMismatch {
            first: 8,
            second: 1
        }
    ));
    assert_eq!(
        error.to_string(),
        "element sizes do not match: 8 vs 1"
    );
}

#[test]
fn one_past_end_is_out_of_bounds() {
    let mut vec = record_vec(&[1, 2]);

    assert!(matches!(
        vec.try_at(2),
        Err(Error::OutOfBounds { index: 2, len: 2 })
    ));
    assert!(matches!(
        vec.try_at_mut(2),
        Err(Error::OutOfBounds { index: 2, len: 2 })
    ));

    let mut out = [0_u8; 8];
    assert!(matches!(
        vec.try_get(2, &mut out),
        Err(Error::OutOfBounds { index: 2, len: 2 })
    ));
}

#[test]
fn copies_are_independent_both_ways() {
    let mut original = record_vec(&[1, 2, 3]);
    let mut copy = original.clone();

    copy.push(&Record::new(4).to_bytes());
    copy.erase(0);
    assert_eq!(ids(&original), [1, 2, 3]);

    original.erase_unordered(0);
    original.push(&Record::new(9).to_bytes());
    assert_eq!(ids(&copy), [2, 3, 4]);
}

#[test]
fn vector_moves_between_threads() {
    let vec = record_vec(&[1, 2, 3]);

    let vec = thread::spawn(move || {
        let mut vec = vec;
        vec.push(&Record::new(4).to_bytes());
        vec
    })
    .join()
    .expect("thread completed successfully");

    assert_eq!(ids(&vec), [1, 2, 3, 4]);
}

#[test]
#[should_panic(expected = "index 5 is out of bounds for vector of length 5")]
fn fail_fast_access_panics_with_operands() {
    let vec = record_vec(&[1, 2, 3, 4, 5]);
    _ = vec.at(5);
}
