//! Demonstrates storing records of a known layout in an `OpaqueVec`.
//!
//! The vector only knows the layout of the elements. The caller converts records to and from
//! bytes at the boundary.

use std::num::NonZero;

use opaque_vec::{Error, OpaqueVec};

fn main() {
    println!("=== Opaque Vec Basic Example ===");

    let element_size = NonZero::new(size_of::<u64>()).expect("u64 is not zero-sized");
    let mut readings = OpaqueVec::new(0, element_size);

    for reading in [12_u64, 17, 9, 30, 4] {
        readings.push(&reading.to_ne_bytes());
        println!(
            "Pushed {reading}: len {}, capacity {}",
            readings.len(),
            readings.capacity()
        );
    }

    // Drop the smallest reading without caring about order.
    let smallest_index = (0..readings.len())
        .min_by_key(|&index| read_u64(readings.at(index)))
        .expect("vector is not empty");
    readings.erase_unordered(smallest_index);

    // Split the rest into two halves.
    let mut second_half = OpaqueVec::new(0, element_size);
    readings.split(readings.len() / 2, &mut second_half);

    println!("First half: {:?}", values(&readings));
    println!("Second half: {:?}", values(&second_half));

    // Problems can be handled as values instead of panicking.
    match readings.try_at(readings.len()) {
        Err(Error::OutOfBounds { index, len }) => {
            println!("Index {index} is not valid for {len} readings");
        }
        other => println!("Unexpected result: {other:?}"),
    }

    readings.join(second_half);
    println!("Joined again: {:?}", values(&readings));

    println!("Basic example completed successfully!");
}

fn read_u64(bytes: &[u8]) -> u64 {
    u64::from_ne_bytes(bytes.try_into().expect("element is exactly 8 bytes"))
}

fn values(vec: &OpaqueVec) -> Vec<u64> {
    vec.as_bytes()
        .chunks_exact(vec.element_size())
        .map(read_u64)
        .collect()
}
