/// Calculates the capacity that satisfies a request for at least `required` elements, given the
/// `current` capacity.
///
/// Starts from the current capacity (or 1 if there is none yet) and doubles until the request is
/// covered. The result is never less than `current` and, when growth happens, never more than
/// twice `required`.
///
/// If doubling would overflow `usize`, the result is `required` itself.
#[must_use]
#[cfg_attr(test, mutants::skip)] // Can be mutated to an infinite loop.
pub(crate) fn grown_capacity(current: usize, required: usize) -> usize {
    let mut capacity = current.max(1);

    while capacity < required {
        capacity = capacity.checked_mul(2).unwrap_or(required);
    }

    capacity
}

#[cfg(test)]
#[allow(
    clippy::arithmetic_side_effects,
    reason = "tests focus on succinct code and do not need to tick all the boxes"
)]
mod tests {
    use super::*;

    #[test]
    fn empty_starts_from_one() {
        assert_eq!(grown_capacity(0, 0), 1);
        assert_eq!(grown_capacity(0, 1), 1);
        assert_eq!(grown_capacity(0, 2), 2);
        assert_eq!(grown_capacity(0, 3), 4);
        assert_eq!(grown_capacity(0, 5), 8);
    }

    #[test]
    fn sufficient_capacity_is_kept() {
        assert_eq!(grown_capacity(16, 1), 16);
        assert_eq!(grown_capacity(16, 16), 16);
    }

    #[test]
    fn doubles_from_current_capacity() {
        assert_eq!(grown_capacity(3, 4), 6);
        assert_eq!(grown_capacity(3, 7), 12);
        assert_eq!(grown_capacity(10, 11), 20);
    }

    #[test]
    fn never_decreases_and_never_overshoots_twice() {
        for current in 0..64 {
            for required in 0..300 {
                let capacity = grown_capacity(current, required);

                assert!(capacity >= current);
                assert!(capacity >= required);

                if capacity > current.max(1) {
                    assert!(
                        capacity < required * 2,
                        "grew {current} to {capacity} for a request of {required}"
                    );
                }
            }
        }
    }

    #[test]
    fn overflowing_doubling_stops_at_request() {
        let current = usize::MAX / 2 + 1;
        let required = usize::MAX - 1;

        assert_eq!(grown_capacity(current, required), required);
    }
}
