//! Unit-conversion arithmetic between payload elements and header words
//!
//! Every word-packed record format counts its size in "header-native words"
//! while its payload is a run of smaller elements (characters, samples, bytes).
//! These helpers convert between the two, rounding up when the element count
//! does not fill the last word.

/// Number of header words needed to hold `n_elements` payload elements
///
/// Rounds up on remainder. Zero elements need zero words.
#[inline]
pub const fn elements_to_words(n_elements: usize, elements_per_word: usize) -> usize {
    n_elements.div_ceil(elements_per_word)
}

/// Number of payload elements that `n_words` header words can hold
#[inline]
pub const fn words_to_elements(n_words: usize, elements_per_word: usize) -> usize {
    n_words * elements_per_word
}

/// Round a byte count up to the next multiple of a buffer's allocation unit
#[inline]
pub const fn round_up_to_allocation_unit(n_bytes: usize, allocation_unit: usize) -> usize {
    n_bytes.div_ceil(allocation_unit) * allocation_unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_elements_is_zero_words() {
        assert_eq!(elements_to_words(0, 1), 0);
        assert_eq!(elements_to_words(0, 2), 0);
        assert_eq!(elements_to_words(0, 4), 0);
    }

    #[test]
    fn test_rounds_up_on_remainder() {
        assert_eq!(elements_to_words(1, 4), 1);
        assert_eq!(elements_to_words(4, 4), 1);
        assert_eq!(elements_to_words(5, 4), 2);
        assert_eq!(elements_to_words(3, 2), 2);
        assert_eq!(elements_to_words(17, 1), 17);
    }

    #[test]
    fn test_allocation_unit_rounding() {
        assert_eq!(round_up_to_allocation_unit(0, 8), 0);
        assert_eq!(round_up_to_allocation_unit(1, 8), 8);
        assert_eq!(round_up_to_allocation_unit(12, 8), 16);
        assert_eq!(round_up_to_allocation_unit(24, 8), 24);
    }

    proptest! {
        #[test]
        fn prop_round_trip_never_loses_elements(n in 0usize..1_000_000, epw in 1usize..=8) {
            let back = words_to_elements(elements_to_words(n, epw), epw);
            prop_assert!(back >= n);
            prop_assert!(back - n < epw);
            if n % epw == 0 {
                prop_assert_eq!(back, n);
            }
        }

        #[test]
        fn prop_allocation_rounding_is_minimal(n in 0usize..1_000_000, unit in 1usize..=64) {
            let rounded = round_up_to_allocation_unit(n, unit);
            prop_assert_eq!(rounded % unit, 0);
            prop_assert!(rounded >= n);
            prop_assert!(rounded - n < unit);
        }
    }
}
