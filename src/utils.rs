/// [Reflected binary Gray code][gray-code] of `i`.
///
/// ```text
/// i -> i xor (i >> 1)
/// ```
///
/// Consecutive codes (including the last and the first of a `2^k` sequence) differ in
/// exactly one bit.
///
/// [gray-code]: https://en.wikipedia.org/wiki/Gray_code
pub fn gray(i: usize) -> usize {
    i ^ (i >> 1)
}

/// Inverse of [`gray`]: the position of code `g` in the Gray sequence.
///
/// ```text
/// g -> g xor (g >> 1) xor (g >> 2) xor ...
/// ```
pub fn gray_inverse(g: usize) -> usize {
    let mut i = g;
    let mut shift = g >> 1;
    while shift != 0 {
        i ^= shift;
        shift >>= 1;
    }
    i
}

/// The Gray sequence of length `2^bits`.
pub fn gray_sequence(bits: usize) -> Vec<usize> {
    (0..1usize << bits).map(gray).collect()
}

/// Reads `bits` as a binary number, most significant bit first.
pub fn bits_to_index(bits: &[bool]) -> usize {
    bits.iter().fold(0, |acc, &b| (acc << 1) | b as usize)
}

/// Writes the low `width` bits of `index`, most significant bit first.
pub fn index_to_bits(index: usize, width: usize) -> Vec<bool> {
    (0..width).rev().map(|j| (index >> j) & 1 == 1).collect()
}

/// Renders the low `width` bits of `value` as `0`/`1` characters, most significant first.
pub fn format_bits(value: usize, width: usize) -> String {
    index_to_bits(value, width).into_iter().map(|b| if b { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_sequence() {
        // i    0   1   2   3   4   5   6   7
        // ----------------------------------
        // g  000 001 011 010 110 111 101 100
        assert_eq!(gray_sequence(1), vec![0, 1]);
        assert_eq!(gray_sequence(2), vec![0b00, 0b01, 0b11, 0b10]);
        assert_eq!(
            gray_sequence(3),
            vec![0b000, 0b001, 0b011, 0b010, 0b110, 0b111, 0b101, 0b100]
        );
    }

    #[test]
    fn test_gray_adjacency_wraps() {
        for bits in 1..=5 {
            let seq = gray_sequence(bits);
            for i in 0..seq.len() {
                let next = seq[(i + 1) % seq.len()];
                assert_eq!((seq[i] ^ next).count_ones(), 1);
            }
        }
    }

    #[test]
    fn test_gray_inverse() {
        for i in 0..64 {
            assert_eq!(gray_inverse(gray(i)), i);
        }
    }

    #[test]
    fn test_bits_conversion() {
        assert_eq!(bits_to_index(&[true, false, true]), 5);
        assert_eq!(bits_to_index(&[]), 0);
        assert_eq!(index_to_bits(5, 4), vec![false, true, false, true]);
        assert_eq!(format_bits(0b011, 3), "011");
    }
}
