//! Byte-wise comparison of page contents

/// One differing byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Offset into the compared buffers
    pub offset: usize,
    /// Byte from the reference (file) side
    pub expected: u8,
    /// Byte read from flash
    pub actual: u8,
}

/// Iterate over every differing byte of the common prefix
pub fn mismatches<'a>(expected: &'a [u8], actual: &'a [u8]) -> impl Iterator<Item = Mismatch> + 'a {
    expected
        .iter()
        .zip(actual.iter())
        .enumerate()
        .filter(|(_, (e, a))| e != a)
        .map(|(offset, (&expected, &actual))| Mismatch {
            offset,
            expected,
            actual,
        })
}

/// Count differing bytes
pub fn count_mismatches(expected: &[u8], actual: &[u8]) -> usize {
    mismatches(expected, actual).count()
}
