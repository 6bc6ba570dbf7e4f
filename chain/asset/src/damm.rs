//! The Damm checksum (https://en.wikipedia.org/wiki/Damm_algorithm) used by
//! the NAI encoding (`spec.md` §4.1). The table below is the fixed 10×10
//! anti-symmetric quasigroup this checksum depends on — any other table
//! would silently change which NAI strings are considered valid, so it
//! must never be "simplified".
#[rustfmt::skip]
const DAMM_TABLE: [u8; 100] = [
    0, 30, 10, 70, 50, 90, 80, 60, 40, 20,
    70,  0, 90, 20, 10, 50, 40, 80, 60, 30,
    40, 20,  0, 60, 80, 70, 10, 30, 50, 90,
    10, 70, 50,  0, 90, 80, 30, 40, 20, 60,
    60, 10, 20, 30,  0, 40, 50, 90, 70, 80,
    30, 60, 70, 40, 20,  0, 90, 50, 80, 10,
    50, 80, 60, 90, 70, 20,  0, 10, 30, 40,
    80, 90, 40, 50, 30, 60, 20,  0, 10, 70,
    90, 40, 30, 80, 60, 10, 70, 20,  0, 50,
    20, 50, 80, 10, 40, 30, 60, 70, 90,  0,
];

/// Computes the Damm check digit of an 8-decimal-digit value
/// (`value < 100_000_000`), walking from the most significant digit to the
/// least significant, `x <- DAMM_TABLE[x + d]` starting at `x = 0`; the
/// final check digit is `x / 10`.
pub fn damm_checksum_8digit(value: u32) -> u8 {
    debug_assert!(value < 100_000_000);

    let mut digits = [0u32; 8];
    let mut v = value;
    for d in digits.iter_mut().rev() {
        *d = v % 10;
        v /= 10;
    }

    let mut x: u32 = 0;
    for d in digits {
        x = DAMM_TABLE[(x + d) as usize] as u32;
    }
    (x / 10) as u8
}
