use rand::Rng;

/// Length of a classroom join code.
pub const CODE_LEN: usize = 8;

/// Generate a random 8-digit classroom code.
///
/// The range keeps the first digit non-zero so the code survives clients that
/// treat it as a number.
pub fn generate() -> String {
    rand::rng().random_range(10_000_000u32..100_000_000).to_string()
}

/// Check the shape of a caller-supplied code without touching the store.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}
