// Field capacities match the fixed-width records the stores were designed
// around (terminator byte excluded).
pub const MAX_NAME_LEN: usize = 79;
pub const MAX_ADDRESS_LEN: usize = 119;
pub const MAX_PHONE_LEN: usize = 19;
pub const MAX_ROLE_LEN: usize = 29;

/// Oldest accepted booking year.
pub const MIN_YEAR: i32 = 2024;
/// Keeps the canonical date key at 8 digits.
pub const MAX_YEAR: i32 = 9999;

/// Largest frame payload accepted when scanning a store. Anything larger is
/// treated as a corrupt length prefix.
pub const MAX_RECORD_BYTES: usize = 64 * 1024;

/// Loyalty points awarded per billed day.
pub const POINTS_PER_DAY: u32 = 10;
