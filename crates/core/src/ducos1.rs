//! DUCO-S1 proof-of-work search
//!
//! A job names the previous block hash, the expected result hash and a
//! difficulty. The board looks for the nonce in `0..=difficulty * 100` for which
//!
//! ```text
//! SHA1(last_hash || decimal(nonce)) == expected_hash
//! ```
//!
//! `last_hash` is absorbed once and the resulting midstate is cloned per nonce.

use core::ops::RangeInclusive;

use crate::hasher::Sha1;
use crate::params::{Digest, NONCE_RANGE_MULTIPLIER};

/// Largest nonce tried for a difficulty (inclusive)
#[inline]
pub fn max_nonce(difficulty: u32) -> u32 {
    difficulty.saturating_mul(NONCE_RANGE_MULTIPLIER)
}

/// Feed `nonce` to `hasher` as decimal ASCII, without leading zeros
#[inline]
pub fn write_nonce(hasher: &mut Sha1, mut nonce: u32) {
    // u32::MAX has 10 digits
    let mut digits = [0u8; 10];
    let mut start = digits.len();
    loop {
        start -= 1;
        digits[start] = b'0' + (nonce % 10) as u8;
        nonce /= 10;
        if nonce == 0 {
            break;
        }
    }
    hasher.write_bytes(&digits[start..]);
}

/// Hasher that has already absorbed `last_hash`
pub fn prefix_state(last_hash: &[u8]) -> Sha1 {
    let mut hasher = Sha1::new();
    hasher.write_bytes(last_hash);
    hasher
}

/// Try every nonce in `nonces` against `expected`, starting from `prefix`
///
/// Returns the first (lowest) matching nonce.
pub fn search_range(prefix: &Sha1, expected: &Digest, nonces: RangeInclusive<u32>) -> Option<u32> {
    for nonce in nonces {
        let mut hasher = prefix.clone();
        write_nonce(&mut hasher, nonce);
        if hasher.result() == expected {
            return Some(nonce);
        }
    }
    None
}

/// Solve a DUCO-S1 job, returning the matching nonce if one is in range
pub fn search(last_hash: &[u8], expected: &Digest, difficulty: u32) -> Option<u32> {
    let max = max_nonce(difficulty);
    log::trace!("DUCO-S1 search: difficulty {difficulty}, nonces 0..={max}");

    let prefix = prefix_state(last_hash);
    let found = search_range(&prefix, expected, 0..=max);

    match found {
        Some(nonce) => log::debug!("DUCO-S1 nonce found: {nonce}"),
        None => log::debug!("DUCO-S1 job exhausted without a match"),
    }
    found
}

/// Compute the DUCO-S1 digest for one nonce
pub fn job_digest(last_hash: &[u8], nonce: u32) -> Digest {
    let mut hasher = prefix_state(last_hash);
    write_nonce(&mut hasher, nonce);
    *hasher.result()
}
