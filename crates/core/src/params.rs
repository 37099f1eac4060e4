//! SHA-1 and DUCO-S1 Parameters
//!
//! Sizes are fixed so that a hasher fits in the RAM of an 8-bit board.

/// SHA-1 digest size in bytes
pub const HASH_LENGTH: usize = 20;

/// SHA-1 block size in bytes
pub const BLOCK_LENGTH: usize = 64;

/// Offset inside the final block where the bit-length trailer starts
pub const LENGTH_OFFSET: usize = BLOCK_LENGTH - 8;

/// Number of 32-bit words in the running state
pub const STATE_WORDS: usize = HASH_LENGTH / 4;

/// Initial SHA-1 state (FIPS 180-4, section 5.3.1)
pub const INITIAL_STATE: [u32; STATE_WORDS] =
    [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

/// Round constants, one per 20-round stage
pub const ROUND_CONSTANTS: [u32; 4] = [0x5A827999, 0x6ED9EBA1, 0x8F1BBCDC, 0xCA62C1D6];

/// HMAC inner pad byte (RFC 2104)
pub const HMAC_IPAD: u8 = 0x36;

/// HMAC outer pad byte (RFC 2104)
pub const HMAC_OPAD: u8 = 0x5C;

/// DUCO-S1 nonce range multiplier: nonces run from 0 to `difficulty * 100`
pub const NONCE_RANGE_MULTIPLIER: u32 = 100;

/// A SHA-1 digest
pub type Digest = [u8; HASH_LENGTH];
