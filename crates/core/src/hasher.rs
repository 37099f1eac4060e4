//! Streaming SHA-1 / HMAC-SHA1 hasher
//!
//! Bytes are accepted one at a time (or in bulk), buffered into 64-byte blocks and
//! compressed as soon as a block is full. All storage lives inside the [`Sha1`]
//! value, so the hasher never allocates and fits on an 8-bit board.
//!
//! The block buffer and the digest are plain byte arrays. Word access happens only
//! through [`load_be_words`] (message schedule) and [`store_be_words`] (digest
//! serialization), so the result is independent of the target's native endianness.

use core::fmt;

use crate::params::*;

/// Where a hasher is in its lifecycle (debug builds only)
#[cfg(debug_assertions)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Accumulating,
    Finalized,
}

/// Streaming SHA-1 hasher with HMAC support
///
/// `init()` (or `init_hmac()`) starts a computation, `write()` feeds it and
/// `result()` (or `result_hmac()`) finalizes it. After finalization the hasher
/// must be re-initialized before it is fed again. Release builds do not check
/// this; debug builds panic on misuse.
///
/// Cloning a hasher snapshots its midstate, which is how a common prefix is
/// absorbed only once when many messages share it.
#[derive(Clone)]
pub struct Sha1 {
    buffer: [u8; BLOCK_LENGTH],
    buffer_offset: usize,
    state: [u32; STATE_WORDS],
    byte_count: u32,
    digest: Digest,
    key_buffer: [u8; BLOCK_LENGTH],
    inner_hash: Digest,
    #[cfg(debug_assertions)]
    phase: Phase,
}

impl Sha1 {
    /// Create a hasher that is ready to accept data
    pub fn new() -> Self {
        Self {
            buffer: [0u8; BLOCK_LENGTH],
            buffer_offset: 0,
            state: INITIAL_STATE,
            byte_count: 0,
            digest: [0u8; HASH_LENGTH],
            key_buffer: [0u8; BLOCK_LENGTH],
            inner_hash: [0u8; HASH_LENGTH],
            #[cfg(debug_assertions)]
            phase: Phase::Accumulating,
        }
    }

    /// Reset to the start of a fresh SHA-1 computation
    ///
    /// Safe to call at any time. HMAC key material is left untouched.
    pub fn init(&mut self) {
        self.byte_count = 0;
        self.buffer_offset = 0;
        self.state = INITIAL_STATE;
        #[cfg(debug_assertions)]
        {
            self.phase = Phase::Accumulating;
        }
    }

    /// Feed one byte. Always accepts it and returns 1.
    #[inline]
    pub fn write(&mut self, data: u8) -> usize {
        self.debug_assert_accumulating();
        self.byte_count = self.byte_count.wrapping_add(1);
        self.add_uncounted(data);
        1
    }

    /// Feed a sequence of bytes, returning how many were accepted
    pub fn write_bytes(&mut self, data: &[u8]) -> usize {
        let mut written = 0;
        for &byte in data {
            written += self.write(byte);
        }
        written
    }

    /// Pad, run the final compression(s) and return the big-endian digest
    ///
    /// The returned digest borrows the hasher's own buffer; copy it out before
    /// starting the next computation.
    pub fn result(&mut self) -> &Digest {
        self.debug_assert_accumulating();
        self.pad();
        store_be_words(&self.state, &mut self.digest);
        #[cfg(debug_assertions)]
        {
            self.phase = Phase::Finalized;
        }
        &self.digest
    }

    /// Start an HMAC-SHA1 computation keyed with `secret`
    ///
    /// Keys longer than one block are replaced by their SHA-1 digest. The inner
    /// pad is fed through the normal write path as the first block of input.
    pub fn init_hmac(&mut self, secret: &[u8]) {
        self.key_buffer = [0u8; BLOCK_LENGTH];
        if secret.len() > BLOCK_LENGTH {
            self.init();
            self.write_bytes(secret);
            let hashed_key = *self.result();
            self.key_buffer[..HASH_LENGTH].copy_from_slice(&hashed_key);
        } else {
            self.key_buffer[..secret.len()].copy_from_slice(secret);
        }

        self.init();
        self.write_key_pad(HMAC_IPAD);
    }

    /// Finish an HMAC-SHA1 computation started with [`Sha1::init_hmac`]
    pub fn result_hmac(&mut self) -> &Digest {
        let inner = *self.result();
        self.inner_hash = inner;

        self.init();
        self.write_key_pad(HMAC_OPAD);
        for i in 0..HASH_LENGTH {
            self.write(self.inner_hash[i]);
        }
        self.result()
    }

    /// Total number of message bytes written since the last `init()`
    pub fn byte_count(&self) -> u32 {
        self.byte_count
    }

    /// Whether `result()` has been called since the last `init()`
    #[cfg(debug_assertions)]
    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    #[inline(always)]
    fn debug_assert_accumulating(&self) {
        #[cfg(debug_assertions)]
        debug_assert!(
            self.phase == Phase::Accumulating,
            "Sha1 used after finalization without init()"
        );
    }

    fn write_key_pad(&mut self, pad: u8) {
        for i in 0..BLOCK_LENGTH {
            self.write(self.key_buffer[i] ^ pad);
        }
    }

    /// Append a byte without counting it towards the message length
    #[inline(always)]
    fn add_uncounted(&mut self, data: u8) {
        self.buffer[self.buffer_offset] = data;
        self.buffer_offset += 1;
        if self.buffer_offset == BLOCK_LENGTH {
            self.hash_block();
            self.buffer_offset = 0;
        }
    }

    /// Append `0x80`, zeros up to the trailer, then the 64-bit big-endian bit length
    fn pad(&mut self) {
        self.add_uncounted(0x80);
        while self.buffer_offset != LENGTH_OFFSET {
            self.add_uncounted(0x00);
        }

        let bit_length = u64::from(self.byte_count) << 3;
        for byte in bit_length.to_be_bytes() {
            self.add_uncounted(byte);
        }
    }

    /// SHA-1 compression of the full block buffer into the state
    fn hash_block(&mut self) {
        // The 80-word schedule is computed in place over a 16-word window:
        // w[i] lives at w[i & 15] and overwrites w[i - 16].
        let mut w = load_be_words(&self.buffer);
        let [mut a, mut b, mut c, mut d, mut e] = self.state;

        for i in 0..80 {
            if i >= 16 {
                let t = w[(i + 13) & 15] ^ w[(i + 8) & 15] ^ w[(i + 2) & 15] ^ w[i & 15];
                w[i & 15] = rol32(t, 1);
            }

            let stage = i / 20;
            let f = match stage {
                0 => (b & c) | (!b & d),
                2 => (b & c) | (b & d) | (c & d),
                _ => b ^ c ^ d,
            };

            let temp = rol32(a, 5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(ROUND_CONSTANTS[stage])
                .wrapping_add(w[i & 15]);
            e = d;
            d = c;
            c = rol32(b, 30);
            b = a;
            a = temp;
        }

        for (word, value) in self.state.iter_mut().zip([a, b, c, d, e]) {
            *word = word.wrapping_add(value);
        }
    }
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sha1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha1")
            .field("byte_count", &self.byte_count)
            .field("buffer_offset", &self.buffer_offset)
            .finish_non_exhaustive()
    }
}

/// Text sink, so decimal nonces can be fed with `write!` without allocating
impl fmt::Write for Sha1 {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::io::Write for Sha1 {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(self.write_bytes(buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// 32-bit circular left shift
///
/// `bits` of 0 returns `number` unchanged; `rotate_left` has no shift-width edge case.
#[inline(always)]
pub fn rol32(number: u32, bits: u8) -> u32 {
    number.rotate_left(u32::from(bits))
}

/// Read a block as sixteen big-endian words
#[inline(always)]
pub fn load_be_words(block: &[u8; BLOCK_LENGTH]) -> [u32; 16] {
    let mut words = [0u32; 16];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

/// Serialize state words into a big-endian digest
#[inline(always)]
pub fn store_be_words(state: &[u32; STATE_WORDS], out: &mut Digest) {
    for (chunk, word) in out.chunks_exact_mut(4).zip(state) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
}

/// Convenience function for single-shot SHA-1
pub fn sha1(data: &[u8]) -> Digest {
    let mut hasher = Sha1::new();
    hasher.write_bytes(data);
    *hasher.result()
}

/// Convenience function for single-shot HMAC-SHA1
pub fn hmac_sha1(key: &[u8], data: &[u8]) -> Digest {
    let mut hasher = Sha1::new();
    hasher.init_hmac(key);
    hasher.write_bytes(data);
    *hasher.result_hmac()
}
