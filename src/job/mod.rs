//! DUCO-S1 job wire format
//!
//! Boards receive `last_hash,expected_hash,difficulty` lines (a trailing
//! separator is common) and answer with `nonce,elapsed_us,ducoid`.

use std::fmt;
use std::time::Instant;

use duco_sha1::{ducos1, Digest, HASH_LENGTH};
use thiserror::Error;

/// Field separator used by the pool and the boards
pub const DEFAULT_SEPARATOR: char = ',';

/// Reply sent instead of a result when a job line cannot be parsed
pub const CORRUPTED_MARKER: &str = "#";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum JobError {
    #[error("Job is missing the {0} field")]
    MissingField(&'static str),

    #[error("Invalid expected hash '{0}': {1}")]
    InvalidHash(String, String),

    #[error("Invalid difficulty '{0}'")]
    InvalidDifficulty(String),
}

/// A DUCO-S1 job as handed to a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Previous block hash, hashed as ASCII text
    pub last_hash: String,
    /// Digest the winning nonce must produce
    pub expected_hash: Digest,
    /// Nonce range is `0..=difficulty * 100`
    pub difficulty: u32,
}

impl Job {
    /// Build a job from its parts; `expected_hash` is 40 hex characters
    pub fn new(
        last_hash: impl Into<String>,
        expected_hash: &str,
        difficulty: u32,
    ) -> Result<Self, JobError> {
        Ok(Self {
            last_hash: last_hash.into(),
            expected_hash: decode_digest(expected_hash)?,
            difficulty,
        })
    }

    /// Parse a job line using the default separator
    pub fn parse(line: &str) -> Result<Self, JobError> {
        Self::parse_with(line, DEFAULT_SEPARATOR)
    }

    /// Parse a job line using `separator` between fields
    ///
    /// Trailing newlines and a trailing separator are tolerated; fields after
    /// the difficulty are ignored.
    pub fn parse_with(line: &str, separator: char) -> Result<Self, JobError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut fields = line.split(separator).map(str::trim);

        let mut next_field = |name: &'static str| {
            fields
                .next()
                .filter(|field| !field.is_empty())
                .ok_or(JobError::MissingField(name))
        };

        let last_hash = next_field("last_hash")?;
        let expected_hash = next_field("expected_hash")?;
        let difficulty = next_field("difficulty")?;

        let difficulty = difficulty
            .parse::<u32>()
            .map_err(|_| JobError::InvalidDifficulty(difficulty.to_string()))?;

        Self::new(last_hash, expected_hash, difficulty)
    }

    /// Largest nonce the job allows (inclusive)
    pub fn max_nonce(&self) -> u32 {
        ducos1::max_nonce(self.difficulty)
    }

    /// Serialize back to the wire format, with a trailing separator
    pub fn to_line(&self, separator: char) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}",
            self.last_hash,
            hex::encode(self.expected_hash),
            self.difficulty,
            sep = separator
        )
    }

    /// Search the nonce range on the current thread
    pub fn solve(&self, ducoid: &str) -> JobResult {
        let start = Instant::now();
        let nonce = ducos1::search(
            self.last_hash.as_bytes(),
            &self.expected_hash,
            self.difficulty,
        );
        JobResult::new(nonce, start.elapsed().as_micros() as u64, ducoid)
    }

    /// Search the nonce range across the current rayon pool
    ///
    /// Each worker gets a contiguous slice of the range and its own copy of the
    /// `last_hash` midstate. The lowest matching nonce wins.
    #[cfg(feature = "parallel")]
    pub fn solve_parallel(&self, ducoid: &str) -> JobResult {
        use rayon::prelude::*;

        let start = Instant::now();
        let prefix = ducos1::prefix_state(self.last_hash.as_bytes());
        let max = self.max_nonce();
        let slices = rayon::current_num_threads().max(1) as u32;
        let slice_len = max / slices + 1;

        let nonce = (0..slices)
            .into_par_iter()
            .filter_map(|slice| {
                let lo = slice.checked_mul(slice_len).filter(|lo| *lo <= max)?;
                let hi = lo.saturating_add(slice_len - 1).min(max);
                ducos1::search_range(&prefix, &self.expected_hash, lo..=hi)
            })
            .min();

        JobResult::new(nonce, start.elapsed().as_micros() as u64, ducoid)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (difficulty {}, expected {})",
            self.last_hash,
            self.difficulty,
            hex::encode(self.expected_hash)
        )
    }
}

/// Outcome of one job, as reported back to the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    /// Winning nonce, `None` when the range was exhausted
    pub nonce: Option<u32>,
    /// Search time in microseconds
    pub elapsed_us: u64,
    /// Board identifier
    pub ducoid: String,
}

impl JobResult {
    pub fn new(nonce: Option<u32>, elapsed_us: u64, ducoid: impl Into<String>) -> Self {
        Self {
            nonce,
            elapsed_us,
            ducoid: ducoid.into(),
        }
    }

    /// Hashes per second implied by the result
    ///
    /// The pool counts the winning nonce as the number of hashes tried.
    pub fn hashrate(&self) -> f64 {
        if self.elapsed_us == 0 {
            return 0.0;
        }
        f64::from(self.nonce.unwrap_or(0)) / (self.elapsed_us as f64 / 1_000_000.0)
    }

    /// Serialize to the wire format; an exhausted job reports nonce 0
    pub fn to_line(&self, separator: char) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.nonce.unwrap_or(0),
            self.elapsed_us,
            self.ducoid,
            sep = separator
        )
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line(DEFAULT_SEPARATOR))
    }
}

fn decode_digest(hex_str: &str) -> Result<Digest, JobError> {
    let mut digest = [0u8; HASH_LENGTH];
    hex::decode_to_slice(hex_str, &mut digest)
        .map_err(|e| JobError::InvalidHash(hex_str.to_string(), e.to_string()))?;
    Ok(digest)
}
