//! DUCO-S1 Miner Library
//!
//! Host-side companion of the board firmware: parses DUCO-S1 jobs, solves them
//! with the same streaming SHA-1 engine the boards run, and speaks the boards'
//! line protocol.
//!
//! # Overview
//!
//! A DUCO-S1 job is solved by finding the nonce for which
//! `SHA1(last_hash || decimal(nonce))` equals the expected hash. The nonce range
//! is `0..=difficulty * 100`.
//!
//! # Example
//!
//! ```rust
//! use duco::job::Job;
//!
//! let job = Job::parse(
//!     "ba29a15896fd2d792d5c4b60668bf2b9feebc51d,0b819a4ef1a1bb9f4bd83bd127eeadd562259ece,6,",
//! )
//! .unwrap();
//!
//! let result = job.solve("DUCOID0000000000000000");
//! assert_eq!(result.nonce, Some(577));
//! ```

// Re-export the core algorithm
pub use duco_sha1 as algorithm;

pub mod config;
pub mod job;
pub mod worker;

// Convenience re-exports
pub use algorithm::{hmac_sha1, sha1, Digest, Sha1};
