//! # DUCO SHA-1 Core
//!
//! A streaming SHA-1 and HMAC-SHA1 engine sized for 8-bit mining boards, plus
//! the DUCO-S1 proof-of-work search that those boards run.
//!
//! ## Features
//!
//! - **Streaming**: bytes are fed one at a time or in bulk, 64-byte blocks are
//!   compressed as soon as they fill up
//! - **Fixed footprint**: no allocation, all buffers live inside the hasher
//! - **HMAC-SHA1**: RFC 2104 with long keys hashed down to 20 bytes
//! - **Midstates**: a hasher can be cloned after absorbing a common prefix
//!
//! ## Example
//!
//! ```rust
//! use duco_sha1::{Sha1, sha1, hmac_sha1};
//!
//! // Single-shot hashing
//! let digest = sha1(b"abc");
//! assert_eq!(digest[0], 0xa9);
//!
//! // Streaming, reusing one hasher
//! let mut hasher = Sha1::new();
//! hasher.write_bytes(b"ab");
//! hasher.write(b'c');
//! assert_eq!(*hasher.result(), digest);
//!
//! hasher.init();
//! let empty = *hasher.result();
//! assert_eq!(empty, sha1(b""));
//!
//! // HMAC
//! let mac = hmac_sha1(b"key", b"The quick brown fox jumps over the lazy dog");
//! assert_eq!(mac[0], 0xde);
//! ```
//!
//! ## DUCO-S1
//!
//! ```rust
//! use duco_sha1::ducos1;
//!
//! let last_hash = b"ba29a15896fd2d792d5c4b60668bf2b9feebc51d";
//! let expected = ducos1::job_digest(last_hash, 577);
//! assert_eq!(ducos1::search(last_hash, &expected, 6), Some(577));
//! ```
//!
//! ## no_std Support
//!
//! ```toml
//! [dependencies]
//! duco-sha1-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod ducos1;
mod hasher;
mod params;

pub use params::*;
pub use hasher::{Sha1, hmac_sha1, load_be_words, rol32, sha1, store_be_words};
