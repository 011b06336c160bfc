//! # Vise Prefs Testkit
//!
//! Testing utilities for the vise preference store.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden encodings**: Known values with the exact text they must encode to
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Stores in throwaway config directories, with raw row access
//! - **Faults**: A backend wrapper that fails on demand
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use vise_prefs_testkit::generators::value;
//!
//! proptest! {
//!     #[test]
//!     fn decode_inverts_encode(v in value()) {
//!         let text = vise_prefs_core::encode(&v).unwrap();
//!         prop_assert_eq!(vise_prefs_core::decode(&text).unwrap(), v);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use vise_prefs_testkit::fixtures::TempStore;
//!
//! let fixture = TempStore::new();
//! let mut prefs = fixture.open("gui-dynamic");
//! prefs.set("zoom", 150).unwrap();
//! assert_eq!(fixture.rows("gui-dynamic"), vec![("zoom".to_string(), "150".to_string())]);
//! ```

pub mod faults;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use faults::{FailingBackend, FaultSwitch};
pub use fixtures::TempStore;
pub use generators::{key, value};
pub use vectors::{all_vectors, verify_all_vectors, GoldenEncoding};
