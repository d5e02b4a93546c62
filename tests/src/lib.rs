//! # Imperium Test Suite
//!
//! Unified integration test crate.
//!
//! ```text
//! tests/src/integration/
//! ├── api.rs        # HTTP facade, end to end over the router
//! ├── engines.rs    # storage engine contract, all three backends
//! └── lifecycle.rs  # gameplay + diplomacy flows over persistent engines
//! ```
//!
//! ```bash
//! cargo test -p imperium-tests
//! cargo test -p imperium-tests integration::api::
//! ```

pub mod integration;
