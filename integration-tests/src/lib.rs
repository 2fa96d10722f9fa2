//! Vote-Card Integration Tests
//!
//! End-to-end tests that run the client and the screen controllers against
//! the in-memory ledger, for both account layouts.
//!
//! # Areas Tested
//!
//! 1. **Vote lifecycle** — creation limits, address collisions, duplicate
//!    votes, vote counting, author-only removal and rent reclamation
//! 2. **Screen flows** — mounting, wallet connect and disconnect, refresh
//!    after each action, alerts and toasts

pub mod harness;


#[cfg(test)]
mod screen_flow_tests;
