//! # Matching Engine (Component 3)
//!
//! Runs once per round, after every operation of the round has been applied,
//! and pairs each eligible Open request with the best driver commit.
//!
//! ## Per-Request Decision (ascending `request_id`)
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | `now >= expires_at` | expired, deposit refunded |
//! | commit window still open | deferred |
//! | no commit with `eta <= max_driver_eta` | deferred |
//! | round match cap reached | deferred |
//! | otherwise | matched with min `(eta, submitted_at, driver)` |
//!
//! The pass never fails the round. Per-request failures are logged and the
//! request is deferred.
//!
//! ## Determinism
//!
//! The outcome depends only on table contents and `now`. Submission order of
//! commits inside a round cannot change the winner because ties are broken by
//! `submitted_at` and then by driver address.

pub mod domain;

pub use domain::*;
