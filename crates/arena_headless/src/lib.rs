//! Headless arena match runner.
//!
//! Runs scripted-vs-scripted matches without rendering, for balance
//! testing and CI determinism checks. The binary front-end lives in
//! `main.rs`; this library holds the runner so tests can drive it
//! directly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod runner;
