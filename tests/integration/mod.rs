//! Integration tests for launch_plan
//!
//! Library scenarios run in-process; binary scenarios run the built
//! `launch_plan` executable with a controlled environment.
//!
//! Run with: cargo test --test integration

mod helpers;

mod binary;
mod planning;
