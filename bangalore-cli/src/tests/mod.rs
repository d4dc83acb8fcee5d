//! Shared test harness modules for the Bangalore map CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod commands_steps;
mod helpers;
