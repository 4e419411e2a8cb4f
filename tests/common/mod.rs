//! Common test utilities for shiftgrid.
//!
//! This module provides shared utilities for the integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

pub mod assertions;
pub mod test_data;
