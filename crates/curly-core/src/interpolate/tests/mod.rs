//! Tests for the interpolation compiler
//!
//! Organized by concern: scanning, rendering, escaping, trusted contexts,
//! all-or-nothing mode, memoization and error reporting.

use super::*;

// Test helper functions
mod helpers;


mod render_escaping;

// Mode tests
mod all_or_nothing;

// Memoization tests
mod memo;
