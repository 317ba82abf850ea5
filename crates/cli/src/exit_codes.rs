//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range | Domain    | Description                              |
//! |-------|-----------|------------------------------------------|
//! | 0     | Universal | Success                                  |
//! | 1     | Universal | General error (unspecified)              |
//! | 2     | Universal | CLI usage error (bad args, missing file) |
//! | 3-9   | generate  | Report generation codes                  |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unparseable report dates.
pub const EXIT_USAGE: u8 = 2;

/// Configuration file missing, unparseable, or invalid.
pub const EXIT_CONFIG: u8 = 3;

/// Source database cannot be opened.
pub const EXIT_SOURCE: u8 = 4;

/// Some worksheets failed; the workbook was still written with the rest.
pub const EXIT_PARTIAL: u8 = 5;

/// Workbook could not be written.
pub const EXIT_SINK: u8 = 6;
