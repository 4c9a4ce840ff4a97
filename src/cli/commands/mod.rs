//! CLI command implementations
//!
//! This module contains all CLI command implementations. Each command
//! returns its process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Run completed with errors |
//! | 2 | Configuration error |
//! | 4 | Animal service unreachable |
//! | 5 | Fatal pipeline error |
//! | 130 | Interrupted |

pub mod health;
pub mod init;
pub mod run;
pub mod validate;
