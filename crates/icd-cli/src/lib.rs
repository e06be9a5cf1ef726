//! Library surface of the icdcheck CLI: logging setup shared with tests.

pub mod logging;
