//! Utility modules for logging and record IO

pub mod io;
pub mod logging;
