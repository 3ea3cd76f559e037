//! Bridge between the console loop and the async review session worker.

pub mod commands;
pub mod runtime;
