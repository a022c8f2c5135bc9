//! Outbound data-source clients. Everything here is fallible, timeout-bound
//! I/O; failures degrade to typed "missing" values, never into the engine.

pub mod news;
pub mod quotes;
pub mod storage;
