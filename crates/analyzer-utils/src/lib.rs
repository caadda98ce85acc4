//! Shared utilities for the stock data analyzer
//!
//! Logging setup and process environment loading used by the binaries.

pub mod env;
pub mod logging;

pub use env::load_dotenv;
pub use logging::{init_tracing, init_tracing_with_default};
