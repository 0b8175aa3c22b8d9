pub mod aggregate;
pub mod categories;
pub mod classifier;
pub mod export;
pub mod prelude;
pub mod rate_gate;
pub mod runner;
pub mod table;
#[allow(unused_imports)]
pub(crate) use anyhow::{anyhow, bail, Result};
pub use prelude::*;
#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn, Level};
