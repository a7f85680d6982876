//! Domain building blocks shared by the database and API crates.
//!
//! Nothing in here touches the database or HTTP: validation, the runtime
//! codec, listing filters and pagination metadata are all pure values.

pub mod error;
pub mod filters;
pub mod runtime;
pub mod types;
pub mod validator;
