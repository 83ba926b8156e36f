pub mod memory;

#[cfg(feature = "postgrest")]
pub mod postgrest;

pub use memory::InMemoryGateway;

#[cfg(feature = "postgrest")]
pub use postgrest::{PostgrestConfig, PostgrestGateway};
