pub mod memory;
pub mod rest;

#[cfg(feature = "mongodb")]
pub mod mongo;
