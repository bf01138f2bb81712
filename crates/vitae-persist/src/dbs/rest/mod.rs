mod client;

pub use client::RestPersistenceClient;
