pub mod error;
pub mod models;
pub mod refresh;
pub mod retry;
pub mod scheduler;
pub mod settings;
pub mod worker;

#[cfg(test)]
pub mod testing;
