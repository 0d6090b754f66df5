pub mod core;
pub mod favorites;
pub mod properties;
pub mod recommendations;
pub mod types;
pub mod users;

pub use types::Database;

#[cfg(test)]
pub mod test_helpers;
