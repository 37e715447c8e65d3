pub mod cleanup;
pub mod store;
