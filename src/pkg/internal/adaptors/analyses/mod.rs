pub mod spec;
pub mod store;
