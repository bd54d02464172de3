pub mod filter;
pub mod limit;
