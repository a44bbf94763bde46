pub mod apply;
pub mod client;
pub mod engine;
pub mod protocol;
