pub mod constants;
pub mod engine;
pub mod maze;
pub mod protocol;
pub mod rng;
pub mod server;
pub mod types;
