pub mod command;
pub mod compress;
pub mod dump;
pub mod error;
pub mod executor;
