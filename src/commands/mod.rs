pub mod dump;
pub mod version;
