pub mod network;
pub mod persistence;
