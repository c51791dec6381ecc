//! Connection management. The store has a single writer; reads share it.

pub mod pragmas;
pub mod write_connection;

pub use write_connection::WriteConnection;
