//! External interfaces: the CSV export table and the persisted defaults
//! record. Everything here is blocking I/O with scoped file handles; the
//! handle is released on every exit path, including write errors.

pub mod config;
pub mod export;
