//! Database layer — schema and connection helpers.

pub mod schema;

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::error::Result;

/// Open an existing CPG database read-only.
///
/// Production deployments serve a database built elsewhere; opening it
/// read-only means a misbehaving query can never corrupt it.
pub fn open_readonly(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}
