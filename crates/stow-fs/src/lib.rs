//! Filesystem primitives for replacing a directory tree atomically.
//!
//! # Architecture
//!
//! - `effects.rs` - Injectable filesystem operations
//! - `staging.rs` - Sibling temp directory removed unless committed
//! - `swap.rs` - Backup, rename-in, restore-on-failure
//! - `remove.rs` - Recursive delete guarded by an absolute-path check
//! - `path.rs` - Lexical path cleaning

mod effects;
mod error;
mod path;
mod remove;
mod staging;
mod swap;

pub use effects::{FileSystem, OsFileSystem};
pub use error::{Error, Result};
pub use path::clean;
pub use remove::remove_tree;
pub use staging::Staging;
pub use swap::{SwapOutcome, backup_path, swap_in};
