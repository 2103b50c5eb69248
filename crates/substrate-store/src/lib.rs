//! Atomic persistence and directory locking for the substrate data
//! directory, mirroring `cortex-storage`'s role for the `cortex` workspace
//! but against plain JSON/blob files rather than SQLite.

pub mod atomic;
pub mod data_dir;
pub mod lock;

pub use atomic::{read_blob, read_json, write_blob, write_json};
pub use data_dir::DataDirLayout;
pub use lock::DirectoryLock;
