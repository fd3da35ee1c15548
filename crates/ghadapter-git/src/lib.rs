pub mod branches;
pub mod error;
pub mod sync;
pub mod watcher;

pub use branches::{branch_exists, create_branch, head_ref_name};
pub use error::{SyncError, WatchError};
pub use sync::{FileSyncService, FileSyncTarget, SyncHandle, WatchSession};
pub use watcher::{FileChangeEvent, FileWatcher};
