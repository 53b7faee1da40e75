pub mod home_dir;
pub mod locking;
pub mod retention;

pub use home_dir::HomeDir;
pub use locking::{LockHandle, RunGuard};
pub use retention::purge_old_logs;
