pub mod shutdown;
pub mod time;

pub use self::shutdown::shutdown_signal;
pub use self::time::unix_timestamp;
