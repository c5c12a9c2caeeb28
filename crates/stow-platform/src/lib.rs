pub use caps::PlatformCaps;
pub use command::Command;
pub use dir::{DATA_DIR_ENV, default_data_dir, user_data, user_home};
pub use error::{Error, Result};

mod caps;
pub mod command;
pub mod dir;
mod error;
