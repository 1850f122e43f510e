mod constants;
pub use constants::{SIGNALED_EXIT_STATUS, WORKER_MARKER_KEY, WORKER_MARKER_VALUE};

mod error;
pub use error::ModelError;

mod kv;
pub use kv::KeyValue;

mod env;
pub use env::Env;

mod mount;
pub use mount::{Mount, MountMode, Volumes};

mod launch;
pub use launch::{LaunchSpec, Labels};

mod outcome;
pub use outcome::Outcome;
