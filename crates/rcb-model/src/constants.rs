/// Environment variable the worker inspects to recognize it runs as a backup subprocess.
pub const WORKER_MARKER_KEY: &str = "BACKUP_PROCESS_CONTAINER";

/// Value of [`WORKER_MARKER_KEY`] injected into every worker.
pub const WORKER_MARKER_VALUE: &str = "true";

/// Process exit status reported when the worker was stopped because of a shutdown request.
///
/// Conventional "terminated by SIGTERM" status: `128 + 15`.
pub const SIGNALED_EXIT_STATUS: i32 = 128 + 15;
