#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error("Unknown job: {0}")]
    UnknownJob(String),

    #[error("Cannot {action} while the node is running")]
    SessionRunning { action: &'static str },

    #[error("Node is not running")]
    NotRunning,

    #[error("Job queue is not waiting to be continued")]
    NotAwaitingContinue,

    #[error("Validation failed: {0}")]
    Validation(String),
}
