use tokio_cron_scheduler::JobSchedulerError;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("scheduler: {0}")]
    Scheduler(#[from] JobSchedulerError),
}

pub type Result<T> = std::result::Result<T, NotifyError>;
