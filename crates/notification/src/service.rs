use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::{Mutex, mpsc};
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use crate::Result;

/// A local notification waiting for its trigger time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub trigger_at: OffsetDateTime,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Schedules `notification`, replacing any pending one with the same id.
    async fn schedule(&self, notification: Notification) -> Result<()>;

    /// Returns whether a pending notification was cancelled.
    async fn cancel(&self, id: &str) -> Result<bool>;

    async fn cancel_all(&self) -> Result<usize>;

    /// Pending notifications ordered by trigger time.
    async fn pending(&self) -> Vec<Notification>;
}

type Jobs = Arc<Mutex<HashMap<String, (Uuid, Notification)>>>;

/// In-process notifier backed by one-shot scheduler jobs.
///
/// Fired notifications are delivered on the channel returned by
/// [`LocalScheduler::start`].
#[derive(Clone)]
pub struct LocalScheduler {
    sched: JobScheduler,
    jobs: Jobs,
    sender: mpsc::UnboundedSender<Notification>,
}

impl LocalScheduler {
    pub async fn start() -> Result<(Self, mpsc::UnboundedReceiver<Notification>)> {
        let sched = JobScheduler::new().await?;
        sched.start().await?;

        let (sender, receiver) = mpsc::unbounded_channel();

        Ok((
            Self {
                sched,
                jobs: Arc::default(),
                sender,
            },
            receiver,
        ))
    }

    pub async fn shutdown(mut self) -> Result<()> {
        self.sched.shutdown().await?;

        Ok(())
    }

    fn job(&self, notification: &Notification) -> Result<Job> {
        let delay = notification.trigger_at - OffsetDateTime::now_utc();
        let delay = std::time::Duration::try_from(delay).unwrap_or_default();

        let jobs = self.jobs.clone();
        let sender = self.sender.clone();
        let notification = notification.clone();

        let job = Job::new_one_shot_async(delay, move |uuid, _| {
            let jobs = jobs.clone();
            let sender = sender.clone();
            let notification = notification.clone();

            Box::pin(async move {
                {
                    let mut jobs = jobs.lock().await;
                    match jobs.get(&notification.id) {
                        Some((current, _)) if *current == uuid => {
                            jobs.remove(&notification.id);
                        }
                        _ => return,
                    }
                }

                tracing::debug!(id = %notification.id, "notification fired");

                if sender.send(notification).is_err() {
                    tracing::warn!("notification receiver dropped");
                }
            })
        })?;

        Ok(job)
    }
}

#[async_trait::async_trait]
impl Notifier for LocalScheduler {
    async fn schedule(&self, notification: Notification) -> Result<()> {
        let job = self.job(&notification)?;
        let uuid = job.guid();

        let previous = {
            let mut jobs = self.jobs.lock().await;
            jobs.insert(notification.id.to_owned(), (uuid, notification.clone()))
        };

        if let Some((previous, _)) = previous {
            self.sched.remove(&previous).await?;
        }

        self.sched.add(job).await?;

        tracing::debug!(
            id = %notification.id,
            trigger_at = %notification.trigger_at,
            "notification scheduled"
        );

        Ok(())
    }

    async fn cancel(&self, id: &str) -> Result<bool> {
        let removed = self.jobs.lock().await.remove(id);
        let Some((uuid, _)) = removed else {
            return Ok(false);
        };

        self.sched.remove(&uuid).await?;

        Ok(true)
    }

    async fn cancel_all(&self) -> Result<usize> {
        let removed = self.jobs.lock().await.drain().collect::<Vec<_>>();

        for (_, (uuid, _)) in removed.iter() {
            self.sched.remove(uuid).await?;
        }

        Ok(removed.len())
    }

    async fn pending(&self) -> Vec<Notification> {
        let mut pending = self
            .jobs
            .lock()
            .await
            .values()
            .map(|(_, notification)| notification.clone())
            .collect::<Vec<_>>();

        pending.sort_by_key(|notification| notification.trigger_at);

        pending
    }
}
