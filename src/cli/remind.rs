use cardapio::App;
use cardapio_mealplan::{current_and_next_weeks, now};
use cardapio_notification::{LocalScheduler, Notifier, reminder::sync_reminders};
use cardapio_shared::DateRange;

/// Schedules reminders for the planned meals of the coming weeks.
///
/// With `once` the pending reminders are listed and the command exits,
/// otherwise it stays in the foreground printing each reminder as it fires
/// until interrupted.
#[tracing::instrument(skip(app))]
pub async fn remind(app: App, weeks: usize, once: bool) -> anyhow::Result<()> {
    let session = app.session().await?;
    let query = app.query(app.api(&session)?);

    let weeks = current_and_next_weeks(query.today(), weeks.max(1), query.week_start());
    let (Some(first), Some(last)) = (weeks.first(), weeks.last()) else {
        return Ok(());
    };
    let entries = query
        .entries(&session.user_id, DateRange::new(first.start, last.end))
        .await;

    let (scheduler, mut receiver) = LocalScheduler::start().await?;
    let now = now(&app.config.calendar.timezone);
    sync_reminders(&scheduler, &entries, &app.config.reminders(), now).await?;

    if once {
        for notification in scheduler.pending().await {
            println!("{} {}", notification.trigger_at, notification.title);
        }

        scheduler.shutdown().await?;
        return Ok(());
    }

    loop {
        if scheduler.pending().await.is_empty() {
            while let Ok(notification) = receiver.try_recv() {
                println!("{}\n{}", notification.title, notification.message);
            }

            tracing::info!("no reminders left");
            break;
        }

        tokio::select! {
            fired = receiver.recv() => match fired {
                Some(notification) => {
                    println!("{}\n{}", notification.title, notification.message);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    scheduler.shutdown().await?;

    Ok(())
}
