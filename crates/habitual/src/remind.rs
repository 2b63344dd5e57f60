//! Reminder worker
//!
//! A tokio task polls the tracker on an interval and forwards due reminders
//! over a channel; the foreground loop delivers them until interrupted.

use anyhow::{Context, Result};
use habitual_config::ReminderSettings;
use habitual_core::{CoreEvent, Tracker};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

const EVENT_BUFFER: usize = 32;

/// Start polling for due reminders.
///
/// The task stops once the receiving side of `events` is dropped.
pub fn spawn_worker(
    tracker: Arc<Tracker>,
    poll_interval: Duration,
    events: mpsc::Sender<CoreEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(poll_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            timer.tick().await;

            let now = habitual_util::now();
            let tracker = tracker.clone();
            let due = tokio::task::spawn_blocking(move || tracker.tick_reminders(now)).await;

            match due {
                Ok(Ok(due)) => {
                    for event in due {
                        if events.send(event).await.is_err() {
                            info!("Reminder receiver closed, stopping worker");
                            return;
                        }
                    }
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "Reminder check failed");
                }
                Err(e) => {
                    error!(error = %e, "Reminder check panicked");
                    return;
                }
            }
        }
    })
}

/// Print a reminder and log it
pub fn deliver(event: &CoreEvent) {
    match event {
        CoreEvent::ReminderDue {
            habit_id,
            interval,
            message,
            at,
            ..
        } => {
            println!("[{}] {}", at.format("%H:%M:%S"), message);
            info!(habit_id = %habit_id, interval = %interval, "Reminder delivered");
        }
    }
}

/// Run one reminder check and deliver whatever is due
pub fn run_once(tracker: &Tracker) -> Result<usize> {
    let events = tracker
        .tick_reminders(habitual_util::now())
        .context("Failed to check reminders")?;

    for event in &events {
        deliver(event);
    }
    Ok(events.len())
}

/// Deliver reminders until SIGINT or SIGTERM
pub async fn run(tracker: Arc<Tracker>, settings: &ReminderSettings) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
    let worker = spawn_worker(tracker, settings.poll_interval, tx);

    let mut sigterm = signal(SignalKind::terminate())
        .context("Failed to create SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt())
        .context("Failed to create SIGINT handler")?;

    info!(
        poll_interval_secs = settings.poll_interval.as_secs(),
        "Reminder worker running"
    );

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, stopping reminders");
                break;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, stopping reminders");
                break;
            }
            event = rx.recv() => match event {
                Some(event) => deliver(&event),
                None => {
                    warn!("Reminder worker exited");
                    break;
                }
            },
        }
    }

    worker.abort();
    info!("Reminders stopped");
    Ok(())
}
