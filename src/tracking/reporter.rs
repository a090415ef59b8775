//! Best-effort progress reporting
//!
//! Translates playback and quiz events into calls against the progress
//! endpoint. Reporting must never block the learning flow: every failure is
//! swallowed after logging, with one exception — an invalid/expired-token
//! answer clears the session credentials so the caller can route the user
//! back to the entry screen. This is the only place a backend response may
//! force a logout.

use crate::api::client::ApiClient;
use crate::api::error::ClientError;
use crate::api::models::{ProgressAck, ProgressUpdate};
use crate::course::model::SubmitOutcome;
use crate::session::SessionStore;

use super::watch::WatchTracker;

/// What a reporter call means for the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    /// The backend acknowledged the row
    Sent,
    /// The report was dropped; already logged, nothing for the user to see
    Dropped,
    /// The token is dead; credentials were cleared, route back to entry
    SessionExpired,
}

/// Fire-and-forget client for the progress endpoint
pub struct ProgressReporter;

impl ProgressReporter {
    /// Handle a player time-update, reporting when the throttle allows
    pub async fn on_time_update(
        client: &ApiClient,
        session: &mut SessionStore,
        tracker: &mut WatchTracker,
        current_time: f64,
        duration: f64,
    ) -> Option<ReportStatus> {
        let percent = tracker.on_time_update(current_time, duration)?;
        let update = ProgressUpdate::watch(tracker.lesson_id(), percent);
        Some(Self::push(client, session, update).await)
    }

    /// Handle the playback-ended event: one unconditional report at 100
    pub async fn on_playback_ended(
        client: &ApiClient,
        session: &mut SessionStore,
        tracker: &mut WatchTracker,
    ) -> ReportStatus {
        let percent = tracker.on_ended();
        let update = ProgressUpdate::watch(tracker.lesson_id(), percent);
        Self::push(client, session, update).await
    }

    /// Report cumulative quiz totals for one submitted paragraph
    pub async fn on_practice_submitted(
        client: &ApiClient,
        session: &mut SessionStore,
        course_id: i64,
        outcome: SubmitOutcome,
    ) -> ReportStatus {
        let update = ProgressUpdate::quiz(course_id, outcome.total, outcome.correct);
        Self::push(client, session, update).await
    }

    /// Send one progress row and settle the outcome
    async fn push(
        client: &ApiClient,
        session: &mut SessionStore,
        update: ProgressUpdate,
    ) -> ReportStatus {
        let token = session.token().map(str::to_owned);
        let result = client.push_progress(token.as_deref(), &update).await;
        Self::settle(session, result)
    }

    /// Fold a push result into a caller-facing status
    fn settle(
        session: &mut SessionStore,
        result: Result<ProgressAck, ClientError>,
    ) -> ReportStatus {
        match result {
            Ok(ack) if ack.success => ReportStatus::Sent,
            Ok(ack) => {
                tracing::warn!(
                    message = ack.message.as_deref().unwrap_or("no detail"),
                    "Backend refused progress update"
                );
                ReportStatus::Dropped
            }
            Err(err) if err.requires_reauth() => {
                tracing::info!(error = %err, "Progress update rejected; session expired");
                session.logout();
                ReportStatus::SessionExpired
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to update course progress");
                ReportStatus::Dropped
            }
        }
    }
}
