pub mod driver;
pub mod recorder;
pub mod sink;

use std::sync::Arc;

use drill_schema::{Channel, Drill, Millis};
use drill_scheduler::ScheduleIssue;
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use session_data::{HitTally, SessionRecord};
use tracing::info;

use crate::analytics::{analyze_session, SessionAnalytics};
use crate::config::{AnalyticsConfig, TrainerConfig};
use crate::gameplay::{TapMatcher, TapOutcome, TickReport};
use crate::input::events::TapEvent;
use crate::time::Clock;

use self::recorder::{LiveFeedback, ResolvedTap, SessionRecorder};
use self::sink::{FeedbackSink, NullSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Running,
    /// Every instant was resolved or missed.
    Finished,
    /// The configured time limit elapsed first.
    TimedOut,
    /// Stopped from outside.
    Stopped,
}

/// One training run: a matcher fed by ticks and taps, a recorder holding the
/// log, and a sink receiving feedback. Nothing is shared across sessions.
pub struct Session {
    drill_id: String,
    bpm: f64,
    start_ms: Millis,
    time_limit_ms: Option<Millis>,
    matcher: TapMatcher,
    recorder: SessionRecorder,
    analytics: AnalyticsConfig,
    issues: Vec<ScheduleIssue>,
    sink: Box<dyn FeedbackSink>,
    status: SessionStatus,
}

impl Session {
    pub fn start(drill: &Drill, start_ms: Millis, config: &TrainerConfig) -> Self {
        let schedule = drill_scheduler::schedule(drill, start_ms);
        let windows = config.matcher.windows_for(drill);
        let lookahead = config.matcher.lookahead_for(schedule.grid_cell_ms());

        info!(
            drill = %drill.id,
            notes = schedule.len(),
            issues = schedule.issues.len(),
            lookahead_ms = lookahead,
            meh_ms = windows.meh_ms,
            "session started"
        );

        Self {
            drill_id: drill.id.clone(),
            bpm: drill.bpm,
            start_ms,
            time_limit_ms: config.session.time_limit_ms,
            matcher: TapMatcher::new(schedule.instants, windows, lookahead),
            recorder: SessionRecorder::new(config.recorder.recent_capacity),
            analytics: config.analytics.clone(),
            issues: schedule.issues,
            sink: Box::new(NullSink),
            status: SessionStatus::Running,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn FeedbackSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Running
    }

    pub fn drill_id(&self) -> &str {
        &self.drill_id
    }

    pub fn start_ms(&self) -> Millis {
        self.start_ms
    }

    pub fn schedule_issues(&self) -> &[ScheduleIssue] {
        &self.issues
    }

    pub fn matcher(&self) -> &TapMatcher {
        &self.matcher
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn live(&self) -> LiveFeedback {
        self.recorder.live()
    }

    /// Advances the session to `now`: releases and evicts notes, reports
    /// misses, and hands the renderer the current approach cues.
    pub fn tick(&mut self, now: Millis) -> TickReport {
        if !self.is_active() {
            return TickReport::default();
        }
        if self.past_time_limit(now) {
            self.end(SessionStatus::TimedOut);
            return TickReport::default();
        }

        let report = self.matcher.advance(now);
        for _ in &report.missed {
            self.recorder.record_miss();
            self.sink.on_miss();
        }
        let cues = self.matcher.approach_cues(now);
        self.sink.on_tick(now, &cues);

        if self.matcher.is_finished() {
            self.end(SessionStatus::Finished);
        }
        report
    }

    pub fn tap(&mut self, event: TapEvent) -> TapOutcome {
        if !self.is_active() {
            return TapOutcome::Ignored;
        }
        if self.past_time_limit(event.timestamp_ms) {
            self.end(SessionStatus::TimedOut);
            return TapOutcome::Ignored;
        }

        let outcome = self.matcher.process_tap(event);
        match &outcome {
            TapOutcome::Hit(judgment) => {
                self.recorder.record_hit(judgment);
                self.sink
                    .on_hit(judgment.grade, judgment.offset_ms, judgment.channel);
            }
            TapOutcome::ChannelMismatch { .. } => {
                self.recorder.record_miss();
                self.sink.on_miss();
            }
            TapOutcome::Ignored | TapOutcome::OutOfWindow { .. } => {}
        }
        outcome
    }

    /// Stamps a tap with `clock` at receipt.
    pub fn press(&mut self, channel: Channel, clock: &dyn Clock) -> TapOutcome {
        self.tap(TapEvent::new(clock.now_ms(), channel))
    }

    /// Freezes the session. Safe at any point; the log so far stays valid.
    pub fn stop(&mut self) {
        if self.is_active() {
            self.end(SessionStatus::Stopped);
        }
    }

    pub fn finish(mut self, user_id: impl Into<String>) -> SessionOutcome {
        self.stop();

        let tally = self.recorder.tally();
        let record = SessionRecord::new(
            user_id,
            self.drill_id,
            self.bpm,
            tally,
            self.recorder.mean_offset_ms(),
            self.recorder.unstable_rate(),
        );
        let log = self.recorder.into_log();
        let analytics = analyze_session(&log, &self.analytics);

        SessionOutcome {
            status: self.status,
            tally,
            record,
            analytics,
            log,
        }
    }

    fn past_time_limit(&self, now: Millis) -> bool {
        self.time_limit_ms
            .is_some_and(|limit| now - self.start_ms >= limit)
    }

    fn end(&mut self, status: SessionStatus) {
        self.status = status;
        let tally = self.recorder.tally();
        info!(
            drill = %self.drill_id,
            ?status,
            hits = tally.hits(),
            misses = tally.miss,
            unstable_rate = self.recorder.unstable_rate(),
            "session ended"
        );
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub status: SessionStatus,
    pub tally: HitTally,
    pub record: SessionRecord,
    /// `None` when no tap was resolved.
    pub analytics: Option<SessionAnalytics>,
    pub log: Vec<ResolvedTap>,
}

/// A session behind a mutex so input handling and ticks never interleave
/// mid-mutation.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock()
    }

    pub fn tap(&self, event: TapEvent) -> TapOutcome {
        self.inner.lock().tap(event)
    }

    pub fn tick(&self, now: Millis) -> TickReport {
        self.inner.lock().tick(now)
    }

    pub fn stop(&self) {
        self.inner.lock().stop();
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.lock().status()
    }

    /// Gets the session back once every other handle is gone.
    pub fn into_inner(self) -> Result<Session, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex.into_inner()),
            Err(inner) => Err(Self { inner }),
        }
    }
}
