//! Task lifecycle controller.
//!
//! Converts point-in-time `/tasks/{id}/progress` snapshots into a
//! continuous, cancellable subscription so views never manage polling
//! themselves. One spawned loop per [`TrackHandle`]; polls are strictly
//! sequential, never pipelined, so callbacks arrive in dispatch order.
//!
//! The poll source ([`TaskProbe`]) and timer ([`Clock`]) are injected,
//! which lets tests drive the loop without real delays.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use kiln_types::Task;

use crate::api::ApiClient;
use crate::error::ClientError;

/// Source of task snapshots. Implemented by [`ApiClient`] against the
/// real backend and by fakes in tests.
#[async_trait]
pub trait TaskProbe: Send + Sync + 'static {
    async fn probe(&self, task_id: &str) -> Result<Task, ClientError>;
}

#[async_trait]
impl TaskProbe for ApiClient {
    async fn probe(&self, task_id: &str) -> Result<Task, ClientError> {
        let snapshot = self.tasks().progress(task_id).await?;
        Ok(snapshot.task)
    }
}

/// Injectable timer.
#[async_trait]
pub trait Clock: Send + Sync + 'static {
    async fn sleep(&self, duration: Duration);
}

/// Production clock backed by `tokio::time`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polling configuration. Fixed interval, no backoff: the backend has no
/// push channel and the caller controls frequency.
#[derive(Debug, Clone, Copy)]
pub struct TrackConfig {
    pub interval: Duration,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
        }
    }
}

/// Observer callbacks for one tracking subscription.
///
/// `on_update` fires for every delivered snapshot (including the terminal
/// one), `on_terminal` exactly once when an absorbing status is observed,
/// `on_error` for poll failures.
pub struct TrackCallbacks {
    pub on_update: Box<dyn Fn(&Task) + Send + Sync>,
    pub on_terminal: Box<dyn Fn(&Task) + Send + Sync>,
    pub on_error: Box<dyn Fn(&ClientError) + Send + Sync>,
}

/// Lifecycle states of one polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackState {
    Idle,
    Polling,
    Cancelled,
    Terminal,
}

/// Cancellable reference to an active polling subscription.
///
/// `cancel()` only stops this subscription's polling; it does not stop
/// the backend task. Views that want both call
/// [`TasksApi::stop`](crate::api::TasksApi::stop) and `cancel()`
/// explicitly.
#[derive(Debug, Clone)]
pub struct TrackHandle {
    alive: Arc<AtomicBool>,
}

impl TrackHandle {
    /// Mark the subscription dead. Safe to call while a poll is in
    /// flight: liveness is re-checked after every await, so an in-flight
    /// result is discarded rather than delivered late.
    pub fn cancel(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        !self.alive.load(Ordering::SeqCst)
    }
}

/// Start tracking `task_id`. Polls immediately, then every
/// `config.interval` until a terminal status is observed or the handle
/// is cancelled. Multiple handles may track the same task independently.
pub fn track(
    probe: Arc<dyn TaskProbe>,
    clock: Arc<dyn Clock>,
    task_id: impl Into<String>,
    config: TrackConfig,
    callbacks: TrackCallbacks,
) -> TrackHandle {
    let alive = Arc::new(AtomicBool::new(true));
    let handle = TrackHandle {
        alive: Arc::clone(&alive),
    };
    tokio::spawn(run_loop(probe, clock, task_id.into(), config, callbacks, alive));
    handle
}

async fn run_loop(
    probe: Arc<dyn TaskProbe>,
    clock: Arc<dyn Clock>,
    task_id: String,
    config: TrackConfig,
    callbacks: TrackCallbacks,
    alive: Arc<AtomicBool>,
) {
    let mut state = TrackState::Idle;
    tracing::trace!(%task_id, ?state, "tracking started");
    // Clamp: reported progress never decreases for a single handle, even
    // if the backend glitches between polls.
    let mut floor: f32 = 0.0;

    loop {
        if !alive.load(Ordering::SeqCst) {
            state = TrackState::Cancelled;
            break;
        }
        state = TrackState::Polling;
        tracing::trace!(%task_id, ?state, "polling task");

        let result = probe.probe(&task_id).await;
        if !alive.load(Ordering::SeqCst) {
            // Cancel landed while the poll was in flight; discard.
            state = TrackState::Cancelled;
            break;
        }

        match result {
            Ok(mut task) => {
                floor = floor.max(task.progress);
                task.progress = floor;
                (callbacks.on_update)(&task);
                if task.status.is_terminal() {
                    // Absorbing state: no further transition is possible,
                    // so any later poll would be wasted work.
                    state = TrackState::Terminal;
                    (callbacks.on_terminal)(&task);
                    break;
                }
            }
            Err(err) => {
                (callbacks.on_error)(&err);
                if !err.is_transient() {
                    // The task is unknown or the backend rejected the
                    // poll outright; retrying cannot succeed.
                    state = TrackState::Terminal;
                    break;
                }
            }
        }

        clock.sleep(config.interval).await;
    }

    tracing::debug!(%task_id, ?state, "task tracking finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_types::TaskStatus;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn snapshot(status: TaskStatus, progress: f32) -> Task {
        serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "test-task",
            "model_type": "yolo11n",
            "task_type": "detect",
            "status": serde_json::to_value(status).unwrap(),
            "progress": progress,
        }))
        .unwrap()
    }

    fn decode_error() -> ClientError {
        serde_json::from_str::<u32>("not a number").unwrap_err().into()
    }

    /// Probe that replays a scripted sequence of poll outcomes.
    struct ScriptedProbe {
        script: Mutex<VecDeque<Result<Task, ClientError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedProbe {
        fn new(script: Vec<Result<Task, ClientError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TaskProbe for ScriptedProbe {
        async fn probe(&self, _task_id: &str) -> Result<Task, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("poll issued after the script was exhausted")
        }
    }

    /// Clock whose sleeps return immediately.
    struct InstantClock;

    #[async_trait]
    impl Clock for InstantClock {
        async fn sleep(&self, _duration: Duration) {}
    }

    #[derive(Debug, PartialEq)]
    enum Event {
        Update(TaskStatus, f32),
        Terminal(TaskStatus),
        Error,
    }

    fn recording_callbacks() -> (TrackCallbacks, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (u, t, e) = (events.clone(), events.clone(), events.clone());
        let callbacks = TrackCallbacks {
            on_update: Box::new(move |task| {
                u.lock().unwrap().push(Event::Update(task.status, task.progress));
            }),
            on_terminal: Box::new(move |task| {
                t.lock().unwrap().push(Event::Terminal(task.status));
            }),
            on_error: Box::new(move |_err| {
                e.lock().unwrap().push(Event::Error);
            }),
        };
        (callbacks, events)
    }

    /// Wait until `events` contains a `Terminal` entry or the timeout
    /// elapses.
    async fn wait_for_terminal(events: &Arc<Mutex<Vec<Event>>>) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if events
                    .lock()
                    .unwrap()
                    .iter()
                    .any(|e| matches!(e, Event::Terminal(_)))
                {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("tracking should reach a terminal event");
    }

    #[tokio::test]
    async fn polls_until_terminal_then_stops() {
        let probe = ScriptedProbe::new(vec![
            Ok(snapshot(TaskStatus::Pending, 0.0)),
            Ok(snapshot(TaskStatus::Running, 40.0)),
            Ok(snapshot(TaskStatus::Running, 70.0)),
            Ok(snapshot(TaskStatus::Succeeded, 100.0)),
        ]);
        let (callbacks, events) = recording_callbacks();

        let _handle = track(
            probe.clone(),
            Arc::new(InstantClock),
            "1",
            TrackConfig::default(),
            callbacks,
        );
        wait_for_terminal(&events).await;
        // Give a mis-scheduled extra poll a chance to fire the script's
        // exhaustion panic.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                Event::Update(TaskStatus::Pending, 0.0),
                Event::Update(TaskStatus::Running, 40.0),
                Event::Update(TaskStatus::Running, 70.0),
                Event::Update(TaskStatus::Succeeded, 100.0),
                Event::Terminal(TaskStatus::Succeeded),
            ]
        );
        assert_eq!(probe.calls(), 4, "no poll after the terminal observation");
    }

    #[tokio::test]
    async fn reported_progress_never_decreases() {
        let probe = ScriptedProbe::new(vec![
            Ok(snapshot(TaskStatus::Running, 50.0)),
            Ok(snapshot(TaskStatus::Running, 40.0)),
            Ok(snapshot(TaskStatus::Succeeded, 100.0)),
        ]);
        let (callbacks, events) = recording_callbacks();

        let _handle = track(
            probe,
            Arc::new(InstantClock),
            "1",
            TrackConfig::default(),
            callbacks,
        );
        wait_for_terminal(&events).await;

        let events = events.lock().unwrap();
        assert_eq!(events[0], Event::Update(TaskStatus::Running, 50.0));
        assert_eq!(events[1], Event::Update(TaskStatus::Running, 50.0));
        assert_eq!(events[2], Event::Update(TaskStatus::Succeeded, 100.0));
    }

    #[tokio::test]
    async fn transient_poll_failure_keeps_polling() {
        let probe = ScriptedProbe::new(vec![
            Ok(snapshot(TaskStatus::Running, 10.0)),
            Err(decode_error()),
            Ok(snapshot(TaskStatus::Succeeded, 100.0)),
        ]);
        let (callbacks, events) = recording_callbacks();

        let _handle = track(
            probe.clone(),
            Arc::new(InstantClock),
            "1",
            TrackConfig::default(),
            callbacks,
        );
        wait_for_terminal(&events).await;

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                Event::Update(TaskStatus::Running, 10.0),
                Event::Error,
                Event::Update(TaskStatus::Succeeded, 100.0),
                Event::Terminal(TaskStatus::Succeeded),
            ]
        );
        assert_eq!(probe.calls(), 3);
    }

    #[tokio::test]
    async fn unknown_task_stops_polling() {
        let probe = ScriptedProbe::new(vec![Err(ClientError::NotFound("task 9".into()))]);
        let (callbacks, events) = recording_callbacks();

        let _handle = track(
            probe.clone(),
            Arc::new(InstantClock),
            "9",
            TrackConfig::default(),
            callbacks,
        );
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(*events.lock().unwrap(), vec![Event::Error]);
        assert_eq!(probe.calls(), 1);
    }

    /// Probe that signals entry and then blocks until released, so the
    /// test can cancel while a poll is in flight.
    struct GatedProbe {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl TaskProbe for GatedProbe {
        async fn probe(&self, _task_id: &str) -> Result<Task, ClientError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(snapshot(TaskStatus::Running, 50.0))
        }
    }

    #[tokio::test]
    async fn cancel_discards_in_flight_poll_result() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let probe = Arc::new(GatedProbe {
            entered: entered.clone(),
            release: release.clone(),
        });
        let (callbacks, events) = recording_callbacks();

        let handle = track(
            probe,
            Arc::new(InstantClock),
            "1",
            TrackConfig::default(),
            callbacks,
        );

        // Cancel after the poll is dispatched but before it resolves.
        entered.notified().await;
        handle.cancel();
        release.notify_one();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(
            events.lock().unwrap().is_empty(),
            "a cancelled handle must not deliver the in-flight result"
        );
        assert!(handle.is_cancelled());
    }

    #[tokio::test]
    async fn independent_handles_observe_the_same_task() {
        let make_script = || {
            vec![
                Ok(snapshot(TaskStatus::Running, 80.0)),
                Ok(snapshot(TaskStatus::Succeeded, 100.0)),
            ]
        };
        let (cb_a, events_a) = recording_callbacks();
        let (cb_b, events_b) = recording_callbacks();

        let _a = track(
            ScriptedProbe::new(make_script()),
            Arc::new(InstantClock),
            "1",
            TrackConfig::default(),
            cb_a,
        );
        let _b = track(
            ScriptedProbe::new(make_script()),
            Arc::new(InstantClock),
            "1",
            TrackConfig::default(),
            cb_b,
        );
        wait_for_terminal(&events_a).await;
        wait_for_terminal(&events_b).await;

        assert_eq!(events_a.lock().unwrap().len(), 3);
        assert_eq!(events_b.lock().unwrap().len(), 3);
    }
}
