//! Live observation listener service
//!
//! Fans out one subscription task per device, tracks each task through
//! its lifecycle and aggregates the terminal outcomes into a report.
//! Devices are fully isolated from each other: a failing subscription
//! never disturbs its siblings, and cancellation drains every task into
//! a clean close.

use std::collections::HashMap;
use std::sync::Arc;

use domain::{DeviceId, Observation};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::ports::{LoggingSink, ObservationSink, StreamEvent, StreamPort};

/// Lifecycle phase of a single device subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    /// The connection to the stream backend is being established
    Connecting,
    /// The subscription request for the device has been sent
    Subscribed,
    /// Messages are being consumed
    Receiving,
    /// The subscription ended cleanly
    Closed,
    /// The subscription ended with an error
    Failed,
}

impl SubscriptionState {
    /// Whether this state ends the subscription
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }

    /// Human readable state name
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Subscribed => "subscribed",
            Self::Receiving => "receiving",
            Self::Closed => "closed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Terminal outcome of one device's listen task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceOutcome {
    /// The subscription ended cleanly, by cancellation or by the backend
    Closed,
    /// The subscription ended with the given error
    Failed(String),
}

impl DeviceOutcome {
    /// Whether the device ended in an error
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Aggregated result of one listening run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenReport {
    /// Whether every device ended cleanly
    pub all_closed: bool,
    /// Terminal outcome per device
    pub outcomes: HashMap<DeviceId, DeviceOutcome>,
    /// When the run finished
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl ListenReport {
    /// Build a report from the collected outcomes
    #[must_use]
    pub fn new(outcomes: HashMap<DeviceId, DeviceOutcome>) -> Self {
        let all_closed = outcomes.values().all(|outcome| !outcome.is_failure());
        Self {
            all_closed,
            outcomes,
            finished_at: chrono::Utc::now(),
        }
    }

    /// Terminal outcome for one device, if it took part in the run
    #[must_use]
    pub fn outcome(&self, device_id: DeviceId) -> Option<&DeviceOutcome> {
        self.outcomes.get(&device_id)
    }

    /// Devices that ended in an error, in ascending id order
    #[must_use]
    pub fn failed_devices(&self) -> Vec<DeviceId> {
        let mut failed: Vec<DeviceId> = self
            .outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_failure())
            .map(|(device_id, _)| *device_id)
            .collect();
        failed.sort_unstable();
        failed
    }

    /// Number of devices that took part in the run
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.outcomes.len()
    }
}

type StateMap = HashMap<DeviceId, SubscriptionState>;

/// Service that listens to live observations from a set of devices
pub struct ListenerService {
    stream: Arc<dyn StreamPort>,
    sink: Arc<dyn ObservationSink>,
    states: Arc<RwLock<StateMap>>,
}

impl std::fmt::Debug for ListenerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerService")
            .field("stream", &"<StreamPort>")
            .field("sink", &"<ObservationSink>")
            .field("states", &*self.states.read())
            .finish()
    }
}

impl ListenerService {
    /// Create a new listener that logs every decoded observation
    #[must_use]
    pub fn new(stream: Arc<dyn StreamPort>) -> Self {
        Self {
            stream,
            sink: Arc::new(LoggingSink::new()),
            states: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Replace the delivery sink
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ObservationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Snapshot of every known device state
    #[must_use]
    pub fn device_states(&self) -> StateMap {
        self.states.read().clone()
    }

    /// Current state of one device, if it is known
    #[must_use]
    pub fn device_state(&self, device_id: DeviceId) -> Option<SubscriptionState> {
        self.states.read().get(&device_id).copied()
    }

    /// Listen to every given device until cancellation or failure
    ///
    /// Each device runs in its own task; the call returns once every
    /// task has reached a terminal state. An empty device set completes
    /// immediately with an empty report.
    #[instrument(skip(self, cancel))]
    pub async fn run(&self, device_ids: Vec<DeviceId>, cancel: CancellationToken) -> ListenReport {
        if device_ids.is_empty() {
            info!("No listenable devices, nothing to do");
            return ListenReport::new(HashMap::new());
        }

        let mut tasks: JoinSet<(DeviceId, DeviceOutcome)> = JoinSet::new();
        let mut task_ids: HashMap<tokio::task::Id, DeviceId> = HashMap::new();

        for device_id in device_ids {
            let stream = Arc::clone(&self.stream);
            let sink = Arc::clone(&self.sink);
            let states = Arc::clone(&self.states);
            let cancel = cancel.child_token();
            let handle = tasks.spawn(async move {
                let outcome = run_device(stream, sink, &states, device_id, cancel).await;
                (device_id, outcome)
            });
            task_ids.insert(handle.id(), device_id);
        }

        let mut outcomes = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((device_id, outcome)) => {
                    match &outcome {
                        DeviceOutcome::Closed => {
                            info!(device_id = %device_id, "Subscription closed");
                        },
                        DeviceOutcome::Failed(reason) => {
                            error!(device_id = %device_id, error = %reason, "Subscription failed");
                        },
                    }
                    outcomes.insert(device_id, outcome);
                },
                Err(join_error) => {
                    // A panicking task ends up here; it counts as a
                    // failure for its device, not for the whole run.
                    if let Some(device_id) = task_ids.get(&join_error.id()).copied() {
                        error!(device_id = %device_id, error = %join_error, "Listen task aborted");
                        self.states
                            .write()
                            .insert(device_id, SubscriptionState::Failed);
                        outcomes.insert(device_id, DeviceOutcome::Failed(join_error.to_string()));
                    } else {
                        error!(error = %join_error, "Listen task aborted for an unknown device");
                    }
                },
            }
        }

        let report = ListenReport::new(outcomes);
        info!(
            device_count = report.device_count(),
            all_closed = report.all_closed,
            "Listening run finished"
        );
        report
    }
}

fn set_state(states: &RwLock<StateMap>, device_id: DeviceId, state: SubscriptionState) {
    debug!(device_id = %device_id, state = %state, "Subscription state changed");
    states.write().insert(device_id, state);
}

/// Drive one device subscription to a terminal state
async fn run_device(
    stream: Arc<dyn StreamPort>,
    sink: Arc<dyn ObservationSink>,
    states: &RwLock<StateMap>,
    device_id: DeviceId,
    cancel: CancellationToken,
) -> DeviceOutcome {
    set_state(states, device_id, SubscriptionState::Connecting);

    let mut subscription = tokio::select! {
        () = cancel.cancelled() => {
            info!(device_id = %device_id, "Cancelled before the connection was established");
            set_state(states, device_id, SubscriptionState::Closed);
            return DeviceOutcome::Closed;
        }
        opened = stream.open(device_id) => match opened {
            Ok(subscription) => subscription,
            Err(e) => {
                error!(device_id = %device_id, error = %e, "Failed to open subscription");
                set_state(states, device_id, SubscriptionState::Failed);
                return DeviceOutcome::Failed(e.to_string());
            }
        }
    };

    set_state(states, device_id, SubscriptionState::Subscribed);
    info!(device_id = %device_id, "Listening for observations");
    set_state(states, device_id, SubscriptionState::Receiving);

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                info!(device_id = %device_id, "Shutting down subscription");
                if let Err(e) = subscription.close().await {
                    warn!(device_id = %device_id, error = %e, "Error while closing subscription");
                }
                set_state(states, device_id, SubscriptionState::Closed);
                return DeviceOutcome::Closed;
            }
            event = subscription.next_event() => match event {
                Ok(Some(event)) => handle_event(sink.as_ref(), device_id, event).await,
                Ok(None) => {
                    info!(device_id = %device_id, "Connection closed by the backend");
                    set_state(states, device_id, SubscriptionState::Closed);
                    return DeviceOutcome::Closed;
                }
                Err(e) => {
                    error!(device_id = %device_id, error = %e, "Subscription stream failed");
                    set_state(states, device_id, SubscriptionState::Failed);
                    return DeviceOutcome::Failed(e.to_string());
                }
            }
        }
    }
}

/// Decode and deliver the observation rows carried by one message
///
/// Decode and delivery problems are logged per row and never terminate
/// the subscription.
async fn handle_event(sink: &dyn ObservationSink, device_id: DeviceId, event: StreamEvent) {
    let Some(rows) = event.observations else {
        debug!(
            device_id = %device_id,
            event_type = event.event_type.as_deref().unwrap_or("unknown"),
            "Informational message"
        );
        return;
    };

    let Some(tag) = event.event_type else {
        warn!(device_id = %device_id, "Observation rows arrived without a type tag");
        return;
    };

    for row in rows {
        match Observation::decode(&row, &tag) {
            Ok(observation) => {
                if let Err(e) = sink.deliver(device_id, observation).await {
                    warn!(device_id = %device_id, error = %e, "Observation sink rejected a record");
                }
            },
            Err(e) => {
                warn!(device_id = %device_id, error = %e, "Failed to decode observation");
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::DeviceSubscription;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    type ScriptedEvent = Result<Option<StreamEvent>, ApplicationError>;

    fn sample_row() -> Vec<Value> {
        json!([
            1_588_948_614,
            0.18,
            0.62,
            1.24,
            287,
            3,
            1005.8,
            14.2,
            79.0,
            5372.0,
            0.4,
            45.0,
            0.0,
            0,
            0.0,
            0,
            2.62,
            1,
            0.0,
            0.0,
            0.0,
            0
        ])
        .as_array()
        .cloned()
        .unwrap_or_default()
    }

    fn observation_event(rows: Vec<Vec<Value>>) -> StreamEvent {
        StreamEvent::observations("obs_st", DeviceId::new(42), rows)
    }

    /// Subscription that replays a script, then blocks until cancelled
    struct ScriptedSubscription {
        events: VecDeque<ScriptedEvent>,
        closed: Arc<AtomicBool>,
    }

    #[async_trait]
    impl DeviceSubscription for ScriptedSubscription {
        async fn next_event(&mut self) -> Result<Option<StreamEvent>, ApplicationError> {
            match self.events.pop_front() {
                Some(event) => event,
                None => std::future::pending().await,
            }
        }

        async fn close(&mut self) -> Result<(), ApplicationError> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Stream port handing out one scripted subscription per device
    #[derive(Default)]
    struct ScriptedStream {
        scripts: Mutex<HashMap<DeviceId, Vec<ScriptedEvent>>>,
        closed_flags: Mutex<HashMap<DeviceId, Arc<AtomicBool>>>,
        open_count: AtomicUsize,
    }

    impl ScriptedStream {
        fn script(self, device_id: DeviceId, events: Vec<ScriptedEvent>) -> Self {
            self.scripts.lock().insert(device_id, events);
            self.closed_flags
                .lock()
                .insert(device_id, Arc::new(AtomicBool::new(false)));
            self
        }

        fn was_closed(&self, device_id: DeviceId) -> bool {
            self.closed_flags
                .lock()
                .get(&device_id)
                .is_some_and(|flag| flag.load(Ordering::SeqCst))
        }

        fn opens(&self) -> usize {
            self.open_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StreamPort for ScriptedStream {
        async fn open(
            &self,
            device_id: DeviceId,
        ) -> Result<Box<dyn DeviceSubscription>, ApplicationError> {
            self.open_count.fetch_add(1, Ordering::SeqCst);
            let Some(events) = self.scripts.lock().remove(&device_id) else {
                return Err(ApplicationError::Connection(format!(
                    "no script for device {device_id}"
                )));
            };
            let closed = self
                .closed_flags
                .lock()
                .get(&device_id)
                .cloned()
                .unwrap_or_else(|| Arc::new(AtomicBool::new(false)));
            Ok(Box::new(ScriptedSubscription {
                events: events.into(),
                closed,
            }))
        }
    }

    /// Sink that records every delivered observation
    #[derive(Default)]
    struct CollectingSink {
        received: Mutex<Vec<(DeviceId, Observation)>>,
    }

    impl CollectingSink {
        fn count(&self) -> usize {
            self.received.lock().len()
        }

        fn count_for(&self, device_id: DeviceId) -> usize {
            self.received
                .lock()
                .iter()
                .filter(|(id, _)| *id == device_id)
                .count()
        }
    }

    #[async_trait]
    impl ObservationSink for CollectingSink {
        async fn deliver(
            &self,
            device_id: DeviceId,
            observation: Observation,
        ) -> Result<(), ApplicationError> {
            self.received.lock().push((device_id, observation));
            Ok(())
        }
    }

    /// Sink that rejects every delivery
    struct RejectingSink;

    #[async_trait]
    impl ObservationSink for RejectingSink {
        async fn deliver(
            &self,
            _device_id: DeviceId,
            _observation: Observation,
        ) -> Result<(), ApplicationError> {
            Err(ApplicationError::Internal("sink unavailable".into()))
        }
    }

    /// Subscription that panics on the first read
    struct PanickingSubscription;

    #[async_trait]
    impl DeviceSubscription for PanickingSubscription {
        async fn next_event(&mut self) -> Result<Option<StreamEvent>, ApplicationError> {
            panic!("scripted panic");
        }

        async fn close(&mut self) -> Result<(), ApplicationError> {
            Ok(())
        }
    }

    struct PanickingStream;

    #[async_trait]
    impl StreamPort for PanickingStream {
        async fn open(
            &self,
            _device_id: DeviceId,
        ) -> Result<Box<dyn DeviceSubscription>, ApplicationError> {
            Ok(Box::new(PanickingSubscription))
        }
    }

    async fn wait_for_state(
        service: &ListenerService,
        device_id: DeviceId,
        state: SubscriptionState,
    ) {
        for _ in 0..500 {
            if service.device_state(device_id) == Some(state) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("device {device_id} never reached state {state}");
    }

    async fn wait_until(condition: impl Fn() -> bool) {
        for _ in 0..500 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("condition not reached in time");
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn empty_device_set_finishes_immediately() {
            let stream = Arc::new(ScriptedStream::default());
            let service = ListenerService::new(stream.clone());

            let report = service.run(vec![], CancellationToken::new()).await;

            assert!(report.all_closed);
            assert_eq!(report.device_count(), 0);
            assert_eq!(stream.opens(), 0);
        }

        #[tokio::test]
        async fn delivers_until_the_backend_closes() {
            let device = DeviceId::new(42);
            let stream = Arc::new(ScriptedStream::default().script(
                device,
                vec![
                    Ok(Some(observation_event(vec![sample_row()]))),
                    Ok(Some(observation_event(vec![sample_row()]))),
                    Ok(None),
                ],
            ));
            let sink = Arc::new(CollectingSink::default());
            let service = ListenerService::new(stream).with_sink(sink.clone());

            let report = service.run(vec![device], CancellationToken::new()).await;

            assert_eq!(report.outcome(device), Some(&DeviceOutcome::Closed));
            assert!(report.all_closed);
            assert_eq!(sink.count(), 2);
            assert_eq!(service.device_state(device), Some(SubscriptionState::Closed));
        }

        #[tokio::test]
        async fn one_failing_device_does_not_disturb_its_sibling() {
            let healthy = DeviceId::new(1);
            let broken = DeviceId::new(2);
            // No script for the broken device, so open() fails for it.
            let stream = Arc::new(ScriptedStream::default().script(
                healthy,
                vec![Ok(Some(observation_event(vec![sample_row()])))],
            ));
            let sink = Arc::new(CollectingSink::default());
            let service =
                Arc::new(ListenerService::new(stream.clone()).with_sink(sink.clone()));
            let cancel = CancellationToken::new();

            let run = tokio::spawn({
                let service = Arc::clone(&service);
                let cancel = cancel.clone();
                async move { service.run(vec![healthy, broken], cancel).await }
            });

            wait_for_state(&service, broken, SubscriptionState::Failed).await;
            wait_until(|| sink.count_for(healthy) == 1).await;
            assert_eq!(
                service.device_state(healthy),
                Some(SubscriptionState::Receiving)
            );

            cancel.cancel();
            let report = run.await.unwrap();

            assert!(!report.all_closed);
            assert_eq!(report.outcome(healthy), Some(&DeviceOutcome::Closed));
            assert!(matches!(
                report.outcome(broken),
                Some(DeviceOutcome::Failed(_))
            ));
            assert_eq!(report.failed_devices(), vec![broken]);
            assert!(stream.was_closed(healthy));
        }

        #[tokio::test]
        async fn cancellation_closes_every_device() {
            let first = DeviceId::new(10);
            let second = DeviceId::new(20);
            let stream = Arc::new(
                ScriptedStream::default()
                    .script(first, vec![Ok(Some(observation_event(vec![sample_row()])))])
                    .script(second, vec![]),
            );
            let service = Arc::new(ListenerService::new(stream.clone()));
            let cancel = CancellationToken::new();

            let run = tokio::spawn({
                let service = Arc::clone(&service);
                let cancel = cancel.clone();
                async move { service.run(vec![first, second], cancel).await }
            });

            wait_for_state(&service, first, SubscriptionState::Receiving).await;
            wait_for_state(&service, second, SubscriptionState::Receiving).await;

            cancel.cancel();
            let report = run.await.unwrap();

            assert!(report.all_closed);
            assert_eq!(report.outcome(first), Some(&DeviceOutcome::Closed));
            assert_eq!(report.outcome(second), Some(&DeviceOutcome::Closed));
            assert!(stream.was_closed(first));
            assert!(stream.was_closed(second));
        }

        #[tokio::test]
        async fn stream_error_marks_the_device_failed() {
            let device = DeviceId::new(7);
            let stream = Arc::new(ScriptedStream::default().script(
                device,
                vec![
                    Ok(Some(observation_event(vec![sample_row()]))),
                    Err(ApplicationError::Connection("reset by peer".into())),
                ],
            ));
            let sink = Arc::new(CollectingSink::default());
            let service = ListenerService::new(stream).with_sink(sink.clone());

            let report = service.run(vec![device], CancellationToken::new()).await;

            assert!(!report.all_closed);
            assert!(matches!(
                report.outcome(device),
                Some(DeviceOutcome::Failed(reason)) if reason.contains("reset by peer")
            ));
            assert_eq!(sink.count(), 1);
            assert_eq!(service.device_state(device), Some(SubscriptionState::Failed));
        }

        #[tokio::test]
        async fn pre_connection_cancellation_counts_as_closed() {
            let device = DeviceId::new(3);
            let stream = Arc::new(ScriptedStream::default().script(device, vec![]));
            let service = ListenerService::new(stream);
            let cancel = CancellationToken::new();
            cancel.cancel();

            let report = service.run(vec![device], cancel).await;

            assert!(report.all_closed);
            assert_eq!(report.outcome(device), Some(&DeviceOutcome::Closed));
        }

        #[tokio::test]
        async fn panicking_task_is_recorded_as_failed() {
            let device = DeviceId::new(9);
            let service = ListenerService::new(Arc::new(PanickingStream));

            let report = service.run(vec![device], CancellationToken::new()).await;

            assert!(!report.all_closed);
            assert!(matches!(
                report.outcome(device),
                Some(DeviceOutcome::Failed(_))
            ));
            assert_eq!(service.device_state(device), Some(SubscriptionState::Failed));
        }
    }

    mod event_handling_tests {
        use super::*;

        #[tokio::test]
        async fn undecodable_rows_are_skipped_without_ending_the_task() {
            let device = DeviceId::new(42);
            let bad_row = vec![Value::Null; 22];
            let stream = Arc::new(ScriptedStream::default().script(
                device,
                vec![
                    Ok(Some(observation_event(vec![bad_row, sample_row()]))),
                    Ok(None),
                ],
            ));
            let sink = Arc::new(CollectingSink::default());
            let service = ListenerService::new(stream).with_sink(sink.clone());

            let report = service.run(vec![device], CancellationToken::new()).await;

            assert_eq!(report.outcome(device), Some(&DeviceOutcome::Closed));
            assert_eq!(sink.count(), 1);
        }

        #[tokio::test]
        async fn informational_messages_are_not_delivered() {
            let device = DeviceId::new(42);
            let stream = Arc::new(ScriptedStream::default().script(
                device,
                vec![
                    Ok(Some(StreamEvent::informational("connection_opened"))),
                    Ok(Some(StreamEvent::informational("ack"))),
                    Ok(Some(observation_event(vec![sample_row()]))),
                    Ok(None),
                ],
            ));
            let sink = Arc::new(CollectingSink::default());
            let service = ListenerService::new(stream).with_sink(sink.clone());

            let report = service.run(vec![device], CancellationToken::new()).await;

            assert_eq!(report.outcome(device), Some(&DeviceOutcome::Closed));
            assert_eq!(sink.count(), 1);
        }

        #[tokio::test]
        async fn rows_without_a_type_tag_are_dropped() {
            let device = DeviceId::new(42);
            let mut event = observation_event(vec![sample_row()]);
            event.event_type = None;
            let stream = Arc::new(
                ScriptedStream::default().script(device, vec![Ok(Some(event)), Ok(None)]),
            );
            let sink = Arc::new(CollectingSink::default());
            let service = ListenerService::new(stream).with_sink(sink.clone());

            let report = service.run(vec![device], CancellationToken::new()).await;

            assert_eq!(report.outcome(device), Some(&DeviceOutcome::Closed));
            assert_eq!(sink.count(), 0);
        }

        #[tokio::test]
        async fn sink_rejection_does_not_end_the_subscription() {
            let device = DeviceId::new(42);
            let stream = Arc::new(ScriptedStream::default().script(
                device,
                vec![
                    Ok(Some(observation_event(vec![sample_row()]))),
                    Ok(Some(observation_event(vec![sample_row()]))),
                    Ok(None),
                ],
            ));
            let service = ListenerService::new(stream).with_sink(Arc::new(RejectingSink));

            let report = service.run(vec![device], CancellationToken::new()).await;

            assert_eq!(report.outcome(device), Some(&DeviceOutcome::Closed));
            assert!(report.all_closed);
        }
    }

    mod report_tests {
        use super::*;

        #[test]
        fn all_closed_requires_every_device_clean() {
            let mut outcomes = HashMap::new();
            outcomes.insert(DeviceId::new(1), DeviceOutcome::Closed);
            outcomes.insert(DeviceId::new(2), DeviceOutcome::Failed("boom".into()));

            let report = ListenReport::new(outcomes);

            assert!(!report.all_closed);
            assert_eq!(report.failed_devices(), vec![DeviceId::new(2)]);
            assert_eq!(report.device_count(), 2);
        }

        #[test]
        fn clean_outcomes_produce_a_clean_report() {
            let mut outcomes = HashMap::new();
            outcomes.insert(DeviceId::new(1), DeviceOutcome::Closed);
            outcomes.insert(DeviceId::new(2), DeviceOutcome::Closed);

            let report = ListenReport::new(outcomes);

            assert!(report.all_closed);
            assert!(report.failed_devices().is_empty());
        }

        #[test]
        fn failed_devices_are_sorted() {
            let mut outcomes = HashMap::new();
            outcomes.insert(DeviceId::new(30), DeviceOutcome::Failed("a".into()));
            outcomes.insert(DeviceId::new(10), DeviceOutcome::Failed("b".into()));
            outcomes.insert(DeviceId::new(20), DeviceOutcome::Closed);

            let report = ListenReport::new(outcomes);

            assert_eq!(
                report.failed_devices(),
                vec![DeviceId::new(10), DeviceId::new(30)]
            );
        }

        #[test]
        fn report_serializes_with_stable_field_names() {
            let mut outcomes = HashMap::new();
            outcomes.insert(DeviceId::new(42), DeviceOutcome::Closed);

            let report = ListenReport::new(outcomes);
            let json = serde_json::to_string(&report).unwrap();

            assert!(json.contains("\"all_closed\":true"));
            assert!(json.contains("\"42\":\"closed\""));
            assert!(json.contains("finished_at"));
        }

        #[test]
        fn failure_outcome_carries_its_reason() {
            let outcome = DeviceOutcome::Failed("handshake rejected".into());
            let json = serde_json::to_string(&outcome).unwrap();

            assert_eq!(json, "{\"failed\":\"handshake rejected\"}");
            assert!(outcome.is_failure());
            assert!(!DeviceOutcome::Closed.is_failure());
        }
    }

    mod state_tests {
        use super::*;

        #[test]
        fn terminal_states_are_closed_and_failed() {
            assert!(SubscriptionState::Closed.is_terminal());
            assert!(SubscriptionState::Failed.is_terminal());
            assert!(!SubscriptionState::Connecting.is_terminal());
            assert!(!SubscriptionState::Subscribed.is_terminal());
            assert!(!SubscriptionState::Receiving.is_terminal());
        }

        #[test]
        fn labels_match_the_wire_encoding() {
            assert_eq!(SubscriptionState::Connecting.to_string(), "connecting");
            assert_eq!(
                serde_json::to_string(&SubscriptionState::Receiving).unwrap(),
                "\"receiving\""
            );
        }
    }
}
