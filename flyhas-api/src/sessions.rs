use std::collections::HashMap;
use std::sync::{Arc, OnceLock, Weak};

use serde::Serialize;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::AbortHandle;
use tokio::time::{interval_at, Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use flyhas_core::seat_map::SeatGrid;
use flyhas_core::{
    CoreResult, FareSchedule, HoldState, HoldTimer, PassengerBounds, Seat, SeatHandoff,
    SeatInventory, SeatNumber, SeatSelection, ToggleOutcome,
};
use flyhas_shared::models::events::{HoldEvent, HoldEventKind};
use flyhas_shared::{FlightDetail, FlightSummary};

use crate::metrics::Metrics;

const TICK_PERIOD: Duration = Duration::from_secs(1);
const EVENT_BUFFER: usize = 64;

/// Snapshot of a seat page, as rendered to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSessionView {
    pub session_id: Uuid,
    pub flight: FlightSummary,
    pub passenger_count: u8,
    pub min_passengers: u8,
    pub max_passengers: u8,
    pub selected_seats: Vec<Seat>,
    pub open_seats: usize,
    pub seconds_remaining: u32,
    pub countdown: String,
    pub total_cost: u32,
    pub currency: String,
    pub grid: SeatGrid,
}

/// One open seat page: the selection, its hold countdown and the ticker
/// driving it.
pub struct SeatSession {
    id: Uuid,
    selection: Mutex<SeatSelection>,
    events: broadcast::Sender<HoldEvent>,
    last_touched: std::sync::Mutex<Instant>,
    timer: OnceLock<AbortHandle>,
}

impl SeatSession {
    fn new(id: Uuid, selection: SeatSelection) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            id,
            selection: Mutex::new(selection),
            events,
            last_touched: std::sync::Mutex::new(Instant::now()),
            timer: OnceLock::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HoldEvent> {
        self.events.subscribe()
    }

    fn touch(&self) {
        if let Ok(mut touched) = self.last_touched.lock() {
            *touched = Instant::now();
        }
    }

    fn idle_for(&self, now: Instant) -> Duration {
        self.last_touched
            .lock()
            .map(|touched| now.saturating_duration_since(*touched))
            .unwrap_or_default()
    }

    pub async fn view(&self, fares: &FareSchedule) -> SeatSessionView {
        let selection = self.selection.lock().await;
        let bounds = selection.bounds();
        SeatSessionView {
            session_id: self.id,
            flight: selection.inventory().flight().clone(),
            passenger_count: selection.passenger_count(),
            min_passengers: bounds.min,
            max_passengers: bounds.max,
            selected_seats: selection.selected().to_vec(),
            open_seats: selection.inventory().open_seat_count(),
            seconds_remaining: selection.hold().seconds_remaining(),
            countdown: selection.hold().display(),
            total_cost: selection.total_cost(fares),
            currency: fares.currency.clone(),
            grid: selection.grid(),
        }
    }

    pub async fn set_passenger_count(&self, requested: i64) -> u8 {
        let mut selection = self.selection.lock().await;
        let count = selection.set_passenger_count(requested);
        debug!("Session {} passenger count set to {}", self.id, count);
        count
    }

    pub async fn toggle_seat(&self, seat_number: &SeatNumber) -> ToggleOutcome {
        let mut selection = self.selection.lock().await;
        let outcome = selection.toggle_seat(seat_number);
        debug!("Session {} toggle {}: {:?}", self.id, seat_number, outcome);
        outcome
    }

    pub async fn confirm(&self) -> CoreResult<SeatHandoff> {
        self.selection.lock().await.confirm()
    }

    async fn on_tick(&self, metrics: &Metrics) {
        let mut selection = self.selection.lock().await;
        let (state, released) = selection.tick();
        let kind = match state {
            HoldState::Running { seconds_remaining } => HoldEventKind::Tick { seconds_remaining },
            HoldState::Expired => {
                metrics.holds_expired.inc();
                let released_seats: Vec<String> = released
                    .iter()
                    .map(|seat| seat.seat_number.to_string())
                    .collect();
                info!(
                    "Hold expired for session {}, released {:?}",
                    self.id, released_seats
                );
                HoldEventKind::Expired {
                    released_seats,
                    seconds_remaining: selection.hold().seconds_remaining(),
                }
            }
        };
        drop(selection);

        // No subscribers is fine; the countdown runs regardless.
        let _ = self.events.send(HoldEvent {
            session_id: self.id,
            kind,
            emitted_at: chrono::Utc::now().timestamp(),
        });
    }

    fn stop(&self) {
        if let Some(timer) = self.timer.get() {
            timer.abort();
        }
    }
}

impl Drop for SeatSession {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_hold_timer(session: Weak<SeatSession>, metrics: Arc<Metrics>) {
    let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    loop {
        ticker.tick().await;
        let Some(session) = session.upgrade() else {
            break;
        };
        session.on_tick(&metrics).await;
    }
}

/// In-memory seat sessions keyed by id. Nothing here is shared with other
/// users; a hold is local to the session that made it.
pub struct SeatSessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<SeatSession>>>,
    hold_seconds: u32,
    bounds: PassengerBounds,
    metrics: Arc<Metrics>,
}

impl SeatSessionRegistry {
    pub fn new(hold_seconds: u32, bounds: PassengerBounds, metrics: Arc<Metrics>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            hold_seconds,
            bounds,
            metrics,
        }
    }

    pub async fn open(&self, detail: FlightDetail, passenger_count: Option<i64>) -> Arc<SeatSession> {
        let inventory = SeatInventory::from_flight(detail);
        let mut selection = SeatSelection::new(inventory, self.bounds, HoldTimer::new(self.hold_seconds));
        if let Some(requested) = passenger_count {
            selection.set_passenger_count(requested);
        }

        let session = Arc::new(SeatSession::new(Uuid::new_v4(), selection));
        let timer = tokio::spawn(run_hold_timer(Arc::downgrade(&session), self.metrics.clone()));
        let _ = session.timer.set(timer.abort_handle());

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session.clone());
        self.metrics.sessions_opened.inc();
        self.metrics.sessions_live.set(sessions.len() as i64);

        info!(
            "Opened seat session {} ({} seconds on the clock)",
            session.id, self.hold_seconds
        );
        session
    }

    /// Looks up a session and marks it as recently used.
    pub async fn get(&self, id: Uuid) -> Option<Arc<SeatSession>> {
        let session = self.sessions.read().await.get(&id).cloned()?;
        session.touch();
        Some(session)
    }

    pub async fn remove(&self, id: Uuid) -> Option<Arc<SeatSession>> {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&id)?;
        removed.stop();
        self.metrics.sessions_live.set(sessions.len() as i64);
        debug!("Closed seat session {}", id);
        Some(removed)
    }

    /// Drops sessions nobody has touched for `max_idle`. Returns how many went.
    pub async fn reap_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            let keep = session.idle_for(now) < max_idle;
            if !keep {
                session.stop();
            }
            keep
        });
        self.metrics.sessions_live.set(sessions.len() as i64);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
