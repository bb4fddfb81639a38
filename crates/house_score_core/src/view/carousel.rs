//! Event-by-event results carousel.
//!
//! # Responsibility
//! - Present events as a finite, wrapping sequence of result slides.
//! - Auto-advance on a fixed interval unless the viewer navigated manually.
//!
//! # Invariants
//! - Slides are built on access; winners are ordered by `(position, house)`.
//! - Manual navigation resets the elapsed-time accumulator, so the next
//!   timer tick never overrides it.
//! - A closed carousel ignores ticks and navigation.
//! - A refresh keeps the selected event by id when it still exists.

use crate::feed::EventFeed;
use crate::model::event::{Category, Event, EventId, GradeLevel};
use crate::photo::photo_or_placeholder;
use crate::store::{EventStore, SnapshotListener};
use log::{debug, warn};
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// One winner as rendered on a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideWinner {
    pub position: u32,
    /// `1st`, `2nd`, `3rd`, ...
    pub place: String,
    pub house: String,
    pub name: String,
    pub points: i64,
    /// Photo reference, or the placeholder image when absent.
    pub photo: String,
}

/// Rendered results for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSlide {
    pub event_id: EventId,
    pub name: String,
    pub date: String,
    pub category: Option<Category>,
    pub grade_level: Option<GradeLevel>,
    pub winners: Vec<SlideWinner>,
}

impl EventSlide {
    pub fn from_event(event: &Event) -> Self {
        let mut winners: Vec<SlideWinner> = event
            .winners
            .iter()
            .map(|winner| SlideWinner {
                position: winner.position,
                place: ordinal(winner.position),
                house: winner.house.clone(),
                name: winner.name.clone(),
                points: winner.points,
                photo: photo_or_placeholder(winner.photo.as_deref()).to_string(),
            })
            .collect();
        winners.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.house.cmp(&b.house))
        });

        Self {
            event_id: event.id.clone(),
            name: event.name.clone(),
            date: event.date.clone(),
            category: event.category,
            grade_level: event.grade_level,
            winners,
        }
    }
}

/// English ordinal for a placement (`1st`, `12th`, `22nd`).
pub fn ordinal(position: u32) -> String {
    let suffix = match (position % 10, position % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{position}{suffix}")
}

#[derive(Debug)]
struct CarouselState {
    events: Vec<Event>,
    index: usize,
    interval: Duration,
    elapsed: Duration,
    closed: bool,
}

impl CarouselState {
    fn navigate(&mut self, index: usize) -> bool {
        if self.closed || self.events.is_empty() {
            return false;
        }
        self.index = index % self.events.len();
        self.elapsed = Duration::ZERO;
        true
    }
}

/// Cyclic slideshow over the current event set.
///
/// Clones share state.
#[derive(Debug, Clone)]
pub struct EventCarousel {
    state: Arc<Mutex<CarouselState>>,
}

impl EventCarousel {
    /// Creates an empty carousel advancing once per `interval`.
    ///
    /// A zero interval is treated as one millisecond.
    pub fn new(interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CarouselState {
                events: Vec::new(),
                index: 0,
                interval: interval.max(Duration::from_millis(1)),
                elapsed: Duration::ZERO,
                closed: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CarouselState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the event list, keeping the selected event when possible.
    pub fn refresh(&self, events: &[Event]) {
        let mut state = self.lock();
        let selected = state.events.get(state.index).map(|event| event.id.clone());
        state.events = events.to_vec();
        state.index = match selected
            .and_then(|id| state.events.iter().position(|event| event.id == id))
        {
            Some(index) => index,
            None => state.index.min(state.events.len().saturating_sub(1)),
        };
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().events.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.lock().index
    }

    pub fn current_slide(&self) -> Option<EventSlide> {
        let state = self.lock();
        state.events.get(state.index).map(EventSlide::from_event)
    }

    pub fn slide_at(&self, index: usize) -> Option<EventSlide> {
        self.lock().events.get(index).map(EventSlide::from_event)
    }

    /// Endless iterator over slides of the current snapshot, starting at the
    /// first event. Empty when there are no events.
    pub fn cycle(&self) -> impl Iterator<Item = EventSlide> {
        let events = self.lock().events.clone();
        (0..events.len())
            .cycle()
            .map(move |index| EventSlide::from_event(&events[index]))
    }

    /// Manual step forward, wrapping at the end.
    pub fn next(&self) -> bool {
        let mut state = self.lock();
        let target = state.index + 1;
        state.navigate(target)
    }

    /// Manual step backward, wrapping at the start.
    pub fn previous(&self) -> bool {
        let mut state = self.lock();
        let len = state.events.len();
        let target = (state.index + len.saturating_sub(1)) % len.max(1);
        state.navigate(target)
    }

    /// Manual jump; `index` wraps modulo the number of events.
    pub fn go_to(&self, index: usize) -> bool {
        self.lock().navigate(index)
    }

    /// Returns to the first event and resets the timer.
    pub fn restart(&self) -> bool {
        self.lock().navigate(0)
    }

    /// Feeds elapsed time and returns how many automatic steps were taken.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let mut state = self.lock();
        if state.closed || state.events.is_empty() {
            state.elapsed = Duration::ZERO;
            return 0;
        }

        let interval = state.interval;
        let total = state.elapsed.checked_add(elapsed).unwrap_or(Duration::MAX);
        let steps = total.as_nanos() / interval.as_nanos();
        let remainder = total.as_nanos() % interval.as_nanos();
        state.elapsed = Duration::from_nanos(u64::try_from(remainder).unwrap_or(u64::MAX));

        let len = state.events.len();
        let offset = usize::try_from(steps % len as u128).unwrap_or(0);
        state.index = (state.index + offset) % len;
        let steps = usize::try_from(steps).unwrap_or(usize::MAX);
        if steps > 0 {
            debug!(
                "event=carousel_advance module=view status=ok index={} steps={steps}",
                state.index
            );
        }
        steps
    }

    /// Tears the carousel down; ticks and navigation become no-ops.
    pub fn close(&self) {
        self.lock().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Store listener that refreshes this carousel.
    pub fn listener(&self) -> SnapshotListener {
        let carousel = self.clone();
        Arc::new(move |events: &[Event]| carousel.refresh(events))
    }

    pub fn attach<S: EventStore + ?Sized>(&self, store: &S) -> EventFeed {
        EventFeed::connect(store, self.listener())
    }
}

/// Background timer driving `EventCarousel::advance`.
///
/// Stops on `stop()`, on drop, or once the carousel is closed.
#[derive(Debug)]
pub struct AutoAdvance {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AutoAdvance {
    /// Spawns a timer thread that reports elapsed time every `tick`.
    pub fn start(carousel: EventCarousel, tick: Duration) -> io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("carousel-auto-advance".to_string())
            .spawn(move || {
                let mut last = Instant::now();
                loop {
                    match stop_rx.recv_timeout(tick) {
                        Err(RecvTimeoutError::Timeout) => {
                            let now = Instant::now();
                            carousel.advance(now.duration_since(last));
                            last = now;
                            if carousel.is_closed() {
                                break;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event=carousel_timer_stop module=view status=error error_code=timer_panicked");
            }
        }
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::ordinal;

    #[test]
    fn ordinals_cover_teens_and_tens() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(102), "102nd");
        assert_eq!(ordinal(111), "111th");
    }
}
