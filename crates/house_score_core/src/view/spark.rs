//! Spark view: standings plus auto-rotating event results.
//!
//! # Responsibility
//! - Drive both projections from a single store subscription.
//! - Own the auto-advance timer and release everything on close.

use crate::config::DashboardConfig;
use crate::feed::{EventFeed, FeedMode};
use crate::model::event::Event;
use crate::scoring::Standings;
use crate::store::{EventStore, SnapshotListener};
use crate::view::carousel::{AutoAdvance, EventCarousel, EventSlide};
use crate::view::standings::StandingsProjection;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

const TIMER_TICK: Duration = Duration::from_millis(250);

/// Public slideshow of standings and results.
pub struct SparkView {
    standings: StandingsProjection,
    carousel: EventCarousel,
    feed: Option<EventFeed>,
    timer: Option<AutoAdvance>,
}

impl SparkView {
    /// Opens a view without a timer; the caller drives `tick`.
    pub fn open<S: EventStore + ?Sized>(store: &S, config: &DashboardConfig) -> Self {
        let standings = StandingsProjection::new(&config.known_houses());
        let carousel = EventCarousel::new(config.carousel_interval());

        let listener: SnapshotListener = {
            let standings = standings.clone();
            let carousel = carousel.clone();
            Arc::new(move |events: &[Event]| {
                standings.refresh(events);
                carousel.refresh(events);
            })
        };
        let feed = EventFeed::connect(store, listener);
        info!(
            "event=spark_open module=view status=ok mode={:?} events={}",
            feed.mode(),
            carousel.len()
        );

        Self {
            standings,
            carousel,
            feed: Some(feed),
            timer: None,
        }
    }

    /// Opens a view whose carousel advances on a background timer.
    ///
    /// Falls back to a manually driven carousel when the timer thread cannot
    /// be spawned.
    pub fn open_with_timer<S: EventStore + ?Sized>(store: &S, config: &DashboardConfig) -> Self {
        let mut view = Self::open(store, config);
        match AutoAdvance::start(view.carousel.clone(), TIMER_TICK) {
            Ok(timer) => view.timer = Some(timer),
            Err(err) => warn!(
                "event=spark_open module=view status=degraded error_code=timer_spawn_failed error={err}"
            ),
        }
        view
    }

    pub fn mode(&self) -> Option<FeedMode> {
        self.feed.as_ref().map(EventFeed::mode)
    }

    pub fn standings(&self) -> Standings {
        self.standings.current()
    }

    pub fn current_slide(&self) -> Option<EventSlide> {
        self.carousel.current_slide()
    }

    pub fn carousel(&self) -> &EventCarousel {
        &self.carousel
    }

    /// Manually drives the carousel timer.
    pub fn tick(&self, elapsed: Duration) -> usize {
        self.carousel.advance(elapsed)
    }

    pub fn is_open(&self) -> bool {
        self.feed.is_some()
    }

    /// Cancels the subscription, stops the timer and closes the carousel.
    pub fn close(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
        if let Some(feed) = self.feed.take() {
            feed.close();
            info!("event=spark_close module=view status=ok");
        }
        self.carousel.close();
    }
}

impl Drop for SparkView {
    fn drop(&mut self) {
        self.close();
    }
}
