use house_score_core::photo::PLACEHOLDER_PHOTO;
use house_score_core::{
    sample_events, AdminService, AutoAdvance, DashboardConfig, Event, EventCarousel, EventDraft,
    EventId, EventStore, FeedMode, MemoryEventStore, SparkView, StandingsProjection, StoreAccess,
    Winner,
};
use std::thread;
use std::time::{Duration, Instant};

const HOUSES: [&str; 4] = ["Delany", "Gandhi", "Tagore", "Nehru"];
const FIVE: Duration = Duration::from_secs(5);

fn event(id: &str, winners: Vec<Winner>) -> Event {
    Event {
        id: EventId::new(id),
        name: format!("Event {id}"),
        date: "2025-01-15".to_string(),
        description: None,
        category: None,
        grade_level: None,
        venue: None,
        winners,
    }
}

fn three_events() -> Vec<Event> {
    vec![event("a", Vec::new()), event("b", Vec::new()), event("c", Vec::new())]
}

fn current_id(carousel: &EventCarousel) -> String {
    carousel
        .current_slide()
        .map(|slide| slide.event_id.to_string())
        .unwrap_or_default()
}

#[test]
fn standings_projection_follows_store_changes() {
    let store = MemoryEventStore::new();
    let admin = AdminService::new(&store);
    let projection = StandingsProjection::new(&HOUSES);
    let feed = projection.attach(&store);
    assert_eq!(feed.mode(), FeedMode::Live);
    assert_eq!(projection.current().total_points, 0);

    let mut draft = EventDraft::new("Dance").on("2025-01-15");
    draft.winners = vec![Winner::new(1, "Tagore", "A", 10)];
    let id = admin.add_event(draft).unwrap();

    let standings = projection.current();
    assert_eq!(standings.leader().map(|s| s.house.as_str()), Some("Tagore"));
    assert_eq!(standings.leader().map(|s| s.rank), Some(1));

    admin.delete_event(&id).unwrap();
    let standings = projection.current();
    assert_eq!(standings.total_points, 0);
    assert_eq!(standings.leader().map(|s| s.house.as_str()), Some("Delany"));
}

#[test]
fn closed_feed_stops_refreshing_projection() {
    let store = MemoryEventStore::new();
    let projection = StandingsProjection::new(&HOUSES);
    let feed = projection.attach(&store);
    feed.close();
    assert_eq!(store.subscriber_count(), 0);

    let mut input = house_score_core::EventInput::new("Dance", "2025-01-15");
    input.winners = vec![Winner::new(1, "Gandhi", "A", 10)];
    store.create(&input).unwrap();
    assert_eq!(projection.current().total_points, 0);
}

#[test]
fn denied_subscription_falls_back_to_sample_data() {
    let store = MemoryEventStore::new();
    store.set_access(StoreAccess::Denied);
    let projection = StandingsProjection::new(&HOUSES);

    let feed = projection.attach(&store);
    assert_eq!(feed.mode(), FeedMode::Sample);
    assert!(!feed.is_live());

    let expected = house_score_core::Standings::from_events(&sample_events(), &HOUSES);
    assert_eq!(projection.current(), expected);
    assert!(projection.current().total_points > 0);
}

#[test]
fn carousel_advances_once_per_interval() {
    let carousel = EventCarousel::new(FIVE);
    carousel.refresh(&three_events());

    assert_eq!(carousel.advance(Duration::from_secs(4)), 0);
    assert_eq!(current_id(&carousel), "a");
    assert_eq!(carousel.advance(Duration::from_secs(1)), 1);
    assert_eq!(current_id(&carousel), "b");
    assert_eq!(carousel.advance(FIVE), 1);
    assert_eq!(current_id(&carousel), "c");
    assert_eq!(carousel.advance(FIVE), 1);
    assert_eq!(current_id(&carousel), "a", "wraps around");
}

#[test]
fn large_elapsed_values_step_without_overflow() {
    let carousel = EventCarousel::new(FIVE);
    carousel.refresh(&three_events());

    assert_eq!(carousel.advance(Duration::from_secs(16)), 3);
    assert_eq!(current_id(&carousel), "a");
    assert_eq!(carousel.advance(Duration::from_secs(4)), 1, "remainder carried over");
    assert_eq!(current_id(&carousel), "b");

    let steps = carousel.advance(Duration::MAX);
    assert!(steps > 0);
    let steps = carousel.advance(Duration::MAX);
    assert!(steps > 0);
    assert!(carousel.current_index() < 3);
}

#[test]
fn manual_navigation_resets_timer() {
    let carousel = EventCarousel::new(FIVE);
    carousel.refresh(&three_events());

    carousel.advance(Duration::from_secs(4));
    assert!(carousel.next());
    assert_eq!(current_id(&carousel), "b");

    assert_eq!(carousel.advance(Duration::from_secs(1)), 0, "tick after manual nav ignored");
    assert_eq!(current_id(&carousel), "b");
    assert_eq!(carousel.advance(Duration::from_secs(4)), 1);
    assert_eq!(current_id(&carousel), "c");
}

#[test]
fn previous_and_go_to_wrap() {
    let carousel = EventCarousel::new(FIVE);
    carousel.refresh(&three_events());

    assert!(carousel.previous());
    assert_eq!(current_id(&carousel), "c");
    assert!(carousel.go_to(4));
    assert_eq!(current_id(&carousel), "b");
    assert!(carousel.restart());
    assert_eq!(current_id(&carousel), "a");
}

#[test]
fn empty_carousel_has_no_slides_and_ignores_navigation() {
    let carousel = EventCarousel::new(FIVE);
    assert!(carousel.current_slide().is_none());
    assert!(!carousel.next());
    assert!(!carousel.previous());
    assert_eq!(carousel.advance(FIVE), 0);
    assert_eq!(carousel.cycle().count(), 0);
}

#[test]
fn cycle_is_lazy_and_wraps() {
    let carousel = EventCarousel::new(FIVE);
    carousel.refresh(&three_events());

    let ids: Vec<String> = carousel
        .cycle()
        .take(5)
        .map(|slide| slide.event_id.to_string())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c", "a", "b"]);
}

#[test]
fn slides_sort_winners_by_position() {
    let carousel = EventCarousel::new(FIVE);
    carousel.refresh(&[event(
        "a",
        vec![
            Winner::new(3, "Tagore", "C", 5),
            Winner::new(1, "Gandhi", "A", 10).with_photo("https://cdn.example.com/a.jpg"),
            Winner::new(2, "Aloysius", "B", 7),
        ],
    )]);

    let slide = carousel.current_slide().unwrap();
    let order: Vec<(u32, &str)> = slide
        .winners
        .iter()
        .map(|w| (w.position, w.place.as_str()))
        .collect();
    assert_eq!(order, vec![(1, "1st"), (2, "2nd"), (3, "3rd")]);
    assert_eq!(slide.winners[0].photo, "https://cdn.example.com/a.jpg");
    assert_eq!(slide.winners[1].photo, PLACEHOLDER_PHOTO);
    assert_eq!(slide.winners[1].house, "Aloysius", "unknown houses stay visible");
}

#[test]
fn refresh_keeps_selected_event_by_id() {
    let carousel = EventCarousel::new(FIVE);
    carousel.refresh(&three_events());
    carousel.go_to(2);

    let mut reordered = three_events();
    reordered.remove(0);
    carousel.refresh(&reordered);
    assert_eq!(current_id(&carousel), "c");

    carousel.refresh(&[event("a", Vec::new())]);
    assert_eq!(carousel.current_index(), 0);
    assert_eq!(current_id(&carousel), "a");
}

#[test]
fn closed_carousel_ignores_ticks_and_navigation() {
    let carousel = EventCarousel::new(FIVE);
    carousel.refresh(&three_events());
    carousel.close();

    assert_eq!(carousel.advance(Duration::from_secs(60)), 0);
    assert!(!carousel.next());
    assert_eq!(current_id(&carousel), "a");
}

#[test]
fn auto_advance_drives_carousel_and_stops_on_drop() {
    let carousel = EventCarousel::new(Duration::from_millis(20));
    carousel.refresh(&three_events());

    let timer = AutoAdvance::start(carousel.clone(), Duration::from_millis(5)).unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while carousel.current_index() == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_ne!(carousel.current_index(), 0, "timer advanced the carousel");

    drop(timer);
    let frozen = carousel.current_index();
    thread::sleep(Duration::from_millis(60));
    assert_eq!(carousel.current_index(), frozen);
}

#[test]
fn spark_view_feeds_both_projections_from_one_subscription() {
    let store = MemoryEventStore::new();
    let config = DashboardConfig::default();
    let mut view = SparkView::open(&store, &config);
    assert_eq!(view.mode(), Some(FeedMode::Live));
    assert_eq!(store.subscriber_count(), 1);
    assert!(view.current_slide().is_none());

    let admin = AdminService::new(&store);
    let mut draft = EventDraft::new("Dance").on("2025-01-15");
    draft.winners = vec![Winner::new(1, "Nehru", "A", 10)];
    admin.add_event(draft).unwrap();
    admin
        .add_event(EventDraft::new("Debate").on("2025-01-20"))
        .unwrap();

    assert_eq!(view.standings().leader().map(|s| s.house.as_str()), Some("Nehru"));
    assert_eq!(view.current_slide().map(|s| s.name), Some("Dance".to_string()));
    assert_eq!(view.tick(config.carousel_interval()), 1);
    assert_eq!(view.current_slide().map(|s| s.name), Some("Debate".to_string()));

    view.close();
    assert!(!view.is_open());
    assert_eq!(store.subscriber_count(), 0);
    assert_eq!(view.tick(config.carousel_interval()), 0);
}

#[test]
fn dropping_spark_view_releases_subscription() {
    let store = MemoryEventStore::new();
    {
        let _view = SparkView::open_with_timer(&store, &DashboardConfig::default());
        assert_eq!(store.subscriber_count(), 1);
    }
    assert_eq!(store.subscriber_count(), 0);
}
