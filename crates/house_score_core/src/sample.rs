//! Built-in sample events used when the store cannot be read.

use crate::model::event::{Category, Event, EventId, GradeLevel, Winner};

/// Returns the fixed demo data set shown in degraded mode.
pub fn sample_events() -> Vec<Event> {
    vec![
        Event {
            id: EventId::new("1"),
            name: "Dance Competition".to_string(),
            date: "2025-01-15".to_string(),
            description: Some("Inter-house dance competition".to_string()),
            category: Some(Category::Group),
            grade_level: Some(GradeLevel::Senior),
            venue: Some("Auditorium".to_string()),
            winners: vec![
                Winner::new(1, "Delany", "John Doe", 10),
                Winner::new(2, "Gandhi", "Jane Smith", 8),
                Winner::new(3, "Tagore", "Mike Johnson", 6),
                Winner::new(4, "Nehru", "Alex Kumar", 4),
            ],
        },
        Event {
            id: EventId::new("2"),
            name: "Debate Competition".to_string(),
            date: "2025-01-20".to_string(),
            description: Some("Inter-house debate competition".to_string()),
            category: Some(Category::Individual),
            grade_level: Some(GradeLevel::Senior),
            venue: Some("Conference Room".to_string()),
            winners: vec![
                Winner::new(1, "Gandhi", "Sarah Wilson", 10),
                Winner::new(2, "Aloysius", "Tom Brown", 8),
                Winner::new(3, "Delany", "Lisa Davis", 6),
                Winner::new(4, "Nehru", "Priya Sharma", 4),
            ],
        },
    ]
}
