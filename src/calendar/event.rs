use chrono::{NaiveDate, NaiveTime, Timelike};

/// Category tag carried by every event. Only drives colour and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
    Training,
    Match,
    Meeting,
    Medical,
    Recovery,
    Meal,
    Rest,
    #[default]
    Other,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::Training,
        EventKind::Match,
        EventKind::Meeting,
        EventKind::Medical,
        EventKind::Recovery,
        EventKind::Meal,
        EventKind::Rest,
        EventKind::Other,
    ];

    /// Case-insensitive lookup; anything unrecognised is `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "training" => EventKind::Training,
            "match" | "game" => EventKind::Match,
            "meeting" => EventKind::Meeting,
            "medical" => EventKind::Medical,
            "recovery" => EventKind::Recovery,
            "meal" => EventKind::Meal,
            "rest" => EventKind::Rest,
            _ => EventKind::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Training => "Training",
            EventKind::Match => "Match",
            EventKind::Meeting => "Meeting",
            EventKind::Medical => "Medical",
            EventKind::Recovery => "Recovery",
            EventKind::Meal => "Meal",
            EventKind::Rest => "Rest",
            EventKind::Other => "Other",
        }
    }

    pub fn icon(&self) -> char {
        match self {
            EventKind::Training => 'T',
            EventKind::Match => 'M',
            EventKind::Meeting => 'm',
            EventKind::Medical => '+',
            EventKind::Recovery => 'r',
            EventKind::Meal => 'f',
            EventKind::Rest => 'z',
            EventKind::Other => '*',
        }
    }

    /// Key used for per-kind overrides in the theme table.
    pub fn config_key(&self) -> &'static str {
        match self {
            EventKind::Training => "training",
            EventKind::Match => "match",
            EventKind::Meeting => "meeting",
            EventKind::Medical => "medical",
            EventKind::Recovery => "recovery",
            EventKind::Meal => "meal",
            EventKind::Rest => "rest",
            EventKind::Other => "other",
        }
    }
}

/// A validated event. `date` is already the viewer's local calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub kind: EventKind,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub team: Option<String>,
}

impl CalendarEvent {
    pub fn time_range_display(&self) -> String {
        let start = self.start_time.format("%H:%M");
        match self.end_time {
            Some(end) => format!("{} - {}", start, end.format("%H:%M")),
            None => start.to_string(),
        }
    }

    /// Whether the event occupies any part of `hour` on its own day.
    pub fn overlaps_hour(&self, hour: u32) -> bool {
        let start_hour = self.start_time.hour();
        let end_hour = match self.end_time {
            Some(end) if end > self.start_time => {
                if end.minute() > 0 {
                    end.hour()
                } else {
                    end.hour().saturating_sub(1)
                }
            }
            _ => start_hour,
        };
        hour >= start_hour && hour <= end_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start: (u32, u32), end: Option<(u32, u32)>) -> CalendarEvent {
        CalendarEvent {
            id: "1".to_string(),
            title: "Session".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: end.map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap()),
            kind: EventKind::Training,
            location: None,
            notes: None,
            team: None,
        }
    }

    #[test]
    fn kind_from_tag_is_case_insensitive() {
        assert_eq!(EventKind::from_tag("Training"), EventKind::Training);
        assert_eq!(EventKind::from_tag(" MATCH "), EventKind::Match);
        assert_eq!(EventKind::from_tag("physio"), EventKind::Other);
        assert_eq!(EventKind::from_tag(""), EventKind::Other);
    }

    #[test]
    fn time_range_with_and_without_end() {
        assert_eq!(event((9, 0), Some((10, 30))).time_range_display(), "09:00 - 10:30");
        assert_eq!(event((14, 5), None).time_range_display(), "14:05");
    }

    #[test]
    fn overlaps_hour_excludes_end_on_the_hour() {
        let ev = event((9, 0), Some((11, 0)));
        assert!(!ev.overlaps_hour(8));
        assert!(ev.overlaps_hour(9));
        assert!(ev.overlaps_hour(10));
        assert!(!ev.overlaps_hour(11));

        let ev = event((9, 30), Some((11, 15)));
        assert!(ev.overlaps_hour(11));

        let ev = event((18, 0), None);
        assert!(ev.overlaps_hour(18));
        assert!(!ev.overlaps_hour(19));
    }
}
