use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::page::{ItemSummary, Summary};
use crate::utils::format::{format_date, strip_html};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(alias = "startDate", alias = "date")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate", default)]
    pub end_date: Option<String>,
    #[serde(alias = "location", default)]
    pub venue: Option<String>,
    #[serde(alias = "eventType", default)]
    pub category: Option<String>,
    #[serde(alias = "registrationLink", default)]
    pub registration_link: Option<String>,
    #[serde(default)]
    pub speakers: Vec<String>,
}

impl Event {
    pub fn formatted_date(&self) -> String {
        match &self.start_date {
            Some(date) => format_date(date),
            None => "TBD".to_string(),
        }
    }

    /// Formatted start: "Feb 06, 2026 @ 07:00 PM"
    pub fn formatted_start_datetime(&self) -> String {
        match &self.start_date {
            Some(date) => match DateTime::parse_from_rfc3339(date) {
                Ok(dt) => dt.format("%b %d, %Y @ %I:%M %p").to_string(),
                Err(_) => date.chars().take(16).collect(),
            },
            None => "TBD".to_string(),
        }
    }

    /// Events without a parseable start date count as upcoming.
    pub fn is_upcoming(&self) -> bool {
        self.start_date
            .as_deref()
            .and_then(|date| DateTime::parse_from_rfc3339(date).ok())
            .map(|dt| dt.with_timezone(&Utc) >= Utc::now())
            .unwrap_or(true)
    }

    /// Category, inferred from the title when the API leaves it blank.
    pub fn derived_category(&self) -> &str {
        if let Some(ref category) = self.category {
            if !category.is_empty() {
                return category;
            }
        }

        let title = self.title.to_lowercase();
        if title.contains("hackathon") {
            "Hackathon"
        } else if title.contains("workshop") || title.contains("bootcamp") {
            "Workshop"
        } else if title.contains("talk") || title.contains("seminar") || title.contains("webinar") {
            "Talk"
        } else if title.contains("contest") || title.contains("competition") {
            "Contest"
        } else {
            "Event"
        }
    }
}

impl Summary for Event {
    fn summarize(&self) -> ItemSummary {
        let status = if self.is_upcoming() { "Upcoming" } else { "Past" };

        let mut details = vec![
            ("Starts", self.formatted_start_datetime()),
            ("Type", self.derived_category().to_string()),
            ("Status", status.to_string()),
        ];
        if let Some(ref venue) = self.venue {
            details.push(("Venue", venue.clone()));
        }
        if !self.speakers.is_empty() {
            details.push(("Speakers", self.speakers.join(", ")));
        }
        if let Some(ref link) = self.registration_link {
            details.push(("Register", link.clone()));
        }

        ItemSummary {
            headline: self.title.clone(),
            meta: format!("{} · {}", self.formatted_date(), self.derived_category()),
            details,
            description: self.description.as_deref().map(strip_html),
            photos: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(title: &str, category: Option<&str>) -> Event {
        Event {
            id: 1,
            title: title.to_string(),
            description: None,
            start_date: Some("2030-02-06T19:00:00Z".to_string()),
            end_date: None,
            venue: None,
            category: category.map(str::to_string),
            registration_link: None,
            speakers: vec![],
        }
    }

    #[test]
    fn test_event_deserializes_aliases() {
        let event: Event = serde_json::from_value(json!({
            "id": 7,
            "title": "Intro to Rust",
            "date": "2030-01-10T10:00:00Z",
            "location": "Lab 3",
            "eventType": "Workshop"
        }))
        .unwrap();

        assert_eq!(event.venue.as_deref(), Some("Lab 3"));
        assert_eq!(event.category.as_deref(), Some("Workshop"));
        assert_eq!(event.formatted_date(), "Jan 10, 2030");
    }

    #[test]
    fn test_derived_category_from_title() {
        assert_eq!(event("Winter Hackathon", None).derived_category(), "Hackathon");
        assert_eq!(event("Git Workshop", Some("")).derived_category(), "Workshop");
        assert_eq!(event("Alumni Talk", None).derived_category(), "Talk");
        assert_eq!(event("Freshers Meetup", None).derived_category(), "Event");
        assert_eq!(event("Anything", Some("Social")).derived_category(), "Social");
    }

    #[test]
    fn test_upcoming() {
        assert!(event("Future", None).is_upcoming());
        let mut past = event("Past", None);
        past.start_date = Some("2001-01-01T00:00:00Z".to_string());
        assert!(!past.is_upcoming());
    }

    #[test]
    fn test_summary_strips_html() {
        let mut e = event("Talk", None);
        e.description = Some("<p>Bring a <b>laptop</b></p>".to_string());
        let summary = e.summarize();
        assert_eq!(summary.description.as_deref(), Some("Bring a laptop"));
        assert_eq!(summary.headline, "Talk");
    }
}
