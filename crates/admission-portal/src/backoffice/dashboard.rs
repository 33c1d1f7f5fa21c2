use std::fmt;

use chrono::{DateTime, Utc};

use crate::api::types::parse_timestamp;
use crate::api::{
    ApiError, EventRecord, NewsArticle, PortalClient, SubmittedApplication, Testimony,
    TestimonyStatus,
};

/// Most recent items shown in the activity feed.
pub const RECENT_ACTIVITY_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    News,
    Event,
    Testimony,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActivityKind::News => "news",
            ActivityKind::Event => "event",
            ActivityKind::Testimony => "testimony",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub title: String,
    pub at: DateTime<Utc>,
}

impl ActivityItem {
    /// `12m ago`, `3h ago`, `2d ago`.
    pub fn age(&self, now: DateTime<Utc>) -> String {
        let minutes = (now - self.at).num_minutes().max(0);
        if minutes < 60 {
            format!("{minutes}m ago")
        } else if minutes < 60 * 24 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / (60 * 24))
        }
    }
}

/// Headline counts and recent activity for the back-office landing screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardOverview {
    pub news: usize,
    pub events: usize,
    pub pending_testimonies: usize,
    pub applications: usize,
    pub recent_activity: Vec<ActivityItem>,
}

impl DashboardOverview {
    pub async fn load(client: &PortalClient) -> Result<Self, ApiError> {
        let (news, events, testimonies, applications) = tokio::try_join!(
            client.list_news(),
            client.list_events(),
            client.list_testimonies(None),
            client.list_applications(None),
        )?;
        Ok(Self::from_records(&news, &events, &testimonies, &applications))
    }

    pub fn from_records(
        news: &[NewsArticle],
        events: &[EventRecord],
        testimonies: &[Testimony],
        applications: &[SubmittedApplication],
    ) -> Self {
        let pending_testimonies = testimonies
            .iter()
            .filter(|testimony| testimony.status == TestimonyStatus::Pending)
            .count();

        let mut recent_activity: Vec<ActivityItem> = news
            .iter()
            .filter_map(|article| {
                activity(ActivityKind::News, &article.title, article.created_at.as_deref())
            })
            .chain(events.iter().filter_map(|event| {
                let when = (!event.date.trim().is_empty())
                    .then_some(event.date.as_str())
                    .or(event.created_at.as_deref());
                activity(ActivityKind::Event, &event.title, when)
            }))
            .chain(testimonies.iter().filter_map(|testimony| {
                activity(
                    ActivityKind::Testimony,
                    &format!("{} submitted a testimony", testimony.name),
                    testimony.created_at.as_deref(),
                )
            }))
            .collect();
        recent_activity.sort_by(|a, b| b.at.cmp(&a.at));
        recent_activity.truncate(RECENT_ACTIVITY_LIMIT);

        Self {
            news: news.len(),
            events: events.len(),
            pending_testimonies,
            applications: applications.len(),
            recent_activity,
        }
    }
}

fn activity(kind: ActivityKind, title: &str, when: Option<&str>) -> Option<ActivityItem> {
    let at = parse_timestamp(when).or_else(|| {
        // Event dates are often plain calendar days.
        when.and_then(|raw| chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    })?;
    Some(ActivityItem {
        kind,
        title: title.to_string(),
        at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp(raw: &str) -> Option<String> {
        Some(raw.to_string())
    }

    #[test]
    fn counts_and_orders_recent_activity() {
        let news = vec![NewsArticle {
            title: "Matriculation".to_string(),
            created_at: stamp("2026-05-02T10:00:00Z"),
            ..NewsArticle::default()
        }];
        let events = vec![EventRecord {
            title: "Open Day".to_string(),
            date: "2026-05-10".to_string(),
            ..EventRecord::default()
        }];
        let testimonies = vec![
            Testimony {
                name: "Ama".to_string(),
                status: TestimonyStatus::Pending,
                created_at: stamp("2026-05-05T08:00:00Z"),
                ..Testimony::default()
            },
            Testimony {
                name: "Kofi".to_string(),
                status: TestimonyStatus::Approved,
                ..Testimony::default()
            },
        ];
        let applications = vec![SubmittedApplication::default(); 3];

        let overview = DashboardOverview::from_records(&news, &events, &testimonies, &applications);

        assert_eq!(overview.news, 1);
        assert_eq!(overview.events, 1);
        assert_eq!(overview.pending_testimonies, 1);
        assert_eq!(overview.applications, 3);
        let titles: Vec<&str> = overview
            .recent_activity
            .iter()
            .map(|item| item.title.as_str())
            .collect();
        assert_eq!(titles, ["Open Day", "Ama submitted a testimony", "Matriculation"]);
    }

    #[test]
    fn event_date_wins_over_creation_time() {
        let events = vec![
            EventRecord {
                title: "Sports day".to_string(),
                date: "2026-06-01".to_string(),
                created_at: stamp("2026-04-01T08:00:00Z"),
                ..EventRecord::default()
            },
            EventRecord {
                title: "Undated".to_string(),
                created_at: stamp("2026-04-02T08:00:00Z"),
                ..EventRecord::default()
            },
        ];
        let overview = DashboardOverview::from_records(&[], &events, &[], &[]);

        let sports = &overview.recent_activity[0];
        assert_eq!(sports.title, "Sports day");
        assert_eq!(sports.at.format("%Y-%m-%d").to_string(), "2026-06-01");
        let undated = &overview.recent_activity[1];
        assert_eq!(undated.at.format("%Y-%m-%d").to_string(), "2026-04-02");
    }

    #[test]
    fn age_uses_coarsest_unit() {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).single().expect("valid");
        let item = ActivityItem {
            kind: ActivityKind::News,
            title: String::new(),
            at,
        };
        assert_eq!(item.age(at + chrono::Duration::minutes(5)), "5m ago");
        assert_eq!(item.age(at + chrono::Duration::hours(3)), "3h ago");
        assert_eq!(item.age(at + chrono::Duration::days(2)), "2d ago");
    }
}
