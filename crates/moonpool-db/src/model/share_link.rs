use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use moonpool_core::constants::SHARED_CALENDAR_PATH;

use crate::db::schema::share_link;

/// A tokenized read-only entry point to an owner's calendar.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = share_link)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShareLink {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub token: String,
    pub is_public: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = share_link)]
pub struct NewShareLink<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub token: &'a str,
    pub is_public: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShareLink {
    /// Whether the link has passed its expiry instant. Links without an
    /// expiry never expire.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Public URL the token is served under, relative to the given origin.
    #[must_use]
    pub fn share_url(&self, origin: &str) -> String {
        format!(
            "{}{SHARED_CALENDAR_PATH}/{}",
            origin.trim_end_matches('/'),
            self.token
        )
    }

    /// Iframe snippet embedding the shared calendar view.
    #[must_use]
    pub fn embed_code(&self, origin: &str) -> String {
        format!(
            "<iframe src=\"{}\" width=\"100%\" height=\"600\" frameborder=\"0\"></iframe>",
            self.share_url(origin)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(expires_at: Option<DateTime<Utc>>) -> ShareLink {
        let now = Utc::now();
        ShareLink {
            id: Uuid::now_v7(),
            owner_id: Uuid::now_v7(),
            token: "abc123".to_string(),
            is_public: true,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn link_without_expiry_never_expires() {
        assert!(!link(None).is_expired(Utc::now() + Duration::days(10_000)));
    }

    #[test]
    fn link_expires_at_the_exact_instant() {
        let now = Utc::now();
        let l = link(Some(now));
        assert!(l.is_expired(now));
        assert!(!l.is_expired(now - Duration::seconds(1)));
    }

    #[test]
    fn share_url_strips_trailing_slash_from_origin() {
        let l = link(None);
        assert_eq!(
            l.share_url("https://dive.example.com/"),
            "https://dive.example.com/operations-calendar/shared/abc123"
        );
    }

    #[test]
    fn embed_code_wraps_share_url_in_iframe() {
        let l = link(None);
        let embed = l.embed_code("https://dive.example.com");
        assert!(embed.starts_with("<iframe src=\"https://dive.example.com/"));
        assert!(embed.contains("/operations-calendar/shared/abc123\""));
        assert!(embed.ends_with("</iframe>"));
    }
}
