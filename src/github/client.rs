use crate::error::{Result, SeatscanError};
use octocrab::Octocrab;
use serde::Deserialize;
use std::time::Duration;

/// Page size for every paginated GitHub collection we walk.
pub const PAGE_SIZE: usize = 100;

/// Total attempts per request, counting the first one.
const MAX_ATTEMPTS: u32 = 5;
const BACKOFF_BASE_MS: u64 = 100;
const RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

pub struct GithubClient {
    octocrab: Octocrab,
}

#[derive(Debug, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct Team {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TeamMember {
    pub login: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserDetail {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeatAssignee {
    pub login: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Seat {
    pub assignee: Option<SeatAssignee>,
    pub created_at: Option<String>,
    pub last_activity_at: Option<String>,
    pub pending_cancellation_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeatsPage {
    #[serde(default)]
    pub seats: Vec<Seat>,
}

impl GithubClient {
    pub fn new(token: &str, api_url: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(url) = api_url {
            builder = builder
                .base_uri(url)
                .map_err(|e| SeatscanError::GitHub(e.to_string()))?;
        }
        let octocrab = builder
            .build()
            .map_err(|e| SeatscanError::GitHub(e.to_string()))?;
        Ok(Self { octocrab })
    }

    /// One authenticated identity check. Must succeed before any organization
    /// is processed.
    pub async fn validate_token(&self) -> Result<AuthenticatedUser> {
        match self.get_with_retry("/user", None::<&()>).await {
            Ok(user) => Ok(user),
            Err(octocrab::Error::GitHub { source, .. }) => {
                if source.status_code.as_u16() == 401 {
                    Err(SeatscanError::InvalidCredential(source.message.clone()))
                } else {
                    Err(SeatscanError::CredentialCheckFailed(format!(
                        "{} - {}",
                        source.status_code, source.message
                    )))
                }
            }
            Err(err) => Err(SeatscanError::CredentialCheckFailed(err.to_string())),
        }
    }

    pub async fn teams_page(&self, org: &str, page: u32) -> octocrab::Result<Vec<Team>> {
        self.get_with_retry(
            &format!("/orgs/{org}/teams"),
            Some(&[("per_page", "100"), ("page", &page.to_string())]),
        )
        .await
    }

    pub async fn team_members_page(
        &self,
        org: &str,
        slug: &str,
        page: u32,
    ) -> octocrab::Result<Vec<TeamMember>> {
        self.get_with_retry(
            &format!("/orgs/{org}/teams/{slug}/members"),
            Some(&[("per_page", "100"), ("page", &page.to_string())]),
        )
        .await
    }

    pub async fn user_detail(&self, username: &str) -> octocrab::Result<UserDetail> {
        self.get_with_retry(&format!("/users/{username}"), None::<&()>)
            .await
    }

    pub async fn copilot_seats_page(&self, org: &str, page: u32) -> octocrab::Result<SeatsPage> {
        self.get_with_retry(
            &format!("/orgs/{org}/copilot/billing/seats"),
            Some(&[("per_page", "100"), ("page", &page.to_string())]),
        )
        .await
    }

    /// GET with bounded retry: transient server errors (500/502/503/504) are
    /// retried up to `MAX_ATTEMPTS` total attempts with doubling backoff.
    /// Everything else propagates on the first failure.
    async fn get_with_retry<R, P>(&self, route: &str, parameters: Option<&P>) -> octocrab::Result<R>
    where
        R: serde::de::DeserializeOwned,
        P: serde::Serialize + ?Sized,
    {
        let mut attempt = 1;
        loop {
            match self.octocrab.get(route, parameters).await {
                Err(err) if attempt < MAX_ATTEMPTS && is_retryable(&err) => {
                    let delay = backoff_delay(attempt);
                    log::debug!(
                        "Retrying GET {route} after {}ms (attempt {attempt} failed: {})",
                        delay.as_millis(),
                        describe_error(&err)
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

fn is_retryable(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. }
        if RETRY_STATUSES.contains(&source.status_code.as_u16()))
}

fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(BACKOFF_BASE_MS << (attempt - 1))
}

/// Status and body of a failed call, kept together for the debug log.
pub fn describe_error(err: &octocrab::Error) -> String {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            format!("{} - {}", source.status_code, source.message)
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(1), Duration::from_millis(100));
        assert_eq!(backoff_delay(2), Duration::from_millis(200));
        assert_eq!(backoff_delay(3), Duration::from_millis(400));
        assert_eq!(backoff_delay(4), Duration::from_millis(800));
    }

    #[test]
    fn only_server_errors_are_retryable() {
        for status in [500, 502, 503, 504] {
            assert!(RETRY_STATUSES.contains(&status));
        }
        for status in [401, 403, 404, 422, 429] {
            assert!(!RETRY_STATUSES.contains(&status));
        }
    }

    #[test]
    fn seats_page_defaults_to_empty_list() {
        let page: SeatsPage = serde_json::from_str(r#"{"total_seats": 0}"#).unwrap();
        assert!(page.seats.is_empty());
    }

    #[test]
    fn seat_optional_fields_deserialize_as_none() {
        let seat: Seat = serde_json::from_str(r#"{"assignee": {"login": "octocat"}}"#).unwrap();
        assert_eq!(seat.assignee.unwrap().login.as_deref(), Some("octocat"));
        assert!(seat.created_at.is_none());
        assert!(seat.last_activity_at.is_none());
        assert!(seat.pending_cancellation_date.is_none());
    }
}
