use crate::error::Result;
use crate::github::client::{describe_error, GithubClient, Seat, PAGE_SIZE};
use crate::teams::TeamIndex;
use std::io::Write;

pub const HEADERS: [&str; 7] = [
    "Organization",
    "Username",
    "Email",
    "Created At",
    "Last Activity At",
    "Pending Cancellation Date",
    "Team Name",
];

/// Placeholder for absent source fields.
const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for the team-name join when the user is absent from the index.
const NO_TEAMS: &str = "null";

/// Pages through an organization's Copilot seat assignments, joining each
/// seat against the team index, and writes one CSV row per seat. A failed
/// page fetch ends this organization's report but not the run. Returns the
/// number of rows written.
pub async fn emit_seat_rows<W: Write>(
    client: &GithubClient,
    org: &str,
    index: &TeamIndex,
    writer: &mut csv::Writer<W>,
) -> Result<usize> {
    let mut rows = 0usize;
    let mut page = 1u32;
    loop {
        let seats_page = match client.copilot_seats_page(org, page).await {
            Ok(seats_page) => seats_page,
            Err(err) => {
                log::error!(
                    "Failed to fetch seat information for {org}: {}",
                    describe_error(&err)
                );
                break;
            }
        };
        if seats_page.seats.is_empty() {
            log::debug!("No more seat assignments for {org} (page {page})");
            break;
        }
        let last_page = seats_page.seats.len() < PAGE_SIZE;
        for seat in &seats_page.seats {
            let username = assignee_login(seat);
            let email = fetch_email(client, &username).await;
            let teams = team_names(index, &username);
            writer.write_record(seat_record(org, seat, &username, &email, &teams))?;
            writer.flush()?;
            rows += 1;
            log::debug!("Wrote seat row for user: {username}, teams: {teams}, email: {email}");
        }
        if last_page {
            break;
        }
        page += 1;
    }
    Ok(rows)
}

/// Resolves a username to its public email, or "N/A" when unset or when the
/// lookup fails. Never fatal.
async fn fetch_email(client: &GithubClient, username: &str) -> String {
    match client.user_detail(username).await {
        Ok(user) => user.email.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        Err(err) => {
            log::error!(
                "Failed to fetch details for user {username}: {}",
                describe_error(&err)
            );
            NOT_AVAILABLE.to_string()
        }
    }
}

fn assignee_login(seat: &Seat) -> String {
    seat.assignee
        .as_ref()
        .and_then(|assignee| assignee.login.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn seat_record(
    org: &str,
    seat: &Seat,
    username: &str,
    email: &str,
    teams: &str,
) -> [String; 7] {
    [
        org.to_string(),
        username.to_string(),
        email.to_string(),
        field_or_na(seat.created_at.as_deref()),
        field_or_na(seat.last_activity_at.as_deref()),
        field_or_na(seat.pending_cancellation_date.as_deref()),
        teams.to_string(),
    ]
}

fn field_or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn team_names(index: &TeamIndex, username: &str) -> String {
    match index.get(username) {
        Some(teams) => teams.join(", "),
        None => NO_TEAMS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::client::SeatAssignee;

    fn seat(login: Option<&str>) -> Seat {
        Seat {
            assignee: login.map(|login| SeatAssignee {
                login: Some(login.to_string()),
            }),
            created_at: None,
            last_activity_at: None,
            pending_cancellation_date: None,
        }
    }

    #[test]
    fn absent_fields_become_na() {
        let record = seat_record("acme", &seat(Some("octocat")), "octocat", "N/A", "null");
        assert_eq!(record[3], "N/A");
        assert_eq!(record[4], "N/A");
        assert_eq!(record[5], "N/A");
        assert_eq!(record[6], "null");
    }

    #[test]
    fn missing_assignee_becomes_na() {
        assert_eq!(assignee_login(&seat(None)), "N/A");
    }

    #[test]
    fn unindexed_user_gets_null_team_field() {
        let index = TeamIndex::new();
        assert_eq!(team_names(&index, "octocat"), "null");
    }

    #[test]
    fn team_names_join_in_discovery_order() {
        let mut index = TeamIndex::new();
        index.insert(
            "octocat".to_string(),
            vec!["Platform".to_string(), "Security".to_string(), "Platform".to_string()],
        );
        assert_eq!(team_names(&index, "octocat"), "Platform, Security, Platform");
    }
}
