use crate::github::client::{describe_error, GithubClient, PAGE_SIZE};
use std::collections::HashMap;

/// Per-organization mapping from username to the display names of the teams
/// that user belongs to, in discovery order. Rebuilt for every organization,
/// never shared across them.
pub type TeamIndex = HashMap<String, Vec<String>>;

/// Walks all teams and all members per team for one organization. A page that
/// fails leaves the index partial from that point; this never aborts the run.
pub async fn build_team_index(client: &GithubClient, org: &str) -> TeamIndex {
    let mut index = TeamIndex::new();
    let mut page = 1u32;
    loop {
        let teams = match client.teams_page(org, page).await {
            Ok(teams) => teams,
            Err(err) => {
                log::debug!(
                    "Stopping team listing for {org} on page {page}: {}",
                    describe_error(&err)
                );
                break;
            }
        };
        if teams.is_empty() {
            break;
        }
        let last_page = teams.len() < PAGE_SIZE;
        for team in teams {
            let name = team.name.unwrap_or_else(|| "N/A".to_string());
            let slug = team.slug.unwrap_or_default().to_lowercase();
            if slug.is_empty() {
                // No members endpoint without a slug.
                continue;
            }
            collect_members(client, org, &slug, &name, &mut index).await;
        }
        if last_page {
            break;
        }
        page += 1;
    }
    index
}

async fn collect_members(
    client: &GithubClient,
    org: &str,
    slug: &str,
    team_name: &str,
    index: &mut TeamIndex,
) {
    let mut page = 1u32;
    loop {
        let members = match client.team_members_page(org, slug, page).await {
            Ok(members) => members,
            Err(err) => {
                log::debug!(
                    "Stopping member listing for {org}/{slug} on page {page}: {}",
                    describe_error(&err)
                );
                break;
            }
        };
        if members.is_empty() {
            break;
        }
        let last_page = members.len() < PAGE_SIZE;
        for member in members {
            if let Some(login) = member.login {
                index.entry(login).or_default().push(team_name.to_string());
            }
        }
        if last_page {
            break;
        }
        page += 1;
    }
}
