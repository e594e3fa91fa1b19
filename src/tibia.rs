//! TibiaData API client for guild rosters.
//!
//! This module provides:
//!
//! - `GuildGateway`: the async contract the refresh coordinator talks to
//! - `TibiaClient`: HTTP implementation backed by the public TibiaData v4 API
//! - `GuildSummary`, `GuildSnapshot`, `MemberRecord`: deserialized API payloads
//! - `GatewayError`: every failure mode folded into a small typed set
//!
//! The client never retries. Recovery is left to the caller, which polls on
//! a fixed interval anyway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// TibiaData API base URL
pub const DEFAULT_API_BASE: &str = "https://api.tibiadata.com/v4";

/// User agent for API requests
const USER_AGENT: &str = concat!("Guildwatch/", env!("CARGO_PKG_VERSION"));

/// Upper bound for one API request, connect included
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors returned by a guild gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Transport failure, unexpected status, or a body we could not read
    #[error("Guild data unavailable: {0}")]
    Unavailable(String),

    /// The remote source has no data for this guild
    #[error("Guild \"{guild}\" not found or has no data available")]
    NotFound { guild: String },

    /// Caller passed an argument the API cannot accept
    #[error("Invalid request: {0}")]
    InvalidRequest(&'static str),
}

/// Coarse classification of a `GatewayError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unavailable,
    NotFound,
    InvalidRequest,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Unavailable(_) => ErrorKind::Unavailable,
            GatewayError::NotFound { .. } => ErrorKind::NotFound,
            GatewayError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// Guild name the error refers to, if any
    pub fn guild(&self) -> Option<&str> {
        match self {
            GatewayError::NotFound { guild } => Some(guild),
            _ => None,
        }
    }

    fn transport(err: reqwest::Error) -> Self {
        GatewayError::Unavailable(err.to_string())
    }
}

/// An active guild on a world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSummary {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Online state of a guild member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Online,
    #[serde(other)]
    Offline,
}

impl MemberStatus {
    pub fn is_online(self) -> bool {
        self == MemberStatus::Online
    }
}

/// A single guild member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub rank: String,
    pub vocation: String,
    pub level: u32,
    pub joined: String,
    pub status: MemberStatus,
}

/// A guild's detail at one point in time.
///
/// The aggregate counters come straight from the API and are not recomputed
/// from `members`; the remote source is occasionally inconsistent and its own
/// totals are what players see on the website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSnapshot {
    pub name: String,
    #[serde(default)]
    pub world: String,
    #[serde(default)]
    pub founded: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub players_online: u32,
    #[serde(default)]
    pub players_offline: u32,
    #[serde(default)]
    pub members_total: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub members: Vec<MemberRecord>,
}

/// Status block embedded in every TibiaData response
#[derive(Debug, Default, Deserialize)]
struct ApiInformation {
    #[serde(default)]
    status: ApiStatus,
}

#[derive(Debug, Default, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    http_code: u16,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GuildListResponse {
    guilds: GuildListData,
    #[serde(default)]
    information: ApiInformation,
}

#[derive(Debug, Deserialize)]
struct GuildListData {
    #[serde(default, deserialize_with = "null_as_empty")]
    active: Vec<GuildSummary>,
    // `formation` guilds are skipped; they have no roster yet
}

#[derive(Debug, Deserialize)]
struct GuildDetailResponse {
    /// Decoded only once the embedded status says the guild exists
    #[serde(default)]
    guild: Option<serde_json::Value>,
    #[serde(default)]
    information: ApiInformation,
}

/// TibiaData sends `null` for empty lists
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Source of guild data for the refresh coordinator
#[async_trait]
pub trait GuildGateway: Send + Sync {
    /// List the active guilds of a world
    async fn list_guilds(&self, world: &str) -> Result<Vec<GuildSummary>, GatewayError>;

    /// Fetch one guild's detail by name
    async fn fetch_guild_detail(&self, name: &str) -> Result<GuildSnapshot, GatewayError>;
}

/// TibiaData API client
#[derive(Clone)]
pub struct TibiaClient {
    client: reqwest::Client,
    base_url: String,
}

impl TibiaClient {
    /// Create a new client against the given API base URL
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`.
    /// A timed-out request surfaces as `GatewayError::Unavailable`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn guilds_url(&self, world: &str) -> String {
        format!("{}/guilds/{}", self.base_url, urlencoding::encode(world))
    }

    fn guild_url(&self, name: &str) -> String {
        format!("{}/guild/{}", self.base_url, urlencoding::encode(name))
    }
}

#[async_trait]
impl GuildGateway for TibiaClient {
    async fn list_guilds(&self, world: &str) -> Result<Vec<GuildSummary>, GatewayError> {
        if world.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("world must not be empty"));
        }

        let start = std::time::Instant::now();
        let url = self.guilds_url(world);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(GatewayError::transport)?;

        check_status(response.status(), None)?;

        let body: GuildListResponse = response.json().await.map_err(GatewayError::transport)?;
        let guilds = parse_guild_list(body)?;

        tracing::info!(
            "Fetched {} active guilds for {} in {:.1}s",
            guilds.len(),
            world,
            start.elapsed().as_secs_f32()
        );
        Ok(guilds)
    }

    async fn fetch_guild_detail(&self, name: &str) -> Result<GuildSnapshot, GatewayError> {
        if name.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("guild name must not be empty"));
        }

        let url = self.guild_url(name);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(GatewayError::transport)?;

        check_status(response.status(), Some(name))?;

        let body: GuildDetailResponse =
            response.json().await.map_err(GatewayError::transport)?;
        parse_guild_detail(name, body)
    }
}

/// Map an HTTP status to the gateway error set.
/// A 404 only means "not found" when a specific guild was requested.
fn check_status(status: StatusCode, guild: Option<&str>) -> Result<(), GatewayError> {
    if status.is_success() {
        return Ok(());
    }

    match guild {
        Some(guild) if status == StatusCode::NOT_FOUND => Err(GatewayError::NotFound {
            guild: guild.to_string(),
        }),
        _ => Err(GatewayError::Unavailable(format!(
            "API error: {}",
            status
        ))),
    }
}

fn parse_guild_list(body: GuildListResponse) -> Result<Vec<GuildSummary>, GatewayError> {
    let code = body.information.status.http_code;
    if code != 0 && !(200..300).contains(&code) {
        return Err(GatewayError::Unavailable(
            body.information
                .status
                .message
                .unwrap_or_else(|| format!("API reported status {}", code)),
        ));
    }

    Ok(body.guilds.active)
}

fn parse_guild_detail(name: &str, body: GuildDetailResponse) -> Result<GuildSnapshot, GatewayError> {
    // TibiaData reports missing guilds inside the payload as well as via HTTP
    if body.information.status.http_code == 404 {
        return Err(GatewayError::NotFound {
            guild: name.to_string(),
        });
    }

    let guild = body
        .guild
        .ok_or_else(|| GatewayError::Unavailable("response contained no guild".to_string()))?;
    serde_json::from_value(guild)
        .map_err(|e| GatewayError::Unavailable(format!("malformed guild data: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUILD_LIST: &str = r#"{
        "guilds": {
            "world": "Inabra",
            "active": [
                {"name": "Red Phoenix", "logo_url": "https://x/a.gif", "description": "We rise."},
                {"name": "Blue Dragons", "logo_url": "https://x/b.gif", "description": ""}
            ],
            "formation": [
                {"name": "Fresh Start", "logo_url": "https://x/c.gif", "description": "soon"}
            ]
        },
        "information": {"api": {"version": 4}, "status": {"http_code": 200}}
    }"#;

    const GUILD_DETAIL: &str = r#"{
        "guild": {
            "name": "Red Phoenix",
            "world": "Inabra",
            "logo_url": "https://x/a.gif",
            "description": "We rise.",
            "guildhalls": null,
            "active": true,
            "founded": "2019-05-06",
            "open_applications": true,
            "homepage": "",
            "in_war": false,
            "players_online": 1,
            "players_offline": 4,
            "members_total": 5,
            "members_invited": 0,
            "members": [
                {"name": "Ayla Storm", "title": "", "rank": "Leader", "vocation": "Elder Druid",
                 "level": 412, "joined": "2019-05-06", "status": "online"},
                {"name": "Brutus", "title": "The Wall", "rank": "Vice Leader", "vocation": "Elite Knight",
                 "level": 380, "joined": "2020-01-10", "status": "offline"}
            ],
            "invites": null
        },
        "information": {"status": {"http_code": 200}}
    }"#;

    #[test]
    fn test_guild_list_keeps_only_active() {
        let body: GuildListResponse = serde_json::from_str(GUILD_LIST).unwrap();
        let guilds = parse_guild_list(body).unwrap();

        let names: Vec<&str> = guilds.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Red Phoenix", "Blue Dragons"]);
        assert_eq!(guilds[0].description, "We rise.");
    }

    #[test]
    fn test_guild_list_null_active() {
        let body: GuildListResponse = serde_json::from_str(
            r#"{"guilds": {"world": "Inabra", "active": null, "formation": null}}"#,
        )
        .unwrap();
        assert!(parse_guild_list(body).unwrap().is_empty());
    }

    #[test]
    fn test_guild_list_embedded_error_is_unavailable() {
        let body: GuildListResponse = serde_json::from_str(
            r#"{"guilds": {"world": "", "active": null},
                "information": {"status": {"http_code": 502, "message": "upstream down"}}}"#,
        )
        .unwrap();
        assert_eq!(
            parse_guild_list(body),
            Err(GatewayError::Unavailable("upstream down".to_string()))
        );
    }

    #[test]
    fn test_guild_detail_uses_reported_totals() {
        let body: GuildDetailResponse = serde_json::from_str(GUILD_DETAIL).unwrap();
        let snapshot = parse_guild_detail("Red Phoenix", body).unwrap();

        // Totals come from the API even though only two members were listed
        assert_eq!(snapshot.members_total, 5);
        assert_eq!(snapshot.players_online, 1);
        assert_eq!(snapshot.players_offline, 4);
        assert_eq!(snapshot.members.len(), 2);
        assert_eq!(snapshot.members[0].status, MemberStatus::Online);
        assert_eq!(snapshot.members[1].title, "The Wall");
        assert_eq!(snapshot.founded, "2019-05-06");
    }

    #[test]
    fn test_guild_detail_embedded_not_found() {
        let body: GuildDetailResponse = serde_json::from_str(
            r#"{"information": {"status": {"http_code": 404, "error": 20004, "message": "guild not found"}}}"#,
        )
        .unwrap();
        let err = parse_guild_detail("Ghost Guild", body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.guild(), Some("Ghost Guild"));
    }

    #[test]
    fn test_guild_detail_not_found_ignores_stub_payload() {
        let body: GuildDetailResponse = serde_json::from_str(
            r#"{"guild": {}, "information": {"status": {"http_code": 404, "message": "guild not found"}}}"#,
        )
        .unwrap();
        let err = parse_guild_detail("Ghost Guild", body).unwrap_err();
        assert_eq!(
            err,
            GatewayError::NotFound {
                guild: "Ghost Guild".to_string()
            }
        );
    }

    #[test]
    fn test_guild_detail_partial_payload_is_unavailable() {
        let body: GuildDetailResponse = serde_json::from_str(
            r#"{"guild": {"world": "Inabra"}, "information": {"status": {"http_code": 200}}}"#,
        )
        .unwrap();
        let err = parse_guild_detail("Red Phoenix", body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn test_guild_detail_missing_payload_is_unavailable() {
        let body: GuildDetailResponse =
            serde_json::from_str(r#"{"information": {"status": {"http_code": 200}}}"#).unwrap();
        let err = parse_guild_detail("Red Phoenix", body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn test_unknown_status_reads_as_offline() {
        let member: MemberRecord = serde_json::from_str(
            r#"{"name": "X", "rank": "Member", "vocation": "None", "level": 8,
                "joined": "2024-01-01", "status": "away"}"#,
        )
        .unwrap();
        assert_eq!(member.status, MemberStatus::Offline);
        assert!(member.title.is_empty());
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(StatusCode::OK, Some("Red Phoenix")).is_ok());
        assert_eq!(
            check_status(StatusCode::NOT_FOUND, Some("Red Phoenix")),
            Err(GatewayError::NotFound {
                guild: "Red Phoenix".to_string()
            })
        );
        // A missing world is an outage from our point of view
        assert_eq!(
            check_status(StatusCode::NOT_FOUND, None).unwrap_err().kind(),
            ErrorKind::Unavailable
        );
        assert_eq!(
            check_status(StatusCode::INTERNAL_SERVER_ERROR, Some("Red Phoenix"))
                .unwrap_err()
                .kind(),
            ErrorKind::Unavailable
        );
    }

    #[test]
    fn test_urls_escape_path_segments() {
        let client = TibiaClient::new("https://api.example.com/v4/").unwrap();
        assert_eq!(
            client.guild_url("Red Phoenix"),
            "https://api.example.com/v4/guild/Red%20Phoenix"
        );
        assert_eq!(
            client.guild_url("Knights/of?Dawn"),
            "https://api.example.com/v4/guild/Knights%2Fof%3FDawn"
        );
        assert_eq!(client.guilds_url("Inabra"), "https://api.example.com/v4/guilds/Inabra");
    }

    #[tokio::test]
    async fn test_stalled_server_times_out_as_unavailable() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client =
            TibiaClient::with_timeout(&format!("http://{}/v4", addr), Duration::from_millis(200))
                .unwrap();
        let err = client.fetch_guild_detail("Red Phoenix").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);

        server.abort();
    }

    #[tokio::test]
    async fn test_empty_arguments_rejected_before_request() {
        let client = TibiaClient::new(DEFAULT_API_BASE).unwrap();
        assert_eq!(
            client.list_guilds("").await.unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(
            client.fetch_guild_detail("  ").await.unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
    }
}
