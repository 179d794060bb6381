//! Outlook upstream client (Microsoft Graph)
//!
//! Mail and calendar accessors over the caller's bridged access token. Reads
//! degrade to empty lists on failure; the mark-as-read write propagates its
//! error because the caller expects a success/failure signal.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::models::{
    CalendarEvent, Email, EmailAddress, EmailFlag, EventLocation, EventTime, OutlookDashboard,
    Recipient,
};
use crate::auth::models::User;
use crate::common::{ensure_success, UpstreamError};
use crate::dashboard::services::OutlookSource;

const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

const IMPORTANT_EMAILS_TOP: u32 = 20;
const UPCOMING_EVENTS_TOP: u32 = 20;
const CALENDAR_EVENTS_TOP: u32 = 100;

const EMAIL_SELECT: &str =
    "id,subject,bodyPreview,receivedDateTime,from,toRecipients,importance,isRead,hasAttachments,flag,webLink";
const EVENT_SELECT: &str =
    "id,subject,bodyPreview,start,end,location,organizer,isAllDay,showAs,webLink";

// ---- Upstream wire shapes ----

#[derive(Debug, Deserialize)]
struct GraphList<T> {
    value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressWire {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipientWire {
    email_address: AddressWire,
}

impl From<RecipientWire> for Recipient {
    fn from(wire: RecipientWire) -> Self {
        Recipient {
            email_address: EmailAddress {
                address: wire.email_address.address.unwrap_or_default(),
                name: wire.email_address.name.unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlagWire {
    #[serde(default)]
    flag_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailWire {
    id: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    body_preview: Option<String>,
    received_date_time: DateTime<Utc>,
    #[serde(default)]
    from: Option<RecipientWire>,
    #[serde(default)]
    to_recipients: Vec<RecipientWire>,
    #[serde(default)]
    importance: Option<String>,
    #[serde(default)]
    is_read: bool,
    #[serde(default)]
    has_attachments: bool,
    #[serde(default)]
    flag: Option<FlagWire>,
    #[serde(default)]
    web_link: Option<String>,
}

impl From<EmailWire> for Email {
    fn from(wire: EmailWire) -> Self {
        Email {
            id: wire.id,
            subject: wire.subject.unwrap_or_default(),
            body_preview: wire.body_preview.unwrap_or_default(),
            received_date_time: wire.received_date_time,
            from: wire.from.map(Recipient::from),
            to_recipients: wire.to_recipients.into_iter().map(Recipient::from).collect(),
            importance: wire.importance.unwrap_or_else(|| "normal".to_string()),
            is_read: wire.is_read,
            has_attachments: wire.has_attachments,
            flag: wire.flag.and_then(|f| {
                f.flag_status.map(|flag_status| EmailFlag { flag_status })
            }),
            web_link: wire.web_link.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTimeWire {
    date_time: String,
    #[serde(default)]
    time_zone: Option<String>,
}

impl From<EventTimeWire> for EventTime {
    fn from(wire: EventTimeWire) -> Self {
        EventTime {
            date_time: wire.date_time,
            time_zone: wire.time_zone.unwrap_or_else(|| "UTC".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationWire {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventWire {
    id: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    body_preview: Option<String>,
    start: EventTimeWire,
    end: EventTimeWire,
    #[serde(default)]
    location: Option<LocationWire>,
    #[serde(default)]
    organizer: Option<RecipientWire>,
    #[serde(default)]
    is_all_day: bool,
    #[serde(default)]
    show_as: Option<String>,
    #[serde(default)]
    web_link: Option<String>,
}

impl From<EventWire> for CalendarEvent {
    fn from(wire: EventWire) -> Self {
        CalendarEvent {
            id: wire.id,
            subject: wire.subject.unwrap_or_default(),
            body_preview: wire.body_preview,
            start: wire.start.into(),
            end: wire.end.into(),
            location: wire
                .location
                .and_then(|l| l.display_name)
                .map(|display_name| EventLocation { display_name }),
            organizer: wire.organizer.map(Recipient::from),
            is_all_day: wire.is_all_day,
            show_as: wire.show_as.unwrap_or_else(|| "unknown".to_string()),
            web_link: wire.web_link.unwrap_or_default(),
        }
    }
}

// ---- Service ----

pub struct OutlookService {
    base_url: String,
    http: Client,
}

impl OutlookService {
    pub fn new(http: Client) -> Self {
        Self {
            base_url: GRAPH_BASE_URL.to_string(),
            http,
        }
    }

    #[cfg(test)]
    fn with_base_url(base_url: String, http: Client) -> Self {
        Self { base_url, http }
    }

    /// High-importance or flagged emails, newest first, capped at twenty.
    pub async fn important_emails(&self, access_token: &str) -> Vec<Email> {
        let top = IMPORTANT_EMAILS_TOP.to_string();
        let result = self
            .fetch_emails(
                access_token,
                &[
                    (
                        "$filter",
                        "importance eq 'high' or flag/flagStatus eq 'flagged'",
                    ),
                    ("$orderby", "receivedDateTime desc"),
                    ("$top", top.as_str()),
                    ("$select", EMAIL_SELECT),
                ],
            )
            .await;
        match result {
            Ok(emails) => emails,
            Err(e) => {
                warn!(error = %e, "failed to fetch important emails");
                Vec::new()
            }
        }
    }

    /// Inbox page, newest first.
    pub async fn emails(&self, access_token: &str, limit: u32, skip: u32) -> Vec<Email> {
        let top = limit.to_string();
        let skip = skip.to_string();
        let result = self
            .fetch_emails(
                access_token,
                &[
                    ("$orderby", "receivedDateTime desc"),
                    ("$top", top.as_str()),
                    ("$skip", skip.as_str()),
                    ("$select", EMAIL_SELECT),
                ],
            )
            .await;
        match result {
            Ok(emails) => emails,
            Err(e) => {
                warn!(error = %e, "failed to fetch emails");
                Vec::new()
            }
        }
    }

    /// Events starting within the next seven days, soonest first, capped at
    /// twenty.
    pub async fn upcoming_events(&self, access_token: &str) -> Vec<CalendarEvent> {
        let now = Utc::now();
        self.events_window(
            access_token,
            now,
            now + Duration::days(7),
            UPCOMING_EVENTS_TOP,
        )
        .await
    }

    /// Events within an explicit window; defaults to the next thirty days.
    pub async fn calendar_events(
        &self,
        access_token: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Vec<CalendarEvent> {
        let now = Utc::now();
        let start = start.unwrap_or(now);
        let end = end.unwrap_or(now + Duration::days(30));
        self.events_window(access_token, start, end, CALENDAR_EVENTS_TOP)
            .await
    }

    /// Flip the read flag on one message. Unlike reads, failures here are
    /// surfaced: the caller changed state and needs to know if it stuck.
    pub async fn mark_email_read(
        &self,
        access_token: &str,
        email_id: &str,
    ) -> Result<(), UpstreamError> {
        let url = format!("{}/me/messages/{}", self.base_url, email_id);
        let response = self
            .http
            .patch(&url)
            .bearer_auth(access_token)
            .json(&json!({ "isRead": true }))
            .send()
            .await?;
        ensure_success(response)?;
        Ok(())
    }

    async fn events_window(
        &self,
        access_token: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        top: u32,
    ) -> Vec<CalendarEvent> {
        let filter = format!(
            "start/dateTime ge '{}' and start/dateTime le '{}'",
            start.to_rfc3339_opts(SecondsFormat::Millis, true),
            end.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        let top = top.to_string();
        let result = self
            .fetch_events(
                access_token,
                &[
                    ("$filter", filter.as_str()),
                    ("$orderby", "start/dateTime asc"),
                    ("$top", top.as_str()),
                    ("$select", EVENT_SELECT),
                ],
            )
            .await;
        match result {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "failed to fetch calendar events");
                Vec::new()
            }
        }
    }

    async fn fetch_emails(
        &self,
        access_token: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<Email>, UpstreamError> {
        let url = format!("{}/me/messages", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await?;
        let list: GraphList<EmailWire> = ensure_success(response)?
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;
        Ok(list.value.into_iter().map(Email::from).collect())
    }

    async fn fetch_events(
        &self,
        access_token: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<CalendarEvent>, UpstreamError> {
        let url = format!("{}/me/events", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await?;
        let list: GraphList<EventWire> = ensure_success(response)?
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;
        Ok(list.value.into_iter().map(CalendarEvent::from).collect())
    }
}

#[async_trait]
impl OutlookSource for OutlookService {
    async fn dashboard_data(
        &self,
        _user: &User,
        access_token: &str,
    ) -> Result<OutlookDashboard, UpstreamError> {
        let (important_emails, upcoming_events) = tokio::join!(
            self.important_emails(access_token),
            self.upcoming_events(access_token),
        );
        Ok(OutlookDashboard {
            important_emails,
            upcoming_events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(base_url: String) -> OutlookService {
        OutlookService::with_base_url(base_url, Client::new())
    }

    #[tokio::test]
    async fn important_emails_map_graph_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [
                    {
                        "id": "msg-1",
                        "subject": "Exam moved",
                        "bodyPreview": "The exam is now on Friday",
                        "receivedDateTime": "2026-08-28T14:00:00Z",
                        "from": { "emailAddress": { "address": "prof@example.edu", "name": "Prof" } },
                        "toRecipients": [],
                        "importance": "high",
                        "isRead": false,
                        "hasAttachments": false,
                        "flag": { "flagStatus": "flagged" },
                        "webLink": "https://outlook.example/msg-1"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let emails = service(server.uri()).important_emails("token").await;

        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].id, "msg-1");
        assert_eq!(emails[0].importance, "high");
        assert!(!emails[0].is_read);
        assert_eq!(
            emails[0].flag.as_ref().unwrap().flag_status,
            "flagged"
        );
        assert_eq!(
            emails[0].from.as_ref().unwrap().email_address.address,
            "prof@example.edu"
        );
    }

    #[tokio::test]
    async fn graph_failure_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/messages"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        assert!(service(server.uri()).important_emails("bad").await.is_empty());
    }

    #[tokio::test]
    async fn mark_email_read_propagates_failure() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/me/messages/msg-1"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let result = service(server.uri()).mark_email_read("token", "msg-1").await;
        assert!(matches!(result, Err(UpstreamError::Status(_))));
    }

    #[tokio::test]
    async fn mark_email_read_succeeds_on_2xx() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/me/messages/msg-1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        assert!(service(server.uri())
            .mark_email_read("token", "msg-1")
            .await
            .is_ok());
    }
}
