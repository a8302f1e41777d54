use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::Value;

use super::event::{CalendarEvent, EventKind};

/// Where the event feed comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum EventSource {
    Http { url: String, token: Option<String> },
    File { path: PathBuf },
}

impl EventSource {
    pub fn parse(source: &str, token: Option<String>) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            EventSource::Http {
                url: source.to_string(),
                token,
            }
        } else {
            EventSource::File {
                path: PathBuf::from(source),
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            EventSource::Http { url, .. } => url.clone(),
            EventSource::File { path } => path.display().to_string(),
        }
    }
}

/// Validated events plus the number of records that were dropped.
#[derive(Debug, Default)]
pub struct ParsedEvents {
    pub events: Vec<CalendarEvent>,
    pub skipped: usize,
}

pub struct Store {
    source: EventSource,
    client: Client,
}

impl Store {
    pub fn new(source: EventSource) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("squad-calendar/", env!("CARGO_PKG_VERSION")))
            .build()
            .wrap_err("Failed to build HTTP client")?;
        Ok(Self { source, client })
    }

    pub fn source(&self) -> &EventSource {
        &self.source
    }

    /// Load the feed and convert it into the viewer's local time zone.
    #[tracing::instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn fetch_events(&self) -> Result<ParsedEvents> {
        let body = self.fetch_body().await?;
        let parsed = parse_events(&body, &chrono::Local)?;
        tracing::info!(
            events = parsed.events.len(),
            skipped = parsed.skipped,
            "fetched events"
        );
        Ok(parsed)
    }

    async fn fetch_body(&self) -> Result<String> {
        match &self.source {
            EventSource::File { path } => tokio::fs::read_to_string(path)
                .await
                .wrap_err_with(|| format!("Failed to read events from {}", path.display())),
            EventSource::Http { url, token } => {
                let mut request = self
                    .client
                    .get(url)
                    .header(header::ACCEPT, "application/json");
                if let Some(token) = token {
                    request = request.bearer_auth(token);
                }

                let response = request
                    .send()
                    .await
                    .wrap_err_with(|| format!("Request to {} failed", url))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    bail!("Event feed returned {} - {}", status, body);
                }

                response
                    .text()
                    .await
                    .wrap_err("Failed to read event feed body")
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    id: Option<Value>,
    title: Option<String>,
    #[serde(rename = "type", alias = "kind", alias = "eventType")]
    kind: Option<String>,
    date: Option<String>,
    #[serde(alias = "startsAt", alias = "timestamp")]
    start: Option<String>,
    #[serde(alias = "startTime")]
    start_time: Option<String>,
    #[serde(alias = "endTime")]
    end_time: Option<String>,
    location: Option<String>,
    #[serde(alias = "description")]
    notes: Option<String>,
    #[serde(alias = "teamName")]
    team: Option<String>,
}

/// Parse a feed payload: either a JSON array of records or an object with an
/// `events` array. Records that fail validation are skipped and counted.
pub fn parse_events<Tz: TimeZone>(json: &str, tz: &Tz) -> Result<ParsedEvents> {
    let payload: Value = serde_json::from_str(json).wrap_err("Event feed is not valid JSON")?;

    let records = match payload {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("events") {
            Some(Value::Array(records)) => records,
            _ => bail!("Event feed object has no `events` array"),
        },
        _ => bail!("Event feed must be an array of events"),
    };

    let mut parsed = ParsedEvents::default();
    for record in records {
        let hint = record_hint(&record);
        let result = serde_json::from_value::<RawEvent>(record)
            .map_err(|e| eyre!(e))
            .and_then(|raw| convert_event(raw, tz));

        match result {
            Ok(event) => parsed.events.push(event),
            Err(error) => {
                parsed.skipped += 1;
                tracing::warn!(record = %hint, %error, "skipping malformed event");
            }
        }
    }

    Ok(parsed)
}

fn record_hint(record: &Value) -> String {
    match record.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "<no id>".to_string(),
    }
}

fn convert_event<Tz: TimeZone>(raw: RawEvent, tz: &Tz) -> Result<CalendarEvent> {
    let id = match raw.id {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => bail!("missing id"),
    };
    let title = raw
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| eyre!("missing title"))?;

    let start = raw.start.as_deref().map(parse_timestamp).transpose()?;
    let start = start.map(|ts| ts.into_local(tz));

    let date = match raw.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => start
            .map(|dt| dt.date())
            .ok_or_else(|| eyre!("missing date"))?,
    };

    let start_time = match raw.start_time.as_deref() {
        Some(t) => parse_time(t)?,
        None => start
            .map(|dt| dt.time())
            .ok_or_else(|| eyre!("missing start time"))?,
    };

    let end_time = raw
        .end_time
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(parse_time)
        .transpose()?;

    Ok(CalendarEvent {
        id,
        title,
        date,
        start_time,
        end_time,
        kind: raw.kind.as_deref().map(EventKind::from_tag).unwrap_or_default(),
        location: raw.location.filter(|s| !s.trim().is_empty()),
        notes: raw.notes.filter(|s| !s.trim().is_empty()),
        team: raw.team.filter(|s| !s.trim().is_empty()),
    })
}

enum Timestamp {
    Zoned(DateTime<chrono::FixedOffset>),
    Local(NaiveDateTime),
}

impl Timestamp {
    /// Wall-clock date and time as the viewer sees it.
    fn into_local<Tz: TimeZone>(self, tz: &Tz) -> NaiveDateTime {
        match self {
            Timestamp::Zoned(dt) => dt.with_timezone(tz).naive_local(),
            Timestamp::Local(naive) => naive,
        }
    }
}

fn parse_timestamp(s: &str) -> Result<Timestamp> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Timestamp::Zoned(dt));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Timestamp::Local(naive));
        }
    }
    Err(eyre!("unparseable timestamp {:?}", s))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| eyre!("unparseable date {:?}", s))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| eyre!("unparseable time {:?}", s))
}
