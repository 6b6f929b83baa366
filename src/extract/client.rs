//! Client for the external completion API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use notical_core::{NoticalError, NoticalResult};

/// The extraction seam. Handlers only see this trait, so tests can script
/// responses and a retry policy could wrap a client without touching the
/// handlers.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Send one notification through the model and return the raw
    /// completion text.
    async fn extract(&self, notification: &str) -> NoticalResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

/// Talks to an OpenAI-compatible chat-completions endpoint. One request per
/// notification, non-streaming, no retries; the configured timeout is the
/// only guard against a hanging remote.
pub struct ExtractionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    tz: Tz,
}

impl ExtractionClient {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        tz: Tz,
        timeout: Duration,
    ) -> NoticalResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NoticalError::Extraction(e.to_string()))?;

        Ok(ExtractionClient {
            http,
            base_url,
            api_key,
            model,
            tz,
        })
    }

    /// The model sees the current local time (with weekday, since "next
    /// Friday"-style phrases are common) and is asked for a JSON object with
    /// the event fields, timestamps in ISO-8601.
    fn build_prompt(&self, notification: &str, now: DateTime<Tz>) -> String {
        format!(
            "Current time: {timenow} {weekday} ({tz})\n\
             From the notification below, extract the event title, times, location,\n\
             and main task, and reply with a JSON object of exactly this shape:\n\
             {{\n\
             \"title\": \"event title\",\n\
             \"start\": \"start time of the task (ISO-8601, e.g. 2025-10-03T09:00:00)\",\n\
             \"end\": \"end or due time of the task (ISO-8601; if none is given, use start plus one hour)\",\n\
             \"location\": \"location\",\n\
             \"description\": \"summarize the task and list its main points\"\n\
             }}\n\
             Notification: {notification}",
            timenow = now.format("%Y-%m-%d %H:%M:%S"),
            weekday = now.format("%A"),
            tz = self.tz,
            notification = notification
        )
    }
}

#[async_trait]
impl Extractor for ExtractionClient {
    async fn extract(&self, notification: &str) -> NoticalResult<String> {
        let now = Utc::now().with_timezone(&self.tz);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You are a calendar assistant.".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: self.build_prompt(notification, now),
                },
            ],
            stream: false,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| NoticalError::Extraction(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NoticalError::Extraction(e.to_string()))?;

        if !status.is_success() {
            log::warn!("completion request failed with status {status}: {body}");
            return Err(NoticalError::Extraction(format!(
                "completion request failed with status {status}"
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            NoticalError::Extraction(format!("unexpected completion response: {e}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                NoticalError::Extraction("completion response contained no choices".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Shanghai;

    #[test]
    fn prompt_carries_local_time_weekday_and_notification() {
        let client = ExtractionClient::new(
            "https://api.example.com".to_string(),
            "key".to_string(),
            "test-model".to_string(),
            Shanghai,
            Duration::from_secs(5),
        )
        .unwrap();

        // 2025-10-03 is a Friday
        let now = Shanghai.with_ymd_and_hms(2025, 10, 3, 9, 30, 0).unwrap();
        let prompt = client.build_prompt("Project review next Monday at 10am", now);

        assert!(prompt.contains("2025-10-03 09:30:00 Friday"));
        assert!(prompt.contains("Asia/Shanghai"));
        assert!(prompt.contains("Project review next Monday at 10am"));
        assert!(prompt.contains("\"start\""));
    }
}
