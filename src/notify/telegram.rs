//! Telegram Bot API transport
//!
//! Sends reports through `sendMessage` and exposes `getMe` for the health
//! check.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use super::Notifier;
use crate::config::{TelegramConfig, TelegramSettings};
use crate::error::DeliveryError;

#[derive(Serialize, Debug)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

/// Envelope every Bot API response shares.
#[derive(Deserialize, Debug)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BotInfo {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
    parse_mode: String,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig, settings: &TelegramSettings) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            parse_mode: settings.parse_mode.clone(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }

    /// Turn a non-success response into `DeliveryError::Rejected`, preferring
    /// Telegram's own `description`.
    async fn rejection(resp: Response) -> DeliveryError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .ok()
            .and_then(|r| r.description)
            .unwrap_or(body);
        DeliveryError::Rejected { status, description }
    }

    pub async fn get_me(&self) -> Result<BotInfo, DeliveryError> {
        let resp = self.client.get(self.method_url("getMe")).send().await?;
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        decode_bot_info(status, &body)
    }
}

/// A 2xx `getMe` body that is not a bot envelope is a rejection, not a
/// transport failure.
fn decode_bot_info(status: u16, body: &str) -> Result<BotInfo, DeliveryError> {
    let parsed: ApiResponse<BotInfo> =
        serde_json::from_str(body).map_err(|e| DeliveryError::Rejected {
            status,
            description: format!("malformed getMe response: {e}"),
        })?;
    match parsed.result {
        Some(bot) if parsed.ok => Ok(bot),
        _ => Err(DeliveryError::Rejected {
            status,
            description: parsed
                .description
                .unwrap_or_else(|| "getMe returned no bot".to_string()),
        }),
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let body = SendMessageRequest {
            chat_id: &self.config.chat_id,
            text,
            parse_mode: &self.parse_mode,
            disable_web_page_preview: true,
        };

        info!(
            "📨 [TELEGRAM] Sending report to chat {} ({} chars)",
            self.config.chat_id,
            text.chars().count()
        );

        let resp = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let err = Self::rejection(resp).await;
            error!("❌ [TELEGRAM] {}", err);
            return Err(err);
        }

        info!("✅ [TELEGRAM] Message sent.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> TelegramNotifier {
        TelegramNotifier::new(
            TelegramConfig {
                bot_token: "123:abc".to_string(),
                chat_id: "-10042".to_string(),
                api_base: "https://api.telegram.org/".to_string(),
            },
            &TelegramSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_method_url() {
        assert_eq!(
            notifier().method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_send_message_payload() {
        let body = SendMessageRequest {
            chat_id: "-10042",
            text: "<b>hi</b>",
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["chat_id"], "-10042");
        assert_eq!(json["text"], "<b>hi</b>");
        assert_eq!(json["parse_mode"], "HTML");

        let plain = SendMessageRequest {
            parse_mode: "",
            ..body
        };
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("parse_mode").is_none());
    }

    #[test]
    fn test_error_envelope_parsing() {
        let body = r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#;
        let parsed: ApiResponse<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert!(!parsed.ok);
        assert_eq!(
            parsed.description.as_deref(),
            Some("Forbidden: bot was blocked by the user")
        );
    }

    #[test]
    fn test_decode_bot_info() {
        let bot = decode_bot_info(
            200,
            r#"{"ok":true,"result":{"id":42,"is_bot":true,"first_name":"Intel","username":"gold_intel_bot"}}"#,
        )
        .unwrap();
        assert_eq!(bot.id, 42);
        assert_eq!(bot.username.as_deref(), Some("gold_intel_bot"));

        match decode_bot_info(200, r#"{"ok":false,"description":"Unauthorized"}"#) {
            Err(DeliveryError::Rejected { status, description }) => {
                assert_eq!(status, 200);
                assert_eq!(description, "Unauthorized");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_get_me_body_is_rejected() {
        for body in ["<html>Bad Gateway</html>", "", r#"{"ok":true,"result":{"username":"no_id"}}"#] {
            match decode_bot_info(200, body) {
                Err(DeliveryError::Rejected { status, description }) => {
                    assert_eq!(status, 200);
                    assert!(description.starts_with("malformed getMe response"), "{description}");
                }
                other => panic!("expected Rejected for {body:?}, got {other:?}"),
            }
        }
    }
}
