//! REST implementation of the mutation surface.

use crate::payloads::{CreateChannel, CreateRole, EditChannel, EditRole, ImageData};
use crate::writer::{ResourceSummary, TargetInfo, TargetWriter};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use specchio_core::de;
use specchio_core::{ChannelRecord, EmojiRecord, PermissionGrant, RoleRecord};
use specchio_error::{
    ApiError, ApiErrorKind, CloneError, CloneErrorKind, JsonError, SpecchioError, SpecchioResult,
};
use specchio_rate_limit::{retry_after, Pacer, RetryConfig, SpecchioConfig};
use tracing::{debug, instrument, warn};

/// Longest error detail kept from a rejected request body.
const DETAIL_LIMIT: usize = 200;

/// Entry of the caller's guild list, used by preflight.
#[derive(Debug, Deserialize)]
struct PartialGuild {
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    id: u64,
    name: String,
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    permissions: u64,
}

/// REST-backed writer for the target guild.
///
/// Holds the bot credential and the shared [`Pacer`]: every mutation waits
/// on the pacing budget before it is issued and resolves rate limit
/// responses with the same bounded retry loop as the read path.
///
/// # Example
///
/// ```no_run
/// use specchio_api::{RestTarget, TargetWriter};
/// use specchio_rate_limit::SpecchioConfig;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SpecchioConfig::load()?;
/// let target = RestTarget::new(std::env::var("BOT_TOKEN")?, 987654321, &config);
/// let info = target.preflight().await?;
/// println!("target: {}", info.name());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RestTarget {
    http: reqwest::Client,
    base_url: String,
    token: String,
    guild_id: u64,
    pacer: Pacer,
    retry: RetryConfig,
}

impl RestTarget {
    /// Create a writer for the given target guild.
    #[instrument(skip(bot_token, config), fields(guild_id))]
    pub fn new(bot_token: impl AsRef<str>, guild_id: u64, config: &SpecchioConfig) -> Self {
        debug!("Creating REST target writer");
        let raw = bot_token.as_ref();
        let token = if raw.starts_with("Bot ") {
            raw.to_string()
        } else {
            format!("Bot {raw}")
        };
        Self {
            http: reqwest::Client::new(),
            base_url: config.api.base_url.clone(),
            token,
            guild_id,
            pacer: Pacer::new(&config.pacing),
            retry: config.retry.clone(),
        }
    }

    /// The target guild id this writer mutates.
    pub fn guild_id(&self) -> u64 {
        self.guild_id
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> SpecchioResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_wait = self.retry.default_retry();

        for attempt in 1..=self.retry.max_attempts.max(1) {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(AUTHORIZATION, &self.token);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(|e| {
                SpecchioError::from(ApiError::new(ApiErrorKind::Transport(e.to_string())))
            })?;

            let status = response.status();
            if status.is_success() {
                let text = response.text().await.map_err(|e| {
                    SpecchioError::from(ApiError::new(ApiErrorKind::Transport(e.to_string())))
                })?;
                if text.is_empty() {
                    return Ok(Value::Null);
                }
                return serde_json::from_str(&text).map_err(|e| {
                    ApiError::new(ApiErrorKind::Malformed(e.to_string())).into()
                });
            }

            match status.as_u16() {
                429 => {
                    let wait = retry_after(response.headers(), self.retry.default_retry());
                    warn!(
                        path,
                        attempt,
                        wait_secs = wait.as_secs_f64(),
                        "rate limited, retrying"
                    );
                    last_wait = wait;
                    tokio::time::sleep(wait).await;
                }
                400 => {
                    let mut detail = response.text().await.unwrap_or_default();
                    detail.truncate(DETAIL_LIMIT);
                    return Err(ApiError::new(ApiErrorKind::BadRequest(detail)).into());
                }
                401 => return Err(ApiError::new(ApiErrorKind::Unauthorized).into()),
                403 => return Err(ApiError::new(ApiErrorKind::Forbidden).into()),
                code => return Err(ApiError::new(ApiErrorKind::Status(code)).into()),
            }
        }

        Err(ApiError::new(ApiErrorKind::RateLimited {
            retry_after_secs: last_wait.as_secs_f64(),
        })
        .into())
    }

    /// Unpaced read against the target (preflight, wipe inventories).
    async fn read_json<T: DeserializeOwned>(&self, path: &str) -> SpecchioResult<T> {
        let value = self.dispatch(Method::GET, path, None).await?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::new(ApiErrorKind::Malformed(e.to_string())).into())
    }

    /// Paced mutation.
    async fn write(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> SpecchioResult<Value> {
        self.pacer.wait().await;
        self.dispatch(method, path, body).await
    }

    fn body_of(payload: &impl serde::Serialize) -> SpecchioResult<Value> {
        serde_json::to_value(payload).map_err(|e| JsonError::new(e.to_string()).into())
    }

    fn created_id(value: &Value) -> SpecchioResult<u64> {
        let id = value.get("id").and_then(|id| match id {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        });
        id.ok_or_else(|| {
            ApiError::new(ApiErrorKind::Malformed(
                "creation response carried no id".to_string(),
            ))
            .into()
        })
    }
}

#[async_trait]
impl TargetWriter for RestTarget {
    #[instrument(skip(self))]
    async fn preflight(&self) -> SpecchioResult<TargetInfo> {
        let guilds: Vec<PartialGuild> = self.read_json("/users/@me/guilds").await?;
        let guild = guilds
            .into_iter()
            .find(|g| g.id == self.guild_id)
            .ok_or_else(|| {
                SpecchioError::from(CloneError::new(CloneErrorKind::TargetUnreachable(
                    format!("caller is not a member of guild {}", self.guild_id),
                )))
            })?;

        // The default role shares the guild's own id.
        Ok(TargetInfo::new(
            guild.id,
            guild.name,
            guild.id,
            guild.permissions,
        ))
    }

    #[instrument(skip(self))]
    async fn list_roles(&self) -> SpecchioResult<Vec<ResourceSummary>> {
        let roles: Vec<RoleRecord> = self
            .read_json(&format!("/guilds/{}/roles", self.guild_id))
            .await?;
        Ok(roles
            .iter()
            .map(|r| ResourceSummary::new(*r.id(), r.name().clone()))
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_channels(&self) -> SpecchioResult<Vec<ResourceSummary>> {
        let channels: Vec<ChannelRecord> = self
            .read_json(&format!("/guilds/{}/channels", self.guild_id))
            .await?;
        Ok(channels
            .iter()
            .map(|c| ResourceSummary::new(*c.id(), c.name().clone()))
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_emojis(&self) -> SpecchioResult<Vec<ResourceSummary>> {
        let emojis: Vec<EmojiRecord> = self
            .read_json(&format!("/guilds/{}/emojis", self.guild_id))
            .await?;
        Ok(emojis
            .iter()
            .filter_map(|e| (*e.id()).map(|id| ResourceSummary::new(id, e.name().clone())))
            .collect())
    }

    #[instrument(skip(self, icon), fields(has_icon = icon.is_some()))]
    async fn edit_guild(
        &self,
        name: Option<&str>,
        icon: Option<&ImageData>,
    ) -> SpecchioResult<()> {
        let mut body = serde_json::Map::new();
        if let Some(name) = name {
            body.insert("name".to_string(), Value::String(name.to_string()));
        }
        if let Some(icon) = icon {
            body.insert("icon".to_string(), Value::String(icon.to_data_uri()));
        }
        self.write(
            Method::PATCH,
            &format!("/guilds/{}", self.guild_id),
            Some(&Value::Object(body)),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, request), fields(name = %request.name()))]
    async fn create_role(&self, request: &CreateRole) -> SpecchioResult<u64> {
        let body = Self::body_of(request)?;
        let value = self
            .write(
                Method::POST,
                &format!("/guilds/{}/roles", self.guild_id),
                Some(&body),
            )
            .await?;
        Self::created_id(&value)
    }

    #[instrument(skip(self, edit))]
    async fn edit_role(&self, role_id: u64, edit: &EditRole) -> SpecchioResult<()> {
        let body = Self::body_of(edit)?;
        self.write(
            Method::PATCH,
            &format!("/guilds/{}/roles/{role_id}", self.guild_id),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_role(&self, role_id: u64) -> SpecchioResult<()> {
        self.write(
            Method::DELETE,
            &format!("/guilds/{}/roles/{role_id}", self.guild_id),
            None,
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, grants), fields(name))]
    async fn create_category(
        &self,
        name: &str,
        position: i64,
        grants: &[PermissionGrant],
    ) -> SpecchioResult<u64> {
        let request = CreateChannel::category(name, position, grants);
        self.create_channel(&request).await
    }

    #[instrument(skip(self, request), fields(name = %request.name()))]
    async fn create_channel(&self, request: &CreateChannel) -> SpecchioResult<u64> {
        let body = Self::body_of(request)?;
        let value = self
            .write(
                Method::POST,
                &format!("/guilds/{}/channels", self.guild_id),
                Some(&body),
            )
            .await?;
        Self::created_id(&value)
    }

    #[instrument(skip(self, edit))]
    async fn edit_channel(&self, channel_id: u64, edit: &EditChannel) -> SpecchioResult<()> {
        let body = Self::body_of(edit)?;
        self.write(Method::PATCH, &format!("/channels/{channel_id}"), Some(&body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_channel(&self, channel_id: u64) -> SpecchioResult<()> {
        self.write(Method::DELETE, &format!("/channels/{channel_id}"), None)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, image), fields(name, animated = *image.animated()))]
    async fn create_emoji(&self, name: &str, image: &ImageData) -> SpecchioResult<u64> {
        let body = serde_json::json!({
            "name": name,
            "image": image.to_data_uri(),
        });
        let value = self
            .write(
                Method::POST,
                &format!("/guilds/{}/emojis", self.guild_id),
                Some(&body),
            )
            .await?;
        Self::created_id(&value)
    }

    #[instrument(skip(self))]
    async fn delete_emoji(&self, emoji_id: u64) -> SpecchioResult<()> {
        self.write(
            Method::DELETE,
            &format!("/guilds/{}/emojis/{emoji_id}", self.guild_id),
            None,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_id_from_string_or_number() {
        let value = serde_json::json!({"id": "123"});
        assert_eq!(RestTarget::created_id(&value).unwrap(), 123);

        let value = serde_json::json!({"id": 456});
        assert_eq!(RestTarget::created_id(&value).unwrap(), 456);

        let value = serde_json::json!({"name": "no id"});
        assert!(RestTarget::created_id(&value).is_err());
    }
}
