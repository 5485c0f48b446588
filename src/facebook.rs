use crate::config::MetaConfig;
use crate::constants::{
    ADSET_DAILY_BUDGET, ADSET_OPTIMIZATION_GOAL, ADSET_RUN_DAYS, ADSET_START_DELAY_MINS,
    ADVANTAGE_AUDIENCE, AD_ACCOUNT_PREFIX, CAMPAIGN_OBJECTIVE, CONTENT_TYPE_HEADER,
    CONTENT_TYPE_JSON, STATUS_PAUSED, TARGET_AGE_MAX, TARGET_AGE_MIN, TARGET_COUNTRIES,
    UNKNOWN_TRACE_ID,
};
use crate::models::{Ad, AdCreative, AdImage, AdSet, Campaign};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacebookApiError {
    /// No response was received at all.
    #[error("{message}")]
    RequestFailed { message: String },
    /// The Graph API answered with a non-2xx status or an `error` object.
    #[error("{message}")]
    Provider {
        status: u16,
        message: String,
        fbtrace_id: Option<String>,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl FacebookApiError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn fbtrace_id(&self) -> &str {
        match self {
            FacebookApiError::Provider {
                fbtrace_id: Some(id),
                ..
            } => id,
            _ => UNKNOWN_TRACE_ID,
        }
    }
}

/// The create operations the launch workflow needs from an ads platform.
#[async_trait]
pub trait AdPlatform: Send + Sync {
    async fn create_campaign(&self, name: &str) -> Result<Campaign, FacebookApiError>;

    async fn create_ad_set(&self, campaign_id: &str, name: &str)
        -> Result<AdSet, FacebookApiError>;

    async fn upload_image(&self, image_url: &str) -> Result<AdImage, FacebookApiError>;

    async fn create_creative(
        &self,
        name: &str,
        message: &str,
        link: &str,
        image_hash: &str,
    ) -> Result<AdCreative, FacebookApiError>;

    async fn create_ad(
        &self,
        name: &str,
        adset_id: &str,
        creative_id: &str,
    ) -> Result<Ad, FacebookApiError>;
}

pub struct FacebookAPI {
    client: Client,
    access_token: String,
    ad_account_id: String,
    page_id: String,
    base_url: String,
}

impl FacebookAPI {
    pub fn new(config: &MetaConfig) -> Self {
        let missing = config.missing_fields();
        if !missing.is_empty() {
            warn!(
                "Missing Meta environment variables: {}",
                missing.join(", ")
            );
        }

        Self {
            client: Client::new(),
            access_token: config.access_token.clone(),
            ad_account_id: normalize_ad_account_id(&config.ad_account_id),
            page_id: config.page_id.clone(),
            base_url: format!(
                "{}/{}",
                config.graph_url.as_str().trim_end_matches('/'),
                config.api_version
            ),
        }
    }

    pub fn ad_account_id(&self) -> &str {
        &self.ad_account_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: DeserializeOwned>(
        &self,
        edge: &str,
        body: &Value,
    ) -> Result<T, FacebookApiError> {
        let value = self.post_value(edge, body).await?;

        serde_json::from_value(value).map_err(|e| FacebookApiError::InvalidResponse(e.to_string()))
    }

    async fn post_value(&self, edge: &str, body: &Value) -> Result<Value, FacebookApiError> {
        let endpoint = format!("{}/{}", self.ad_account_id, edge);
        let url = format!("{}/{}", self.base_url, endpoint);

        debug!(%endpoint, %body, "Graph API request");

        let response = self
            .client
            .post(&url)
            .query(&[("access_token", &self.access_token)])
            .header(CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON)
            .json(body)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(request_failed)?;

        parse_graph_response(status, &text).map_err(|e| {
            error!(%endpoint, status, response = %text, "Graph API error response");
            e
        })
    }
}

#[async_trait]
impl AdPlatform for FacebookAPI {
    async fn create_campaign(&self, name: &str) -> Result<Campaign, FacebookApiError> {
        let body = json!({
            "name": name,
            "objective": CAMPAIGN_OBJECTIVE,
            "status": STATUS_PAUSED,
            "special_ad_categories": [],
        });

        let campaign: Campaign = self.post("campaigns", &body).await?;
        require_non_empty(&campaign.id, "campaign id")?;
        Ok(campaign)
    }

    async fn create_ad_set(
        &self,
        campaign_id: &str,
        name: &str,
    ) -> Result<AdSet, FacebookApiError> {
        let body = ad_set_body(campaign_id, name, Utc::now());

        let ad_set: AdSet = self.post("adsets", &body).await?;
        require_non_empty(&ad_set.id, "ad set id")?;
        Ok(ad_set)
    }

    async fn upload_image(&self, image_url: &str) -> Result<AdImage, FacebookApiError> {
        let body = json!({ "url": image_url });

        let value = self.post_value("adimages", &body).await?;
        parse_ad_image(value)
    }

    async fn create_creative(
        &self,
        name: &str,
        message: &str,
        link: &str,
        image_hash: &str,
    ) -> Result<AdCreative, FacebookApiError> {
        let body = json!({
            "name": name,
            "object_story_spec": {
                "page_id": self.page_id,
                "link_data": {
                    "image_hash": image_hash,
                    "link": link,
                    "message": message,
                },
            },
        });

        let creative: AdCreative = self.post("adcreatives", &body).await?;
        require_non_empty(&creative.id, "creative id")?;
        Ok(creative)
    }

    async fn create_ad(
        &self,
        name: &str,
        adset_id: &str,
        creative_id: &str,
    ) -> Result<Ad, FacebookApiError> {
        let body = json!({
            "name": name,
            "adset_id": adset_id,
            "creative": { "creative_id": creative_id },
            "status": STATUS_PAUSED,
        });

        let ad: Ad = self.post("ads", &body).await?;
        require_non_empty(&ad.id, "ad id")?;
        Ok(ad)
    }
}

/// Prefixes the account id with `act_` unless it already carries it.
pub fn normalize_ad_account_id(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with(AD_ACCOUNT_PREFIX) {
        raw.to_string()
    } else {
        format!("{}{}", AD_ACCOUNT_PREFIX, raw)
    }
}

/// Start and end of the ad set schedule for a launch at `now`.
pub fn ad_set_schedule(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        now + Duration::minutes(ADSET_START_DELAY_MINS),
        now + Duration::days(ADSET_RUN_DAYS),
    )
}

// Billing event and bid strategy are left out so the platform applies its defaults.
pub(crate) fn ad_set_body(campaign_id: &str, name: &str, now: DateTime<Utc>) -> Value {
    let (start_time, end_time) = ad_set_schedule(now);

    json!({
        "name": name,
        "campaign_id": campaign_id,
        "daily_budget": ADSET_DAILY_BUDGET,
        "optimization_goal": ADSET_OPTIMIZATION_GOAL,
        "targeting": {
            "geo_locations": { "countries": TARGET_COUNTRIES },
            "age_min": TARGET_AGE_MIN,
            "age_max": TARGET_AGE_MAX,
            "targeting_automation": { "advantage_audience": ADVANTAGE_AUDIENCE },
        },
        "start_time": start_time.to_rfc3339_opts(SecondsFormat::Millis, true),
        "end_time": end_time.to_rfc3339_opts(SecondsFormat::Millis, true),
        "status": STATUS_PAUSED,
    })
}

/// Turns a raw Graph API response into its JSON body or a normalized error.
pub fn parse_graph_response(status: u16, body: &str) -> Result<Value, FacebookApiError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let provider_error = parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .filter(|e| !e.is_null());

    if !(200..300).contains(&status) || provider_error.is_some() {
        let message = provider_error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        let fbtrace_id = provider_error
            .and_then(|e| e.get("fbtrace_id"))
            .and_then(Value::as_str)
            .map(str::to_string);

        return Err(FacebookApiError::Provider {
            status,
            message,
            fbtrace_id,
        });
    }

    parsed.ok_or_else(|| FacebookApiError::InvalidResponse("response body is not JSON".to_string()))
}

// The adimages edge answers `{"images": {"<name>": {"hash", "url"}}}`; a flat
// `{"hash", "url"}` body is accepted too.
fn parse_ad_image(value: Value) -> Result<AdImage, FacebookApiError> {
    let entry = match value.get("images").and_then(Value::as_object) {
        Some(images) => images.values().next().cloned().ok_or_else(|| {
            FacebookApiError::InvalidResponse("adimages response has no images".to_string())
        })?,
        None => value,
    };

    let image: AdImage = serde_json::from_value(entry)
        .map_err(|e| FacebookApiError::InvalidResponse(e.to_string()))?;
    require_non_empty(&image.hash, "image hash")?;
    Ok(image)
}

// The request URL carries the access token, so it never reaches the message.
fn request_failed(e: reqwest::Error) -> FacebookApiError {
    FacebookApiError::RequestFailed {
        message: e.without_url().to_string(),
    }
}

fn require_non_empty(value: &str, what: &str) -> Result<(), FacebookApiError> {
    if value.is_empty() {
        return Err(FacebookApiError::InvalidResponse(format!("missing {}", what)));
    }
    Ok(())
}
