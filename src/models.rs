use serde::{Deserialize, Serialize};

// Graph API create responses usually return only the `id`, so the remaining
// fields fall back to empty values.

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AdSet {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub campaign_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AdImage {
    pub hash: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AdCreative {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct CreativeRef {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Ad {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub creative: CreativeRef,
}

/// Inbound launch request. Every field is optional on the wire so that
/// missing values are reported by the workflow rather than the JSON decoder.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LaunchCampaignRequest {
    pub campaign_name: Option<String>,
    pub message: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedCampaign {
    pub campaign_id: String,
    pub adset_id: String,
    pub creative_id: String,
    pub ad_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchCampaignResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creative_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "fbtrace_id", skip_serializing_if = "Option::is_none")]
    pub fbtrace_id: Option<String>,
}

impl LaunchCampaignResponse {
    pub fn failure(error: impl Into<String>, fbtrace_id: Option<String>) -> Self {
        Self {
            success: false,
            campaign_id: None,
            adset_id: None,
            creative_id: None,
            ad_id: None,
            error: Some(error.into()),
            fbtrace_id,
        }
    }
}

impl From<LaunchedCampaign> for LaunchCampaignResponse {
    fn from(launched: LaunchedCampaign) -> Self {
        Self {
            success: true,
            campaign_id: Some(launched.campaign_id),
            adset_id: Some(launched.adset_id),
            creative_id: Some(launched.creative_id),
            ad_id: Some(launched.ad_id),
            error: None,
            fbtrace_id: None,
        }
    }
}
