use crate::facebook::{AdPlatform, FacebookApiError};
use crate::models::{LaunchCampaignRequest, LaunchedCampaign};
use std::fmt;
use thiserror::Error;
use tracing::info;

/// The provider-facing steps of a launch, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStep {
    CreatingCampaign,
    CreatingAdSet,
    UploadingImage,
    CreatingCreative,
    CreatingAd,
}

impl fmt::Display for LaunchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchStep::CreatingCampaign => "create campaign",
            LaunchStep::CreatingAdSet => "create ad set",
            LaunchStep::UploadingImage => "upload image",
            LaunchStep::CreatingCreative => "create creative",
            LaunchStep::CreatingAd => "create ad",
        };
        f.write_str(name)
    }
}

/// Identifiers created before a launch stopped. Nothing here is cleaned up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedResources {
    pub campaign_id: Option<String>,
    pub adset_id: Option<String>,
    pub image_hash: Option<String>,
    pub creative_id: Option<String>,
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Missing required fields: campaignName, message, or link")]
    MissingFields,
    #[error("Image URL is required for this ad format")]
    ImageUrlRequired,
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("{source}")]
    StepFailed {
        step: LaunchStep,
        created: CreatedResources,
        source: FacebookApiError,
    },
}

impl LaunchError {
    pub fn is_validation(&self) -> bool {
        !matches!(self, LaunchError::StepFailed { .. })
    }

    pub fn fbtrace_id(&self) -> Option<&str> {
        match self {
            LaunchError::StepFailed { source, .. } => Some(source.fbtrace_id()),
            _ => None,
        }
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub campaign_name: String,
    pub message: String,
    pub link: String,
    pub image_url: String,
}

impl LaunchPlan {
    pub fn from_request(request: &LaunchCampaignRequest) -> Result<Self, LaunchError> {
        let (Some(campaign_name), Some(message), Some(link)) = (
            present(&request.campaign_name),
            present(&request.message),
            present(&request.link),
        ) else {
            return Err(LaunchError::MissingFields);
        };

        let image_url = present(&request.image_url).ok_or(LaunchError::ImageUrlRequired)?;

        Ok(Self {
            campaign_name: campaign_name.to_string(),
            message: message.to_string(),
            link: link.to_string(),
            image_url: image_url.to_string(),
        })
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

fn step_failed(step: LaunchStep, created: &CreatedResources, source: FacebookApiError) -> LaunchError {
    LaunchError::StepFailed {
        step,
        created: created.clone(),
        source,
    }
}

/// Validates `request` and provisions campaign, ad set, image, creative and ad
/// in that order, stopping at the first failure.
pub async fn launch_campaign(
    platform: &dyn AdPlatform,
    request: &LaunchCampaignRequest,
) -> Result<LaunchedCampaign, LaunchError> {
    let plan = LaunchPlan::from_request(request)?;
    let mut created = CreatedResources::default();

    let campaign = platform
        .create_campaign(&plan.campaign_name)
        .await
        .map_err(|e| step_failed(LaunchStep::CreatingCampaign, &created, e))?;
    info!("Created Campaign: {}", campaign.id);
    created.campaign_id = Some(campaign.id.clone());

    let ad_set = platform
        .create_ad_set(&campaign.id, &format!("{} - Ad Set", plan.campaign_name))
        .await
        .map_err(|e| step_failed(LaunchStep::CreatingAdSet, &created, e))?;
    info!("Created Ad Set: {}", ad_set.id);
    created.adset_id = Some(ad_set.id.clone());

    let image = platform
        .upload_image(&plan.image_url)
        .await
        .map_err(|e| step_failed(LaunchStep::UploadingImage, &created, e))?;
    info!("Uploaded Image Hash: {}", image.hash);
    created.image_hash = Some(image.hash.clone());

    let creative = platform
        .create_creative(
            &format!("{} - Creative", plan.campaign_name),
            &plan.message,
            &plan.link,
            &image.hash,
        )
        .await
        .map_err(|e| step_failed(LaunchStep::CreatingCreative, &created, e))?;
    info!("Created Creative: {}", creative.id);
    created.creative_id = Some(creative.id.clone());

    let ad = platform
        .create_ad(
            &format!("{} - Ad", plan.campaign_name),
            &ad_set.id,
            &creative.id,
        )
        .await
        .map_err(|e| step_failed(LaunchStep::CreatingAd, &created, e))?;
    info!("Created Ad: {}", ad.id);

    Ok(LaunchedCampaign {
        campaign_id: campaign.id,
        adset_id: ad_set.id,
        creative_id: creative.id,
        ad_id: ad.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ad, AdCreative, AdImage, AdSet, Campaign, CreativeRef};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedPlatform {
        fail_at: Option<LaunchStep>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedPlatform {
        fn failing_at(step: LaunchStep) -> Self {
            Self {
                fail_at: Some(step),
                ..Default::default()
            }
        }

        fn record(&self, step: LaunchStep, call: String) -> Result<(), FacebookApiError> {
            self.calls.lock().unwrap().push(call);
            if self.fail_at == Some(step) {
                return Err(FacebookApiError::Provider {
                    status: 400,
                    message: format!("{} rejected", step),
                    fbtrace_id: Some("trace-1".into()),
                });
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AdPlatform for ScriptedPlatform {
        async fn create_campaign(&self, name: &str) -> Result<Campaign, FacebookApiError> {
            self.record(LaunchStep::CreatingCampaign, format!("campaign:{}", name))?;
            Ok(Campaign {
                id: "c-1".into(),
                name: name.into(),
                status: "PAUSED".into(),
            })
        }

        async fn create_ad_set(
            &self,
            campaign_id: &str,
            name: &str,
        ) -> Result<AdSet, FacebookApiError> {
            self.record(
                LaunchStep::CreatingAdSet,
                format!("adset:{}:{}", campaign_id, name),
            )?;
            Ok(AdSet {
                id: "s-1".into(),
                name: name.into(),
                status: "PAUSED".into(),
                campaign_id: campaign_id.into(),
            })
        }

        async fn upload_image(&self, image_url: &str) -> Result<AdImage, FacebookApiError> {
            self.record(LaunchStep::UploadingImage, format!("image:{}", image_url))?;
            Ok(AdImage {
                hash: "h-1".into(),
                url: image_url.into(),
            })
        }

        async fn create_creative(
            &self,
            name: &str,
            message: &str,
            link: &str,
            image_hash: &str,
        ) -> Result<AdCreative, FacebookApiError> {
            self.record(
                LaunchStep::CreatingCreative,
                format!("creative:{}:{}:{}:{}", name, message, link, image_hash),
            )?;
            Ok(AdCreative {
                id: "cr-1".into(),
                name: name.into(),
            })
        }

        async fn create_ad(
            &self,
            name: &str,
            adset_id: &str,
            creative_id: &str,
        ) -> Result<Ad, FacebookApiError> {
            self.record(
                LaunchStep::CreatingAd,
                format!("ad:{}:{}:{}", name, adset_id, creative_id),
            )?;
            Ok(Ad {
                id: "a-1".into(),
                name: name.into(),
                status: "PAUSED".into(),
                creative: CreativeRef {
                    id: creative_id.into(),
                },
            })
        }
    }

    fn summer_sale() -> LaunchCampaignRequest {
        LaunchCampaignRequest {
            campaign_name: Some("Summer Sale".into()),
            message: Some("50% off".into()),
            link: Some("https://example.com".into()),
            image_url: Some("https://img.example.com/a.png".into()),
        }
    }

    #[tokio::test]
    async fn ids_flow_through_each_step_in_order() {
        let platform = ScriptedPlatform::default();
        let launched = launch_campaign(&platform, &summer_sale()).await.unwrap();

        assert_eq!(
            launched,
            LaunchedCampaign {
                campaign_id: "c-1".into(),
                adset_id: "s-1".into(),
                creative_id: "cr-1".into(),
                ad_id: "a-1".into(),
            }
        );
        assert_eq!(
            platform.calls(),
            vec![
                "campaign:Summer Sale",
                "adset:c-1:Summer Sale - Ad Set",
                "image:https://img.example.com/a.png",
                "creative:Summer Sale - Creative:50% off:https://example.com:h-1",
                "ad:Summer Sale - Ad:s-1:cr-1",
            ]
        );
    }

    #[tokio::test]
    async fn blank_required_field_fails_before_any_call() {
        let platform = ScriptedPlatform::default();
        let mut request = summer_sale();
        request.link = Some("   ".into());

        let err = launch_campaign(&platform, &request).await.unwrap_err();

        assert!(matches!(err, LaunchError::MissingFields));
        assert!(err.is_validation());
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_image_fails_before_any_call() {
        let platform = ScriptedPlatform::default();
        let mut request = summer_sale();
        request.image_url = None;

        let err = launch_campaign(&platform, &request).await.unwrap_err();

        assert!(matches!(err, LaunchError::ImageUrlRequired));
        assert_eq!(err.to_string(), "Image URL is required for this ad format");
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_take_precedence_over_missing_image() {
        let platform = ScriptedPlatform::default();
        let request = LaunchCampaignRequest {
            message: Some("hi".into()),
            ..Default::default()
        };

        let err = launch_campaign(&platform, &request).await.unwrap_err();
        assert!(matches!(err, LaunchError::MissingFields));
    }

    #[tokio::test]
    async fn ad_set_failure_stops_the_run_and_keeps_campaign_id() {
        let platform = ScriptedPlatform::failing_at(LaunchStep::CreatingAdSet);

        let err = launch_campaign(&platform, &summer_sale()).await.unwrap_err();

        match &err {
            LaunchError::StepFailed {
                step,
                created,
                source,
            } => {
                assert_eq!(*step, LaunchStep::CreatingAdSet);
                assert_eq!(created.campaign_id.as_deref(), Some("c-1"));
                assert!(created.adset_id.is_none());
                assert_eq!(source.message(), "create ad set rejected");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.fbtrace_id(), Some("trace-1"));
        assert!(!err.is_validation());
        assert_eq!(platform.calls().len(), 2);
    }

    #[tokio::test]
    async fn ad_failure_records_everything_created_before_it() {
        let platform = ScriptedPlatform::failing_at(LaunchStep::CreatingAd);

        let err = launch_campaign(&platform, &summer_sale()).await.unwrap_err();

        let LaunchError::StepFailed { created, .. } = err else {
            panic!("expected step failure");
        };
        assert_eq!(
            created,
            CreatedResources {
                campaign_id: Some("c-1".into()),
                adset_id: Some("s-1".into()),
                image_hash: Some("h-1".into()),
                creative_id: Some("cr-1".into()),
            }
        );
    }
}
