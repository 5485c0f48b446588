// API Versions
pub const DEFAULT_API_VERSION: &str = "v18.0";

// API Base URLs
pub const FACEBOOK_BASE_URL: &str = "https://graph.facebook.com";

// Content Types
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// Server Settings
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

// Ad Account
pub const AD_ACCOUNT_PREFIX: &str = "act_";

// Campaign Defaults
pub const CAMPAIGN_OBJECTIVE: &str = "OUTCOME_TRAFFIC";
pub const STATUS_PAUSED: &str = "PAUSED";

// Ad Set Defaults
pub const ADSET_DAILY_BUDGET: u64 = 10_000; // paise, above the ₹89.89 minimum
pub const ADSET_OPTIMIZATION_GOAL: &str = "LINK_CLICKS";
pub const TARGET_COUNTRIES: &[&str] = &["IN"];
pub const TARGET_AGE_MIN: u8 = 21;
pub const TARGET_AGE_MAX: u8 = 40;
pub const ADVANTAGE_AUDIENCE: u8 = 0;
pub const ADSET_START_DELAY_MINS: i64 = 15;
pub const ADSET_RUN_DAYS: i64 = 7;

// Errors
pub const UNKNOWN_TRACE_ID: &str = "unknown";
