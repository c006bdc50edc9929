use serde::{Deserialize, Serialize};

/// Main configuration structure for Fluency
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Persisted store configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Authored remediation content configuration
    #[serde(default)]
    pub content: ContentConfig,

    /// Error analysis thresholds
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Remediation auto-resolution rules
    #[serde(default)]
    pub remediation: RemediationConfig,

    /// Remediation priority weights
    #[serde(default)]
    pub priority: PriorityConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Persisted store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// Directory holding one JSON file per store key
    #[serde(default = "default_storage_path")]
    pub path: String,

    /// Key the tracker reads and writes its collection under
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_path() -> String {
    ".fluency/store".to_string()
}

fn default_storage_key() -> String {
    "fluency.misunderstandings".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            key: default_storage_key(),
        }
    }
}

/// Authored remediation content configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContentConfig {
    /// Directory of `<misunderstanding-id>.yaml` lessons overriding the built-in ones
    #[serde(default)]
    pub directory: Option<String>,
}

/// Error analysis thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// A pattern matching at least this many attempts is always reported
    #[serde(default = "default_min_match_count")]
    pub min_match_count: usize,

    /// A pattern explaining at least this fraction of errors is always reported
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Evidence examples kept per candidate
    #[serde(default = "default_max_examples")]
    pub max_examples: usize,
}

const fn default_min_match_count() -> usize {
    2
}

const fn default_min_confidence() -> f64 {
    0.3
}

const fn default_max_examples() -> usize {
    3
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_match_count: default_min_match_count(),
            min_confidence: default_min_confidence(),
            max_examples: default_max_examples(),
        }
    }
}

/// Remediation auto-resolution rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RemediationConfig {
    /// Check score at or above which an attempt counts toward resolution
    #[serde(default = "default_resolve_score")]
    pub resolve_score: f64,

    /// Cumulative attempts required before a passing score resolves
    #[serde(default = "default_min_attempts_to_resolve")]
    pub min_attempts_to_resolve: u32,
}

const fn default_resolve_score() -> f64 {
    0.8
}

const fn default_min_attempts_to_resolve() -> u32 {
    2
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self {
            resolve_score: default_resolve_score(),
            min_attempts_to_resolve: default_min_attempts_to_resolve(),
        }
    }
}

/// Remediation priority weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PriorityConfig {
    #[serde(default = "default_severity_weight")]
    pub severity_weight: f64,

    #[serde(default = "default_confidence_weight")]
    pub confidence_weight: f64,

    /// Detection count contributes at most this many points
    #[serde(default = "default_detection_cap")]
    pub detection_cap: u32,

    /// Detections younger than this many days earn the recency boost
    #[serde(default = "default_recent_days")]
    pub recent_days: i64,

    #[serde(default = "default_recency_boost")]
    pub recency_boost: f64,

    #[serde(default = "default_in_progress_boost")]
    pub in_progress_boost: f64,

    /// Subtracted once remediation keeps failing
    #[serde(default = "default_stalled_penalty")]
    pub stalled_penalty: f64,

    /// Attempts beyond which a low score counts as stalled
    #[serde(default = "default_stalled_attempts")]
    pub stalled_attempts: u32,

    /// Last scores below this count as stalled
    #[serde(default = "default_stalled_score")]
    pub stalled_score: f64,
}

const fn default_severity_weight() -> f64 {
    10.0
}

const fn default_confidence_weight() -> f64 {
    5.0
}

const fn default_detection_cap() -> u32 {
    5
}

const fn default_recent_days() -> i64 {
    7
}

const fn default_recency_boost() -> f64 {
    3.0
}

const fn default_in_progress_boost() -> f64 {
    2.0
}

const fn default_stalled_penalty() -> f64 {
    5.0
}

const fn default_stalled_attempts() -> u32 {
    2
}

const fn default_stalled_score() -> f64 {
    0.5
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            severity_weight: default_severity_weight(),
            confidence_weight: default_confidence_weight(),
            detection_cap: default_detection_cap(),
            recent_days: default_recent_days(),
            recency_boost: default_recency_boost(),
            in_progress_boost: default_in_progress_boost(),
            stalled_penalty: default_stalled_penalty(),
            stalled_attempts: default_stalled_attempts(),
            stalled_score: default_stalled_score(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Write log events to stderr
    #[serde(default = "default_true")]
    pub enable_console: bool,

    /// Rotation policy for file output: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const fn default_true() -> bool {
    true
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            enable_console: true,
            rotation: default_rotation(),
        }
    }
}
