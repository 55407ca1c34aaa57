use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a job worker as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkerState {
    /// Reserved by a caller, about to run a job.
    Idle,
    /// A job or a result query is in flight.
    Active,
    /// Available for reuse.
    Inactive,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerState::Idle => write!(f, "IDLE"),
            WorkerState::Active => write!(f, "ACTIVE"),
            WorkerState::Inactive => write!(f, "INACTIVE"),
        }
    }
}

/// The three configuration payloads handed to the encoding engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub job: Value,
    pub pipeline: Value,
    pub encoding_profile: Value,
}

impl JobSpec {
    pub fn new(job: Value, pipeline: Value, encoding_profile: Value) -> Self {
        Self {
            job,
            pipeline,
            encoding_profile,
        }
    }

    /// Output folder named by the job description, if any.
    pub fn output_location(&self) -> Option<String> {
        self.job
            .get("output")
            .and_then(Value::as_str)
            .filter(|output| !output.is_empty())
            .map(str::to_owned)
    }
}

/// Body of a job-creation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[serde(default, alias = "jobData")]
    pub job: Option<Value>,
    #[serde(default)]
    pub pipeline_url: Option<String>,
    #[serde(default)]
    pub encoding_settings_url: Option<String>,
}

/// Point-in-time view of one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSnapshot {
    pub id: String,
    pub status: WorkerState,
    pub job_output: Option<String>,
    /// Milliseconds.
    pub running_time: u64,
}

/// Record written to the worker-state mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRecord {
    pub id: String,
    pub status: WorkerState,
    pub job_data: Value,
    pub pipeline_data: Value,
    pub encoding_profile_data: Value,
    pub job_timer: u64,
}

/// VMAF models the scoring backend produces results for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QualityModel {
    Hd,
    PhoneHd,
    Uhd,
}

impl QualityModel {
    pub const ALL: [QualityModel; 3] = [QualityModel::Hd, QualityModel::PhoneHd, QualityModel::Uhd];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityModel::Hd => "HD",
            QualityModel::PhoneHd => "PhoneHD",
            QualityModel::Uhd => "UHD",
        }
    }
}

impl fmt::Display for QualityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QualityModel::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| format!("unknown quality model '{}'", s))
    }
}

/// One score returned by the scoring backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub filename: String,
    pub score: f64,
}

/// output folder -> model -> rendition key -> score
pub type JobResult = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;
