use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::intent::{classify, Intent};

/// Job identifier as the backend sends it: integer or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Number(i64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Number(value) => write!(f, "{value}"),
            JobId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for JobId {
    fn from(value: i64) -> Self {
        JobId::Number(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        JobId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(rename = "clusterID", default)]
    pub cluster_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "nodeIP", default)]
    pub node_ip: Option<String>,
    #[serde(default)]
    pub rack: Option<String>,
    #[serde(rename = "dataCenter", default)]
    pub data_center: Option<String>,
    #[serde(default)]
    pub cluster: Option<Cluster>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeResource {
    pub index: i64,
    #[serde(default)]
    pub cpu: Option<f64>,
    #[serde(default)]
    pub ram: Option<i64>,
    #[serde(default)]
    pub disk: Option<f64>,
    #[serde(default)]
    pub instances: Option<i64>,
    #[serde(default)]
    pub scalable: Option<bool>,
}

/// A job record as owned by the backend. Cards never edit one in place,
/// they only swap it for a newer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "jobID")]
    pub job_id: JobId,
    #[serde(rename = "jobName", default)]
    pub job_name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(rename = "numberOfWorkers", default)]
    pub number_of_workers: u32,
    #[serde(rename = "workerClass", default)]
    pub worker_class: String,
    #[serde(
        rename = "createdTime",
        default,
        deserialize_with = "deserialize_created_time"
    )]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub node: Option<Node>,
    #[serde(rename = "computeResources", default)]
    pub compute_resources: Vec<ComputeResource>,
}

impl Job {
    pub fn state_intent(&self) -> Intent {
        self.state.as_deref().map_or(Intent::None, classify)
    }

    pub fn cluster(&self) -> Option<&Cluster> {
        self.node.as_ref().and_then(|node| node.cluster.as_ref())
    }

    /// Opaque navigation target for the job detail page.
    pub fn route(&self) -> String {
        format!("jobs/{}", self.job_id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

fn deserialize_created_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match raw {
        RawTimestamp::Millis(millis) => Utc.timestamp_millis_opt(millis).single(),
        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
    }))
}
