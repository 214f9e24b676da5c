use crate::core::formatter::{
    created_full, created_short, format_cluster, format_compute_resource, format_node,
    state_label,
};
use crate::core::intent::Intent;
use crate::core::state::CardState;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailValue {
    Text(String),
    Tag { label: String, intent: Intent },
    Resources(Vec<(i64, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: DetailValue,
}

impl DetailRow {
    /// Lines this row occupies in the detail table.
    pub fn height(&self) -> u16 {
        match &self.value {
            DetailValue::Resources(items) => {
                u16::try_from(items.len().max(1)).unwrap_or(u16::MAX)
            }
            _ => 1,
        }
    }
}

/// Everything the presentation layer needs for one card, derived from a
/// `CardState` snapshot. Detail rows are always built, whether the panel
/// is open or not.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub name: String,
    pub route: String,
    pub id_tag: String,
    pub workers_tag: String,
    pub state_tag: String,
    pub state_intent: Intent,
    pub syncing: bool,
    pub info_open: bool,
    pub created_short: String,
    pub detail: Vec<DetailRow>,
}

impl CardView {
    pub fn from_state(state: &CardState) -> Self {
        let job = state.job();
        let state_tag = state_label(job);
        let resources = job
            .compute_resources
            .iter()
            .map(|resource| (resource.index, format_compute_resource(resource)))
            .collect();

        let detail = vec![
            DetailRow {
                label: "Job ID",
                value: DetailValue::Text(job.job_id.to_string()),
            },
            DetailRow {
                label: "Worker Class",
                value: DetailValue::Text(job.worker_class.clone()),
            },
            DetailRow {
                label: "Cluster",
                value: DetailValue::Text(format_cluster(job.cluster())),
            },
            DetailRow {
                label: "Node",
                value: DetailValue::Text(format_node(job.node.as_ref())),
            },
            DetailRow {
                label: "Number of Workers",
                value: DetailValue::Text(job.number_of_workers.to_string()),
            },
            DetailRow {
                label: "Start Time",
                value: DetailValue::Text(created_full(job)),
            },
            DetailRow {
                label: "State",
                value: DetailValue::Tag {
                    label: state_tag.clone(),
                    intent: state.state_intent(),
                },
            },
            DetailRow {
                label: "Compute Resources",
                value: DetailValue::Resources(resources),
            },
        ];

        Self {
            name: job.job_name.clone(),
            route: job.route(),
            id_tag: format!("# {}", job.job_id),
            workers_tag: format!("workers {}", job.number_of_workers),
            state_tag,
            state_intent: state.state_intent(),
            syncing: state.syncing,
            info_open: state.info_open,
            created_short: created_short(job),
            detail,
        }
    }

    /// Height of the detail table body, independent of visibility.
    pub fn detail_height(&self) -> u16 {
        self.detail
            .iter()
            .map(DetailRow::height)
            .fold(0, u16::saturating_add)
    }
}
