use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};

use crate::core::job::{Cluster, ComputeResource, Job, Node};

const MISSING: &str = "-";

/// `<month>/<day> ~ <hour>:<minute>:<second>` in the instant's zone.
pub fn format_short_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    format!(
        "{}/{} ~ {}:{}:{}",
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    )
}

pub fn format_full_time(time: &DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn created_short(job: &Job) -> String {
    job.created_time
        .map(|time| format_short_time(&time.with_timezone(&Local)))
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn created_full(job: &Job) -> String {
    job.created_time
        .as_ref()
        .map(format_full_time)
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn state_label(job: &Job) -> String {
    match job.state.as_deref() {
        Some(state) if !state.is_empty() => state.to_string(),
        _ => MISSING.to_string(),
    }
}

pub fn format_cluster(cluster: Option<&Cluster>) -> String {
    let Some(cluster) = cluster else {
        return MISSING.to_string();
    };
    match (&cluster.name, &cluster.cluster_id) {
        (Some(name), Some(id)) if name != id => format!("{name} ({id})"),
        (Some(name), _) => name.clone(),
        (None, Some(id)) => id.clone(),
        (None, None) => MISSING.to_string(),
    }
}

pub fn format_node(node: Option<&Node>) -> String {
    let Some(node) = node else {
        return MISSING.to_string();
    };
    let ip = node.node_ip.as_deref().unwrap_or(MISSING);
    let placement: Vec<&str> = [node.data_center.as_deref(), node.rack.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if placement.is_empty() {
        ip.to_string()
    } else {
        format!("{ip} [{}]", placement.join("/"))
    }
}

pub fn format_compute_resource(resource: &ComputeResource) -> String {
    let mut parts = vec![format!("#{}", resource.index)];
    if let Some(instances) = resource.instances {
        parts.push(format!("x{instances}"));
    }
    if let Some(cpu) = resource.cpu {
        parts.push(format!("cpu={cpu}"));
    }
    if let Some(ram) = resource.ram {
        parts.push(format!("ram={ram}MB"));
    }
    if let Some(disk) = resource.disk {
        parts.push(format!("disk={disk}GB"));
    }
    if resource.scalable == Some(true) {
        parts.push("scalable".to_string());
    }
    parts.join(" ")
}
