//! Cgroup detection and CPU quota parsing.
//!
//! Supports both cgroup v1 and v2 for detecting CPU limits in containerized
//! environments (Docker, Kubernetes).

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

/// Default cgroup mount point.
pub const CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// Cgroup version detected on the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgroupVersion {
    /// cgroup v2 (unified hierarchy)
    V2,
    /// cgroup v1 (legacy hierarchy)
    V1,
    /// No cgroup detected (bare metal or unsupported)
    None,
}

impl CgroupVersion {
    /// Detect the cgroup version under a given mount point.
    pub fn detect_at(root: &Path) -> Self {
        // Check cgroup v2 first (unified hierarchy)
        if root.join("cgroup.controllers").exists() {
            debug!("Detected cgroup v2 (unified hierarchy)");
            return Self::V2;
        }

        if root.join("cpu/cpu.cfs_quota_us").exists() {
            debug!("Detected cgroup v1 (legacy hierarchy)");
            return Self::V1;
        }

        debug!("No cgroup detected");
        Self::None
    }
}

impl std::fmt::Display for CgroupVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V2 => write!(f, "v2"),
            Self::V1 => write!(f, "v1"),
            Self::None => write!(f, "none"),
        }
    }
}

/// CPU limits detected from cgroup.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuLimits {
    /// Cgroup version detected
    pub cgroup_version: Option<CgroupVersion>,
    /// CPU quota as fraction (e.g., 2.0 = 2 CPUs)
    pub cpu_quota: Option<f64>,
}

impl CpuLimits {
    /// Read CPU limits from the system cgroup mount.
    pub fn from_cgroup() -> Self {
        Self::from_cgroup_root(Path::new(CGROUP_ROOT))
    }

    /// Read CPU limits from a cgroup tree rooted at `root`.
    pub fn from_cgroup_root(root: &Path) -> Self {
        match CgroupVersion::detect_at(root) {
            CgroupVersion::V2 => Self {
                cgroup_version: Some(CgroupVersion::V2),
                cpu_quota: read_v2_quota(root),
            },
            CgroupVersion::V1 => Self {
                cgroup_version: Some(CgroupVersion::V1),
                cpu_quota: read_v1_quota(root),
            },
            CgroupVersion::None => Self::default(),
        }
    }

    /// Whole CPUs granted by the quota, rounded up, never below 1.
    ///
    /// - CPU quota 2.5 → 3
    /// - CPU quota 0.5 → 1
    /// - No quota → None
    pub fn quota_cores(&self) -> Option<usize> {
        self.cpu_quota.map(|quota| (quota.ceil() as usize).max(1))
    }

    /// Get CPU quota in human-readable format.
    pub fn cpu_quota_display(&self) -> String {
        match self.cpu_quota {
            Some(quota) => format!("{:.2} CPUs", quota),
            None => "unlimited".to_string(),
        }
    }
}

/// `cpu.max` holds `"$MAX $PERIOD"` or `"max $PERIOD"`.
fn read_v2_quota(root: &Path) -> Option<f64> {
    let content = fs::read_to_string(root.join("cpu.max")).ok()?;
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() != 2 || parts[0] == "max" {
        return None;
    }

    let max = parts[0].parse::<f64>().ok()?;
    let period = parts[1].parse::<f64>().ok()?;
    if max <= 0.0 || period <= 0.0 {
        return None;
    }

    trace!("cgroup v2 cpu.max: {}/{} = {:.2} CPUs", max, period, max / period);
    Some(max / period)
}

/// Negative `cfs_quota_us` means unlimited.
fn read_v1_quota(root: &Path) -> Option<f64> {
    let quota = fs::read_to_string(root.join("cpu/cpu.cfs_quota_us"))
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())?;

    let period = fs::read_to_string(root.join("cpu/cpu.cfs_period_us"))
        .ok()
        .and_then(|s| s.trim().parse::<f64>().ok())?;

    if quota <= 0 || period <= 0.0 {
        return None;
    }

    trace!(
        "cgroup v1 cpu quota: {}/{} = {:.2} CPUs",
        quota,
        period,
        quota as f64 / period
    );
    Some(quota as f64 / period)
}
