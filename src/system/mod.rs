//! Host CPU detection.
//!
//! A container's cgroup CPU quota is what the worker pool actually gets, so
//! it wins over the logical CPU count of the machine.
//!
//! # Example
//!
//! ```rust,ignore
//! use launch_plan::system::{detect_cores, CpuLimits};
//!
//! let limits = CpuLimits::from_cgroup();
//! println!("CPU quota: {}, cores: {:?}", limits.cpu_quota_display(), detect_cores());
//! ```

mod cgroup;

pub use cgroup::{CgroupVersion, CpuLimits, CGROUP_ROOT};

use tracing::debug;

/// Read the host core count.
///
/// Returns `None` when nothing usable could be read; the planner treats that
/// as a single core.
pub fn detect_cores() -> Option<i64> {
    cores_from(&CpuLimits::from_cgroup(), num_cpus::get())
}

fn cores_from(limits: &CpuLimits, logical_cpus: usize) -> Option<i64> {
    if let Some(cores) = limits.quota_cores() {
        debug!(
            cores,
            quota = %limits.cpu_quota_display(),
            cgroup = ?limits.cgroup_version,
            "cores from cgroup CPU quota"
        );
        return i64::try_from(cores).ok();
    }

    debug!(cores = logical_cpus, "cores from logical CPU count");
    i64::try_from(logical_cpus).ok().filter(|&n| n > 0)
}
