//! Host resource snapshot for the dashboard
//!
//! Every reading is a percentage in `[0, 100]`. Readings that are not
//! available on this host (no disks reported, no battery) fall back to a fixed
//! default instead of failing.

use serde::{Deserialize, Serialize};
use starship_battery::units::ratio;
use starship_battery::Manager;
use std::path::Path;
use sysinfo::{Disks, System};

/// Reported when the host has no battery sensor
pub const DEFAULT_BATTERY: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub cpu: f32,
    pub ram: f32,
    pub disk: f32,
    pub battery: f32,
}

/// Take a one-shot snapshot of CPU, RAM, disk and battery usage
pub async fn snapshot() -> SystemStatus {
    // sysinfo and the battery manager read procfs/sysfs synchronously
    match tokio::task::spawn_blocking(read_status).await {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!(error = %e, "System snapshot task failed");
            SystemStatus {
                cpu: 0.0,
                ram: 0.0,
                disk: 0.0,
                battery: DEFAULT_BATTERY,
            }
        }
    }
}

fn read_status() -> SystemStatus {
    let mut sys = System::new();

    // CPU usage is a delta between two refreshes
    sys.refresh_cpu_usage();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let cpu = sys.global_cpu_usage();
    let ram = percent(sys.used_memory(), sys.total_memory());
    let disk = disk_usage(&Disks::new_with_refreshed_list());
    let battery = battery_level().unwrap_or(DEFAULT_BATTERY);

    SystemStatus {
        cpu: clamp_percent(cpu),
        ram: clamp_percent(ram),
        disk: clamp_percent(disk),
        battery: clamp_percent(battery),
    }
}

/// Usage of the root filesystem, or of all disks together when there is no `/`
fn disk_usage(disks: &Disks) -> f32 {
    let root = disks
        .list()
        .iter()
        .find(|d| d.mount_point() == Path::new("/") && d.total_space() > 0);

    if let Some(d) = root {
        return percent(
            d.total_space().saturating_sub(d.available_space()),
            d.total_space(),
        );
    }

    let (used, total) = disks.list().iter().fold((0u64, 0u64), |(used, total), d| {
        (
            used + d.total_space().saturating_sub(d.available_space()),
            total + d.total_space(),
        )
    });
    percent(used, total)
}

fn percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64 * 100.0) as f32
}

fn clamp_percent(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Charge of the first battery the OS reports. `None` when there is none.
fn battery_level() -> Option<f32> {
    let manager = match Manager::new() {
        Ok(manager) => manager,
        Err(e) => {
            tracing::debug!(error = %e, "Battery manager unavailable");
            return None;
        }
    };

    let mut batteries = match manager.batteries() {
        Ok(batteries) => batteries,
        Err(e) => {
            tracing::debug!(error = %e, "Could not enumerate batteries");
            return None;
        }
    };

    batteries
        .find_map(|battery| battery.ok())
        .map(|battery| battery.state_of_charge().get::<ratio::percent>())
}
