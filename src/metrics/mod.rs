//! Point-in-time system measurements and the state carried between polls.
//!
//! Every refresh is best-effort: a missing file, absent device, or failed
//! utility leaves the previous value (or the documented absent marker) in
//! place and reports the failure to the caller, which logs it at debug and
//! carries on. Nothing here is allowed to take the render path down.

use std::path::{Path, PathBuf};

use crate::config::{
    CPU_CORES, DRIVE_DEVICES, DRIVE_SLOTS, HDD_VOLUME, MEMINFO_PATH, PROC_STAT_PATH, ROOT_MOUNT,
    SSD_VOLUME, THERMAL_ZONE_PATH,
};
use crate::Result;

pub mod external;
pub mod host;

use host::CoreTimes;

/// Latest reading of everything the screens show. Mutated in place by the
/// sampler, read by the render path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemSnapshot {
    pub cpu_temp_c: i32,
    pub cpu_load_pct: [u8; CPU_CORES],
    pub mem_used_pct: u8,
    pub sdcard_used_pct: u8,
    /// None while the HDD volume node is absent.
    pub hdd_used_pct: Option<u8>,
    /// None while the SSD volume node is absent.
    pub ssd_used_pct: Option<u8>,
    /// Empty when the interface has no IPv4 address.
    pub eth_ip: String,
    pub wlan_ip: String,
    /// 0 for empty drive slots.
    pub drive_temps_c: [i32; DRIVE_SLOTS],
}

/// Running per-drive min/max since process start. Seeded from the first
/// sample so min <= current <= max holds from then on; never reset.
#[derive(Debug, Default)]
pub struct DriveTempHistory {
    min: [i32; DRIVE_SLOTS],
    max: [i32; DRIVE_SLOTS],
    seeded: bool,
}

impl DriveTempHistory {
    pub fn observe(&mut self, temps_c: &[i32; DRIVE_SLOTS]) {
        if !self.seeded {
            self.min = *temps_c;
            self.max = *temps_c;
            self.seeded = true;
            return;
        }
        for slot in 0..DRIVE_SLOTS {
            self.min[slot] = self.min[slot].min(temps_c[slot]);
            self.max[slot] = self.max[slot].max(temps_c[slot]);
        }
    }

    pub fn min_c(&self, slot: usize) -> i32 {
        self.min[slot]
    }

    pub fn max_c(&self, slot: usize) -> i32 {
        self.max[slot]
    }
}

/// Carries the previous /proc/stat counters so busy percentages can be
/// computed from deltas. The first result after start covers the whole
/// uptime and is meaningless; callers prime one sample and discard it.
#[derive(Debug, Default)]
pub struct CpuLoadTracker {
    last: [CoreTimes; CPU_CORES],
}

impl CpuLoadTracker {
    /// Busy% per core over the interval since the previous update. A zero
    /// total delta (no elapsed ticks) is defined as 0% busy.
    pub fn update(&mut self, now: [CoreTimes; CPU_CORES]) -> [u8; CPU_CORES] {
        let mut busy = [0u8; CPU_CORES];
        for core in 0..CPU_CORES {
            let idle_delta = now[core].idle.saturating_sub(self.last[core].idle);
            let total_delta = now[core].total.saturating_sub(self.last[core].total);
            if total_delta > 0 {
                let idle_pct = idle_delta as f64 / total_delta as f64 * 100.0;
                busy[core] = (100.0 - idle_pct).clamp(0.0, 100.0).round() as u8;
            }
            self.last[core] = now[core];
        }
        busy
    }
}

/// Where the sampler looks. Tests point these at temp files; production
/// uses the fixed paths from `config`.
#[derive(Debug, Clone)]
pub struct SamplerPaths {
    pub thermal_zone: PathBuf,
    pub proc_stat: PathBuf,
    pub meminfo: PathBuf,
    pub drive_devices: [PathBuf; DRIVE_SLOTS],
    pub root_mount: String,
    pub hdd_volume: PathBuf,
    pub ssd_volume: PathBuf,
    pub eth_iface: String,
    pub wlan_iface: String,
}

impl Default for SamplerPaths {
    fn default() -> Self {
        Self {
            thermal_zone: THERMAL_ZONE_PATH.into(),
            proc_stat: PROC_STAT_PATH.into(),
            meminfo: MEMINFO_PATH.into(),
            drive_devices: DRIVE_DEVICES.map(PathBuf::from),
            root_mount: ROOT_MOUNT.to_string(),
            hdd_volume: HDD_VOLUME.into(),
            ssd_volume: SSD_VOLUME.into(),
            eth_iface: "eth0".to_string(),
            wlan_iface: "wlan0".to_string(),
        }
    }
}

/// Owns the snapshot plus the cross-poll state (load counters, drive
/// history) and refreshes each metric group on request.
#[derive(Debug)]
pub struct Sampler {
    paths: SamplerPaths,
    cpu: CpuLoadTracker,
    history: DriveTempHistory,
    snapshot: SystemSnapshot,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    pub fn new() -> Self {
        Self::with_paths(SamplerPaths::default())
    }

    pub fn with_paths(paths: SamplerPaths) -> Self {
        Self {
            paths,
            cpu: CpuLoadTracker::default(),
            history: DriveTempHistory::default(),
            snapshot: SystemSnapshot::default(),
        }
    }

    pub fn snapshot(&self) -> &SystemSnapshot {
        &self.snapshot
    }

    pub fn history(&self) -> &DriveTempHistory {
        &self.history
    }

    pub fn refresh_cpu_temp(&mut self) -> Result<()> {
        self.snapshot.cpu_temp_c = host::read_cpu_temp(&self.paths.thermal_zone)?;
        Ok(())
    }

    pub fn refresh_cpu_load(&mut self) -> Result<()> {
        let times = host::read_core_times(&self.paths.proc_stat)?;
        self.snapshot.cpu_load_pct = self.cpu.update(times);
        Ok(())
    }

    pub fn refresh_memory(&mut self) -> Result<()> {
        self.snapshot.mem_used_pct = host::read_mem_used_pct(&self.paths.meminfo)?;
        Ok(())
    }

    /// Root is always queried; the HDD/SSD pools only while their volume
    /// node exists. An absent node clears the figure to None without
    /// running `df` at all.
    pub fn refresh_filesystems(&mut self) -> Result<()> {
        self.snapshot.hdd_used_pct = query_volume(&self.paths.hdd_volume, self.snapshot.hdd_used_pct);
        self.snapshot.ssd_used_pct = query_volume(&self.paths.ssd_volume, self.snapshot.ssd_used_pct);
        self.snapshot.sdcard_used_pct = external::filesystem_used_pct(&self.paths.root_mount)?;
        Ok(())
    }

    pub fn refresh_network(&mut self) -> Result<()> {
        self.snapshot.wlan_ip = external::interface_address(&self.paths.wlan_iface)?;
        self.snapshot.eth_ip = external::interface_address(&self.paths.eth_iface)?;
        Ok(())
    }

    /// Re-read all four SMART slots and fold the result into the running
    /// min/max history. Empty slots read 0; a failed utility call keeps the
    /// slot at its previous value.
    pub fn refresh_drive_temps(&mut self) -> Result<()> {
        for (slot, device) in self.paths.drive_devices.clone().iter().enumerate() {
            if device.exists() {
                if let Ok(temp) = external::drive_temperature(&device.to_string_lossy()) {
                    self.snapshot.drive_temps_c[slot] = temp;
                }
            } else {
                self.snapshot.drive_temps_c[slot] = 0;
            }
        }
        self.history.observe(&self.snapshot.drive_temps_c);
        Ok(())
    }
}

fn query_volume(device: &Path, previous: Option<u8>) -> Option<u8> {
    if !device.exists() {
        return None;
    }
    match external::filesystem_used_pct(&device.to_string_lossy()) {
        Ok(pct) => Some(pct),
        Err(_) => previous,
    }
}
