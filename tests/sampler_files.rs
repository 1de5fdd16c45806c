use std::fs;
use std::path::Path;

use naspanel::metrics::{Sampler, SamplerPaths};
use tempfile::TempDir;

const PROC_STAT_FIRST: &str = "\
cpu  400 0 400 3200 0 0 0 0 0 0
cpu0 100 0 100 800 0 0 0 0 0 0
cpu1 100 0 100 800 0 0 0 0 0 0
cpu2 100 0 100 800 0 0 0 0 0 0
cpu3 100 0 100 800 0 0 0 0 0 0
intr 12345
";

const PROC_STAT_SECOND: &str = "\
cpu  440 0 440 3240 0 0 0 0 0 0
cpu0 110 0 110 810 0 0 0 0 0 0
cpu1 100 0 100 830 0 0 0 0 0 0
cpu2 115 0 115 800 0 0 0 0 0 0
cpu3 100 0 100 800 0 0 0 0 0 0
intr 12390
";

const MEMINFO: &str = "\
MemTotal:        3884968 kB
MemFree:          201432 kB
MemAvailable:    2719476 kB
Buffers:          105640 kB
";

fn fixture_paths(dir: &Path) -> SamplerPaths {
    let mut paths = SamplerPaths::default();
    paths.thermal_zone = dir.join("thermal");
    paths.proc_stat = dir.join("stat");
    paths.meminfo = dir.join("meminfo");
    // Point the volume probes at nodes that do not exist so the df path
    // is never taken.
    paths.hdd_volume = dir.join("no-such-hdd");
    paths.ssd_volume = dir.join("no-such-ssd");
    paths
}

#[test]
fn cpu_metrics_come_from_injected_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("thermal"), "48123\n").unwrap();
    fs::write(dir.path().join("stat"), PROC_STAT_FIRST).unwrap();
    fs::write(dir.path().join("meminfo"), MEMINFO).unwrap();

    let mut sampler = Sampler::with_paths(fixture_paths(dir.path()));
    sampler.refresh_cpu_temp().unwrap();
    sampler.refresh_memory().unwrap();
    // First load sample only primes the counters.
    sampler.refresh_cpu_load().unwrap();

    fs::write(dir.path().join("stat"), PROC_STAT_SECOND).unwrap();
    sampler.refresh_cpu_load().unwrap();

    let snapshot = sampler.snapshot();
    assert_eq!(snapshot.cpu_temp_c, 48);
    // 2719476 / 3884968 available, rounded.
    assert_eq!(snapshot.mem_used_pct, 30);
    // Per-core deltas: 20/30 busy, 0/30, 30/30, 0/0.
    assert_eq!(snapshot.cpu_load_pct, [67, 0, 100, 0]);
}

#[test]
fn failed_reads_leave_previous_values_in_place() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("thermal"), "51000\n").unwrap();

    let mut sampler = Sampler::with_paths(fixture_paths(dir.path()));
    sampler.refresh_cpu_temp().unwrap();
    assert_eq!(sampler.snapshot().cpu_temp_c, 51);

    fs::remove_file(dir.path().join("thermal")).unwrap();
    assert!(sampler.refresh_cpu_temp().is_err());
    assert_eq!(sampler.snapshot().cpu_temp_c, 51);
}

#[test]
fn absent_volumes_report_none_without_running_df() {
    let dir = TempDir::new().unwrap();
    let mut paths = fixture_paths(dir.path());
    paths.root_mount = "/".to_string();

    let mut sampler = Sampler::with_paths(paths);
    sampler.refresh_filesystems().unwrap();

    let snapshot = sampler.snapshot();
    assert_eq!(snapshot.hdd_used_pct, None);
    assert_eq!(snapshot.ssd_used_pct, None);
    // The root filesystem always exists, so its gauge is populated.
    assert!(snapshot.sdcard_used_pct <= 100);
}
