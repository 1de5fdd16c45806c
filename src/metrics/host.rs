//! Readers for the kernel-exposed metric files, split into thin I/O
//! wrappers and pure text parsers so the parsing is testable with
//! synthetic input.

use std::fs;
use std::path::Path;

use crate::config::CPU_CORES;
use crate::{Error, Result};

/// Cumulative idle and total jiffies for one core, as read from /proc/stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoreTimes {
    pub idle: u64,
    pub total: u64,
}

/// CPU temperature in whole degrees C from a thermal-zone file.
pub fn read_cpu_temp(path: &Path) -> Result<i32> {
    let raw = fs::read_to_string(path)?;
    parse_millidegrees(&raw).ok_or_else(|| Error::Parse(format!("bad thermal zone value: {raw:?}")))
}

/// Thermal zones report milli-degrees as a bare integer; truncate to C.
pub fn parse_millidegrees(raw: &str) -> Option<i32> {
    let milli: i64 = raw.trim().parse().ok()?;
    Some((milli / 1000) as i32)
}

/// Per-core counter samples from /proc/stat.
pub fn read_core_times(path: &Path) -> Result<[CoreTimes; CPU_CORES]> {
    let raw = fs::read_to_string(path)?;
    parse_core_times(&raw).ok_or_else(|| Error::Parse("unexpected /proc/stat layout".into()))
}

/// Pick the four `cpuN` lines out of a /proc/stat dump. The aggregate `cpu`
/// line is skipped; cores are matched by label, not position.
pub fn parse_core_times(raw: &str) -> Option<[CoreTimes; CPU_CORES]> {
    let mut out = [CoreTimes::default(); CPU_CORES];
    for (core, slot) in out.iter_mut().enumerate() {
        let label = format!("cpu{core}");
        let line = raw
            .lines()
            .find(|line| line.split_whitespace().next() == Some(label.as_str()))?;
        *slot = parse_core_line(line)?;
    }
    Some(out)
}

/// Sum every numeric field for total time; the fourth field is idle.
fn parse_core_line(line: &str) -> Option<CoreTimes> {
    let mut fields = line.split_whitespace();
    fields.next()?; // cpuN label
    let mut times = CoreTimes::default();
    let mut count = 0usize;
    for (index, field) in fields.enumerate() {
        let value: u64 = field.parse().ok()?;
        times.total += value;
        if index == 3 {
            times.idle = value;
        }
        count += 1;
    }
    if count < 4 {
        return None;
    }
    Some(times)
}

/// Memory-used percentage from /proc/meminfo.
pub fn read_mem_used_pct(path: &Path) -> Result<u8> {
    let raw = fs::read_to_string(path)?;
    parse_mem_used_pct(&raw).ok_or_else(|| Error::Parse("unexpected /proc/meminfo layout".into()))
}

/// used% = round((1 - MemAvailable/MemTotal) * 100). MemFree is ignored;
/// available is the figure that accounts for reclaimable caches.
pub fn parse_mem_used_pct(raw: &str) -> Option<u8> {
    let total = meminfo_kib(raw, "MemTotal:")?;
    let available = meminfo_kib(raw, "MemAvailable:")?;
    if total == 0 {
        return None;
    }
    let used = (1.0 - available as f64 / total as f64) * 100.0;
    Some(used.round().clamp(0.0, 100.0) as u8)
}

fn meminfo_kib(raw: &str, key: &str) -> Option<u64> {
    raw.lines()
        .find(|line| line.starts_with(key))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn millidegrees_truncate_toward_zero() {
        assert_eq!(parse_millidegrees("48370\n"), Some(48));
        assert_eq!(parse_millidegrees("999"), Some(0));
        assert_eq!(parse_millidegrees("  52000 "), Some(52));
        assert_eq!(parse_millidegrees("not-a-number"), None);
    }

    #[test]
    fn read_cpu_temp_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "61234").unwrap();
        assert_eq!(read_cpu_temp(file.path()).unwrap(), 61);
    }

    const PROC_STAT: &str = "\
cpu  100 2 300 4000 50 0 6 0 0 0
cpu0 10 0 30 400 5 0 1 0 0 0
cpu1 20 0 30 300 5 0 1 0 0 0
cpu2 30 0 30 200 5 0 1 0 0 0
cpu3 40 0 30 100 5 0 1 0 0 0
intr 12345 0 0
ctxt 6789
";

    #[test]
    fn core_times_come_from_labelled_lines() {
        let times = parse_core_times(PROC_STAT).unwrap();
        assert_eq!(times[0], CoreTimes { idle: 400, total: 446 });
        assert_eq!(times[3], CoreTimes { idle: 100, total: 176 });
    }

    #[test]
    fn aggregate_line_is_not_mistaken_for_a_core() {
        // cpu0 must match the cpu0 label even though "cpu" sorts first.
        let times = parse_core_times(PROC_STAT).unwrap();
        assert_ne!(times[0].total, 4458);
    }

    #[test]
    fn missing_core_line_is_an_error() {
        let truncated = "cpu  1 2 3 4\ncpu0 1 2 3 4\ncpu1 1 2 3 4\n";
        assert!(parse_core_times(truncated).is_none());
    }

    #[test]
    fn short_core_line_is_rejected() {
        assert!(parse_core_line("cpu0 1 2 3").is_none());
        assert!(parse_core_line("cpu0 1 2 3 4").is_some());
    }

    const MEMINFO: &str = "\
MemTotal:        3882924 kB
MemFree:          123456 kB
MemAvailable:    1941462 kB
Buffers:          100000 kB
";

    #[test]
    fn mem_used_pct_uses_available_not_free() {
        // Exactly half available -> 50% used, regardless of MemFree.
        assert_eq!(parse_mem_used_pct(MEMINFO), Some(50));
    }

    #[test]
    fn mem_used_pct_rounds() {
        let raw = "MemTotal: 1000 kB\nMemFree: 1 kB\nMemAvailable: 333 kB\n";
        assert_eq!(parse_mem_used_pct(raw), Some(67));
    }

    #[test]
    fn mem_zero_total_is_rejected() {
        let raw = "MemTotal: 0 kB\nMemAvailable: 0 kB\n";
        assert_eq!(parse_mem_used_pct(raw), None);
    }
}
