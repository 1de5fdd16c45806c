//! Metrics that come from external utilities rather than kernel files:
//! filesystem usage (`df`), interface addresses (`ifconfig`), and drive
//! SMART temperatures (`hddtemp`). Invocation is separated from stdout
//! parsing; the parsers are pure and unit tested.
//!
//! No timeouts are applied: a hung utility stalls the whole loop.

use std::process::Command;

use crate::{Error, Result};

fn run_capture(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program).args(args).output()?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Percentage used for the filesystem backing `target` (a mount point or
/// device node), via `df --output=pcent`.
pub fn filesystem_used_pct(target: &str) -> Result<u8> {
    let stdout = run_capture("df", &["--output=pcent", target])?;
    parse_df_percent(&stdout)
        .ok_or_else(|| Error::Parse(format!("unexpected df output for {target}")))
}

/// The percentage sits on the second line, after the "Use%" header.
pub fn parse_df_percent(stdout: &str) -> Option<u8> {
    let line = stdout.lines().nth(1)?;
    line.trim().trim_end_matches('%').parse().ok()
}

/// First IPv4 address of `iface`, or an empty string when the interface has
/// no address (or does not exist).
pub fn interface_address(iface: &str) -> Result<String> {
    let stdout = run_capture("ifconfig", &[iface])?;
    Ok(parse_inet_address(&stdout))
}

/// ifconfig puts the address line second: `inet <addr> netmask ...`. The
/// first token must be exactly the `inet` marker; anything else (an `inet6`
/// line, an interface without an address) yields an empty string.
pub fn parse_inet_address(stdout: &str) -> String {
    let Some(line) = stdout.lines().nth(1) else {
        return String::new();
    };
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some("inet"), Some(addr)) => addr.to_string(),
        _ => String::new(),
    }
}

/// Current temperature of `device` in whole degrees C via `hddtemp -w`.
pub fn drive_temperature(device: &str) -> Result<i32> {
    let stdout = run_capture("hddtemp", &["-w", device])?;
    parse_hddtemp(&stdout)
        .ok_or_else(|| Error::Parse(format!("unexpected hddtemp output for {device}")))
}

/// hddtemp prints `/dev/sda: MODEL NAME: 36 C` (or a degree sign); the
/// temperature is the leading integer of the third colon-delimited field,
/// possibly negative for a drive below freezing.
pub fn parse_hddtemp(stdout: &str) -> Option<i32> {
    let line = stdout.lines().next()?;
    let field = line.split(':').nth(2)?;
    let number: String = field
        .trim_start()
        .chars()
        .enumerate()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && c == '-'))
        .map(|(_, c)| c)
        .collect();
    number.parse().ok()
}
