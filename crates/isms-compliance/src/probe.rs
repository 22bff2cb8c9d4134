//! Environment probes
//!
//! A probe never fails: any signal it cannot read, or cannot read in time,
//! is logged and reported as unknown.

use crate::signals::{DomainSignalSnapshot, PatchState, ServiceState};
use async_trait::async_trait;
use isms_common::{IsmsError, IsmsResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Source of environment signals
#[async_trait]
pub trait SignalProbe: Send + Sync {
    /// Best-effort collection of every signal
    async fn collect(&self) -> DomainSignalSnapshot;
}

/// Probe settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Upper bound for each individual signal
    pub signal_timeout_secs: u64,
    /// Patch level declared by an operator; unknown when absent
    pub declared_patch_state: Option<PatchState>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            signal_timeout_secs: 10,
            declared_patch_state: None,
        }
    }
}

impl ProbeConfig {
    pub fn signal_timeout(&self) -> Duration {
        Duration::from_secs(self.signal_timeout_secs)
    }

    pub fn validate(&self) -> IsmsResult<()> {
        if self.signal_timeout_secs == 0 {
            return Err(IsmsError::Config("probe signal timeout must be positive".into()));
        }
        Ok(())
    }
}

/// Socket counts read from the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SocketCounts {
    pub listening: u32,
    pub established: u32,
}

/// Probe reading live operating system state
pub struct SystemProbe {
    config: ProbeConfig,
}

impl SystemProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Run one signal under the configured timeout, degrading to `None`
    async fn bounded<T, F>(&self, signal: &'static str, read: F) -> Option<T>
    where
        F: Future<Output = IsmsResult<T>>,
    {
        let outcome = match tokio::time::timeout(self.config.signal_timeout(), read).await {
            Ok(result) => result,
            Err(_) => Err(IsmsError::SignalUnavailable {
                signal,
                reason: format!("timed out after {}s", self.config.signal_timeout_secs),
            }),
        };

        match outcome {
            Ok(value) => {
                debug!(signal, "Signal collected");
                Some(value)
            }
            Err(err) => {
                let err = match err {
                    e @ IsmsError::SignalUnavailable { .. } => e,
                    other => IsmsError::SignalUnavailable {
                        signal,
                        reason: other.to_string(),
                    },
                };
                warn!(error = %err, "Signal degraded to UNKNOWN");
                None
            }
        }
    }

    async fn firewall_state(&self) -> IsmsResult<ServiceState> {
        #[cfg(target_os = "windows")]
        {
            let out = run("netsh", &["advfirewall", "show", "allprofiles", "state"]).await?;
            Ok(parse_netsh_firewall(&out))
        }
        #[cfg(target_os = "macos")]
        {
            let out = run(
                "/usr/libexec/ApplicationFirewall/socketfilterfw",
                &["--getglobalstate"],
            )
            .await?;
            Ok(parse_socketfilterfw(&out))
        }
        #[cfg(target_os = "linux")]
        {
            let out = run("ufw", &["status"]).await?;
            Ok(parse_ufw_status(&out))
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            Err(IsmsError::SignalUnavailable {
                signal: "firewall",
                reason: "unsupported platform".into(),
            })
        }
    }

    async fn antivirus_state(&self) -> IsmsResult<ServiceState> {
        #[cfg(target_os = "windows")]
        {
            let out = run(
                "powershell",
                &[
                    "-NoProfile",
                    "-Command",
                    "(Get-MpComputerStatus).AntivirusEnabled",
                ],
            )
            .await?;
            Ok(parse_defender_status(&out))
        }
        #[cfg(not(target_os = "windows"))]
        {
            Err(IsmsError::SignalUnavailable {
                signal: "antivirus",
                reason: "no antivirus status source on this platform".into(),
            })
        }
    }

    async fn socket_counts(&self) -> IsmsResult<SocketCounts> {
        #[cfg(target_os = "linux")]
        {
            let mut counts = SocketCounts::default();
            let mut read_any = false;
            for table in ["/proc/net/tcp", "/proc/net/tcp6"] {
                match tokio::fs::read_to_string(table).await {
                    Ok(text) => {
                        let found = parse_proc_net_tcp(&text);
                        counts.listening += found.listening;
                        counts.established += found.established;
                        read_any = true;
                    }
                    Err(e) => debug!(table, error = %e, "Socket table unreadable"),
                }
            }
            if read_any {
                Ok(counts)
            } else {
                Err(IsmsError::SignalUnavailable {
                    signal: "sockets",
                    reason: "no readable /proc/net/tcp table".into(),
                })
            }
        }
        #[cfg(not(target_os = "linux"))]
        {
            let out = run("netstat", &["-an"]).await?;
            Ok(parse_netstat(&out))
        }
    }

    async fn disk_usage(&self) -> IsmsResult<u8> {
        let usage = tokio::task::spawn_blocking(|| {
            let disks = sysinfo::Disks::new_with_refreshed_list();
            let root = disks
                .iter()
                .find(|d| d.mount_point() == std::path::Path::new("/"))
                .or_else(|| disks.iter().next())
                .map(|d| (d.total_space(), d.available_space()));
            root.and_then(|(total, available)| usage_percent(total, available))
        })
        .await
        .map_err(|e| IsmsError::SignalUnavailable {
            signal: "disk",
            reason: e.to_string(),
        })?;

        usage.ok_or_else(|| IsmsError::SignalUnavailable {
            signal: "disk",
            reason: "no mounted volume reported".into(),
        })
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new(ProbeConfig::default())
    }
}

#[async_trait]
impl SignalProbe for SystemProbe {
    async fn collect(&self) -> DomainSignalSnapshot {
        let (firewall, antivirus, sockets, disk) = tokio::join!(
            self.bounded("firewall", self.firewall_state()),
            self.bounded("antivirus", self.antivirus_state()),
            self.bounded("sockets", self.socket_counts()),
            self.bounded("disk", self.disk_usage()),
        );

        DomainSignalSnapshot {
            firewall: firewall.unwrap_or_default(),
            antivirus: antivirus.unwrap_or_default(),
            patch: self.config.declared_patch_state.unwrap_or_default(),
            open_ports: sockets.map(|s| s.listening),
            active_connections: sockets.map(|s| s.established),
            disk_usage_percent: disk,
            collected_at: Some(chrono::Utc::now()),
        }
    }
}

/// Probe returning a fixed snapshot
#[derive(Debug, Clone, Default)]
pub struct FixedProbe {
    snapshot: DomainSignalSnapshot,
}

impl FixedProbe {
    pub fn new(snapshot: DomainSignalSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl SignalProbe for FixedProbe {
    async fn collect(&self) -> DomainSignalSnapshot {
        let mut snapshot = self.snapshot.clone();
        snapshot.collected_at.get_or_insert_with(chrono::Utc::now);
        snapshot
    }
}

async fn run(program: &'static str, args: &[&str]) -> IsmsResult<String> {
    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| IsmsError::SignalUnavailable {
            signal: program,
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(IsmsError::SignalUnavailable {
            signal: program,
            reason: format!("exited with {}", output.status),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// `ufw status` output
pub fn parse_ufw_status(output: &str) -> ServiceState {
    let status_line = output
        .lines()
        .find_map(|line| line.trim().strip_prefix("Status:"))
        .map(|s| s.trim().to_ascii_lowercase());
    match status_line.as_deref() {
        Some("active") => ServiceState::Active,
        Some("inactive") => ServiceState::Inactive,
        _ => ServiceState::Unknown,
    }
}

/// `socketfilterfw --getglobalstate` output
pub fn parse_socketfilterfw(output: &str) -> ServiceState {
    let lower = output.to_ascii_lowercase();
    if lower.contains("disabled") {
        ServiceState::Inactive
    } else if lower.contains("enabled") {
        ServiceState::Active
    } else {
        ServiceState::Unknown
    }
}

/// `netsh advfirewall show allprofiles state` output; active if any profile is on
pub fn parse_netsh_firewall(output: &str) -> ServiceState {
    let states: Vec<String> = output
        .lines()
        .filter(|line| line.trim_start().starts_with("State"))
        .filter_map(|line| line.split_whitespace().last().map(str::to_ascii_uppercase))
        .collect();
    if states.iter().any(|s| s == "ON") {
        ServiceState::Active
    } else if states.iter().any(|s| s == "OFF") {
        ServiceState::Inactive
    } else {
        ServiceState::Unknown
    }
}

/// `Get-MpComputerStatus` AntivirusEnabled value
pub fn parse_defender_status(output: &str) -> ServiceState {
    match output.trim().to_ascii_lowercase().as_str() {
        "true" => ServiceState::Active,
        "false" => ServiceState::Inactive,
        _ => ServiceState::Unknown,
    }
}

/// Count LISTEN (0A) and ESTABLISHED (01) rows of a /proc/net/tcp table
pub fn parse_proc_net_tcp(table: &str) -> SocketCounts {
    let mut counts = SocketCounts::default();
    for row in table.lines().skip(1) {
        match row.split_whitespace().nth(3) {
            Some("0A") => counts.listening += 1,
            Some("01") => counts.established += 1,
            _ => {}
        }
    }
    counts
}

/// Count TCP rows of `netstat -an` by state
pub fn parse_netstat(output: &str) -> SocketCounts {
    let mut counts = SocketCounts::default();
    for line in output.lines() {
        let trimmed = line.trim_start().to_ascii_lowercase();
        if !trimmed.starts_with("tcp") {
            continue;
        }
        let upper = line.to_ascii_uppercase();
        if upper.contains("LISTEN") {
            counts.listening += 1;
        } else if upper.contains("ESTABLISHED") {
            counts.established += 1;
        }
    }
    counts
}

/// Used share of a volume in percent
pub fn usage_percent(total: u64, available: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(available);
    let percent = (used as f64 / total as f64 * 100.0).round();
    Some(percent.clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROC_NET_TCP: &str = "\
  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
   0: 00000000:0016 00000000:0000 0A 00000000:00000000 00:00000000 00000000     0        0 20531 1
   1: 0100007F:0CEA 00000000:0000 0A 00000000:00000000 00:00000000 00000000   999        0 31337 1
   2: 0F02000A:0016 0202000A:C4E2 01 00000000:00000000 02:0009B2D3 00000000     0        0 40213 4
   3: 0F02000A:A2B4 5DB8D8AC:01BB 06 00000000:00000000 03:00000C85 00000000     0        0 0 3
";

    #[test]
    fn test_parse_proc_net_tcp() {
        let counts = parse_proc_net_tcp(PROC_NET_TCP);
        assert_eq!(counts.listening, 2);
        assert_eq!(counts.established, 1);
    }

    #[test]
    fn test_parse_netstat() {
        let output = "\
Active Internet connections (including servers)
Proto Recv-Q Send-Q  Local Address          Foreign Address        (state)
tcp4       0      0  192.168.1.4.52144      17.57.146.52.5223      ESTABLISHED
tcp46      0      0  *.5000                 *.*                    LISTEN
tcp4       0      0  127.0.0.1.631          *.*                    LISTEN
udp4       0      0  *.5353                 *.*
";
        let counts = parse_netstat(output);
        assert_eq!(counts, SocketCounts { listening: 2, established: 1 });
    }

    #[test]
    fn test_parse_firewall_outputs() {
        assert_eq!(parse_ufw_status("Status: active\n\nTo Action From\n"), ServiceState::Active);
        assert_eq!(parse_ufw_status("Status: inactive\n"), ServiceState::Inactive);
        assert_eq!(parse_ufw_status("ERROR: You need to be root"), ServiceState::Unknown);

        assert_eq!(
            parse_socketfilterfw("Firewall is enabled. (State = 1)"),
            ServiceState::Active
        );
        assert_eq!(
            parse_socketfilterfw("Firewall is disabled. (State = 0)"),
            ServiceState::Inactive
        );

        let netsh = "Domain Profile Settings:\n---\nState                                 OFF\n\nPrivate Profile Settings:\n---\nState                                 ON\n";
        assert_eq!(parse_netsh_firewall(netsh), ServiceState::Active);
        assert_eq!(parse_netsh_firewall("State OFF\n"), ServiceState::Inactive);
        assert_eq!(parse_netsh_firewall(""), ServiceState::Unknown);
    }

    #[test]
    fn test_parse_defender_status() {
        assert_eq!(parse_defender_status("True\r\n"), ServiceState::Active);
        assert_eq!(parse_defender_status("False"), ServiceState::Inactive);
        assert_eq!(parse_defender_status(""), ServiceState::Unknown);
    }

    #[test]
    fn test_usage_percent() {
        assert_eq!(usage_percent(0, 0), None);
        assert_eq!(usage_percent(200, 50), Some(75));
        assert_eq!(usage_percent(100, 500), Some(0));
    }

    #[tokio::test]
    async fn test_fixed_probe_stamps_collection_time() {
        let probe = FixedProbe::new(
            DomainSignalSnapshot::unknown().with_firewall(ServiceState::Active),
        );
        let snapshot = probe.collect().await;
        assert_eq!(snapshot.firewall, ServiceState::Active);
        assert!(snapshot.collected_at.is_some());
    }

    #[tokio::test]
    async fn test_bounded_degrades_timeout_and_errors() {
        let probe = SystemProbe::new(ProbeConfig {
            signal_timeout_secs: 1,
            declared_patch_state: None,
        });

        let slow = probe
            .bounded("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(1u32)
            })
            .await;
        assert_eq!(slow, None);

        let failing = probe
            .bounded("failing", async { Err::<u32, _>(IsmsError::Storage("boom".into())) })
            .await;
        assert_eq!(failing, None);

        let ok = probe.bounded("ok", async { Ok(7u32) }).await;
        assert_eq!(ok, Some(7));
    }

    #[tokio::test]
    async fn test_system_probe_never_fails() {
        let probe = SystemProbe::new(ProbeConfig {
            signal_timeout_secs: 5,
            declared_patch_state: Some(PatchState::Outdated),
        });
        let snapshot = probe.collect().await;
        assert_eq!(snapshot.patch, PatchState::Outdated);
        assert!(snapshot.collected_at.is_some());
        if let Some(disk) = snapshot.disk_usage_percent {
            assert!(disk <= 100);
        }
    }

    #[test]
    fn test_probe_config_validation() {
        assert!(ProbeConfig::default().validate().is_ok());
        let zero = ProbeConfig {
            signal_timeout_secs: 0,
            declared_patch_state: None,
        };
        assert!(zero.validate().is_err());
    }
}
