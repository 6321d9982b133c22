//! IP allowlist shared by every actuator endpoint.
//!
//! The list is process-wide state: populated once at startup (or replaced
//! wholesale at runtime), read on every request. Writers build a complete
//! new list and swap it in, so readers never observe a half-built list.
//! An empty list means "allow all".

use std::net::IpAddr;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use ipnet::IpNet;

use crate::error::AccessError;

/// A single allowed IP network: either a CIDR block or a bare host address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedRange(IpNet);

impl AllowedRange {
    /// Check whether the range contains the given address.
    pub fn contains(&self, addr: IpAddr) -> bool {
        self.0.contains(&addr)
    }
}

impl FromStr for AllowedRange {
    type Err = AccessError;

    /// Parse a CIDR block (`10.0.0.0/8`) or a bare address (`192.168.1.1`,
    /// treated as a host network).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry = s.trim();

        if let Ok(net) = entry.parse::<IpNet>() {
            return Ok(AllowedRange(net));
        }

        if let Ok(addr) = entry.parse::<IpAddr>() {
            return Ok(AllowedRange(IpNet::from(addr)));
        }

        Err(AccessError::InvalidRange {
            entry: entry.to_string(),
        })
    }
}

impl From<IpNet> for AllowedRange {
    fn from(net: IpNet) -> Self {
        AllowedRange(net)
    }
}

/// Cheaply clonable handle to the shared allowlist.
///
/// All clones point at the same underlying list; endpoints read it on every
/// request and any thread may replace it.
#[derive(Debug, Clone, Default)]
pub struct IpAllowList {
    ranges: Arc<RwLock<Arc<Vec<AllowedRange>>>>,
}

impl IpAllowList {
    /// Create an empty allowlist (all addresses allowed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the allowlist from a comma-separated string of IPs and CIDRs,
    /// e.g. `"192.168.0.0/16,10.0.0.0/8,172.16.1.5"`.
    ///
    /// Rejects empty input and any unparsable entry. On failure the
    /// previously installed list is left untouched.
    pub fn set_from_str(&self, spec: &str) -> Result<(), AccessError> {
        if spec.trim().is_empty() {
            return Err(AccessError::EmptySpecification);
        }

        let ranges = spec
            .split(',')
            .map(AllowedRange::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        self.install(ranges);
        Ok(())
    }

    /// Replace the allowlist with pre-parsed ranges.
    ///
    /// An empty vector is a no-op: emptying the list is only available
    /// through [`IpAllowList::clear`].
    pub fn set_ranges(&self, ranges: Vec<AllowedRange>) {
        if ranges.is_empty() {
            return;
        }

        self.install(ranges);
    }

    /// Remove all entries; every address is allowed afterwards.
    pub fn clear(&self) {
        self.install(Vec::new());
    }

    /// Check whether the address may access protected endpoints.
    ///
    /// Returns true if the list is empty or any installed range contains
    /// the address.
    pub fn is_allowed(&self, addr: IpAddr) -> bool {
        let ranges = self.snapshot();
        ranges.is_empty() || ranges.iter().any(|r| r.contains(addr))
    }

    /// Number of installed ranges.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether the list is empty (i.e. the gate is wide open).
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    fn install(&self, ranges: Vec<AllowedRange>) {
        let fresh = Arc::new(ranges);
        // Last writer wins; the lock is held only for the pointer swap.
        *self.ranges.write().unwrap_or_else(|e| e.into_inner()) = fresh;
    }

    fn snapshot(&self) -> Arc<Vec<AllowedRange>> {
        self.ranges.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
