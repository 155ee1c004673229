//! Random IPv4 and IPv6 addresses.

use convkit_error::Result;
use convkit_random::{RandomSource, check_count};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpKind {
    #[default]
    V4,
    V6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IpOptions {
    pub kind: IpKind,
    /// Only globally routable addresses
    pub public_only: bool,
}

/// Whether an IPv4 address is outside every special-purpose range.
pub fn is_public_v4(addr: Ipv4Addr) -> bool {
    let [a, b, c, _] = addr.octets();
    !(addr.is_private()
        || addr.is_loopback()
        || addr.is_link_local()
        || addr.is_multicast()
        || addr.is_broadcast()
        || addr.is_documentation()
        || addr.is_unspecified()
        // 0.0.0.0/8 "this network"
        || a == 0
        // 100.64.0.0/10 shared address space
        || (a == 100 && (b & 0xc0) == 64)
        // 192.0.0.0/24 protocol assignments
        || (a == 192 && b == 0 && c == 0)
        // 198.18.0.0/15 benchmarking
        || (a == 198 && (b & 0xfe) == 18)
        // 240.0.0.0/4 reserved
        || a >= 240)
}

/// Whether an IPv6 address is global unicast and not in a special-purpose
/// block.
pub fn is_public_v6(addr: Ipv6Addr) -> bool {
    let s = addr.segments();
    // 2000::/3 global unicast
    let global_unicast = (s[0] & 0xe000) == 0x2000;
    // 2001::/23 IETF protocol assignments, including 2001:db8::/32
    let ietf = s[0] == 0x2001 && s[1] < 0x0200;
    let documentation = s[0] == 0x2001 && s[1] == 0x0db8;
    // 2002::/16 6to4
    let six_to_four = s[0] == 0x2002;
    global_unicast && !ietf && !documentation && !six_to_four
}

fn random_v4(rng: &mut RandomSource, public_only: bool) -> Ipv4Addr {
    loop {
        let addr = Ipv4Addr::from(rng.range_u32(0, u32::MAX));
        if !public_only || is_public_v4(addr) {
            return addr;
        }
    }
}

fn random_v6(rng: &mut RandomSource, public_only: bool) -> Ipv6Addr {
    loop {
        let mut bytes = [0u8; 16];
        rng.fill(&mut bytes);
        if public_only {
            // draw inside 2000::/3 so most attempts succeed
            bytes[0] = 0x20 | (bytes[0] & 0x1f);
        }
        let addr = Ipv6Addr::from(bytes);
        if !public_only || is_public_v6(addr) {
            return addr;
        }
    }
}

/// Generate `count` addresses.
pub fn ip_addresses(
    rng: &mut RandomSource,
    count: usize,
    opts: &IpOptions,
) -> Result<Vec<String>> {
    check_count(count)?;
    tracing::debug!(count, ?opts, "generate ip addresses");
    Ok((0..count)
        .map(|_| match opts.kind {
            IpKind::V4 => random_v4(rng, opts.public_only).to_string(),
            IpKind::V6 => random_v6(rng, opts.public_only).to_string(),
        })
        .collect())
}
