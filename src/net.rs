//! CIDR and IP helpers for network validation rules
//!
//! Only the operations the validators need: parsing, containment, host-bit
//! counting, and the first-usable/broadcast addresses of an IPv4 subnet.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// An IP network in CIDR notation
///
/// The address is stored masked to the prefix, so `10.0.0.7/24` and
/// `10.0.0.0/24` describe the same network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cidr {
    network: IpAddr,
    prefix: u8,
}

impl Cidr {
    /// Parse CIDR notation, e.g. "10.244.0.0/16" or "fd00::/64"
    pub fn parse(s: &str) -> crate::Result<Self> {
        let err = || crate::Error::validation(format!("'{s}' is not valid CIDR notation"));
        let (addr, prefix) = s.split_once('/').ok_or_else(err)?;
        let addr: IpAddr = addr.parse().map_err(|_| err())?;
        let prefix: u8 = prefix.parse().map_err(|_| err())?;
        let max = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix > max {
            return Err(err());
        }
        let network = match addr {
            IpAddr::V4(v4) => {
                let bits = u32::from(v4) & mask_v4(prefix);
                IpAddr::V4(Ipv4Addr::from(bits))
            }
            IpAddr::V6(v6) => {
                let bits = u128::from(v6) & mask_v6(prefix);
                IpAddr::V6(Ipv6Addr::from(bits))
            }
        };
        Ok(Self { network, prefix })
    }

    /// Number of host bits left by the prefix
    pub fn host_bits(&self) -> u8 {
        match self.network {
            IpAddr::V4(_) => 32 - self.prefix,
            IpAddr::V6(_) => 128 - self.prefix,
        }
    }

    /// Returns true if the address lies within this network
    pub fn contains(&self, ip: IpAddr) -> bool {
        match (self.network, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                u32::from(ip) & mask_v4(self.prefix) == u32::from(net)
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                u128::from(ip) & mask_v6(self.prefix) == u128::from(net)
            }
            _ => false,
        }
    }

    /// First usable address of an IPv4 network (network address + 1)
    ///
    /// None for IPv6 networks, where the reserved-address rules differ.
    pub fn first_usable_v4(&self) -> Option<Ipv4Addr> {
        match self.network {
            IpAddr::V4(net) => Some(Ipv4Addr::from(u32::from(net).wrapping_add(1))),
            IpAddr::V6(_) => None,
        }
    }

    /// Broadcast address of an IPv4 network
    pub fn broadcast_v4(&self) -> Option<Ipv4Addr> {
        match self.network {
            IpAddr::V4(net) => Some(Ipv4Addr::from(u32::from(net) | !mask_v4(self.prefix))),
            IpAddr::V6(_) => None,
        }
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

fn mask_v4(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix)
    }
}

fn mask_v6(prefix: u8) -> u128 {
    if prefix == 0 {
        0
    } else {
        u128::MAX << (128 - prefix)
    }
}
