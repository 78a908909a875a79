// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IPv4 address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4)")]
    InvalidPrefixLength(u8),

    #[error("Host bits set in CIDR block: {0} (network address is {1})")]
    HostBitsSet(String, String),

    #[error("VPC CIDR prefix /{0} out of range (must be /16 to /28)")]
    VpcPrefixOutOfRange(u8),

    #[error("Cannot split {block} into {count} subnets")]
    CannotSplit { block: String, count: usize },

    #[error("Invalid port: {0} (must be 1-65535)")]
    InvalidPort(u32),

    #[error("Invalid availability zone count: {0} (must be 1-6)")]
    InvalidAzCount(u32),
}

/// IPv4 address block in CIDR notation
///
/// Invariants:
/// - Valid IPv4 address
/// - Prefix length 0-32
/// - Address is the network address (no host bits set)
///
/// # Examples
///
/// ```rust
/// use fargate_stack::domain::Ipv4Cidr;
///
/// let block = Ipv4Cidr::new("10.0.0.0/16").unwrap();
/// assert_eq!(block.prefix_length(), 16);
/// assert_eq!(block.size(), 65536);
/// assert!(Ipv4Cidr::new("10.0.0.1/16").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv4Cidr {
    network: Ipv4Addr,
    prefix_length: u8,
}

impl Ipv4Cidr {
    /// `10.0.0.0/16`
    pub const DEFAULT_VPC: Ipv4Cidr = Ipv4Cidr {
        network: Ipv4Addr::new(10, 0, 0, 0),
        prefix_length: 16,
    };

    /// `0.0.0.0/0`
    pub const ANY: Ipv4Cidr = Ipv4Cidr {
        network: Ipv4Addr::UNSPECIFIED,
        prefix_length: 0,
    };

    /// Create a new block from CIDR notation (e.g. `"10.0.0.0/16"`)
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref();

        let (addr_str, prefix_str) = cidr
            .split_once('/')
            .ok_or_else(|| NetworkError::InvalidCidr(cidr.to_string()))?;

        let address = Ipv4Addr::from_str(addr_str)
            .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;

        let prefix_length = prefix_str
            .parse::<u8>()
            .map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;

        Self::from_parts(address, prefix_length)
    }

    /// Create from separate address and prefix
    pub fn from_parts(address: Ipv4Addr, prefix_length: u8) -> Result<Self, NetworkError> {
        if prefix_length > 32 {
            return Err(NetworkError::InvalidPrefixLength(prefix_length));
        }

        let raw = u32::from(address);
        let network = raw & Self::mask(prefix_length);
        if network != raw {
            return Err(NetworkError::HostBitsSet(
                format!("{}/{}", address, prefix_length),
                Ipv4Addr::from(network).to_string(),
            ));
        }

        Ok(Self {
            network: address,
            prefix_length,
        })
    }

    fn mask(prefix_length: u8) -> u32 {
        if prefix_length == 0 {
            0
        } else {
            u32::MAX << (32 - u32::from(prefix_length))
        }
    }

    /// Get the network address
    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    /// Get the prefix length
    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    /// Number of addresses in the block
    pub fn size(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix_length))
    }

    /// Check whether `other` lies entirely inside this block
    pub fn contains(&self, other: &Ipv4Cidr) -> bool {
        other.prefix_length >= self.prefix_length
            && u32::from(other.network) & Self::mask(self.prefix_length) == u32::from(self.network)
    }

    /// Check whether the two blocks share any address
    pub fn overlaps(&self, other: &Ipv4Cidr) -> bool {
        self.contains(other) || other.contains(self)
    }

    const MAX_BLOCKS: u64 = 1 << 32;

    /// Split the block into `count` equal, consecutive sub-blocks
    ///
    /// The sub-block prefix is the smallest one that fits `count` blocks, so
    /// `10.0.0.0/16` split 4 ways yields four `/18` blocks. When `count` is not
    /// a power of two the trailing space stays unallocated.
    pub fn split(&self, count: usize) -> Result<Vec<Ipv4Cidr>, NetworkError> {
        let cannot_split = || NetworkError::CannotSplit {
            block: self.as_cidr(),
            count,
        };

        // More blocks than addresses in the whole IPv4 space never fit
        if count == 0 || count as u64 > Self::MAX_BLOCKS {
            return Err(cannot_split());
        }

        let extra_bits = count.next_power_of_two().trailing_zeros();
        let new_prefix = u32::from(self.prefix_length) + extra_bits;
        if new_prefix > 32 {
            return Err(cannot_split());
        }

        let step = 1u64 << (32 - new_prefix);
        let base = u64::from(u32::from(self.network));
        (0..count as u64)
            .map(|i| {
                let start = u32::try_from(base + i * step).map_err(|_| cannot_split())?;
                Ipv4Cidr::from_parts(Ipv4Addr::from(start), new_prefix as u8)
            })
            .collect()
    }

    /// Get as CIDR notation string
    pub fn as_cidr(&self) -> String {
        format!("{}/{}", self.network, self.prefix_length)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_cidr())
    }
}

impl FromStr for Ipv4Cidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ipv4Cidr {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ipv4Cidr> for String {
    fn from(value: Ipv4Cidr) -> Self {
        value.as_cidr()
    }
}

/// Transport port value object
///
/// Invariants:
/// - Port 1-65535 (0 is reserved)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port
    pub const MIN: u32 = 1;

    /// Maximum valid port
    pub const MAX: u32 = 65535;

    /// Create a new port with validation
    pub fn new(port: u32) -> Result<Self, NetworkError> {
        if !(Self::MIN..=Self::MAX).contains(&port) {
            return Err(NetworkError::InvalidPort(port));
        }

        Ok(Self(port as u16))
    }

    /// Get the port number
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Port {
    type Error = NetworkError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Transport protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// Security group notation (`IpProtocol`)
    pub fn as_ip_protocol(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }

    /// Load balancer listener/target group notation
    pub fn as_listener_protocol(&self) -> &'static str {
        match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ip_protocol())
    }
}

/// A protocol and a port, as opened by a firewall rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortSpec {
    pub protocol: Protocol,
    pub port: Port,
}

impl PortSpec {
    /// TCP on a single port
    pub fn tcp(port: u32) -> Result<Self, NetworkError> {
        Ok(Self {
            protocol: Protocol::Tcp,
            port: Port::new(port)?,
        })
    }

    /// UDP on a single port
    pub fn udp(port: u32) -> Result<Self, NetworkError> {
        Ok(Self {
            protocol: Protocol::Udp,
            port: Port::new(port)?,
        })
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.protocol.as_listener_protocol(), self.port)
    }
}

/// Availability zone count for a VPC
///
/// Invariants:
/// - 1-6 zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaxAzs(u8);

impl MaxAzs {
    /// Minimum zone count
    pub const MIN: u32 = 1;

    /// Maximum zone count
    pub const MAX: u32 = 6;

    /// Create a new zone count with validation
    pub fn new(count: u32) -> Result<Self, NetworkError> {
        if !(Self::MIN..=Self::MAX).contains(&count) {
            return Err(NetworkError::InvalidAzCount(count));
        }

        Ok(Self(count as u8))
    }

    /// Get the zone count
    pub fn value(&self) -> usize {
        usize::from(self.0)
    }
}

impl Default for MaxAzs {
    fn default() -> Self {
        Self(2)
    }
}

impl fmt::Display for MaxAzs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
