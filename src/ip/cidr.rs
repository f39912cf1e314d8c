//! CIDR block values.
//!
//! A [`Cidr`] wraps an [`Ipv4Net`] whose host bits are always cleared, so a
//! value denotes a whole block rather than an arbitrary address inside one.
//! Text input such as `10.0.0.5/24` is canonicalised to `10.0.0.0/24`.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

use super::addr;
use super::error::SubnetError;

/// An IPv4 network block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cidr {
    net: Ipv4Net,
}

impl Cidr {
    /// Build a block from an address and prefix length, clearing host bits
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, SubnetError> {
        let net = Ipv4Net::new(addr, prefix).map_err(|e| {
            SubnetError::parse(&format!("{}/{}", addr, prefix), e.to_string())
        })?;
        Ok(Self::from(net))
    }

    /// Numeric base (network) address
    pub fn base(&self) -> u32 {
        u32::from(self.net.network())
    }

    /// Prefix length in bits
    pub fn prefix(&self) -> u8 {
        self.net.prefix_len()
    }

    /// Base address as `Ipv4Addr`
    pub fn network(&self) -> Ipv4Addr {
        self.net.network()
    }

    /// Numeric last address of the block
    pub fn last(&self) -> u32 {
        addr::last_address(self.base(), self.prefix())
    }

    /// Last address of the block as `Ipv4Addr`
    pub fn broadcast(&self) -> Ipv4Addr {
        self.net.broadcast()
    }

    pub fn netmask(&self) -> Ipv4Addr {
        self.net.netmask()
    }

    pub fn address_count(&self) -> u64 {
        addr::address_count(self.prefix())
    }

    /// The underlying `ipnet` value
    pub fn as_net(&self) -> Ipv4Net {
        self.net
    }

    /// Whether `addr` falls inside this block
    pub fn contains_addr(&self, addr: Ipv4Addr) -> bool {
        self.net.contains(&addr)
    }

    /// Whether `other` lies entirely inside this block (a block contains itself)
    pub fn contains(&self, other: &Cidr) -> bool {
        self.net.contains(&other.net)
    }

    /// Split into the lower and upper halves at `prefix + 1`.
    ///
    /// Returns `None` for a `/32`, which cannot be split.
    pub fn halves(&self) -> Option<(Cidr, Cidr)> {
        let mut subnets = self.net.subnets(self.prefix().checked_add(1)?).ok()?;
        let low = subnets.next()?;
        let high = subnets.next()?;
        Some((Cidr::from(low), Cidr::from(high)))
    }
}

impl From<Ipv4Net> for Cidr {
    fn from(net: Ipv4Net) -> Self {
        Self { net: net.trunc() }
    }
}

impl From<Cidr> for Ipv4Net {
    fn from(cidr: Cidr) -> Self {
        cidr.net
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

impl FromStr for Cidr {
    type Err = SubnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let net: Ipv4Net = s
            .trim()
            .parse()
            .map_err(|e: ipnet::AddrParseError| SubnetError::parse(s, e.to_string()))?;
        Ok(Self::from(net))
    }
}

impl TryFrom<String> for Cidr {
    type Error = SubnetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cidr> for String {
    fn from(cidr: Cidr) -> Self {
        cidr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidr(s: &str) -> Cidr {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_format() {
        let c = cidr("10.0.0.0/16");
        assert_eq!(c.network(), Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(c.prefix(), 16);
        assert_eq!(c.to_string(), "10.0.0.0/16");

        for canonical in ["0.0.0.0/0", "10.0.2.16/28", "192.168.1.1/32", "172.16.0.0/12"] {
            assert_eq!(cidr(canonical).to_string(), canonical);
        }
    }

    #[test]
    fn test_parse_clears_host_bits() {
        assert_eq!(cidr("10.0.0.5/24").to_string(), "10.0.0.0/24");
        assert_eq!(cidr(" 10.16.16.255/24 ").to_string(), "10.16.16.0/24");
        assert_eq!(cidr("10.0.0.5/24"), cidr("10.0.0.0/24"));
        assert_eq!(
            Cidr::new(Ipv4Addr::new(10, 0, 3, 7), 22).unwrap().to_string(),
            "10.0.0.0/22"
        );
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["10.0.0.0/40", "10.0.0.0", "10.0.0/16", "10.0.0.256/8", "10.0.0.0/x", "", "::1/64"] {
            let err = bad.parse::<Cidr>().unwrap_err();
            assert!(matches!(err, SubnetError::Parse { .. }), "{} should not parse", bad);
        }
        assert!(Cidr::new(Ipv4Addr::UNSPECIFIED, 33).is_err());
    }

    #[test]
    fn test_bounds() {
        let c = cidr("10.0.0.0/16");
        assert_eq!(c.broadcast(), Ipv4Addr::new(10, 0, 255, 255));
        assert_eq!(c.netmask(), Ipv4Addr::new(255, 255, 0, 0));
        assert_eq!(c.address_count(), 65536);
        assert_eq!(c.last(), u32::from(c.broadcast()));

        let everything = cidr("0.0.0.0/0");
        assert_eq!(everything.broadcast(), Ipv4Addr::BROADCAST);
        assert_eq!(everything.netmask(), Ipv4Addr::UNSPECIFIED);
        assert_eq!(everything.address_count(), 1 << 32);
    }

    #[test]
    fn test_contains() {
        let parent = cidr("10.0.0.0/16");
        assert!(parent.contains(&cidr("10.0.2.0/24")));
        assert!(parent.contains(&parent));
        assert!(!parent.contains(&cidr("10.0.0.0/8")));
        assert!(!parent.contains(&cidr("192.168.0.0/24")));

        assert!(parent.contains_addr(Ipv4Addr::new(10, 0, 255, 255)));
        assert!(!parent.contains_addr(Ipv4Addr::new(10, 1, 0, 0)));
    }

    #[test]
    fn test_halves() {
        let (low, high) = cidr("10.0.0.0/16").halves().unwrap();
        assert_eq!(low.to_string(), "10.0.0.0/17");
        assert_eq!(high.to_string(), "10.0.128.0/17");

        let (low, high) = cidr("0.0.0.0/0").halves().unwrap();
        assert_eq!(low.to_string(), "0.0.0.0/1");
        assert_eq!(high.to_string(), "128.0.0.0/1");

        let (low, high) = cidr("255.255.255.254/31").halves().unwrap();
        assert_eq!(low.to_string(), "255.255.255.254/32");
        assert_eq!(high.to_string(), "255.255.255.255/32");

        assert!(cidr("10.0.0.1/32").halves().is_none());
    }

    #[test]
    fn test_ipnet_round_trip() {
        let net: Ipv4Net = "10.0.0.0/16".parse().unwrap();
        let c = Cidr::from(net);
        assert_eq!(Ipv4Net::from(c), net);
        assert_eq!(c.as_net().prefix_len(), 16);
    }

    #[test]
    fn test_serde_as_string() {
        let c: Cidr = serde_yaml::from_str("\"10.0.0.0/16\"").unwrap();
        assert_eq!(c, cidr("10.0.0.0/16"));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"10.0.0.0/16\"");
        assert!(serde_yaml::from_str::<Cidr>("\"10.0.0.0/33\"").is_err());
    }
}
