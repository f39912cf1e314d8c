//! Block size arithmetic.
//!
//! Addresses are handled as host-order `u32` values. Masks, containment and
//! parsing live on [`Cidr`](super::Cidr), which is backed by `ipnet`.

/// Number of bits in an IPv4 address
pub const ADDRESS_BITS: u8 = 32;

/// Number of addresses in a `/prefix` block.
///
/// Returned as `u64` because a `/0` block holds 2^32 addresses.
pub fn address_count(prefix: u8) -> u64 {
    debug_assert!(prefix <= ADDRESS_BITS, "prefix /{} out of range", prefix);
    1u64 << (ADDRESS_BITS - prefix)
}

/// Last address of the `/prefix` block starting at `base`.
///
/// # Examples
/// ```
/// use subnetcalc::ip::addr::last_address;
///
/// assert_eq!(last_address(0, 0), u32::MAX);
/// assert_eq!(last_address(0x0a00_0000, 8), 0x0aff_ffff);
/// ```
pub fn last_address(base: u32, prefix: u8) -> u32 {
    base.wrapping_add((address_count(prefix) - 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_address_count() {
        assert_eq!(address_count(0), 1 << 32);
        assert_eq!(address_count(16), 65536);
        assert_eq!(address_count(31), 2);
        assert_eq!(address_count(32), 1);

        for prefix in 0..=ADDRESS_BITS {
            assert_eq!(address_count(prefix), 2u64.pow(u32::from(ADDRESS_BITS - prefix)));
        }
    }

    #[test]
    fn test_last_address() {
        let ten_slash_16 = u32::from(Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(
            Ipv4Addr::from(last_address(ten_slash_16, 16)),
            Ipv4Addr::new(10, 0, 255, 255)
        );

        let ten_one_one = u32::from(Ipv4Addr::new(10, 1, 1, 0));
        assert_eq!(
            Ipv4Addr::from(last_address(ten_one_one, 24)),
            Ipv4Addr::new(10, 1, 1, 255)
        );

        assert_eq!(last_address(0, 0), u32::MAX);
        assert_eq!(last_address(12345, 32), 12345);
        assert_eq!(last_address(u32::MAX - 1, 31), u32::MAX);
    }
}
