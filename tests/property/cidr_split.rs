// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Subnet Carving
//!
//! Whatever VPC range is chosen, the carved subnets must stay inside it and
//! never share an address.

use std::net::Ipv4Addr;

use fargate_stack::domain::invariants::{validate_subnet_layout, VPC_MAX_PREFIX};
use fargate_stack::domain::Ipv4Cidr;
use proptest::prelude::*;

/// Any valid network block with a prefix between `min` and `max`
fn arb_cidr(min: u8, max: u8) -> impl Strategy<Value = Ipv4Cidr> {
    (any::<u32>(), min..=max).prop_map(|(raw, prefix)| {
        let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - u32::from(prefix)) };
        Ipv4Cidr::from_parts(Ipv4Addr::from(raw & mask), prefix).unwrap()
    })
}

proptest! {
    /// Property: every carved block lies inside the parent
    #[test]
    fn prop_split_blocks_are_contained(cidr in arb_cidr(16, 28), count in 1usize..=12) {
        let blocks = cidr.split(count).unwrap();
        prop_assert_eq!(blocks.len(), count);
        for block in &blocks {
            prop_assert!(cidr.contains(block), "{} not in {}", block, cidr);
        }
    }

    /// Property: carved blocks are pairwise disjoint
    #[test]
    fn prop_split_blocks_are_disjoint(cidr in arb_cidr(16, 28), count in 1usize..=12) {
        let blocks = cidr.split(count).unwrap();
        for (i, a) in blocks.iter().enumerate() {
            for b in &blocks[i + 1..] {
                prop_assert!(!a.overlaps(b), "{} overlaps {}", a, b);
            }
        }
        if blocks[0].prefix_length() <= VPC_MAX_PREFIX {
            prop_assert!(validate_subnet_layout(&cidr, &blocks).is_ok());
        } else {
            prop_assert!(validate_subnet_layout(&cidr, &blocks).is_err());
        }
    }

    /// Property: carved blocks never cover more than the parent
    #[test]
    fn prop_split_preserves_size(cidr in arb_cidr(0, 32), count in 1usize..=64) {
        if let Ok(blocks) = cidr.split(count) {
            let total: u64 = blocks.iter().map(Ipv4Cidr::size).sum();
            prop_assert!(total <= cidr.size());
            prop_assert!(blocks.iter().all(|b| b.size() == blocks[0].size()));
        }
    }

    /// Property: parsing the rendered notation gives back the same block
    #[test]
    fn prop_cidr_notation_is_stable(cidr in arb_cidr(0, 32)) {
        prop_assert_eq!(Ipv4Cidr::new(cidr.as_cidr()).unwrap(), cidr);
    }
}
