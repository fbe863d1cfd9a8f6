//! Address to shard mapping.
//!
//! The multi-shard scheme looks at the trailing bytes of an address and masks
//! them down to a shard id:
//!
//! ```text
//! n         = ceil(log2(num_shards))
//! mask_high = 2^n - 1
//! mask_low  = 2^(n-1) - 1
//! shard     = tail & mask_high, or tail & mask_low if that is >= num_shards
//! ```
//!
//! The mapping is a pure function of the address, so the same address always
//! lands on the same shard for the lifetime of the process.

use crate::error::{ConfigError, ProxyError};
use crate::types::ShardId;

/// Address length of the plain addressing scheme, in bytes.
pub const DEFAULT_ADDRESS_LEN: usize = 32;

/// Maps decoded address bytes to the shard that owns them.
pub trait ShardResolver: Send + Sync {
    fn compute_shard_id(&self, address: &[u8]) -> Result<ShardId, ProxyError>;
}

/// Fixed-length addresses spread over `num_shards` shards.
#[derive(Debug, Clone)]
pub struct MultiShardResolver {
    address_len: usize,
    num_shards: u32,
    mask_high: u64,
    mask_low: u64,
}

impl MultiShardResolver {
    pub fn new(address_len: usize, num_shards: u32) -> Result<Self, ConfigError> {
        if num_shards == 0 {
            return Err(ConfigError::ZeroShards);
        }
        let (mask_high, mask_low) = masks(num_shards);
        Ok(Self {
            address_len,
            num_shards,
            mask_high,
            mask_low,
        })
    }

    pub fn num_shards(&self) -> u32 {
        self.num_shards
    }

    pub fn address_len(&self) -> usize {
        self.address_len
    }
}

impl ShardResolver for MultiShardResolver {
    fn compute_shard_id(&self, address: &[u8]) -> Result<ShardId, ProxyError> {
        if address.len() != self.address_len {
            return Err(ProxyError::WrongAddressLength {
                expected: self.address_len,
                actual: address.len(),
            });
        }

        let bytes_needed = (self.num_shards / 256) as usize + 1;
        let start = address.len().saturating_sub(bytes_needed);
        let tail = address[start..]
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

        let mut shard = tail & self.mask_high;
        if shard >= u64::from(self.num_shards) {
            shard = tail & self.mask_low;
        }
        // Both masks are below 2^32.
        Ok(shard as ShardId)
    }
}

fn masks(num_shards: u32) -> (u64, u64) {
    let n = u32::BITS - (num_shards - 1).leading_zeros();
    if n == 0 {
        return (0, 0);
    }
    ((1u64 << n) - 1, (1u64 << (n - 1)) - 1)
}
