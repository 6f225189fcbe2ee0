//! JSON snapshot of a pool and the tick arrays around its price

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

use elysium_types::{pubkey_serde, Pool, Pubkey, TickArray};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(with = "pubkey_serde")]
    pub pool_address: Pubkey,
    pub pool: Pool,
    #[serde(default)]
    pub tick_arrays: Vec<TickArrayAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickArrayAccount {
    #[serde(with = "pubkey_serde")]
    pub address: Pubkey,
    pub data: TickArray,
}

impl Snapshot {
    pub fn load(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read snapshot {}", path))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", path))?;
        tracing::debug!(
            path,
            pool = %snapshot.pool_address,
            tick_arrays = snapshot.tick_arrays.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Tick arrays keyed by address, ready to serve as a quote source
    pub fn tick_array_source(&self) -> HashMap<Pubkey, TickArray> {
        self.tick_arrays
            .iter()
            .map(|account| (account.address, account.data.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let pool_address = Pubkey::new_unique();
        let array_address = Pubkey::new_unique();
        let snapshot = Snapshot {
            pool_address,
            pool: Pool::default(),
            tick_arrays: vec![TickArrayAccount {
                address: array_address,
                data: TickArray::empty(pool_address, 0),
            }],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.pool_address, pool_address);
        let source = parsed.tick_array_source();
        assert_eq!(source.len(), 1);
        assert_eq!(source[&array_address].start_tick_index, 0);
    }
}
