use std::collections::HashMap;
use std::sync::RwLock;

use elysium_types::{seeds, Pubkey};

/// PDA cache to avoid recomputing addresses
///
/// A poisoned lock only means another thread panicked mid-insert; the map
/// itself is still valid, so lookups carry on with the inner value.
#[derive(Debug, Default)]
pub struct PdaCache {
    cache: RwLock<HashMap<String, (Pubkey, u8)>>,
}

impl PdaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> (Pubkey, u8)
    where
        F: FnOnce() -> (Pubkey, u8),
    {
        let cached = match self.cache.read() {
            Ok(cache) => cache.get(key).copied(),
            Err(poisoned) => poisoned.into_inner().get(key).copied(),
        };
        if let Some(cached) = cached {
            return cached;
        }

        let result = compute();
        match self.cache.write() {
            Ok(mut cache) => cache.insert(key.to_string(), result),
            Err(poisoned) => poisoned.into_inner().insert(key.to_string(), result),
        };
        result
    }

    pub fn len(&self) -> usize {
        match self.cache.read() {
            Ok(cache) => cache.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Program-derived addresses of the pool program
#[derive(Debug)]
pub struct PdaBuilder {
    cache: PdaCache,
    pub program_id: Pubkey,
}

impl PdaBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            cache: PdaCache::new(),
            program_id,
        }
    }

    /// Number of addresses derived so far
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    pub fn pool(
        &self,
        pools_config: &Pubkey,
        token_mint_a: &Pubkey,
        token_mint_b: &Pubkey,
        tick_spacing: u16,
    ) -> (Pubkey, u8) {
        let key = format!(
            "pool:{}:{}:{}:{}",
            pools_config, token_mint_a, token_mint_b, tick_spacing
        );
        self.cache.get_or_compute(&key, || {
            Pubkey::find_program_address(
                &[
                    seeds::POOL,
                    pools_config.as_ref(),
                    token_mint_a.as_ref(),
                    token_mint_b.as_ref(),
                    &tick_spacing.to_le_bytes(),
                ],
                &self.program_id,
            )
        })
    }

    /// Tick array address; the start index is seeded as its decimal string
    pub fn tick_array(&self, pool: &Pubkey, start_tick_index: i32) -> (Pubkey, u8) {
        let key = format!("tick_array:{}:{}", pool, start_tick_index);
        self.cache.get_or_compute(&key, || {
            let start = start_tick_index.to_string();
            Pubkey::find_program_address(
                &[seeds::TICK_ARRAY, pool.as_ref(), start.as_bytes()],
                &self.program_id,
            )
        })
    }

    pub fn oracle(&self, pool: &Pubkey) -> (Pubkey, u8) {
        let key = format!("oracle:{}", pool);
        self.cache.get_or_compute(&key, || {
            Pubkey::find_program_address(&[seeds::ORACLE, pool.as_ref()], &self.program_id)
        })
    }

    pub fn fee_tier(&self, pools_config: &Pubkey, tick_spacing: u16) -> (Pubkey, u8) {
        let key = format!("fee_tier:{}:{}", pools_config, tick_spacing);
        self.cache.get_or_compute(&key, || {
            Pubkey::find_program_address(
                &[seeds::FEE_TIER, pools_config.as_ref(), &tick_spacing.to_le_bytes()],
                &self.program_id,
            )
        })
    }
}
