//! Pool lookup abstraction

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::context::RequestContext;

pub use lbaas_shared_types::{LbMethod, Pool};

#[derive(Debug, Clone, thiserror::Error)]
pub enum PoolLookupError {
    #[error("pool {pool_id} not found")]
    NotFound { pool_id: String },

    #[error("pool lookup failed: {message}")]
    Backend { message: String },
}

#[async_trait]
pub trait PoolLookup: Send + Sync {
    async fn get_pool(&self, context: &RequestContext, pool_id: &str)
        -> Result<Pool, PoolLookupError>;
}

/// In-memory pool lookup
#[derive(Clone, Default)]
pub struct StaticPoolLookup {
    pools: Arc<RwLock<HashMap<String, Pool>>>,
}

impl StaticPoolLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pools(pools: impl IntoIterator<Item = Pool>) -> Self {
        let lookup = Self::new();
        for pool in pools {
            lookup.insert(pool);
        }
        lookup
    }

    pub fn insert(&self, pool: Pool) {
        let mut pools = self.pools.write().unwrap_or_else(|e| e.into_inner());
        pools.insert(pool.id.clone(), pool);
    }

    pub fn remove(&self, pool_id: &str) -> Option<Pool> {
        let mut pools = self.pools.write().unwrap_or_else(|e| e.into_inner());
        pools.remove(pool_id)
    }
}

#[async_trait]
impl PoolLookup for StaticPoolLookup {
    async fn get_pool(
        &self,
        _context: &RequestContext,
        pool_id: &str,
    ) -> Result<Pool, PoolLookupError> {
        let pools = self.pools.read().unwrap_or_else(|e| e.into_inner());
        pools
            .get(pool_id)
            .cloned()
            .ok_or_else(|| PoolLookupError::NotFound {
                pool_id: pool_id.to_string(),
            })
    }
}
