//! Project state management
//!
//! `ProjectStore` owns the live project (land, ordered blocks, currency) and the
//! metrics derived from it. Every mutation recomputes metrics before returning
//! and notifies subscribers, so a reader never sees blocks and metrics disagree.

mod block_ops;
mod display;
mod land_ops;
mod persistence;
mod shared_store;

pub use display::{block_display_name, block_summary, short_id};
pub use shared_store::SharedStore;

use shared::{
    calculate_metrics, Block, BlockId, Land, Metrics, ProjectSnapshot, DEFAULT_CURRENCY,
};

/// Errors returned by store operations. The store is unchanged whenever one is returned.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Block '{0}' not found")]
    NotFound(BlockId),

    #[error("Project data is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid project data: {0}")]
    InvalidProject(#[from] serde_json::Error),

    #[error("No parcel geometry to build on")]
    NoParcel,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle returned by [`ProjectStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type MetricsCallback = Box<dyn FnMut(&Metrics) + Send>;

/// Single source of truth for the current project
pub struct ProjectStore {
    pub(crate) blocks: Vec<Block>,
    pub(crate) land: Land,
    pub(crate) currency: String,
    metrics: Metrics,
    /// Incremented on every commit
    version: u64,
    subscribers: Vec<(SubscriptionId, MetricsCallback)>,
    next_subscription: u64,
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::with_currency(DEFAULT_CURRENCY)
    }
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore")
            .field("blocks", &self.blocks.len())
            .field("currency", &self.currency)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl ProjectStore {
    /// Fresh project: default land (with demo parcel), no blocks
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency(currency: impl Into<String>) -> Self {
        let land = Land::default();
        let metrics = calculate_metrics(&[], &land);
        Self {
            blocks: Vec::new(),
            land,
            currency: currency.into(),
            metrics,
            version: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current store version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Blocks in insertion order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn land(&self) -> &Land {
        &self.land
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Metrics as of the last commit
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Get a block by ID
    pub fn get_block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub(crate) fn get_block_mut(&mut self, id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Recompute metrics from the current blocks and land without committing
    pub fn calculate_metrics(&self) -> Metrics {
        calculate_metrics(&self.blocks, &self.land)
    }

    /// Value copy for advisory consumers
    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            metrics: self.metrics.clone(),
            land: self.land.clone(),
            blocks: self.blocks.clone(),
            currency: self.currency.clone(),
        }
    }

    /// Register a callback run with the new metrics after every commit
    pub fn subscribe(&mut self, callback: impl FnMut(&Metrics) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Start over with the default project, keeping currency and subscribers
    pub fn reset(&mut self) -> Metrics {
        self.blocks.clear();
        self.land = Land::default();
        self.commit()
    }

    /// Recompute metrics, bump the version and notify subscribers
    pub(crate) fn commit(&mut self) -> Metrics {
        self.metrics = calculate_metrics(&self.blocks, &self.land);
        self.version += 1;
        tracing::debug!(
            version = self.version,
            blocks = self.blocks.len(),
            gfa = self.metrics.gfa,
            far = self.metrics.far,
            "project metrics recomputed"
        );
        for (_, callback) in &mut self.subscribers {
            callback(&self.metrics);
        }
        self.metrics.clone()
    }
}
