// src/engine/state.rs

use std::sync::Arc;

use crate::config::DaemonConfig;
use crate::exec::child::ChildSlot;
use crate::watch::ExclusionSet;

/// State shared by the router, the rebuild pipeline and the shutdown
/// handler. Everything except `child` is fixed at startup.
#[derive(Debug)]
pub struct DaemonState {
    pub config: DaemonConfig,
    exclusions: Arc<ExclusionSet>,
    pub child: ChildSlot,
}

impl DaemonState {
    pub fn new(config: DaemonConfig) -> Self {
        let exclusions = Arc::new(config.exclusions.clone());
        Self {
            config,
            exclusions,
            child: ChildSlot::new(),
        }
    }

    pub fn exclusions(&self) -> Arc<ExclusionSet> {
        Arc::clone(&self.exclusions)
    }
}
