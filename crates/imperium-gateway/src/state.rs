//! Shared application state.

use std::sync::Arc;

use imperium_diplomacy::{DiplomacyRules, Evaluator, Proposer, TreatyService};
use imperium_gameplay::GameplayService;
use imperium_store::{DiploStore, WorldStore};
use imperium_types::TimeSource;
use parking_lot::Mutex;

/// Everything the handlers need, cloned per request.
///
/// The gameplay service sits behind a mutex because the build system's
/// pending slots are mutable state that must survive across requests.
#[derive(Clone)]
pub struct AppState {
    pub world: Arc<dyn WorldStore>,
    pub diplo: Arc<dyn DiploStore>,
    pub gameplay: Arc<Mutex<GameplayService>>,
    pub evaluator: Arc<Evaluator>,
    pub proposer: Arc<Proposer>,
    pub treaties: Arc<TreatyService>,
    pub clock: Arc<dyn TimeSource>,
}

impl AppState {
    /// Wire the services over the given stores and clock.
    pub fn new(
        world: Arc<dyn WorldStore>,
        diplo: Arc<dyn DiploStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let rules = DiplomacyRules::default();
        Self {
            gameplay: Arc::new(Mutex::new(GameplayService::new(world.clone()))),
            evaluator: Arc::new(Evaluator::new(diplo.clone(), rules.clone())),
            proposer: Arc::new(Proposer::new(diplo.clone(), rules.clone())),
            treaties: Arc::new(TreatyService::new(diplo.clone(), rules)),
            world,
            diplo,
            clock,
        }
    }
}
