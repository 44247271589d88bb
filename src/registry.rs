//! Advisor registry keyed by (engine, rule type)

use crate::advisor::Advisor;
use crate::advisors;
use crate::rule::{Engine, RuleType};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| {
    let mut registry = Registry::new();
    advisors::register_builtin(&mut registry);
    log::debug!("Registered {} built-in advisors", registry.len());
    registry
});

/// Registry of advisors. Each (engine, rule type) maps to exactly one advisor.
pub struct Registry {
    advisors: BTreeMap<(Engine, RuleType), Box<dyn Advisor>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            advisors: BTreeMap::new(),
        }
    }

    /// Process-wide registry holding every built-in advisor
    ///
    /// Populated on first use and read-only afterwards.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    /// Register an advisor
    ///
    /// # Panics
    ///
    /// Panics if an advisor is already registered for the pair. Registration
    /// happens once at startup, so a duplicate is a programming error.
    pub fn register(&mut self, engine: Engine, rule_type: RuleType, advisor: Box<dyn Advisor>) {
        if self.advisors.contains_key(&(engine, rule_type)) {
            panic!(
                "advisor already registered for rule {} on engine {}",
                rule_type, engine
            );
        }
        self.advisors.insert((engine, rule_type), advisor);
    }

    /// Look up the advisor for a pair
    pub fn get(&self, engine: Engine, rule_type: RuleType) -> Option<&dyn Advisor> {
        self.advisors.get(&(engine, rule_type)).map(|a| a.as_ref())
    }

    pub fn contains(&self, engine: Engine, rule_type: RuleType) -> bool {
        self.advisors.contains_key(&(engine, rule_type))
    }

    /// Registered pairs, sorted by engine then rule type
    pub fn keys(&self) -> impl Iterator<Item = (Engine, RuleType)> + '_ {
        self.advisors.keys().copied()
    }

    /// Rule types registered for one engine
    pub fn rule_types(&self, engine: Engine) -> Vec<RuleType> {
        self.keys()
            .filter(|(e, _)| *e == engine)
            .map(|(_, r)| r)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.advisors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.advisors.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
