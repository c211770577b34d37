//! Configuration for a play session.

use tf_engine::DEFAULT_MAX_PASSES;

/// Configuration for a play session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound on trigger passes per sweep (1-32).
    pub max_trigger_passes: usize,
    /// Store key used by save and load.
    pub save_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_trigger_passes: DEFAULT_MAX_PASSES,
            save_key: "quicksave".to_string(),
        }
    }
}

impl SessionConfig {
    /// Set the trigger pass bound (clamped to 1-32).
    pub fn with_max_trigger_passes(mut self, passes: usize) -> Self {
        self.max_trigger_passes = passes.clamp(1, 32);
        self
    }

    /// Set the save slot key.
    pub fn with_save_key(mut self, key: impl Into<String>) -> Self {
        self.save_key = key.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.max_trigger_passes, 4);
        assert_eq!(cfg.save_key, "quicksave");
    }

    #[test]
    fn builder_methods() {
        let cfg = SessionConfig::default()
            .with_max_trigger_passes(8)
            .with_save_key("slot-2");
        assert_eq!(cfg.max_trigger_passes, 8);
        assert_eq!(cfg.save_key, "slot-2");
    }

    #[test]
    fn passes_clamped() {
        let cfg = SessionConfig::default().with_max_trigger_passes(0);
        assert_eq!(cfg.max_trigger_passes, 1);
        let cfg = SessionConfig::default().with_max_trigger_passes(1000);
        assert_eq!(cfg.max_trigger_passes, 32);
    }
}
