//! Loop configuration

use crate::config::AnalysisConfig;

/// Knobs for the per-item iteration engine
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Capability invocations per item before the run aborts
    pub max_attempts_per_item: u32,

    /// LLM turns within one capability invocation
    pub max_turns_per_invocation: u32,

    /// Max tokens per LLM response
    pub max_tokens: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_item: 3,
            max_turns_per_invocation: 8,
            max_tokens: 4096,
        }
    }
}

impl From<&AnalysisConfig> for LoopConfig {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            max_attempts_per_item: config.max_attempts_per_item,
            max_turns_per_invocation: config.max_turns_per_invocation,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_cap() {
        assert_eq!(LoopConfig::default().max_attempts_per_item, 3);
    }

    #[test]
    fn test_from_analysis_config() {
        let analysis = AnalysisConfig {
            max_attempts_per_item: 2,
            max_turns_per_invocation: 4,
            ..AnalysisConfig::default()
        };
        let config = LoopConfig::from(&analysis);
        assert_eq!(config.max_attempts_per_item, 2);
        assert_eq!(config.max_turns_per_invocation, 4);
    }
}
