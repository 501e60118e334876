//! Execution context configuration

use crate::error::{illegal, GraphResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Capture a stack trace into the error channel on failure
    pub capture_backtrace: bool,
    /// Maximum number of live handles (None = unlimited)
    pub max_handles: Option<usize>,
    /// Budget for time-limited algorithms called with a zero timeout (None = unlimited)
    pub default_timeout_ms: Option<u64>,
    /// Largest vertex count a sparse graph may be built with
    pub max_sparse_vertices: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            capture_backtrace: false,
            max_handles: None,
            default_timeout_ms: None,
            max_sparse_vertices: 1 << 26,
        }
    }
}

impl ContextConfig {
    pub fn from_json(json: &str) -> GraphResult<Self> {
        serde_json::from_str(json).map_err(|e| illegal(format!("invalid context configuration: {}", e)))
    }

    pub(crate) fn check_sparse_vertices(&self, vertex_count: usize) -> GraphResult<()> {
        if vertex_count > self.max_sparse_vertices {
            return Err(illegal(format!(
                "a sparse graph over {} vertices exceeds the limit of {}",
                vertex_count, self.max_sparse_vertices
            )));
        }
        Ok(())
    }

    /// Effective budget for a caller timeout in milliseconds; zero falls back to the default
    pub fn timeout(&self, timeout_ms: u64) -> Option<Duration> {
        if timeout_ms > 0 {
            Some(Duration::from_millis(timeout_ms))
        } else {
            self.default_timeout_ms.map(Duration::from_millis)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_partial() {
        let config = ContextConfig::from_json(r#"{"max_handles": 16}"#).unwrap();
        assert_eq!(config.max_handles, Some(16));
        assert!(!config.capture_backtrace);
        assert_eq!(config.max_sparse_vertices, ContextConfig::default().max_sparse_vertices);
        assert!(ContextConfig::from_json("{").is_err());
    }

    #[test]
    fn test_timeout_fallback() {
        let config = ContextConfig {
            default_timeout_ms: Some(250),
            ..Default::default()
        };
        assert_eq!(config.timeout(0), Some(Duration::from_millis(250)));
        assert_eq!(config.timeout(10), Some(Duration::from_millis(10)));
        assert_eq!(ContextConfig::default().timeout(0), None);
    }
}
