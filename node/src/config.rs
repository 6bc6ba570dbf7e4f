//! Store tuning knobs loaded from `--database-cfg PATH` (`spec.md` §4.8).
//! Persisted state is otherwise opaque to this crate (owned by C2), so this
//! is the one structured side-file the boot path reads itself.

use serde::{Deserialize, Serialize};

/// A small `serde`-derived configuration struct with explicit defaults,
/// loaded from a JSON file rather than CLI flags since `spec.md` §6 names it
/// as a separate `--database-cfg PATH` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseCfg {
    /// Soft cap, in bytes, the store may grow to before logging a warning.
    pub shared_file_size: u64,
    /// Number of in-memory write-ahead buffers.
    pub write_buffers: u32,
}

impl Default for DatabaseCfg {
    fn default() -> Self {
        Self {
            shared_file_size: 1 << 34,
            write_buffers: 4,
        }
    }
}

impl DatabaseCfg {
    pub fn load(path: &std::path::Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let cfg = DatabaseCfg::default();
        assert_eq!(cfg.shared_file_size, 1 << 34);
        assert_eq!(cfg.write_buffers, 4);
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let cfg: DatabaseCfg = serde_json::from_str(r#"{"write_buffers": 8}"#).unwrap();
        assert_eq!(cfg.write_buffers, 8);
        assert_eq!(cfg.shared_file_size, 1 << 34);
    }
}
