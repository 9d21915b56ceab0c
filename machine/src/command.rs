//! Parsed console command arguments.
//!
//! The textual transport that produces these is out of scope; this type is
//! the boundary object handed to command handlers and site resolvers.

use std::collections::BTreeMap;

use crate::error::ResolveError;

/// The argument bag of one console command: a name plus `KEY=VALUE` pairs.
#[derive(Debug, Clone, Default)]
pub struct GcodeCommand {
    name: String,
    params: BTreeMap<String, String>,
}

impl GcodeCommand {
    /// Create a command with no parameters.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter. Keys are conventionally upper-case.
    pub fn with_param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Command name as issued by the operator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Require a float parameter.
    pub fn get_f64(&self, key: &str) -> Result<f64, ResolveError> {
        match self.params.get(key) {
            Some(raw) => Self::parse_f64(key, raw),
            None => Err(ResolveError::MissingParameter {
                key: key.to_string(),
            }),
        }
    }

    /// Read a float parameter, falling back to `default` when absent.
    ///
    /// A present-but-unparsable value is still an error.
    pub fn get_f64_or(&self, key: &str, default: f64) -> Result<f64, ResolveError> {
        match self.params.get(key) {
            Some(raw) => Self::parse_f64(key, raw),
            None => Ok(default),
        }
    }

    fn parse_f64(key: &str, raw: &str) -> Result<f64, ResolveError> {
        raw.parse::<f64>()
            .map_err(|_| ResolveError::InvalidParameter {
                key: key.to_string(),
                value: raw.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_f64_present() {
        let cmd = GcodeCommand::new("PROBE_AUTOCALIBRATE").with_param("SWITCH_OFFSET", 0.5);
        assert_eq!(cmd.get_f64("SWITCH_OFFSET").unwrap(), 0.5);
    }

    #[test]
    fn test_get_f64_missing() {
        let cmd = GcodeCommand::new("PROBE_AUTOCALIBRATE");
        assert!(matches!(
            cmd.get_f64("SWITCH_OFFSET"),
            Err(ResolveError::MissingParameter { .. })
        ));
    }

    #[test]
    fn test_get_f64_or_default() {
        let cmd = GcodeCommand::new("APPLY_PROBE_OFFSET");
        assert_eq!(cmd.get_f64_or("SWITCH_OFFSET", 0.42).unwrap(), 0.42);
    }

    #[test]
    fn test_get_f64_or_rejects_garbage() {
        let cmd = GcodeCommand::new("APPLY_PROBE_OFFSET").with_param("SWITCH_OFFSET", "abc");
        assert!(matches!(
            cmd.get_f64_or("SWITCH_OFFSET", 0.42),
            Err(ResolveError::InvalidParameter { .. })
        ));
    }
}
