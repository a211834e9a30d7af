use std::collections::HashMap;

use crate::error::ConfigError;

pub const DEFAULT_TARGET: &str = "default";

// Single forwarding destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub url: String,
}

// Static name -> url table, fixed after startup
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    targets: HashMap<String, Target>,
}

impl TargetRegistry {
    // Parse comma-separated pairs: "default=https://...,ops=https://..."
    pub fn parse(targets_str: &str) -> Result<Self, ConfigError> {
        let mut targets = HashMap::new();

        for entry in targets_str
            .split(',')
            .map(|s| s.trim()) // remove spaces
            .filter(|s| !s.is_empty())
        {
            let (name, url) = entry
                .split_once('=')
                .map(|(n, u)| (n.trim(), u.trim()))
                .filter(|(n, u)| !n.is_empty() && !u.is_empty())
                .ok_or_else(|| ConfigError::MalformedTarget(entry.to_string()))?;

            let target = Target {
                name: name.to_string(),
                url: url.to_string(),
            };
            if targets.insert(name.to_string(), target).is_some() {
                return Err(ConfigError::DuplicateTarget(name.to_string()));
            }
        }

        if !targets.contains_key(DEFAULT_TARGET) {
            return Err(ConfigError::MissingDefault);
        }

        Ok(Self { targets })
    }

    pub fn get(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    // Sorted names, for the startup log (urls carry keys and are never logged)
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_and_trims() {
        let reg = TargetRegistry::parse(" default = https://a/x?key=1 , ops=https://b ,").unwrap();
        assert_eq!(reg.get("default").unwrap().url, "https://a/x?key=1");
        assert_eq!(reg.get("ops").unwrap().url, "https://b");
        assert_eq!(reg.names(), vec!["default", "ops"]);
    }

    #[test]
    fn url_may_contain_equals() {
        let reg = TargetRegistry::parse("default=https://h/send?key=abc").unwrap();
        assert_eq!(reg.get("default").unwrap().url, "https://h/send?key=abc");
    }

    #[test]
    fn unknown_name_is_none() {
        let reg = TargetRegistry::parse("default=https://a").unwrap();
        assert!(reg.get("nope").is_none());
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            TargetRegistry::parse("ops=https://b").unwrap_err(),
            ConfigError::MissingDefault
        );
        assert_eq!(
            TargetRegistry::parse("default").unwrap_err(),
            ConfigError::MalformedTarget("default".into())
        );
        assert_eq!(
            TargetRegistry::parse("default=").unwrap_err(),
            ConfigError::MalformedTarget("default=".into())
        );
        assert_eq!(
            TargetRegistry::parse("default=a,default=b").unwrap_err(),
            ConfigError::DuplicateTarget("default".into())
        );
    }
}
