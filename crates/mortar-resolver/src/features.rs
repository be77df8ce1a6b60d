//! Feature expansion
//!
//! A project may declare a feature-implication table mapping each
//! feature name to the features it implies. Expansion turns the list of
//! features requested of a dependency into the full list after following
//! every implication. The table is validated for cycles and undeclared
//! implications before any expansion runs, so expansion itself always
//! terminates.

use crate::{ResolveError, ResolveResult};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Expands requested feature lists through one project's implication table.
pub struct FeatureExpander<'a> {
    /// Project the table belongs to (for error messages)
    project: &'a str,
    /// Implication table; `None` when the manifest declares no features
    table: Option<&'a BTreeMap<String, Vec<String>>>,
}

impl<'a> FeatureExpander<'a> {
    pub fn new(project: &'a str, table: Option<&'a BTreeMap<String, Vec<String>>>) -> Self {
        Self { project, table }
    }

    /// Expand `requested` to the full feature list: the requested
    /// features plus everything they transitively imply, first-seen
    /// order, deduplicated.
    ///
    /// Without a table the requested list is returned unchanged. A
    /// requested feature absent from the table passes through; only
    /// names *referenced by the table* must be declared.
    pub fn expand(&self, requested: &[String]) -> ResolveResult<Vec<String>> {
        let Some(table) = self.table else {
            return Ok(requested.to_vec());
        };

        self.validate(table)?;

        let mut expanded = Vec::new();
        let mut seen = HashSet::new();
        let mut queue: VecDeque<&String> = requested.iter().collect();

        while let Some(feature) = queue.pop_front() {
            if !seen.insert(feature.clone()) {
                continue;
            }
            expanded.push(feature.clone());

            if let Some(implied) = table.get(feature) {
                queue.extend(implied.iter());
            }
        }

        Ok(expanded)
    }

    /// Walk every key depth-first with an explicit path stack; a key
    /// re-encountered on the stack is a feature cycle, an implied name
    /// with no table entry is a missing feature.
    fn validate(&self, table: &BTreeMap<String, Vec<String>>) -> ResolveResult<()> {
        let mut done = HashSet::new();

        for key in table.keys() {
            let mut stack = Vec::new();
            self.walk(table, key, &mut stack, &mut done)?;
        }

        Ok(())
    }

    fn walk(
        &self,
        table: &BTreeMap<String, Vec<String>>,
        key: &str,
        stack: &mut Vec<String>,
        done: &mut HashSet<String>,
    ) -> ResolveResult<()> {
        if let Some(pos) = stack.iter().position(|f| f == key) {
            let mut cycle: Vec<&str> = stack[pos..].iter().map(|s| s.as_str()).collect();
            cycle.push(key);
            return Err(ResolveError::FeatureCycle {
                project: self.project.to_string(),
                path: cycle.join(" -> "),
            });
        }

        if done.contains(key) {
            return Ok(());
        }

        stack.push(key.to_string());
        for implied in table.get(key).into_iter().flatten() {
            if !table.contains_key(implied) {
                return Err(ResolveError::MissingFeature {
                    project: self.project.to_string(),
                    feature: implied.clone(),
                    implied_by: key.to_string(),
                });
            }
            self.walk(table, implied, stack, done)?;
        }
        stack.pop();

        done.insert(key.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    fn req(features: &[&str]) -> Vec<String> {
        features.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_table_passes_through() {
        let expander = FeatureExpander::new("proj", None);
        let expanded = expander.expand(&req(&["ssl", "zstd"])).unwrap();
        assert_eq!(expanded, req(&["ssl", "zstd"]));
    }

    #[test]
    fn test_expands_transitive_implications() {
        let t = table(&[("ssl", &["crypto"]), ("crypto", &["bignum"]), ("bignum", &[])]);
        let expander = FeatureExpander::new("proj", Some(&t));

        let expanded = expander.expand(&req(&["ssl"])).unwrap();
        assert_eq!(expanded, req(&["ssl", "crypto", "bignum"]));
    }

    #[test]
    fn test_deduplicates_shared_implications() {
        let t = table(&[("a", &["c"]), ("b", &["c"]), ("c", &[])]);
        let expander = FeatureExpander::new("proj", Some(&t));

        let expanded = expander.expand(&req(&["a", "b"])).unwrap();
        assert_eq!(expanded, req(&["a", "b", "c"]));
    }

    #[test]
    fn test_requested_feature_not_in_table_passes_through() {
        let t = table(&[("ssl", &[])]);
        let expander = FeatureExpander::new("proj", Some(&t));

        let expanded = expander.expand(&req(&["experimental"])).unwrap();
        assert_eq!(expanded, req(&["experimental"]));
    }

    #[test]
    fn test_two_node_cycle_fails_validation() {
        let t = table(&[("x", &["y"]), ("y", &["x"])]);
        let expander = FeatureExpander::new("proj", Some(&t));

        let err = expander.expand(&req(&[])).unwrap_err();
        match err {
            ResolveError::FeatureCycle { path, .. } => {
                assert!(path == "x -> y -> x" || path == "y -> x -> y", "{path}");
            }
            other => panic!("expected FeatureCycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_cycle_fails_validation() {
        let t = table(&[("x", &["x"])]);
        let expander = FeatureExpander::new("proj", Some(&t));

        let err = expander.expand(&req(&["x"])).unwrap_err();
        match err {
            ResolveError::FeatureCycle { path, .. } => assert_eq!(path, "x -> x"),
            other => panic!("expected FeatureCycle, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_detected_before_expansion() {
        // The cycle is unreachable from the request; validation still fails.
        let t = table(&[("a", &["b"]), ("b", &["a"]), ("ok", &[])]);
        let expander = FeatureExpander::new("proj", Some(&t));

        assert!(expander.expand(&req(&["ok"])).is_err());
    }

    #[test]
    fn test_missing_implied_feature() {
        let t = table(&[("ssl", &["crypto"])]);
        let expander = FeatureExpander::new("proj", Some(&t));

        let err = expander.expand(&req(&["ssl"])).unwrap_err();
        match err {
            ResolveError::MissingFeature {
                feature, implied_by, ..
            } => {
                assert_eq!(feature, "crypto");
                assert_eq!(implied_by, "ssl");
            }
            other => panic!("expected MissingFeature, got {other:?}"),
        }
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let t = table(&[("top", &["l", "r"]), ("l", &["base"]), ("r", &["base"]), ("base", &[])]);
        let expander = FeatureExpander::new("proj", Some(&t));

        let expanded = expander.expand(&req(&["top"])).unwrap();
        assert_eq!(expanded, req(&["top", "l", "r", "base"]));
    }
}
