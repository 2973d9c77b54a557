//! Merging default and package template sets
//!
//! Package templates override default templates that produce the same
//! destination path. The result holds exactly one record per destination.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{GenerationError, Result},
    models::TemplateRecord,
};

/// How to treat two sources in the same set that map to one destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Keep the first source in discovery order and log a warning
    #[default]
    FirstWins,
    /// Refuse to merge
    Fail,
}

/// Combines default and package records into one deduplicated set
#[derive(Debug, Clone, Default)]
pub struct TemplateMerger {
    policy: CollisionPolicy,
}

impl TemplateMerger {
    /// Merger using the first-wins collision policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Merger using the given collision policy
    pub fn with_policy(policy: CollisionPolicy) -> Self {
        Self { policy }
    }

    /// Collision policy in effect
    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Merge the two sets, package records taking precedence
    ///
    /// 1. Union both sets, defaults first, collapsing equal records.
    /// 2. Replace every member with the first package record sharing its
    ///    destination, if there is one.
    /// 3. Keep the first record for each destination.
    ///
    /// Output order follows step 1; it is not sorted.
    pub fn merge(
        &self,
        defaults: &[TemplateRecord],
        packages: &[TemplateRecord],
    ) -> Result<Vec<TemplateRecord>> {
        self.check_collisions(defaults)?;
        self.check_collisions(packages)?;

        let mut members = HashSet::new();
        let union: Vec<&TemplateRecord> = defaults
            .iter()
            .chain(packages)
            .filter(|&record| members.insert(record))
            .collect();

        let mut overrides: HashMap<&Path, &TemplateRecord> = HashMap::new();
        for record in packages {
            overrides.entry(record.destination_path()).or_insert(record);
        }

        let mut seen = HashSet::new();
        let merged: Vec<TemplateRecord> = union
            .into_iter()
            .map(|record| {
                overrides
                    .get(record.destination_path())
                    .copied()
                    .unwrap_or(record)
            })
            .filter(|&record| seen.insert(record.destination_path()))
            .cloned()
            .collect();

        debug!(
            defaults = defaults.len(),
            packages = packages.len(),
            overridden = count_overridden(defaults, &overrides),
            merged = merged.len(),
            "merged template sets"
        );

        Ok(merged)
    }

    fn check_collisions(&self, records: &[TemplateRecord]) -> Result<()> {
        let mut first_by_destination: HashMap<&Path, &Path> = HashMap::new();

        for record in records {
            let destination = record.destination_path();
            let source = record.source_path();

            match first_by_destination.get(destination) {
                Some(first) if *first != source => match self.policy {
                    CollisionPolicy::FirstWins => warn!(
                        destination = %destination.display(),
                        kept = %first.display(),
                        ignored = %source.display(),
                        "two templates map to the same destination"
                    ),
                    CollisionPolicy::Fail => {
                        return Err(GenerationError::CollisionError {
                            destination: destination.to_path_buf(),
                            first: first.to_path_buf(),
                            second: source.to_path_buf(),
                        })
                    }
                },
                Some(_) => {}
                None => {
                    first_by_destination.insert(destination, source);
                }
            }
        }

        Ok(())
    }
}

fn count_overridden(
    defaults: &[TemplateRecord],
    overrides: &HashMap<&Path, &TemplateRecord>,
) -> usize {
    defaults
        .iter()
        .filter(|record| overrides.contains_key(record.destination_path()))
        .count()
}
