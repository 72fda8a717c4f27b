//! Instance repair capabilities
//!
//! Some validators can fix the problems they detect. Automated republishing
//! runs a chosen set of those fixes between collect and validate so that a
//! scene authored by older tools still passes validation.
//!
//! Repairs are registered in a static table keyed by stable ids and resolved
//! once when the worker starts; an unknown id is a configuration error, not
//! a silent no-op.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::domain::entities::{PublishInstance, SourceContext};
use crate::error::{CascadeError, CascadeResult};

/// Id of the built-in missing-instance-id repair
pub const INSTANCE_ID_REPAIR: &str = "instance-id";

/// A fix that can be applied to a collected instance
pub trait InstanceRepair {
    /// Stable registry key
    fn id(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Repair in place. Returns whether anything changed.
    fn repair(&self, source: &SourceContext, instance: &mut PublishInstance)
        -> Result<bool, String>;
}

/// Assigns a deterministic id to instances that lack one
pub struct MissingInstanceIdRepair;

impl InstanceRepair for MissingInstanceIdRepair {
    fn id(&self) -> &'static str {
        INSTANCE_ID_REPAIR
    }

    fn description(&self) -> &'static str {
        "assign ids to instances authored without one"
    }

    fn repair(
        &self,
        source: &SourceContext,
        instance: &mut PublishInstance,
    ) -> Result<bool, String> {
        if instance.id.as_deref().is_some_and(|id| !id.is_empty()) {
            return Ok(false);
        }
        if instance.subset.is_empty() {
            return Err("instance has no subset name to derive an id from".to_string());
        }

        let mut hasher = Sha256::new();
        hasher.update(source.asset.as_bytes());
        hasher.update([0]);
        hasher.update(instance.subset.as_bytes());
        hasher.update([0]);
        hasher.update(instance.family.as_bytes());
        let digest = hasher.finalize();
        let id: String = digest[..12].iter().map(|b| format!("{:02x}", b)).collect();

        instance.id = Some(id);
        Ok(true)
    }
}

/// Static registry of repair capabilities
pub struct RepairTable {
    entries: BTreeMap<&'static str, Box<dyn InstanceRepair>>,
}

impl RepairTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Table holding every built-in repair
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.register(Box::new(MissingInstanceIdRepair));
        table
    }

    pub fn register(&mut self, repair: Box<dyn InstanceRepair>) {
        self.entries.insert(repair.id(), repair);
    }

    pub fn get(&self, id: &str) -> Option<&dyn InstanceRepair> {
        self.entries.get(id).map(|r| r.as_ref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Resolve configured ids, failing on the first unknown one.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> CascadeResult<Vec<&dyn InstanceRepair>> {
        ids.iter()
            .map(|id| {
                self.get(id.as_ref())
                    .ok_or_else(|| CascadeError::UnknownCapability(id.as_ref().to_string()))
            })
            .collect()
    }
}

impl Default for RepairTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source() -> SourceContext {
        SourceContext {
            asset: "hero".to_string(),
            task: "rigging".to_string(),
            scene: PathBuf::from("/p/rig.ma"),
        }
    }

    #[test]
    fn missing_id_is_filled_deterministically() {
        let repair = MissingInstanceIdRepair;
        let mut a = PublishInstance::new("rigDefault", "rig");
        let mut b = PublishInstance::new("rigDefault", "rig");

        assert!(repair.repair(&source(), &mut a).unwrap());
        repair.repair(&source(), &mut b).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.as_deref().map(str::len), Some(24));
    }

    #[test]
    fn existing_id_is_kept() {
        let mut instance = PublishInstance::new("rigDefault", "rig").with_id("keep-me");
        assert!(!MissingInstanceIdRepair
            .repair(&source(), &mut instance)
            .unwrap());
        assert_eq!(instance.id.as_deref(), Some("keep-me"));
    }

    #[test]
    fn builtin_table_resolves_known_ids() {
        let table = RepairTable::builtin();
        let selected = table.select(&["instance-id"]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(table.ids().collect::<Vec<_>>(), vec!["instance-id"]);
    }

    #[test]
    fn unknown_id_fails_resolution() {
        let table = RepairTable::builtin();
        let Err(err) = table.select(&["ValidateAvalonUUID"]) else {
            panic!("unknown repair id resolved");
        };
        assert_eq!(
            err.to_string(),
            "unknown repair capability 'ValidateAvalonUUID'"
        );
    }
}
