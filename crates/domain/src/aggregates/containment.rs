//! Containment Graph aggregate.
//!
//! The single "is contained by" relation over a flat population, stored as a
//! pair of tables that are only ever mutated together:
//!
//! - `holders`: occupant -> holder
//! - `occupants`: holder -> ordered occupants (insertion order)
//!
//! Entities themselves live elsewhere; the graph only knows ids.

use std::collections::BTreeMap;

use crate::events::{AttachOutcome, DetachOutcome};
use crate::{DomainError, EntityId};

/// Edges that touched an entity removed with [`ContainmentGraph::remove_entity`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedEdges {
    pub holder: Option<EntityId>,
    pub occupants: Vec<EntityId>,
}

/// Relation table for the containment relation.
///
/// # Invariants
///
/// - `holders[o] == h` iff `occupants[h]` contains `o` (edge symmetry).
/// - No entity appears twice in one occupant list, nor in two lists.
/// - Following `holders` from any entity never revisits an entity.
/// - Empty occupant lists are not stored.
#[derive(Debug, Clone, Default)]
pub struct ContainmentGraph {
    holders: BTreeMap<EntityId, EntityId>,
    occupants: BTreeMap<EntityId, Vec<EntityId>>,
}

impl ContainmentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[inline]
    pub fn holder_of(&self, occupant: EntityId) -> Option<EntityId> {
        self.holders.get(&occupant).copied()
    }

    /// Direct occupants in insertion order.
    #[inline]
    pub fn occupants_of(&self, holder: EntityId) -> &[EntityId] {
        self.occupants
            .get(&holder)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[inline]
    pub fn is_contained(&self, entity: EntityId) -> bool {
        self.holders.contains_key(&entity)
    }

    #[inline]
    pub fn has_occupants(&self, holder: EntityId) -> bool {
        self.occupants.contains_key(&holder)
    }

    pub fn contains(&self, holder: EntityId, occupant: EntityId) -> bool {
        self.holder_of(occupant) == Some(holder)
    }

    /// True when `ancestor` is reachable from `entity` by following holders.
    pub fn is_within(&self, entity: EntityId, ancestor: EntityId) -> bool {
        let mut current = self.holder_of(entity);
        let mut hops = 0usize;
        while let Some(holder) = current {
            if holder == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.holders.len() {
                return false;
            }
            current = self.holder_of(holder);
        }
        false
    }

    pub fn edge_count(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    /// Every `(holder, occupant)` pair, grouped by holder in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EntityId, EntityId)> + '_ {
        self.occupants
            .iter()
            .flat_map(|(holder, list)| list.iter().map(move |occupant| (*holder, *occupant)))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert the edge `holder -> occupant`.
    ///
    /// An occupant already held elsewhere is moved, so re-parenting is a
    /// single call. Self-edges and edges that would close a cycle are refused.
    pub fn attach(&mut self, holder: EntityId, occupant: EntityId) -> AttachOutcome {
        if holder == occupant {
            return AttachOutcome::SelfContainment;
        }
        if self.contains(holder, occupant) {
            return AttachOutcome::AlreadyAttached;
        }
        if self.is_within(holder, occupant) {
            return AttachOutcome::WouldCycle;
        }

        let previous = self.detach_from_holder(occupant);
        self.holders.insert(occupant, holder);
        self.occupants.entry(holder).or_default().push(occupant);

        AttachOutcome::Attached { previous }
    }

    /// Remove the edge `holder -> occupant` if it exists.
    pub fn detach(&mut self, holder: EntityId, occupant: EntityId) -> DetachOutcome {
        if !self.contains(holder, occupant) {
            return DetachOutcome::NotAttached;
        }
        self.unlink(holder, occupant);
        DetachOutcome::Detached { holder }
    }

    /// Remove `occupant` from whatever holds it. Returns the former holder.
    pub fn detach_from_holder(&mut self, occupant: EntityId) -> Option<EntityId> {
        let holder = self.holder_of(occupant)?;
        self.unlink(holder, occupant);
        Some(holder)
    }

    /// Drop every edge touching `entity`. Occupants are left free.
    pub fn remove_entity(&mut self, entity: EntityId) -> RemovedEdges {
        let holder = self.detach_from_holder(entity);
        let occupants = self.occupants.remove(&entity).unwrap_or_default();
        for occupant in &occupants {
            self.holders.remove(occupant);
        }
        RemovedEdges { holder, occupants }
    }

    /// Drop every edge. Returns the removed pairs.
    pub fn clear(&mut self) -> Vec<(EntityId, EntityId)> {
        let edges: Vec<_> = self.edges().collect();
        self.holders.clear();
        self.occupants.clear();
        edges
    }

    fn unlink(&mut self, holder: EntityId, occupant: EntityId) {
        self.holders.remove(&occupant);
        if let Some(list) = self.occupants.get_mut(&holder) {
            list.retain(|id| *id != occupant);
            if list.is_empty() {
                self.occupants.remove(&holder);
            }
        }
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Check every structural invariant.
    pub fn audit(&self) -> Result<(), DomainError> {
        let mut seen = 0usize;
        for (holder, list) in &self.occupants {
            if list.is_empty() {
                return Err(DomainError::invariant(format!(
                    "{holder} has an empty occupant list"
                )));
            }
            for (i, occupant) in list.iter().enumerate() {
                if list[..i].contains(occupant) {
                    return Err(DomainError::invariant(format!(
                        "{occupant} listed twice under {holder}"
                    )));
                }
                if self.holder_of(*occupant) != Some(*holder) {
                    return Err(DomainError::invariant(format!(
                        "{occupant} is listed under {holder} but points elsewhere"
                    )));
                }
                seen += 1;
            }
        }
        if seen != self.holders.len() {
            return Err(DomainError::invariant(format!(
                "{} holder links but {seen} listed occupants",
                self.holders.len()
            )));
        }
        for occupant in self.holders.keys() {
            if self.is_within(*occupant, *occupant) {
                return Err(DomainError::invariant(format!(
                    "{occupant} is inside itself"
                )));
            }
        }
        Ok(())
    }
}
