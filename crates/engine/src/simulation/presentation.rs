//! Read-only values for renderers. Nothing here feeds back into logic.

use vessel_domain::{mechanics, EntityId};

use super::Simulation;

const CONTAINED_SCALE: f32 = 0.75;

impl Simulation {
    /// Smoothed visual fullness of a holder.
    pub fn fullness_ratio(&self, id: EntityId) -> f32 {
        if self.settings.debug.full_fullness {
            return f32::INFINITY;
        }
        self.state(id).map_or(0.0, |state| state.fullness_ratio())
    }

    /// Frame bucket (0-5) for the holder's fullness.
    pub fn fullness_stage(&self, id: EntityId) -> u8 {
        mechanics::fullness_stage(self.fullness_ratio(id))
    }

    /// Whether an occupant is drawn layered over its holder.
    pub fn shows_while_contained(&self, id: EntityId) -> bool {
        !self.settings.debug.no_layered_occupants
            && self
                .holder_of(id)
                .and_then(|holder| self.entity(holder))
                .is_some_and(|holder| holder.shows_occupants())
    }

    pub fn render_scale(&self, id: EntityId) -> f32 {
        if self.is_contained(id) {
            CONTAINED_SCALE
        } else {
            1.0
        }
    }

    pub fn occupant_count(&self, holder: EntityId, include_children: bool) -> usize {
        self.occupants(holder, include_children).len()
    }

    /// Summed current life of a holder's occupants.
    pub fn occupant_life_total(&self, holder: EntityId, include_children: bool) -> i32 {
        self.occupants(holder, include_children)
            .into_iter()
            .filter_map(|id| self.entity(id))
            .map(|entity| entity.life())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::adapters::Actor;
    use crate::infrastructure::random::FixedRandom;
    use crate::simulation::test_support::*;
    use crate::simulation::Topology;

    #[test]
    fn counts_and_life_totals_respect_children() {
        let mut sim = quiet_simulation();
        let a = spawn(&mut sim, Actor::player(0, "Ava"));
        let b = spawn(&mut sim, Actor::creature(1, "slime").with_life(40));
        let kid = spawn(&mut sim, Actor::creature(2, "hatchling").with_life(10).as_child());

        sim.contain(a, b);
        sim.contain(a, kid);

        assert_eq!(sim.occupant_count(a, false), 1);
        assert_eq!(sim.occupant_count(a, true), 2);
        assert_eq!(sim.occupant_life_total(a, false), 40);
        assert_eq!(sim.occupant_life_total(a, true), 50);
    }

    #[test]
    fn layering_needs_a_showing_holder_and_no_override() {
        let mut sim = quiet_simulation();
        let a = spawn(&mut sim, Actor::player(0, "Ava").showing_occupants());
        let b = spawn(&mut sim, Actor::creature(1, "slime"));
        assert!(!sim.shows_while_contained(b));

        sim.contain(a, b);
        assert!(sim.shows_while_contained(b));
        assert_eq!(sim.render_scale(b), 0.75);
        assert_eq!(sim.render_scale(a), 1.0);

        let mut settings = quiet_settings();
        settings.debug.no_layered_occupants = true;
        let mut sim = simulation(Topology::Standalone, settings, FixedRandom(0));
        let a = spawn(&mut sim, Actor::player(0, "Ava").showing_occupants());
        let b = spawn(&mut sim, Actor::creature(1, "slime"));
        sim.contain(a, b);
        assert!(!sim.shows_while_contained(b));
    }

    #[test]
    fn full_fullness_override_reports_infinity() {
        let mut settings = quiet_settings();
        settings.debug.full_fullness = true;
        let mut sim = simulation(Topology::Standalone, settings, FixedRandom(0));
        let a = spawn(&mut sim, Actor::player(0, "Ava"));

        assert!(sim.fullness_ratio(a).is_infinite());
        assert_eq!(sim.fullness_stage(a), 5);
    }

    #[test]
    fn stage_tracks_smoothed_fullness() {
        let mut sim = quiet_simulation();
        let a = spawn(&mut sim, Actor::player(0, "Ava"));
        let b = spawn(&mut sim, Actor::creature(1, "slime"));
        assert_eq!(sim.fullness_stage(a), 0);

        sim.contain(a, b);
        run_steps(&mut sim, 60);
        assert_eq!(sim.fullness_stage(a), 5);
    }
}
