//! Client side of the relay: apply inbound changes, flush outbound ones.

use tokio::sync::mpsc;
use vessel_shared::{ContainmentChanged, SyncPacket};

use super::SyncError;
use crate::simulation::Simulation;

impl Simulation {
    /// Apply a containment change received from the server.
    ///
    /// The edge is inserted without re-emitting, so a relayed change never
    /// echoes back. A change that is already reflected locally is a no-op.
    pub fn apply_remote_containment(
        &mut self,
        message: &ContainmentChanged,
    ) -> Result<(), SyncError> {
        let holder = message.holder();
        let occupant = message.occupant();
        for id in [holder, occupant] {
            if self.entity(id).is_none() {
                return Err(SyncError::UnknownEntity(id));
            }
        }
        if self.attach_edge(holder, occupant) {
            tracing::debug!(holder = %holder, occupant = %occupant, "Applied remote containment");
        }
        Ok(())
    }

    /// Decode and apply one inbound packet. Unknown opcodes are logged and ignored.
    pub fn apply_packet(
        &mut self,
        bytes: &[u8],
    ) -> Result<Option<ContainmentChanged>, SyncError> {
        match SyncPacket::decode(bytes)? {
            SyncPacket::ContainmentChanged(message) => {
                self.apply_remote_containment(&message)?;
                Ok(Some(message))
            }
            SyncPacket::Unknown { opcode, .. } => {
                tracing::warn!(opcode, "Unknown sync opcode");
                Ok(None)
            }
        }
    }
}

/// Outbound half of a client connection.
pub struct SyncClient {
    sender: mpsc::Sender<Vec<u8>>,
}

impl SyncClient {
    pub fn new(sender: mpsc::Sender<Vec<u8>>) -> Self {
        Self { sender }
    }

    /// Send every queued containment change. Returns how many were sent.
    ///
    /// Failed sends are logged and dropped; there is no retry.
    pub fn flush(&self, simulation: &mut Simulation) -> usize {
        let mut sent = 0;
        for message in simulation.drain_outbound() {
            let bytes = SyncPacket::from(message).encode();
            match self.sender.try_send(bytes) {
                Ok(()) => sent += 1,
                Err(e) => {
                    tracing::warn!(
                        holder = %message.holder(),
                        occupant = %message.occupant(),
                        error = %e,
                        "Failed to send containment sync"
                    );
                }
            }
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use vessel_domain::{ContainmentEvent, Entity, EntityId, PolicyMatcher};

    use super::*;
    use crate::adapters::Actor;
    use crate::infrastructure::random::FixedRandom;
    use crate::simulation::test_support::*;
    use crate::simulation::Topology;

    fn client() -> Simulation {
        simulation(Topology::Client, quiet_settings(), FixedRandom(0))
    }

    #[test]
    fn remote_containment_is_applied_without_echo() {
        let mut sim = client();
        let other = spawn(&mut sim, Actor::player(1, "Bo"));
        let slime = spawn(&mut sim, Actor::creature(4, "slime"));

        sim.apply_remote_containment(&ContainmentChanged::new(other, slime))
            .unwrap();

        assert!(sim.graph().contains(other, slime));
        assert!(sim.drain_outbound().is_empty());
        assert_eq!(
            sim.events(),
            &[ContainmentEvent::Contained {
                holder: other,
                occupant: slime
            }]
        );
    }

    #[test]
    fn remote_containment_skips_local_eligibility_checks() {
        let mut settings = quiet_settings();
        settings.policies.can_contain = PolicyMatcher::nobody();
        let mut sim = simulation(Topology::Client, settings, FixedRandom(0));
        let me = spawn(&mut sim, Actor::player(0, "Ava").locally_controlled());
        let other = spawn(&mut sim, Actor::player(1, "Bo"));
        let slime = spawn(&mut sim, Actor::creature(4, "slime"));
        let bat = spawn(&mut sim, Actor::creature(5, "bat"));

        // Denied by policy locally, and `other` fills up after the first edge.
        sim.apply_remote_containment(&ContainmentChanged::new(other, slime))
            .unwrap();
        assert!(!sim.can_contain(other, bat));
        sim.apply_remote_containment(&ContainmentChanged::new(other, bat))
            .unwrap();
        sim.apply_remote_containment(&ContainmentChanged::new(slime, me))
            .unwrap();

        assert_eq!(sim.occupants(other, true), vec![slime, bat]);
        assert_eq!(sim.entity(other).unwrap().capacity(), 1);
        assert!(sim.graph().contains(slime, me));
        assert!(sim.drain_outbound().is_empty());
    }

    #[test]
    fn remote_change_already_applied_is_a_no_op() {
        let mut sim = client();
        let other = spawn(&mut sim, Actor::player(1, "Bo"));
        let slime = spawn(&mut sim, Actor::creature(4, "slime"));
        let message = ContainmentChanged::new(other, slime);

        sim.apply_remote_containment(&message).unwrap();
        sim.apply_remote_containment(&message).unwrap();
        assert_eq!(sim.events().len(), 1);
        assert_eq!(sim.graph().edge_count(), 1);
    }

    #[test]
    fn remote_change_for_unknown_entity_is_rejected() {
        let mut sim = client();
        let other = spawn(&mut sim, Actor::player(1, "Bo"));
        let missing = EntityId::creature(99);

        let err = sim
            .apply_remote_containment(&ContainmentChanged::new(other, missing))
            .unwrap_err();
        assert!(matches!(err, SyncError::UnknownEntity(id) if id == missing));
        assert!(sim.graph().is_empty());
    }

    #[test]
    fn apply_packet_ignores_unknown_opcodes() {
        let mut sim = client();
        assert_eq!(sim.apply_packet(&[42, 0, 0]).unwrap(), None);
        assert!(matches!(sim.apply_packet(&[]), Err(SyncError::Protocol(_))));
    }

    #[test]
    fn flush_sends_queued_changes() {
        let mut sim = client();
        let me = spawn(&mut sim, Actor::player(0, "Ava").locally_controlled());
        let slime = spawn(&mut sim, Actor::creature(4, "slime"));
        sim.contain(me, slime);

        let (tx, mut rx) = mpsc::channel(4);
        let sync = SyncClient::new(tx);
        assert_eq!(sync.flush(&mut sim), 1);
        assert_eq!(sync.flush(&mut sim), 0);

        let bytes = rx.try_recv().unwrap();
        assert_eq!(
            SyncPacket::decode(&bytes).unwrap(),
            SyncPacket::ContainmentChanged(ContainmentChanged::new(me, slime))
        );
    }

    #[test]
    fn two_replicas_converge_through_the_wire() {
        let mut origin = client();
        let mut replica = client();
        let me = spawn(&mut origin, Actor::player(0, "Ava").locally_controlled());
        let slime = spawn(&mut origin, Actor::creature(4, "slime"));
        spawn(&mut replica, Actor::player(0, "Ava"));
        spawn(&mut replica, Actor::creature(4, "slime"));

        origin.contain(me, slime);
        let (tx, mut rx) = mpsc::channel(4);
        SyncClient::new(tx).flush(&mut origin);

        let bytes = rx.try_recv().unwrap();
        replica.apply_packet(&bytes).unwrap();
        let edges = |sim: &Simulation| sim.graph().edges().collect::<Vec<_>>();
        assert_eq!(edges(&replica), edges(&origin));
        assert!(replica.drain_outbound().is_empty());
    }
}
