//! Server side of the relay.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use vessel_shared::{ContainmentChanged, SyncPacket};

use super::{ParticipantId, SyncError};

/// Tracks connected participants and rebroadcasts their containment changes.
///
/// The server never applies a relayed change to its own simulation.
pub struct SyncRelay {
    participants: RwLock<HashMap<ParticipantId, mpsc::Sender<Vec<u8>>>>,
}

impl SyncRelay {
    pub fn new() -> Self {
        Self {
            participants: RwLock::new(HashMap::new()),
        }
    }

    pub async fn register(&self, participant: ParticipantId, sender: mpsc::Sender<Vec<u8>>) {
        let mut participants = self.participants.write().await;
        participants.insert(participant, sender);
        tracing::debug!(participant = %participant, "Participant registered");
    }

    pub async fn unregister(&self, participant: ParticipantId) {
        let mut participants = self.participants.write().await;
        if participants.remove(&participant).is_some() {
            tracing::debug!(participant = %participant, "Participant unregistered");
        }
    }

    pub async fn participant_count(&self) -> usize {
        self.participants.read().await.len()
    }

    /// Send `bytes` to everyone except `origin`. Returns how many sends succeeded.
    pub async fn broadcast_except(&self, origin: ParticipantId, bytes: &[u8]) -> usize {
        let participants = self.participants.read().await;
        let mut delivered = 0;
        for (participant, sender) in participants.iter() {
            if *participant == origin {
                continue;
            }
            match sender.try_send(bytes.to_vec()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        participant = %participant,
                        error = %e,
                        "Failed to relay sync packet"
                    );
                }
            }
        }
        delivered
    }

    /// Handle one packet received from `from`.
    ///
    /// Containment changes are forwarded verbatim and returned. Unknown
    /// opcodes are logged and dropped.
    pub async fn handle_packet(
        &self,
        from: ParticipantId,
        bytes: &[u8],
    ) -> Result<Option<ContainmentChanged>, SyncError> {
        if !self.participants.read().await.contains_key(&from) {
            return Err(SyncError::ParticipantNotFound(from));
        }
        match SyncPacket::decode(bytes)? {
            SyncPacket::ContainmentChanged(message) => {
                let delivered = self.broadcast_except(from, bytes).await;
                tracing::debug!(
                    from = %from,
                    holder = %message.holder(),
                    occupant = %message.occupant(),
                    delivered,
                    "Relayed containment change"
                );
                Ok(Some(message))
            }
            SyncPacket::Unknown { opcode, payload } => {
                tracing::warn!(from = %from, opcode, len = payload.len(), "Unknown sync opcode");
                Ok(None)
            }
        }
    }
}

impl Default for SyncRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use vessel_domain::EntityId;
    use vessel_shared::ProtocolError;

    use super::*;

    async fn relay_with(
        ids: &[u32],
    ) -> (SyncRelay, Vec<(ParticipantId, mpsc::Receiver<Vec<u8>>)>) {
        let relay = SyncRelay::new();
        let mut receivers = Vec::new();
        for id in ids {
            let (tx, rx) = mpsc::channel(4);
            relay.register(ParticipantId(*id), tx).await;
            receivers.push((ParticipantId(*id), rx));
        }
        (relay, receivers)
    }

    #[tokio::test]
    async fn containment_change_reaches_everyone_but_the_sender() {
        let (relay, mut receivers) = relay_with(&[1, 2, 3]).await;
        let message = ContainmentChanged::new(EntityId::player(0), EntityId::creature(7));
        let bytes = SyncPacket::from(message).encode();

        let relayed = relay.handle_packet(ParticipantId(1), &bytes).await.unwrap();
        assert_eq!(relayed, Some(message));

        for (id, rx) in receivers.iter_mut() {
            if *id == ParticipantId(1) {
                assert!(rx.try_recv().is_err());
            } else {
                assert_eq!(rx.try_recv().unwrap(), bytes);
            }
        }
    }

    #[tokio::test]
    async fn unknown_opcode_is_dropped() {
        let (relay, mut receivers) = relay_with(&[1, 2]).await;

        let relayed = relay.handle_packet(ParticipantId(1), &[9, 1, 2]).await.unwrap();
        assert_eq!(relayed, None);
        for (_, rx) in receivers.iter_mut() {
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn truncated_packet_is_an_error() {
        let (relay, _receivers) = relay_with(&[1, 2]).await;
        let err = relay
            .handle_packet(ParticipantId(1), &[0, 1, 0])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Protocol(ProtocolError::Truncated { .. })
        ));
    }

    #[tokio::test]
    async fn unregistered_sender_is_rejected() {
        let (relay, _receivers) = relay_with(&[1]).await;
        let bytes = SyncPacket::from(ContainmentChanged::new(
            EntityId::player(0),
            EntityId::player(1),
        ))
        .encode();
        let err = relay.handle_packet(ParticipantId(5), &bytes).await.unwrap_err();
        assert!(matches!(err, SyncError::ParticipantNotFound(ParticipantId(5))));
    }

    #[tokio::test]
    async fn full_channel_is_skipped() {
        let relay = SyncRelay::new();
        let (tx_full, _rx_full) = mpsc::channel(1);
        tx_full.try_send(vec![0]).unwrap();
        let (tx_open, mut rx_open) = mpsc::channel(1);
        relay.register(ParticipantId(2), tx_full).await;
        relay.register(ParticipantId(3), tx_open).await;

        let delivered = relay.broadcast_except(ParticipantId(1), &[0, 1]).await;
        assert_eq!(delivered, 1);
        assert_eq!(rx_open.try_recv().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn unregister_removes_participant() {
        let (relay, _receivers) = relay_with(&[1, 2]).await;
        relay.unregister(ParticipantId(2)).await;
        assert_eq!(relay.participant_count().await, 1);
    }
}
