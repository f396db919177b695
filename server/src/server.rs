use std::collections::HashMap;

use log::{info, warn};

use tandem_shared::{
    compare, decompress, ByteReader, CommandEnvelope, DisconnectReason, Fingerprint, OpId, Packet,
    PeerId, Tick, MAX_FINGERPRINT_LEN, MAX_USERNAME_LEN, MIN_USERNAME_LEN,
};

use crate::error::ServerError;
use crate::events::{Events, ServerEvent};
use crate::peer::RemotePeer;

pub struct ServerConfig {
    pub engine_version: String,
    pub session_version: String,
    /// Ticks of scheduling lookahead; sized to absorb network latency.
    pub lookahead: Tick,
    pub max_peers: usize,
    /// How far a peer's ack may lag behind the sealed tick before it is
    /// dropped with `NetFailed`.
    pub ack_grace: Tick,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            engine_version: String::new(),
            session_version: String::new(),
            lookahead: 30,
            max_peers: 8,
            ack_grace: 600,
        }
    }
}

/// The single ordering authority of a session.
///
/// Admits peers by comparing their fingerprint against its own, stamps
/// every incoming command with `current_tick + lookahead`, and broadcasts
/// the resulting envelopes and tick seals to every peer, the origin
/// included. It never executes commands itself; the hosting process runs an
/// ordinary client fed over loopback.
pub struct Server {
    config: ServerConfig,
    fingerprint: Fingerprint,
    current_tick: Tick,
    next_peer_id: PeerId,
    peers: HashMap<PeerId, RemotePeer>,
    events: Events,
    closed: bool,
}

impl Server {
    pub fn new(config: ServerConfig, fingerprint: Fingerprint) -> Self {
        Self {
            config,
            fingerprint,
            current_tick: 0,
            // Peer 0 is reserved for the hosting process.
            next_peer_id: 1,
            peers: HashMap::new(),
            events: Events::new(),
            closed: false,
        }
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn events(&mut self) -> &mut Events {
        &mut self.events
    }

    pub fn peer(&mut self, id: PeerId) -> Option<&mut RemotePeer> {
        self.peers.get_mut(&id)
    }

    pub fn peer_ids(&self) -> Vec<PeerId> {
        let mut ids: Vec<PeerId> = self.peers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Handles one join attempt. Returns the packets to send back to the
    /// candidate, and the admitted peer id if the handshake accepted.
    pub fn handle_join(
        &mut self,
        username: &str,
        engine_version: &str,
        session_version: &str,
        blob: &[u8],
    ) -> (Vec<Packet>, Option<PeerId>) {
        if self.closed {
            return (
                vec![Packet::Disconnect(DisconnectReason::ServerClosed)],
                None,
            );
        }
        if self.peers.len() >= self.config.max_peers {
            return (vec![Packet::Disconnect(DisconnectReason::ServerFull)], None);
        }
        if let Some(reason) = validate_username(username, self.peers.values()) {
            return (vec![Packet::Disconnect(reason)], None);
        }

        // The blob is untrusted: ceiling-checked decompression, then a full
        // decode that must consume cleanly.
        let remote = match decode_fingerprint(blob) {
            Ok(remote) => remote,
            Err(()) => {
                warn!("rejecting {}: malformed fingerprint blob", username);
                return (vec![Packet::Disconnect(DisconnectReason::Protocol)], None);
            }
        };

        let local_version = self.version_pair();
        let remote_version = format!("{engine_version}+{session_version}");
        let result = compare(&self.fingerprint, &remote, &local_version, &remote_version);

        if !result.compatible() {
            info!(
                "rejecting {}: {} content mismatches",
                username,
                result.mismatches.len()
            );
            let response = Packet::JoinResponse {
                engine_version: self.config.engine_version.clone(),
                session_version: self.config.session_version.clone(),
                result,
                peer_id: 0,
                baseline_tick: self.current_tick,
                lookahead: self.config.lookahead,
            };
            return (
                vec![response, Packet::Disconnect(DisconnectReason::Defs)],
                None,
            );
        }

        let id = self.next_peer_id;
        self.next_peer_id += 1;
        let response = Packet::JoinResponse {
            engine_version: self.config.engine_version.clone(),
            session_version: self.config.session_version.clone(),
            result,
            peer_id: id,
            baseline_tick: self.current_tick,
            lookahead: self.config.lookahead,
        };
        self.peers
            .insert(id, RemotePeer::new(id, username.to_owned(), self.current_tick));
        self.events.push(ServerEvent::Connected {
            peer: id,
            username: username.to_owned(),
        });
        info!("peer {} ({}) joined at tick {}", id, username, self.current_tick);

        (vec![response], Some(id))
    }

    /// Handles one packet from an admitted peer.
    pub fn handle_packet(&mut self, peer: PeerId, packet: Packet) -> Result<(), ServerError> {
        if !self.peers.contains_key(&peer) {
            return Err(ServerError::UnknownPeer { peer });
        }

        match packet {
            Packet::Request { op, args } => {
                self.schedule_command(peer, op, args);
                Ok(())
            }
            Packet::TickAck { tick } => {
                // A peer can only have executed sealed ticks; anything else
                // is a protocol violation worth dropping it over.
                if tick >= self.current_tick {
                    self.drop_peer(peer, DisconnectReason::Protocol);
                    return Ok(());
                }
                if let Some(remote) = self.peers.get_mut(&peer) {
                    remote.acked_tick = remote.acked_tick.max(tick);
                }
                Ok(())
            }
            Packet::Disconnect(DisconnectReason::ClientLeft) => {
                self.peer_left(peer);
                Ok(())
            }
            Packet::JoinRequest { .. } => Err(ServerError::UnexpectedPacket {
                peer,
                packet: "JoinRequest",
            }),
            Packet::JoinResponse { .. } => Err(ServerError::UnexpectedPacket {
                peer,
                packet: "JoinResponse",
            }),
            Packet::Command(_) => Err(ServerError::UnexpectedPacket {
                peer,
                packet: "Command",
            }),
            Packet::TickSeal { .. } => Err(ServerError::UnexpectedPacket {
                peer,
                packet: "TickSeal",
            }),
            Packet::Disconnect(_) => {
                self.peer_lost(peer);
                Ok(())
            }
        }
    }

    /// Stamps a command with its tick and broadcasts it to every peer,
    /// including the origin. This is the only place ticks are assigned.
    pub fn schedule_command(&mut self, origin: PeerId, op: OpId, args: Vec<u8>) {
        let envelope = CommandEnvelope {
            origin,
            op,
            args,
            scheduled_tick: self.current_tick + self.config.lookahead,
            locally_issued: false,
        };
        self.broadcast(Packet::Command(envelope));
    }

    /// Seals the current tick (all its envelopes have been sent) and moves
    /// the authority clock forward.
    pub fn advance_tick(&mut self) -> Tick {
        let sealed = self.current_tick;
        self.broadcast(Packet::TickSeal { tick: sealed });
        self.current_tick += 1;
        sealed
    }

    /// Drops every peer whose ack has fallen beyond the grace window. The
    /// rest of the session continues.
    pub fn check_timeouts(&mut self) {
        let deadline = self.current_tick.saturating_sub(self.config.ack_grace);
        let late: Vec<PeerId> = self
            .peers
            .values()
            .filter(|p| p.acked_tick < deadline)
            .map(|p| p.id)
            .collect();
        for peer in late {
            warn!("peer {} missed the ack deadline", peer);
            self.drop_peer(peer, DisconnectReason::NetFailed);
        }
    }

    /// A peer announced it is leaving. Its executed state is consistent, so
    /// the others continue without it.
    pub fn peer_left(&mut self, peer: PeerId) {
        if self.peers.remove(&peer).is_some() {
            self.events.push(ServerEvent::Disconnected {
                peer,
                reason: DisconnectReason::ClientLeft,
            });
        }
    }

    /// The transport lost a peer without warning. If that peer still had
    /// sealed ticks it never confirmed, the tick cannot complete for it and
    /// the session aborts for everyone; the queue is append-only and there
    /// is no partial-tick rollback.
    pub fn peer_lost(&mut self, peer: PeerId) {
        let Some(remote) = self.peers.remove(&peer) else {
            return;
        };

        let last_sealed = self.current_tick.saturating_sub(1);
        if remote.acked_tick < last_sealed && self.current_tick > 0 {
            warn!(
                "peer {} lost mid-tick (acked {}, sealed {}), aborting session",
                peer, remote.acked_tick, last_sealed
            );
            self.abort_session(DisconnectReason::Generic);
        } else {
            self.events.push(ServerEvent::Disconnected {
                peer,
                reason: DisconnectReason::NetFailed,
            });
        }
    }

    /// Kicks one peer with a short reason string.
    pub fn kick(&mut self, peer: PeerId, reason: &str) {
        self.drop_peer(
            peer,
            DisconnectReason::Kick {
                reason: reason.to_owned(),
            },
        );
    }

    /// Ends the session for everyone.
    pub fn close(&mut self) {
        self.closed = true;
        self.broadcast(Packet::Disconnect(DisconnectReason::ServerClosed));
        let peers: Vec<PeerId> = self.peers.keys().copied().collect();
        for peer in peers {
            self.peers.remove(&peer);
            self.events.push(ServerEvent::Disconnected {
                peer,
                reason: DisconnectReason::ServerClosed,
            });
        }
    }

    fn abort_session(&mut self, reason: DisconnectReason) {
        self.closed = true;
        self.broadcast(Packet::Disconnect(reason.clone()));
        self.peers.clear();
        self.events.push(ServerEvent::SessionAborted { reason });
    }

    fn drop_peer(&mut self, peer: PeerId, reason: DisconnectReason) {
        if let Some(remote) = self.peers.get_mut(&peer) {
            remote.send(Packet::Disconnect(reason.clone()));
        }
        if self.peers.remove(&peer).is_some() {
            self.events.push(ServerEvent::Disconnected { peer, reason });
        }
    }

    fn broadcast(&mut self, packet: Packet) {
        for remote in self.peers.values_mut() {
            remote.send(packet.clone());
        }
    }

    fn version_pair(&self) -> String {
        format!(
            "{}+{}",
            self.config.engine_version, self.config.session_version
        )
    }
}

fn validate_username<'a>(
    username: &str,
    peers: impl Iterator<Item = &'a RemotePeer>,
) -> Option<DisconnectReason> {
    if username.len() < MIN_USERNAME_LEN || username.len() > MAX_USERNAME_LEN {
        return Some(DisconnectReason::UsernameLength);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Some(DisconnectReason::UsernameChars);
    }
    for peer in peers {
        if peer.username == username {
            return Some(DisconnectReason::UsernameAlreadyOnline);
        }
    }
    None
}

fn decode_fingerprint(blob: &[u8]) -> Result<Fingerprint, ()> {
    let bytes = decompress(blob, MAX_FINGERPRINT_LEN).map_err(|_| ())?;
    let mut reader = ByteReader::new(&bytes);
    let fingerprint = Fingerprint::decode(&mut reader).map_err(|_| ())?;
    if !reader.is_empty() {
        // Trailing bytes mean the sides disagree about the format.
        return Err(());
    }
    Ok(fingerprint)
}

// Tests
