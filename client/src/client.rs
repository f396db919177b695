use std::collections::VecDeque;

use log::{debug, info, warn};

use tandem_shared::{
    compress, Advance, ByteWriter, ContentProvider, Dispatcher, Executor, Fingerprint,
    LocalEffects, OpId, OpRegistry, Packet, Session, SessionPhase, SettingsLocatorRegistry,
    SharedState,
};

use crate::error::ClientError;

/// Everything a joining peer decides up front.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub username: String,
    pub engine_version: String,
    pub session_version: String,
    /// Our own package id, excluded from the config scan.
    pub own_package_id: String,
}

/// One joining peer: fingerprint, handshake, then deterministic replay.
///
/// The client never mutates shared state directly. Marked operations go
/// through the dispatcher, get ordered by the authority, and come back as
/// envelopes that execute at their scheduled tick.
pub struct Client<S> {
    config: ClientConfig,
    session: Session,
    dispatcher: Dispatcher,
    /// Held until the handshake accepts us, then consumed by the executor.
    registry: Option<OpRegistry<S>>,
    executor: Option<Executor<S>>,
    outbox: VecDeque<Packet>,
}

impl<S: SharedState> Client<S> {
    pub fn new(config: ClientConfig, registry: OpRegistry<S>) -> Self {
        // The peer id and lookahead are the authority's to assign; until the
        // join response arrives we hold placeholders.
        let session = Session::new_joining(
            0,
            config.engine_version.clone(),
            config.session_version.clone(),
            0,
            false,
        );
        Self {
            config,
            session,
            dispatcher: Dispatcher::new(),
            registry: Some(registry),
            executor: None,
            outbox: VecDeque::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing()
    }

    /// The tick the executor will run next. `None` before the handshake
    /// accepts us.
    pub fn current_tick(&self) -> Option<tandem_shared::Tick> {
        self.executor.as_ref().map(|e| e.current_tick())
    }

    /// Snapshots the host's content and queues the join request.
    pub fn join(
        &mut self,
        provider: &dyn ContentProvider,
        locators: &SettingsLocatorRegistry,
    ) -> Result<(), ClientError> {
        if self.session.phase() != SessionPhase::Joining {
            return Err(ClientError::UnexpectedPacket {
                packet: "JoinRequest",
                phase: phase_name(&self.session),
            });
        }

        let fingerprint =
            tandem_shared::FingerprintBuilder::new(provider, locators, &self.config.own_package_id)
                .build()?;
        let blob = encode_fingerprint(&fingerprint)?;
        debug!(
            "joining as {} with {} mods, {} hashed files ({} compressed bytes)",
            self.config.username,
            fingerprint.mods.len(),
            fingerprint.files.total_files(),
            blob.len()
        );

        self.outbox.push_back(Packet::JoinRequest {
            username: self.config.username.clone(),
            engine_version: self.config.engine_version.clone(),
            session_version: self.config.session_version.clone(),
            fingerprint: blob,
        });
        Ok(())
    }

    /// Processes one packet from the authority.
    ///
    /// A handshake rejection and a disconnect both end the session and
    /// surface as errors; everything else feeds the replication stream.
    pub fn handle_packet(&mut self, packet: Packet) -> Result<(), ClientError> {
        match packet {
            Packet::JoinResponse {
                result,
                peer_id,
                baseline_tick,
                lookahead,
                ..
            } => {
                if self.session.phase() != SessionPhase::Joining {
                    return Err(ClientError::UnexpectedPacket {
                        packet: "JoinResponse",
                        phase: phase_name(&self.session),
                    });
                }
                if !result.compatible() {
                    warn!(
                        "join rejected: {} mismatches with the authority",
                        result.mismatches.len()
                    );
                    self.session.end();
                    return Err(ClientError::HandshakeMismatch { result });
                }

                // Accepted. From here on every envelope whose origin matches
                // our peer id is one we issued ourselves.
                self.session.local_peer = peer_id;
                self.session.lookahead = lookahead;
                let Some(registry) = self.registry.take() else {
                    return Err(ClientError::UnexpectedPacket {
                        packet: "JoinResponse",
                        phase: phase_name(&self.session),
                    });
                };
                self.executor = Some(Executor::new(registry, baseline_tick));
                self.session.begin_play();
                info!(
                    "joined as peer {}, buffering from tick {}",
                    peer_id, baseline_tick
                );
                Ok(())
            }
            Packet::Command(mut envelope) => {
                let local_peer = self.session.local_peer;
                let executor = self.playing_executor("Command")?;
                // `locally_issued` never crosses the wire; it is derived here
                // so no peer can claim another's identity for local effects.
                envelope.locally_issued = envelope.origin == local_peer;
                executor.schedule(envelope)?;
                Ok(())
            }
            Packet::TickSeal { tick } => {
                let executor = self.playing_executor("TickSeal")?;
                executor.seal_tick(tick)?;
                Ok(())
            }
            Packet::Disconnect(reason) => {
                info!("disconnected by the authority: {:?}", reason);
                self.session.end();
                Err(ClientError::Disconnected { reason })
            }
            Packet::JoinRequest { .. } | Packet::Request { .. } | Packet::TickAck { .. } => {
                Err(ClientError::UnexpectedPacket {
                    packet: packet_name(&packet),
                    phase: phase_name(&self.session),
                })
            }
        }
    }

    /// Funnels a player action into the replication stream. The operation
    /// executes on every peer once the authority schedules it; only this
    /// peer will see its local-only effects.
    pub fn issue(&mut self, op: OpId, write_args: impl FnOnce(&mut ByteWriter)) {
        self.dispatcher.invoke(op, true, write_args);
    }

    /// Funnels a background-work completion into the replication stream.
    /// The heavy work already happened off-thread; only this small result
    /// command is replicated.
    pub fn complete_background(&mut self, op: OpId, args: Vec<u8>) {
        self.dispatcher.invoke_raw(op, args, false);
    }

    /// Runs one simulation step: flushes queued commands to the authority,
    /// then executes the next tick if its seal has arrived.
    pub fn advance(&mut self, state: &mut S, effects: &mut dyn LocalEffects) -> Advance {
        self.flush_dispatcher();
        let Some(executor) = self.executor.as_mut() else {
            return Advance::Waiting;
        };
        let advance = executor.try_advance(state, effects);
        if let Advance::Executed { tick, .. } = advance {
            self.outbox.push_back(Packet::TickAck { tick });
        }
        advance
    }

    /// Announces a graceful departure and ends the session.
    pub fn leave(&mut self) {
        if self.session.phase() != SessionPhase::Ended {
            self.outbox
                .push_back(Packet::Disconnect(tandem_shared::DisconnectReason::ClientLeft));
            self.session.end();
        }
    }

    /// Drains the packets the embedding transport should send.
    pub fn take_outgoing(&mut self) -> Vec<Packet> {
        self.outbox.drain(..).collect()
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outbox.is_empty()
    }

    fn flush_dispatcher(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        for pending in self.dispatcher.drain() {
            self.outbox.push_back(Packet::Request {
                op: pending.op,
                args: pending.args,
            });
        }
    }

    fn playing_executor(&mut self, packet: &'static str) -> Result<&mut Executor<S>, ClientError> {
        if !self.session.is_playing() {
            return Err(ClientError::UnexpectedPacket {
                packet,
                phase: phase_name(&self.session),
            });
        }
        // Playing implies the executor exists; the two are set together.
        self.executor
            .as_mut()
            .ok_or(ClientError::UnexpectedPacket {
                packet,
                phase: "Playing",
            })
    }
}

fn encode_fingerprint(fingerprint: &Fingerprint) -> Result<Vec<u8>, ClientError> {
    Ok(compress(&fingerprint.encode())?)
}

fn phase_name(session: &Session) -> &'static str {
    match session.phase() {
        SessionPhase::Joining => "Joining",
        SessionPhase::Playing => "Playing",
        SessionPhase::Ended => "Ended",
    }
}

fn packet_name(packet: &Packet) -> &'static str {
    match packet {
        Packet::JoinRequest { .. } => "JoinRequest",
        Packet::JoinResponse { .. } => "JoinResponse",
        Packet::Request { .. } => "Request",
        Packet::Command(_) => "Command",
        Packet::TickSeal { .. } => "TickSeal",
        Packet::TickAck { .. } => "TickAck",
        Packet::Disconnect(_) => "Disconnect",
    }
}

// Tests
