use tandem_client::{Client, ClientError};
use tandem_server::Server;
use tandem_shared::{
    Advance, ContentProvider, LocalEffects, Packet, PeerId, SettingsLocatorRegistry, SharedState,
};

/// Runs a full join over loopback: the client snapshots `content`, the
/// authority decides, and every response packet is fed straight back.
pub fn connect<S: SharedState>(
    server: &mut Server,
    client: &mut Client<S>,
    content: &dyn ContentProvider,
) -> Result<PeerId, ClientError> {
    let locators = SettingsLocatorRegistry::new();
    client.join(content, &locators)?;

    let mut admitted = None;
    for packet in client.take_outgoing() {
        let Packet::JoinRequest {
            username,
            engine_version,
            session_version,
            fingerprint,
        } = packet
        else {
            panic!("only a join request may precede admission");
        };
        let (responses, id) =
            server.handle_join(&username, &engine_version, &session_version, &fingerprint);
        admitted = id;
        for response in responses {
            client.handle_packet(response)?;
        }
    }
    Ok(admitted.expect("handshake neither accepted nor errored"))
}

/// Delivers everything the client has queued to the authority.
pub fn flush_to_server<S: SharedState>(server: &mut Server, peer: PeerId, client: &mut Client<S>) {
    for packet in client.take_outgoing() {
        server
            .handle_packet(peer, packet)
            .expect("authority refused a client packet");
    }
}

/// Delivers everything the authority has queued for `peer`.
pub fn flush_to_client<S: SharedState>(
    server: &mut Server,
    peer: PeerId,
    client: &mut Client<S>,
) -> Result<(), ClientError> {
    let packets: Vec<Packet> = match server.peer(peer) {
        Some(remote) => remote.take_outgoing().collect(),
        None => Vec::new(),
    };
    for packet in packets {
        client.handle_packet(packet)?;
    }
    Ok(())
}

/// Advances the client until it is waiting on the next seal, returning the
/// ticks it executed.
pub fn run_until_idle<S: SharedState>(
    client: &mut Client<S>,
    state: &mut S,
    effects: &mut dyn LocalEffects,
) -> Vec<u32> {
    let mut executed = Vec::new();
    loop {
        match client.advance(state, effects) {
            Advance::Executed { tick, .. } => executed.push(tick),
            Advance::Waiting => return executed,
        }
    }
}
