//! Session lifecycle over loopback: graceful departures keep the session
//! alive, silent laggards are dropped alone, and a mid-tick transport loss
//! takes the whole session down.

use tandem_client::{Client, ClientConfig, ClientError};
use tandem_server::{Server, ServerConfig, ServerEvent};
use tandem_shared::{
    DisconnectReason, FingerprintBuilder, ModSource, Packet, SettingsLocatorRegistry,
};
use tandem_test::{
    connect, flush_to_client, flush_to_server, run_until_idle, world_registry, RecordedEffects,
    TestContent, TestWorld,
};

const ENGINE: &str = "1.5.4104";
const SESSION: &str = "0.1.0";
const CORE: &str = "tandem.core";

fn content() -> TestContent {
    TestContent::new()
        .with_mod(CORE, ModSource::Official)
        .with_mod("cool.factions", ModSource::Workshop)
        .with_file("cool.factions", "Defs/Factions.xml", b"<factions/>")
}

fn host_server(content: &TestContent, ack_grace: u32) -> Server {
    let locators = SettingsLocatorRegistry::new();
    let fingerprint = FingerprintBuilder::new(content, &locators, CORE)
        .build()
        .expect("host content is readable");
    Server::new(
        ServerConfig {
            engine_version: ENGINE.into(),
            session_version: SESSION.into(),
            lookahead: 5,
            max_peers: 4,
            ack_grace,
        },
        fingerprint,
    )
}

fn client(username: &str) -> Client<TestWorld> {
    Client::new(
        ClientConfig {
            username: username.into(),
            engine_version: ENGINE.into(),
            session_version: SESSION.into(),
            own_package_id: CORE.into(),
        },
        world_registry(),
    )
}

#[test]
fn graceful_leave_keeps_the_session_running() {
    let content = content();
    let mut server = host_server(&content, 50);
    let mut alice = client("alice_1");
    let mut bob = client("bob_2");
    let a = connect(&mut server, &mut alice, &content).expect("alice joins");
    let b = connect(&mut server, &mut bob, &content).expect("bob joins");

    bob.leave();
    flush_to_server(&mut server, b, &mut bob);

    let events: Vec<_> = server.events().drain().collect();
    assert!(events.contains(&ServerEvent::Disconnected {
        peer: b,
        reason: DisconnectReason::ClientLeft,
    }));
    assert_eq!(server.peer_ids(), vec![a]);

    // Alice keeps receiving the stream.
    let mut world = TestWorld::default();
    let mut fx = RecordedEffects::default();
    server.advance_tick();
    flush_to_client(&mut server, a, &mut alice).expect("alice stays connected");
    assert_eq!(run_until_idle(&mut alice, &mut world, &mut fx), vec![0]);
}

#[test]
fn silent_peer_is_dropped_alone_after_the_grace_window() {
    let content = content();
    let mut server = host_server(&content, 50);
    let mut alice = client("alice_1");
    let mut bob = client("bob_2");
    let a = connect(&mut server, &mut alice, &content).expect("alice joins");
    let b = connect(&mut server, &mut bob, &content).expect("bob joins");

    let mut world = TestWorld::default();
    let mut fx = RecordedEffects::default();

    // Alice executes and acks every tick; bob's packets never arrive.
    for _ in 0..60 {
        server.advance_tick();
        flush_to_client(&mut server, a, &mut alice).expect("alice stays connected");
        run_until_idle(&mut alice, &mut world, &mut fx);
        flush_to_server(&mut server, a, &mut alice);
    }
    server.check_timeouts();

    let events: Vec<_> = server.events().drain().collect();
    assert!(events.contains(&ServerEvent::Disconnected {
        peer: b,
        reason: DisconnectReason::NetFailed,
    }));
    // The rest of the session continues.
    assert_eq!(server.peer_ids(), vec![a]);
    server.advance_tick();
    flush_to_client(&mut server, a, &mut alice).expect("alice stays connected");
}

#[test]
fn mid_tick_transport_loss_aborts_the_session() {
    let content = content();
    let mut server = host_server(&content, 50);
    let mut alice = client("alice_1");
    let mut bob = client("bob_2");
    let a = connect(&mut server, &mut alice, &content).expect("alice joins");
    let b = connect(&mut server, &mut bob, &content).expect("bob joins");

    let mut world = TestWorld::default();
    let mut fx = RecordedEffects::default();

    // Two sealed ticks; alice confirms them, bob confirms nothing.
    server.advance_tick();
    server.advance_tick();
    flush_to_client(&mut server, a, &mut alice).expect("alice stays connected");
    run_until_idle(&mut alice, &mut world, &mut fx);
    flush_to_server(&mut server, a, &mut alice);

    // The transport loses bob with seals outstanding.
    server.peer_lost(b);

    let events: Vec<_> = server.events().drain().collect();
    let aborted = events.iter().find_map(|e| match e {
        ServerEvent::SessionAborted { reason } => Some(reason.clone()),
        _ => None,
    });
    assert_eq!(aborted, Some(DisconnectReason::Generic));
    assert!(server.peer_ids().is_empty());

    // The transport relays the abort to the survivors.
    let err = alice
        .handle_packet(Packet::Disconnect(DisconnectReason::Generic))
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Disconnected {
            reason: DisconnectReason::Generic
        }
    ));
    assert!(!alice.is_playing());
}

#[test]
fn closed_server_refuses_new_joins() {
    let content = content();
    let mut server = host_server(&content, 50);
    let mut alice = client("alice_1");
    connect(&mut server, &mut alice, &content).expect("alice joins");

    server.close();

    let mut bob = client("bob_2");
    let err = connect(&mut server, &mut bob, &content).unwrap_err();
    assert!(matches!(
        err,
        ClientError::Disconnected {
            reason: DisconnectReason::ServerClosed
        }
    ));
}
