//! End-to-end join handshakes over loopback: real fingerprints built from
//! fake content on both sides, the authority deciding, and the structured
//! diff reaching the rejected peer.

use tandem_client::{Client, ClientConfig, ClientError};
use tandem_server::{Server, ServerConfig};
use tandem_shared::{FingerprintBuilder, Mismatch, ModSource, SettingsLocatorRegistry};
use tandem_test::{connect, world_registry, TestContent, TestWorld};

const ENGINE: &str = "1.5.4104";
const SESSION: &str = "0.1.0";
const CORE: &str = "tandem.core";

fn base_content() -> TestContent {
    TestContent::new()
        .with_mod(CORE, ModSource::Official)
        .with_mod("cool.factions", ModSource::Workshop)
        .with_file("cool.factions", "Defs/Factions.xml", b"<factions/>")
        .with_file("cool.factions", "Patches/Tweaks.xml", b"<patch/>")
        .with_file("cool.factions", "Assemblies/Factions.dll", &[0x4D, 0x5A, 1, 2])
        .with_settings("cool.factions", "FactionsMod", "<settings speed=\"1\"/>")
}

fn host_server(content: &TestContent) -> Server {
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
            ack_grace: 50,
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
fn matching_content_is_admitted() {
    let content = base_content();
    let mut server = host_server(&content);

    let mut alice = client("alice_1");
    let mut bob = client("bob_2");

    let a = connect(&mut server, &mut alice, &content).expect("alice matches the host");
    let b = connect(&mut server, &mut bob, &content).expect("bob matches the host");

    assert_eq!((a, b), (1, 2));
    assert!(alice.is_playing());
    assert!(bob.is_playing());
    assert_eq!(alice.current_tick(), Some(0));
    assert_eq!(server.peer_ids(), vec![1, 2]);
}

#[test]
fn one_flipped_byte_is_rejected_with_the_exact_file() {
    let content = base_content();
    let mut server = host_server(&content);

    let mut alice = client("alice_1");
    connect(&mut server, &mut alice, &content).expect("alice matches the host");

    // Carol's copy of one def file differs by a single byte.
    let carols_content = base_content().corrupt_file("cool.factions", "Defs/Factions.xml");
    let mut carol = client("carol_3");
    let err = connect(&mut server, &mut carol, &carols_content).unwrap_err();

    let ClientError::HandshakeMismatch { result } = err else {
        panic!("expected a handshake rejection, got {err:?}");
    };
    assert_eq!(
        result.mismatches,
        vec![Mismatch::FileHash {
            mod_id: "cool.factions".into(),
            rel_path: "Defs/Factions.xml".into(),
        }]
    );
    assert!(!carol.is_playing());

    // The running session is untouched.
    assert_eq!(server.peer_ids(), vec![1]);
    assert!(alice.is_playing());
}

#[test]
fn missing_mod_is_reported_as_a_mod_list_mismatch() {
    let content = base_content();
    let mut server = host_server(&content);

    let vanilla_content = TestContent::new().with_mod(CORE, ModSource::Official);
    let mut dave = client("dave_4");
    let err = connect(&mut server, &mut dave, &vanilla_content).unwrap_err();

    let ClientError::HandshakeMismatch { result } = err else {
        panic!("expected a handshake rejection, got {err:?}");
    };
    assert!(result.mismatches.contains(&Mismatch::ModList));
}

#[test]
fn config_divergence_is_rejected() {
    let content = base_content();
    let mut server = host_server(&content);

    let tweaked = base_content().with_settings("cool.factions", "FactionsMod", "<settings speed=\"3\"/>");
    let mut erin = client("erin_5");
    let err = connect(&mut server, &mut erin, &tweaked).unwrap_err();

    let ClientError::HandshakeMismatch { result } = err else {
        panic!("expected a handshake rejection, got {err:?}");
    };
    assert!(result.mismatches.contains(&Mismatch::Config {
        mod_id: "cool.factions".into(),
        file_name: "FactionsMod".into(),
    }));
}

#[test]
fn version_skew_is_rejected_before_content() {
    let content = base_content();
    let mut server = host_server(&content);

    let mut old = Client::new(
        ClientConfig {
            username: "frank_6".into(),
            engine_version: "1.5.4100".into(),
            session_version: SESSION.into(),
            own_package_id: CORE.into(),
        },
        world_registry(),
    );
    let err = connect(&mut server, &mut old, &content).unwrap_err();

    let ClientError::HandshakeMismatch { result } = err else {
        panic!("expected a handshake rejection, got {err:?}");
    };
    assert_eq!(result.mismatches, vec![Mismatch::Version]);
}
