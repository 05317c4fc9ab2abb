//! End-to-end replication between a SynchronizerServer and SynchronizerClient
//! connected over the in-memory transport

use proptest::prelude::*;

use syncnet_client::{ClientConfig, ReplicaEvent, SynchronizerClient};
use syncnet_server::SynchronizerServer;
use syncnet_shared::{decode_messages, FieldValue, Replicate, SyncMessage, DEFAULT_SYNC_CHANNEL};
use syncnet_test::{connect, recording_client, register_test_types, tick, Coordinate, Marker};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn new_pair() -> (SynchronizerServer, SynchronizerClient) {
    init_logging();
    let server = SynchronizerServer::default();
    let mut client = recording_client();
    register_test_types(&mut client);
    (server, client)
}

#[test]
fn replica_materializes_and_follows_the_authority() {
    let (mut server, mut client) = new_pair();

    let object_id = server.create_object(Coordinate::new(300.0, 200.0));
    let connection = connect(&mut server, &mut client);
    tick(&mut server, &mut client);

    let replica = client
        .object::<Coordinate>(&object_id)
        .expect("replica should exist after the first tick");
    assert_eq!(replica.object_id(), Some(object_id));
    assert_eq!(*replica.x, 300.0);
    assert_eq!(*replica.y, 200.0);
    assert!(!replica.is_dirty(), "remote values must not mark fields dirty");
    assert!(server.client_knows(&connection.server_link.id(), &object_id));

    server
        .object_mut::<Coordinate>(&object_id)
        .expect("server object")
        .x
        .set(250.0);
    tick(&mut server, &mut client);

    let replica = client.object::<Coordinate>(&object_id).expect("replica");
    assert_eq!(*replica.x, 250.0);
    assert_eq!(*replica.y, 200.0);
}

#[test]
fn first_announcement_is_a_single_create_with_latest_values() {
    let (mut server, mut client) = new_pair();
    let _connection = connect(&mut server, &mut client);

    let object_id = server.create_object(Coordinate::new(1.0, 2.0));
    {
        let coordinate = server.object_mut::<Coordinate>(&object_id).expect("object");
        coordinate.x.set(10.0);
        *coordinate.y = 20.0;
    }
    tick(&mut server, &mut client);

    assert_eq!(
        client.take_events(),
        vec![ReplicaEvent::Created {
            object_id,
            type_tag: Coordinate::TYPE_TAG
        }]
    );
    let replica = client.object::<Coordinate>(&object_id).expect("replica");
    assert_eq!((*replica.x, *replica.y), (10.0, 20.0));

    tick(&mut server, &mut client);
    assert!(client.take_events().is_empty(), "nothing changed, nothing sent");
}

#[test]
fn updates_carry_only_dirty_fields() {
    let (mut server, mut client) = new_pair();
    let connection = connect(&mut server, &mut client);
    let object_id = server.create_object(Coordinate::default());
    tick(&mut server, &mut client);
    client.take_events();

    server.object_mut::<Coordinate>(&object_id).expect("object").y.set(5.0);
    server.update();

    let bytes = connection.control.drain_to_client();
    assert_eq!(bytes[0], DEFAULT_SYNC_CHANNEL);
    assert_eq!(
        decode_messages(&bytes[5..]),
        Ok(vec![SyncMessage::Update {
            object_id,
            fields: vec![(1, FieldValue::F32(5.0))]
        }])
    );
}

#[test]
fn update_events_name_the_changed_fields() {
    let (mut server, mut client) = new_pair();
    let _connection = connect(&mut server, &mut client);
    let object_id = server.create_object(Marker::new(false, 0, 0));
    tick(&mut server, &mut client);
    client.take_events();

    {
        let marker = server.object_mut::<Marker>(&object_id).expect("object");
        marker.visible.set(true);
        marker.offset.set(-40);
    }
    tick(&mut server, &mut client);

    assert_eq!(
        client.take_events(),
        vec![ReplicaEvent::Updated {
            object_id,
            fields: vec![0, 2]
        }]
    );
    let replica = client.object::<Marker>(&object_id).expect("replica");
    assert!(*replica.visible);
    assert_eq!(*replica.score, 0);
    assert_eq!(*replica.offset, -40);
}

#[test]
fn events_are_not_kept_unless_recording() {
    init_logging();
    let mut server = SynchronizerServer::default();
    let mut client = SynchronizerClient::default();
    register_test_types(&mut client);
    let object_id = server.create_object(Coordinate::default());
    let _connection = connect(&mut server, &mut client);

    for step in 0..10_000u16 {
        let coordinate = server.object_mut::<Coordinate>(&object_id).expect("object");
        coordinate.x.set(f32::from(step));
        tick(&mut server, &mut client);
    }

    assert!(!client.has_events());
    assert!(client.take_events().is_empty());
    let replica = client.object::<Coordinate>(&object_id).expect("replica");
    assert_eq!(*replica.x, 9999.0);
}

#[test]
fn copied_object_is_a_new_identity_with_equal_values() {
    let mut server = SynchronizerServer::default();
    let object_id = server.create_object(Coordinate::new(4.0, 5.0));

    let original = server.object::<Coordinate>(&object_id).expect("object");
    let copy = original.clone();
    assert_eq!(copy.object_id(), None);
    assert_eq!(&copy, original);
    assert!(!copy.is_dirty());
    assert!(!copy.x.belongs_to(original.synced_object()));

    let copy_id = server.create_object(copy);
    assert_ne!(copy_id, object_id);
    assert_eq!(server.object_count(), 2);
}

#[test]
fn every_client_receives_every_object() {
    init_logging();
    let mut server = SynchronizerServer::default();
    let mut first = recording_client();
    let mut second = recording_client();
    register_test_types(&mut first);
    register_test_types(&mut second);

    let coordinate_id = server.create_object(Coordinate::new(3.0, 4.0));
    let marker_id = server.create_object(Marker::new(true, 42, -7));
    let _first_connection = connect(&mut server, &mut first);
    let _second_connection = connect(&mut server, &mut second);
    assert_eq!(server.client_count(), 2);

    server.update();
    first.update();
    second.update();

    for client in [&first, &second] {
        assert_eq!(client.object_count(), 2);
        let coordinate = client.object::<Coordinate>(&coordinate_id).expect("coordinate");
        assert_eq!((*coordinate.x, *coordinate.y), (3.0, 4.0));
        let marker = client.object::<Marker>(&marker_id).expect("marker");
        assert_eq!((*marker.visible, *marker.score, *marker.offset), (true, 42, -7));
    }
}

#[test]
fn late_client_gets_full_state() {
    let (mut server, mut client) = new_pair();
    let object_id = server.create_object(Coordinate::new(1.0, 1.0));

    // Ticks with no clients still consume dirty flags
    server.object_mut::<Coordinate>(&object_id).expect("object").x.set(9.0);
    server.update();

    let _connection = connect(&mut server, &mut client);
    tick(&mut server, &mut client);

    let replica = client.object::<Coordinate>(&object_id).expect("replica");
    assert_eq!((*replica.x, *replica.y), (9.0, 1.0));
}

#[test]
fn reconnection_starts_over_with_a_full_create_burst() {
    init_logging();
    let mut server = SynchronizerServer::default();
    let mut client = SynchronizerClient::new(ClientConfig {
        destroy_objects_on_disconnect: true,
        record_events: true,
        ..Default::default()
    });
    register_test_types(&mut client);

    let object_id = server.create_object(Coordinate::new(7.0, 8.0));
    let connection = connect(&mut server, &mut client);
    tick(&mut server, &mut client);
    client.take_events();

    connection.control.disconnect();
    tick(&mut server, &mut client);

    assert!(!server.has_client(&connection.server_link.id()));
    assert_eq!(
        client.take_events(),
        vec![
            ReplicaEvent::ServerDisconnected(connection.client_link.id()),
            ReplicaEvent::Destroyed {
                object_id,
                type_tag: Coordinate::TYPE_TAG
            },
        ]
    );
    assert_eq!(client.object_count(), 0);

    let reconnection = connect(&mut server, &mut client);
    tick(&mut server, &mut client);

    assert!(server.client_knows(&reconnection.server_link.id(), &object_id));
    let replica = client.object::<Coordinate>(&object_id).expect("replica");
    assert_eq!((*replica.x, *replica.y), (7.0, 8.0));
}

#[test]
fn replicas_survive_disconnect_by_default() {
    let (mut server, mut client) = new_pair();
    let object_id = server.create_object(Coordinate::default());
    let connection = connect(&mut server, &mut client);
    tick(&mut server, &mut client);

    connection.control.disconnect();
    tick(&mut server, &mut client);

    assert_eq!(client.server_count(), 0);
    assert!(client.has_object(&object_id));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn replica_converges_after_any_edit_sequence(
        edits in prop::collection::vec((0usize..2, -1000.0f32..1000.0, any::<bool>()), 0..40)
    ) {
        let (mut server, mut client) = new_pair();
        let object_id = server.create_object(Coordinate::default());
        let _connection = connect(&mut server, &mut client);

        for (field, value, tick_after) in edits {
            let coordinate = server.object_mut::<Coordinate>(&object_id).expect("object");
            if field == 0 {
                coordinate.x.set(value);
            } else {
                coordinate.y.set(value);
            }
            if tick_after {
                tick(&mut server, &mut client);
            }
        }
        tick(&mut server, &mut client);

        let authority = server.object::<Coordinate>(&object_id).expect("object");
        let replica = client.object::<Coordinate>(&object_id).expect("replica");
        prop_assert_eq!(authority, replica);
    }
}
