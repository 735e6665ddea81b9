// Decoding properties of the ListTabletServers response, checked against
// hand-built response bodies.

use bytes::Bytes;
use clusterrpc::wire::{
    AppStatusCode, AppStatusPb, HostPortPb, ListTabletServersEntryPb,
    ListTabletServersResponsePb, MasterErrorCode, MasterErrorPb, Message, NodeInstancePb,
    ResponseHeader, ServerRegistrationPb, TsRegistrationPb,
};
use clusterrpc::{CallResponse, CallResult, ListTabletServersCall, RpcCall, RpcError, TargetTable};

fn entry(uuid: &str, host: &str, port: u32) -> ListTabletServersEntryPb {
    ListTabletServersEntryPb {
        instance_id: NodeInstancePb::new(uuid.as_bytes(), 1),
        registration: TsRegistrationPb {
            common: ServerRegistrationPb {
                rpc_addresses: vec![HostPortPb::new(host, port)],
                http_addresses: vec![HostPortPb::new(host, 9000)],
            },
        },
        millis_since_heartbeat: Some(100),
    }
}

fn listing(n: usize) -> ListTabletServersResponsePb {
    ListTabletServersResponsePb {
        error: None,
        servers: (0..n)
            .map(|i| entry(&format!("ts-{:02}", i), &format!("10.0.1.{}", i), 9100))
            .collect(),
    }
}

fn respond(bytes: Vec<u8>) -> CallResponse {
    CallResponse::new(ResponseHeader::success(1), Bytes::from(bytes))
}

fn call() -> ListTabletServersCall {
    ListTabletServersCall::new(TargetTable::master())
}

#[test]
fn test_count_matches_entries_for_any_size() {
    for n in [0, 1, 2, 5, 17, 64] {
        let (response, error) = call()
            .deserialize(&respond(listing(n).encode().unwrap()), "master-1")
            .unwrap();

        assert_eq!(response.servers_count(), n);
        assert_eq!(response.servers().len(), n);
        assert!(error.is_none());
    }
}

#[test]
fn test_wire_order_is_preserved() {
    let mut body = listing(6);
    body.servers.reverse();
    let expected: Vec<String> = body
        .servers
        .iter()
        .map(|e| String::from_utf8(e.instance_id.permanent_uuid.clone()).unwrap())
        .collect();

    let (response, _) = call()
        .deserialize(&respond(body.encode().unwrap()), "master-1")
        .unwrap();
    let actual: Vec<&str> = response.servers().iter().map(|s| s.uuid()).collect();

    assert_eq!(actual, expected);
}

#[test]
fn test_no_server_is_marked_leader() {
    let (response, _) = call()
        .deserialize(&respond(listing(8).encode().unwrap()), "master-1")
        .unwrap();
    assert!(response.servers().iter().all(|s| !s.is_leader()));
}

#[test]
fn test_error_presence_is_preserved() {
    let master_error = MasterErrorPb::new(
        MasterErrorCode::NotTheLeader,
        AppStatusPb::new(AppStatusCode::IllegalState, "Not the leader"),
    );
    let mut body = listing(0);
    body.error = Some(master_error.clone());

    let (response, error) = call()
        .deserialize(&respond(body.encode().unwrap()), "master-2")
        .unwrap();
    assert_eq!(response.servers_count(), 0);
    assert_eq!(error, Some(master_error));

    let (_, error) = call()
        .deserialize(&respond(listing(0).encode().unwrap()), "master-2")
        .unwrap();
    assert_eq!(error, None);
}

#[test]
fn test_responder_identity_comes_from_transport() {
    let (response, _) = call()
        .deserialize(&respond(listing(2).encode().unwrap()), "answering-master")
        .unwrap();
    assert_eq!(response.ts_uuid(), "answering-master");
}

// The servers array header sits right after the struct header and the nil
// error: [0x92, 0xc0, 0x9N, ...].
const SERVERS_HEADER_OFFSET: usize = 2;

#[test]
fn test_declared_count_above_entries_is_rejected() {
    let mut bytes = listing(2).encode().unwrap();
    assert_eq!(bytes[SERVERS_HEADER_OFFSET], 0x92);
    bytes[SERVERS_HEADER_OFFSET] = 0x93;

    let result = call().deserialize(&respond(bytes), "master-1");
    assert!(matches!(result, Err(RpcError::Decode(_))));
}

#[test]
fn test_declared_count_below_entries_is_rejected() {
    let mut bytes = listing(2).encode().unwrap();
    bytes[SERVERS_HEADER_OFFSET] = 0x91;

    let result = call().deserialize(&respond(bytes), "master-1");
    assert!(matches!(result, Err(RpcError::Decode(_))));
}

#[test]
fn test_truncated_body_yields_no_result() {
    let bytes = listing(3).encode().unwrap();
    for cut in [1, bytes.len() / 3, bytes.len() - 1] {
        let result = call().deserialize(&respond(bytes[..cut].to_vec()), "master-1");
        assert!(matches!(result, Err(RpcError::Decode(_))), "cut at {}", cut);
    }
}

#[test]
fn test_garbage_body_fails() {
    let result = call().deserialize(&respond(vec![0xde, 0xad, 0xbe, 0xef]), "master-1");
    assert!(result.unwrap_err().is_decode_failure());
}
