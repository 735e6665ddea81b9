// End-to-end calls against an in-process fake master speaking the framed
// protocol over a duplex pipe.

use bytes::Bytes;
use clusterrpc::envelope::{to_frame, Frame, FrameCodec};
use clusterrpc::wire::{
    AppStatusCode, AppStatusPb, ErrorStatusPb, HostPortPb, ListMastersResponsePb,
    ListTabletServersEntryPb, ListTabletServersResponsePb, MasterErrorCode, MasterErrorPb,
    NodeInstancePb, PingResponsePb, RaftRole, RequestHeader, ResponseHeader, RpcErrorCode,
    ServerEntryPb, ServerRegistrationPb, TsRegistrationPb, MASTER_SERVICE_NAME,
};
use clusterrpc::{
    CallDispatcher, CallResult, CallState, ListMastersCall, ListTabletServersCall, PingCall,
    RpcConfig, RpcError, ServerInfo, StreamTransport, TargetTable,
};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{duplex, DuplexStream};
use tokio_util::codec::Framed;

const MAX_FRAME: usize = 64 * 1024;

fn registration(host: &str, port: u32) -> ServerRegistrationPb {
    ServerRegistrationPb {
        rpc_addresses: vec![HostPortPb::new(host, port)],
        http_addresses: Vec::new(),
    }
}

fn tserver(uuid: &str, host: &str) -> ListTabletServersEntryPb {
    ListTabletServersEntryPb {
        instance_id: NodeInstancePb::new(uuid.as_bytes(), 4),
        registration: TsRegistrationPb {
            common: registration(host, 9100),
        },
        millis_since_heartbeat: Some(300),
    }
}

/// Serves requests until the client hangs up, answering each through `handler`.
fn spawn_fake_master<F>(stream: DuplexStream, handler: F) -> tokio::task::JoinHandle<usize>
where
    F: Fn(&RequestHeader) -> Option<Bytes> + Send + 'static,
{
    tokio::spawn(async move {
        let mut framed = Framed::new(stream, FrameCodec::new(MAX_FRAME));
        let mut served = 0;
        while let Some(Ok(frame)) = framed.next().await {
            let header: RequestHeader = Frame::parse(frame).unwrap().header().unwrap();
            served += 1;
            match handler(&header) {
                Some(reply) => framed.send(reply).await.unwrap(),
                None => tokio::time::sleep(Duration::from_secs(60)).await,
            }
        }
        served
    })
}

fn dispatcher(stream: DuplexStream) -> CallDispatcher<StreamTransport<DuplexStream>> {
    let config = RpcConfig::new().with_max_message_size(MAX_FRAME);
    CallDispatcher::new(
        StreamTransport::new(stream, "master-a", config.max_message_size()),
        config,
    )
    .unwrap()
}

#[tokio::test]
async fn test_list_tablet_servers_end_to_end() {
    let (client, server) = duplex(MAX_FRAME);
    let master = spawn_fake_master(server, |header| {
        let method = header.remote_method.as_ref().unwrap();
        assert_eq!(method.service_name, MASTER_SERVICE_NAME);
        assert_eq!(method.method_name, "ListTabletServers");

        let body = ListTabletServersResponsePb {
            error: None,
            servers: vec![
                tserver("ts-1", "node-1.local"),
                tserver("ts-2", "node-2.local"),
                tserver("ts-3", "node-3.local"),
            ],
        };
        Some(to_frame(&ResponseHeader::success(header.call_id.unwrap()), &body).unwrap())
    });

    let dispatcher = dispatcher(client);
    let call = ListTabletServersCall::new(TargetTable::master());
    let outcome = dispatcher.dispatch(&call).await.unwrap();

    assert_eq!(outcome.response.servers_count(), 3);
    assert_eq!(
        outcome.response.servers(),
        &[
            ServerInfo::new("ts-1", "node-1.local", 9100, false),
            ServerInfo::new("ts-2", "node-2.local", 9100, false),
            ServerInfo::new("ts-3", "node-3.local", 9100, false),
        ][..]
    );
    assert_eq!(outcome.response.ts_uuid(), "master-a");
    assert!(outcome.error.is_none());

    drop(dispatcher);
    assert_eq!(master.await.unwrap(), 1);
}

#[tokio::test]
async fn test_application_error_is_data_not_failure() {
    let (client, server) = duplex(MAX_FRAME);
    let _master = spawn_fake_master(server, |header| {
        let body = ListTabletServersResponsePb {
            error: Some(MasterErrorPb::new(
                MasterErrorCode::NotTheLeader,
                AppStatusPb::new(AppStatusCode::IllegalState, "not the leader"),
            )),
            servers: Vec::new(),
        };
        Some(to_frame(&ResponseHeader::success(header.call_id.unwrap()), &body).unwrap())
    });

    let outcome = dispatcher(client)
        .dispatch(&ListTabletServersCall::new(TargetTable::master()))
        .await
        .unwrap();

    assert!(outcome.has_error());
    let (response, error) = outcome.into_parts();
    assert_eq!(response.servers_count(), 0);
    assert_eq!(error.unwrap().code, MasterErrorCode::NotTheLeader);
}

#[tokio::test]
async fn test_sequential_calls_share_connection() {
    let (client, server) = duplex(MAX_FRAME);
    let master = spawn_fake_master(server, |header| {
        let call_id = header.call_id.unwrap();
        let reply = match header.remote_method.as_ref().unwrap().method_name.as_str() {
            "Ping" => to_frame(&ResponseHeader::success(call_id), &PingResponsePb::default()),
            "ListMasters" => to_frame(
                &ResponseHeader::success(call_id),
                &ListMastersResponsePb {
                    error: None,
                    masters: vec![
                        ServerEntryPb {
                            error: None,
                            instance_id: Some(NodeInstancePb::new("m-1".as_bytes(), 1)),
                            registration: Some(registration("master-1.local", 7100)),
                            role: Some(RaftRole::Follower),
                        },
                        ServerEntryPb {
                            error: None,
                            instance_id: Some(NodeInstancePb::new("m-2".as_bytes(), 1)),
                            registration: Some(registration("master-2.local", 7100)),
                            role: Some(RaftRole::Leader),
                        },
                    ],
                },
            ),
            other => to_frame(
                &ResponseHeader::error(call_id),
                &ErrorStatusPb::new(RpcErrorCode::ErrorNoSuchMethod, other),
            ),
        };
        Some(reply.unwrap())
    });

    let dispatcher = dispatcher(client);

    let ping = dispatcher
        .dispatch(&PingCall::new(TargetTable::master()))
        .await
        .unwrap();
    assert_eq!(ping.response.ts_uuid(), "master-a");

    let masters = dispatcher
        .dispatch(&ListMastersCall::new(TargetTable::master()))
        .await
        .unwrap();
    assert_eq!(
        masters.response.leader().map(|m| m.uuid()),
        Some("m-2")
    );

    let unknown = dispatcher
        .dispatch(&ListTabletServersCall::new(TargetTable::master()))
        .await;
    assert!(matches!(
        unknown,
        Err(RpcError::Remote {
            code: RpcErrorCode::ErrorNoSuchMethod,
            ..
        })
    ));

    drop(dispatcher);
    assert_eq!(master.await.unwrap(), 3);
}

#[tokio::test]
async fn test_silent_master_times_out() {
    let (client, server) = duplex(MAX_FRAME);
    let _master = spawn_fake_master(server, |_| None);

    let call = ListTabletServersCall::with_state(
        CallState::new(TargetTable::master()).with_timeout(Duration::from_millis(50)),
    );
    let result = dispatcher(client).dispatch(&call).await;

    match result {
        Err(RpcError::Timeout { elapsed }) => assert!(elapsed >= Duration::from_millis(50)),
        other => panic!("expected timeout, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_late_reply_does_not_leak_into_next_call() {
    let (client, server) = duplex(MAX_FRAME);
    let master = tokio::spawn(async move {
        let mut framed = Framed::new(server, FrameCodec::new(MAX_FRAME));
        let mut served = 0;
        while let Some(Ok(frame)) = framed.next().await {
            let header: RequestHeader = Frame::parse(frame).unwrap().header().unwrap();
            served += 1;
            if served == 1 {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            let reply = to_frame(
                &ResponseHeader::success(header.call_id.unwrap()),
                &PingResponsePb::default(),
            )
            .unwrap();
            if framed.send(reply).await.is_err() {
                break;
            }
        }
        served
    });

    let dispatcher = dispatcher(client);
    let slow = PingCall::with_state(
        CallState::new(TargetTable::master()).with_timeout(Duration::from_millis(30)),
    );
    let first = dispatcher.dispatch(&slow).await;
    assert!(matches!(first, Err(RpcError::Timeout { .. })));

    // Give the stale reply time to land in the client's read buffer.
    tokio::time::sleep(Duration::from_millis(150)).await;

    let second = dispatcher
        .dispatch(&PingCall::new(TargetTable::master()))
        .await;
    assert!(matches!(second, Err(RpcError::ConnectionError(_))));
    assert!(dispatcher.transport().is_broken());

    drop(dispatcher);
    assert_eq!(master.await.unwrap(), 1);
}

#[tokio::test]
async fn test_elapsed_covers_round_trip() {
    let (client, server) = duplex(MAX_FRAME);
    let _master = spawn_fake_master(server, |header| {
        std::thread::sleep(Duration::from_millis(20));
        Some(
            to_frame(
                &ResponseHeader::success(header.call_id.unwrap()),
                &ListTabletServersResponsePb::default(),
            )
            .unwrap(),
        )
    });

    let outcome = dispatcher(client)
        .dispatch(&ListTabletServersCall::new(TargetTable::master()))
        .await
        .unwrap();
    assert!(outcome.response.elapsed_millis() >= 20);
}
