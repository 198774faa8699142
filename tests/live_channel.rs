mod support;

use std::time::Duration;

use tokio::time::timeout;

use support::MockServer;
use vcc::config::SyncConfig;
use vcc::live::LiveChannel;

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn channel_reports_connect_and_delivers_updates() {
    let server = MockServer::start().await;
    let mut channel = LiveChannel::connect(server.ws_url(), &SyncConfig::default());

    let mut connected = channel.connected();
    while !*connected.borrow_and_update() {
        timeout(WAIT, connected.changed())
            .await
            .expect("connect")
            .expect("watch open");
    }

    server.state.notify_update();
    let event = timeout(WAIT, channel.recv()).await.expect("event");
    assert_eq!(event, Some(()));

    channel.close();
}

#[tokio::test]
async fn channel_stays_disconnected_without_a_server() {
    // nothing listens on the discard port
    let sync = SyncConfig::default();
    let channel = LiveChannel::connect("ws://127.0.0.1:9/ws".to_string(), &sync);

    let connected = channel.connected();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!*connected.borrow());
}

#[tokio::test]
async fn events_carry_no_payload_and_coalesce_under_load() {
    let server = MockServer::start().await;
    let mut channel = LiveChannel::connect(server.ws_url(), &SyncConfig::default());

    let mut connected = channel.connected();
    while !*connected.borrow_and_update() {
        timeout(WAIT, connected.changed())
            .await
            .expect("connect")
            .expect("watch open");
    }

    for _ in 0..32 {
        server.state.notify_update();
    }

    // every received event is the same bare signal; a burst may coalesce
    // but at least one must come through
    let first = timeout(WAIT, channel.recv()).await.expect("event");
    assert_eq!(first, Some(()));

    channel.close();
}
