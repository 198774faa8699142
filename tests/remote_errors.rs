mod support;

use chrono::Utc;

use support::MockServer;
use vcc::error::Error;
use vcc::model::{Status, TaskPatch};
use vcc::remote::{HistoryFilter, RemoteStore};

fn store_for(server: &MockServer) -> RemoteStore {
    RemoteStore::from_parts(reqwest::Client::new(), server.base_url())
}

#[tokio::test]
async fn missing_record_maps_to_http_404() {
    let server = MockServer::start().await;
    let store = store_for(&server);

    let result = store.update_task(999, &TaskPatch::status(Status::Done)).await;
    match result {
        Err(Error::Http { status, url }) => {
            assert_eq!(status, 404);
            assert!(url.contains("/tasks/999"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let store = RemoteStore::from_parts(reqwest::Client::new(), "http://127.0.0.1:9");
    let result = store.list_tasks().await;
    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn briefing_history_applies_filter_and_window() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let today = Utc::now().date_naive();

    for day in 0..4 {
        let mut log = support::daily_log(day + 1, today - chrono::Duration::days(day));
        if day % 2 == 0 {
            log.morning_briefing = Some(format!("morning {day}"));
        }
        server.state.seed_history(log);
    }

    let store = store_for(&server);
    let all = store.briefing_history(HistoryFilter::All, 10, 0).await?;
    assert_eq!(all.len(), 4);

    let mornings = store
        .briefing_history(HistoryFilter::HasMorning, 10, 0)
        .await?;
    assert_eq!(mornings.len(), 2);
    assert!(mornings.iter().all(|log| log.morning_briefing.is_some()));

    let window = store.briefing_history(HistoryFilter::All, 2, 2).await?;
    assert_eq!(window.len(), 2);
    assert_eq!(window[0].id, 3);
    Ok(())
}

#[tokio::test]
async fn daily_log_null_deserializes_to_none() {
    let server = MockServer::start().await;
    let store = store_for(&server);
    assert!(store.daily_log().await.expect("call").is_none());
}
