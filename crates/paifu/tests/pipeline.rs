//! Sniffer and archiver wired together over in-memory stores.

mod common;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use paifu::prelude::*;
use paifu::{ArchiveConfig, SnifferStats};
use paifu_capture::{CaptureError, Opcode};
use paifu_mirror::{PushCommand, read_heartbeat};
use paifu_protocol::ProtocolError;
use paifu_protocol::frame::{notify_frame, request_frame, response_frame};
use paifu_record::BuildError;

use common::{RULES, START, UUID, fetch_game_record_frames};

fn config() -> Config {
    Config::from_json_str(RULES).unwrap()
}

fn heartbeat_frames() -> [CapturedFrame; 2] {
    [
        CapturedFrame::binary(true, request_frame(3, ".lq.Lobby.heatbeat", &[])),
        CapturedFrame::binary(false, response_frame(3, &[])),
    ]
}

// =========================================================================
// Sniffer
// =========================================================================

#[tokio::test]
async fn test_sniffer_run_mirrors_configured_exchanges() {
    let queue = Arc::new(MemoryQueue::new());
    let mut sniffer = Sniffer::from_config(&config(), Arc::clone(&queue));

    let mut frames = Vec::new();
    frames.extend(heartbeat_frames());
    frames.extend(fetch_game_record_frames(7, true));
    frames.push(CapturedFrame::binary(
        false,
        notify_frame(".lq.NotifyAccountUpdate", &[]),
    ));
    let mut source = ReplaySource::new(frames);

    let stats = sniffer.run(&mut source).await.unwrap();
    assert_eq!(
        stats,
        SnifferStats {
            frames: 5,
            exchanges: 3,
            mirrored: 1,
            unhandled: 1,
        }
    );
    assert_eq!(queue.len("game-detail-list").await, 1);

    let raw = queue.pop("game-detail-list").await.unwrap().unwrap();
    let message = MirroredMessage::decode(&raw).unwrap();
    assert_eq!(message.request_direction, Direction::Outbound);
    assert_eq!(
        message.response.unwrap(),
        response_frame(7, &common::game_record(true))
    );
}

#[tokio::test]
async fn test_sniffer_handle_text_frame_unsupported() {
    let mut sniffer = Sniffer::from_config(&config(), MemoryQueue::new());
    let err = sniffer
        .handle(CapturedFrame::text(true, b"{}".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PaifuError::Capture(CaptureError::UnsupportedFrameType(Opcode::Text))
    ));
}

#[tokio::test]
async fn test_sniffer_run_unmatched_response_fatal() {
    let mut sniffer = Sniffer::from_config(&config(), MemoryQueue::new());
    let mut source = ReplaySource::new([CapturedFrame::binary(false, response_frame(42, &[]))]);
    let err = sniffer.run(&mut source).await.unwrap_err();
    assert!(matches!(
        err,
        PaifuError::Protocol(ProtocolError::UnmatchedResponse { seq: 42, .. })
    ));
}

#[tokio::test]
async fn test_sniffer_handle_request_waits_for_response() {
    let mut sniffer = Sniffer::from_config(&config(), MemoryQueue::new());
    let [request, response] = fetch_game_record_frames(1, true);
    assert_eq!(sniffer.handle(request).await.unwrap(), None);
    assert!(sniffer.handle(response).await.unwrap().is_some());
    assert_eq!(sniffer.mirror().queue().len("game-detail-list").await, 1);
}

// =========================================================================
// Archiver
// =========================================================================

async fn sniffed(queue: &Arc<MemoryQueue>, records_valid: bool) {
    let mut sniffer = Sniffer::from_config(&config(), Arc::clone(queue));
    let mut source = ReplaySource::new(fetch_game_record_frames(5, records_valid));
    sniffer.run(&mut source).await.unwrap();
}

#[tokio::test]
async fn test_archiver_stores_under_date_keys() {
    let queue = Arc::new(MemoryQueue::new());
    sniffed(&queue, true).await;

    let config = config();
    let archiver = Archiver::new(config.archive.clone(), Arc::clone(&queue), MemoryBlobStore::new());
    let archived = archiver.archive_next().await.unwrap();

    assert_eq!(archived.uuid, UUID);
    assert_eq!(archived.detail_key, format!("game-detail/2021/03/14/{UUID}"));
    assert_eq!(
        archived.record_key.as_deref(),
        Some(format!("game-record/2021/03/{UUID}.json").as_str())
    );

    let detail = archiver.blobs().get(&archived.detail_key).await.unwrap();
    assert_eq!(detail, response_frame(5, &common::game_record(true)));

    let record = archiver
        .blobs()
        .get(archived.record_key.as_deref().unwrap())
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&record).unwrap();
    assert_eq!(json["uuid"], UUID);
    assert_eq!(json["start_time"], START);
    assert_eq!(json["round_list"][0]["turns"][3]["type"], "荒牌平局");

    let beat = read_heartbeat(&*queue, "archiver.heartbeat").await.unwrap();
    assert!(beat.is_some());
    assert_eq!(queue.len("game-detail-list").await, 0);
}

#[tokio::test]
async fn test_archiver_without_record_prefix_stores_detail_only() {
    let queue = Arc::new(MemoryQueue::new());
    sniffed(&queue, true).await;

    let archive = ArchiveConfig {
        detail_prefix: "detail".into(),
        ..ArchiveConfig::default()
    };
    let blobs = Arc::new(MemoryBlobStore::new());
    let archiver = Archiver::new(archive, Arc::clone(&queue), Arc::clone(&blobs));
    let archived = archiver.archive_next().await.unwrap();
    assert_eq!(archived.record_key, None);
    assert_eq!(blobs.list("").await.unwrap(), [format!("detail/{UUID}")]);
}

#[tokio::test]
async fn test_archiver_rejects_inbound_message() {
    let message = MirroredMessage {
        request_direction: Direction::Inbound,
        request: notify_frame(".lq.NotifyAccountUpdate", &[]),
        response: None,
        timestamp: Utc.timestamp_opt(i64::from(START), 0).unwrap(),
    };
    let archiver = Archiver::new(
        ArchiveConfig::default(),
        MemoryQueue::new(),
        MemoryBlobStore::new(),
    );
    let err = archiver.archive(&message.encode().unwrap()).await.unwrap_err();
    assert!(matches!(err, PaifuError::UnexpectedDirection(Direction::Inbound)));
}

#[tokio::test]
async fn test_archiver_validation_failure_stores_nothing() {
    let queue = Arc::new(MemoryQueue::new());
    sniffed(&queue, false).await;

    let blobs = Arc::new(MemoryBlobStore::new());
    let archiver = Archiver::new(config().archive, Arc::clone(&queue), Arc::clone(&blobs));
    let err = archiver.archive_next().await.unwrap_err();
    assert!(matches!(err, PaifuError::Build(BuildError::Validation(_))));
    assert!(blobs.list("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_archiver_validation_disabled_stores_detail() {
    let queue = Arc::new(MemoryQueue::new());
    sniffed(&queue, false).await;

    let archive = ArchiveConfig {
        validate: false,
        ..ArchiveConfig::default()
    };
    let archiver = Archiver::new(archive, Arc::clone(&queue), MemoryBlobStore::new());
    let archived = archiver.archive_next().await.unwrap();
    assert_eq!(archived.detail_key, format!("game-detail/2021/03/14/{UUID}"));
}

#[tokio::test]
async fn test_archiver_archive_next_waits_for_push() {
    let queue = Arc::new(MemoryQueue::new());
    let archiver = Archiver::new(
        ArchiveConfig::default(),
        Arc::clone(&queue),
        MemoryBlobStore::new(),
    );
    let mut source = ReplaySource::new(fetch_game_record_frames(9, true));
    let mut sniffer = Sniffer::from_config(&config(), Arc::clone(&queue));

    let (archived, stats) = tokio::join!(archiver.archive_next(), async {
        tokio::task::yield_now().await;
        sniffer.run(&mut source).await
    });
    assert_eq!(stats.unwrap().mirrored, 1);
    assert_eq!(archived.unwrap().uuid, UUID);
}

#[tokio::test]
async fn test_archiver_missing_response_fails() {
    let queue = MemoryQueue::new();
    let message = MirroredMessage {
        request_direction: Direction::Outbound,
        request: request_frame(1, common::FETCH_GAME_RECORD, &[]),
        response: None,
        timestamp: Utc::now(),
    };
    queue
        .push(PushCommand::Rpush, "game-detail-list", message.encode().unwrap())
        .await
        .unwrap();
    let archiver = Archiver::new(ArchiveConfig::default(), queue, MemoryBlobStore::new());
    assert!(matches!(
        archiver.archive_next().await.unwrap_err(),
        PaifuError::MissingResponse(_)
    ));
}
