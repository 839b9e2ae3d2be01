//! Integration tests for request/response correlation.

use paifu_capture::{CapturedFrame, Direction, FrameSource, ReplaySource};
use paifu_protocol::frame::{notify_frame, request_frame, response_frame};
use paifu_protocol::{
    DemuxConfig, Demultiplexer, MalformedReason, ProtocolError, StalePolicy, unwrap,
};
use rand::Rng;

// =========================================================================
// Pairing
// =========================================================================

#[test]
fn test_feed_pairs_each_request_with_its_response() {
    let mut rng = rand::rng();
    let mut demux = Demultiplexer::default();

    for _ in 0..100 {
        let seq: u16 = rng.random();
        let request_data: Vec<u8> = (0..rng.random_range(0..64)).map(|_| rng.random()).collect();
        let response_data: Vec<u8> = (0..rng.random_range(0..64)).map(|_| rng.random()).collect();
        let request = request_frame(seq, ".lq.Lobby.fetchGameRecord", &request_data);
        let response = response_frame(seq, &response_data);

        assert!(demux.feed(Direction::Outbound, request.clone()).unwrap().is_none());
        assert_eq!(demux.pending_len(), 1);

        let exchange = demux
            .feed(Direction::Inbound, response.clone())
            .unwrap()
            .expect("response should complete the exchange");
        assert_eq!(exchange.name, ".lq.Lobby.fetchGameRecord");
        assert_eq!(exchange.request_direction, Direction::Outbound);
        assert_eq!(exchange.request, request);
        assert_eq!(exchange.response.as_deref(), Some(&response[..]));
        assert_eq!(
            exchange.response_envelope().unwrap().unwrap().data,
            response_data
        );
        assert_eq!(demux.pending_len(), 0);
    }
}

#[test]
fn test_feed_pairs_interleaved_requests_by_seq() {
    let mut demux = Demultiplexer::default();
    demux
        .feed(Direction::Outbound, request_frame(1, ".lq.Lobby.oauth2Login", &[]))
        .unwrap();
    demux
        .feed(Direction::Outbound, request_frame(2, ".lq.Lobby.fetchInfo", &[]))
        .unwrap();

    let second = demux
        .feed(Direction::Inbound, response_frame(2, &[]))
        .unwrap()
        .unwrap();
    assert_eq!(second.name, ".lq.Lobby.fetchInfo");
    let first = demux
        .feed(Direction::Inbound, response_frame(1, &[]))
        .unwrap()
        .unwrap();
    assert_eq!(first.name, ".lq.Lobby.oauth2Login");
}

#[test]
fn test_feed_notification_emits_immediately_with_inverse_disposition() {
    let mut demux = Demultiplexer::default();
    let frame = notify_frame(".lq.NotifyAccountUpdate", &[8, 1]);
    let exchange = demux
        .feed(Direction::Inbound, frame.clone())
        .unwrap()
        .expect("notification should emit");
    assert!(exchange.is_notification());
    assert_eq!(exchange.request, frame);
    assert_eq!(exchange.request_direction, Direction::Inbound);
    assert_eq!(exchange.disposition_direction(), Direction::Outbound);
    assert_eq!(demux.pending_len(), 0);
}

// =========================================================================
// Fatal paths
// =========================================================================

#[test]
fn test_feed_unmatched_response_is_fatal() {
    let mut demux = Demultiplexer::default();
    let err = demux
        .feed(Direction::Inbound, response_frame(42, &[]))
        .unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::UnmatchedResponse {
            seq: 42,
            direction: Direction::Inbound,
            ..
        }
    ));
}

#[test]
fn test_feed_response_in_same_direction_is_mismatch() {
    let mut demux = Demultiplexer::default();
    demux
        .feed(Direction::Outbound, request_frame(3, ".lq.Lobby.heatbeat", &[]))
        .unwrap();
    let err = demux
        .feed(Direction::Outbound, response_frame(3, &[]))
        .unwrap_err();
    assert!(matches!(err, ProtocolError::DirectionMismatch { .. }));
}

#[test]
fn test_feed_malformed_frames_carry_reason_and_bytes() {
    let mut demux = Demultiplexer::default();
    let cases: [(Vec<u8>, MalformedReason); 4] = [
        (vec![], MalformedReason::EmptyFrame),
        (vec![7, 0, 0], MalformedReason::UnknownType(7)),
        (vec![2, 1, 0, 0x12, 0x00], MalformedReason::NamePattern),
        (vec![3, 1, 0, 0x0a, 0x01, b'.', 0x12], MalformedReason::ResponsePattern),
    ];
    for (content, expected) in cases {
        match demux.feed(Direction::Inbound, content.clone()) {
            Err(ProtocolError::MalformedFrame {
                reason, content: c, ..
            }) => {
                assert_eq!(reason, expected);
                assert_eq!(c, content);
            }
            other => panic!("expected malformed frame, got {other:?}"),
        }
    }
}

// =========================================================================
// Stale requests
// =========================================================================

#[test]
fn test_feed_stale_request_overwrites_by_default() {
    let mut demux = Demultiplexer::default();
    demux
        .feed(Direction::Outbound, request_frame(5, ".lq.Lobby.first", &[]))
        .unwrap();
    demux
        .feed(Direction::Outbound, request_frame(5, ".lq.Lobby.second", &[]))
        .unwrap();
    assert_eq!(demux.pending_len(), 1);

    let exchange = demux
        .feed(Direction::Inbound, response_frame(5, &[]))
        .unwrap()
        .unwrap();
    assert_eq!(exchange.name, ".lq.Lobby.second");
}

#[test]
fn test_feed_stale_request_rejected_when_configured() {
    let mut demux = Demultiplexer::new(DemuxConfig {
        stale_policy: StalePolicy::Reject,
    });
    demux
        .feed(Direction::Outbound, request_frame(5, ".lq.Lobby.first", &[]))
        .unwrap();
    let err = demux
        .feed(Direction::Outbound, request_frame(5, ".lq.Lobby.second", &[]))
        .unwrap_err();
    assert!(matches!(err, ProtocolError::StaleRequest { seq: 5, ref name } if name == ".lq.Lobby.first"));
}

#[test]
fn test_demux_config_deserializes_policy() {
    let config: DemuxConfig = serde_json::from_str(r#"{"stale_policy":"reject"}"#).unwrap();
    assert_eq!(config.stale_policy, StalePolicy::Reject);
    let config: DemuxConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.stale_policy, StalePolicy::Overwrite);
}

// =========================================================================
// From a frame source
// =========================================================================

#[tokio::test]
async fn test_replayed_capture_yields_exchanges_in_order() {
    let mut source = ReplaySource::new([
        CapturedFrame::binary(true, request_frame(1, ".lq.Lobby.fetchGameRecord", b"\n\x04uuid")),
        CapturedFrame::binary(false, notify_frame(".lq.NotifyAccountUpdate", &[])),
        CapturedFrame::binary(false, response_frame(1, &[])),
    ]);
    let mut demux = Demultiplexer::default();
    let mut names = Vec::new();

    while let Some(frame) = source.next_frame().await.unwrap() {
        let (direction, content) = frame.into_binary().unwrap();
        if let Some(exchange) = demux.feed(direction, content).unwrap() {
            let body = exchange.request_envelope().unwrap().encode();
            assert_eq!(unwrap(&body).unwrap().name, exchange.name);
            names.push(exchange.name);
        }
    }
    assert_eq!(
        names,
        [".lq.NotifyAccountUpdate", ".lq.Lobby.fetchGameRecord"]
    );
}
