//! Integration tests for leap-bridge.
//!
//! These tests drive whole poll cycles and decompositions through the
//! public API.

use bytes::Bytes;
use leap_bridge::codec::FrameCodec;
use leap_bridge::decompose::{Decompose, LegacyDialect, NativeDialect};
use leap_bridge::model::{Finger, Frame, Hand, Handedness, Image, ImageList, Vector};
use leap_bridge::protocol::{
    selectors, Atom, Channel, ElementType, MatrixInfo, MatrixInput, Record, ENVELOPE_SIZE,
};
use leap_bridge::sink::{ChannelSink, CollectingSink, Event};
use leap_bridge::source::{policy, FrameSource, RecordedSource};
use leap_bridge::{BridgeBuilder, BridgeConfig, BridgeError, PollController, PollOutcome};

fn finger(id: i32, x: f32) -> Finger {
    Finger {
        id,
        tip_position: Vector::new(x, 180.0, -20.0),
        direction: Vector::new(0.0, 0.0, -1.0),
        tip_velocity: Vector::new(1.0, 0.0, 0.0),
        width: 16.5,
        length: 48.0,
        valid: true,
        ..Finger::invalid()
    }
}

fn hand(id: i32, handedness: Handedness, z: f32, fingers: usize) -> Hand {
    let mut hand = Hand::new(id, 0, handedness);
    hand.confidence = 0.9;
    hand.grab_strength = 0.25;
    hand.pinch_strength = 0.5;
    hand.palm_width = 85.0;
    hand.palm_position = Vector::new(10.0 * id as f32, 200.0, z);
    hand.direction = Vector::new(0.0, 0.0, -1.0);
    hand.palm_normal = Vector::new(0.0, -1.0, 0.0);
    hand.sphere_center = Vector::new(0.0, 210.0, z);
    hand.sphere_radius = 60.0;
    hand.fingers = (0..fingers)
        .map(|i| finger(id * 10 + i as i32, i as f32 * 20.0))
        .collect();
    hand
}

/// Frame 42 at t=1000: right hand id 1 (5 fingers) in front of left hand id 2 (3 fingers).
fn scenario_frame() -> Frame {
    Frame::new(42, 1000)
        .with_hand(hand(1, Handedness::Right, -40.0, 5))
        .with_hand(hand(2, Handedness::Left, 25.0, 3))
}

fn session(ids: std::ops::RangeInclusive<i64>) -> RecordedSource {
    let mut source = RecordedSource::new();
    for id in ids {
        let mut frame = Frame::new(id, id * 16_000).with_hand(hand(1, Handedness::Right, 0.0, 5));
        frame.fps = 60.0;
        source.push(frame);
    }
    source
}

fn emitted_frame_ids(sink: &CollectingSink) -> Vec<i64> {
    sink.records()
        .iter()
        .filter_map(|r| match r {
            Record::Frame { id, .. } => Some(*id),
            _ => None,
        })
        .collect()
}

#[test]
fn test_invalid_frame_emits_nothing_in_either_dialect() {
    let mut sink = CollectingSink::new();
    NativeDialect::new(true, true)
        .decompose(&Frame::invalid(), None, &mut sink)
        .unwrap();
    LegacyDialect
        .decompose(&Frame::invalid(), None, &mut sink)
        .unwrap();
    assert!(sink.is_empty());
}

#[test]
fn test_native_frame_shape() {
    let mut sink = CollectingSink::new();
    NativeDialect::new(true, false)
        .decompose(&scenario_frame(), None, &mut sink)
        .unwrap();

    let emitted = sink.selectors();
    assert_eq!(emitted.last(), Some(&selectors::FRAME_END));
    assert_eq!(sink.count(selectors::FRAME_END), 1);
    assert_eq!(sink.count(selectors::FRAME), 1);

    let frame_pos = emitted.iter().position(|s| *s == selectors::FRAME);
    let hand_pos = emitted.iter().position(|s| *s == selectors::HAND);
    assert!(frame_pos < hand_pos);
}

#[test]
fn test_five_finger_records_per_hand() {
    for fingers in [0, 2, 5, 7] {
        let frame = Frame::new(1, 0).with_hand(hand(4, Handedness::Left, 0.0, fingers));
        let mut sink = CollectingSink::new();
        NativeDialect::default()
            .decompose(&frame, None, &mut sink)
            .unwrap();
        assert_eq!(sink.count(selectors::FINGER), 5, "{} fingers reported", fingers);
    }
}

#[test]
fn test_two_hand_scenario() {
    let mut sink = CollectingSink::new();
    NativeDialect::default()
        .decompose(&scenario_frame(), None, &mut sink)
        .unwrap();

    assert_eq!(sink.len(), 18);
    assert_eq!(
        sink.records()[0].atoms(),
        vec![Atom::Long(42), Atom::Long(1000), Atom::Long(2), Atom::Long(1)]
    );

    let hand_ids: Vec<i64> = sink
        .records()
        .iter()
        .filter_map(|r| match r {
            Record::Hand { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(hand_ids, vec![1, 2]);

    // hand 2 reports three fingers, padded with two invalid slots
    let slots: Vec<i64> = sink.records()[10..15]
        .iter()
        .filter_map(|r| match r {
            Record::Finger { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(slots, vec![20, 21, 22, -1, -1]);
    assert_eq!(sink.records()[15].selector(), selectors::PALM);
    assert_eq!(sink.records()[16].selector(), selectors::BALL);
    assert_eq!(sink.records()[17], &Record::FrameEnd);
}

#[test]
fn test_codec_round_trip_preserves_decomposition() {
    let frame = scenario_frame();
    let envelope = FrameCodec::encode(&frame).unwrap().to_bytes();
    assert_eq!(envelope.len(), ENVELOPE_SIZE);
    let decoded = FrameCodec::decode_bytes(&envelope).unwrap();

    for dialect in [
        &NativeDialect::new(true, false) as &dyn Decompose,
        &LegacyDialect as &dyn Decompose,
    ] {
        let mut direct = CollectingSink::new();
        let mut round_tripped = CollectingSink::new();
        dialect.decompose(&frame, None, &mut direct).unwrap();
        dialect.decompose(&decoded, None, &mut round_tripped).unwrap();
        assert_eq!(direct.records(), round_tripped.records());
    }
}

#[test]
fn test_unique_mode_is_idempotent() {
    let mut bridge = BridgeBuilder::new(session(1..=5)).unique(true).build();
    let mut first = CollectingSink::new();
    let mut second = CollectingSink::new();

    assert_eq!(bridge.poll(&mut first).unwrap(), PollOutcome::Emitted { frames: 1 });
    assert_eq!(bridge.poll(&mut second).unwrap(), PollOutcome::Duplicate);

    assert_eq!(first.count(selectors::CONNECTED), 1);
    assert_eq!(second.count(selectors::CONNECTED), 1);
    assert_eq!(second.records()[1], &Record::Fps(60.0));
    assert_eq!(first.count(selectors::FRAME_END), 1);
    assert_eq!(second.count(selectors::FRAME_END), 0);
}

#[test]
fn test_backlog_replay_vs_latest_only() {
    for allframes in [true, false] {
        let mut bridge = BridgeBuilder::new(session(1..=10))
            .unique(true)
            .allframes(allframes)
            .build();
        bridge.poll(&mut CollectingSink::new()).unwrap();

        for id in 11..=13 {
            let frame = Frame::new(id, id * 16_000).with_hand(hand(1, Handedness::Right, 0.0, 5));
            bridge.source_mut().push(frame);
        }

        let mut sink = CollectingSink::new();
        bridge.poll(&mut sink).unwrap();
        if allframes {
            assert_eq!(emitted_frame_ids(&sink), vec![11, 12, 13]);
        } else {
            assert_eq!(emitted_frame_ids(&sink), vec![13]);
        }
        assert_eq!(bridge.last_frame_id(), 13);
    }
}

#[test]
fn test_legacy_never_emits_motion_tracking() {
    let mut bridge = BridgeBuilder::new(session(1..=3))
        .legacy(true)
        .motion_tracking(true)
        .serialize(true)
        .build();
    let mut sink = CollectingSink::new();
    bridge.poll(&mut sink).unwrap();
    bridge.poll(&mut sink).unwrap();

    assert!(sink.records_on(Channel::Tracking).is_empty());
    assert_eq!(sink.count(selectors::SERIALIZED_FRAME), 0);
    assert_eq!(sink.count(selectors::FRAME_START), 2);
}

#[test]
fn test_motion_tracking_between_polls() {
    let mut source = RecordedSource::new();
    source.push(Frame::new(1, 0).with_hand(hand(1, Handedness::Right, 0.0, 5)));
    let mut bridge = BridgeBuilder::new(source)
        .unique(true)
        .motion_tracking(true)
        .build();
    bridge.poll(&mut CollectingSink::new()).unwrap();

    let mut moved = hand(1, Handedness::Right, 0.0, 5);
    moved.palm_position = moved.palm_position + Vector::new(15.0, 0.0, 0.0);
    for f in &mut moved.fingers {
        f.tip_position = f.tip_position + Vector::new(15.0, 0.0, 0.0);
    }
    bridge
        .source_mut()
        .push(Frame::new(2, 16_000).with_hand(moved));

    let mut sink = CollectingSink::new();
    bridge.poll(&mut sink).unwrap();

    let tracking = sink.records_on(Channel::Tracking);
    assert_eq!(tracking.len(), 4);
    match tracking[3] {
        Record::Position { translation } => {
            assert!((translation.x - 15.0).abs() < 1e-3);
            assert!(translation.y.abs() < 1e-3);
        }
        other => panic!("expected position, got {:?}", other),
    }
    match tracking[2] {
        Record::Scale { factor } => assert!((factor - 1.0).abs() < 1e-4),
        other => panic!("expected scale, got {:?}", other),
    }
}

#[test]
fn test_images_need_two() {
    let mut frame = Frame::new(1, 0);
    frame.images = ImageList::new(vec![Image::new(0, 2, 2, Bytes::from_static(&[9; 4]))]);
    let mut source = RecordedSource::new();
    source.push(frame);

    let mut bridge = PollController::new(source, BridgeConfig::default());
    let mut sink = CollectingSink::new();
    bridge.poll(&mut sink).unwrap();

    assert!(sink.images().is_empty());
    assert_eq!(sink.count(selectors::FRAME_END), 1);
}

#[test]
fn test_images_published_on_both_channels() {
    let mut frame = Frame::new(1, 0);
    frame.images = ImageList::new(vec![
        Image::new(0, 3, 2, Bytes::from_static(&[1, 2, 3, 4, 5, 6])),
        Image::new(1, 3, 2, Bytes::from_static(&[6, 5, 4, 3, 2, 1])),
    ]);
    let mut source = RecordedSource::new();
    source.push(frame);

    let mut bridge = PollController::new(source, BridgeConfig::default());
    let mut sink = CollectingSink::new();
    bridge.poll(&mut sink).unwrap();

    let images = sink.images();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].0, Channel::ImageLeft);
    assert_eq!(images[1].0, Channel::ImageRight);
    assert_eq!((images[0].1.width, images[0].1.height), (3, 2));
    assert_eq!(&images[1].1.data[..], &[6, 5, 4, 3, 2, 1]);
}

#[test]
fn test_policy_changes_deferred_until_poll() {
    let mut bridge = PollController::new(session(1..=1), BridgeConfig::default());
    bridge.poll(&mut CollectingSink::new()).unwrap();

    bridge.set_images(false);
    bridge.set_hmd(true);
    assert_eq!(bridge.source().applied_policies().len(), 1);

    bridge.poll(&mut CollectingSink::new()).unwrap();
    assert_eq!(bridge.source().applied_policies().len(), 2);
    assert_eq!(
        bridge.source().policy_flags(),
        policy::BACKGROUND_FRAMES | policy::OPTIMIZE_HMD
    );

    bridge.poll(&mut CollectingSink::new()).unwrap();
    assert_eq!(bridge.source().applied_policies().len(), 2);
}

#[test]
fn test_configure_from_another_thread() {
    let mut bridge = PollController::new(session(1..=1), BridgeConfig::default());
    bridge.run_pending();

    let handle = bridge.control_handle();
    std::thread::spawn(move || handle.configure()).join().unwrap();

    assert_eq!(bridge.run_pending(), 1);
    assert_eq!(bridge.source().applied_policies().len(), 2);
}

#[test]
fn test_ingest_serialized_frame() {
    let mut producer = BridgeBuilder::new(session(1..=1)).serialize(true).build();
    let mut produced = CollectingSink::new();
    producer.poll(&mut produced).unwrap();

    let envelope = match produced.records_on(Channel::Message)[2] {
        Record::SerializedFrame(serialized) => serialized.to_bytes(),
        other => panic!("expected serialized_frame, got {:?}", other),
    };

    let consumer = PollController::new(RecordedSource::new(), BridgeConfig::default());
    let mut sink = CollectingSink::new();
    let count = consumer
        .ingest(&MatrixInput::envelope(&envelope), &mut sink)
        .unwrap();

    assert_eq!(count, 1);
    assert_eq!(emitted_frame_ids(&sink), vec![1]);
    assert_eq!(
        produced.records_on(Channel::Frame),
        sink.records_on(Channel::Frame)
    );
}

#[test]
fn test_ingest_rejections_in_order() {
    let bridge = PollController::new(RecordedSource::new(), BridgeConfig::default());
    let mut sink = CollectingSink::new();
    let data = vec![0u8; ENVELOPE_SIZE];

    let mut info = MatrixInfo::char_1d(data.len());
    info.plane_count = 2;
    info.element_type = ElementType::Float32;
    let err = bridge.ingest(&MatrixInput::new(info, &data), &mut sink).unwrap_err();
    assert!(matches!(err, BridgeError::PlaneMismatch(2)));

    let mut info = MatrixInfo::char_1d(data.len());
    info.element_type = ElementType::Long;
    info.dims = vec![data.len(), 1];
    let err = bridge.ingest(&MatrixInput::new(info, &data), &mut sink).unwrap_err();
    assert!(matches!(err, BridgeError::TypeMismatch(ElementType::Long)));

    let mut info = MatrixInfo::char_1d(data.len());
    info.dims = vec![data.len(), 1];
    let err = bridge.ingest(&MatrixInput::new(info, &data), &mut sink).unwrap_err();
    assert!(matches!(err, BridgeError::DimMismatch(2)));

    assert!(sink.is_empty());
}

#[test]
fn test_ingest_empty_envelope_rejected() {
    let bridge = PollController::new(RecordedSource::new(), BridgeConfig::default());
    let mut sink = CollectingSink::new();
    let data = vec![0u8; ENVELOPE_SIZE];

    let result = bridge.ingest(&MatrixInput::envelope(&data), &mut sink);
    assert!(result.is_err());
    assert!(sink.is_empty());
}

#[test]
fn test_config_from_json_drives_bridge() {
    let config = BridgeConfig::from_json(r#"{"unique": true, "images": false}"#).unwrap();
    let mut bridge = BridgeBuilder::new(session(1..=2)).config(config).build();
    bridge.poll(&mut CollectingSink::new()).unwrap();

    assert_eq!(bridge.source().policy_flags(), policy::BACKGROUND_FRAMES);
    assert_eq!(
        bridge.poll(&mut CollectingSink::new()).unwrap(),
        PollOutcome::Duplicate
    );
}

#[tokio::test]
async fn test_channel_sink_delivers_poll_output() {
    let (mut sink, mut rx) = ChannelSink::new(64);
    let mut bridge = BridgeBuilder::new(session(1..=1)).images(false).build();

    bridge.poll(&mut sink).unwrap();
    drop(sink);

    let mut selectors_seen = Vec::new();
    while let Some(event) = rx.recv().await {
        if let Event::Record { record, .. } = event {
            selectors_seen.push(record.selector());
        }
    }

    assert_eq!(selectors_seen.first(), Some(&selectors::CONNECTED));
    assert_eq!(selectors_seen.last(), Some(&selectors::FRAME_END));
    assert_eq!(selectors_seen.len(), 2 + 1 + 1 + 5 + 2 + 1);
}

#[tokio::test]
async fn test_channel_sink_backpressure_aborts_cycle() {
    let (mut sink, _rx) = ChannelSink::new(2);
    let mut bridge = BridgeBuilder::new(session(1..=1)).build();

    let result = bridge.poll(&mut sink);
    assert!(matches!(result, Err(BridgeError::Backpressure)));
    assert_eq!(sink.dropped_count(), 1);
    assert_eq!(bridge.last_frame_id(), 0);
}

#[test]
fn test_source_trait_object() {
    let source: Box<dyn FrameSource> = Box::new(session(1..=3));
    assert_eq!(source.frame(0).id, 3);
    assert!(source.is_connected());
}
