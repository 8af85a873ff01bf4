//! Replay Demo - drives a bridge from a synthetic session.
//!
//! This demo:
//! - Records a moving two-hand session into a `RecordedSource`
//! - Polls it on a 60 Hz tick with backlog replay and motion tracking
//! - Consumes the records on another task through a `ChannelSink`
//!
//! ```text
//! RUST_LOG=leap_bridge=debug cargo run --example replay
//! ```

use std::time::Duration;

use leap_bridge::model::{Finger, Frame, Hand, Handedness, Vector};
use leap_bridge::protocol::{selectors, Channel};
use leap_bridge::sink::{ChannelSink, Event};
use leap_bridge::source::RecordedSource;
use leap_bridge::BridgeBuilder;
use tracing_subscriber::EnvFilter;

const TICKS: i64 = 30;
/// Sensor frames produced per tick; the bridge replays the backlog.
const FRAMES_PER_TICK: i64 = 2;

fn synthetic_hand(id: i32, handedness: Handedness, t: f32) -> Hand {
    let offset = if handedness.is_right() { 80.0 } else { -80.0 };
    let mut hand = Hand::new(id, 0, handedness);
    hand.confidence = 1.0;
    hand.palm_width = 82.0;
    hand.palm_position = Vector::new(offset + 20.0 * t.sin(), 200.0, -10.0 * id as f32);
    hand.direction = Vector::new(t.sin() * 0.2, 0.0, -1.0).normalize();
    hand.palm_normal = Vector::new(0.0, -1.0, 0.0);
    hand.sphere_center = hand.palm_position + Vector::new(0.0, 15.0, 0.0);
    hand.sphere_radius = 55.0;
    let (palm, direction) = (hand.palm_position, hand.direction);
    hand.fingers = (0..5)
        .map(|i| Finger {
            id: id * 10 + i,
            tip_position: palm + Vector::new(i as f32 * 18.0 - 36.0, 10.0, -70.0),
            direction,
            width: 17.0,
            length: 55.0,
            valid: true,
            ..Finger::invalid()
        })
        .collect();
    hand
}

fn synthetic_frame(id: i64) -> Frame {
    let t = id as f32 / 20.0;
    let mut frame = Frame::new(id, id * 8_333)
        .with_hand(synthetic_hand(1, Handedness::Right, t))
        .with_hand(synthetic_hand(2, Handedness::Left, t));
    frame.fps = 120.0;
    frame
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (mut sink, mut rx) = ChannelSink::with_default_capacity();
    let consumer = tokio::spawn(async move {
        let mut frames = 0usize;
        while let Some(event) = rx.recv().await {
            let Event::Record { channel, record } = event else {
                continue;
            };
            if channel == Channel::Tracking {
                tracing::debug!("{} {:?}", record.selector(), record.atoms());
            } else if record.selector() == selectors::FRAME {
                frames += 1;
                tracing::info!("frame {:?}", record.atoms());
            }
        }
        frames
    });

    let mut bridge = BridgeBuilder::new(RecordedSource::new())
        .unique(true)
        .allframes(true)
        .motion_tracking(true)
        .images(false)
        .build();

    let mut next_id = 1;
    let mut tick = tokio::time::interval(Duration::from_millis(16));
    for _ in 0..TICKS {
        tick.tick().await;
        for _ in 0..FRAMES_PER_TICK {
            bridge.source_mut().push(synthetic_frame(next_id));
            next_id += 1;
        }
        let outcome = bridge.poll(&mut sink)?;
        tracing::debug!("poll: {:?}", outcome);
    }

    drop(sink);
    let frames = consumer.await?;
    tracing::info!("Consumed {} frames", frames);

    Ok(())
}
