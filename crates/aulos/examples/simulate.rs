//! Replay a synthetic bandwidth trace through a session.
//!
//! ```
//! RUST_LOG=aulos_abr=debug cargo run -p aulos --example simulate [STRATEGY]
//! ```

use std::{collections::VecDeque, env::args, error::Error, sync::Arc};

use aulos::prelude::*;
use aulos_core::ManualClock;
use tracing::{info, metadata::LevelFilter};
use tracing_subscriber::EnvFilter;

const SEGMENT_US: i64 = 2_000_000;

/// Link capacity in bits per second for each downloaded segment.
const TRACE_BPS: [u64; 16] = [
    3_000_000, 3_000_000, 4_500_000, 6_000_000, 8_000_000, 8_000_000, 7_500_000, 2_000_000,
    1_200_000, 1_000_000, 2_500_000, 5_000_000, 9_000_000, 9_000_000, 9_000_000, 6_000_000,
];

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("aulos_bandwidth=info".parse()?)
                .add_directive(LevelFilter::INFO.into()),
        )
        .with_line_number(false)
        .with_file(false)
        .init();

    let strategy = match args().nth(1).as_deref() {
        Some("qoe") => StrategyKind::Qoe,
        Some("adaptive_penalty") => StrategyKind::AdaptivePenalty,
        _ => StrategyKind::Throughput,
    };

    let clock = Arc::new(ManualClock::new(0));
    let config = AulosConfig::new()
        .with_strategy(strategy)
        .with_events_capacity(256);
    let session = AbrSession::with_clock(config, None, clock.clone())?;
    let mut events = session.subscribe();

    let catalog = RepresentationCatalog::new(vec![
        Representation::new(400_000).with_resolution(426, 240),
        Representation::new(800_000).with_resolution(640, 360),
        Representation::new(1_400_000).with_resolution(854, 480),
        Representation::new(2_800_000).with_resolution(1280, 720),
        Representation::new(5_000_000).with_resolution(1920, 1080),
    ])?;
    let mut selection = session.create_selection(catalog.clone())?;
    let mut tracker = PlaybackQualityTracker::new(clock.clone() as Arc<dyn Clock>);
    let listener = session.transfer_listener();

    let mut queue: VecDeque<BufferedSegment> = VecDeque::new();
    let mut position_us = 0_i64;
    let mut next_start_us = 0_i64;

    info!(?strategy, "starting simulation");
    for (n, link_bps) in TRACE_BPS.into_iter().enumerate() {
        let buffered_us = next_start_us - position_us;
        let index = selection.update_selected_track(position_us, buffered_us, None);
        let repr = &catalog[index];

        let bytes = u64::from(repr.bitrate) * 2 / 8;
        let elapsed_ms = i64::try_from(bytes * 8 * 1_000 / link_bps)?;

        listener.on_transfer_start();
        listener.on_bytes_transferred(bytes);
        clock.advance(elapsed_ms);
        listener.on_transfer_end()?;

        // Playback consumes the buffer while the segment downloads.
        let download_us = elapsed_ms * 1_000;
        if download_us > buffered_us {
            tracker.on_player_state_changed(PlayerState::Buffering);
            tracker.on_player_state_changed(PlayerState::Ready);
            position_us = next_start_us;
        } else {
            position_us += download_us;
        }
        while queue.front().is_some_and(|s| s.start_us + SEGMENT_US <= position_us) {
            queue.pop_front();
        }

        queue.push_back(BufferedSegment::new(next_start_us, repr));
        tracker.on_segment_loaded(
            SegmentRecord::new(repr, next_start_us / 1_000, (next_start_us + SEGMENT_US) / 1_000)
                .with_load(elapsed_ms, bytes),
        );
        next_start_us += SEGMENT_US;

        let segments: Vec<BufferedSegment> = queue.iter().copied().collect();
        let retained = selection.evaluate_eviction_count(position_us, &segments);
        queue.truncate(retained);
        next_start_us = queue.back().map_or(next_start_us, |s| s.start_us + SEGMENT_US);

        info!(
            segment = n,
            link_bps,
            index,
            bitrate = repr.bitrate,
            estimate = session.bitrate_estimate(),
            buffered_ms = (next_start_us - position_us) / 1_000,
            "segment loaded"
        );
    }

    if let Some(rx) = events.as_mut() {
        let mut switches = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, Event::Abr(AbrEvent::SelectionChanged { .. })) {
                switches += 1;
            }
        }
        info!(switches, "selection changes observed on the bus");
    }

    println!("{}", tracker.to_json()?);
    Ok(())
}
