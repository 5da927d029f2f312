use aulos_core::{Representation, RepresentationCatalog};

/// Catalog with one representation per bitrate, in the given order.
///
/// # Panics
///
/// Panics on an empty slice.
pub fn ladder(bitrates: &[u32]) -> RepresentationCatalog {
    RepresentationCatalog::new(bitrates.iter().copied().map(Representation::new).collect())
        .unwrap()
}

/// Typical 240p..1080p video ladder, ascending bitrate.
pub fn video_ladder() -> RepresentationCatalog {
    RepresentationCatalog::new(vec![
        Representation::new(400_000).with_resolution(426, 240),
        Representation::new(800_000).with_resolution(640, 360),
        Representation::new(1_400_000).with_resolution(854, 480),
        Representation::new(2_800_000).with_resolution(1280, 720),
        Representation::new(5_000_000).with_resolution(1920, 1080),
    ])
    .unwrap()
}

/// Start times of `count` back-to-back segments of `duration_us`, beginning
/// at `first_us`.
pub fn segment_starts(first_us: i64, duration_us: i64, count: usize) -> Vec<i64> {
    (0..count as i64).map(|i| first_us + i * duration_us).collect()
}
