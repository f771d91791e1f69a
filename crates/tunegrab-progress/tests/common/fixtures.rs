//! Raw tick fixtures.

use tunegrab_core::RawProgressEvent;

/// A `downloading` tick with byte counts.
pub fn downloading(filename: &str, downloaded: u64, total: u64) -> RawProgressEvent {
    RawProgressEvent::with_status("downloading")
        .filename(filename)
        .bytes(downloaded, total)
}

/// A `finished` tick for one file.
pub fn finished(filename: &str) -> RawProgressEvent {
    RawProgressEvent::with_status("finished").filename(filename)
}

/// Assert two percentages agree to two decimals.
#[track_caller]
pub fn assert_percent(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected:.2}, got {actual:.2}"
    );
}
