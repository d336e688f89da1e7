use taplab_core::gameplay::{Grade, Judgment};
use taplab_core::session::recorder::SessionRecorder;
use taplab_core::Channel;

fn judgment(index: usize, offset_ms: f64, grade: Grade, timestamp_ms: f64) -> Judgment {
    Judgment {
        instant_index: index,
        grade,
        offset_ms,
        channel: if index % 2 == 0 { Channel::Left } else { Channel::Right },
        timestamp_ms,
    }
}

#[test]
fn test_log_is_append_only_and_indexed() {
    let mut recorder = SessionRecorder::default();

    let first = recorder.record_hit(&judgment(3, -4.0, Grade::Perfect, 996.0));
    let second = recorder.record_hit(&judgment(4, 12.0, Grade::Perfect, 1262.0));

    assert_eq!(first.index, 0);
    assert_eq!(second.index, 1);
    assert_eq!(recorder.log(), &[first, second]);
    assert_eq!(second.channel, Channel::Left);
}

#[test]
fn test_unstable_rate_is_ten_times_sample_stddev() {
    let mut recorder = SessionRecorder::default();
    for (i, offset) in [10.0, -10.0, 10.0, -10.0].into_iter().enumerate() {
        recorder.record_hit(&judgment(i, offset, Grade::Perfect, i as f64 * 100.0));
    }

    // sample variance = 400 / 3
    let expected_std = (400.0f64 / 3.0).sqrt();
    assert!(recorder.mean_offset_ms().abs() < 1e-9);
    assert!((recorder.std_dev_ms() - expected_std).abs() < 1e-9);
    assert!((recorder.unstable_rate() - expected_std * 10.0).abs() < 1e-9);
}

#[test]
fn test_single_tap_has_zero_spread() {
    let mut recorder = SessionRecorder::default();
    recorder.record_hit(&judgment(0, 25.0, Grade::Good, 0.0));

    assert_eq!(recorder.mean_offset_ms(), 25.0);
    assert_eq!(recorder.std_dev_ms(), 0.0);
    assert_eq!(recorder.unstable_rate(), 0.0);
}

#[test]
fn test_recent_window_drops_oldest() {
    let mut recorder = SessionRecorder::new(3);
    for i in 0..5 {
        recorder.record_hit(&judgment(i, i as f64, Grade::Perfect, i as f64 * 100.0));
    }

    let recent: Vec<_> = recorder.recent_offsets().collect();
    assert_eq!(recent, vec![2.0, 3.0, 4.0]);
    // The log itself keeps everything.
    assert_eq!(recorder.log().len(), 5);
}

#[test]
fn test_misses_only_touch_the_tally() {
    let mut recorder = SessionRecorder::default();
    recorder.record_hit(&judgment(0, 5.0, Grade::Perfect, 100.0));
    recorder.record_hit(&judgment(1, -45.0, Grade::Good, 400.0));
    recorder.record_hit(&judgment(2, 90.0, Grade::Meh, 800.0));
    let before = recorder.std_dev_ms();

    recorder.record_miss();
    recorder.record_miss();

    let tally = recorder.tally();
    assert_eq!(tally.hit300, 1);
    assert_eq!(tally.hit100, 1);
    assert_eq!(tally.hit50, 1);
    assert_eq!(tally.miss, 2);
    assert_eq!(recorder.miss_count(), 2);
    assert_eq!(recorder.log().len(), 3);
    assert_eq!(recorder.std_dev_ms(), before);
}

#[test]
fn test_live_snapshot() {
    let mut recorder = SessionRecorder::default();
    assert_eq!(recorder.live().last_offset_ms, None);

    recorder.record_hit(&judgment(0, 4.0, Grade::Perfect, 1000.0));
    recorder.record_hit(&judgment(1, -2.0, Grade::Perfect, 1250.0));
    recorder.record_hit(&judgment(2, 6.0, Grade::Perfect, 1500.0));
    recorder.record_miss();

    let live = recorder.live();
    assert_eq!(live.tap_count, 3);
    assert_eq!(live.miss_count, 1);
    assert_eq!(live.last_offset_ms, Some(6.0));
    assert_eq!(live.recent_offsets_ms, vec![4.0, -2.0, 6.0]);
    // Perfectly even taps.
    assert_eq!(live.interval_std_dev_ms, 0.0);
    assert!((live.mean_offset_ms - 8.0 / 3.0).abs() < 1e-9);
}
