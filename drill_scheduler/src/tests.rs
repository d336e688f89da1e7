use super::*;
use drill_schema::{BarNote, Difficulty, MusicalBar, TimeSignature};

fn plain_bar(positions: &[u32]) -> MusicalBar {
    MusicalBar {
        notes: positions.iter().copied().map(BarNote::Plain).collect(),
    }
}

fn drill(bpm: f64, resolution: u32, bars: Vec<MusicalBar>, duration_bars: u32) -> Drill {
    Drill {
        id: "test".to_string(),
        name: "Test".to_string(),
        difficulty: Some(Difficulty::Easy),
        bpm,
        od: 8.0,
        duration_bars,
        time_sig: TimeSignature {
            beats_per_bar: 4,
            beat_unit: 4,
        },
        resolution,
        bars,
    }
}

fn times(schedule: &Schedule) -> Vec<f64> {
    schedule.instants.iter().map(|i| i.time_ms).collect()
}

#[test]
fn quarter_notes_at_120_bpm_over_two_bars() {
    let d = drill(120.0, 4, vec![plain_bar(&[0, 4, 8, 12])], 2);
    let s = schedule(&d, 1000.0);

    assert!(s.issues.is_empty());
    assert_eq!(
        times(&s),
        vec![1000.0, 1500.0, 2000.0, 2500.0, 3000.0, 3500.0, 4000.0, 4500.0]
    );
    let t = s.time_map.unwrap();
    assert_eq!(t.beat_ms, 500.0);
    assert_eq!(t.cell_ms, 125.0);
    assert_eq!(t.bar_ms, 2000.0);
    assert_eq!(t.slots_per_bar, 16);
}

#[test]
fn instants_carry_index_bar_and_position() {
    let d = drill(120.0, 4, vec![plain_bar(&[0, 2])], 2);
    let s = schedule(&d, 0.0);

    let idx: Vec<_> = s.instants.iter().map(|i| (i.index, i.bar_index, i.position)).collect();
    assert_eq!(idx, vec![(0, 0, 0), (1, 0, 2), (2, 1, 0), (3, 1, 2)]);
}

#[test]
fn templates_cycle_by_modulo() {
    let d = drill(
        120.0,
        4,
        vec![plain_bar(&[0]), plain_bar(&[0, 8])],
        3,
    );
    let s = schedule(&d, 0.0);

    // bar 0 -> template 0, bar 1 -> template 1, bar 2 -> template 0
    assert_eq!(times(&s), vec![0.0, 2000.0, 3000.0, 4000.0]);
}

#[test]
fn out_of_range_positions_are_skipped_with_issue() {
    let d = drill(120.0, 4, vec![plain_bar(&[0, 15, 16, 40])], 1);
    let s = schedule(&d, 0.0);

    assert_eq!(times(&s), vec![0.0, 1875.0]);
    assert_eq!(s.issues.len(), 2);
    assert!(s.issues.iter().all(|i| i.code == "E4001"));
    assert_eq!(s.issues[0].position, Some(16));
    assert_eq!(s.issues[0].template, Some(0));
    assert_eq!(s.issues[0].note_index, Some(2));
    assert_eq!(s.issues[0].kind, IssueKind::Validation);
}

#[test]
fn non_ascending_and_duplicate_positions_are_skipped() {
    let d = drill(120.0, 4, vec![plain_bar(&[0, 4, 4, 2, 8])], 1);
    let s = schedule(&d, 0.0);

    assert_eq!(times(&s), vec![0.0, 500.0, 1000.0]);
    let codes: Vec<_> = s.issues.iter().map(|i| i.code).collect();
    assert_eq!(codes, vec!["E4002", "E4002"]);
}

#[test]
fn emitted_count_equals_valid_references_and_is_non_decreasing() {
    let bars = vec![
        plain_bar(&[0, 1, 2, 3, 4]),
        plain_bar(&[0, 3, 99, 6, 9, 12, 15]),
        plain_bar(&[]),
    ];
    let d = drill(173.0, 4, bars, 11);
    let s = schedule(&d, 250.0);

    // valid per template: 5, 6 (99 dropped), 0
    let valid = [5usize, 6, 0];
    let expected: usize = (0..11).map(|b| valid[b % 3]).sum();
    assert_eq!(s.len(), expected);

    for pair in s.instants.windows(2) {
        assert!(pair[1].time_ms >= pair[0].time_ms);
    }
    for (i, instant) in s.instants.iter().enumerate() {
        assert_eq!(instant.index, i);
    }
}

#[test]
fn tagged_notes_keep_required_channel() {
    let bar = MusicalBar {
        notes: vec![
            BarNote::Tagged {
                position: 0,
                channel: Channel::Left,
            },
            BarNote::Plain(4),
            BarNote::Tagged {
                position: 8,
                channel: Channel::Right,
            },
        ],
    };
    let s = schedule(&drill(120.0, 4, vec![bar], 1), 0.0);

    let channels: Vec<_> = s.instants.iter().map(|i| i.channel).collect();
    assert_eq!(channels, vec![Some(Channel::Left), None, Some(Channel::Right)]);
}

#[test]
fn non_positive_bpm_yields_empty_schedule_with_time_map_issue() {
    for bpm in [0.0, -60.0, f64::NAN, f64::INFINITY] {
        let s = schedule(&drill(bpm, 4, vec![plain_bar(&[0])], 4), 0.0);
        assert!(s.is_empty());
        assert!(s.time_map.is_none());
        assert_eq!(s.issues.len(), 1);
        assert_eq!(s.issues[0].code, "E3003");
        assert!(s.issues[0].is_fatal_for_schedule());
    }
}

#[test]
fn zero_resolution_and_zero_meter_are_rejected() {
    let s = schedule(&drill(120.0, 0, vec![plain_bar(&[0])], 4), 0.0);
    assert!(s.is_empty());
    assert_eq!(s.issues[0].code, "E3004");

    let mut d = drill(120.0, 4, vec![plain_bar(&[0])], 4);
    d.time_sig.beats_per_bar = 0;
    let s = schedule(&d, 0.0);
    assert!(s.is_empty());
    assert_eq!(s.issues[0].code, "E3006");
}

#[test]
fn drill_without_bars_schedules_nothing() {
    let s = schedule(&drill(120.0, 4, vec![], 8), 0.0);
    assert!(s.is_empty());
    assert!(s.time_map.is_some());
    assert_eq!(s.issues[0].code, "E4003");
}

#[test]
fn issue_display_includes_code() {
    let s = schedule(&drill(120.0, 4, vec![plain_bar(&[20])], 1), 0.0);
    assert_eq!(
        s.issues[0].to_string(),
        "E4001: grid position out of range (position=20, slots=16)"
    );
}

#[test]
fn summary_matches_drill_shape() {
    let d = drill(160.0, 4, vec![plain_bar(&[0, 1, 2, 3, 4])], 12);
    let summary = summarize(&d);

    assert_eq!(summary.focus, Focus::Burst);
    assert_eq!(summary.notes_per_bar, 5);
    assert_eq!(summary.subdivision, "16th Notes");
    assert_eq!(summary.time_sig, "4/4");
    assert!((summary.total_duration_sec - 18.0).abs() < 1e-9);
    assert_eq!(summary.duration, "12 bars, 18s");

    assert_eq!(Focus::from_notes_per_bar(9), Focus::Endurance);
    assert_eq!(Focus::from_notes_per_bar(7), Focus::Control);
}

#[test]
fn schedule_json_shape_is_stable() {
    let s = schedule(&drill(120.0, 4, vec![plain_bar(&[0])], 1), 0.0);
    let json = serde_json::to_value(s.instants[0]).unwrap();
    assert_eq!(json["index"], 0);
    assert_eq!(json["time_ms"], 0.0);
    assert!(json["channel"].is_null());
}

#[test]
fn zero_duration_drill_reports_issue() {
    let s = schedule(&drill(120.0, 4, vec![plain_bar(&[0, 4])], 0), 0.0);
    assert!(s.is_empty());
    assert_eq!(s.issues.len(), 1);
    assert_eq!(s.issues[0].code, "E4004");
    assert_eq!(s.issues[0].kind, IssueKind::Validation);
    assert!(!s.issues[0].is_fatal_for_schedule());
}

#[test]
fn issue_kind_follows_code_family() {
    assert_eq!(IssueKind::from_code("E3003"), IssueKind::TimeMap);
    assert_eq!(IssueKind::from_code("E3007"), IssueKind::TimeMap);
    assert_eq!(IssueKind::from_code("E4004"), IssueKind::Validation);
    assert_eq!(IssueKind::from_code("E9999"), IssueKind::Validation);
}

#[test]
fn schedule_span_and_total_length() {
    let d = drill(120.0, 4, vec![plain_bar(&[0, 4, 8, 12])], 2);
    let s = schedule(&d, 1000.0);

    assert_eq!(s.first_time_ms(), Some(1000.0));
    assert_eq!(s.last_time_ms(), Some(4500.0));
    assert_eq!(s.time_map.map(|t| t.total_ms(d.duration_bars)), Some(4000.0));

    let empty = schedule(&drill(120.0, 4, vec![], 2), 0.0);
    assert_eq!(empty.first_time_ms(), None);
    assert_eq!(empty.last_time_ms(), None);
}
