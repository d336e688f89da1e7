use anyhow::{bail, Context};
use drill_schema::{Channel, Drill, Millis};
use taplab_core::config::TrainerConfig;
use taplab_core::gameplay::{TapOutcome, TickReport};
use taplab_core::input::events::key_to_channel;
use taplab_core::time::{Clock, ManualClock};
use taplab_core::Session;

const FRAME_MS: Millis = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedTap {
    /// Relative to session start.
    pub at_ms: Millis,
    pub channel: Channel,
}

/// One `<ms> <key>` pair per line. Blank lines and `#` comments are skipped.
pub fn parse_script(text: &str) -> anyhow::Result<Vec<ScriptedTap>> {
    let mut taps: Vec<ScriptedTap> = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let (Some(at), Some(key), None) = (parts.next(), parts.next(), parts.next()) else {
            bail!("expected `<ms> <key>` (line {})", line_no + 1);
        };
        let at_ms: Millis = at
            .parse()
            .with_context(|| format!("bad timestamp {at:?} (line {})", line_no + 1))?;
        if !at_ms.is_finite() {
            bail!("bad timestamp {at:?} (line {})", line_no + 1);
        }
        let Some(channel) = key_to_channel(key) else {
            bail!("unknown key {key:?} (line {})", line_no + 1);
        };
        if let Some(prev) = taps.last() {
            if at_ms < prev.at_ms {
                bail!("timestamps must not go backwards (line {})", line_no + 1);
            }
        }

        taps.push(ScriptedTap { at_ms, channel });
    }

    Ok(taps)
}

/// Plays `taps` against `drill` on a manual clock, one millisecond per frame,
/// and prints every judgment followed by the session record.
pub fn run_replay(
    drill: &Drill,
    taps: &[ScriptedTap],
    config: &TrainerConfig,
    user: &str,
) -> anyhow::Result<()> {
    let clock = ManualClock::new(0.0);
    let mut session = Session::start(drill, 0.0, config);
    for issue in session.schedule_issues() {
        eprintln!("warning: {issue}");
    }

    println!(" Time(ms) | Event | Detail");
    println!("----------|-------|------------------");

    for tap in taps {
        while session.is_active() && clock.now_ms() + FRAME_MS <= tap.at_ms {
            let now = clock.advance(FRAME_MS);
            print_misses(&session.tick(now));
        }
        if !session.is_active() {
            break;
        }

        clock.set(tap.at_ms);
        print_misses(&session.tick(tap.at_ms));
        let outcome = session.press(tap.channel, &clock);
        print_tap(tap, &outcome);
    }

    while session.is_active() {
        let now = clock.advance(FRAME_MS);
        print_misses(&session.tick(now));
    }

    let outcome = session.finish(user);
    println!();
    println!("status: {:?}", outcome.status);
    println!(
        "accuracy: {:.2}% ({})",
        outcome.record.accuracy() * 100.0,
        outcome.record.letter_grade().as_str()
    );
    let json = serde_json::to_string_pretty(&outcome.record).context("failed to serialize record")?;
    println!("{json}");
    Ok(())
}

fn print_misses(report: &TickReport) {
    for missed in &report.missed {
        println!(
            "{:9.1} | MISS  | #{} ({:.1}ms late)",
            missed.time_ms + missed.late_by_ms,
            missed.instant_index,
            missed.late_by_ms
        );
    }
}

fn print_tap(tap: &ScriptedTap, outcome: &TapOutcome) {
    match outcome {
        TapOutcome::Hit(j) => println!(
            "{:9.1} | HIT   | #{} {:?} {:+.1}ms {}",
            tap.at_ms,
            j.instant_index,
            j.grade,
            j.offset_ms,
            j.channel.as_str()
        ),
        TapOutcome::OutOfWindow {
            instant_index,
            offset_ms,
        } => println!(
            "{:9.1} | OUT   | #{} {:+.1}ms",
            tap.at_ms, instant_index, offset_ms
        ),
        TapOutcome::ChannelMismatch {
            instant_index,
            expected,
            got,
        } => println!(
            "{:9.1} | WRONG | #{} wants {} got {}",
            tap.at_ms,
            instant_index,
            expected.as_str(),
            got.as_str()
        ),
        TapOutcome::Ignored => println!("{:9.1} | ---   | no note pending", tap.at_ms),
    }
}
