//! Thin console rendering over the agent's status and messages.

use chrono::Local;
use gnome_agent::{LifetimeStats, StatusSnapshot};
use gnome_core::{Mood, SessionSummary};

fn mood_glyph(mood: Mood) -> &'static str {
    match mood {
        Mood::Normal => "(o_o)",
        Mood::Afraid => "(;_;)",
    }
}

/// One narrated pulse line.
pub fn print_message(message: &str) {
    println!("[{}] {}", Local::now().format("%H:%M:%S"), message);
}

pub fn print_status(status: &StatusSnapshot) {
    println!("── {} (AG-{}) ──", status.name, status.version);
    println!("  state:      {} {}", status.state, mood_glyph(status.mood));
    println!("  energy:     {:.1}", status.energy);
    println!(
        "  pulses:     {} ({} rests)",
        status.pulse_count, status.rest_count
    );
    println!("  light:      {}", status.light_level);
    println!("  mood:       {}", status.mood);
    println!("  mind:       {}", status.mind_state);
    if status.is_observing {
        println!("  observing:  {}", status.observation);
    } else if !status.observation.is_empty() {
        println!("  last seen:  {}", status.observation);
    }
}

pub fn print_stats(stats: &LifetimeStats) {
    println!("── lifetime ──");
    println!("  wakes:        {}", stats.wake_count);
    println!("  pulses:       {}", stats.total_pulses);
    println!("  rests:        {}", stats.total_rests);
    println!("  runtime:      {:.0}s", stats.total_runtime);
    println!("  hibernation:  {:.0}s", stats.total_hibernation_time);
    println!("  this session: {:.0}s", stats.current_session_runtime);
}

pub fn print_summary(summary: &SessionSummary) {
    println!("── session ──");
    println!("  started:  {}", summary.start_time.format("%H:%M:%S"));
    println!("  duration: {:.0}s", summary.duration_secs);
    println!("  records:  {}", summary.total_records);
    let mut counts: Vec<_> = summary.event_counts.iter().collect();
    counts.sort_by_key(|(kind, _)| kind.as_str());
    for (kind, count) in counts {
        println!("    {kind}: {count}");
    }
}

pub fn print_startup(name: &str, version: &str, tick_interval_secs: f64) {
    println!("Starting {name} (AG-{version})...");
    println!("Pulse frequency: {tick_interval_secs} seconds");
    println!("Commands: status, stats, summary, rest, say <text>, light, dark, quit");
    println!("{}", "─".repeat(50));
}
