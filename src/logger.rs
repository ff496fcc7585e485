// Logger - Colored console output with timestamps

use chrono::Local;
use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::warmup::WarmupStats;

static VERBOSE: AtomicBool = AtomicBool::new(false);

#[derive(Clone, Copy)]
pub enum Level {
	Info,
	Success,
	Warning,
	Error,
	Debug,
}

pub fn set_verbose(enabled: bool) {
	VERBOSE.store(enabled, Ordering::Relaxed);
}

/// Prints a timestamped, colored log message to stdout.
/// Debug messages are dropped unless verbose mode is on.
pub fn log(level: Level, message: &str) {
	if matches!(level, Level::Debug) && !VERBOSE.load(Ordering::Relaxed) {
		return;
	}
	let time = Local::now().format("%H:%M:%S").to_string().dimmed();
	let icon = match level {
		Level::Info =>    "ℹ".blue().bold(),
		Level::Success => "✔".bright_green().bold(),
		Level::Warning => "⚠".yellow().bold(),
		Level::Error =>   "✘".red().bold(),
		Level::Debug =>   "⚙".bright_blue().bold(),
	};
	println!("[{}] {} {}", time, icon, message);
}

/// Prints a section header with visual separation.
pub fn header(title: &str) {
	println!();
	println!("{}", format!("─── {} ───", title).bright_blue().bold());
}

/// Prints the warmup timing summary.
pub fn summary(stats: &WarmupStats, duration_secs: f32) {
	header("Summary");

	for (model, times) in &stats.timings {
		if times.is_empty() {
			println!("  {} {}", model.yellow(), "no timings (all requests failed)".dimmed());
			continue;
		}
		let mut sorted = times.clone();
		sorted.sort_by(|a, b| a.total_cmp(b));
		let median = sorted[sorted.len() / 2];
		println!(
			"  {} first={:.2}s median={:.2}s calls={}",
			model.bright_blue(),
			times[0],
			median,
			times.len()
		);
	}

	if let Some(dt) = stats.embed_timing {
		println!("  {} {:.2}s", "Embedding:".bright_blue(), dt);
	}
	if stats.errors > 0 {
		println!("  {} {}", "Errors:".red(), stats.errors);
	}
	println!("  {} {:.2}s", "Duration:".bright_blue(), duration_secs);
	println!();
}
