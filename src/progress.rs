use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

#[derive(Debug, Clone)]
pub struct ProgressConfig {
    pub enabled: bool,
    pub force_enabled: bool,
    pub is_interactive: bool,
    pub min_entries_threshold: usize,
}

impl ProgressConfig {
    pub fn new(min_entries_threshold: usize) -> Self {
        Self {
            enabled: true,
            force_enabled: false,
            is_interactive: std::io::stderr().is_terminal(),
            min_entries_threshold,
        }
    }

    pub fn auto_detect(min_entries_threshold: usize) -> Self {
        // Disable in CI environments
        if is_ci_environment() {
            Self {
                enabled: false,
                is_interactive: false,
                ..Self::new(min_entries_threshold)
            }
        } else {
            Self::new(min_entries_threshold)
        }
    }

    pub fn should_show_progress(&self, entry_count: usize) -> bool {
        if !self.enabled || !self.is_interactive {
            return false;
        }

        self.force_enabled || entry_count > self.min_entries_threshold
    }
}

/// Progress bar over the backup loop
pub struct LoopProgress {
    progress_bar: ProgressBar,
}

impl LoopProgress {
    pub fn new(total: usize) -> Self {
        let progress_bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("[{bar:24.cyan/blue}] {pos}/{len} ({percent}%) • ETA: {eta} • {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ");
        progress_bar.set_style(style);
        Self { progress_bar }
    }

    pub fn update(&mut self, entries_done: usize, current: &str) {
        self.progress_bar.set_position(entries_done as u64);
        self.progress_bar.set_message(truncate_name(current, 30));
    }

    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }

    pub fn finish(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}

pub fn create_progress(config: &ProgressConfig, entry_count: usize) -> Option<LoopProgress> {
    if config.should_show_progress(entry_count) {
        Some(LoopProgress::new(entry_count))
    } else {
        None
    }
}

fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() > max_len {
        let kept: String = name.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}

/// Check if we're running in a CI environment
fn is_ci_environment() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
        || std::env::var("BUILDKITE").is_ok()
}
