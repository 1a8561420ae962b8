use std::time::Duration;

use log::debug;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use tokio::sync::watch;

use crate::quiz::coordinator::{CoordinatorState, Phase};

/// Percent gained per 200 ms while waiting.
const RATE_PER_200_MS: f32 = 0.35;
const CEILING: f32 = 98.0;

/// Cosmetic progress shown while the report is being written. It creeps
/// toward 98 % and only reaches 100 % once the report is there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakeProgress {
    value: f32,
}

impl FakeProgress {
    pub fn new() -> Self {
        Self { value: 0.0 }
    }

    pub fn advance(&mut self, elapsed: Duration) {
        let gained = RATE_PER_200_MS * elapsed.as_millis() as f32 / 200.0;
        self.value = (self.value + gained).min(CEILING);
    }

    pub fn finish(&mut self) {
        self.value = 100.0;
    }

    pub fn percent(&self) -> u32 {
        self.value.floor() as u32
    }
}

impl Default for FakeProgress {
    fn default() -> Self {
        Self::new()
    }
}

pub fn progress_text(percent: u32) -> String {
    format!("🔍 AI 正在分析你的作答… {}%", percent)
}

/// Edits the progress message every `tick` until run `generation` settles,
/// then shows 100 %. Stops silently if the run is reset meanwhile.
pub async fn run_ticker(
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
    mut state: watch::Receiver<CoordinatorState>,
    generation: u64,
    tick: Duration,
) {
    let mut progress = FakeProgress::new();
    let mut shown = progress.percent();
    let mut interval = tokio::time::interval(tick);
    interval.tick().await;

    loop {
        let (current, settled) = {
            let snapshot = state.borrow_and_update();
            (snapshot.generation, matches!(snapshot.phase, Phase::Settled(_)))
        };
        if current != generation {
            debug!("Run restarted in chat {}, dropping progress", chat_id.0);
            return;
        }
        if settled {
            break;
        }
        tokio::select! {
            _ = interval.tick() => {
                progress.advance(tick);
                if progress.percent() != shown {
                    shown = progress.percent();
                    // Progress is decoration; a failed edit is not worth reporting.
                    let _ = bot
                        .edit_message_text(chat_id, message_id, progress_text(shown))
                        .await;
                }
            }
            changed = state.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }

    progress.finish();
    let _ = bot
        .edit_message_text(chat_id, message_id, progress_text(progress.percent()))
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creeps_at_a_fixed_rate() {
        let mut progress = FakeProgress::new();
        progress.advance(Duration::from_secs(10));
        assert_eq!(progress.percent(), 17);
    }

    #[test]
    fn never_passes_the_ceiling_while_waiting() {
        let mut progress = FakeProgress::new();
        progress.advance(Duration::from_secs(3600));
        assert_eq!(progress.percent(), 98);
        progress.advance(Duration::from_secs(1));
        assert_eq!(progress.percent(), 98);
    }

    #[test]
    fn finish_snaps_to_full() {
        let mut progress = FakeProgress::new();
        progress.advance(Duration::from_millis(200));
        progress.finish();
        assert_eq!(progress.percent(), 100);
        assert_eq!(progress_text(100), "🔍 AI 正在分析你的作答… 100%");
    }
}
