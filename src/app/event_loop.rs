use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::commands::CommandId;
use crate::editor::EditorBuffer;
use crate::idle::{IdleScheduler, MotionCoalescer};
use crate::watch::DocumentWatcher;

/// Window for folding bursts of terminal resize events into one reflow.
const RESIZE_DEBOUNCE_MS: u64 = 100;
/// Window for coalescing pointer-motion activity into a single idle reset.
const MOTION_COALESCE_MS: u64 = 100;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization fails, the file cannot
    /// be read, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let buffer = if self.file_path.exists() {
            let text = std::fs::read_to_string(&self.file_path)
                .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
            EditorBuffer::from_text(&text)
        } else {
            EditorBuffer::empty()
        };

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal — centerline requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(
            self.file_path.clone(),
            buffer,
            (size.width, size.height),
        );
        model.settings = self.settings.clone();
        model.settings_path.clone_from(&self.settings_path);
        model.auto_center_enabled = self.auto_center_enabled;
        model.watch_enabled = self.watch_enabled;

        execute!(stdout(), EnableMouseCapture, EnableFocusChange)?;

        let result = Self::event_loop(&mut terminal, &mut model);

        let _ = execute!(stdout(), DisableFocusChange, DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(RESIZE_DEBOUNCE_MS);
        let mut motion = MotionCoalescer::new(MOTION_COALESCE_MS);
        let mut idle = IdleScheduler::new(
            model.settings.idle_timeout_ms,
            model.auto_center_enabled,
        );
        // The session opens with a full quiet period already counting down.
        idle.reset(0);

        let mut watcher = if model.watch_enabled {
            match Self::make_watcher(&model.file_path) {
                Ok(w) => Some(w),
                Err(err) => {
                    model.watch_enabled = false;
                    model.show_toast(ToastLevel::Warning, format!("Watch unavailable: {err}"));
                    None
                }
            }
        } else {
            None
        };

        let mut needs_render = true;

        loop {
            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            // A settled pointer sweep counts as one activity signal.
            if motion.take_ready(now_ms) {
                idle.reset(now_ms);
            }

            if model.watch_enabled
                && watcher
                    .as_mut()
                    .is_some_and(DocumentWatcher::take_change_ready)
            {
                Self::apply(model, &mut watcher, Message::FileChanged);
                // External document changes qualify as activity too.
                idle.reset(now_ms);
                needs_render = true;
            }

            if idle.take_ready(now_ms) {
                Self::apply(model, &mut watcher, Message::Command(CommandId::CenterCursorLine));
                needs_render = true;
            }

            let poll_ms = Self::poll_timeout_ms(needs_render, &resize_debouncer, &motion, &idle, now_ms);
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh the timestamp after the poll wait so the idle
                // countdown starts from the event, not the poll start.
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if Self::handle_event(
                    event::read()?,
                    model,
                    &mut watcher,
                    &mut idle,
                    &mut motion,
                    &mut resize_debouncer,
                    event_ms,
                ) {
                    needs_render = true;
                }

                // Coalesce event bursts (key repeat, mouse sweeps) into a
                // single render.
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    if Self::handle_event(
                        event::read()?,
                        model,
                        &mut watcher,
                        &mut idle,
                        &mut motion,
                        &mut resize_debouncer,
                        drain_ms,
                    ) {
                        needs_render = true;
                    }
                }
            }

            // Re-sync the scheduler with whatever the messages changed:
            // toggling or reconfiguring applies immediately.
            let sync_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if idle.is_enabled() != model.auto_center_enabled {
                idle.set_enabled(model.auto_center_enabled, sync_ms);
            }
            if idle.timeout_ms() != model.settings.idle_timeout_ms {
                idle.set_timeout(model.settings.idle_timeout_ms, sync_ms);
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }

        idle.cancel();
        Ok(())
    }

    /// Translate one terminal event, feeding the activity signals and
    /// applying any resulting message. Returns true when a render is due.
    fn handle_event(
        ev: Event,
        model: &mut Model,
        watcher: &mut Option<DocumentWatcher>,
        idle: &mut IdleScheduler,
        motion: &mut MotionCoalescer,
        resize_debouncer: &mut ResizeDebouncer,
        now_ms: u64,
    ) -> bool {
        match ev {
            Event::Key(key) => {
                idle.reset(now_ms);
                if let Some(msg) = Self::handle_key(key, model) {
                    Self::apply(model, watcher, msg);
                    return true;
                }
                false
            }
            Event::Mouse(mouse) => {
                if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                    // High-frequency motion goes through the coalescer.
                    motion.observe(now_ms);
                } else {
                    idle.reset(now_ms);
                }
                if let Some(msg) = Self::handle_mouse(mouse, model) {
                    Self::apply(model, watcher, msg);
                    return true;
                }
                false
            }
            Event::FocusGained | Event::FocusLost => {
                idle.reset(now_ms);
                false
            }
            Event::Resize(width, height) => {
                resize_debouncer.queue(width, height, now_ms);
                false
            }
            _ => false,
        }
    }

    fn apply(model: &mut Model, watcher: &mut Option<DocumentWatcher>, msg: Message) {
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(model, watcher, &msg);
    }

    /// Shortest sensible poll timeout given what is pending.
    fn poll_timeout_ms(
        needs_render: bool,
        resize: &ResizeDebouncer,
        motion: &MotionCoalescer,
        idle: &IdleScheduler,
        now_ms: u64,
    ) -> u64 {
        if needs_render {
            return 0;
        }
        let mut poll_ms = 250;
        if resize.is_pending() || motion.is_pending() {
            poll_ms = 10;
        }
        if let Some(remaining) = idle.ms_until_ready(now_ms) {
            poll_ms = poll_ms.min(remaining.max(1));
        }
        poll_ms
    }
}

#[cfg(test)]
mod debounce_tests {
    use super::*;

    #[test]
    fn test_resize_debouncer_waits_out_the_burst() {
        let mut debouncer = ResizeDebouncer::new(100);
        debouncer.queue(100, 40, 0);
        debouncer.queue(110, 42, 60);
        assert_eq!(debouncer.take_ready(120), None);
        assert_eq!(debouncer.take_ready(160), Some((110, 42)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_resize_debouncer_idle_without_events() {
        let mut debouncer = ResizeDebouncer::new(100);
        assert_eq!(debouncer.take_ready(1000), None);
    }
}
