use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

/// Counters shown in the `--debug` strip.
#[derive(Debug, Default)]
pub struct DebugState {
    pub num_events: usize,
    pub num_frames: usize,
    pub num_key_events: usize,
    pub last_key_event_name: String,
    pub last_type_name: String,
    /// Last event handled, e.g. "sort_finished"
    pub last_action: String,
    pub requests_sent: usize,
    pub responses_discarded: usize,
    pub enabled: bool,
}

impl DebugState {
    pub fn on_key(&mut self, event: &crossterm::event::KeyEvent) {
        self.num_key_events += 1;
        self.last_key_event_name = format!("{:?}", event.code);
        self.last_type_name = format!("{:?}", event.kind);
    }

    pub fn line(&self, in_flight: usize) -> String {
        format!(
            "events={} keys={} last_key={} kind={} last_action={} frames={} requests={} in_flight={} stale={}",
            self.num_events,
            self.num_key_events,
            self.last_key_event_name,
            self.last_type_name,
            self.last_action,
            self.num_frames,
            self.requests_sent,
            in_flight,
            self.responses_discarded
        )
    }
}

/// Debug strip for one frame; `in_flight` comes from the request runner.
pub struct DebugLine<'a> {
    pub state: &'a DebugState,
    pub in_flight: usize,
}

impl Widget for DebugLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.state.line(self.in_flight)).render(area, buf);
    }
}
