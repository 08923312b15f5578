//! Terminal display with in-place line rewriting: a small ring buffer of
//! recent events plus a two-line header/stats area, redrawn in place via
//! ANSI cursor-home and clear-line escapes.

const MAX_EVENTS: usize = 10;

pub struct Display {
    events: [String; MAX_EVENTS],
    head: usize,
    count: usize,
}

impl Display {
    pub fn new() -> Self {
        Self {
            events: Default::default(),
            head: 0,
            count: 0,
        }
    }

    /// Appends an event, overwriting the oldest once the ring is full.
    pub fn add_event(&mut self, event: impl Into<String>) {
        self.events[self.head] = event.into();
        self.head = (self.head + 1) % MAX_EVENTS;
        if self.count < MAX_EVENTS {
            self.count += 1;
        }
    }

    /// Redraws the header, stats line, and recent-events ring in place.
    pub fn render(&self, header: &str, stats: &str) {
        print!("\x1b[H");

        let line = |text: &str| println!("\x1b[2K{text}");

        line(header);
        line(stats);
        line("");
        line("Recent:");

        let start = (self.head + MAX_EVENTS - self.count) % MAX_EVENTS;
        for i in 0..MAX_EVENTS {
            if i < self.count {
                line(&format!("  {}", self.events[(start + i) % MAX_EVENTS]));
            } else {
                line("");
            }
        }

        use std::io::Write;
        let _ = std::io::stdout().flush();
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}
