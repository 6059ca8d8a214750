//! Small pure rules behind the landing page's scroll, menu, carousel, opening
//! hours, theme and newsletter widgets. The DOM wiring lives in `wasm::page`.

/// Fraction of the document scrolled, in `[0, 1]`.
pub fn scroll_progress(scroll_top: f64, scrollable_height: f64) -> f64 {
    if scrollable_height <= 0.0 || !scrollable_height.is_finite() {
        return 0.0;
    }
    (scroll_top / scrollable_height).clamp(0.0, 1.0)
}

pub fn is_scrolled(scroll_y: f64) -> bool {
    scroll_y > 4.0
}

pub fn back_to_top_visible(scroll_y: f64) -> bool {
    scroll_y > 400.0
}

/// Vertical translation of the hero background.
pub fn parallax_offset(scroll_y: f64) -> f64 {
    scroll_y * 0.3
}

/// Hero blur radius in px, capped at 2.
pub fn hero_blur(scroll_y: f64) -> f64 {
    (scroll_y / 200.0).clamp(0.0, 2.0)
}

pub fn menu_filter_matches(filter: &str, category: Option<&str>) -> bool {
    filter == "all" || category == Some(filter)
}

/// Auto-scrolling strip that ping-pongs between its two ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carousel {
    /// Pixels moved per frame.
    pub speed: f64,
    forward: bool,
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new(0.4)
    }
}

impl Carousel {
    /// Slack kept at the far end so sub-pixel scroll positions still turn.
    const END_SLACK: f64 = 2.0;

    pub fn new(speed: f64) -> Self {
        Self {
            speed,
            forward: true,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    /// Next scroll offset, clamped to the scrollable range
    /// `0..=scroll_width - client_width`. Direction flips once an end is
    /// reached.
    pub fn advance(&mut self, scroll_left: f64, scroll_width: f64, client_width: f64) -> f64 {
        let range = (scroll_width - client_width).max(0.0);
        let next = if self.forward {
            scroll_left + self.speed
        } else {
            scroll_left - self.speed
        };
        if next <= 0.0 {
            self.forward = true;
        }
        if next >= range - Self::END_SLACK {
            self.forward = false;
        }
        next.clamp(0.0, range)
    }
}

/// Daily opening window in minutes after midnight, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    pub open: u32,
    pub close: u32,
}

impl Default for OpeningHours {
    fn default() -> Self {
        Self {
            open: 10 * 60 + 30,
            close: 22 * 60 + 30,
        }
    }
}

impl OpeningHours {
    pub fn is_open(&self, hour: u32, minute: u32) -> bool {
        let now = hour * 60 + minute;
        (self.open..=self.close).contains(&now)
    }

    pub fn status_label(&self, hour: u32, minute: u32) -> &'static str {
        if self.is_open(hour, minute) {
            "Open now"
        } else {
            "Closed"
        }
    }
}

/// Key under which the theme preference is stored.
pub const THEME_STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Auto,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "dark" => Some(Theme::Dark),
            "auto" => Some(Theme::Auto),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }

    /// Saved preference wins; otherwise dark from 19:00 to 07:00.
    pub fn initial(saved: Option<&str>, hour: u32) -> Theme {
        if let Some(theme) = saved.and_then(Theme::parse) {
            return theme;
        }
        if hour >= 19 || hour < 7 {
            Theme::Dark
        } else {
            Theme::Auto
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Auto,
            Theme::Auto => Theme::Dark,
        }
    }

    /// Font Awesome icon offered for switching away from this theme.
    pub fn icon_class(self) -> &'static str {
        match self {
            Theme::Dark => "fas fa-sun",
            Theme::Auto => "fas fa-moon",
        }
    }
}

/// Length of the count-up on a stat once it scrolls into view.
pub const COUNTER_DURATION_MS: f64 = 1400.0;

/// Value shown `elapsed_ms` into the count-up towards `target`.
pub fn counter_value(elapsed_ms: f64, target: u64) -> u64 {
    let progress = if elapsed_ms.is_nan() {
        0.0
    } else {
        (elapsed_ms / COUNTER_DURATION_MS).clamp(0.0, 1.0)
    };
    if progress >= 1.0 {
        return target;
    }
    (progress * target as f64).floor() as u64
}

/// `12345` as `12,345`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Loose shape check: something, `@`, something, `.`, something, all on
/// one line.
pub fn is_valid_email(input: &str) -> bool {
    input
        .trim()
        .split(|c: char| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'))
        .any(line_has_email_shape)
}

fn line_has_email_shape(line: &str) -> bool {
    // Earliest `@` with a non-empty local part leaves the longest domain.
    let Some(at) = line.char_indices().skip(1).find(|&(_, c)| c == '@').map(|(i, _)| i) else {
        return false;
    };
    let domain = &line[at + 1..];
    domain
        .char_indices()
        .skip(1)
        .any(|(i, c)| c == '.' && i + 1 < domain.len())
}

pub fn newsletter_message(ok: bool) -> (&'static str, &'static str) {
    if ok {
        ("Thanks for subscribing! 🎉", "lightgreen")
    } else {
        ("Please enter a valid email.", "salmon")
    }
}
