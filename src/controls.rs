use crate::config::{Settings, MIN_LINK_DISTANCE};

const FILL_PALETTE: [&str; 5] = ["#ffffff", "#64d2ff", "#ff6b6b", "#ffd166", "#06d6a0"];
const BACKGROUND_PALETTE: [&str; 4] = ["#000000", "#101820", "#1b1b2f", "#f4f1de"];

/// One edit from the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    MoreDots,
    FewerDots,
    Faster,
    Slower,
    LongerLinks,
    ShorterLinks,
    BiggerDots,
    SmallerDots,
    ThickerLines,
    ThinnerLines,
    NextColor,
    NextBackground,
    ToggleDynamicAlpha,
    ToggleRefresh,
}

impl Control {
    /// Edits `settings` in place. Values stay positive and the link distance
    /// stays above its floor.
    pub fn apply(self, settings: &mut Settings) {
        match self {
            Control::MoreDots => settings.dot_count += 10,
            Control::FewerDots => settings.dot_count = settings.dot_count.saturating_sub(10).max(1),
            Control::Faster => settings.speed_multiplier += 1.0,
            Control::Slower => settings.speed_multiplier = (settings.speed_multiplier - 1.0).max(1.0),
            Control::LongerLinks => settings.link_distance += 10.0,
            Control::ShorterLinks => {
                settings.link_distance = (settings.link_distance - 10.0).max(MIN_LINK_DISTANCE)
            }
            Control::BiggerDots => settings.point_radius += 1,
            Control::SmallerDots => settings.point_radius = settings.point_radius.saturating_sub(1).max(1),
            Control::ThickerLines => settings.line_width += 1,
            Control::ThinnerLines => settings.line_width = settings.line_width.saturating_sub(1).max(1),
            Control::NextColor => settings.fill_color = cycle(&FILL_PALETTE, &settings.fill_color),
            Control::NextBackground => {
                settings.background_color = cycle(&BACKGROUND_PALETTE, &settings.background_color)
            }
            Control::ToggleDynamicAlpha => settings.dynamic_alpha = !settings.dynamic_alpha,
            Control::ToggleRefresh => settings.refresh_every_frame = !settings.refresh_every_frame,
        }
    }
}

// パレット内の次の色。見つからなければ先頭 / Next palette entry, first one if the current color is not in it
fn cycle(palette: &[&str], current: &str) -> String {
    let next = palette
        .iter()
        .position(|c| c.eq_ignore_ascii_case(current))
        .map_or(0, |i| (i + 1) % palette.len());
    palette[next].to_string()
}
