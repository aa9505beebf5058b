//! Overlay geometry helpers

use ratatui::prelude::*;

/// Calculate a centered rectangle within an area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Centered overlay sized as a percentage of `area`, raised to a minimum and
/// then kept 4 cells inside the area on each axis
pub fn overlay_rect(pct_w: u16, pct_h: u16, min_w: u16, min_h: u16, area: Rect) -> Rect {
    let w = ((area.width as u32 * pct_w as u32) / 100) as u16;
    let h = ((area.height as u32 * pct_h as u32) / 100) as u16;
    let w = w.max(min_w).min(area.width.saturating_sub(4));
    let h = h.max(min_h).min(area.height.saturating_sub(4));
    centered_rect(w, h, area)
}
