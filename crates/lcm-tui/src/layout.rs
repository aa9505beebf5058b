//! Column layout for the container table
//!
//! Row: `[cursor] ID  NAME  IMAGE  OPENPORTS  <gap>  STATE  STATUS`, with the
//! STATE/STATUS pair pinned to the right edge. Widths are recomputed from the
//! visible window on every frame.

use crate::snapshot::ContainerRecord;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ID_WIDTH: usize = 12;
pub const STATE_WIDTH: usize = 8;
pub const COL_SPACING: usize = 2;
pub const CURSOR_COL: usize = 2;

/// Rows used by everything on the list screen except table rows
pub const LIST_OVERHEAD: usize = 16;
pub const MIN_ROWS: usize = 3;
/// Header line plus divider above the first row
pub const TABLE_HEADER_ROWS: usize = 2;

pub const MIN_NAME_WIDTH: usize = 10;
pub const MIN_IMAGE_WIDTH: usize = 10;
pub const MIN_PORTS_WIDTH: usize = 9;

const ELLIPSIS: &str = "...";

/// Width of every column that depends on content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidths {
    pub name: usize,
    pub image: usize,
    pub ports: usize,
    pub status: usize,
}

impl ColumnWidths {
    /// Width of the pinned STATE + STATUS section
    pub fn right_width(&self) -> usize {
        STATE_WIDTH + COL_SPACING + self.status
    }
}

/// How many table rows fit on a terminal `height` rows tall, capped by the
/// `table_height` the table pane was actually given
pub fn row_capacity(height: u16, table_height: u16) -> usize {
    let fits = (table_height as usize).saturating_sub(TABLE_HEADER_ROWS);
    (height as usize)
        .saturating_sub(LIST_OVERHEAD)
        .max(MIN_ROWS)
        .min(fits)
}

/// Visible `[start, end)` window, centered on the cursor and clamped at both ends
pub fn scroll_window(len: usize, cursor: usize, capacity: usize) -> (usize, usize) {
    if len <= capacity {
        return (0, len);
    }
    let start = cursor.saturating_sub(capacity / 2).min(len - capacity);
    (start, start + capacity)
}

/// Ports cell text
pub fn ports_cell(record: &ContainerRecord) -> String {
    record.ports_joined(", ").unwrap_or_else(|| "-".to_string())
}

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cut `text` to `width` columns, ending in `...` when anything was removed
pub fn truncate(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width < ELLIPSIS.len() {
        return ".".repeat(width);
    }

    let budget = width - ELLIPSIS.len();
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}

/// Truncate then left-justify `text` in a column of `width`
pub fn fit(text: &str, width: usize) -> String {
    let mut out = truncate(text, width);
    let pad = width.saturating_sub(display_width(&out));
    out.extend(std::iter::repeat(' ').take(pad));
    out
}

/// Size NAME, IMAGE and OPENPORTS for the visible rows on a `width` wide terminal
pub fn column_widths(rows: &[ContainerRecord], width: usize) -> ColumnWidths {
    let widest = |header: &str, cell: &dyn Fn(&ContainerRecord) -> usize| {
        rows.iter().map(cell).fold(header.len(), usize::max)
    };
    let max_name = widest("NAME", &|r| display_width(&r.name));
    let max_image = widest("IMAGE", &|r| display_width(&r.image));
    let max_ports = widest("OPENPORTS", &|r| display_width(&ports_cell(r)));
    let max_status = widest("STATUS", &|r| display_width(&r.status));

    let fixed = CURSOR_COL + ID_WIDTH + STATE_WIDTH + 6 * COL_SPACING + max_status;
    let available = width.saturating_sub(fixed);
    let total = (max_name + max_image + max_ports).max(1);

    let (name, image, ports) = if available >= total {
        (max_name, max_image, max_ports)
    } else if available >= MIN_NAME_WIDTH + MIN_IMAGE_WIDTH + MIN_PORTS_WIDTH {
        let share = |content: usize, min: usize| (available * content / total).max(min);
        let mut name = share(max_name, MIN_NAME_WIDTH);
        let mut image = share(max_image, MIN_IMAGE_WIDTH);
        let mut ports = share(max_ports, MIN_PORTS_WIDTH);

        while name + image + ports > available {
            if image > MIN_IMAGE_WIDTH {
                image -= 1;
            } else if name > MIN_NAME_WIDTH {
                name -= 1;
            } else if ports > MIN_PORTS_WIDTH {
                ports -= 1;
            } else {
                break;
            }
        }
        (name, image, ports)
    } else {
        (MIN_NAME_WIDTH, MIN_IMAGE_WIDTH, MIN_PORTS_WIDTH)
    };

    // Everything but STATUS, with the gap at its minimum
    let rest = CURSOR_COL + 1 + ID_WIDTH + name + image + ports + STATE_WIDTH + 5 * COL_SPACING;
    let status = (max_status + 2).max(8).min(width.saturating_sub(rest));

    ColumnWidths {
        name,
        image,
        ports,
        status,
    }
}

/// ID, NAME, IMAGE and OPENPORTS cells, each fitted to its column
pub fn left_section(cells: [&str; 4], widths: &ColumnWidths) -> String {
    format!(
        " {}  {}  {}  {}",
        fit(cells[0], ID_WIDTH),
        fit(cells[1], widths.name),
        fit(cells[2], widths.image),
        fit(cells[3], widths.ports)
    )
}

/// Spaces between the left section and the pinned right section (at least 2)
pub fn right_gap(left: &str, widths: &ColumnWidths, width: usize) -> usize {
    width
        .saturating_sub(display_width(left) + widths.right_width() + CURSOR_COL)
        .max(COL_SPACING)
}
