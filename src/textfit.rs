//! Adaptive typography: fits variable-length text into fixed rectangular
//! zones using dynamic font sizing, greedy multi-line wrapping, and
//! ellipsis truncation.
//!
//! Three tiers of the same problem at increasing constraint strictness:
//!
//! - [`shrink_to_fit`]: single line, soft width budget. The size shrinks
//!   until the text fits or the floor is reached, and overflow at the floor
//!   is accepted rather than rejected.
//! - [`wrap_to_width_bounded`]: multiple lines with a hard line cap. The
//!   size shrinks until the wrap fits the cap.
//! - [`ellipsize_block`]: multiple lines with a hard vertical budget at a
//!   fixed size. Surplus lines are cut and the last visible line ends in an
//!   ellipsis.
//!
//! Callers pick a tier per zone: title blocks have a line cap, free-text
//! detail blocks have a vertical-space cap.

use crate::font::FontFace;
use crate::units::Pt;

pub const DEFAULT_SHRINK_STEP: f32 = 0.5;
const MIN_SHRINK_STEP: f32 = 0.25;

const ELLIPSIS: char = '\u{2026}';

/// Returns the largest font size in `[min_font, max_font]` at which `text`
/// fits within `max_width`, probing downwards from `max_font` in `step`
/// decrements (floored at 0.25pt).
///
/// Never fails: if even `min_font` overflows, `min_font` is returned and the
/// caller draws anyway. Long user-entered names overflow visually instead of
/// being rejected.
pub fn shrink_to_fit(
    face: &dyn FontFace,
    text: &str,
    max_width: Pt,
    max_font: Pt,
    min_font: Pt,
    step: f32,
) -> Pt {
    let step = Pt(step.max(MIN_SHRINK_STEP));
    let mut size = max_font;
    while size >= min_font && face.measure(text, size) > max_width {
        size = size - step;
    }
    size.max(min_font)
}

/// Greedy word-wrap of `text` into lines no wider than `max_width`.
///
/// A single word wider than the budget is split at the character level
/// rather than dropped, so every produced line fits except the irreducible
/// case of a single character that is itself too wide. Blank input yields an
/// empty sequence.
pub fn wrap_to_width(face: &dyn FontFace, text: &str, size: Pt, max_width: Pt) -> Vec<String> {
    if max_width <= Pt(0.0) {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let tentative = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if face.measure(&tentative, size) <= max_width {
            current = tentative;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if face.measure(word, size) <= max_width {
            current = word.to_string();
        } else {
            current = break_word(face, word, size, max_width, &mut lines);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits an overlong word into character-level fragments, pushing all full
/// fragments onto `lines` and returning the trailing fragment as the new
/// current line. Every fragment holds at least one character, so progress is
/// guaranteed even when a single glyph overflows the budget.
fn break_word(
    face: &dyn FontFace,
    word: &str,
    size: Pt,
    max_width: Pt,
    lines: &mut Vec<String>,
) -> String {
    let mut fragment = String::new();
    for ch in word.chars() {
        let mut tentative = fragment.clone();
        tentative.push(ch);
        if fragment.is_empty() || face.measure(&tentative, size) <= max_width {
            fragment = tentative;
        } else {
            lines.push(std::mem::take(&mut fragment));
            fragment.push(ch);
        }
    }
    fragment
}

/// Result of a line-capped wrap: the lines, the size they were wrapped at,
/// and whether trailing content had to be cut to honor the cap.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedWrap {
    pub lines: Vec<String>,
    pub size: Pt,
    pub truncated: bool,
}

/// Wraps `text`, lowering the font size from `size` by `step` until the wrap
/// produces at most `max_lines` lines.
///
/// If the cap is still exceeded at `min_font`, the overflow is merged into
/// the last line when `max_lines == 2` (accepting visual overflow for the
/// short title-style blocks that use this cap), otherwise the sequence is
/// truncated to `max_lines` and flagged.
pub fn wrap_to_width_bounded(
    face: &dyn FontFace,
    text: &str,
    size: Pt,
    max_width: Pt,
    max_lines: usize,
    min_font: Pt,
    step: f32,
) -> BoundedWrap {
    let step = Pt(step.max(MIN_SHRINK_STEP));
    let mut size = size;
    let mut lines = wrap_to_width(face, text, size, max_width);

    while lines.len() > max_lines && size > min_font {
        size = (size - step).max(min_font);
        lines = wrap_to_width(face, text, size, max_width);
    }

    if lines.len() <= max_lines {
        return BoundedWrap {
            lines,
            size,
            truncated: false,
        };
    }

    if max_lines == 2 {
        let first = lines[0].clone();
        let rest = lines[1..].join(" ");
        BoundedWrap {
            lines: vec![first, rest],
            size,
            truncated: false,
        }
    } else {
        lines.truncate(max_lines);
        BoundedWrap {
            lines,
            size,
            truncated: true,
        }
    }
}

/// Wraps `text` at a fixed `size`, keeps the first `max_lines` lines, and
/// ellipsis-truncates the last kept line if anything was dropped.
///
/// Trailing characters of the last visible line are removed one at a time
/// until `line + "…"` fits `max_width`; if nothing remains, the lone
/// ellipsis is used when it fits. Untruncated text passes through untouched,
/// so short input is never turned into a bare ellipsis.
pub fn ellipsize_block(
    face: &dyn FontFace,
    text: &str,
    size: Pt,
    max_width: Pt,
    max_lines: usize,
) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }

    let lines = wrap_to_width(face, text, size, max_width);
    if lines.len() <= max_lines {
        return lines;
    }

    let mut visible: Vec<String> = lines[..max_lines].to_vec();
    let ellipsis_width = face.measure(&ELLIPSIS.to_string(), size);
    if ellipsis_width > max_width {
        // No room for the marker at all; keep the raw line.
        return visible;
    }

    let last_index = visible.len() - 1;
    let mut last: String = visible[last_index].trim_end().to_string();
    loop {
        let mut candidate = last.clone();
        candidate.push(ELLIPSIS);
        if face.measure(&candidate, size) <= max_width {
            visible[last_index] = candidate;
            return visible;
        }
        if last.pop().is_none() {
            visible[last_index] = ELLIPSIS.to_string();
            return visible;
        }
    }
}

/// Number of baselines that fit when the first sits at `baseline` points of
/// headroom and each subsequent line costs `line_gap`. A baseline closer to
/// the zone floor than one font size is unusable.
pub fn lines_fitting(baseline: Pt, size: Pt, line_gap: Pt) -> usize {
    if baseline < size {
        return 0;
    }
    if line_gap <= Pt(0.0) {
        return 1;
    }
    1 + ((baseline - size).0 / line_gap.0).floor() as usize
}
