//! Turning captured child output into text that is safe to put in cells.

use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 8;

/// Skips the rest of an escape sequence whose `ESC` was already consumed.
fn skip_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    match chars.next() {
        // CSI: parameter and intermediate bytes, then one final byte
        Some('[') => {
            for c in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&c) {
                    break;
                }
            }
        }
        // OSC: terminated by BEL or ESC \
        Some(']') => {
            while let Some(c) = chars.next() {
                if c == '\u{07}' {
                    break;
                }
                if c == '\u{1b}' {
                    if chars.peek() == Some(&'\\') {
                        chars.next();
                    }
                    break;
                }
            }
        }
        // Two character escapes like ESC 7
        _ => {}
    }
}

/// Cleans one line of output for display.
///
/// Escape sequences are removed, a carriage return keeps only what was
/// written after it, tabs expand to the next multiple of eight columns and
/// any other control character is dropped.
pub fn sanitize_line(line: &str) -> String {
    let visible = line
        .rsplit('\r')
        .find(|segment| !segment.is_empty())
        .unwrap_or("");

    let mut out = String::with_capacity(visible.len());
    let mut column = 0;
    let mut chars = visible.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\u{1b}' => skip_escape(&mut chars),
            '\t' => {
                let pad = TAB_WIDTH - column % TAB_WIDTH;
                out.push_str(&" ".repeat(pad));
                column += pad;
            }
            c if c.is_control() => {}
            c => {
                out.push(c);
                column += c.width().unwrap_or(0);
            }
        }
    }

    out
}
