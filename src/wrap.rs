use crate::snippets::is_fence;

pub const DEFAULT_MAX_LEN: usize = 87;
pub const DEFAULT_MARKER: &str = "↳ ";

/// Splits long lines inside fenced code blocks so they fit a printed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineWrapper {
    max_len: usize,
    marker: String,
    marker_len: usize,
}

impl Default for LineWrapper {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_LEN,
            marker: DEFAULT_MARKER.to_owned(),
            marker_len: DEFAULT_MARKER.chars().count(),
        }
    }
}

impl LineWrapper {
    pub fn new(max_len: usize, marker: &str) -> anyhow::Result<Self> {
        let marker_len = marker.chars().count();
        if marker_len >= max_len {
            anyhow::bail!(
                "continuation marker {marker:?} must be shorter than the wrap width ({max_len})"
            );
        }
        Ok(Self {
            max_len,
            marker: marker.to_owned(),
            marker_len,
        })
    }

    /// Breaks a single line (without its newline) into chunks of at most
    /// `max_len` characters, prefixing every continuation with the marker.
    pub fn break_line(&self, line: &str) -> String {
        let chars: Vec<char> = line.chars().collect();
        if chars.len() <= self.max_len {
            return line.to_owned();
        }

        let step = self.max_len - self.marker_len;
        let mut out = String::with_capacity(line.len() + line.len() / step * 4);
        out.extend(&chars[..self.max_len]);

        let mut cursor = self.max_len;
        while cursor < chars.len() {
            let end = (cursor + step).min(chars.len());
            out.push('\n');
            out.push_str(&self.marker);
            out.extend(&chars[cursor..end]);
            cursor = end;
        }
        out
    }

    /// Wraps every line strictly inside a fenced code block. Fence lines and
    /// prose are left alone.
    pub fn wrap_code_blocks(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut in_code_block = false;

        for piece in input.split_inclusive('\n') {
            let (line, newline) = match piece.strip_suffix('\n') {
                Some(line) => (line, "\n"),
                None => (piece, ""),
            };

            if is_fence(line) {
                in_code_block = !in_code_block;
                out.push_str(piece);
            } else if in_code_block {
                out.push_str(&self.break_line(line));
                out.push_str(newline);
            } else {
                out.push_str(piece);
            }
        }
        out
    }
}
