use crate::extinf::EXTINF_MARKER;

pub const URL_MARKER: &str = "http";

/// One metadata line and the URL line that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub extinf: &'a str,
    pub url: &'a str,
}

/// Split playlist text into `#EXTINF:` / URL pairs.
///
/// Any line that does not start a pair (blank lines, other directives, a
/// metadata line whose next line is not a URL) is skipped on its own.
pub fn parse_blocks(text: &str) -> Vec<Block<'_>> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i + 1 < lines.len() {
        if lines[i].starts_with(EXTINF_MARKER) && lines[i + 1].starts_with(URL_MARKER) {
            blocks.push(Block {
                extinf: lines[i],
                url: lines[i + 1],
            });
            i += 2;
        } else {
            i += 1;
        }
    }

    blocks
}
