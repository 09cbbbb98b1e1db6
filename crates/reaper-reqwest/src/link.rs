//! `Link` header parsing.
//!
//! GitLab advertises pagination as a comma separated list of
//! `<uri>; rel="next"` entries. Only the entry whose relation list contains
//! `next` is followed.

/// One entry of a `Link` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkEntry<'a> {
    /// Target URI without the angle brackets.
    pub uri: &'a str,
    /// Raw `rel` parameter value with quotes removed.
    pub rel: Option<&'a str>,
}

impl LinkEntry<'_> {
    /// Returns `true` if the entry carries relation `relation`.
    ///
    /// A `rel` value may list several space separated relations; relation
    /// names compare case-insensitively.
    #[must_use]
    pub fn has_rel(&self, relation: &str) -> bool {
        self.rel.is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|r| r.eq_ignore_ascii_case(relation))
        })
    }
}

/// Parses every well-formed entry of a `Link` header value.
///
/// Entries that do not start with `<uri>` are skipped.
#[must_use]
pub fn parse(header: &str) -> Vec<LinkEntry<'_>> {
    let mut entries = Vec::new();
    let mut rest = header;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if rest.is_empty() {
            break;
        }

        let entry_end = entry_end(rest);
        let (entry, tail) = rest.split_at(entry_end);
        rest = tail;

        if let Some(parsed) = parse_entry(entry) {
            entries.push(parsed);
        }
    }

    entries
}

/// Returns the URI of the `rel="next"` entry, if any.
#[must_use]
pub fn next_link(header: &str) -> Option<&str> {
    parse(header)
        .into_iter()
        .find(|entry| entry.has_rel("next"))
        .map(|entry| entry.uri)
}

/// Finds the end of the entry starting at `input`: the first comma that is
/// neither inside `<...>` nor inside a quoted string.
fn entry_end(input: &str) -> usize {
    let mut in_uri = false;
    let mut in_quotes = false;

    for (index, c) in input.char_indices() {
        match c {
            '<' if !in_quotes => in_uri = true,
            '>' if !in_quotes => in_uri = false,
            '"' if !in_uri => in_quotes = !in_quotes,
            ',' if !in_uri && !in_quotes => return index,
            _ => {}
        }
    }

    input.len()
}

fn parse_entry(entry: &str) -> Option<LinkEntry<'_>> {
    let entry = entry.trim();
    let after_open = entry.strip_prefix('<')?;
    let close = after_open.find('>')?;
    let uri = after_open[..close].trim();
    if uri.is_empty() {
        return None;
    }

    let rel = after_open[close + 1..]
        .split(';')
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("rel"))
        .map(|(_, value)| value.trim().trim_matches('"'));

    Some(LinkEntry { uri, rel })
}
