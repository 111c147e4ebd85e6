//! Query/response size statistics printed by `+stats`.
//!
//! Two layouts are understood:
//! * dig's labelled lines, `;; QUERY SIZE: 28` and `;; MSG SIZE  rcvd: 512`;
//! * a compact form listing byte counts in order, `query: 1 msec; 28 bytes; ... ;512 bytes`,
//!   where the first count is the query and the last one the response.

use nsaudit_common::error::ParseError;

const QUERY_SIZE_LABEL: &str = "QUERY SIZE:";
const RESPONSE_SIZE_LABEL: &str = "rcvd:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSizes {
    pub query: usize,
    pub response: usize,
}

impl MessageSizes {
    /// Response size over query size.
    pub fn amplification_factor(&self) -> f64 {
        self.response as f64 / self.query as f64
    }
}

pub fn parse_message_sizes(output: &str) -> Result<MessageSizes, ParseError> {
    let sizes: MessageSizes = match labelled_sizes(output)? {
        Some(sizes) => sizes,
        None => byte_count_sizes(output).ok_or(ParseError::MissingStatistics)?,
    };
    if sizes.query == 0 {
        return Err(ParseError::ZeroQuerySize);
    }
    Ok(sizes)
}

fn labelled_sizes(output: &str) -> Result<Option<MessageSizes>, ParseError> {
    let query: Option<usize> = labelled_value(output, QUERY_SIZE_LABEL)?;
    let response: Option<usize> = output
        .lines()
        .filter(|line| line.contains("MSG SIZE"))
        .find_map(|line| line.split_once(RESPONSE_SIZE_LABEL))
        .map(|(_, value)| parse_count(value))
        .transpose()?;

    match (query, response) {
        (Some(query), Some(response)) => Ok(Some(MessageSizes { query, response })),
        _ => Ok(None),
    }
}

fn labelled_value(output: &str, label: &str) -> Result<Option<usize>, ParseError> {
    output
        .lines()
        .find_map(|line| line.split_once(label))
        .map(|(_, value)| parse_count(value))
        .transpose()
}

fn byte_count_sizes(output: &str) -> Option<MessageSizes> {
    let tokens: Vec<&str> = output.split_whitespace().collect();
    let counts: Vec<usize> = tokens
        .windows(2)
        .filter(|pair| pair[1].trim_start_matches(';').starts_with("bytes"))
        .filter_map(|pair| strip_punctuation(pair[0]).parse().ok())
        .collect();

    match counts.as_slice() {
        [query, .., response] => Some(MessageSizes {
            query: *query,
            response: *response,
        }),
        _ => None,
    }
}

fn parse_count(value: &str) -> Result<usize, ParseError> {
    let token: &str = value.split_whitespace().next().unwrap_or_default();
    strip_punctuation(token)
        .parse()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))
}

fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| c == ';' || c == ',')
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
