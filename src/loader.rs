use crate::session::SessionRequest;
use std::io;
use std::sync::Arc;

/// Why a line of the request file was not turned into a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingSeparator,
    MissingInstructor,
    InvalidDuration,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            SkipReason::MissingSeparator => "missing '-' separator",
            SkipReason::MissingInstructor => "instructor name missing",
            SkipReason::InvalidDuration => "invalid or non-positive duration",
        };
        write!(f, "{}", msg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line: usize,
    pub reason: SkipReason,
    pub text: String,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} skipped: {}: \"{}\"", self.line, self.reason, self.text)
    }
}

/// Parses the request file format, one request per line:
/// `Subject - Prof. Name <minutes> min`. Malformed lines are skipped and
/// reported; they never reach the scheduler.
pub fn parse_requests(input: &str) -> (Vec<SessionRequest>, Vec<ParseWarning>) {
    let mut requests = Vec::new();
    let mut warnings = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let skip = |reason| ParseWarning {
            line: idx + 1,
            reason,
            text: line.to_string(),
        };

        let Some((subject, info)) = line.split_once('-') else {
            warnings.push(skip(SkipReason::MissingSeparator));
            continue;
        };

        let subject = subject.trim();
        let info = info.trim();
        if info.is_empty() {
            warnings.push(skip(SkipReason::MissingInstructor));
            continue;
        }

        // "Prof. Ana 60 min" -> short name "Ana"; single-word sections fall
        // back to that word.
        let words: Vec<&str> = info.split_whitespace().collect();
        let instructor = words.get(1).copied().unwrap_or(words[0]);

        match first_int(info) {
            Some(minutes) if minutes > 0 => requests.push(SessionRequest {
                subject: Arc::from(subject),
                instructor: Arc::from(instructor),
                duration_min: minutes as u64,
            }),
            _ => warnings.push(skip(SkipReason::InvalidDuration)),
        }
    }

    (requests, warnings)
}

pub fn load_from_file(path: &str) -> io::Result<(Vec<SessionRequest>, Vec<ParseWarning>)> {
    let data = std::fs::read_to_string(path)?;
    Ok(parse_requests(&data))
}

/// First integer in the text, keeping an immediately preceding minus sign.
fn first_int(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = if i > 0 && bytes[i - 1] == b'-' { i - 1 } else { i };
            let mut end = i;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            return text[start..end].parse().ok();
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_line() {
        let (requests, warnings) = parse_requests("Mathematics - Prof. Ana 60 min");
        assert!(warnings.is_empty());
        assert_eq!(1, requests.len());
        assert_eq!("Mathematics", requests[0].subject.as_ref());
        assert_eq!("Ana", requests[0].instructor.as_ref());
        assert_eq!(60, requests[0].duration_min);
    }

    #[test]
    fn test_blank_lines_skipped_silently() {
        let (requests, warnings) = parse_requests("\n  \nPhysics - Prof. Rui 45 min\n\n");
        assert!(warnings.is_empty());
        assert_eq!(1, requests.len());
    }

    #[test]
    fn test_missing_separator() {
        let (requests, warnings) = parse_requests("Mathematics Prof. Ana 60 min");
        assert!(requests.is_empty());
        assert_eq!(1, warnings.len());
        assert_eq!(SkipReason::MissingSeparator, warnings[0].reason);
        assert_eq!(1, warnings[0].line);
    }

    #[test]
    fn test_missing_instructor() {
        let (requests, warnings) = parse_requests("Mathematics -   ");
        assert!(requests.is_empty());
        assert_eq!(SkipReason::MissingInstructor, warnings[0].reason);
    }

    #[test]
    fn test_missing_duration() {
        let (requests, warnings) = parse_requests("Mathematics - Prof. Ana");
        assert!(requests.is_empty());
        assert_eq!(SkipReason::InvalidDuration, warnings[0].reason);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let (requests, warnings) = parse_requests("Mathematics - Prof. Ana 0 min");
        assert!(requests.is_empty());
        assert_eq!(SkipReason::InvalidDuration, warnings[0].reason);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let (requests, warnings) = parse_requests("Mathematics - Prof. Ana -60 min");
        assert!(requests.is_empty());
        assert_eq!(SkipReason::InvalidDuration, warnings[0].reason);
    }

    #[test]
    fn test_single_word_instructor_fallback() {
        let (requests, _) = parse_requests("Chemistry - Ana60");
        assert_eq!("Ana60", requests[0].instructor.as_ref());
        assert_eq!(60, requests[0].duration_min);
    }

    #[test]
    fn test_warning_line_numbers() {
        let input = "History - Prof. Ana 60 min\nbroken line\nBiology - Prof. Rui 30 min";
        let (requests, warnings) = parse_requests(input);
        assert_eq!(2, requests.len());
        assert_eq!(1, warnings.len());
        assert_eq!(2, warnings[0].line);
    }
}
