use std::fmt;

use crate::date::Date;
use crate::distribute::error::{LineIssue, RecordError};

/// Separator between name and ID number in a record line.
pub const SEPARATOR: char = '+';

/// Length of a resident ID number.
const ID_LENGTH: usize = 18;

/// Characters that cannot appear in a folder name on common file systems.
const ILLEGAL_DIR_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Validated `name+id` record for one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub name: String,
    pub id: String,
    /// Trimmed input line, used as the output folder name.
    pub line: String,
}

impl PersonRecord {
    /// Folder name for this person's images.
    #[must_use]
    pub fn directory_name(&self) -> &str {
        &self.line
    }

    /// Birth date encoded in the ID number.
    #[must_use]
    pub fn birth_date(&self) -> Option<Date> {
        birth_date_part(&self.id).and_then(Date::parse_compact)
    }
}

impl fmt::Display for PersonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line)
    }
}

/// Check the structure and birth date of an 18-character ID number.
///
/// The first 17 characters must be ASCII digits and the last one a digit or `X`.
/// Characters 7-14 must form a plausible `YYYYMMDD` birth date.
/// The check digit itself is not verified.
///
/// ```rust
/// use card_sort::distribute::is_valid_id_number;
///
/// assert!(is_valid_id_number("11010119900101123X"));
/// assert!(!is_valid_id_number("110101199013011234"));
/// ```
#[must_use]
pub fn is_valid_id_number(id: &str) -> bool {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() != ID_LENGTH {
        return false;
    }
    let (body, check) = chars.split_at(ID_LENGTH - 1);
    if !body.iter().all(char::is_ascii_digit) {
        return false;
    }
    if !matches!(check[0], '0'..='9' | 'X' | 'x') {
        return false;
    }
    birth_date_part(id).and_then(Date::parse_compact).is_some()
}

/// Parse record lines and validate each one, stopping at the first invalid line.
///
/// Blank lines are skipped and do not count towards line numbers.
/// Each line is split at the first `+` so any later `+` stays in the ID part.
///
/// # Errors
/// Returns the 1-based number and content of the first invalid line.
pub fn validate_records(text: &str) -> Result<Vec<PersonRecord>, RecordError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| {
            parse_record_line(line).map_err(|issue| RecordError {
                line: index + 1,
                content: line.to_string(),
                issue,
            })
        })
        .collect()
}

/// Parse a single trimmed record line.
fn parse_record_line(line: &str) -> Result<PersonRecord, LineIssue> {
    let (name, id) = line.split_once(SEPARATOR).ok_or(LineIssue::MissingSeparator)?;
    let name = name.trim();
    let id = id.trim();
    if name.is_empty() {
        return Err(LineIssue::EmptyName);
    }
    if id.is_empty() {
        return Err(LineIssue::EmptyId);
    }
    if !is_valid_id_number(id) {
        return Err(LineIssue::InvalidId);
    }
    if let Some(c) = line
        .chars()
        .find(|c| ILLEGAL_DIR_CHARS.contains(c) || c.is_control())
    {
        return Err(LineIssue::IllegalCharacter(c));
    }
    Ok(PersonRecord {
        name: name.to_string(),
        id: id.to_string(),
        line: line.to_string(),
    })
}

/// Characters 7-14 of the ID number.
fn birth_date_part(id: &str) -> Option<&str> {
    id.get(6..14)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_length_must_be_18() {
        assert!(!is_valid_id_number(""));
        assert!(!is_valid_id_number("11010119900101123"));
        assert!(!is_valid_id_number("1101011990010112345"));
        assert!(!is_valid_id_number("110101 19900101123"));
    }

    #[test]
    fn id_body_must_be_digits() {
        assert!(!is_valid_id_number("1234567890123456X1"));
        assert!(!is_valid_id_number("X10101199001011234"));
        assert!(!is_valid_id_number("１10101199001011234"));
    }

    #[test]
    fn id_check_character() {
        assert!(is_valid_id_number("110101199001011234"));
        assert!(is_valid_id_number("11010119900101123X"));
        assert!(is_valid_id_number("11010119900101123x"));
        assert!(!is_valid_id_number("11010119900101123Y"));
    }

    #[test]
    fn id_birth_date_ranges() {
        assert!(!is_valid_id_number("110101199013011234"));
        assert!(!is_valid_id_number("110101199000011234"));
        assert!(!is_valid_id_number("110101199001321234"));
        assert!(!is_valid_id_number("110101199001001234"));
        assert!(!is_valid_id_number("110101189912311234"));
        assert!(!is_valid_id_number("110101210101011234"));
        assert!(is_valid_id_number("110101190001011234"));
        assert!(is_valid_id_number("110101210012311234"));
    }

    #[test]
    fn id_month_lengths() {
        assert!(!is_valid_id_number("110101199004311234"));
        assert!(is_valid_id_number("110101199005311234"));
        assert!(!is_valid_id_number("110101199002301234"));
        assert!(!is_valid_id_number("110101200002301234"));
    }

    #[test]
    fn id_leap_day() {
        assert!(is_valid_id_number("110101200002291234"));
        assert!(!is_valid_id_number("110101190002291234"));
        assert!(!is_valid_id_number("110101210002291234"));
        assert!(!is_valid_id_number("110101199902291234"));
        assert!(is_valid_id_number("110101199602291234"));
    }

    #[test]
    fn parses_valid_records() {
        let text = "张三+110101199001011234\n\n  李四 + 11010119850615432X  \n";
        let records = validate_records(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "张三");
        assert_eq!(records[0].id, "110101199001011234");
        assert_eq!(records[0].directory_name(), "张三+110101199001011234");
        assert_eq!(records[1].name, "李四");
        assert_eq!(records[1].id, "11010119850615432X");
        assert_eq!(records[1].line, "李四 + 11010119850615432X");
    }

    #[test]
    fn handles_windows_newlines() {
        let records = validate_records("张三+110101199001011234\r\n李四+110101199001021234\r\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "110101199001021234");
    }

    #[test]
    fn fails_fast_on_first_invalid_line() {
        let error = validate_records("张三+110101199001011234\nbad-line\nalso bad").unwrap_err();
        assert_eq!(error.line, 2);
        assert_eq!(error.content, "bad-line");
        assert_eq!(error.issue, LineIssue::MissingSeparator);
    }

    #[test]
    fn line_numbers_skip_blank_lines() {
        let error = validate_records("\n张三+110101199001011234\n\n   \n王五+123").unwrap_err();
        assert_eq!(error.line, 2);
        assert_eq!(error.content, "王五+123");
        assert_eq!(error.issue, LineIssue::InvalidId);
    }

    #[test]
    fn splits_on_first_separator_only() {
        let error = validate_records("张三+110101199001011234+1").unwrap_err();
        assert_eq!(error.issue, LineIssue::InvalidId);

        let error = validate_records("+110101199001011234").unwrap_err();
        assert_eq!(error.issue, LineIssue::EmptyName);

        let error = validate_records("张三+  ").unwrap_err();
        assert_eq!(error.issue, LineIssue::EmptyId);
    }

    #[test]
    fn rejects_path_characters_in_name() {
        let error = validate_records("../x+110101199001011234").unwrap_err();
        assert_eq!(error.issue, LineIssue::IllegalCharacter('/'));

        let error = validate_records("a\\b+110101199001011234").unwrap_err();
        assert_eq!(error.issue, LineIssue::IllegalCharacter('\\'));

        let error = validate_records("a:b+110101199001011234").unwrap_err();
        assert_eq!(error.issue, LineIssue::IllegalCharacter(':'));
    }

    #[test]
    fn empty_input_gives_no_records() {
        assert!(validate_records("").unwrap().is_empty());
        assert!(validate_records("\n  \n").unwrap().is_empty());
    }

    #[test]
    fn birth_date_from_id() {
        let records = validate_records("张三+110101199001021234").unwrap();
        let date = records[0].birth_date().unwrap();
        assert_eq!(date.dash_format(), "1990-01-02");
    }
}
