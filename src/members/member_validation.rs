use clubroll_types::members::{Programme, Semester};
use regex::RegexBuilder;

/// Maximum length of the first and last names.
pub const MAX_NAME_LENGTH: usize = 100;
/// Maximum length of the member email.
pub const MAX_EMAIL_LENGTH: usize = 100;
/// Maximum length of the roll number.
pub const MAX_ROLL_LENGTH: usize = 10;
/// Maximum length of the "about" text.
pub const MAX_ABOUT_LENGTH: usize = 256;

/// Minimum and maximum number of digits in an E.164 phone number.
const MIN_CONTACT_DIGITS: usize = 8;
const MAX_CONTACT_DIGITS: usize = 15;

/// Checks that the roll number follows the `<2 digits><programme format><2 digits>` pattern,
/// e.g. `22BECSE44`, ignoring case.
pub fn roll_matches_programme(roll: &str, programme: Programme) -> anyhow::Result<bool> {
    let roll_regex = RegexBuilder::new(&format!(
        r"^\d{{2}}{}\d{{2}}$",
        regex::escape(programme.roll_format())
    ))
    .case_insensitive(true)
    .build()?;

    Ok(roll_regex.is_match(roll))
}

/// Normalizes a phone number to E.164 format (`+` followed by digits). Spaces, dashes, dots and
/// parentheses are allowed as separators, the country code is required.
pub fn normalize_contact(contact: &str) -> Option<String> {
    let contact = contact.trim();
    let digits = contact.strip_prefix('+')?;

    let mut normalized = String::with_capacity(contact.len());
    normalized.push('+');
    for c in digits.chars() {
        match c {
            '0'..='9' => normalized.push(c),
            ' ' | '-' | '.' | '(' | ')' => continue,
            _ => return None,
        }
    }

    let digits_count = normalized.len() - 1;
    let is_valid = (MIN_CONTACT_DIGITS..=MAX_CONTACT_DIGITS).contains(&digits_count)
        && !normalized[1..].starts_with('0');
    is_valid.then_some(normalized)
}

/// Only students in the final semester can be marked as graduated.
pub fn check_graduation(semester: Semester, has_graduated: bool) -> Result<(), &'static str> {
    if has_graduated && !semester.is_final() {
        return Err("Students that are not in the 8th semester can't be marked as graduated.");
    }

    Ok(())
}
