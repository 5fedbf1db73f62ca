use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

const EMAIL_PATTERN: &str =
    r"^([A-Z0-9_+-]+\.?)*[A-Z0-9_+-]@([A-Z0-9_+-][A-Z0-9_+-]*\.)+[A-Z]{2,}$";

static EMAIL_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    RegexBuilder::new(EMAIL_PATTERN)
        .case_insensitive(true)
        .unicode(false)
        .build()
        .map_err(|e| log::error!("Email address pattern failed to compile: {}", e))
        .ok()
});

/// Checks that `email` looks like `local@domain.tld`.
///
/// The local part is one or more dot-separated groups of `[A-Za-z0-9_+-]`,
/// the domain is one or more dot-terminated labels and the top-level label is
/// at least two letters. Only ASCII letters count, whatever the case. If the pattern cannot be compiled nothing matches.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX
        .as_ref()
        .is_some_and(|regex| regex.is_match(email))
}
