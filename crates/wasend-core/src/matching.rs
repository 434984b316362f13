use crate::domain::{sanitize_digits, Contact};

/// Queries need this many digits before phone numbers are searched.
const MIN_PHONE_QUERY_DIGITS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unique(Contact),
    Ambiguous(Vec<Contact>),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchRank {
    Exact,
    Prefix,
    WordPrefix,
    Substring,
    Phone,
}

pub fn normalize_name(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn rank(query: &str, query_digits: Option<&str>, contact: &Contact) -> Option<MatchRank> {
    let name = normalize_name(&contact.name);
    if name == query {
        return Some(MatchRank::Exact);
    }
    if name.starts_with(query) {
        return Some(MatchRank::Prefix);
    }
    if name
        .split(' ')
        .skip(1)
        .any(|word| word.starts_with(query))
    {
        return Some(MatchRank::WordPrefix);
    }
    if name.contains(query) {
        return Some(MatchRank::Substring);
    }
    let digits = query_digits?;
    let phone = sanitize_digits(&contact.phone)?;
    if phone.contains(digits) {
        return Some(MatchRank::Phone);
    }
    None
}

// Only digits and dialing punctuation; "Apt 123" stays a name search.
fn is_phone_query(query: &str) -> bool {
    query.chars().all(|ch| {
        ch.is_ascii_digit() || ch == ' ' || matches!(ch, '+' | '-' | '(' | ')' | '.' | '/')
    })
}

/// Candidate contacts for a free-text query, best match first.
pub fn find_matches(query: &str, contacts: &[Contact]) -> Vec<Contact> {
    let query = normalize_name(query);
    if query.is_empty() {
        return Vec::new();
    }
    let query_digits = if is_phone_query(&query) {
        sanitize_digits(&query).filter(|digits| digits.len() >= MIN_PHONE_QUERY_DIGITS)
    } else {
        None
    };

    let mut ranked: Vec<(MatchRank, String, &Contact)> = contacts
        .iter()
        .filter_map(|contact| {
            rank(&query, query_digits.as_deref(), contact)
                .map(|rank| (rank, contact.name.to_lowercase(), contact))
        })
        .collect();
    ranked.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.id.cmp(&b.2.id))
    });
    ranked
        .into_iter()
        .map(|(_, _, contact)| contact.clone())
        .collect()
}

pub fn resolve_by_name(query: &str, contacts: &[Contact]) -> Resolution {
    let normalized = normalize_name(query);
    if normalized.is_empty() {
        return Resolution::NotFound;
    }

    let exact: Vec<&Contact> = contacts
        .iter()
        .filter(|contact| normalize_name(&contact.name) == normalized)
        .collect();
    match exact.as_slice() {
        [single] => return Resolution::Unique((*single).clone()),
        [] => {}
        _ => return Resolution::Ambiguous(exact.into_iter().cloned().collect()),
    }

    let mut candidates = find_matches(query, contacts);
    match candidates.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Unique(candidates.remove(0)),
        _ => Resolution::Ambiguous(candidates),
    }
}

#[cfg(test)]
mod tests {
    use super::{find_matches, normalize_name, resolve_by_name, Resolution};
    use crate::domain::Contact;

    fn contacts() -> Vec<Contact> {
        vec![
            Contact::new("Mary Ann Smith", "+1 415 555 0101").unwrap(),
            Contact::new("Ann Lee", "+44 20 7946 0958").unwrap(),
            Contact::new("Joanna", "030 1234567").unwrap(),
            Contact::new("Bob", "+1 212 555 0199").unwrap(),
        ]
    }

    fn names(found: &[Contact]) -> Vec<&str> {
        found.iter().map(|contact| contact.name.as_str()).collect()
    }

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize_name("  Mary   ANN\tsmith "), "mary ann smith");
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(find_matches("   ", &contacts()).is_empty());
    }

    #[test]
    fn matches_rank_prefix_before_word_prefix_before_substring() {
        let found = find_matches("ann", &contacts());
        assert_eq!(names(&found), vec!["Ann Lee", "Mary Ann Smith", "Joanna"]);
    }

    #[test]
    fn matches_phone_digits() {
        let found = find_matches("7946", &contacts());
        assert_eq!(names(&found), vec!["Ann Lee"]);
    }

    #[test]
    fn mixed_text_and_digits_skip_phone_search() {
        assert!(find_matches("apt 555", &contacts()).is_empty());
        let found = find_matches("(555) 0101", &contacts());
        assert_eq!(names(&found), vec!["Mary Ann Smith"]);
    }

    #[test]
    fn short_digit_queries_skip_phone_search() {
        assert!(find_matches("55", &contacts()).is_empty());
    }

    #[test]
    fn resolve_prefers_single_exact_match() {
        let mut list = contacts();
        list.push(Contact::new("Bobby", "+1 999").unwrap());
        match resolve_by_name("bob", &list) {
            Resolution::Unique(contact) => assert_eq!(contact.name, "Bob"),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn resolve_reports_ambiguity() {
        match resolve_by_name("ann", &contacts()) {
            Resolution::Ambiguous(found) => assert_eq!(found.len(), 3),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn resolve_single_partial_match() {
        match resolve_by_name("joan", &contacts()) {
            Resolution::Unique(contact) => assert_eq!(contact.name, "Joanna"),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn resolve_duplicate_exact_names_is_ambiguous() {
        let list = vec![
            Contact::new("Bob", "1").unwrap(),
            Contact::new("bob", "2").unwrap(),
        ];
        assert!(matches!(resolve_by_name("Bob", &list), Resolution::Ambiguous(_)));
    }

    #[test]
    fn resolve_unknown_name() {
        assert_eq!(resolve_by_name("zed", &contacts()), Resolution::NotFound);
    }
}
