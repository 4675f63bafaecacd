//! Keyword recognition and classification for Cypher.
//!
//! Cypher keywords are case-insensitive.

use super::token::TokenKind;

/// Looks up a keyword by name (case-insensitive).
pub fn lookup_keyword(name: &str) -> Option<TokenKind> {
    match name.to_ascii_uppercase().as_str() {
        "MATCH" => Some(TokenKind::Match),
        "OPTIONAL" => Some(TokenKind::Optional),
        "WHERE" => Some(TokenKind::Where),
        "RETURN" => Some(TokenKind::Return),
        "WITH" => Some(TokenKind::With),
        "UNWIND" => Some(TokenKind::Unwind),
        "CREATE" => Some(TokenKind::Create),
        "MERGE" => Some(TokenKind::Merge),
        "SET" => Some(TokenKind::Set),
        "DELETE" => Some(TokenKind::Delete),
        "DETACH" => Some(TokenKind::Detach),
        "REMOVE" => Some(TokenKind::Remove),
        "ON" => Some(TokenKind::On),
        "AS" => Some(TokenKind::As),
        "ORDER" => Some(TokenKind::Order),
        "BY" => Some(TokenKind::By),
        "ASC" => Some(TokenKind::Asc),
        "ASCENDING" => Some(TokenKind::Ascending),
        "DESC" => Some(TokenKind::Desc),
        "DESCENDING" => Some(TokenKind::Descending),
        "SKIP" => Some(TokenKind::Skip),
        "LIMIT" => Some(TokenKind::Limit),
        "UNION" => Some(TokenKind::Union),
        "ALL" => Some(TokenKind::All),
        "DISTINCT" => Some(TokenKind::Distinct),
        "CALL" => Some(TokenKind::Call),

        "AND" => Some(TokenKind::And),
        "OR" => Some(TokenKind::Or),
        "XOR" => Some(TokenKind::Xor),
        "NOT" => Some(TokenKind::Not),
        "IN" => Some(TokenKind::In),
        "STARTS" => Some(TokenKind::Starts),
        "ENDS" => Some(TokenKind::Ends),
        "CONTAINS" => Some(TokenKind::Contains),
        "IS" => Some(TokenKind::Is),

        "NULL" => Some(TokenKind::Null),
        "TRUE" => Some(TokenKind::True),
        "FALSE" => Some(TokenKind::False),

        "CASE" => Some(TokenKind::Case),
        "WHEN" => Some(TokenKind::When),
        "THEN" => Some(TokenKind::Then),
        "ELSE" => Some(TokenKind::Else),
        "END" => Some(TokenKind::End),

        "COUNT" => Some(TokenKind::Count),
        "FILTER" => Some(TokenKind::Filter),
        "EXTRACT" => Some(TokenKind::Extract),
        "ANY" => Some(TokenKind::Any),
        "NONE" => Some(TokenKind::None),
        "SINGLE" => Some(TokenKind::Single),

        _ => None,
    }
}

/// Returns true if the given name is a keyword (case-insensitive).
pub fn is_keyword(name: &str) -> bool {
    lookup_keyword(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_clause_keyword() {
        assert_eq!(lookup_keyword("MATCH"), Some(TokenKind::Match));
        assert_eq!(lookup_keyword("match"), Some(TokenKind::Match));
        assert_eq!(lookup_keyword("Match"), Some(TokenKind::Match));
        assert_eq!(lookup_keyword("MaTcH"), Some(TokenKind::Match));
    }

    #[test]
    fn lookup_logical_keyword() {
        assert_eq!(lookup_keyword("AND"), Some(TokenKind::And));
        assert_eq!(lookup_keyword("and"), Some(TokenKind::And));
        assert_eq!(lookup_keyword("OR"), Some(TokenKind::Or));
        assert_eq!(lookup_keyword("NOT"), Some(TokenKind::Not));
    }

    #[test]
    fn lookup_boolean_literal() {
        assert_eq!(lookup_keyword("TRUE"), Some(TokenKind::True));
        assert_eq!(lookup_keyword("true"), Some(TokenKind::True));
        assert_eq!(lookup_keyword("FALSE"), Some(TokenKind::False));
        assert_eq!(lookup_keyword("false"), Some(TokenKind::False));
    }

    #[test]
    fn lookup_null_literal() {
        assert_eq!(lookup_keyword("NULL"), Some(TokenKind::Null));
        assert_eq!(lookup_keyword("null"), Some(TokenKind::Null));
    }

    #[test]
    fn lookup_string_operator_keywords() {
        assert_eq!(lookup_keyword("STARTS"), Some(TokenKind::Starts));
        assert_eq!(lookup_keyword("ENDS"), Some(TokenKind::Ends));
        assert_eq!(lookup_keyword("CONTAINS"), Some(TokenKind::Contains));
    }

    #[test]
    fn lookup_non_keyword() {
        assert_eq!(lookup_keyword("foo"), None);
        assert_eq!(lookup_keyword("bar123"), None);
        assert_eq!(lookup_keyword("_test"), None);
    }

    #[test]
    fn is_keyword_check() {
        assert!(is_keyword("MATCH"));
        assert!(is_keyword("match"));
        assert!(is_keyword("WHERE"));
        assert!(!is_keyword("myIdentifier"));
        assert!(!is_keyword("test123"));
    }

    #[test]
    fn filter_function_keywords() {
        assert_eq!(lookup_keyword("ANY"), Some(TokenKind::Any));
        assert_eq!(lookup_keyword("NONE"), Some(TokenKind::None));
        assert_eq!(lookup_keyword("SINGLE"), Some(TokenKind::Single));
        assert_eq!(lookup_keyword("EXTRACT"), Some(TokenKind::Extract));
    }

    #[test]
    fn detach_and_remove_keywords() {
        assert_eq!(lookup_keyword("DETACH"), Some(TokenKind::Detach));
        assert_eq!(lookup_keyword("REMOVE"), Some(TokenKind::Remove));
    }
}
