//! Typed listing criteria.
//!
//! Every optional filter is a `Filter<T>`: `Any` means "do not constrain this
//! field", `Only(v)` means "the field must equal `v"`. The wire sentinel `all`
//! and empty strings both become `Any`, so no handler or store ever compares
//! against magic strings.

use serde::Deserialize;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::{PageRequest, TalentRole, User};

/// Wire value meaning "no constraint" for a select-style filter.
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter<T> {
    #[default]
    Any,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Filter::Any => true,
            Filter::Only(expected) => expected == value,
        }
    }
}

impl<T> Filter<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Filter::Any => None,
            Filter::Only(value) => Some(value),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Filter::Any)
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Filter::Only(value),
            None => Filter::Any,
        }
    }
}

impl Filter<String> {
    /// Interprets a free-form selection. Blank input and `all` (any case) mean `Any`.
    pub fn from_selection(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Filter::Any,
            Some(value) if value.eq_ignore_ascii_case(ALL_SENTINEL) => Filter::Any,
            Some(value) => Filter::Only(value.to_string()),
        }
    }
}

/// Parses a selection naming an enum variant. Blank and `all` mean `Any`.
pub fn parse_selection<T: FromStr>(raw: Option<&str>) -> Result<Filter<T>, T::Err> {
    match Filter::from_selection(raw) {
        Filter::Any => Ok(Filter::Any),
        Filter::Only(value) => value.parse().map(Filter::Only),
    }
}

/// Criteria for the public talent directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TalentQuery {
    pub role: Filter<TalentRole>,
    pub category: Filter<String>,
    pub location: Filter<String>,
    /// Case-insensitive substring over name, category, skills and bio.
    pub search: Filter<String>,
    pub page: PageRequest,
}

impl TalentQuery {
    /// Evaluates the predicate against one account. Only active talent-purpose
    /// talent accounts can ever match.
    pub fn matches(&self, user: &User) -> bool {
        if !user.is_listed_talent() {
            return false;
        }
        let role_ok = match &self.role {
            Filter::Any => true,
            Filter::Only(role) => user.talent_role == Some(*role),
        };
        role_ok
            && exact(&self.category, user.category.as_deref())
            && exact(&self.location, user.location.as_deref())
            && self.matches_search(user)
    }

    fn matches_search(&self, user: &User) -> bool {
        let needle = match &self.search {
            Filter::Any => return true,
            Filter::Only(term) => term.to_lowercase(),
        };
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        contains(&user.name)
            || user.category.as_deref().map_or(false, contains)
            || user.skills.iter().any(|skill| contains(skill))
            || user.bio.as_deref().map_or(false, contains)
    }
}

fn exact(filter: &Filter<String>, value: Option<&str>) -> bool {
    match filter {
        Filter::Any => true,
        Filter::Only(expected) => value == Some(expected.as_str()),
    }
}

/// Raw query string accepted by `GET /api/talents`.
#[derive(Debug, Default, Deserialize)]
pub struct TalentListParams {
    pub role: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl TryFrom<TalentListParams> for TalentQuery {
    type Error = AppError;

    fn try_from(params: TalentListParams) -> Result<Self, Self::Error> {
        let role = parse_selection::<TalentRole>(params.role.as_deref())
            .map_err(|err| AppError::invalid_field("role", &err.to_string()))?;
        Ok(TalentQuery {
            role,
            category: Filter::from_selection(params.category.as_deref()),
            location: Filter::from_selection(params.location.as_deref()),
            search: Filter::from_selection(params.search.as_deref()),
            page: PageRequest::from_params(params.page, params.limit),
        })
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally inside a
/// `LIKE ... ESCAPE '\'` pattern.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Wraps escaped input in wildcards for a substring match.
pub fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountRole, Purpose};

    fn talent(name: &str, category: &str, location: &str, role: TalentRole) -> User {
        let mut user = User::new(
            name,
            &format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            "hash".into(),
            AccountRole::Talent,
            Purpose::Talent,
        );
        user.talent_role = Some(role);
        user.category = Some(category.into());
        user.location = Some(location.into());
        user
    }

    #[test]
    fn test_selection_sentinels() {
        assert_eq!(Filter::from_selection(Some("all")), Filter::Any);
        assert_eq!(Filter::from_selection(Some("ALL")), Filter::Any);
        assert_eq!(Filter::from_selection(Some("   ")), Filter::Any);
        assert_eq!(Filter::from_selection(None), Filter::Any);
        assert_eq!(
            Filter::from_selection(Some(" Drama ")),
            Filter::Only("Drama".to_string())
        );
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(
            parse_selection::<TalentRole>(Some("acting")),
            Ok(Filter::Only(TalentRole::Acting))
        );
        assert_eq!(parse_selection::<TalentRole>(Some("all")), Ok(Filter::Any));
        assert!(parse_selection::<TalentRole>(Some("dancer")).is_err());
    }

    #[test]
    fn test_search_is_case_insensitive_over_category() {
        let sound = talent("Ana Ruiz", "Sound Design", "Austin, TX", TalentRole::Production);
        let drama = talent("Ben Cole", "Drama", "Austin, TX", TalentRole::Acting);
        let query = TalentQuery {
            search: Filter::Only("sound".into()),
            ..TalentQuery::default()
        };

        assert!(query.matches(&sound));
        assert!(!query.matches(&drama));
    }

    #[test]
    fn test_search_covers_skills_and_bio() {
        let mut user = talent("Ana Ruiz", "Editing", "Austin, TX", TalentRole::Production);
        user.skills = vec!["Color Grading".into()];
        user.bio = Some("Documentary specialist".into());

        for term in ["grading", "DOCUMENTARY", "ana"] {
            let query = TalentQuery {
                search: Filter::Only(term.into()),
                ..TalentQuery::default()
            };
            assert!(query.matches(&user), "expected match for {}", term);
        }
    }

    #[test]
    fn test_exact_fields() {
        let user = talent("Ana Ruiz", "Drama", "New York, NY", TalentRole::Acting);
        let by_location = TalentQuery {
            location: Filter::Only("New York".into()),
            ..TalentQuery::default()
        };
        assert!(!by_location.matches(&user));

        let by_role = TalentQuery {
            role: Filter::Only(TalentRole::Production),
            ..TalentQuery::default()
        };
        assert!(!by_role.matches(&user));

        let combined = TalentQuery {
            role: Filter::Only(TalentRole::Acting),
            category: Filter::Only("Drama".into()),
            location: Filter::Only("New York, NY".into()),
            ..TalentQuery::default()
        };
        assert!(combined.matches(&user));
    }

    #[test]
    fn test_unlisted_accounts_never_match() {
        let mut user = talent("Ana Ruiz", "Drama", "Austin, TX", TalentRole::Acting);
        user.is_active = false;
        assert!(!TalentQuery::default().matches(&user));
    }

    #[test]
    fn test_params_conversion() {
        let params = TalentListParams {
            role: Some("all".into()),
            category: Some("Drama".into()),
            search: Some("".into()),
            limit: Some(500),
            ..TalentListParams::default()
        };
        let query = TalentQuery::try_from(params).unwrap();
        assert_eq!(query.role, Filter::Any);
        assert_eq!(query.category, Filter::Only("Drama".into()));
        assert_eq!(query.search, Filter::Any);
        assert_eq!(query.page.limit, 100);

        let params = TalentListParams {
            role: Some("dancer".into()),
            ..TalentListParams::default()
        };
        assert!(TalentQuery::try_from(params).is_err());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_off\\"), "100\\%\\_off\\\\");
        assert_eq!(contains_pattern("sound"), "%sound%");
    }
}
