use crate::models::{pagination::DEFAULT_LIMIT, PageRequest, TalentRole, UnknownVariant};
use crate::search::{parse_selection, Filter};

/// Filter selections of the talent explore page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TalentFilters {
    pub role: Filter<TalentRole>,
    pub category: Filter<String>,
    pub location: Filter<String>,
    pub search: Filter<String>,
    pub page: PageRequest,
}

impl TalentFilters {
    /// Builds filters from raw select/search values. `all` and blank values
    /// leave a field unconstrained.
    pub fn from_selections(
        role: &str,
        category: &str,
        location: &str,
        search: &str,
    ) -> Result<Self, UnknownVariant> {
        Ok(Self {
            role: parse_selection(Some(role))?,
            category: Filter::from_selection(Some(category)),
            location: Filter::from_selection(Some(location)),
            search: Filter::from_selection(Some(search)),
            page: PageRequest::default(),
        })
    }

    /// Same criteria, different page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page.page = page.max(1);
        self
    }

    /// Query parameters for `GET /api/talents`. Unconstrained fields and
    /// default paging are left out.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Filter::Only(role) = &self.role {
            params.push(("role", role.to_string()));
        }
        for (key, filter) in [
            ("category", &self.category),
            ("location", &self.location),
            ("search", &self.search),
        ] {
            if let Filter::Only(value) = filter {
                params.push((key, value.clone()));
            }
        }
        if self.page.page > 1 {
            params.push(("page", self.page.page.to_string()));
        }
        if self.page.limit != DEFAULT_LIMIT {
            params.push(("limit", self.page.limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_sentinels_produce_no_params() {
        let filters = TalentFilters::from_selections("all", "all", "", "   ").unwrap();
        assert_eq!(filters, TalentFilters::default());
        assert!(filters.to_query_params().is_empty());
    }

    #[test]
    fn test_role_all_is_omitted_with_other_filters() {
        let filters = TalentFilters::from_selections("all", "Sound Design", "all", "foley").unwrap();
        assert_eq!(
            filters.to_query_params(),
            vec![
                ("category", "Sound Design".to_string()),
                ("search", "foley".to_string()),
            ]
        );
    }

    #[test]
    fn test_full_selection_keeps_order() {
        let filters = TalentFilters::from_selections("Acting", "Drama", "London", "stage")
            .unwrap()
            .with_page(3);
        assert_eq!(
            filters.to_query_params(),
            vec![
                ("role", "acting".to_string()),
                ("category", "Drama".to_string()),
                ("location", "London".to_string()),
                ("search", "stage".to_string()),
                ("page", "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(TalentFilters::from_selections("dancer", "all", "all", "").is_err());
    }
}
