//! Free-text search over book titles and authors.

use libris_store::{Condition, Filter, Predicate};

use crate::core::error::CoreError;

/// Build the search filter: case-insensitive substring match on
/// `title` OR `author`. An empty or absent query is a bad request,
/// never a silent match-all or match-none.
pub fn title_author_filter(query: Option<&str>) -> Result<Filter, CoreError> {
    let query = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| CoreError::BadRequest("please provide a search query".to_string()))?;

    Ok(Filter::any(vec![
        Condition::new("title", Predicate::ContainsCi(query.to_string())),
        Condition::new("author", Predicate::ContainsCi(query.to_string())),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_or_blank_query_is_rejected() {
        assert!(matches!(
            title_author_filter(None),
            Err(CoreError::BadRequest(_))
        ));
        assert!(matches!(
            title_author_filter(Some("")),
            Err(CoreError::BadRequest(_))
        ));
        assert!(matches!(
            title_author_filter(Some("   ")),
            Err(CoreError::BadRequest(_))
        ));
    }

    #[test]
    fn filter_matches_title_or_author_substring() {
        let filter = title_author_filter(Some("dune")).unwrap();

        assert!(filter.matches(&json!({"title": "Dune", "author": "Frank Herbert"})));
        assert!(filter.matches(&json!({"title": "Sandworms", "author": "Frank Dune-ish"})));
        assert!(!filter.matches(&json!({"title": "Foundation", "author": "Isaac Asimov"})));
    }
}
