//! Filter and pagination parameters for content store list queries.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};

/// A logical content query, before it is turned into request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentQuery {
    content_type: Option<String>,
    parent_id: Option<String>,
    sort: Option<String>,
    skip: Option<u32>,
    take: Option<u32>,
    published_before: Option<DateTime<Utc>>,
}

/// A media library query. Unlike content queries it may be unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaQuery {
    media_type: Option<String>,
    sort: Option<String>,
    skip: Option<u32>,
    take: Option<u32>,
}

/// Path and query parameters ready to be sent to the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl QueryRequest {
    /// The combined filter expression, if any.
    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.param("filter")
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl ContentQuery {
    /// Query all items of a content type.
    #[must_use]
    pub fn by_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            ..Self::default()
        }
    }

    /// Query the children of a parent item.
    #[must_use]
    pub fn children_of(parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn take(mut self, take: u32) -> Self {
        self.take = Some(take);
        self
    }

    /// Skip the first `skip` results.
    #[must_use]
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Sort expression in delivery API syntax, e.g. `updateDate:desc`.
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub fn published_before(mut self, cutoff: DateTime<Utc>) -> Self {
        self.published_before = Some(cutoff);
        self
    }

    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Build request parameters using the current time as the default cutoff.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if neither a content type nor a
    /// parent is set, or if `take` is zero.
    pub fn build(&self) -> Result<QueryRequest> {
        self.build_at(Utc::now())
    }

    /// Build request parameters, using `now` as the default cutoff for
    /// children queries.
    ///
    /// # Errors
    ///
    /// See [`ContentQuery::build`].
    pub fn build_at(&self, now: DateTime<Utc>) -> Result<QueryRequest> {
        if self.content_type.is_none() && self.parent_id.is_none() {
            return Err(Error::InvalidArgument(
                "content query needs a content type or a parent id".to_string(),
            ));
        }
        if self.take == Some(0) {
            return Err(Error::InvalidArgument(
                "take must be a positive integer".to_string(),
            ));
        }

        let mut clauses = Vec::new();
        if let Some(content_type) = &self.content_type {
            clauses.push(format!("contentType:{content_type}"));
        }

        // Children published in the future are excluded unless the caller
        // picks another cutoff.
        let cutoff = match (&self.parent_id, self.published_before) {
            (_, Some(cutoff)) => Some(cutoff),
            (Some(_), None) => Some(now),
            (None, None) => None,
        };
        if let Some(cutoff) = cutoff {
            clauses.push(format!(
                "publishDate:[* TO {}]",
                cutoff.to_rfc3339_opts(SecondsFormat::Millis, true)
            ));
        }

        let mut params = Vec::new();
        if !clauses.is_empty() {
            params.push(("filter".to_string(), clauses.join(" AND ")));
        }
        push_paging(&mut params, self.sort.as_deref(), self.skip, self.take);

        let path = match &self.parent_id {
            Some(parent_id) => format!(
                "/content/item/{}/children",
                urlencoding::encode(parent_id)
            ),
            None => "/content".to_string(),
        };

        Ok(QueryRequest { path, params })
    }
}

impl MediaQuery {
    /// Query all media items.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Query media items of one media type, e.g. `Image`.
    #[must_use]
    pub fn by_type(media_type: impl Into<String>) -> Self {
        Self {
            media_type: Some(media_type.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn take(mut self, take: u32) -> Self {
        self.take = Some(take);
        self
    }

    #[must_use]
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Build request parameters for the media list endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `take` is zero.
    pub fn build(&self) -> Result<QueryRequest> {
        if self.take == Some(0) {
            return Err(Error::InvalidArgument(
                "take must be a positive integer".to_string(),
            ));
        }

        let mut params = Vec::new();
        if let Some(media_type) = &self.media_type {
            params.push(("filter".to_string(), format!("mediaType:{media_type}")));
        }
        push_paging(&mut params, self.sort.as_deref(), self.skip, self.take);

        Ok(QueryRequest {
            path: "/media".to_string(),
            params,
        })
    }
}

fn push_paging(
    params: &mut Vec<(String, String)>,
    sort: Option<&str>,
    skip: Option<u32>,
    take: Option<u32>,
) {
    if let Some(sort) = sort {
        params.push(("sort".to_string(), sort.to_string()));
    }
    if let Some(skip) = skip {
        params.push(("skip".to_string(), skip.to_string()));
    }
    if let Some(take) = take {
        params.push(("take".to_string(), take.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_by_type() {
        let request = ContentQuery::by_type("homePage").build_at(fixed_now()).unwrap();
        assert_eq!(request.path, "/content");
        assert_eq!(request.filter(), Some("contentType:homePage"));
        assert_eq!(request.param("take"), None);
    }

    #[test]
    fn test_children_default_cutoff_is_now() {
        let request = ContentQuery::children_of("parent-1")
            .build_at(fixed_now())
            .unwrap();
        assert_eq!(request.path, "/content/item/parent-1/children");
        assert_eq!(
            request.filter(),
            Some("publishDate:[* TO 2024-03-15T12:30:00.000Z]")
        );
    }

    #[test]
    fn test_children_with_type_and_take() {
        let cutoff = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let request = ContentQuery::children_of("parent-1")
            .with_content_type("newsItem")
            .take(5)
            .published_before(cutoff)
            .build_at(fixed_now())
            .unwrap();
        assert_eq!(
            request.filter(),
            Some("contentType:newsItem AND publishDate:[* TO 2023-01-01T00:00:00.000Z]")
        );
        assert_eq!(request.param("take"), Some("5"));
    }

    #[test]
    fn test_explicit_cutoff_on_type_query() {
        let cutoff = Utc.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).unwrap();
        let request = ContentQuery::by_type("newsItem")
            .published_before(cutoff)
            .build_at(fixed_now())
            .unwrap();
        assert_eq!(
            request.filter(),
            Some("contentType:newsItem AND publishDate:[* TO 2023-06-01T08:00:00.000Z]")
        );
    }

    #[test]
    fn test_parent_id_is_encoded() {
        let request = ContentQuery::children_of("a b/c").build_at(fixed_now()).unwrap();
        assert_eq!(request.path, "/content/item/a%20b%2Fc/children");
    }

    #[test]
    fn test_rejects_empty_query() {
        assert!(matches!(
            ContentQuery::default().build_at(fixed_now()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_sort_and_skip() {
        let request = ContentQuery::by_type("newsItem")
            .sort("updateDate:desc")
            .skip(20)
            .take(10)
            .build_at(fixed_now())
            .unwrap();
        assert_eq!(
            request.params,
            vec![
                ("filter".to_string(), "contentType:newsItem".to_string()),
                ("sort".to_string(), "updateDate:desc".to_string()),
                ("skip".to_string(), "20".to_string()),
                ("take".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_media_query_by_type() {
        let request = MediaQuery::by_type("Image").take(3).build().unwrap();
        assert_eq!(request.path, "/media");
        assert_eq!(request.filter(), Some("mediaType:Image"));
        assert_eq!(request.param("take"), Some("3"));
        assert_eq!(request.param("skip"), None);
    }

    #[test]
    fn test_media_query_unfiltered() {
        let request = MediaQuery::all().build().unwrap();
        assert_eq!(request.path, "/media");
        assert!(request.params.is_empty());
        assert!(matches!(
            MediaQuery::all().take(0).build(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_zero_take() {
        assert!(matches!(
            ContentQuery::by_type("news").take(0).build_at(fixed_now()),
            Err(Error::InvalidArgument(_))
        ));
    }
}
