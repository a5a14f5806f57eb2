use std::collections::BTreeMap;

use tokio_util::sync::CancellationToken;

use crate::app::cloud::ResourceType;

/// Values carried through one fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    region: String,
    force: bool,
    filters: BTreeMap<String, String>,
    cancel: CancellationToken,
    by_type: Option<ResourceType>,
}

impl FetchContext {
    pub fn new(region: impl Into<String>) -> Self {
        FetchContext {
            region: region.into(),
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Fetch even the types whose sync is disabled.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Parses `key=value` filters. Entries without `=` are ignored.
    pub fn with_filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for filter in filters {
            match filter.as_ref().split_once('=') {
                Some((key, value)) => {
                    self.filters.insert(key.trim().to_string(), value.trim().to_string());
                }
                None => log_warn!("ignoring malformed filter '{}'", filter.as_ref()),
            }
        }
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub(crate) fn fetching_type(mut self, kind: ResourceType) -> Self {
        self.by_type = Some(kind);
        self
    }

    /// Copy whose token is a child of this one, for fan-outs that cancel their peers.
    pub fn child(&self) -> Self {
        FetchContext {
            cancel: self.cancel.child_token(),
            ..self.clone()
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The single type being fetched, when called through `fetch_by_type`.
    pub fn by_type(&self) -> Option<ResourceType> {
        self.by_type
    }

    pub fn is_fetching_by_type(&self) -> bool {
        self.by_type.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filters_are_parsed() {
        let ctx = FetchContext::new("eu-west-1").with_filters(["zone=my.domain", "bogus", "name = web"]);
        assert_eq!(ctx.filter("zone"), Some("my.domain"));
        assert_eq!(ctx.filter("name"), Some("web"));
        assert_eq!(ctx.filters().len(), 2);
    }

    #[test]
    fn test_child_cancellation() {
        let parent = FetchContext::new("eu-west-1");
        let child = parent.child();
        child.cancellation().cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());

        let child = parent.child();
        parent.cancellation().cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_fetching_by_type() {
        let ctx = FetchContext::new("eu-west-1");
        assert!(!ctx.is_fetching_by_type());
        let ctx = ctx.fetching_type(ResourceType::User);
        assert_eq!(ctx.by_type(), Some(ResourceType::User));
    }
}
