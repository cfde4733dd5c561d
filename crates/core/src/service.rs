//! The aggregation read path: snapshot, sequence, resolve.

use std::sync::Arc;

use crate::cache::Cacher;
use crate::content::ContentItem;
use crate::error::Error;
use crate::sequence::{Sequencer, page_bounds};

/// Produces pages of mixed content from a cache and a sequencer.
#[derive(Clone)]
pub struct Service {
    cacher: Arc<dyn Cacher>,
    sequencer: Arc<dyn Sequencer>,
}

impl Service {
    pub fn new(cacher: Arc<dyn Cacher>, sequencer: Arc<dyn Sequencer>) -> Self {
        Self { cacher, sequencer }
    }

    /// Content items for `[offset, offset + limit)` of the mixed feed.
    ///
    /// Sequencing and resolution use the same snapshot. Addresses beyond what a
    /// provider currently holds are skipped, so the page may be shorter than `limit`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for a negative `limit` or `offset`, and
    /// whatever the sequencer reports otherwise.
    pub fn content_items(&self, limit: i64, offset: i64) -> Result<Vec<Arc<ContentItem>>, Error> {
        tracing::debug!(limit, offset, "content items requested");

        page_bounds(limit, offset)?;

        // The snapshot reports its item counts, so the sequencer never walks past
        // what it could resolve, however large `limit` is.
        let state = self.cacher.state();
        let addresses = self.sequencer.sequence(&state, limit, offset)?;

        let items: Vec<_> = addresses.iter().filter_map(|addr| state.content_item(addr)).collect();

        tracing::debug!(limit, offset, addresses = addresses.len(), items = items.len(), "content items resolved");

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::State;
    use crate::content::{ContentAddress, Provider};
    use crate::sequence::{ConfiguredSequencer, MixEntry, ProviderHealth};
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct FixedSequencer(Result<Vec<ContentAddress>, Error>);

    impl Sequencer for FixedSequencer {
        fn sequence(&self, _: &dyn ProviderHealth, _: i64, _: i64) -> Result<Vec<ContentAddress>, Error> {
            self.0.clone()
        }
    }

    /// Records the failing set it was asked about, to check which snapshot it saw.
    struct HealthProbe(Mutex<Vec<bool>>);

    impl Sequencer for HealthProbe {
        fn sequence(&self, health: &dyn ProviderHealth, _: i64, _: i64) -> Result<Vec<ContentAddress>, Error> {
            self.0.lock().unwrap().push(health.fails(&Provider::new("p1")));
            Ok(vec![ContentAddress::new("p1", 0)])
        }
    }

    struct FixedCacher(State);

    impl Cacher for FixedCacher {
        fn state(&self) -> State {
            self.0.clone()
        }
    }

    fn item(id: &str) -> ContentItem {
        ContentItem {
            id: id.into(),
            title: "title".into(),
            source: "test".into(),
            summary: String::new(),
            link: String::new(),
            expiry: Utc::now(),
        }
    }

    fn three_addresses() -> Vec<ContentAddress> {
        vec![ContentAddress::new("p1", 0), ContentAddress::new("p2", 0), ContentAddress::new("p1", 1)]
    }

    fn service(state: State, sequencer: impl Sequencer + 'static) -> Service {
        Service::new(Arc::new(FixedCacher(state)), Arc::new(sequencer))
    }

    fn ids(items: &[Arc<ContentItem>]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn test_resolves_in_sequence_order() {
        let state = State::new().with_items("p1", vec![item("p1-0"), item("p1-1")]).with_items("p2", vec![item("p2-0")]);
        let items = service(state, FixedSequencer(Ok(three_addresses()))).content_items(10, 0).unwrap();

        assert_eq!(ids(&items), ["p1-0", "p2-0", "p1-1"]);
    }

    #[test]
    fn test_skips_missing_items() {
        let state = State::new().with_items("p1", vec![item("p1-0")]).with_items("p2", vec![item("p2-0")]);
        let items = service(state, FixedSequencer(Ok(three_addresses()))).content_items(10, 0).unwrap();

        assert_eq!(ids(&items), ["p1-0", "p2-0"]);
    }

    #[test]
    fn test_provider_without_items_yields_nothing() {
        let state = State::new().with_items("p1", Vec::new());
        let items = service(state, FixedSequencer(Ok(three_addresses()))).content_items(10, 0).unwrap();

        assert!(items.is_empty());
    }

    #[test]
    fn test_sequencer_error_propagates() {
        let state = State::new().with_items("p1", vec![item("p1-0")]);
        let result = service(state, FixedSequencer(Err(Error::Internal("some error".into())))).content_items(10, 0);

        assert_eq!(result, Err(Error::Internal("some error".into())));
    }

    #[test]
    fn test_negative_limit_rejected() {
        let state = State::new().with_items("p1", vec![item("p1-0")]);
        let result = service(state, FixedSequencer(Ok(vec![ContentAddress::new("p1", 0)]))).content_items(-1, 0);

        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_negative_offset_rejected() {
        let state = State::new().with_items("p1", vec![item("p1-0")]);
        let result = service(state, FixedSequencer(Ok(vec![ContentAddress::new("p1", 0)]))).content_items(10, -1);

        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_huge_limit_returns_each_cached_item_once() {
        let stock = |provider: &str| (0..10).map(|i| item(&format!("{provider}-{i}"))).collect::<Vec<_>>();
        let state = State::new().with_items("1", stock("1")).with_items("2", stock("2")).with_items("3", stock("3"));
        let sequencer = ConfiguredSequencer::new(vec![
            MixEntry::new("1", Some("2")),
            MixEntry::new("1", None),
            MixEntry::new("2", Some("3")),
            MixEntry::new("3", None),
        ])
        .unwrap();

        let items = service(state, sequencer).content_items(i64::MAX, 0).unwrap();

        let unique: HashSet<&str> = ids(&items).into_iter().collect();
        assert_eq!(items.len(), 30);
        assert_eq!(unique.len(), 30);
    }

    #[test]
    fn test_sequences_against_resolved_snapshot() {
        let state = State::new().with_items("p1", vec![item("stale")]).with_failing("p1");
        let probe = Arc::new(HealthProbe(Mutex::new(Vec::new())));
        let service = Service::new(Arc::new(FixedCacher(state)), probe.clone());

        let items = service.content_items(1, 0).unwrap();

        assert_eq!(*probe.0.lock().unwrap(), [true]);
        assert_eq!(ids(&items), ["stale"]);
    }
}
