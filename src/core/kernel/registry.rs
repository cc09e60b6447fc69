use std::collections::HashMap;
use uuid::Uuid;

/// Where a topic stands between the request and the exchange's acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Subscribe message sent, no acknowledgement yet
    Pending,
    /// Acknowledged by the exchange
    Active,
}

#[derive(Debug, Clone)]
struct Subscription<H> {
    handler: Option<H>,
    state: SubscriptionState,
    seq: u64,
    request_id: String,
}

/// A control message the caller must send for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRequest {
    pub topic: String,
    pub id: String,
}

/// Topic table of one WebSocket connection
///
/// Holds at most one entry per topic. Handlers are generic so the table can
/// be exercised without a socket.
#[derive(Debug)]
pub struct SubscriptionRegistry<H> {
    topics: HashMap<String, Subscription<H>>,
    /// request id -> topic, for sub and unsub acknowledgements
    pending_ids: HashMap<String, String>,
    next_seq: u64,
}

impl<H> Default for SubscriptionRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> SubscriptionRegistry<H> {
    pub fn new() -> Self {
        Self {
            topics: HashMap::new(),
            pending_ids: HashMap::new(),
            next_seq: 0,
        }
    }

    fn new_request_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Register a topic.
    ///
    /// Returns the request to send, or `None` when the topic is already
    /// present. A duplicate call keeps the existing handler; use
    /// [`Self::replace_handler`] to swap it.
    pub fn subscribe(&mut self, topic: &str, handler: Option<H>) -> Option<ControlRequest> {
        if self.topics.contains_key(topic) {
            return None;
        }

        let id = Self::new_request_id();
        self.topics.insert(
            topic.to_string(),
            Subscription {
                handler,
                state: SubscriptionState::Pending,
                seq: self.next_seq,
                request_id: id.clone(),
            },
        );
        self.next_seq += 1;
        self.pending_ids.insert(id.clone(), topic.to_string());

        Some(ControlRequest {
            topic: topic.to_string(),
            id,
        })
    }

    /// Swap the handler of a registered topic, returning the previous one.
    pub fn replace_handler(&mut self, topic: &str, handler: Option<H>) -> Option<H> {
        self.topics
            .get_mut(topic)
            .and_then(|sub| std::mem::replace(&mut sub.handler, handler))
    }

    /// Forget a topic. Returns the unsubscribe request, or `None` for an unknown topic.
    pub fn unsubscribe(&mut self, topic: &str) -> Option<ControlRequest> {
        let sub = self.topics.remove(topic)?;
        self.pending_ids.remove(&sub.request_id);

        let id = Self::new_request_id();
        self.pending_ids.insert(id.clone(), topic.to_string());
        Some(ControlRequest {
            topic: topic.to_string(),
            id,
        })
    }

    /// Mark a subscription active, matching by request id, or by topic when the reply has no id.
    ///
    /// Returns the topic that was acknowledged.
    pub fn acknowledge(&mut self, id: Option<&str>, topic: Option<&str>) -> Option<String> {
        let topic = self.resolve(id, topic)?;
        if let Some(id) = id {
            self.pending_ids.remove(id);
        }
        let sub = self.topics.get_mut(&topic)?;
        self.pending_ids.remove(&sub.request_id);
        sub.state = SubscriptionState::Active;
        Some(topic)
    }

    /// Drop the bookkeeping of an unsubscribe acknowledgement.
    pub fn acknowledge_unsubscribe(&mut self, id: Option<&str>, topic: Option<&str>) -> Option<String> {
        match id {
            Some(id) => self.pending_ids.remove(id),
            None => topic.map(str::to_string),
        }
    }

    /// Remove a subscription the exchange rejected, returning its topic.
    pub fn fail(&mut self, id: Option<&str>, topic: Option<&str>) -> Option<String> {
        let topic = self.resolve(id, topic)?;
        if let Some(id) = id {
            self.pending_ids.remove(id);
        }
        let sub = self.topics.remove(&topic)?;
        self.pending_ids.remove(&sub.request_id);
        Some(topic)
    }

    /// An id that is no longer pending resolves to nothing; the topic is
    /// only consulted for replies without an id.
    fn resolve(&self, id: Option<&str>, topic: Option<&str>) -> Option<String> {
        match id {
            Some(id) => self.pending_ids.get(id).cloned(),
            None => topic.filter(|t| self.topics.contains_key(*t)).map(str::to_string),
        }
    }

    /// Every registered topic moved back to `Pending` with a fresh id, in
    /// the order they were first subscribed.
    pub fn replay(&mut self) -> Vec<ControlRequest> {
        self.pending_ids.clear();

        let mut entries: Vec<(&String, &mut Subscription<H>)> = self.topics.iter_mut().collect();
        entries.sort_by_key(|(_, sub)| sub.seq);

        let mut requests = Vec::with_capacity(entries.len());
        for (topic, sub) in entries {
            let id = Self::new_request_id();
            sub.state = SubscriptionState::Pending;
            sub.request_id = id.clone();
            self.pending_ids.insert(id.clone(), topic.clone());
            requests.push(ControlRequest {
                topic: topic.clone(),
                id,
            });
        }
        requests
    }

    /// Remove everything, returning unsubscribe requests in insertion order.
    pub fn drain(&mut self) -> Vec<ControlRequest> {
        let topics = self.topics();
        topics
            .iter()
            .filter_map(|topic| self.unsubscribe(topic))
            .collect()
    }

    pub fn handler(&self, topic: &str) -> Option<&H> {
        self.topics.get(topic).and_then(|sub| sub.handler.as_ref())
    }

    pub fn state(&self, topic: &str) -> Option<SubscriptionState> {
        self.topics.get(topic).map(|sub| sub.state)
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.topics.contains_key(topic)
    }

    /// Registered topics in insertion order.
    pub fn topics(&self) -> Vec<String> {
        let mut entries: Vec<(&String, u64)> =
            self.topics.iter().map(|(t, sub)| (t, sub.seq)).collect();
        entries.sort_by_key(|(_, seq)| *seq);
        entries.into_iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_subscribe_is_idempotent() {
        let mut registry = SubscriptionRegistry::new();
        let first = registry.subscribe("market.btcusdt.bbo", Some("first"));
        let second = registry.subscribe("market.btcusdt.bbo", Some("second"));

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.handler("market.btcusdt.bbo"), Some(&"first"));
    }

    #[test]
    fn test_replace_handler_is_explicit() {
        let mut registry = SubscriptionRegistry::new();
        registry.subscribe("market.btcusdt.bbo", Some(1));
        assert_eq!(registry.replace_handler("market.btcusdt.bbo", Some(2)), Some(1));
        assert_eq!(registry.handler("market.btcusdt.bbo"), Some(&2));
        assert_eq!(registry.replace_handler("market.ethusdt.bbo", Some(3)), None);
    }

    #[test]
    fn test_unsubscribe_unknown_topic_is_noop() {
        let mut registry: SubscriptionRegistry<()> = SubscriptionRegistry::new();
        assert!(registry.unsubscribe("market.nope.bbo").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut registry: SubscriptionRegistry<()> = SubscriptionRegistry::new();
        let a = registry.subscribe("a", None).unwrap();
        let b = registry.subscribe("b", None).unwrap();
        let c = registry.unsubscribe("a").unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_state_machine() {
        let mut registry: SubscriptionRegistry<()> = SubscriptionRegistry::new();
        let req = registry.subscribe("market.btcusdt.ticker", None).unwrap();
        assert_eq!(
            registry.state("market.btcusdt.ticker"),
            Some(SubscriptionState::Pending)
        );

        let acked = registry.acknowledge(Some(req.id.as_str()), None);
        assert_eq!(acked.as_deref(), Some("market.btcusdt.ticker"));
        assert_eq!(
            registry.state("market.btcusdt.ticker"),
            Some(SubscriptionState::Active)
        );

        let unsub = registry.unsubscribe("market.btcusdt.ticker").unwrap();
        assert_eq!(registry.state("market.btcusdt.ticker"), None);
        assert_eq!(
            registry.acknowledge_unsubscribe(Some(unsub.id.as_str()), None).as_deref(),
            Some("market.btcusdt.ticker")
        );
    }

    #[test]
    fn test_acknowledge_by_topic() {
        let mut registry: SubscriptionRegistry<()> = SubscriptionRegistry::new();
        registry.subscribe("orders#btcusdt", None);
        assert_eq!(
            registry.acknowledge(None, Some("orders#btcusdt")).as_deref(),
            Some("orders#btcusdt")
        );
        assert_eq!(
            registry.state("orders#btcusdt"),
            Some(SubscriptionState::Active)
        );
        assert!(registry.acknowledge(None, Some("orders#ethusdt")).is_none());
    }

    #[test]
    fn test_stale_ack_does_not_activate_resubscription() {
        let mut registry: SubscriptionRegistry<()> = SubscriptionRegistry::new();
        let first = registry.subscribe("market.btcusdt.bbo", None).unwrap();
        registry.unsubscribe("market.btcusdt.bbo");
        let second = registry.subscribe("market.btcusdt.bbo", None).unwrap();

        let acked = registry.acknowledge(Some(first.id.as_str()), Some("market.btcusdt.bbo"));
        assert_eq!(acked, None);
        assert_eq!(
            registry.state("market.btcusdt.bbo"),
            Some(SubscriptionState::Pending)
        );

        registry.acknowledge(Some(second.id.as_str()), Some("market.btcusdt.bbo"));
        assert_eq!(
            registry.state("market.btcusdt.bbo"),
            Some(SubscriptionState::Active)
        );
    }

    #[test]
    fn test_fail_removes_only_rejected_topic() {
        let mut registry: SubscriptionRegistry<()> = SubscriptionRegistry::new();
        let bad = registry.subscribe("market.bad.kline.1min", None).unwrap();
        registry.subscribe("market.btcusdt.kline.1min", None);

        assert_eq!(
            registry.fail(Some(bad.id.as_str()), None).as_deref(),
            Some("market.bad.kline.1min")
        );
        assert!(!registry.contains("market.bad.kline.1min"));
        assert!(registry.contains("market.btcusdt.kline.1min"));
    }

    #[test]
    fn test_replay_in_insertion_order_with_fresh_ids() {
        let mut registry: SubscriptionRegistry<()> = SubscriptionRegistry::new();
        let topics = [
            "market.ethusdt.detail",
            "market.btcusdt.bbo",
            "market.aaveusdt.trade.detail",
            "market.zecusdt.ticker",
        ];
        let mut first_ids = Vec::new();
        for topic in topics {
            let req = registry.subscribe(topic, None).unwrap();
            registry.acknowledge(Some(req.id.as_str()), None);
            first_ids.push(req.id);
        }
        registry.unsubscribe("market.btcusdt.bbo");

        let replayed = registry.replay();
        let order: Vec<&str> = replayed.iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "market.ethusdt.detail",
                "market.aaveusdt.trade.detail",
                "market.zecusdt.ticker"
            ]
        );
        for req in &replayed {
            assert!(!first_ids.contains(&req.id));
            assert_eq!(registry.state(&req.topic), Some(SubscriptionState::Pending));
        }

        assert_eq!(
            registry.acknowledge(Some(replayed[1].id.as_str()), None).as_deref(),
            Some("market.aaveusdt.trade.detail")
        );
    }

    #[test]
    fn test_drain_empties_registry() {
        let mut registry: SubscriptionRegistry<()> = SubscriptionRegistry::new();
        registry.subscribe("b", None);
        registry.subscribe("a", None);
        let drained = registry.drain();
        assert_eq!(
            drained.iter().map(|r| r.topic.as_str()).collect::<Vec<_>>(),
            vec!["b", "a"]
        );
        assert!(registry.is_empty());
    }
}
