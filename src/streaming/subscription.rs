//! Per-topic subscriptions and update decoding.

use std::fmt;

use serde_json::{Map, Value};
use tracing::warn;

use crate::streaming::transport::{RawItemUpdate, SubscriptionListener};

/// Subscription mode on the push transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionMode {
    /// Updates merge into the latest item state.
    Merge,
    /// Every update is delivered individually.
    Distinct,
    /// Updates are relayed without server-side processing.
    Raw,
    /// Add/update/delete command stream.
    Command,
}

impl SubscriptionMode {
    /// Get the transport's string representation for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionMode::Merge => "MERGE",
            SubscriptionMode::Distinct => "DISTINCT",
            SubscriptionMode::Raw => "RAW",
            SubscriptionMode::Command => "COMMAND",
        }
    }
}

impl fmt::Display for SubscriptionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one subscription: mode, items and the ordered field
/// list the transport will deliver values for.
#[derive(Debug, Clone)]
pub struct SubscriptionSpec {
    mode: SubscriptionMode,
    items: Vec<String>,
    fields: Vec<String>,
}

impl SubscriptionSpec {
    /// Create a subscription spec.
    pub fn new(mode: SubscriptionMode, items: &[&str], fields: &[&str]) -> Self {
        Self {
            mode,
            items: items.iter().map(|s| s.to_string()).collect(),
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The subscription mode.
    pub fn mode(&self) -> SubscriptionMode {
        self.mode
    }

    /// Subscribed item names, in subscription order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Declared field names, in subscription order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// A decoded item update.
///
/// Field values arrive from the transport as encoded strings; decoding
/// parses each declared field as JSON, so numeric fields come out as
/// numbers and structured fields as objects. The map preserves the
/// declaration order of the subscription's fields.
#[derive(Debug, Clone)]
pub struct ItemUpdate {
    name: String,
    fields: Map<String, Value>,
    raw: RawItemUpdate,
}

impl ItemUpdate {
    /// Item name with the topic prefix stripped.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decoded field values, keyed in field-declaration order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Decoded value for one field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The update as delivered by the transport.
    pub fn raw(&self) -> &RawItemUpdate {
        &self.raw
    }
}

/// Optional per-subscription callback hooks.
///
/// Each hook is independently optional; an absent hook costs nothing at
/// dispatch time.
#[derive(Default)]
pub struct SubscriptionCallbacks {
    pub(crate) subscription: Option<Box<dyn Fn() + Send + Sync>>,
    pub(crate) unsubscription: Option<Box<dyn Fn() + Send + Sync>>,
    pub(crate) subscription_error: Option<Box<dyn Fn(i32, &str) + Send + Sync>>,
    pub(crate) item_update: Option<Box<dyn Fn(&ItemUpdate) + Send + Sync>>,
}

impl SubscriptionCallbacks {
    /// Create an empty hook set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the subscription becomes active.
    pub fn on_subscription(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.subscription = Some(Box::new(f));
        self
    }

    /// Called when the subscription is torn down.
    pub fn on_unsubscription(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.unsubscription = Some(Box::new(f));
        self
    }

    /// Called when the server rejects the subscription.
    pub fn on_subscription_error(
        mut self,
        f: impl Fn(i32, &str) + Send + Sync + 'static,
    ) -> Self {
        self.subscription_error = Some(Box::new(f));
        self
    }

    /// Called with each decoded item update.
    pub fn on_item_update(
        mut self,
        f: impl Fn(&ItemUpdate) + Send + Sync + 'static,
    ) -> Self {
        self.item_update = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for SubscriptionCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionCallbacks")
            .field("subscription", &self.subscription.is_some())
            .field("unsubscription", &self.unsubscription.is_some())
            .field("subscription_error", &self.subscription_error.is_some())
            .field("item_update", &self.item_update.is_some())
            .finish()
    }
}

/// Adapter handed to the transport: relays subscription events to the
/// caller's hooks and decodes raw updates on the way through.
pub(crate) struct DecodingListener {
    fields: Vec<String>,
    callbacks: SubscriptionCallbacks,
}

impl DecodingListener {
    pub(crate) fn new(fields: Vec<String>, callbacks: SubscriptionCallbacks) -> Self {
        Self { fields, callbacks }
    }
}

impl SubscriptionListener for DecodingListener {
    fn on_subscription(&self) {
        if let Some(hook) = &self.callbacks.subscription {
            hook();
        }
    }

    fn on_unsubscription(&self) {
        if let Some(hook) = &self.callbacks.unsubscription {
            hook();
        }
    }

    fn on_subscription_error(&self, code: i32, message: &str) {
        if let Some(hook) = &self.callbacks.subscription_error {
            hook(code, message);
        }
    }

    fn on_item_update(&self, update: &RawItemUpdate) {
        if let Some(hook) = &self.callbacks.item_update {
            hook(&decode_update(&self.fields, update));
        }
    }
}

/// Decode one raw update against the declared field list.
///
/// A field whose value fails to parse as JSON is dropped from that
/// update alone, with a warning; sibling fields and later updates are
/// unaffected. A field that carried no value decodes to `null`.
fn decode_update(fields: &[String], raw: &RawItemUpdate) -> ItemUpdate {
    let name = strip_topic_prefix(raw.item_name()).to_string();

    let mut decoded = Map::new();
    for field in fields {
        match raw.value(field) {
            None => {
                decoded.insert(field.clone(), Value::Null);
            }
            Some(encoded) => match serde_json::from_str(encoded) {
                Ok(value) => {
                    decoded.insert(field.clone(), value);
                }
                Err(error) => {
                    warn!(item = %name, field = %field, %error, "dropping undecodable field value");
                }
            },
        }
    }

    ItemUpdate {
        name,
        fields: decoded,
        raw: raw.clone(),
    }
}

/// Recover the caller-meaningful item identifier from a topic-prefixed
/// name: split on `:`, keep the final segment.
fn strip_topic_prefix(item_name: &str) -> &str {
    item_name.split(':').next_back().unwrap_or(item_name)
}
