//! Preference dependency graph
//!
//! Preferences live in an arena and reference each other by [`NodeId`].
//! Each non-section node is bound to a key of the working [`SettingsMap`].
//! Committing a value writes it to the map, validates it (rolling back on
//! rejection), then re-evaluates every node gated on the committed one.

pub mod editor;
pub mod refresh;
pub mod tab_policy;

use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, info};

use crate::profile::events::{EventBus, SubscriptionId};
use crate::settings::SettingsMap;
use tab_policy::{Bindings, TabPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Groups child preferences; `preview_key` addresses its snippet
    Section { preview_key: Option<String> },
    Checkbox { on: String, off: String },
    Number { min: i64, max: i64 },
    Combo { values: Vec<String> },
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Accept,
    /// Accept, but surface a note to the user
    Advise(String),
    Reject(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied { advisory: Option<String> },
    /// Same value as before, unknown node, or a section
    Unchanged,
    Rejected { reason: String },
}

impl CommitOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommitOutcome::Applied { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceEvent {
    ValueChanged { node: NodeId, key: String, value: String },
    EnablementChanged { node: NodeId, enabled: bool },
    KeyChanged { node: NodeId, key: String },
}

pub type Predicate = Rc<dyn Fn(&str) -> bool>;
pub type Validator = Rc<dyn Fn(&str, &PreferenceGraph) -> Validation>;

struct Dependant {
    target: NodeId,
    predicate: Predicate,
}

struct Node {
    label: String,
    key: Option<String>,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    dependants: Vec<Dependant>,
    /// Most recent predicate result per controlling node
    gates: BTreeMap<NodeId, bool>,
    enabled: bool,
    validator: Option<Validator>,
    observers: EventBus<PreferenceEvent>,
}

struct TabPolicyBinding {
    controller: NodeId,
    primary: NodeId,
    secondary: NodeId,
    policy: TabPolicy,
}

pub struct PreferenceGraph {
    nodes: Vec<Node>,
    settings: SettingsMap,
    tab_policy: Option<TabPolicyBinding>,
    values_changed: Option<Box<dyn FnMut(&PreferenceEvent)>>,
}

impl PreferenceGraph {
    /// Empty graph over `settings` with a single unlabeled root section
    pub fn new(settings: SettingsMap) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            settings,
            tab_policy: None,
            values_changed: None,
        };
        graph.push_node(None, String::new(), None, NodeKind::Section { preview_key: None });
        graph
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn push_node(&mut self, parent: Option<NodeId>, label: String, key: Option<String>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label,
            key,
            kind,
            parent,
            children: Vec::new(),
            dependants: Vec::new(),
            gates: BTreeMap::new(),
            enabled: true,
            validator: None,
            observers: EventBus::new(),
        });
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p.0)) {
            parent.children.push(id);
        }
        id
    }

    fn add(&mut self, parent: NodeId, label: &str, key: Option<&str>, kind: NodeKind) -> NodeId {
        let parent = if parent.0 < self.nodes.len() { parent } else { self.root() };
        self.push_node(Some(parent), label.to_string(), key.map(str::to_string), kind)
    }

    pub fn add_section(&mut self, parent: NodeId, label: &str, preview_key: Option<&str>) -> NodeId {
        let kind = NodeKind::Section {
            preview_key: preview_key.map(str::to_string),
        };
        self.add(parent, label, None, kind)
    }

    pub fn add_checkbox(&mut self, parent: NodeId, label: &str, key: &str, on: &str, off: &str) -> NodeId {
        let kind = NodeKind::Checkbox {
            on: on.to_string(),
            off: off.to_string(),
        };
        self.add(parent, label, Some(key), kind)
    }

    pub fn add_number(&mut self, parent: NodeId, label: &str, key: &str, min: i64, max: i64) -> NodeId {
        self.add(parent, label, Some(key), NodeKind::Number { min, max })
    }

    pub fn add_combo(&mut self, parent: NodeId, label: &str, key: &str, values: &[&str]) -> NodeId {
        let kind = NodeKind::Combo {
            values: values.iter().map(|v| v.to_string()).collect(),
        };
        self.add(parent, label, Some(key), kind)
    }

    pub fn add_text(&mut self, parent: NodeId, label: &str, key: &str) -> NodeId {
        self.add(parent, label, Some(key), NodeKind::Text)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.label.as_str())
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Key the node currently reads and writes
    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.key.as_deref()
    }

    /// Key used to look up the node's preview snippet
    pub fn preview_key(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Section { preview_key } => preview_key.as_deref(),
            _ => node.key.as_deref(),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn find_by_key(&self, key: &str) -> Option<NodeId> {
        self.node_ids().find(|&id| self.key(id) == Some(key))
    }

    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        self.node_ids().find(|&id| self.label(id) == Some(label))
    }

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.settings.get(self.key(id)?)
    }

    pub fn settings(&self) -> &SettingsMap {
        &self.settings
    }

    pub fn into_settings(self) -> SettingsMap {
        self.settings
    }

    /// The node's own flag: AND of every gate registered against it
    pub fn node_enabled(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.enabled)
    }

    /// Effective enablement, false when any ancestor is disabled
    pub fn is_enabled(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.node(c)) {
            if !node.enabled {
                return false;
            }
            current = node.parent;
        }
        self.node(id).is_some()
    }

    pub fn set_validator(&mut self, id: NodeId, validator: impl Fn(&str, &PreferenceGraph) -> Validation + 'static) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.validator = Some(Rc::new(validator));
        }
    }

    /// Invoked after every applied commit
    pub fn set_values_changed(&mut self, callback: impl FnMut(&PreferenceEvent) + 'static) {
        self.values_changed = Some(Box::new(callback));
    }

    pub fn observe(&mut self, id: NodeId, callback: impl FnMut(&PreferenceEvent) + 'static) -> Option<SubscriptionId> {
        self.nodes
            .get_mut(id.0)
            .map(|node| node.observers.subscribe(callback))
    }

    pub fn unobserve(&mut self, id: NodeId, subscription: SubscriptionId) -> bool {
        self.nodes
            .get_mut(id.0)
            .is_some_and(|node| node.observers.unsubscribe(subscription))
    }

    fn notify(&mut self, id: NodeId, event: PreferenceEvent) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.observers.publish(&event);
        }
    }

    /// Gate `target` on `predicate(value of controller)`
    pub fn add_dependant(&mut self, controller: NodeId, target: NodeId, predicate: impl Fn(&str) -> bool + 'static) {
        if self.node(controller).is_none() || self.node(target).is_none() {
            return;
        }
        let predicate: Predicate = Rc::new(predicate);
        let result = predicate(self.value(controller).unwrap_or_default());
        self.nodes[controller.0].dependants.push(Dependant { target, predicate });
        self.set_gate(target, controller, result);
    }

    fn set_gate(&mut self, target: NodeId, controller: NodeId, open: bool) {
        let Some(node) = self.nodes.get_mut(target.0) else {
            return;
        };
        node.gates.insert(controller, open);
        let enabled = node.gates.values().all(|g| *g);
        if enabled != node.enabled {
            node.enabled = enabled;
            debug!(node = ?target, label = %node.label, enabled, "Preference enablement changed");
            self.notify(target, PreferenceEvent::EnablementChanged { node: target, enabled });
        }
    }

    fn refresh_dependants(&mut self, controller: NodeId) {
        let value = self.value(controller).unwrap_or_default().to_string();
        let dependants: Vec<(NodeId, Predicate)> = match self.node(controller) {
            Some(node) => node
                .dependants
                .iter()
                .map(|d| (d.target, Rc::clone(&d.predicate)))
                .collect(),
            None => return,
        };
        for (target, predicate) in dependants {
            let open = predicate(&value);
            self.set_gate(target, controller, open);
        }
    }

    fn check_kind(&self, id: NodeId, value: &str) -> Validation {
        match self.kind(id) {
            Some(NodeKind::Number { min, max }) => match value.trim().parse::<i64>() {
                Ok(n) if (*min..=*max).contains(&n) => Validation::Accept,
                _ => Validation::Reject(format!("'{value}' is not a number between {min} and {max}")),
            },
            Some(NodeKind::Combo { values }) if !values.iter().any(|v| v.eq_ignore_ascii_case(value)) => {
                Validation::Reject(format!("'{value}' is not one of {}", values.join(", ")))
            }
            Some(NodeKind::Checkbox { on, off }) if value != on && value != off => {
                Validation::Reject(format!("'{value}' must be '{on}' or '{off}'"))
            }
            _ => Validation::Accept,
        }
    }

    /// Combo options match case-insensitively; the option's own spelling is
    /// what gets stored
    fn canonical_token(&self, id: NodeId, value: &str) -> String {
        match self.kind(id) {
            Some(NodeKind::Combo { values }) => values
                .iter()
                .find(|v| v.eq_ignore_ascii_case(value))
                .cloned()
                .unwrap_or_else(|| value.to_string()),
            _ => value.to_string(),
        }
    }

    fn validate(&self, id: NodeId, value: &str) -> Validation {
        let verdict = self.check_kind(id, value);
        if verdict != Validation::Accept {
            return verdict;
        }
        match self.node(id).and_then(|n| n.validator.clone()) {
            Some(validator) => validator(value, self),
            None => Validation::Accept,
        }
    }

    /// Write `value` under the node's key, validate, and cascade
    pub fn commit_value(&mut self, id: NodeId, value: &str) -> CommitOutcome {
        let Some(key) = self.key(id).map(str::to_string) else {
            return CommitOutcome::Unchanged;
        };
        let value = self.canonical_token(id, value);
        let value = value.as_str();
        if self.settings.get(&key) == Some(value) {
            return CommitOutcome::Unchanged;
        }

        let previous = self.settings.insert(key.clone(), value);
        let advisory = match self.validate(id, value) {
            Validation::Reject(reason) => {
                match previous {
                    Some(previous) => self.settings.insert(key.clone(), previous),
                    None => self.settings.remove(&key),
                };
                info!(key = %key, value, reason = %reason, "Rejected preference value");
                return CommitOutcome::Rejected { reason };
            }
            Validation::Advise(message) => {
                info!(key = %key, value, advisory = %message, "Preference value accepted with advisory");
                Some(message)
            }
            Validation::Accept => None,
        };

        let mut touched = vec![id];
        if self.tab_policy.as_ref().is_some_and(|b| b.controller == id) {
            touched.extend(self.apply_tab_policy(value));
        }
        for node in touched {
            self.refresh_dependants(node);
        }

        let event = PreferenceEvent::ValueChanged {
            node: id,
            key,
            value: value.to_string(),
        };
        self.notify(id, event.clone());
        if let Some(callback) = self.values_changed.as_mut() {
            callback(&event);
        }

        CommitOutcome::Applied { advisory }
    }

    /// Let `controller` (a tab policy combo) drive which keys `primary` and
    /// `secondary` are bound to. The nodes keep their current keys until the
    /// policy changes.
    pub fn bind_tab_policy(&mut self, controller: NodeId, primary: NodeId, secondary: NodeId) {
        let policy = self
            .value(controller)
            .and_then(TabPolicy::parse)
            .unwrap_or(TabPolicy::Tab);
        self.set_gate(secondary, controller, tab_policy::secondary_enabled(policy));
        self.tab_policy = Some(TabPolicyBinding {
            controller,
            primary,
            secondary,
            policy,
        });
    }

    pub fn tab_policy(&self) -> Option<TabPolicy> {
        self.tab_policy.as_ref().map(|b| b.policy)
    }

    fn rebind(&mut self, id: NodeId, key: &str) -> bool {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return false;
        };
        if node.key.as_deref() == Some(key) {
            return false;
        }
        node.key = Some(key.to_string());
        self.notify(id, PreferenceEvent::KeyChanged { node: id, key: key.to_string() });
        true
    }

    /// Returns the nodes whose binding changed
    fn apply_tab_policy(&mut self, value: &str) -> Vec<NodeId> {
        let Some(new_policy) = TabPolicy::parse(value) else {
            return Vec::new();
        };
        let Some((old_policy, primary, secondary, controller)) = self
            .tab_policy
            .as_ref()
            .map(|b| (b.policy, b.primary, b.secondary, b.controller))
        else {
            return Vec::new();
        };

        let current = Bindings {
            primary: self.key(primary).unwrap_or_default().to_string(),
            secondary: self.key(secondary).unwrap_or_default().to_string(),
        };
        let step = tab_policy::transition(old_policy, new_policy, &current);

        if step.swap_values {
            self.settings.swap_values(&current.primary, &current.secondary);
        }
        let mut rebound = Vec::new();
        if self.rebind(primary, &step.bindings.primary) {
            rebound.push(primary);
        }
        if self.rebind(secondary, &step.bindings.secondary) {
            rebound.push(secondary);
        }
        self.set_gate(secondary, controller, step.secondary_enabled);

        if let Some(binding) = self.tab_policy.as_mut() {
            binding.policy = step.policy;
        }
        debug!(
            from = old_policy.as_str(),
            to = step.policy.as_str(),
            swapped = step.swap_values,
            "Applied tab policy transition"
        );
        rebound
    }
}
