//! Bidirectional action alias index.
//!
//! `add("modify", ["update", "delete"])` records both directions:
//! `modify → [update, delete]` and `update → [modify]`, `delete → [modify]`.
//! Both directions keep insertion order, which is the order aliases are tried
//! during evaluation.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    actions_by_alias: HashMap<String, Vec<String>>,
    aliases_by_action: HashMap<String, Vec<String>>,
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

fn remove_from(map: &mut HashMap<String, Vec<String>>, key: &str, value: &str) {
    if let Some(list) = map.get_mut(key) {
        list.retain(|v| v != value);
        if list.is_empty() {
            map.remove(key);
        }
    }
}

impl AliasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `alias` stand for each of `actions`.
    pub fn add<I>(&mut self, alias: &str, actions: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for action in actions {
            let action = action.as_ref();
            push_unique(self.actions_by_alias.entry(alias.to_string()).or_default(), action);
            push_unique(self.aliases_by_action.entry(action.to_string()).or_default(), alias);
        }
    }

    /// Remove `actions` from `alias`, or the whole alias when `actions` is
    /// `None`. An alias left with no actions is dropped.
    pub fn delete(&mut self, alias: &str, actions: Option<&[&str]>) {
        let targets: Vec<String> = match actions {
            Some(actions) => actions.iter().map(|a| a.to_string()).collect(),
            None => self.actions_by_alias.get(alias).cloned().unwrap_or_default(),
        };

        for action in &targets {
            remove_from(&mut self.actions_by_alias, alias, action);
            remove_from(&mut self.aliases_by_action, action, alias);
        }

        if actions.is_none() {
            self.actions_by_alias.remove(alias);
        }
    }

    pub fn clear(&mut self) {
        self.actions_by_alias.clear();
        self.aliases_by_action.clear();
    }

    /// Aliases that include `action`, in insertion order.
    pub fn aliases_of(&self, action: &str) -> &[String] {
        self.aliases_by_action
            .get(action)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Actions `alias` stands for, in insertion order.
    pub fn actions_of(&self, alias: &str) -> &[String] {
        self.actions_by_alias
            .get(alias)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.actions_by_alias.is_empty()
    }
}
