//! Tab policy state machine
//!
//! Two numeric preferences share the `tab_size` / `indentation_size` key
//! pair. Every change of policy swaps the keys the two preferences are bound
//! to and swaps the two stored values, so each preference keeps showing the
//! same number under its new key:
//!
//! | transition          | values and bindings | secondary node |
//! |---------------------|---------------------|----------------|
//! | space <-> tab       | swapped             | enabled        |
//! | space, tab -> mixed | swapped             | disabled       |
//! | mixed -> space, tab | swapped             | enabled        |
//! | any -> same         | unchanged           | unchanged      |
//!
//! Mixed indentation only varies one of the two widths independently, so
//! the secondary preference is disabled while it is active.

use crate::settings::keys::{
    INDENTATION_SIZE, TAB_POLICY_MIXED, TAB_POLICY_SPACE, TAB_POLICY_TAB, TAB_SIZE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabPolicy {
    Space,
    Tab,
    Mixed,
}

impl TabPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            TAB_POLICY_SPACE => Some(TabPolicy::Space),
            TAB_POLICY_TAB => Some(TabPolicy::Tab),
            TAB_POLICY_MIXED => Some(TabPolicy::Mixed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabPolicy::Space => TAB_POLICY_SPACE,
            TabPolicy::Tab => TAB_POLICY_TAB,
            TabPolicy::Mixed => TAB_POLICY_MIXED,
        }
    }

    pub fn is_uniform(&self) -> bool {
        !matches!(self, TabPolicy::Mixed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericRole {
    /// Indentation width
    Primary,
    /// Visual tab width
    Secondary,
}

/// Concrete key each role is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    pub primary: String,
    pub secondary: String,
}

impl Bindings {
    /// Primary on `tab_size`, secondary on `indentation_size`
    pub fn initial() -> Self {
        Self {
            primary: TAB_SIZE.to_string(),
            secondary: INDENTATION_SIZE.to_string(),
        }
    }

    pub fn swapped(&self) -> Self {
        Self {
            primary: self.secondary.clone(),
            secondary: self.primary.clone(),
        }
    }

    pub fn key(&self, role: NumericRole) -> &str {
        match role {
            NumericRole::Primary => &self.primary,
            NumericRole::Secondary => &self.secondary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub policy: TabPolicy,
    pub bindings: Bindings,
    /// Swap the stored values of the two keys before rebinding
    pub swap_values: bool,
    pub secondary_enabled: bool,
}

pub fn secondary_enabled(policy: TabPolicy) -> bool {
    policy.is_uniform()
}

/// Compute the bindings after moving from `old` to `new`
pub fn transition(old: TabPolicy, new: TabPolicy, current: &Bindings) -> Transition {
    if old == new {
        return Transition {
            policy: old,
            bindings: current.clone(),
            swap_values: false,
            secondary_enabled: secondary_enabled(old),
        };
    }

    Transition {
        policy: new,
        bindings: current.swapped(),
        swap_values: true,
        secondary_enabled: secondary_enabled(new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(TabPolicy::parse("SPACE"), Some(TabPolicy::Space));
        assert_eq!(TabPolicy::parse("Mixed"), Some(TabPolicy::Mixed));
        assert_eq!(TabPolicy::parse("tab"), Some(TabPolicy::Tab));
        assert_eq!(TabPolicy::parse("tabs"), None);
    }

    #[test]
    fn test_same_policy_is_noop() {
        let current = Bindings::initial();
        for policy in [TabPolicy::Space, TabPolicy::Tab, TabPolicy::Mixed] {
            let t = transition(policy, policy, &current);
            assert!(!t.swap_values);
            assert_eq!(t.bindings, current);
            assert_eq!(t.secondary_enabled, policy != TabPolicy::Mixed);
        }
    }

    #[test]
    fn test_every_policy_change_swaps() {
        use TabPolicy::*;
        let current = Bindings::initial();
        let cases = [
            (Space, Tab, true),
            (Tab, Space, true),
            (Space, Mixed, false),
            (Mixed, Space, true),
            (Tab, Mixed, false),
            (Mixed, Tab, true),
        ];
        for (old, new, secondary) in cases {
            let t = transition(old, new, &current);
            assert!(t.swap_values, "{old:?} -> {new:?}");
            assert_eq!(t.policy, new);
            assert_eq!(t.secondary_enabled, secondary, "{old:?} -> {new:?}");
            assert_eq!(t.bindings.key(NumericRole::Primary), INDENTATION_SIZE);
            assert_eq!(t.bindings.key(NumericRole::Secondary), TAB_SIZE);
        }
    }

    #[test]
    fn test_switch_and_back_restores_bindings() {
        let current = Bindings::initial();
        let there = transition(TabPolicy::Tab, TabPolicy::Mixed, &current);
        let back = transition(TabPolicy::Mixed, TabPolicy::Tab, &there.bindings);
        assert_eq!(back.bindings, current);
        assert!(back.secondary_enabled);
    }
}
