//! Field level restoration of hub-only values inside nested collections.
//!
//! After an upgrade the freshly mapped hub object contains every element the spoke object
//! had, but the hub-only fields of these elements are zero-valued. The recovered snapshot
//! has the values, and the functions in this module copy them over. They never add,
//! remove or reorder elements: the mapped collection is authoritative for structure, the
//! recovered collection only supplies values.
//!
//! Elements are matched by their [`Keyed::key`] if every element on both sides has a
//! unique, non-empty key. Otherwise, matching falls back to positional correspondence,
//! which requires that neither collection was reordered or resized in between.
use std::collections::{BTreeMap, BTreeSet};

/// Collection elements which carry a stable identifier, like the `id` of a network link.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Describes how a collection was restored and how many elements received values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Restoration {
    /// Elements were matched by key.
    Keyed { restored: usize },

    /// Elements were matched by index.
    Positional { restored: usize },
}

impl Restoration {
    pub fn restored(&self) -> usize {
        match self {
            Self::Keyed { restored } | Self::Positional { restored } => *restored,
        }
    }
}

/// Restores values from `recovered` into `target`, matching by key where possible.
///
/// `apply` receives the target element and its recovered counterpart and copies the
/// hub-only fields. It must not touch any other field.
pub fn restore_elements<T, F>(target: &mut [T], recovered: &[T], apply: F) -> Restoration
where
    T: Keyed,
    F: FnMut(&mut T, &T),
{
    if has_unique_keys(target) && has_unique_keys(recovered) {
        Restoration::Keyed {
            restored: restore_keyed(target, recovered, apply),
        }
    } else {
        Restoration::Positional {
            restored: restore_positional(target, recovered, apply),
        }
    }
}

/// Restores values by index for `0..min(target.len(), recovered.len())`. Elements beyond
/// the shorter length are left untouched.
pub fn restore_positional<T, F>(target: &mut [T], recovered: &[T], mut apply: F) -> usize
where
    F: FnMut(&mut T, &T),
{
    let mut restored = 0;
    for (target, recovered) in target.iter_mut().zip(recovered) {
        apply(target, recovered);
        restored += 1;
    }

    restored
}

/// Restores values for every target element whose key also exists in `recovered`.
///
/// Keys are expected to be unique on both sides. If the recovered collection contains a
/// key multiple times, the first occurrence wins.
pub fn restore_keyed<T, F>(target: &mut [T], recovered: &[T], mut apply: F) -> usize
where
    T: Keyed,
    F: FnMut(&mut T, &T),
{
    let mut by_key = BTreeMap::new();
    for element in recovered {
        by_key.entry(element.key()).or_insert(element);
    }

    let mut restored = 0;
    for element in target.iter_mut() {
        if let Some(counterpart) = by_key.get(element.key()) {
            apply(element, *counterpart);
            restored += 1;
        }
    }

    restored
}

fn has_unique_keys<T: Keyed>(elements: &[T]) -> bool {
    let mut seen = BTreeSet::new();
    elements
        .iter()
        .all(|element| !element.key().is_empty() && seen.insert(element.key()))
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Link {
        id: String,
        policy: Option<String>,
    }

    impl Keyed for Link {
        fn key(&self) -> &str {
            &self.id
        }
    }

    fn link(id: &str, policy: Option<&str>) -> Link {
        Link {
            id: id.to_owned(),
            policy: policy.map(ToOwned::to_owned),
        }
    }

    fn copy_policy(target: &mut Link, recovered: &Link) {
        target.policy.clone_from(&recovered.policy);
    }

    #[test]
    fn positional_restoration_is_bounded_by_shorter_collection() {
        let mut target = vec![Link::default(), Link::default(), Link::default()];
        let recovered: Vec<_> = (0..5)
            .map(|i| link("", Some(format!("policy-{i}").as_str())))
            .collect();

        let restored = restore_positional(&mut target, &recovered, copy_policy);

        assert_eq!(restored, 3);
        assert_eq!(target.len(), 3);
        assert_eq!(target[0].policy.as_deref(), Some("policy-0"));
        assert_eq!(target[2].policy.as_deref(), Some("policy-2"));
    }

    #[test]
    fn positional_restoration_leaves_trailing_elements_untouched() {
        let mut target = vec![link("a", None), link("b", None), link("c", None)];
        let recovered = vec![link("x", Some("layer2"))];

        let restored = restore_positional(&mut target, &recovered, copy_policy);

        assert_eq!(restored, 1);
        assert_eq!(target[0].policy.as_deref(), Some("layer2"));
        assert_eq!(target[0].id, "a");
        assert_eq!(target[1], link("b", None));
        assert_eq!(target[2], link("c", None));
    }

    #[test]
    fn keyed_restoration_follows_reordered_elements() {
        let mut target = vec![link("bond1", None), link("bond0", None)];
        let recovered = vec![link("bond0", Some("layer3+4")), link("bond1", Some("layer2"))];

        let restoration = restore_elements(&mut target, &recovered, copy_policy);

        assert_eq!(restoration, Restoration::Keyed { restored: 2 });
        assert_eq!(target[0].policy.as_deref(), Some("layer2"));
        assert_eq!(target[1].policy.as_deref(), Some("layer3+4"));
    }

    #[test]
    fn keyed_restoration_skips_new_elements() {
        let mut target = vec![link("eth0", None), link("eth9", None)];
        let recovered = vec![link("eth0", Some("layer2"))];

        let restoration = restore_elements(&mut target, &recovered, copy_policy);

        assert_eq!(restoration, Restoration::Keyed { restored: 1 });
        assert_eq!(target[1].policy, None);
    }

    #[rstest]
    #[case::duplicate_target_keys(
        vec![link("eth0", None), link("eth0", None)],
        vec![link("eth0", Some("layer2")), link("eth1", Some("layer3"))]
    )]
    #[case::empty_target_key(
        vec![link("eth0", None), link("", None)],
        vec![link("eth0", Some("layer2")), link("eth1", Some("layer3"))]
    )]
    #[case::duplicate_recovered_keys(
        vec![link("eth0", None), link("eth1", None)],
        vec![link("eth1", Some("layer2")), link("eth1", Some("layer3"))]
    )]
    fn unusable_keys_fall_back_to_positions(
        #[case] mut target: Vec<Link>,
        #[case] recovered: Vec<Link>,
    ) {
        let restoration = restore_elements(&mut target, &recovered, copy_policy);

        assert_eq!(restoration, Restoration::Positional { restored: 2 });
        assert_eq!(target[0].policy.as_deref(), Some("layer2"));
        assert_eq!(target[1].policy.as_deref(), Some("layer3"));
    }

    #[test]
    fn empty_collections() {
        let mut target: Vec<Link> = Vec::new();
        let restoration =
            restore_elements(&mut target, &[link("eth0", Some("layer2"))], copy_policy);

        assert_eq!(restoration.restored(), 0);
        assert!(target.is_empty());
    }
}
