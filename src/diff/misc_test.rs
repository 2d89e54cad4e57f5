//! Tests for registration, omission, maps, unions and cancellation.

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Arc;

    use chrono::{DateTime, FixedOffset, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use crate::diff::{align, ConfigError, DiffConfig, Differ, Patch, Reason, Tagged, ZERO_IDENTITY};
    use crate::value::{from_yaml, Value};
    use crate::Reflect;

    fn summary(patch: &Patch<'_>) -> Vec<(String, Reason)> {
        patch.iter().map(|e| (e.path.to_string(), e.reason)).collect()
    }

    fn sorted_summary(patch: &Patch<'_>) -> Vec<(String, Reason)> {
        let mut rows = summary(patch);
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }

    fn tagged(items: &[(usize, &str)]) -> Vec<Tagged> {
        items.iter().map(|(i, id)| Tagged::new(*i, *id)).collect()
    }

    #[derive(Debug, Clone, Default)]
    struct Person {
        name: String,
        nick: String,
        age: u8,
        tags: Vec<String>,
        meta: BTreeMap<String, String>,
    }

    #[derive(Debug, Clone)]
    struct WithHook {
        name: String,
        hook: fn() -> u8,
    }

    #[derive(Debug, Clone)]
    struct Event {
        at: DateTime<FixedOffset>,
    }

    crate::reflect_struct!(Person {
        name as "Name",
        nick as "Nick",
        age as "Age",
        tags as "Tags",
        meta as "Meta",
    });
    crate::reflect_struct!(WithHook { name as "Name", hook as "Hook" });
    crate::reflect_struct!(Event { at as "At" });

    #[derive(Debug, Clone, Default)]
    struct E3 {
        id: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    struct E2 {
        e3: E3,
    }

    #[derive(Debug, Clone, Default)]
    struct E1 {
        e2: Option<E2>,
    }

    #[derive(Debug, Clone, Default)]
    struct DeepId {
        e1: Option<E1>,
    }

    #[derive(Debug, Clone, Default)]
    struct A1 {
        id: String,
    }

    #[derive(Debug, Clone, Default)]
    struct DeepId2 {
        a1: A1,
    }

    crate::reflect_struct!(E3 { id as "ID" });
    crate::reflect_struct!(E2 { #[embed] e3 as "E3" });
    crate::reflect_struct!(E1 { #[embed] e2 as "E2" });
    crate::reflect_struct!(DeepId { #[embed] e1 as "E1" });
    crate::reflect_struct!(A1 { id as "ID" });
    crate::reflect_struct!(DeepId2 { #[embed] a1 as "A1" });

    fn person(name: &str, nick: &str, age: u8) -> Person {
        Person {
            name: name.into(),
            nick: nick.into(),
            age,
            ..Default::default()
        }
    }

    #[test]
    fn test_regist() {
        let mut differ = Differ::new();
        assert!(differ
            .register(|_: &Option<DateTime<Utc>>, _: &Option<DateTime<Utc>>| false)
            .is_ok());
        assert!(differ.register_at_path(".path", |a: &i32, b: &i32| a == b).is_ok());
        assert!(matches!(
            differ.register_at_path("path", |a: &i32, b: &i32| a == b),
            Err(ConfigError::InvalidPath { .. })
        ));
        assert!(differ
            .register_identity(|_: &Box<dyn Reflect>| String::new())
            .is_ok());
        assert!(differ.register_kind_identity(|_: i32| String::new()).is_ok());
        assert!(matches!(
            differ.register_kind(|_: Person, _: Person| true),
            Err(ConfigError::NotPrimitive { .. })
        ));
    }

    #[test]
    fn test_align_slice() {
        let alignment = align(
            tagged(&[(0, "1"), (1, "2"), (2, "3"), (3, "4")]),
            tagged(&[(0, "10"), (3, "40"), (1, "90")]),
        );
        assert!(alignment.added.is_empty());
        assert_eq!(alignment.removed, tagged(&[(3, "4")]));
        assert_eq!(alignment.matched.len(), 3);

        let alignment = align(
            tagged(&[(0, "a"), (1, "b"), (2, "c"), (3, "d")]),
            tagged(&[(2, "a"), (0, "c"), (1, "d")]),
        );
        assert!(alignment.added.is_empty());
        assert_eq!(alignment.removed, tagged(&[(1, "b")]));
        assert_eq!(alignment.matched, vec![(0, 2), (2, 0), (3, 1)]);

        let alignment = align(
            tagged(&[(2, "a"), (0, "c"), (1, "d")]),
            tagged(&[(0, "a"), (1, "b"), (2, "c"), (3, "d")]),
        );
        assert!(alignment.removed.is_empty());
        assert_eq!(alignment.added, tagged(&[(1, "b")]));
        assert_eq!(alignment.matched.len(), 3);
    }

    #[test]
    fn test_deep_embedded_identity() {
        let differ = Differ::new();
        let deep = DeepId {
            e1: Some(E1 {
                e2: Some(E2 {
                    e3: E3 {
                        id: Some("deep id".into()),
                    },
                }),
            }),
        };
        assert_eq!(differ.identity_of(&deep), "deep id");
        assert_eq!(differ.identity_of(&DeepId::default()), ZERO_IDENTITY);
        assert_eq!(differ.identity_of(&DeepId2::default()), "");
        let named = DeepId2 {
            a1: A1 { id: "a1".into() },
        };
        assert_eq!(differ.identity_of(&named), "a1");
    }

    #[test]
    fn test_omit_forms() {
        let mut left = person("n1", "x", 1);
        let mut right = person("n2", "y", 1);
        left.tags = vec!["a".into()];
        right.tags = vec!["b".into()];

        let differ = Differ::new();
        assert_eq!(
            summary(&differ.make_patch(&left, &right)),
            vec![
                (".Name".to_string(), Reason::ValueMismatch),
                (".Nick".to_string(), Reason::ValueMismatch),
                (".Tags[0]".to_string(), Reason::ValueMismatch),
            ]
        );

        let mut differ = Differ::new();
        differ.omit_path(["Nick", ".Tags.*"]);
        assert_eq!(
            summary(&differ.make_patch(&left, &right)),
            vec![(".Name".to_string(), Reason::ValueMismatch)]
        );

        let people_l = vec![left.clone()];
        let people_r = vec![right.clone()];
        let mut differ = Differ::new();
        differ.omit_path([".[*].Name", ".[*].Tags[*]"]);
        assert_eq!(
            summary(&differ.make_patch(&people_l, &people_r)),
            vec![(".[0].Nick".to_string(), Reason::ValueMismatch)]
        );
    }

    #[test]
    fn test_omitted_events_do_not_count() {
        let left = person("n1", "same", 1);
        let right = person("n2", "same", 1);
        let mut differ = Differ::new();
        differ.omit_path(["Name"]);
        let mut calls = 0;
        assert!(differ.compare(&left, &right, |_| {
            calls += 1;
            true
        }));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_early_termination() {
        let left = person("a", "b", 1);
        let right = person("c", "d", 2);
        let differ = Differ::new();
        let mut seen = Vec::new();
        let equal = differ.compare(&left, &right, |event| {
            seen.push(event.path.to_string());
            false
        });
        assert!(!equal);
        assert_eq!(seen, vec![".Name".to_string()]);
        assert!(!differ.equals(&left, &right));
    }

    #[test]
    fn test_map_keys() {
        let left: HashMap<String, i32> = [("a".to_string(), 1), ("b".to_string(), 2)].into_iter().collect();
        let right: HashMap<String, i32> = [("a".to_string(), 1), ("b".to_string(), 3), ("c".to_string(), 4)]
            .into_iter()
            .collect();
        let differ = Differ::new();
        let patch = differ.make_patch(&left, &right);
        assert_eq!(
            sorted_summary(&patch),
            vec![
                (".".to_string(), Reason::MapLengthMismatch),
                (".b".to_string(), Reason::ValueMismatch),
                (".c".to_string(), Reason::LeftMissing),
            ]
        );
        let reversed = differ.make_patch(&right, &left);
        assert!(sorted_summary(&reversed).contains(&(".c".to_string(), Reason::RightMissing)));
    }

    #[test]
    fn test_map_optional_values() {
        let mut left: BTreeMap<u32, Option<i64>> = BTreeMap::new();
        let mut right: BTreeMap<u32, Option<i64>> = BTreeMap::new();
        left.insert(1u32, Some(1i64));
        right.insert(1u32, None);
        left.insert(2u32, Some(5));
        right.insert(2u32, Some(6));
        let differ = Differ::new();
        let patch = differ.make_patch(&left, &right);
        assert_eq!(
            summary(&patch),
            vec![
                (".1".to_string(), Reason::RightMissing),
                (".2".to_string(), Reason::ValueMismatch),
            ]
        );
        // Leaves reached through the optional slot are re-wrapped.
        assert_eq!(patch.events()[1].left.downcast_ref::<Option<i64>>(), Some(&Some(5)));
    }

    #[test]
    fn test_path_comparator_precedence() {
        let mut differ = Differ::new();
        differ
            .register_at_path(".Name", |l: &String, r: &String| l.eq_ignore_ascii_case(r))
            .unwrap();
        assert!(differ.equals(&person("Ann", "x", 1), &person("ann", "x", 1)));
        assert_eq!(
            summary(&differ.make_patch(&person("a", "Bo", 1), &person("a", "bo", 1))),
            vec![(".Nick".to_string(), Reason::ValueMismatch)]
        );
        differ.register(|_: &String, _: &String| true).unwrap();
        assert!(differ.equals(&person("a", "Bo", 1), &person("a", "bo", 1)));
        assert!(!differ.equals(&person("Ann", "x", 1), &person("Bob", "x", 1)));
    }

    #[test]
    fn test_kind_comparator_override() {
        let mut differ = Differ::new();
        assert!(!differ.equals(&1.0f64, &1.2f64));
        differ
            .register_kind(|l: f64, r: f64| (l - r).abs() < 0.5)
            .unwrap();
        assert!(differ.equals(&1.0f64, &1.2f64));
        assert!(differ.equals(&vec![1.0f64, 2.0], &vec![1.1f64, 2.1]));
        assert!(!differ.equals(&1.0f32, &1.2f32));
    }

    #[test]
    fn test_union_values() {
        let differ = Differ::new();
        let left = Value::Null;
        let right = Value::Int(1);
        let patch = differ.make_patch(&left, &right);
        assert_eq!(summary(&patch), vec![(".".to_string(), Reason::LeftMissing)]);
        assert!(differ.equals(&Value::Null, &Value::Null));

        let patch = differ.make_patch(&right, &Value::Float(1.0));
        assert_eq!(summary(&patch), vec![(".".to_string(), Reason::TypeMismatch)]);

        let left: Box<dyn Reflect> = Box::new(Some("a".to_string()));
        let right: Box<dyn Reflect> = Box::new(Some("b".to_string()));
        let patch = differ.make_patch(&left, &right);
        assert_eq!(summary(&patch), vec![(".".to_string(), Reason::ValueMismatch)]);
        assert_eq!(
            patch.events()[0].left.downcast_ref::<Option<String>>(),
            Some(&Some("a".to_string()))
        );
    }

    #[test]
    fn test_documents() {
        let left = from_yaml("name: a\ntags: [x, y]\nspec:\n  replicas: 1\n").unwrap();
        let right = from_yaml("name: b\ntags: [y, x]\nspec:\n  replicas: 1\n  paused: true\n").unwrap();
        let differ = Differ::new();
        let patch = differ.make_patch(&left, &right);
        assert_eq!(
            sorted_summary(&patch),
            vec![
                (".name".to_string(), Reason::ValueMismatch),
                (".spec".to_string(), Reason::MapLengthMismatch),
                (".spec.paused".to_string(), Reason::LeftMissing),
            ]
        );
        let rows = patch.rows();
        let name = rows.iter().find(|r| r.path == ".name").unwrap();
        assert_eq!((&name.left, &name.right), (&Value::from("a"), &Value::from("b")));
    }

    #[test]
    fn test_optional_elements_missing() {
        let differ = Differ::new();
        let left = vec![Some(1i32)];
        let right: Vec<Option<i32>> = vec![None];
        let patch = differ.make_patch(&left, &right);
        assert_eq!(summary(&patch), vec![(".[0]".to_string(), Reason::RightMissing)]);
    }

    #[test]
    fn test_awkward_map_keys_keep_distinct_paths() {
        let mut left: BTreeMap<String, i32> = BTreeMap::new();
        let mut right: BTreeMap<String, i32> = BTreeMap::new();
        left.insert(String::new(), 1);
        right.insert(String::new(), 2);
        left.insert("a.b".into(), 1);
        right.insert("a.b".into(), 3);
        let differ = Differ::new();
        assert_eq!(
            summary(&differ.make_patch(&left, &right)),
            vec![
                (".[\"\"]".to_string(), Reason::ValueMismatch),
                (".[\"a.b\"]".to_string(), Reason::ValueMismatch),
            ]
        );
    }

    #[test]
    fn test_nan_is_equal_to_itself() {
        let differ = Differ::new();
        assert!(differ.equals(&f64::NAN, &f64::NAN));
        assert!(differ.equals(&vec![f32::NAN, 1.0], &vec![f32::NAN, 1.0]));
        assert!(!differ.equals(&f64::NAN, &1.0f64));
    }

    #[test]
    fn test_empty_and_one_sided_sequences() {
        let differ = Differ::new();
        let empty: Vec<u8> = Vec::new();
        assert!(differ.equals(&empty, &empty));
        let full = vec![1u8, 2];
        assert_eq!(
            summary(&differ.make_patch(&empty, &full)),
            vec![
                (".[0]".to_string(), Reason::RightElementAdded),
                (".[1]".to_string(), Reason::RightElementAdded),
            ]
        );
        assert_eq!(
            summary(&differ.make_patch(&full, &empty)),
            vec![
                (".[0]".to_string(), Reason::LeftElementRemoved),
                (".[1]".to_string(), Reason::LeftElementRemoved),
            ]
        );
    }

    #[test]
    fn test_callables_are_ignored() {
        fn one() -> u8 {
            1
        }
        fn two() -> u8 {
            2
        }
        let differ = Differ::new();
        let left = WithHook {
            name: "h".into(),
            hook: one,
        };
        let right = WithHook {
            name: "h".into(),
            hook: two,
        };
        assert!(differ.equals(&left, &right));
    }

    #[test]
    fn test_timestamps_compare_by_instant() {
        let instant = Utc.with_ymd_and_hms(2022, 1, 2, 3, 4, 5).unwrap();
        let left = Event {
            at: instant.with_timezone(&FixedOffset::east_opt(3600).unwrap()),
        };
        let right = Event {
            at: instant.with_timezone(&FixedOffset::west_opt(7200).unwrap()),
        };
        let differ = Differ::new();
        assert!(differ.equals(&left, &right));
        let later = Event {
            at: (instant + chrono::Duration::seconds(1)).with_timezone(&FixedOffset::east_opt(0).unwrap()),
        };
        assert_eq!(
            summary(&differ.make_patch(&left, &later)),
            vec![(".At".to_string(), Reason::ValueMismatch)]
        );
    }

    #[test]
    fn test_with_config() {
        let config = DiffConfig::from_yaml("omit: [Age, .Meta.*]").unwrap();
        let differ = Differ::with_config(&config);
        let mut left = person("a", "b", 1);
        let mut right = person("a", "b", 2);
        left.meta.insert("k".into(), "1".into());
        right.meta.insert("k".into(), "2".into());
        assert!(differ.equals(&left, &right));
    }

    #[test]
    fn test_shared_across_threads() {
        let differ = Arc::new(Differ::new());
        let left = vec![person("a", "b", 1), person("c", "d", 2)];
        let right = vec![person("c", "d", 2), person("a", "b", 1)];
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let differ = Arc::clone(&differ);
                let (left, right) = (&left, &right);
                scope.spawn(move || {
                    assert!(differ.equals(left, right));
                });
            }
        });
    }
}
