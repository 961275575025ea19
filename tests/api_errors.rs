// Unhappy-path tests for the mapping engine's handling modes: aggregation
// under Throw, silence under Ignore, full reporting under Record.

use tomap_core::descriptor::{Field, Layout, TableMapped};
use tomap_core::{
    from_table, from_table_with_report, Handling, MapperOptions, Node, Problem, Table,
};

#[derive(Debug, Clone, Default, PartialEq)]
struct Credentials {
    user: String,
    password: String,
    realm: String,
}

impl TableMapped for Credentials {
    fn layout() -> Layout<Self> {
        Layout::new()
            .with(
                Field::value(
                    "user",
                    |c: &Credentials| c.user.clone(),
                    |c, v| c.user = v,
                )
                .required(),
            )
            .with(
                Field::value(
                    "password",
                    |c: &Credentials| c.password.clone(),
                    |c, v| c.password = v,
                )
                .required(),
            )
            .with(
                Field::value(
                    "realm",
                    |c: &Credentials| c.realm.clone(),
                    |c, v| c.realm = v,
                )
                .required(),
            )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Narrow {
    count: i64,
    label: String,
}

impl TableMapped for Narrow {
    fn layout() -> Layout<Self> {
        Layout::new()
            .with(Field::value(
                "count",
                |c: &Narrow| c.count,
                |c, v| c.count = v,
            ))
            .with(Field::value(
                "label",
                |c: &Narrow| c.label.clone(),
                |c, v| c.label = v,
            ))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Themed {
    color: i64,
}

impl TableMapped for Themed {
    fn layout() -> Layout<Self> {
        Layout::new().with(Field::custom(
            "color",
            |c: &Themed| Ok(Some(Node::String(format!("#{:06x}", c.color)))),
            |c, node| match node {
                Node::String(text) => {
                    let hex = text
                        .strip_prefix('#')
                        .ok_or_else(|| format!("`{text}` is missing the leading #"))?;
                    c.color = i64::from_str_radix(hex, 16).map_err(|e| e.to_string())?;
                    Ok(())
                }
                other => Err(format!("expected a color string, found {}", other.kind_name())),
            },
        ))
    }
}

#[test]
fn test_missing_required_aggregates_all_names_in_one_error() {
    let err = from_table::<Credentials>(&Table::new(), &MapperOptions::default()).unwrap_err();

    let missing: Vec<&str> = err
        .problems()
        .iter()
        .filter_map(|p| match p {
            Problem::MissingRequired { path } => Some(path.as_str()),
            _ => None,
        })
        .collect();

    assert_eq!(missing, vec!["user", "password", "realm"]);
}

#[test]
fn test_throw_collects_every_problem_in_one_pass() {
    let mut table = Table::new();
    table.insert("count", "not a number");
    table.insert("label", 42i64);

    let err = from_table::<Narrow>(&table, &MapperOptions::default()).unwrap_err();
    assert_eq!(err.problems().len(), 2);
}

#[test]
fn test_ignore_leaves_offending_fields_at_default() {
    let mut table = Table::new();
    table.insert("count", "not a number");
    table.insert("label", "fine");

    let options = MapperOptions {
        handling: Handling::Ignore,
        ..Default::default()
    };
    let narrow: Narrow = from_table(&table, &options).unwrap();

    assert_eq!(narrow.count, 0);
    assert_eq!(narrow.label, "fine");
}

#[test]
fn test_record_never_raises_and_reports_everything() {
    let mut table = Table::new();
    table.insert("count", true);
    table.insert("stray", 1i64);

    let options = MapperOptions {
        handling: Handling::Record,
        ..Default::default()
    };
    let (narrow, report) = from_table_with_report::<Narrow>(&table, &options).unwrap();

    assert_eq!(narrow.count, 0);
    assert_eq!(report.type_mismatches.len(), 1);
    assert_eq!(report.type_mismatches[0].0, "count");
    assert_eq!(report.unmatched, vec!["stray"]);
}

#[test]
fn test_unmatched_nodes_land_in_the_report() {
    let mut table = Table::new();
    table.insert("a", 1i64);
    table.insert("b", 2i64);

    #[derive(Debug, Clone, Default, PartialEq)]
    struct OnlyA {
        a: i64,
    }
    impl TableMapped for OnlyA {
        fn layout() -> Layout<Self> {
            Layout::new().with(Field::value("a", |c: &OnlyA| c.a, |c, v| c.a = v))
        }
    }

    let options = MapperOptions {
        handling: Handling::Record,
        ..Default::default()
    };
    let (only_a, report) = from_table_with_report::<OnlyA>(&table, &options).unwrap();

    assert_eq!(only_a.a, 1);
    assert_eq!(report.unmatched, vec!["b"]);
}

#[test]
fn test_strict_consistency_turns_unmatched_into_errors() {
    let mut table = Table::new();
    table.insert("count", 3i64);
    table.insert("label", "ok");
    table.insert("stray", false);

    let lenient = MapperOptions::default();
    assert!(from_table::<Narrow>(&table, &lenient).is_ok());

    let strict = MapperOptions {
        strict_consistency: true,
        ..Default::default()
    };
    let err = from_table::<Narrow>(&table, &strict).unwrap_err();
    assert!(matches!(
        err.problems(),
        [Problem::Consistency { path }] if path == "stray"
    ));
}

#[test]
fn test_converter_failures_are_classified_as_such() {
    let mut table = Table::new();
    table.insert("color", "ff00ff");

    let options = MapperOptions {
        handling: Handling::Record,
        ..Default::default()
    };
    let (themed, report) = from_table_with_report::<Themed>(&table, &options).unwrap();

    assert_eq!(themed.color, 0);
    assert!(report.type_mismatches.is_empty());
    assert_eq!(report.converter_failures.len(), 1);
    assert_eq!(report.converter_failures[0].0, "color");
}

#[test]
fn test_converter_read_success() {
    let mut table = Table::new();
    table.insert("color", "#ff00ff");

    let themed: Themed = from_table(&table, &MapperOptions::default()).unwrap();
    assert_eq!(themed.color, 0x00ff_00ff);
}

#[test]
fn test_hook_failure_follows_the_mode() {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Hooked {
        value: i64,
    }
    impl TableMapped for Hooked {
        fn layout() -> Layout<Self> {
            Layout::new()
                .with(Field::value("value", |c: &Hooked| c.value, |c, v| c.value = v))
                .post_hook(0, |c| {
                    if c.value < 0 {
                        Err("value must not be negative".to_string())
                    } else {
                        Ok(())
                    }
                })
        }
    }

    let mut table = Table::new();
    table.insert("value", -1i64);

    let err = from_table::<Hooked>(&table, &MapperOptions::default()).unwrap_err();
    assert!(matches!(err.problems(), [Problem::Hook { .. }]));

    let options = MapperOptions {
        handling: Handling::Record,
        ..Default::default()
    };
    let (hooked, report) = from_table_with_report::<Hooked>(&table, &options).unwrap();
    assert_eq!(hooked.value, -1);
    assert_eq!(report.hook_failures.len(), 1);
}
