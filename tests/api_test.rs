use tomap_core::descriptor::{Field, Layout, TableMapped};
use tomap_core::{from_table, from_table_with_report, to_table, Handling, MapperOptions, Node, Table};

#[derive(Debug, Clone, Default, PartialEq)]
struct ServerConfig {
    host: String,
    port: i64,
}

impl TableMapped for ServerConfig {
    fn layout() -> Layout<Self> {
        Layout::new()
            .with(Field::value(
                "host",
                |c: &ServerConfig| c.host.clone(),
                |c, v| c.host = v,
            ))
            .with(Field::value(
                "port",
                |c: &ServerConfig| c.port,
                |c, v| c.port = v,
            ))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct AppConfig {
    name: String,
    version: f64,
    is_enabled: bool,
    features: Vec<String>,
    config: ServerConfig,
}

impl TableMapped for AppConfig {
    fn layout() -> Layout<Self> {
        Layout::new()
            .with(Field::value(
                "name",
                |c: &AppConfig| c.name.clone(),
                |c, v| c.name = v,
            ))
            .with(Field::value(
                "version",
                |c: &AppConfig| c.version,
                |c, v| c.version = v,
            ))
            .with(Field::value(
                "is_enabled",
                |c: &AppConfig| c.is_enabled,
                |c, v| c.is_enabled = v,
            ))
            .with(Field::value(
                "features",
                |c: &AppConfig| c.features.clone(),
                |c, v| c.features = v,
            ))
            .with(Field::nested(
                "config",
                |c: &AppConfig| c.config.clone(),
                |c, v| c.config = v,
            ))
    }
}

fn sample_table() -> Table {
    let mut config = Table::new();
    config.insert("host", "localhost");
    config.insert("port", 8080i64);

    let mut table = Table::new();
    table.insert("name", "My App");
    table.insert("version", 1.0);
    table.insert("is_enabled", true);
    table.insert(
        "features",
        Node::Array(vec!["a".into(), "b".into(), "c".into()]),
    );
    table.insert("config", config);
    table
}

#[test]
fn test_simple_map_to_json() {
    let config: AppConfig = from_table(&sample_table(), &MapperOptions::default()).unwrap();

    let expected_json = serde_json::json!({
        "name": "My App",
        "version": 1.0,
        "is_enabled": true,
        "features": ["a", "b", "c"],
        "config": {
            "host": "localhost",
            "port": 8080,
        }
    });

    let table = to_table(&config, &MapperOptions::default()).unwrap();
    let result = table.to_json().unwrap();
    let result_json: serde_json::Value = serde_json::from_str(&result).unwrap();

    assert_eq!(result_json, expected_json);
}

#[test]
fn test_simple_map_to_yaml() {
    let mut table = Table::new();
    table.insert("name", "My App");
    table.insert("version", 1.0);
    table.insert("is_enabled", true);

    let expected_yaml = "name: My App\nversion: 1.0\nis_enabled: true\n";

    assert_eq!(table.to_yaml().unwrap(), expected_yaml);
}

#[test]
fn test_full_round_trip() {
    let original = AppConfig {
        name: "roundtrip".to_string(),
        version: 3.25,
        is_enabled: true,
        features: vec!["alpha".to_string(), "beta".to_string()],
        config: ServerConfig {
            host: "example.com".to_string(),
            port: 443,
        },
    };

    let table = to_table(&original, &MapperOptions::default()).unwrap();
    let back: AppConfig = from_table(&table, &MapperOptions::default()).unwrap();

    assert_eq!(back, original);
}

#[test]
fn test_report_is_clean_on_exact_match() {
    let options = MapperOptions {
        handling: Handling::Record,
        ..Default::default()
    };
    let (config, report) = from_table_with_report::<AppConfig>(&sample_table(), &options).unwrap();

    assert_eq!(config.config.port, 8080);
    assert!(report.is_clean());
}
