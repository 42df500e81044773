//! Config discovery and loading tests
//!
//! Exercises curly.toml lookup across parent directories and the
//! interpolator built from a loaded configuration.

use curly_core::{Config, CurlyError, Scope, SinkCategory};
use curly_testkit::{temp_dir_in_workspace, write_config, write_fixture};

#[test]
fn test_discover_walks_parent_directories() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    write_config(root, "[markers]\nstart = \"[[\"\nend = \"]]\"\n");

    let nested = root.join("a/b/c");
    std::fs::create_dir_all(&nested).unwrap();

    let found = Config::find_file(&nested).unwrap();
    assert_eq!(found, root.join("curly.toml"));

    let config = Config::discover(&nested).unwrap();
    assert_eq!(config.markers.start, "[[");
}

#[test]
fn test_discover_without_file_uses_defaults() {
    let temp = temp_dir_in_workspace();
    assert!(Config::find_file(temp.path()).is_none());
    assert_eq!(Config::discover(temp.path()).unwrap(), Config::default());
}

#[test]
fn test_round_trip_through_file() {
    let temp = temp_dir_in_workspace();
    let path = temp.path().join("curly.toml");

    let mut config = Config::default();
    config.markers.start = "<%".to_string();
    config.markers.end = "%>".to_string();
    config.trust.resource_url_whitelist = vec!["https://cdn.example.com/".to_string()];
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_malformed_config_is_rejected() {
    let temp = temp_dir_in_workspace();
    let path = write_config(temp.path(), "[markers\nstart = ");

    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(err, CurlyError::ConfigInvalid(_)));
    assert!(err.to_string().starts_with("CONFIG_INVALID:"));
}

#[test]
fn test_missing_config_file_is_parse_error() {
    let temp = temp_dir_in_workspace();
    let err = Config::from_file(temp.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, CurlyError::ConfigParseError(_)));
}

#[test]
fn test_configured_interpolator_renders() {
    let temp = temp_dir_in_workspace();
    let path = write_config(
        temp.path(),
        r#"
[markers]
start = "<%"
end = "%>"

[trust]
resource_url_whitelist = ["https://cdn.example.com/"]
"#,
    );

    let interpolator = Config::from_file(&path).unwrap().interpolator().unwrap();
    let scope = Scope::new().with("name", "curly");
    assert_eq!(
        interpolator.render("<%name%> {{name}}", &scope).unwrap(),
        "curly {{name}}"
    );

    let options = curly_core::CompileOptions::new().trusted_context(SinkCategory::ResourceUrl);
    let compiled = interpolator.compile("<%src%>", options).unwrap().unwrap();
    let scope = Scope::new().with("src", "https://cdn.example.com/app.js");
    assert_eq!(
        compiled.evaluate(&scope).unwrap().as_deref(),
        Some("https://cdn.example.com/app.js")
    );
}

#[test]
fn test_scope_from_context_files() {
    let temp = temp_dir_in_workspace();
    let json = write_fixture(temp.path(), "ctx.json", r#"{"user": {"name": "Ann"}, "n": 2}"#);
    let toml = write_fixture(temp.path(), "ctx.toml", "n = 3\n[user]\nname = \"Bob\"\n");

    let scope = Scope::from_file(&json).unwrap();
    assert_eq!(
        curly_core::render("{{user.name}}:{{n}}", &scope).unwrap(),
        "Ann:2"
    );

    let scope = Scope::from_file(&toml).unwrap();
    assert_eq!(
        curly_core::render("{{user.name}}:{{n}}", &scope).unwrap(),
        "Bob:3"
    );
}

#[test]
fn test_context_file_must_hold_object() {
    let temp = temp_dir_in_workspace();
    let path = write_fixture(temp.path(), "ctx.json", "[1, 2]");

    let err = Scope::from_file(&path).unwrap_err();
    assert!(matches!(err, CurlyError::ContextInvalid { .. }));
    assert!(err.to_string().contains("found array"));

    let path = write_fixture(temp.path(), "broken.json", "{");
    assert!(matches!(
        Scope::from_file(&path),
        Err(CurlyError::ContextInvalid { .. })
    ));
}
