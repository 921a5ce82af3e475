//! Integration tests for taskfile parsing

mod common;

use ontask::config::{parse_config, parse_config_file, validate_config, TaskEntry};
use ontask::error::{ConfigError, OntaskError};

#[test]
fn test_parse_complete_config() {
    let yaml = r#"
name: my-site
usage: Build and serve the site

tasks:
  default: build
  watch: dev-server

  clean-build:
    usage: Empty the build directory
    run: rm -rf build

  build:
    usage: Bundle the app
    source:
      - public/**/*
      - src/**/*
    target:
      - build/index.html
    ignore: "**/*.test.js"
    params:
      debug: false
    run:
      - task: clean-build
      - command:
          exec: ./node_modules/.bin/webpack
          print: webpack
          dir: web

  "build:dev":
    run:
      - task:
          name: build
          params:
            debug: true
"#;

    let config = parse_config(yaml).unwrap();
    validate_config(&config).unwrap();

    assert_eq!(config.name, Some("my-site".to_string()));
    assert_eq!(config.tasks.len(), 5);

    assert!(matches!(config.tasks.get("default"), Some(TaskEntry::Alias(t)) if t == "build"));
    assert!(matches!(config.tasks.get("watch"), Some(TaskEntry::Alias(t)) if t == "dev-server"));

    let Some(TaskEntry::Body(build)) = config.tasks.get("build") else {
        panic!("build should be a body");
    };
    assert_eq!(build.source.len(), 2);
    assert_eq!(build.target, vec!["build/index.html".to_string()]);
    assert_eq!(build.ignore, vec!["**/*.test.js".to_string()]);
    assert_eq!(build.params.get("debug"), Some(&"false".to_string()));
    assert_eq!(build.run.len(), 2);

    assert!(config.tasks.contains_key("build:dev"));
}

#[test]
fn test_parse_config_file() {
    let (_temp_dir, config_path) = common::create_test_config(
        r#"
tasks:
  hello:
    run: echo "hello"
"#,
    );

    let config = parse_config_file(&config_path).unwrap();
    assert_eq!(config.tasks.len(), 1);
}

#[test]
fn test_invalid_yaml() {
    let yaml = r#"
tasks:
  hello:
    run: [unclosed
"#;
    assert!(matches!(parse_config(yaml), Err(OntaskError::Yaml(_))));
}

#[test]
fn test_circular_alias_reported_with_chain() {
    let yaml = r#"
tasks:
  default: build
  build: bundle
  bundle: build
"#;
    let config = parse_config(yaml).unwrap();

    match validate_config(&config) {
        Err(ConfigError::CircularAlias(chain)) => {
            assert!(chain.contains("build -> bundle -> build"), "chain: {}", chain);
        }
        other => panic!("expected circular alias, got {:?}", other),
    }
}

#[test]
fn test_target_without_source() {
    let yaml = r#"
tasks:
  bundle:
    target: dist/app.js
    run: "true"
"#;
    let config = parse_config(yaml).unwrap();
    assert!(matches!(
        validate_config(&config),
        Err(ConfigError::TargetWithoutSource(name)) if name == "bundle"
    ));
}

#[test]
fn test_empty_taskfile() {
    let config = parse_config("name: nothing\n").unwrap();
    assert!(config.tasks.is_empty());
    assert!(validate_config(&config).is_ok());
}
