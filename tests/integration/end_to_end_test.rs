//! End-to-end tests: scope files on disk through to substituted request text.

use super::{init_test_env, write_file};
use rq_core::commands::resolve_request;
use rq_core::environment::{CascadeResolver, EnvError};
use rq_core::variables::{Arity, Engine, VarError};
use rq_core::{Error, ResolverConfig};
use std::collections::HashMap;
use tempfile::TempDir;

/// Helper to create the dock used by most tests:
///
/// ```text
/// .env            X=1
/// a/.env          X=2, Y=1
/// a/b/.env        Y=2
/// a/b/.env.prod   Y=3, HOST=prod.example.com
/// ```
fn create_dock() -> TempDir {
    init_test_env();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    write_file(root, ".env", "# root scope\nX=1\nHOST=localhost\n");
    write_file(root, "a/.env", "X=2\nY=1\n");
    write_file(root, "a/b/.env", "Y=2\n");
    write_file(root, "a/b/.env.prod", "Y=3\nHOST=prod.example.com\n");
    temp_dir
}

#[test]
fn test_cascade_merge_override() {
    let dock = create_dock();
    let mapping = CascadeResolver::new(dock.path()).resolve("a/b", None).unwrap();

    let mut expected = HashMap::new();
    expected.insert("X".to_string(), "2".to_string());
    expected.insert("Y".to_string(), "2".to_string());
    expected.insert("HOST".to_string(), "localhost".to_string());
    assert_eq!(mapping, expected);
}

#[test]
fn test_cascade_is_deterministic() {
    let dock = create_dock();
    let resolver = CascadeResolver::new(dock.path());

    let first = resolver.resolve("a/b", Some("prod")).unwrap();
    for _ in 0..10 {
        assert_eq!(resolver.resolve("a/b", Some("prod")).unwrap(), first);
    }
    assert_eq!(first["Y"], "3");
    assert_eq!(first["HOST"], "prod.example.com");
}

#[test]
fn test_format_error_names_file_and_line() {
    let dock = create_dock();
    write_file(dock.path(), "a/.env", "X=2\n\n# note\nFOO\n");

    let err = CascadeResolver::new(dock.path())
        .resolve("a/b", None)
        .unwrap_err();
    assert_eq!(err.line(), Some(4));
    assert_eq!(err.path(), Some(dock.path().join("a/.env").as_path()));
    assert!(matches!(err, EnvError::InvalidFormat { .. }));
}

#[test]
fn test_cascade_feeds_engine() {
    let dock = create_dock();
    let mapping = CascadeResolver::new(dock.path())
        .resolve("a/b", Some("prod"))
        .unwrap();

    let engine = Engine::new(mapping);
    let text = engine
        .resolve("GET https://{{HOST}}/items/{{join(X, Y, '.')}}")
        .unwrap();
    assert_eq!(text, "GET https://prod.example.com/items/2.3");
}

#[test]
fn test_all_or_nothing_substitution() {
    let dock = create_dock();
    let mapping = CascadeResolver::new(dock.path()).resolve("a", None).unwrap();
    let engine = Engine::new(mapping);

    let result = engine.resolve("first={{X}} second={{UNDEFINED}}");
    let err = result.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("UNDEFINED"));
    assert!(!message.contains("first=2"));
    assert!(matches!(err.root_cause(), VarError::UndefinedVariable(_)));
}

#[test]
fn test_request_file_with_functions() {
    let dock = create_dock();
    let root = dock.path();
    write_file(root, "a/b/payload.txt", "abc");
    write_file(
        root,
        "a/b/upload.http",
        "POST https://{{HOST}}/upload\n\
         X-Request-Id: {{uuid()}}\n\
         X-Digest: {{sha256('payload.txt')}}\n\
         \n\
         {\"data\": \"{{file('payload.txt')}}\"}\n",
    );

    let mut config = ResolverConfig::default();
    config.file_base_dir = Some(root.join("a/b"));

    let text = resolve_request(root, "a/b/upload.http", Some("prod"), &config).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "POST https://prod.example.com/upload");
    assert_eq!(lines[1].len(), "X-Request-Id: ".len() + 36);
    assert_eq!(
        lines[2],
        "X-Digest: ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(lines[4], "{\"data\": \"YWJj\"}");
}

#[test]
fn test_missing_data_file_fails_request() {
    let dock = create_dock();
    write_file(dock.path(), "a/req.http", "{{file('nope.bin')}}");

    let mut config = ResolverConfig::default();
    config.file_base_dir = Some(dock.path().to_path_buf());

    let err = resolve_request(dock.path(), "a/req.http", None, &config).unwrap_err();
    match err {
        Error::Variable(err) => assert!(matches!(
            err.root_cause(),
            VarError::FunctionExecution { function, .. } if function == "file"
        )),
        other => panic!("Expected Variable error, got {:?}", other),
    }
}

#[test]
fn test_custom_function_alongside_builtins() {
    let mut engine = Engine::new(HashMap::new());
    engine
        .register("upper", Arity::Exactly(1), |args| Ok(args[0].to_uppercase()))
        .unwrap();

    assert!(engine.register("uuid", Arity::Exactly(0), |_| Ok(String::new())).is_err());
    assert_eq!(
        engine.resolve("{{upper(join('a', 'b', '+'))}}").unwrap(),
        "A+B"
    );
    assert_eq!(engine.resolve("{{uuid()}}").unwrap().len(), 36);
}

#[test]
fn test_engine_shared_across_threads() {
    let mut env = HashMap::new();
    env.insert("NAME".to_string(), "rq".to_string());
    let engine = std::sync::Arc::new(Engine::new(env));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = std::sync::Arc::clone(&engine);
            std::thread::spawn(move || {
                engine
                    .resolve(&format!("{{{{NAME}}}}-{}-{{{{base64('x')}}}}", i))
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("rq-{}-eA==", i));
    }
}
