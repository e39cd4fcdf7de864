//! Concurrent readers and writers against one shared tree.

use std::collections::HashMap;
use std::thread;

use reverse_router::RouteManager;

mod common;

#[test]
fn concurrent_builds_and_var_writes_do_not_interfere() {
    common::init_tracing();

    let manager = RouteManager::new();
    manager.register_group(
        "api",
        "https://api.example.com",
        vec![("user", "/users/:id")],
    );
    let frontend =
        manager.register_group::<_, String, String>("frontend", "https://example.com", std::iter::empty());
    frontend.register_group("en", "/en", vec![("about", "/about-us")]);

    let mut handles = Vec::new();

    // Readers hammer the api tree.
    for _ in 0..8 {
        let manager = manager.clone();
        handles.push(thread::spawn(move || {
            for i in 0..500 {
                let url = manager
                    .group("api")
                    .builder("user")
                    .with_param("id", i)
                    .build()
                    .unwrap();
                assert_eq!(url, format!("https://api.example.com/users/{i}"));
            }
        }));
    }

    // Writers mutate a different branch of the same tree.
    for worker in 0..4 {
        let manager = manager.clone();
        handles.push(thread::spawn(move || {
            let en = manager.group("frontend.en");
            for i in 0..500 {
                en.set_template_var(format!("k{worker}"), i.to_string());
            }
        }));
    }

    // More readers render the branch being written to; the URL itself is
    // stable because no written variable feeds concatenation mode.
    for _ in 0..4 {
        let manager = manager.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..500 {
                let url = manager
                    .group("frontend.en")
                    .render("about", &HashMap::new(), &Default::default())
                    .unwrap();
                assert_eq!(url, "https://example.com/en/about-us");
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Each writer's last value landed.
    let en = manager.group("frontend.en");
    for worker in 0..4 {
        assert_eq!(en.template_var(&format!("k{worker}")), Some("499".to_string()));
    }
}

#[test]
fn concurrent_child_registration_is_race_free() {
    common::init_tracing();

    let manager = RouteManager::new();
    manager.register_group::<_, String, String>("root", "https://example.com", std::iter::empty());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let manager = manager.clone();
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                manager
                    .ensure_group(&format!("root.branch{}", i % 5))
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // Exactly five children exist, each resolvable to a single group.
    for i in 0..5 {
        let group = manager.group(&format!("root.branch{i}"));
        assert_eq!(group.fqn(), format!("root.branch{i}"));
    }
}
