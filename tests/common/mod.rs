//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Once;

use reverse_router::RouteManager;

static INIT: Once = Once::new();

/// Initializes tracing once per test binary. `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A manager populated with the trees most tests exercise.
pub fn sample_manager() -> RouteManager {
    init_tracing();

    let manager = RouteManager::new();
    manager.register_group(
        "api",
        "https://api.example.com",
        vec![("user", "/users/:id"), ("search", "/search")],
    );

    let frontend = manager.register_group::<_, String, String>(
        "frontend",
        "https://example.com",
        std::iter::empty(),
    );
    frontend.register_group("en", "/en", vec![("about", "/about-us")]);

    manager
}
