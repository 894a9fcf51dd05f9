use std::sync::Arc;

use parla_i18n::{args, resolve, resolve_message, t, I18n, LocaleRegistry, MemorySource, MessageCatalog};
use pretty_assertions::assert_eq;

fn registry(greeting: &str) -> LocaleRegistry {
    let source = MemorySource::new().with_catalog(
        "en",
        "messages",
        MessageCatalog::new().with("greeting", greeting),
    );
    let mut reg = LocaleRegistry::new(Arc::new(source));
    reg.register("en").unwrap();
    reg.set_default(Some("en")).unwrap();
    reg
}

// One test owns the process-wide slot so ordering between tests cannot matter.
#[test]
fn global_registry_lifecycle() {
    assert!(I18n::try_get().is_none());
    assert_eq!(resolve("greeting", &args! { name: "Ada" }), "greeting");
    assert_eq!(resolve_message(&t!("greeting")), "greeting");

    assert!(I18n::install(registry("Hello, {name}!")).is_ok());
    assert_eq!(resolve("greeting", &args! { name: "Ada" }), "Hello, Ada!");
    assert_eq!(
        resolve_message(&t!("greeting", { name: "Grace" })),
        "Hello, Grace!"
    );
    assert_eq!(resolve("unknown", &args!()), "unknown");

    // First install wins.
    assert!(I18n::install(registry("Hi")).is_err());
    assert_eq!(resolve("greeting", &args! { name: "Ada" }), "Hello, Ada!");
}
