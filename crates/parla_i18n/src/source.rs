//! Where message templates come from.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use crate::catalog::{CatalogFormat, MessageCatalog};
use crate::error::{I18nError, Result};
use crate::locale::normalize_locale;
use crate::template::Template;

/// Supplies raw templates by `(locale, namespace, key)`.
///
/// Locale codes passed in are already normalized (`en-ca`).
pub trait MessageSource: Send + Sync {
    /// Called once a locale is registered. Sources may ignore locales that
    /// were never bound.
    fn bind(&self, _locale: &str) {}

    /// `Ok(None)` when the key is absent; errors mean the backing data is
    /// unusable.
    fn fetch(&self, locale: &str, namespace: &str, key: &str) -> Result<Option<Template>>;
}

fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty()
        && namespace != "."
        && namespace != ".."
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
}

/// Catalog files on disk, laid out as `<dir>/<namespace>/<locale>.<ext>`.
///
/// `<locale>` may use any casing or separator (`en_CA.yaml`, `en-ca.json`).
/// When several search directories hold the same slot, later directories
/// override keys from earlier ones. Each slot is read once and then served
/// from memory; loading one slot never blocks lookups in another.
pub struct DirectorySource {
    dirs: Vec<PathBuf>,
    bound: RwLock<HashSet<String>>,
    slots: RwLock<HashMap<(String, String), Arc<Slot>>>,
}

/// One `(locale, namespace)` cache entry. `None` until a load succeeds.
type Slot = Mutex<Option<Arc<MessageCatalog>>>;

impl DirectorySource {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
            bound: RwLock::new(HashSet::new()),
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Number of slots loaded so far.
    pub fn loaded_slots(&self) -> usize {
        self.slots
            .read()
            .unwrap()
            .values()
            .filter(|slot| slot.lock().unwrap().is_some())
            .count()
    }

    fn slot(&self, locale: &str, namespace: &str) -> Arc<Slot> {
        let key = (locale.to_string(), namespace.to_string());
        if let Some(slot) = self.slots.read().unwrap().get(&key) {
            return Arc::clone(slot);
        }
        Arc::clone(self.slots.write().unwrap().entry(key).or_default())
    }

    /// The map lock is only held to find the slot; the disk read happens
    /// under the slot's own lock, so concurrent callers of one slot wait for
    /// a single load.
    fn catalog(&self, locale: &str, namespace: &str) -> Result<Arc<MessageCatalog>> {
        let slot = self.slot(locale, namespace);
        let mut loaded = slot.lock().unwrap();
        if let Some(cat) = loaded.as_ref() {
            return Ok(Arc::clone(cat));
        }
        let cat = Arc::new(self.load(locale, namespace)?);
        *loaded = Some(Arc::clone(&cat));
        Ok(cat)
    }

    fn load(&self, locale: &str, namespace: &str) -> Result<MessageCatalog> {
        let mut merged = MessageCatalog::new();
        for dir in &self.dirs {
            for path in catalog_files(&dir.join(namespace), locale)? {
                let cat = read_catalog(&path)?;
                debug!(
                    locale,
                    namespace,
                    path = %path.display(),
                    entries = cat.len(),
                    "loaded message catalog"
                );
                merged.merge(cat);
            }
        }
        Ok(merged)
    }
}

/// Files in `dir` whose stem names `locale`, in path order.
fn catalog_files(dir: &Path, locale: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir).map_err(|source| I18nError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| I18nError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() || CatalogFormat::from_path(&path).is_none() {
            continue;
        }
        let matches = path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| normalize_locale(stem) == locale);
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_catalog(path: &Path) -> Result<MessageCatalog> {
    let format = CatalogFormat::from_path(path).ok_or_else(|| I18nError::InvalidLocaleFile {
        path: path.to_path_buf(),
        reason: "unsupported file extension".to_string(),
    })?;
    let src = fs::read_to_string(path).map_err(|source| I18nError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    MessageCatalog::parse(&src, format).map_err(|e| I18nError::InvalidLocaleFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

impl MessageSource for DirectorySource {
    fn bind(&self, locale: &str) {
        self.bound.write().unwrap().insert(locale.to_string());
    }

    fn fetch(&self, locale: &str, namespace: &str, key: &str) -> Result<Option<Template>> {
        if !self.bound.read().unwrap().contains(locale) {
            return Ok(None);
        }
        if !is_valid_namespace(namespace) {
            debug!(namespace, "ignoring invalid namespace");
            return Ok(None);
        }
        Ok(self.catalog(locale, namespace)?.get(key).cloned())
    }
}

/// In-process catalogs, keyed by locale and namespace.
#[derive(Default)]
pub struct MemorySource {
    catalogs: RwLock<HashMap<(String, String), MessageCatalog>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(self, locale: &str, namespace: &str, catalog: MessageCatalog) -> Self {
        self.insert(locale, namespace, catalog);
        self
    }

    /// Add `catalog` to the slot, overriding existing keys.
    pub fn insert(&self, locale: &str, namespace: &str, catalog: MessageCatalog) {
        let slot = (normalize_locale(locale), namespace.to_string());
        self.catalogs
            .write()
            .unwrap()
            .entry(slot)
            .or_default()
            .merge(catalog);
    }
}

impl MessageSource for MemorySource {
    fn fetch(&self, locale: &str, namespace: &str, key: &str) -> Result<Option<Template>> {
        let slot = (locale.to_string(), namespace.to_string());
        Ok(self
            .catalogs
            .read()
            .unwrap()
            .get(&slot)
            .and_then(|cat| cat.get(key))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn unbound_locale_has_no_messages() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "messages/en.json", r#"{ "hi": "Hello" }"#);

        let source = DirectorySource::new([tmp.path()]);
        assert_eq!(source.fetch("en", "messages", "hi").unwrap(), None);

        source.bind("en");
        assert_eq!(
            source.fetch("en", "messages", "hi").unwrap(),
            Some(Template::from("Hello"))
        );
    }

    #[test]
    fn file_names_are_matched_by_normalized_code() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "messages/en_CA.yaml", "colour: \"colour\"\n");

        let source = DirectorySource::new([tmp.path()]);
        source.bind("en-ca");
        assert_eq!(
            source.fetch("en-ca", "messages", "colour").unwrap(),
            Some(Template::from("colour"))
        );
    }

    #[test]
    fn later_directories_override_earlier_keys() {
        let base = tempfile::tempdir().unwrap();
        let overlay = tempfile::tempdir().unwrap();
        write(base.path(), "messages/en.json", r#"{ "a": "base a", "b": "base b" }"#);
        write(overlay.path(), "messages/en.yml", "a: \"overlay a\"\n");

        let source = DirectorySource::new([base.path(), overlay.path()]);
        source.bind("en");
        assert_eq!(
            source.fetch("en", "messages", "a").unwrap(),
            Some(Template::from("overlay a"))
        );
        assert_eq!(
            source.fetch("en", "messages", "b").unwrap(),
            Some(Template::from("base b"))
        );
    }

    #[test]
    fn slots_are_loaded_once() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "messages/en.json", r#"{ "hi": "Hello" }"#);

        let source = DirectorySource::new([tmp.path()]);
        source.bind("en");
        assert!(source.fetch("en", "messages", "hi").unwrap().is_some());
        assert_eq!(source.loaded_slots(), 1);

        // Changes on disk are not picked up once a slot is cached.
        write(tmp.path(), "messages/en.json", r#"{ "hi": "Changed" }"#);
        assert_eq!(
            source.fetch("en", "messages", "hi").unwrap(),
            Some(Template::from("Hello"))
        );
        assert!(source.fetch("en", "messages", "missing").unwrap().is_none());
        assert_eq!(source.loaded_slots(), 1);
    }

    #[test]
    fn malformed_file_is_reported_with_path() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "messages/fr.json", r#"{ "hi": 3 }"#);

        let source = DirectorySource::new([tmp.path()]);
        source.bind("fr");
        match source.fetch("fr", "messages", "hi") {
            Err(I18nError::InvalidLocaleFile { path, .. }) => {
                assert!(path.ends_with("messages/fr.json"));
            }
            other => panic!("expected InvalidLocaleFile, got {other:?}"),
        }
        assert_eq!(source.loaded_slots(), 0);

        // Failed loads are retried.
        write(tmp.path(), "messages/fr.json", r#"{ "hi": "Salut" }"#);
        assert_eq!(
            source.fetch("fr", "messages", "hi").unwrap(),
            Some(Template::from("Salut"))
        );
        assert_eq!(source.loaded_slots(), 1);
    }

    #[test]
    fn a_busy_slot_does_not_block_other_slots() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "messages/en.json", r#"{ "hi": "Hello" }"#);
        write(tmp.path(), "errors/en.json", r#"{ "oops": "Oops" }"#);

        let source = DirectorySource::new([tmp.path()]);
        source.bind("en");

        // Hold the `messages` slot as an in-flight load would.
        let busy = source.slot("en", "messages");
        let _guard = busy.lock().unwrap();
        assert_eq!(
            source.fetch("en", "errors", "oops").unwrap(),
            Some(Template::from("Oops"))
        );
    }

    #[test]
    fn concurrent_lookups_share_one_load() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "messages/en.json", r#"{ "hi": "Hello" }"#);

        let source = DirectorySource::new([tmp.path()]);
        source.bind("en");

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| source.fetch("en", "messages", "hi").unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), Some(Template::from("Hello")));
            }
        });
        assert_eq!(source.loaded_slots(), 1);
        assert_eq!(source.slots.read().unwrap().len(), 1);
    }

    #[test]
    fn namespaces_cannot_escape_the_search_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let source = DirectorySource::new([tmp.path()]);
        source.bind("en");
        assert_eq!(source.fetch("en", "..", "hi").unwrap(), None);
        assert_eq!(source.fetch("en", "a/b", "hi").unwrap(), None);
    }

    #[test]
    fn memory_source_normalizes_codes() {
        let source = MemorySource::new().with_catalog(
            "en_CA",
            "messages",
            MessageCatalog::new().with("files", Template::plural([(Rule::Other, "{count} files")])),
        );
        assert!(source.fetch("en-ca", "messages", "files").unwrap().is_some());
        assert!(source.fetch("en-ca", "errors", "files").unwrap().is_none());
    }
}
