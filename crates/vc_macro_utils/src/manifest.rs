use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find how a sibling crate is reachable
/// from code emitted by a derive macro.
///
/// ```rust
/// # use vc_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_mapper"));
/// ```
///
/// # Resolution rules
///
/// Checked in `dependencies` first, then in `dev-dependencies`:
///
/// 1. The crate is listed under its own name: `::vc_mapper`.
/// 2. The crate is listed under another key with `package = "vc_mapper"`:
///    `::that_key`.
/// 3. The facade crate `vc_bind` is listed and the requested name starts
///    with `vc_`: `::vc_bind::mapper`.
///
/// Anything else falls back to `::vc_mapper`.
///
/// A crate that derives on its own types needs `extern crate self as
/// vc_mapper;` at its root so that the absolute path resolves there too.
#[derive(Debug)]
pub struct Manifest {
    document: Document<Box<str>>,
    modified: Option<SystemTime>,
}

const FACADE_NAME: &str = "vc_bind";
const CRATE_PREFIX: &str = "vc_";

impl Manifest {
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.");
        let mut path = PathBuf::from(dir);
        path.push("Cargo.toml");
        path
    }

    fn modified_time(path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
    }

    fn load(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()));
        Document::parse(text.into_boxed_str())
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    fn absolute(segments: &[&str]) -> syn::Path {
        let text = segments.iter().fold(String::new(), |mut acc, seg| {
            acc.push_str("::");
            acc.push_str(seg);
            acc
        });
        syn::parse_str(&text).unwrap_or_else(|_| panic!("`{text}` is not a valid path"))
    }

    fn renamed_key<'a>(deps: &'a Table, name: &str) -> Option<&'a str> {
        deps.iter().find_map(|(key, item)| {
            let package = item.get("package").and_then(Item::as_str)?;
            (package == name).then_some(key)
        })
    }

    fn lookup(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::absolute(&[name]));
        }
        if let Some(key) = Self::renamed_key(deps, name) {
            return Some(Self::absolute(&[&key.replace('-', "_")]));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        if deps.contains_key(FACADE_NAME) {
            return Some(Self::absolute(&[FACADE_NAME, module]));
        }
        None
    }

    /// Path under which the crate `name` is reachable from the caller.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .filter_map(|section| match self.document.get(section) {
                Some(Item::Table(deps)) => Some(deps),
                _ => None,
            })
            .find_map(|deps| Self::lookup(deps, name))
            .unwrap_or_else(|| Self::absolute(&[name]))
    }

    /// Runs `func` with the caller's parsed manifest.
    ///
    /// Parsed manifests are cached per path and reloaded when the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified = Self::modified_time(&path);

        {
            let cache = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cache.get(&path)
                && modified.is_some()
                && manifest.modified == modified
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            document: Self::load(&path),
            modified,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}
