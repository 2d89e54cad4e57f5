//! The differ and its override tables.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use super::config::DiffConfig;
use super::error::ConfigError;
use super::event::{DiffEvent, EventValue, Reason};
use super::identity::IdAccessor;
use super::patch::Patch;
use super::traverse::Walker;
use crate::fieldpath::{OmitRules, Path};
use crate::schema::{Kind, ShapeInfo, TypeInfo};
use crate::value::{Primitive, Reflect};

pub(crate) type CompareFn = Arc<dyn Fn(&dyn Reflect, &dyn Reflect) -> bool + Send + Sync>;
pub(crate) type KindCompareFn = Arc<dyn Fn(&Primitive<'_>, &Primitive<'_>) -> bool + Send + Sync>;
pub(crate) type IdentityFn = Arc<dyn Fn(&dyn Reflect) -> String + Send + Sync>;
pub(crate) type KindIdentityFn = Arc<dyn Fn(&Primitive<'_>) -> String + Send + Sync>;

/// Differ compares two values structurally and reports every divergence.
///
/// A differ holds the comparator and identity overrides plus the omission
/// rules. Register everything first; a configured differ can then be shared
/// across threads and used for any number of comparisons.
///
/// Comparator resolution at a given path is: path+type override, then type
/// override, then the kind comparator for primitives, then structural
/// recursion.
pub struct Differ {
    pub(crate) comparators: HashMap<TypeId, CompareFn>,
    pub(crate) path_comparators: HashMap<(String, TypeId), CompareFn>,
    pub(crate) kind_comparators: HashMap<Kind, KindCompareFn>,
    pub(crate) identities: HashMap<TypeId, IdentityFn>,
    pub(crate) kind_identities: HashMap<Kind, KindIdentityFn>,
    pub(crate) omit: OmitRules,
    pub(crate) id_cache: RwLock<HashMap<TypeId, Option<Arc<IdAccessor>>>>,
}

impl Default for Differ {
    fn default() -> Self {
        Differ::new()
    }
}

impl fmt::Debug for Differ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Differ")
            .field("comparators", &self.comparators.len())
            .field("path_comparators", &self.path_comparators.len())
            .field("kind_comparators", &self.kind_comparators.len())
            .field("identities", &self.identities.len())
            .field("kind_identities", &self.kind_identities.len())
            .field("omit", &self.omit)
            .finish()
    }
}

fn check_comparable(info: &TypeInfo) -> Result<(), ConfigError> {
    match info.shape {
        ShapeInfo::Callable => Err(ConfigError::uncomparable(info.name)),
        _ => Ok(()),
    }
}

fn check_primitive(info: &TypeInfo) -> Result<Kind, ConfigError> {
    info.kind().ok_or_else(|| ConfigError::not_primitive(info.name))
}

fn typed_comparator<T, F>(f: F) -> CompareFn
where
    T: Reflect,
    F: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    Arc::new(move |l: &dyn Reflect, r: &dyn Reflect| {
        match (l.downcast_ref::<T>(), r.downcast_ref::<T>()) {
            (Some(l), Some(r)) => f(l, r),
            _ => false,
        }
    })
}

impl Differ {
    /// Creates a differ with the default comparators installed.
    pub fn new() -> Self {
        let mut differ = Differ {
            comparators: HashMap::new(),
            path_comparators: HashMap::new(),
            kind_comparators: HashMap::new(),
            identities: HashMap::new(),
            kind_identities: HashMap::new(),
            omit: OmitRules::new(),
            id_cache: RwLock::new(HashMap::new()),
        };
        differ.install_defaults();
        differ
    }

    /// Creates a differ and applies a configuration to it.
    pub fn with_config(config: &DiffConfig) -> Self {
        let mut differ = Differ::new();
        differ.apply_config(config);
        differ
    }

    /// Applies the omission patterns of a configuration.
    pub fn apply_config(&mut self, config: &DiffConfig) {
        self.omit_path(&config.omit);
    }

    /// Registers an equality function for every value of type `T`.
    pub fn register<T, F>(&mut self, f: F) -> Result<(), ConfigError>
    where
        T: Reflect,
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let info = T::static_type();
        check_comparable(&info)?;
        tracing::debug!(type_name = info.name, "registered type comparator");
        self.comparators.insert(info.id, typed_comparator(f));
        Ok(())
    }

    /// Registers an equality function for values of type `T` found exactly
    /// at `path`. It takes precedence over a type-wide comparator.
    pub fn register_at_path<T, F>(&mut self, path: &str, f: F) -> Result<(), ConfigError>
    where
        T: Reflect,
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let info = T::static_type();
        check_comparable(&info)?;
        let path = Path::parse(path)?;
        tracing::debug!(type_name = info.name, path = %path, "registered path comparator");
        self.path_comparators
            .insert((path.to_string(), info.id), typed_comparator(f));
        Ok(())
    }

    /// Registers the equality function for the primitive kind of `T`.
    ///
    /// It replaces the default for that kind, and applies to every type of
    /// the kind, newtypes included.
    pub fn register_kind<T, F>(&mut self, f: F) -> Result<(), ConfigError>
    where
        T: Reflect,
        F: Fn(T, T) -> bool + Send + Sync + 'static,
    {
        let info = T::static_type();
        let kind = check_primitive(&info)?;
        tracing::debug!(kind = %kind, "registered kind comparator");
        let adapter: KindCompareFn = Arc::new(move |l: &Primitive<'_>, r: &Primitive<'_>| {
            match (T::from_primitive(l), T::from_primitive(r)) {
                (Some(l), Some(r)) => f(l, r),
                _ => false,
            }
        });
        self.kind_comparators.insert(kind, adapter);
        Ok(())
    }

    /// Registers the identity function used to align sequences of `T`.
    pub fn register_identity<T, F>(&mut self, f: F) -> Result<(), ConfigError>
    where
        T: Reflect,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let info = T::static_type();
        check_comparable(&info)?;
        tracing::debug!(type_name = info.name, "registered identity");
        let adapter: IdentityFn = Arc::new(move |v: &dyn Reflect| match v.downcast_ref::<T>() {
            Some(v) => f(v),
            None => format!("{:?}", v),
        });
        self.identities.insert(info.id, adapter);
        Ok(())
    }

    /// Registers the identity function for the primitive kind of `T`.
    pub fn register_kind_identity<T, F>(&mut self, f: F) -> Result<(), ConfigError>
    where
        T: Reflect,
        F: Fn(T) -> String + Send + Sync + 'static,
    {
        let info = T::static_type();
        let kind = check_primitive(&info)?;
        tracing::debug!(kind = %kind, "registered kind identity");
        let adapter: KindIdentityFn =
            Arc::new(move |p: &Primitive<'_>| match T::from_primitive(p) {
                Some(v) => f(v),
                None => p.to_text(),
            });
        self.kind_identities.insert(kind, adapter);
        Ok(())
    }

    /// Hides events whose path matches one of the patterns.
    ///
    /// A pattern is an absolute path (`.Spec.Name`, `.Items[*].Id`), a bare
    /// step name matched against the last step (`Name`), or a prefix ending
    /// in `.*` (`.Status.*`).
    pub fn omit_path<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            tracing::debug!(pattern = pattern.as_ref(), "omitting path");
            self.omit.add(pattern);
        }
    }

    /// Returns the omission rules.
    pub fn omit_rules(&self) -> &OmitRules {
        &self.omit
    }

    pub(crate) fn comparator_for(&self, path: &Path, id: TypeId) -> Option<&CompareFn> {
        if !self.path_comparators.is_empty() {
            if let Some(f) = self.path_comparators.get(&(path.to_string(), id)) {
                return Some(f);
            }
        }
        self.comparators.get(&id)
    }

    /// Compares `left` and `right`, passing every divergence to `callback`.
    ///
    /// The callback returns `false` to stop the comparison. The result is
    /// true when no event reached the callback. Values of different types
    /// produce a single `TypeMismatch` event at the root.
    pub fn compare<'a, F>(&self, left: &'a dyn Reflect, right: &'a dyn Reflect, mut callback: F) -> bool
    where
        F: FnMut(DiffEvent<'a>) -> bool,
    {
        let (lt, rt) = (left.type_info(), right.type_info());
        if lt != rt {
            tracing::debug!(left = lt.name, right = rt.name, "root type mismatch");
            callback(DiffEvent::new(
                Path::new(),
                Reason::TypeMismatch,
                EventValue::Borrowed(left),
                EventValue::Borrowed(right),
            ));
            return false;
        }
        tracing::debug!(type_name = lt.name, "comparing values");
        let mut walker = Walker::new(self, &mut callback);
        walker.compare(&Path::new(), left, right);
        let equal = !walker.difference_exist();
        tracing::debug!(equal, "comparison finished");
        equal
    }

    /// Returns true if the values are equal. Stops at the first visible
    /// divergence.
    pub fn equals(&self, left: &dyn Reflect, right: &dyn Reflect) -> bool {
        self.compare(left, right, |_| false)
    }

    /// Collects every event of a comparison into a [`Patch`].
    pub fn make_patch<'a>(&self, left: &'a dyn Reflect, right: &'a dyn Reflect) -> Patch<'a> {
        let mut patch = Patch::new();
        self.compare(left, right, |event| {
            patch.push(event);
            true
        });
        patch
    }
}

/// Compares two values with a default differ.
pub fn compare_value(left: &dyn Reflect, right: &dyn Reflect) -> bool {
    Differ::new().equals(left, right)
}
