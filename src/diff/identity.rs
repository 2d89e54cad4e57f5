//! Element identities for sequence alignment.

use std::any::TypeId;
use std::collections::HashSet;
use std::sync::Arc;

use super::defaults::primitive_identity;
use super::registry::Differ;
use crate::schema::{ShapeInfo, TypeInfo};
use crate::value::{Reflect, Shape};

/// Identity of an absent value, and of a value whose identity chain crosses
/// an absent link.
pub const ZERO_IDENTITY: &str = "_ZERO_VALUE_";

/// Field names that carry a record's identity.
const ID_FIELDS: [&str; 2] = ["ID", "Id"];

/// IdAccessor is the chain of field positions leading from a record to its
/// identity field, possibly through embedded records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAccessor {
    steps: Vec<usize>,
}

impl IdAccessor {
    /// Searches `info` for an identity field.
    ///
    /// Direct fields are tried first, then embedded records depth first.
    /// Embedded records may sit behind one indirection layer.
    pub fn derive(info: &TypeInfo) -> Option<IdAccessor> {
        let mut visited = HashSet::new();
        let mut steps = find_id_chain(info, &mut visited)?;
        steps.reverse();
        Some(IdAccessor { steps })
    }

    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    /// Reads the identity of `value` through the chain.
    pub fn resolve(&self, value: &dyn Reflect) -> String {
        let mut current = value;
        for &step in &self.steps {
            let Some(record) = deref(current) else {
                return ZERO_IDENTITY.to_string();
            };
            match record.reflect() {
                Shape::Struct(fields) => match fields.get(step) {
                    Some(field) => current = *field,
                    None => return ZERO_IDENTITY.to_string(),
                },
                _ => return ZERO_IDENTITY.to_string(),
            }
        }
        match deref(current).map(|v| v.reflect()) {
            Some(Shape::Primitive(p)) => p.to_text(),
            _ => ZERO_IDENTITY.to_string(),
        }
    }
}

/// Strips one indirection layer. Returns `None` for an absent pointee.
fn deref(value: &dyn Reflect) -> Option<&dyn Reflect> {
    match value.reflect() {
        Shape::Indirection(inner) => inner,
        _ => Some(value),
    }
}

/// Returns the chain in reverse order, innermost field first.
fn find_id_chain(info: &TypeInfo, visited: &mut HashSet<TypeId>) -> Option<Vec<usize>> {
    let ShapeInfo::Struct(fields) = info.shape else {
        return None;
    };
    if !visited.insert(info.id) {
        return None;
    }
    let direct = fields
        .iter()
        .position(|f| ID_FIELDS.contains(&f.name));
    if let Some(index) = direct {
        if fields[index].type_info().is_primitive_like() {
            return Some(vec![index]);
        }
    }
    for (index, field) in fields.iter().enumerate().filter(|(_, f)| f.embedded) {
        let embedded = field.type_info().strip_indirection();
        if let Some(mut chain) = find_id_chain(&embedded, visited) {
            chain.push(index);
            return Some(chain);
        }
    }
    None
}

impl Differ {
    /// Returns the identity used to align `value` inside a sequence.
    ///
    /// Resolution order: registered type identity, derived `ID`/`Id` field
    /// chain for records, kind identity for primitives, `Debug` text.
    /// Optional layers are stripped first and empty ones yield
    /// [`ZERO_IDENTITY`]. Never fails.
    pub fn identity_of(&self, value: &dyn Reflect) -> String {
        let info = value.type_info();
        if let Some(f) = self.identities.get(&info.id) {
            return f(value);
        }
        match value.reflect() {
            Shape::Union(inner) | Shape::Indirection(inner) => match inner {
                Some(inner) => self.identity_of(inner),
                None => ZERO_IDENTITY.to_string(),
            },
            Shape::Struct(_) => match self.id_accessor(&info) {
                Some(accessor) => accessor.resolve(value),
                None => format!("{:?}", value),
            },
            Shape::Primitive(p) => match self.kind_identities.get(&p.kind()) {
                Some(f) => f(&p),
                None => primitive_identity(&p),
            },
            _ => format!("{:?}", value),
        }
    }

    /// Returns the cached accessor chain of a record type.
    fn id_accessor(&self, info: &TypeInfo) -> Option<Arc<IdAccessor>> {
        {
            let cache = self
                .id_cache
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(cached) = cache.get(&info.id) {
                return cached.clone();
            }
        }
        let accessor = IdAccessor::derive(info).map(Arc::new);
        tracing::trace!(type_name = info.name, found = accessor.is_some(), "derived id accessor");
        let mut cache = self
            .id_cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.entry(info.id).or_insert(accessor).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Plain {
        id: String,
    }

    #[derive(Debug, Clone, Default)]
    struct OptionalId {
        id: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    struct NumericId {
        id: i32,
        name: String,
    }

    #[derive(Debug, Clone, Default)]
    struct Base {
        id: i64,
    }

    #[derive(Debug, Clone, Default)]
    struct Embedding {
        name: String,
        base: Base,
    }

    #[derive(Debug, Clone, Default)]
    struct EmbeddingPointer {
        base: Option<Base>,
    }

    #[derive(Debug, Clone, Default)]
    struct Nested {
        inner: EmbeddingPointer,
    }

    #[derive(Debug, Clone, Default)]
    struct NotNamed {
        key: String,
    }

    #[derive(Debug, Clone, Default)]
    struct NonPrimitiveId {
        id: Vec<u8>,
    }

    #[derive(Debug, Clone, Copy)]
    struct IdType(u32);

    crate::reflect_struct!(Plain { id as "ID" });
    crate::reflect_struct!(OptionalId { id as "ID" });
    crate::reflect_struct!(NumericId { id as "Id", name as "Name" });
    crate::reflect_struct!(Base { id as "ID" });
    crate::reflect_struct!(Embedding { name as "Name", #[embed] base as "Base" });
    crate::reflect_struct!(EmbeddingPointer { #[embed] base as "Base" });
    crate::reflect_struct!(Nested { #[embed] inner as "EmbeddingPointer" });
    crate::reflect_struct!(NotNamed { key as "Key" });
    crate::reflect_struct!(NonPrimitiveId { id as "ID" });
    crate::reflect_primitive!(IdType(u32));

    #[test]
    fn test_derive_direct_field() {
        let accessor = IdAccessor::derive(&NumericId::static_type()).unwrap();
        assert_eq!(accessor.steps(), &[0]);
        assert!(IdAccessor::derive(&NotNamed::static_type()).is_none());
        assert!(IdAccessor::derive(&NonPrimitiveId::static_type()).is_none());
        assert!(IdAccessor::derive(&String::static_type()).is_none());
    }

    #[test]
    fn test_derive_through_embedding() {
        let accessor = IdAccessor::derive(&Embedding::static_type()).unwrap();
        assert_eq!(accessor.steps(), &[1, 0]);
        let accessor = IdAccessor::derive(&Nested::static_type()).unwrap();
        assert_eq!(accessor.steps(), &[0, 0, 0]);
    }

    #[test]
    fn test_identity_of_records() {
        let differ = Differ::new();
        assert_eq!(differ.identity_of(&Plain { id: "x1".into() }), "x1");
        assert_eq!(differ.identity_of(&OptionalId { id: None }), ZERO_IDENTITY);
        assert_eq!(differ.identity_of(&OptionalId { id: Some("7".into()) }), "7");
        assert_eq!(differ.identity_of(&NumericId::default()), "0");
        let embedding = Embedding {
            name: "n".into(),
            base: Base { id: 42 },
        };
        assert_eq!(differ.identity_of(&embedding), "42");
    }

    #[test]
    fn test_absent_link_yields_zero() {
        let differ = Differ::new();
        assert_eq!(differ.identity_of(&Nested::default()), ZERO_IDENTITY);
        let nested = Nested {
            inner: EmbeddingPointer {
                base: Some(Base { id: 5 }),
            },
        };
        assert_eq!(differ.identity_of(&nested), "5");
    }

    #[test]
    fn test_identity_of_primitives_and_fallback() {
        let differ = Differ::new();
        assert_eq!(differ.identity_of(&IdType(100)), "100");
        assert_eq!(differ.identity_of(&true), "t");
        assert_eq!(differ.identity_of(&2.5f64), "2.500000");
        assert_eq!(differ.identity_of(&Some(3u8)), "3");
        assert_eq!(differ.identity_of(&None::<u8>), ZERO_IDENTITY);
        let key = NotNamed { key: "k".into() };
        assert_eq!(differ.identity_of(&key), format!("{:?}", key));
    }

    #[test]
    fn test_registered_identities_win() {
        let mut differ = Differ::new();
        differ
            .register_identity(|v: &Plain| format!("plain-{}", v.id))
            .unwrap();
        differ
            .register_kind_identity(|s: String| s.to_uppercase())
            .unwrap();
        assert_eq!(differ.identity_of(&Plain { id: "a".into() }), "plain-a");
        assert_eq!(differ.identity_of(&String::from("abc")), "ABC");
    }

    #[test]
    fn test_accessor_is_cached() {
        let differ = Differ::new();
        differ.identity_of(&Plain::default());
        differ.identity_of(&NotNamed::default());
        let cache = differ.id_cache.read().unwrap();
        assert!(cache.get(&TypeId::of::<Plain>()).unwrap().is_some());
        assert!(cache.get(&TypeId::of::<NotNamed>()).unwrap().is_none());
    }
}
