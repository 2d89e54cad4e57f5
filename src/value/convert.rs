//! Conversion of reflected values into dynamic [`Value`]s.

use super::reflect::{Primitive, Reflect, Shape};
use super::value::{Map, Value};
use crate::schema::{FieldInfo, ShapeInfo};

/// Converts any reflected value into a [`Value`] document.
///
/// Records become maps keyed by field name, absent indirections and empty
/// unions become `Null`, opaque values are rendered with `Debug`, and
/// callables are dropped to `Null`.
pub fn to_value(value: &dyn Reflect) -> Value {
    match value.reflect() {
        Shape::Primitive(p) => primitive_to_value(p),
        Shape::Struct(fields) => {
            let names: &[FieldInfo] = match value.type_info().shape {
                ShapeInfo::Struct(infos) => infos,
                _ => &[],
            };
            Value::Map(
                names
                    .iter()
                    .zip(fields)
                    .map(|(info, field)| (info.name.to_string(), to_value(field)))
                    .collect(),
            )
        }
        Shape::Indirection(inner) | Shape::Union(inner) => inner.map(to_value).unwrap_or_default(),
        Shape::Sequence(items) => Value::List(items.into_iter().map(to_value).collect()),
        Shape::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(key, v)| (key, to_value(v)))
                .collect::<Map>(),
        ),
        Shape::Opaque => Value::String(format!("{:?}", value)),
        Shape::Callable => Value::Null,
    }
}

fn primitive_to_value(p: Primitive<'_>) -> Value {
    match p {
        Primitive::Bool(b) => Value::Bool(b),
        Primitive::I8(i) => Value::Int(i.into()),
        Primitive::I16(i) => Value::Int(i.into()),
        Primitive::I32(i) => Value::Int(i.into()),
        Primitive::I64(i) => Value::Int(i),
        Primitive::U8(u) => Value::Int(u.into()),
        Primitive::U16(u) => Value::Int(u.into()),
        Primitive::U32(u) => Value::Int(u.into()),
        Primitive::Isize(_) | Primitive::U64(_) | Primitive::Usize(_) => {
            // Out-of-range integers keep their exact digits as text.
            let text = p.to_text();
            text.parse::<i64>().map(Value::Int).unwrap_or(Value::String(text))
        }
        Primitive::F32(f) => Value::Float(f.into()),
        Primitive::F64(f) => Value::Float(f),
        Primitive::Str(s) => Value::String(s.to_string()),
        Primitive::Pointer(addr) => Value::String(format!("{:#x}", addr)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[derive(Debug, Clone)]
    struct Company {
        name: String,
        link: Option<String>,
        size: u64,
    }

    crate::reflect_struct!(Company { name as "Name", link as "Link", size as "Size" });

    #[test]
    fn test_struct_to_value() {
        let company = Company {
            name: "aws".into(),
            link: None,
            size: u64::MAX,
        };
        let value = to_value(&company);
        let map = value.as_map().unwrap();
        assert_eq!(map.get("Name"), Some(&Value::from("aws")));
        assert_eq!(map.get("Link"), Some(&Value::Null));
        assert_eq!(map.get("Size"), Some(&Value::String(u64::MAX.to_string())));
    }

    #[test]
    fn test_sequence_and_opaque_to_value() {
        let items = vec![Some(1i32), None];
        assert_eq!(
            to_value(&items),
            Value::List(vec![Value::Int(1), Value::Null])
        );
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert!(to_value(&at).is_string());
    }

    #[test]
    fn test_union_to_value_is_identity() {
        let doc = Value::List(vec![Value::from("a"), Value::Float(1.5)]);
        assert_eq!(to_value(&doc), doc);
    }
}
