//! Reflect implementations for std and chrono types.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;
use std::rc::Rc;
use std::sync::mpsc::{Sender, SyncSender};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use super::reflect::{key_text, Primitive, Reflect, Shape};
use crate::schema::{Kind, ShapeInfo, TypeInfo};

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn static_type() -> TypeInfo {
                    TypeInfo::new::<$ty>(ShapeInfo::Primitive(Kind::$kind))
                }

                fn type_info(&self) -> TypeInfo {
                    Self::static_type()
                }

                fn reflect(&self) -> Shape<'_> {
                    Shape::Primitive(Primitive::$kind(*self))
                }

                fn from_primitive(primitive: &Primitive<'_>) -> Option<Self> {
                    match primitive {
                        Primitive::$kind(v) => Some(*v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl Reflect for String {
    fn static_type() -> TypeInfo {
        TypeInfo::new::<String>(ShapeInfo::Primitive(Kind::String))
    }

    fn type_info(&self) -> TypeInfo {
        Self::static_type()
    }

    fn reflect(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Str(self.as_str()))
    }

    fn from_primitive(primitive: &Primitive<'_>) -> Option<Self> {
        match primitive {
            Primitive::Str(s) => Some(s.to_string()),
            _ => None,
        }
    }
}

impl Reflect for &'static str {
    fn static_type() -> TypeInfo {
        TypeInfo::new::<&'static str>(ShapeInfo::Primitive(Kind::String))
    }

    fn type_info(&self) -> TypeInfo {
        Self::static_type()
    }

    fn reflect(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Str(*self))
    }
}

macro_rules! impl_pointer {
    ($($ptr:ty),*) => {
        $(
            impl<T: 'static> Reflect for $ptr {
                fn static_type() -> TypeInfo {
                    TypeInfo::new::<$ptr>(ShapeInfo::Primitive(Kind::Pointer))
                }

                fn type_info(&self) -> TypeInfo {
                    Self::static_type()
                }

                fn reflect(&self) -> Shape<'_> {
                    Shape::Primitive(Primitive::Pointer(*self as usize))
                }

                fn from_primitive(primitive: &Primitive<'_>) -> Option<Self> {
                    match primitive {
                        Primitive::Pointer(addr) => Some(*addr as $ptr),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_pointer!(*const T, *mut T);

fn wrap_option<T: Reflect + Clone>(value: &dyn Reflect) -> Option<Box<dyn Reflect>> {
    value
        .downcast_ref::<T>()
        .map(|v| Box::new(Some(v.clone())) as Box<dyn Reflect>)
}

impl<T: Reflect + Clone> Reflect for Option<T> {
    fn static_type() -> TypeInfo {
        TypeInfo::new::<Option<T>>(ShapeInfo::Indirection {
            elem: T::static_type,
            wrap: wrap_option::<T>,
        })
    }

    fn type_info(&self) -> TypeInfo {
        Self::static_type()
    }

    fn reflect(&self) -> Shape<'_> {
        Shape::Indirection(self.as_ref().map(|v| v as &dyn Reflect))
    }
}

macro_rules! impl_smart_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Reflect + Clone> Reflect for $ptr<T> {
                fn static_type() -> TypeInfo {
                    fn wrap<T: Reflect + Clone>(value: &dyn Reflect) -> Option<Box<dyn Reflect>> {
                        value
                            .downcast_ref::<T>()
                            .map(|v| Box::new($ptr::new(v.clone())) as Box<dyn Reflect>)
                    }
                    TypeInfo::new::<$ptr<T>>(ShapeInfo::Indirection {
                        elem: T::static_type,
                        wrap: wrap::<T>,
                    })
                }

                fn type_info(&self) -> TypeInfo {
                    Self::static_type()
                }

                fn reflect(&self) -> Shape<'_> {
                    Shape::Indirection(Some(&**self as &dyn Reflect))
                }
            }
        )*
    };
}

impl_smart_pointer!(Box, Rc, Arc);

/// A boxed trait object is a union slot: its dynamic type is only known at
/// runtime.
impl Reflect for Box<dyn Reflect> {
    fn static_type() -> TypeInfo {
        TypeInfo::new::<Box<dyn Reflect>>(ShapeInfo::Union)
    }

    fn type_info(&self) -> TypeInfo {
        Self::static_type()
    }

    fn reflect(&self) -> Shape<'_> {
        Shape::Union(Some(&**self))
    }
}

impl<T: Reflect + Clone> Reflect for Vec<T> {
    fn static_type() -> TypeInfo {
        TypeInfo::new::<Vec<T>>(ShapeInfo::Sequence {
            elem: T::static_type,
        })
    }

    fn type_info(&self) -> TypeInfo {
        Self::static_type()
    }

    fn reflect(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|v| v as &dyn Reflect).collect())
    }
}

impl<T: Reflect + Clone> Reflect for VecDeque<T> {
    fn static_type() -> TypeInfo {
        TypeInfo::new::<VecDeque<T>>(ShapeInfo::Sequence {
            elem: T::static_type,
        })
    }

    fn type_info(&self) -> TypeInfo {
        Self::static_type()
    }

    fn reflect(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|v| v as &dyn Reflect).collect())
    }
}

impl<T: Reflect + Clone, const N: usize> Reflect for [T; N] {
    fn static_type() -> TypeInfo {
        TypeInfo::new::<[T; N]>(ShapeInfo::Sequence {
            elem: T::static_type,
        })
    }

    fn type_info(&self) -> TypeInfo {
        Self::static_type()
    }

    fn reflect(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|v| v as &dyn Reflect).collect())
    }
}

impl<K, V> Reflect for HashMap<K, V>
where
    K: Reflect + Clone + Eq + Hash,
    V: Reflect + Clone,
{
    fn static_type() -> TypeInfo {
        TypeInfo::new::<HashMap<K, V>>(ShapeInfo::Map {
            key: K::static_type,
            value: V::static_type,
        })
    }

    fn type_info(&self) -> TypeInfo {
        Self::static_type()
    }

    fn reflect(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| (key_text(k), v as &dyn Reflect))
                .collect(),
        )
    }
}

impl<K, V> Reflect for BTreeMap<K, V>
where
    K: Reflect + Clone + Ord,
    V: Reflect + Clone,
{
    fn static_type() -> TypeInfo {
        TypeInfo::new::<BTreeMap<K, V>>(ShapeInfo::Map {
            key: K::static_type,
            value: V::static_type,
        })
    }

    fn type_info(&self) -> TypeInfo {
        Self::static_type()
    }

    fn reflect(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| (key_text(k), v as &dyn Reflect))
                .collect(),
        )
    }
}

macro_rules! impl_shape_only {
    ($shape:ident => $($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn static_type() -> TypeInfo {
                    TypeInfo::new::<$ty>(ShapeInfo::$shape)
                }

                fn type_info(&self) -> TypeInfo {
                    Self::static_type()
                }

                fn reflect(&self) -> Shape<'_> {
                    Shape::$shape
                }
            }
        )*
    };
}

// Timestamps are compared by the default instant comparators.
impl_shape_only!(Opaque => DateTime<Utc>, DateTime<FixedOffset>);

macro_rules! impl_callable {
    ($(<$($gen:ident),*> $ty:ty),* $(,)?) => {
        $(
            impl<$($gen: 'static),*> Reflect for $ty {
                fn static_type() -> TypeInfo {
                    TypeInfo::new::<$ty>(ShapeInfo::Callable)
                }

                fn type_info(&self) -> TypeInfo {
                    Self::static_type()
                }

                fn reflect(&self) -> Shape<'_> {
                    Shape::Callable
                }
            }
        )*
    };
}

impl_callable! {
    <R> fn() -> R,
    <A, R> fn(A) -> R,
    <T> Sender<T>,
    <T> SyncSender<T>,
}
