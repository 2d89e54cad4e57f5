//! Runtime view over the structure of in-memory values.

use std::any::Any;
use std::fmt;

use crate::schema::{Kind, TypeInfo};

/// Reflect exposes the structural shape of a value to the differ.
///
/// Implementations ship for primitives and the std containers; record types
/// use [`reflect_struct!`](crate::reflect_struct) and primitive newtypes use
/// [`reflect_primitive!`](crate::reflect_primitive).
pub trait Reflect: ReflectBase + Any + fmt::Debug + 'static {
    /// Descriptor of the static type.
    fn static_type() -> TypeInfo
    where
        Self: Sized;

    /// Descriptor of the concrete type behind a trait object.
    fn type_info(&self) -> TypeInfo;

    /// Borrowed view of the value's structure.
    fn reflect(&self) -> Shape<'_>;

    /// Rebuilds a value from a primitive of the same kind.
    fn from_primitive(_primitive: &Primitive<'_>) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

/// Object-safe helpers implemented for every cloneable [`Reflect`] type.
pub trait ReflectBase {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_boxed(&self) -> Box<dyn Reflect>;
}

impl<T: Reflect + Clone> ReflectBase for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Reflect> {
    fn clone(&self) -> Self {
        (**self).clone_boxed()
    }
}

impl dyn Reflect {
    /// Returns the value as `T` if that is its concrete type.
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Reflect>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Shape is the structural view of one value.
pub enum Shape<'a> {
    Primitive(Primitive<'a>),
    /// Exported field values in declared order.
    Struct(Vec<&'a dyn Reflect>),
    Indirection(Option<&'a dyn Reflect>),
    Sequence(Vec<&'a dyn Reflect>),
    /// Entries keyed by their canonical key text.
    Map(Vec<(String, &'a dyn Reflect)>),
    Union(Option<&'a dyn Reflect>),
    Opaque,
    Callable,
}

impl fmt::Debug for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Primitive(p) => f.debug_tuple("Primitive").field(p).finish(),
            Shape::Struct(fields) => f.debug_tuple("Struct").field(fields).finish(),
            Shape::Indirection(v) => f.debug_tuple("Indirection").field(v).finish(),
            Shape::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Shape::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Shape::Union(v) => f.debug_tuple("Union").field(v).finish(),
            Shape::Opaque => f.write_str("Opaque"),
            Shape::Callable => f.write_str("Callable"),
        }
    }
}

/// Primitive is a leaf value tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive<'a> {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Str(&'a str),
    Pointer(usize),
}

impl Primitive<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Primitive::Bool(_) => Kind::Bool,
            Primitive::I8(_) => Kind::I8,
            Primitive::I16(_) => Kind::I16,
            Primitive::I32(_) => Kind::I32,
            Primitive::I64(_) => Kind::I64,
            Primitive::Isize(_) => Kind::Isize,
            Primitive::U8(_) => Kind::U8,
            Primitive::U16(_) => Kind::U16,
            Primitive::U32(_) => Kind::U32,
            Primitive::U64(_) => Kind::U64,
            Primitive::Usize(_) => Kind::Usize,
            Primitive::F32(_) => Kind::F32,
            Primitive::F64(_) => Kind::F64,
            Primitive::Str(_) => Kind::String,
            Primitive::Pointer(_) => Kind::Pointer,
        }
    }

    /// Canonical text: integers in base 10, floats with six decimals,
    /// booleans as `true`/`false`, strings verbatim.
    pub fn to_text(&self) -> String {
        match *self {
            Primitive::Bool(b) => b.to_string(),
            Primitive::I8(i) => i.to_string(),
            Primitive::I16(i) => i.to_string(),
            Primitive::I32(i) => i.to_string(),
            Primitive::I64(i) => i.to_string(),
            Primitive::Isize(i) => i.to_string(),
            Primitive::U8(u) => u.to_string(),
            Primitive::U16(u) => u.to_string(),
            Primitive::U32(u) => u.to_string(),
            Primitive::U64(u) => u.to_string(),
            Primitive::Usize(u) => u.to_string(),
            Primitive::F32(v) => format!("{:.6}", v as f64),
            Primitive::F64(v) => format!("{:.6}", v),
            Primitive::Str(s) => s.to_string(),
            Primitive::Pointer(addr) => addr.to_string(),
        }
    }
}

impl fmt::Display for Primitive<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Renders a map key as the text used for its path step.
pub fn key_text(key: &dyn Reflect) -> String {
    match key.reflect() {
        Shape::Primitive(p) => p.to_text(),
        _ => format!("{:?}", key),
    }
}

/// Implements [`Reflect`] for a record type.
///
/// Listed fields are the exported fields, compared in the listed order.
/// Fields left out are never compared. `as "Name"` sets the path step and
/// `#[embed]` marks an anonymously embedded field whose `ID` is promoted.
///
/// ```
/// use reflect_diff::reflect_struct;
///
/// #[derive(Debug, Clone)]
/// struct Base {
///     id: String,
/// }
///
/// #[derive(Debug, Clone)]
/// struct User {
///     base: Base,
///     name: String,
///     cache: u64,
/// }
///
/// reflect_struct!(Base { id as "ID" });
/// reflect_struct!(User { #[embed] base as "Base", name as "Name" });
/// ```
#[macro_export]
macro_rules! reflect_struct {
    (@name $field:ident) => {
        stringify!($field)
    };
    (@name $field:ident $name:literal) => {
        $name
    };
    (@embedded) => {
        false
    };
    (@embedded embed) => {
        true
    };
    ($ty:ty { $( $(#[$attr:ident])? $field:ident $(as $name:literal)? ),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn static_type() -> $crate::schema::TypeInfo {
                static FIELDS: $crate::__private::OnceCell<::std::vec::Vec<$crate::schema::FieldInfo>> =
                    $crate::__private::OnceCell::new();
                let fields = FIELDS.get_or_init(|| {
                    ::std::vec![$(
                        $crate::schema::FieldInfo::new(
                            $crate::reflect_struct!(@name $field $($name)?),
                            $crate::reflect_struct!(@embedded $($attr)?),
                            $crate::schema::field_type(|s: &$ty| &s.$field),
                        )
                    ),*]
                });
                $crate::schema::TypeInfo::new::<$ty>($crate::schema::ShapeInfo::Struct(fields.as_slice()))
            }

            fn type_info(&self) -> $crate::schema::TypeInfo {
                <Self as $crate::Reflect>::static_type()
            }

            fn reflect(&self) -> $crate::Shape<'_> {
                $crate::Shape::Struct(::std::vec![$( &self.$field as &dyn $crate::Reflect ),*])
            }
        }
    };
}

/// Implements [`Reflect`] for a tuple newtype over a primitive, giving it the
/// primitive's kind.
///
/// ```
/// use reflect_diff::reflect_primitive;
///
/// #[derive(Debug, Clone, Copy)]
/// struct Meters(f64);
///
/// reflect_primitive!(Meters(f64));
/// ```
#[macro_export]
macro_rules! reflect_primitive {
    ($ty:ident($inner:ty)) => {
        impl $crate::Reflect for $ty {
            fn static_type() -> $crate::schema::TypeInfo {
                match $crate::schema::primitive_kind_of::<$inner>() {
                    Some(kind) => $crate::schema::TypeInfo::new::<$ty>($crate::schema::ShapeInfo::Primitive(kind)),
                    None => $crate::schema::TypeInfo::new::<$ty>($crate::schema::ShapeInfo::Opaque),
                }
            }

            fn type_info(&self) -> $crate::schema::TypeInfo {
                <Self as $crate::Reflect>::static_type()
            }

            fn reflect(&self) -> $crate::Shape<'_> {
                $crate::Reflect::reflect(&self.0)
            }

            fn from_primitive(primitive: &$crate::Primitive<'_>) -> Option<Self> {
                <$inner as $crate::Reflect>::from_primitive(primitive).map($ty)
            }
        }
    };
}
