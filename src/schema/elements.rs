//! Static type descriptors used by the traversal engine.

use std::any::{type_name, TypeId};
use std::fmt;

use crate::value::Reflect;

/// Kind is the closed set of primitive kinds a leaf value can have.
///
/// Kind comparators and kind identity functions are keyed by it, so a
/// newtype over `i64` shares the `I64` entries with plain `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    /// Address identity of an opaque pointer.
    Pointer,
}

impl Kind {
    /// Every primitive kind, in declaration order.
    pub const ALL: [Kind; 15] = [
        Kind::Bool,
        Kind::I8,
        Kind::I16,
        Kind::I32,
        Kind::I64,
        Kind::Isize,
        Kind::U8,
        Kind::U16,
        Kind::U32,
        Kind::U64,
        Kind::Usize,
        Kind::F32,
        Kind::F64,
        Kind::String,
        Kind::Pointer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::String => "string",
            Kind::Pointer => "pointer",
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Kind::F32 | Kind::F64)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lazily produces the descriptor of a related type (field, element, key).
///
/// Thunks keep recursive types such as `Vec<Value>` inside `Value` finite.
pub type TypeThunk = fn() -> TypeInfo;

/// Clones a pointee and wraps it into the indirection type that owns this
/// function. Returns `None` when the value is not of the pointee type.
pub type WrapFn = fn(&dyn Reflect) -> Option<Box<dyn Reflect>>;

/// ShapeInfo is the static structural shape of a type.
#[derive(Clone, Copy)]
pub enum ShapeInfo {
    Primitive(Kind),
    /// Record type; the slice lists exported fields in declared order.
    Struct(&'static [FieldInfo]),
    /// Optional or pointer-like type.
    Indirection { elem: TypeThunk, wrap: WrapFn },
    Sequence { elem: TypeThunk },
    Map { key: TypeThunk, value: TypeThunk },
    /// Dynamically typed slot that may be empty.
    Union,
    /// Atomic value without visible structure, compared only through a
    /// registered comparator.
    Opaque,
    /// Functions and channels. Never compared.
    Callable,
}

impl ShapeInfo {
    fn label(&self) -> &'static str {
        match self {
            ShapeInfo::Primitive(_) => "primitive",
            ShapeInfo::Struct(_) => "struct",
            ShapeInfo::Indirection { .. } => "indirection",
            ShapeInfo::Sequence { .. } => "sequence",
            ShapeInfo::Map { .. } => "map",
            ShapeInfo::Union => "union",
            ShapeInfo::Opaque => "opaque",
            ShapeInfo::Callable => "callable",
        }
    }
}

impl fmt::Debug for ShapeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeInfo::Primitive(kind) => write!(f, "Primitive({})", kind),
            ShapeInfo::Struct(fields) => f.debug_tuple("Struct").field(fields).finish(),
            other => f.write_str(other.label()),
        }
    }
}

/// FieldInfo describes one exported field of a record type.
#[derive(Clone, Copy)]
pub struct FieldInfo {
    /// Name used as the path step.
    pub name: &'static str,
    /// Anonymously embedded field whose own fields are promoted.
    pub embedded: bool,
    pub ty: TypeThunk,
}

impl FieldInfo {
    pub fn new(name: &'static str, embedded: bool, ty: TypeThunk) -> Self {
        FieldInfo { name, embedded, ty }
    }

    /// Returns the declared type of the field.
    pub fn type_info(&self) -> TypeInfo {
        (self.ty)()
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("embedded", &self.embedded)
            .finish()
    }
}

/// TypeInfo identifies a static type and carries its shape.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    pub id: TypeId,
    pub name: &'static str,
    pub shape: ShapeInfo,
}

impl TypeInfo {
    pub fn new<T: 'static>(shape: ShapeInfo) -> Self {
        TypeInfo {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            shape,
        }
    }

    /// Returns the primitive kind, if the type is primitive.
    pub fn kind(&self) -> Option<Kind> {
        match self.shape {
            ShapeInfo::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_indirection(&self) -> bool {
        matches!(self.shape, ShapeInfo::Indirection { .. })
    }

    /// Strips one indirection layer, returning the pointee type.
    pub fn strip_indirection(&self) -> TypeInfo {
        match self.shape {
            ShapeInfo::Indirection { elem, .. } => elem(),
            _ => *self,
        }
    }

    /// Returns true for primitives and for an indirection over a primitive.
    pub fn is_primitive_like(&self) -> bool {
        self.strip_indirection().kind().is_some()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeInfo({}: {:?})", self.name, self.shape)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Returns the type thunk of a field selected by `accessor`.
///
/// Used by `reflect_struct!` to recover field types without naming them.
pub fn field_type<S, F, A>(_accessor: A) -> TypeThunk
where
    F: Reflect,
    A: Fn(&S) -> &F,
{
    F::static_type
}

/// Returns the primitive kind of `T`, if any.
pub fn primitive_kind_of<T: Reflect>() -> Option<Kind> {
    T::static_type().kind()
}
