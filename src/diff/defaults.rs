//! Default comparators and identity functions.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use super::registry::{Differ, KindCompareFn, KindIdentityFn};
use crate::schema::Kind;
use crate::value::Primitive;

/// Equality used by every default kind comparator.
/// Equality for a primitive kind. NaN equals NaN so that every value
/// compares equal to itself.
fn primitive_eq() -> KindCompareFn {
    Arc::new(|l: &Primitive<'_>, r: &Primitive<'_>| match (l, r) {
        (Primitive::F32(a), Primitive::F32(b)) => a == b || (a.is_nan() && b.is_nan()),
        (Primitive::F64(a), Primitive::F64(b)) => a == b || (a.is_nan() && b.is_nan()),
        _ => l == r,
    })
}

/// Canonical identity text of a primitive. Booleans render as `t`/`f`.
pub fn primitive_identity(p: &Primitive<'_>) -> String {
    match p {
        Primitive::Bool(true) => "t".to_string(),
        Primitive::Bool(false) => "f".to_string(),
        other => other.to_text(),
    }
}

fn opt_instant_eq<Tz: chrono::TimeZone>(l: &Option<DateTime<Tz>>, r: &Option<DateTime<Tz>>) -> bool {
    match (l, r) {
        (None, None) => true,
        (Some(l), Some(r)) => l.naive_utc() == r.naive_utc(),
        _ => false,
    }
}

impl Differ {
    /// Installs the built-in comparators and identity functions.
    pub(crate) fn install_defaults(&mut self) {
        let identity: KindIdentityFn = Arc::new(primitive_identity);
        for kind in Kind::ALL {
            self.kind_comparators.insert(kind, primitive_eq());
            self.kind_identities.insert(kind, identity.clone());
        }

        // Registration only fails for callable types, which these are not.
        let _ = self.register(|l: &DateTime<Utc>, r: &DateTime<Utc>| l.naive_utc() == r.naive_utc());
        let _ = self.register(|l: &DateTime<FixedOffset>, r: &DateTime<FixedOffset>| {
            l.naive_utc() == r.naive_utc()
        });
        let _ = self.register::<Option<DateTime<Utc>>, _>(opt_instant_eq::<Utc>);
        let _ = self.register::<Option<DateTime<FixedOffset>>, _>(opt_instant_eq::<FixedOffset>);
    }
}
