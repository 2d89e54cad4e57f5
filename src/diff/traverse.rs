//! Lock-step traversal of two values.

use std::collections::{BTreeMap, HashMap};

use super::align::{align, tag_sorted};
use super::event::{DiffEvent, EventValue, Reason};
use super::registry::{CompareFn, Differ};
use crate::fieldpath::{Path, PathElement};
use crate::schema::{FieldInfo, ShapeInfo, TypeInfo, WrapFn};
use crate::value::{Primitive, Reflect, Shape};

/// Walker holds the state of one comparison.
///
/// Every `compare_*` method returns `false` as soon as the callback asks to
/// stop, and callers return immediately on `false`.
pub(crate) struct Walker<'d, 'a, 'c> {
    differ: &'d Differ,
    callback: &'c mut dyn FnMut(DiffEvent<'a>) -> bool,
    difference_exist: bool,
    /// Type declared at each wildcard path, used to re-wrap leaf values
    /// reached through an optional slot.
    path_types: HashMap<String, TypeInfo>,
}

fn needs_rebox(value: &dyn Reflect) -> bool {
    !matches!(value.reflect(), Shape::Indirection(_) | Shape::Union(_))
}

fn rebox<'a>(value: EventValue<'a>, wrap: WrapFn) -> EventValue<'a> {
    let wrapped = match value.get() {
        Some(v) if needs_rebox(v) => wrap(v),
        _ => None,
    };
    match wrapped {
        Some(boxed) => EventValue::Owned(boxed),
        None => value,
    }
}

impl<'d, 'a, 'c> Walker<'d, 'a, 'c> {
    pub(crate) fn new(differ: &'d Differ, callback: &'c mut dyn FnMut(DiffEvent<'a>) -> bool) -> Self {
        Walker {
            differ,
            callback,
            difference_exist: false,
            path_types: HashMap::new(),
        }
    }

    /// Returns true if a visible event was emitted.
    pub(crate) fn difference_exist(&self) -> bool {
        self.difference_exist
    }

    fn record_type(&mut self, path: &Path, info: TypeInfo) {
        self.path_types.entry(path.wildcard()).or_insert(info);
    }

    fn force_type(&mut self, path: &Path, info: TypeInfo) {
        self.path_types.insert(path.wildcard(), info);
    }

    fn emit(&mut self, path: &Path, reason: Reason, left: EventValue<'a>, right: EventValue<'a>) -> bool {
        if self.differ.omit.is_omitted(path) {
            tracing::trace!(path = %path, %reason, "event omitted");
            return true;
        }
        self.difference_exist = true;
        let (left, right) = match self.path_types.get(&path.wildcard()).map(|t| t.shape) {
            Some(ShapeInfo::Indirection { wrap, .. }) => (rebox(left, wrap), rebox(right, wrap)),
            _ => (left, right),
        };
        (self.callback)(DiffEvent::new(path.clone(), reason, left, right))
    }

    /// Compares two values of the same static type at `path`.
    pub(crate) fn compare(&mut self, path: &Path, l: &'a dyn Reflect, r: &'a dyn Reflect) -> bool {
        let info = l.type_info();
        self.record_type(path, info);

        let differ = self.differ;
        if let Some(f) = differ.comparator_for(path, info.id) {
            return self.compare_with(path, l, r, f);
        }

        match (l.reflect(), r.reflect()) {
            (Shape::Primitive(lp), Shape::Primitive(rp)) => self.compare_primitive(path, l, r, lp, rp),
            (Shape::Struct(lf), Shape::Struct(rf)) => self.compare_struct(path, &info, lf, rf),
            (Shape::Indirection(li), Shape::Indirection(ri)) => self.compare_indirection(path, l, r, li, ri),
            (Shape::Map(lm), Shape::Map(rm)) => self.compare_map(path, l, r, lm, rm),
            (Shape::Sequence(ls), Shape::Sequence(rs)) => self.compare_sequence(path, &info, ls, rs),
            (Shape::Union(lu), Shape::Union(ru)) => self.compare_union(path, l, r, lu, ru),
            (Shape::Opaque, Shape::Opaque) | (Shape::Callable, Shape::Callable) => true,
            _ => self.emit(path, Reason::TypeMismatch, EventValue::Borrowed(l), EventValue::Borrowed(r)),
        }
    }

    fn compare_with(&mut self, path: &Path, l: &'a dyn Reflect, r: &'a dyn Reflect, f: &CompareFn) -> bool {
        let l_empty = matches!(l.reflect(), Shape::Union(None));
        let r_empty = matches!(r.reflect(), Shape::Union(None));
        let reason = match (l_empty, r_empty) {
            (true, true) => return true,
            (true, false) => Reason::LeftMissing,
            (false, true) => Reason::RightMissing,
            (false, false) if f(l, r) => return true,
            (false, false) => Reason::ValueMismatch,
        };
        self.emit(path, reason, EventValue::Borrowed(l), EventValue::Borrowed(r))
    }

    fn compare_primitive(
        &mut self,
        path: &Path,
        l: &'a dyn Reflect,
        r: &'a dyn Reflect,
        lp: Primitive<'_>,
        rp: Primitive<'_>,
    ) -> bool {
        if lp.kind() != rp.kind() {
            return self.emit(path, Reason::TypeMismatch, EventValue::Borrowed(l), EventValue::Borrowed(r));
        }
        let equal = match self.differ.kind_comparators.get(&lp.kind()) {
            Some(f) => f(&lp, &rp),
            None => lp == rp,
        };
        if equal {
            return true;
        }
        self.emit(path, Reason::ValueMismatch, EventValue::Borrowed(l), EventValue::Borrowed(r))
    }

    fn compare_struct(
        &mut self,
        path: &Path,
        info: &TypeInfo,
        lf: Vec<&'a dyn Reflect>,
        rf: Vec<&'a dyn Reflect>,
    ) -> bool {
        let fields: &[FieldInfo] = match info.shape {
            ShapeInfo::Struct(fields) => fields,
            _ => &[],
        };
        for ((field, lv), rv) in fields.iter().zip(lf).zip(rf) {
            let child = path.with(PathElement::field_name(field.name));
            if !self.compare(&child, lv, rv) {
                return false;
            }
        }
        true
    }

    fn compare_indirection(
        &mut self,
        path: &Path,
        l: &'a dyn Reflect,
        r: &'a dyn Reflect,
        li: Option<&'a dyn Reflect>,
        ri: Option<&'a dyn Reflect>,
    ) -> bool {
        match (li, ri) {
            (Some(lv), Some(rv)) => self.compare(path, lv, rv),
            (None, Some(_)) => self.emit(path, Reason::LeftMissing, EventValue::Borrowed(l), EventValue::Borrowed(r)),
            (Some(_), None) => self.emit(path, Reason::RightMissing, EventValue::Borrowed(l), EventValue::Borrowed(r)),
            (None, None) => true,
        }
    }

    fn compare_map(
        &mut self,
        path: &Path,
        l: &'a dyn Reflect,
        r: &'a dyn Reflect,
        lm: Vec<(String, &'a dyn Reflect)>,
        rm: Vec<(String, &'a dyn Reflect)>,
    ) -> bool {
        if lm.len() != rm.len()
            && !self.emit(path, Reason::MapLengthMismatch, EventValue::Borrowed(l), EventValue::Borrowed(r))
        {
            return false;
        }
        let mut right: BTreeMap<String, &'a dyn Reflect> = rm.into_iter().collect();
        for (key, lv) in lm {
            let child = path.with(PathElement::key(key.as_str()));
            let keep_going = match right.remove(&key) {
                Some(rv) => self.compare(&child, lv, rv),
                None => self.emit(&child, Reason::RightMissing, EventValue::Borrowed(lv), EventValue::Absent),
            };
            if !keep_going {
                return false;
            }
        }
        for (key, rv) in right {
            let child = path.with(PathElement::key(key));
            if !self.emit(&child, Reason::LeftMissing, EventValue::Absent, EventValue::Borrowed(rv)) {
                return false;
            }
        }
        true
    }

    fn compare_sequence(
        &mut self,
        path: &Path,
        info: &TypeInfo,
        ls: Vec<&'a dyn Reflect>,
        rs: Vec<&'a dyn Reflect>,
    ) -> bool {
        if let ShapeInfo::Sequence { elem } = info.shape {
            self.record_type(&path.with(PathElement::index(0)), elem());
        }

        let differ = self.differ;
        let alignment = align(
            tag_sorted(ls.iter().map(|v| differ.identity_of(*v))),
            tag_sorted(rs.iter().map(|v| differ.identity_of(*v))),
        );

        for removed in &alignment.removed {
            let child = path.with(PathElement::index(removed.index));
            if !self.emit(
                &child,
                Reason::LeftElementRemoved,
                EventValue::Borrowed(ls[removed.index]),
                EventValue::Absent,
            ) {
                return false;
            }
        }
        for added in &alignment.added {
            let child = path.with(PathElement::index(added.index));
            if !self.emit(
                &child,
                Reason::RightElementAdded,
                EventValue::Absent,
                EventValue::Borrowed(rs[added.index]),
            ) {
                return false;
            }
        }
        for &(li, ri) in &alignment.matched {
            let child = path.with(PathElement::index(li));
            if !self.compare(&child, ls[li], rs[ri]) {
                return false;
            }
        }
        true
    }

    fn compare_union(
        &mut self,
        path: &Path,
        l: &'a dyn Reflect,
        r: &'a dyn Reflect,
        lu: Option<&'a dyn Reflect>,
        ru: Option<&'a dyn Reflect>,
    ) -> bool {
        let (lv, rv) = match (lu, ru) {
            (None, None) => return true,
            (None, Some(rv)) => {
                self.force_type(path, rv.type_info());
                return self.emit(path, Reason::LeftMissing, EventValue::Borrowed(l), EventValue::Borrowed(r));
            }
            (Some(lv), None) => {
                self.force_type(path, lv.type_info());
                return self.emit(path, Reason::RightMissing, EventValue::Borrowed(l), EventValue::Borrowed(r));
            }
            (Some(lv), Some(rv)) => (lv, rv),
        };

        let dynamic = lv.type_info();
        if dynamic != rv.type_info() {
            return self.emit(path, Reason::TypeMismatch, EventValue::Borrowed(l), EventValue::Borrowed(r));
        }
        self.force_type(path, dynamic);
        match (lv.reflect(), rv.reflect()) {
            (Shape::Indirection(Some(li)), Shape::Indirection(Some(ri))) => self.compare(path, li, ri),
            _ => self.compare(path, lv, rv),
        }
    }
}
