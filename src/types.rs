//! Static type information as reported by a type-checking service.
//!
//! Types are classified by a flag set. The bit values follow the layout
//! TypeScript hosts use, so a host can hand its raw flags over unchanged.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeFlags(u32);

impl TypeFlags {
    pub const NONE: TypeFlags = TypeFlags(0);
    pub const ANY: TypeFlags = TypeFlags(1 << 0);
    pub const UNKNOWN: TypeFlags = TypeFlags(1 << 1);
    pub const STRING: TypeFlags = TypeFlags(1 << 2);
    pub const NUMBER: TypeFlags = TypeFlags(1 << 3);
    pub const BOOLEAN: TypeFlags = TypeFlags(1 << 4);
    pub const STRING_LITERAL: TypeFlags = TypeFlags(1 << 7);
    pub const NUMBER_LITERAL: TypeFlags = TypeFlags(1 << 8);
    pub const BOOLEAN_LITERAL: TypeFlags = TypeFlags(1 << 9);
    pub const VOID: TypeFlags = TypeFlags(1 << 14);
    pub const UNDEFINED: TypeFlags = TypeFlags(1 << 15);
    pub const NULL: TypeFlags = TypeFlags(1 << 16);
    pub const NEVER: TypeFlags = TypeFlags(1 << 17);
    pub const OBJECT: TypeFlags = TypeFlags(1 << 19);
    pub const UNION: TypeFlags = TypeFlags(1 << 20);

    pub const BOOLEAN_LIKE: TypeFlags = TypeFlags(Self::BOOLEAN.0 | Self::BOOLEAN_LITERAL.0);
    pub const NUMBER_LIKE: TypeFlags = TypeFlags(Self::NUMBER.0 | Self::NUMBER_LITERAL.0);
    pub const STRING_LIKE: TypeFlags = TypeFlags(Self::STRING.0 | Self::STRING_LITERAL.0);
    pub const NULLABLE: TypeFlags = TypeFlags(Self::NULL.0 | Self::UNDEFINED.0);

    pub const fn from_bits(bits: u32) -> Self {
        TypeFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// All bits of `other` are set
    pub const fn contains(self, other: TypeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// At least one bit of `other` is set
    pub const fn intersects(self, other: TypeFlags) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for TypeFlags {
    type Output = TypeFlags;

    fn bitor(self, rhs: TypeFlags) -> TypeFlags {
        TypeFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for TypeFlags {
    fn bitor_assign(&mut self, rhs: TypeFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for TypeFlags {
    type Output = TypeFlags;

    fn bitand(self, rhs: TypeFlags) -> TypeFlags {
        TypeFlags(self.0 & rhs.0)
    }
}

/// A resolved static type: its classification flags and how it is printed.
///
/// Unions keep their members and arrays their element type; `display` is
/// derived from them and only ever printed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    pub flags: TypeFlags,
    pub display: String,
    members: Vec<TypeInfo>,
    element: Option<Box<TypeInfo>>,
}

impl TypeInfo {
    pub fn new(flags: TypeFlags, display: impl Into<String>) -> Self {
        Self {
            flags,
            display: display.into(),
            members: Vec::new(),
            element: None,
        }
    }

    pub fn any() -> Self {
        Self::new(TypeFlags::ANY, "any")
    }

    pub fn unknown() -> Self {
        Self::new(TypeFlags::UNKNOWN, "unknown")
    }

    pub fn boolean() -> Self {
        Self::new(TypeFlags::BOOLEAN, "boolean")
    }

    pub fn number() -> Self {
        Self::new(TypeFlags::NUMBER, "number")
    }

    pub fn string() -> Self {
        Self::new(TypeFlags::STRING, "string")
    }

    pub fn void() -> Self {
        Self::new(TypeFlags::VOID, "void")
    }

    pub fn never() -> Self {
        Self::new(TypeFlags::NEVER, "never")
    }

    pub fn null() -> Self {
        Self::new(TypeFlags::NULL, "null")
    }

    pub fn undefined() -> Self {
        Self::new(TypeFlags::UNDEFINED, "undefined")
    }

    pub fn object(display: impl Into<String>) -> Self {
        Self::new(TypeFlags::OBJECT, display)
    }

    pub fn boolean_literal(value: bool) -> Self {
        Self::new(TypeFlags::BOOLEAN_LITERAL, value.to_string())
    }

    pub fn number_literal(value: f64) -> Self {
        Self::new(TypeFlags::NUMBER_LITERAL, value.to_string())
    }

    pub fn string_literal(value: &str) -> Self {
        Self::new(TypeFlags::STRING_LITERAL, format!("\"{value}\""))
    }

    pub fn array_of(element: &TypeInfo) -> Self {
        let display = if element.flags.contains(TypeFlags::UNION) {
            format!("({})[]", element.display)
        } else {
            format!("{}[]", element.display)
        };
        Self {
            element: Some(Box::new(element.clone())),
            ..Self::object(display)
        }
    }

    pub fn is_any(&self) -> bool {
        self.flags.intersects(TypeFlags::ANY)
    }

    /// Members of a union, or the type itself
    pub fn members(&self) -> Vec<TypeInfo> {
        if self.flags.contains(TypeFlags::UNION) {
            self.members.clone()
        } else {
            vec![self.clone()]
        }
    }

    /// Element type of an array type such as `number[]` or `(a | b)[]`
    pub fn array_element(&self) -> Option<TypeInfo> {
        self.element.as_deref().cloned()
    }

    /// Literal types widen to their base primitive, as `let` bindings do
    pub fn widened(&self) -> TypeInfo {
        if self.flags.contains(TypeFlags::UNION) {
            TypeInfo::union(self.members().iter().map(TypeInfo::widened))
        } else if self.flags.contains(TypeFlags::BOOLEAN_LITERAL) {
            TypeInfo::boolean()
        } else if self.flags.contains(TypeFlags::NUMBER_LITERAL) {
            TypeInfo::number()
        } else if self.flags.contains(TypeFlags::STRING_LITERAL) {
            TypeInfo::string()
        } else {
            self.clone()
        }
    }

    /// The union of `types`.
    ///
    /// Members are flattened and deduplicated; `any` absorbs everything and
    /// `true | false` collapses to `boolean`. A single member is returned
    /// as is, an empty union is `never`.
    pub fn union(types: impl IntoIterator<Item = TypeInfo>) -> TypeInfo {
        let mut members: Vec<TypeInfo> = Vec::new();

        for ty in types {
            if ty.is_any() {
                return TypeInfo::any();
            }
            for part in ty.members() {
                if part.flags.contains(TypeFlags::NEVER) {
                    continue;
                }
                if !members.contains(&part) {
                    members.push(part);
                }
            }
        }

        let has_true = members.contains(&TypeInfo::boolean_literal(true));
        let has_false = members.contains(&TypeInfo::boolean_literal(false));
        let has_boolean = members.contains(&TypeInfo::boolean());
        if has_boolean || (has_true && has_false) {
            members.retain(|m| !m.flags.contains(TypeFlags::BOOLEAN_LITERAL));
            if !has_boolean {
                members.push(TypeInfo::boolean());
            }
        }

        match members.len() {
            0 => TypeInfo::never(),
            1 => members.remove(0),
            _ => {
                let display = members
                    .iter()
                    .map(|m| m.display.as_str())
                    .collect::<Vec<_>>()
                    .join(" | ");
                TypeInfo {
                    members,
                    ..TypeInfo::new(TypeFlags::UNION, display)
                }
            }
        }
    }

    /// Removes `null` and `undefined` members
    pub fn non_nullable(&self) -> TypeInfo {
        if self.flags.intersects(TypeFlags::NULLABLE) {
            return TypeInfo::never();
        }
        if !self.flags.contains(TypeFlags::UNION) {
            return self.clone();
        }
        TypeInfo::union(
            self.members()
                .into_iter()
                .filter(|m| !m.flags.intersects(TypeFlags::NULLABLE)),
        )
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_like_covers_boolean_and_literals() {
        let boolean_like = |ty: TypeInfo| ty.flags.intersects(TypeFlags::BOOLEAN_LIKE);
        assert!(boolean_like(TypeInfo::boolean()));
        assert!(boolean_like(TypeInfo::boolean_literal(true)));
        assert!(boolean_like(TypeInfo::boolean_literal(false)));
        assert!(!boolean_like(TypeInfo::number()));
        assert!(!boolean_like(TypeInfo::any()));
        assert!(!boolean_like(TypeInfo::union([TypeInfo::boolean(), TypeInfo::undefined()])));
    }

    #[test]
    fn flag_operations() {
        let flags = TypeFlags::BOOLEAN | TypeFlags::NULL;
        assert!(flags.contains(TypeFlags::BOOLEAN));
        assert!(!flags.contains(TypeFlags::BOOLEAN_LIKE));
        assert!(flags.intersects(TypeFlags::BOOLEAN_LIKE));
        assert_eq!((flags & TypeFlags::NULL).bits(), 1 << 16);
        assert_eq!(TypeFlags::from_bits(16), TypeFlags::BOOLEAN);
    }

    #[test]
    fn widening_literals() {
        assert_eq!(TypeInfo::number_literal(1.0).display, "1");
        assert_eq!(TypeInfo::number_literal(1.0).widened(), TypeInfo::number());
        assert_eq!(TypeInfo::boolean_literal(true).widened(), TypeInfo::boolean());
        assert_eq!(TypeInfo::string_literal("a").widened(), TypeInfo::string());
        assert_eq!(TypeInfo::null().widened(), TypeInfo::null());

        let literals = TypeInfo::union([TypeInfo::number_literal(1.0), TypeInfo::number_literal(2.0)]);
        assert_eq!(literals.display, "1 | 2");
        assert_eq!(literals.widened(), TypeInfo::number());
    }

    #[test]
    fn union_normalization() {
        let both = TypeInfo::union([TypeInfo::boolean_literal(true), TypeInfo::boolean_literal(false)]);
        assert_eq!(both, TypeInfo::boolean());

        let single = TypeInfo::union([TypeInfo::number(), TypeInfo::number()]);
        assert_eq!(single, TypeInfo::number());

        let mixed = TypeInfo::union([TypeInfo::number(), TypeInfo::string()]);
        assert_eq!(mixed.flags, TypeFlags::UNION);
        assert_eq!(mixed.display, "number | string");

        let nested = TypeInfo::union([mixed, TypeInfo::null(), TypeInfo::number()]);
        assert_eq!(nested.display, "number | string | null");

        assert!(TypeInfo::union([TypeInfo::number(), TypeInfo::any()]).is_any());
        assert_eq!(TypeInfo::union(Vec::new()), TypeInfo::never());
    }

    #[test]
    fn non_nullable_strips_null_and_undefined() {
        let ty = TypeInfo::union([TypeInfo::boolean(), TypeInfo::undefined()]);
        assert_eq!(ty.non_nullable(), TypeInfo::boolean());
        assert_eq!(TypeInfo::null().non_nullable(), TypeInfo::never());
    }

    #[test]
    fn array_display() {
        assert_eq!(TypeInfo::array_of(&TypeInfo::number()).display, "number[]");
        let union = TypeInfo::union([TypeInfo::number(), TypeInfo::string()]);
        let array = TypeInfo::array_of(&union);
        assert_eq!(array.display, "(number | string)[]");

        let with_null = TypeInfo::union([array, TypeInfo::null()]);
        assert_eq!(with_null.display, "(number | string)[] | null");
        assert_eq!(with_null.non_nullable().display, "(number | string)[]");
    }

    #[test]
    fn array_element_recovers_members() {
        let union = TypeInfo::union([TypeInfo::number(), TypeInfo::string()]);
        assert_eq!(TypeInfo::array_of(&union).array_element(), Some(union));

        let nested = TypeInfo::array_of(&TypeInfo::array_of(&TypeInfo::boolean()));
        assert_eq!(nested.array_element().map(|t| t.display), Some("boolean[]".to_string()));
        assert_eq!(TypeInfo::string().array_element(), None);
    }

    #[test]
    fn members_survive_punctuation_in_literals() {
        let paren = TypeInfo::union([TypeInfo::string_literal("("), TypeInfo::number_literal(1.0)]);
        assert_eq!(paren.display, "\"(\" | 1");
        assert_eq!(paren.members().len(), 2);
        assert_eq!(paren.widened().display, "string | number");

        let pipe = TypeInfo::union([TypeInfo::string_literal("a|b"), TypeInfo::null()]);
        assert_eq!(pipe.non_nullable(), TypeInfo::string_literal("a|b"));

        let array = TypeInfo::array_of(&paren);
        assert_eq!(array.display, "(\"(\" | 1)[]");
        assert_eq!(array.array_element(), Some(paren));
    }
}
