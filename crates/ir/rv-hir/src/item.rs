//! Item definitions visible to a body: structs, enums, functions and constants.

use rustc_hash::FxHashMap;
use rv_intern::Symbol;
use rv_span::FileSpan;

use crate::{ConstId, FieldIdx, FunctionId, TypeDefId, VariantId, VariantIdx};

/// Field definition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name
    pub name: Symbol,
    /// Source location
    pub span: FileSpan,
}

/// Shape of a struct or enum variant
#[derive(Debug, Clone, PartialEq)]
pub enum VariantFields {
    /// `Name`
    Unit,
    /// `Name(A, B)`, holding the number of positional fields
    Tuple(usize),
    /// `Name { a: A, b: B }`, in declaration order
    Struct(Vec<FieldDef>),
}

impl VariantFields {
    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Unit => 0,
            Self::Tuple(arity) => *arity,
            Self::Struct(fields) => fields.len(),
        }
    }

    /// Whether the variant has no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the variant is written `Name(..)`.
    #[must_use]
    pub fn is_tuple(&self) -> bool {
        matches!(self, Self::Tuple(_))
    }

    /// Whether the variant is written `Name`.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Declaration-order index of a named field.
    #[must_use]
    pub fn field_index(&self, name: Symbol) -> Option<FieldIdx> {
        let Self::Struct(fields) = self else {
            return None;
        };
        fields
            .iter()
            .position(|field| field.name == name)
            .map(|index| FieldIdx(index as u32))
    }
}

/// Struct definition
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    /// Unique ID
    pub id: TypeDefId,
    /// Struct name
    pub name: Symbol,
    /// Generic parameters
    pub generic_params: Vec<Symbol>,
    /// Fields
    pub fields: VariantFields,
    /// Source location
    pub span: FileSpan,
}

/// Enum definition
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    /// Unique ID
    pub id: TypeDefId,
    /// Enum name
    pub name: Symbol,
    /// Generic parameters
    pub generic_params: Vec<Symbol>,
    /// Variants, in declaration order
    pub variants: Vec<VariantDef>,
    /// Source location
    pub span: FileSpan,
}

/// Enum variant
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDef {
    /// Variant name
    pub name: Symbol,
    /// Variant fields
    pub fields: VariantFields,
    /// Source location
    pub span: FileSpan,
}

/// Function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Unique ID
    pub id: FunctionId,
    /// Function name
    pub name: Symbol,
    /// Generic parameters
    pub generic_params: Vec<Symbol>,
    /// Source location
    pub span: FileSpan,
}

/// Constant declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDef {
    /// Unique ID
    pub id: ConstId,
    /// Constant name
    pub name: Symbol,
    /// Source location
    pub span: FileSpan,
}

/// Borrowed view of either kind of ADT
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdtRef<'items> {
    /// Struct
    Struct(&'items StructDef),
    /// Enum
    Enum(&'items EnumDef),
}

impl<'items> AdtRef<'items> {
    /// Whether this is an enum.
    #[must_use]
    pub fn is_enum(self) -> bool {
        matches!(self, Self::Enum(_))
    }

    /// Name of the ADT.
    #[must_use]
    pub fn name(self) -> Symbol {
        match self {
            Self::Struct(def) => def.name,
            Self::Enum(def) => def.name,
        }
    }

    /// Fields of a variant. Structs only have variant 0.
    #[must_use]
    pub fn variant_fields(self, index: VariantIdx) -> Option<&'items VariantFields> {
        match self {
            Self::Struct(def) => (index == VariantIdx::FIRST).then_some(&def.fields),
            Self::Enum(def) => def.variants.get(index.0 as usize).map(|variant| &variant.fields),
        }
    }
}

/// All items a body may refer to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemTree {
    /// Struct definitions
    pub structs: FxHashMap<TypeDefId, StructDef>,
    /// Enum definitions
    pub enums: FxHashMap<TypeDefId, EnumDef>,
    /// Function declarations
    pub functions: FxHashMap<FunctionId, Function>,
    /// Constant declarations
    pub consts: FxHashMap<ConstId, ConstDef>,
}

impl ItemTree {
    /// Creates an empty item tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a struct or enum.
    #[must_use]
    pub fn adt(&self, id: TypeDefId) -> Option<AdtRef<'_>> {
        self.structs
            .get(&id)
            .map(AdtRef::Struct)
            .or_else(|| self.enums.get(&id).map(AdtRef::Enum))
    }

    /// Looks up the fields of a variant.
    #[must_use]
    pub fn variant_fields(&self, variant: VariantId) -> Option<&VariantFields> {
        self.adt(variant.adt)?.variant_fields(variant.index)
    }
}

#[cfg(test)]
mod tests {
    use rv_intern::Interner;

    use super::*;

    fn field(interner: &Interner, name: &str) -> FieldDef {
        FieldDef {
            name: interner.intern(name),
            span: FileSpan::dummy(),
        }
    }

    #[test]
    fn test_field_index_is_declaration_order() {
        let interner = Interner::new();
        let fields = VariantFields::Struct(vec![field(&interner, "a"), field(&interner, "b")]);
        assert_eq!(fields.field_index(interner.intern("b")), Some(FieldIdx(1)));
        assert_eq!(fields.field_index(interner.intern("c")), None);
        assert_eq!(VariantFields::Tuple(2).field_index(interner.intern("a")), None);
    }

    #[test]
    fn test_struct_only_has_first_variant() {
        let interner = Interner::new();
        let mut items = ItemTree::new();
        let id = TypeDefId(0);
        items.structs.insert(
            id,
            StructDef {
                id,
                name: interner.intern("Unit"),
                generic_params: Vec::new(),
                fields: VariantFields::Unit,
                span: FileSpan::dummy(),
            },
        );
        let first = VariantId { adt: id, index: VariantIdx::FIRST };
        let second = VariantId { adt: id, index: VariantIdx(1) };
        assert_eq!(items.variant_fields(first), Some(&VariantFields::Unit));
        assert_eq!(items.variant_fields(second), None);
    }
}
