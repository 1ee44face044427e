//! The schema AST: `Type`, `Field`, `Primitive`.

/// A primitive scalar kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Int,
    Float,
    Bool,
    /// Strict ISO `YYYY-MM-DD`.
    Date,
    /// Strict ISO `YYYY-MM-DDTHH:MM:SS[.fff](Z|±HH:MM)`.
    DateTime,
}

impl Primitive {
    /// The keyword this primitive is spelled with in schema text.
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
            Primitive::Date => "date",
            Primitive::DateTime => "datetime",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Primitive::String),
            "int" => Some(Primitive::Int),
            "float" => Some(Primitive::Float),
            "bool" => Some(Primitive::Bool),
            "date" => Some(Primitive::Date),
            "datetime" => Some(Primitive::DateTime),
            _ => None,
        }
    }
}

/// A schema type node: one of primitive, enum, array, or object.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(Primitive),
    /// Non-empty ordered list of distinct, already-unescaped string values.
    Enum(Vec<String>),
    Array(Box<Type>),
    /// Ordered, named list of fields. The schema root is always this
    /// variant.
    Object(Vec<Field>),
}

impl Type {
    /// Array and Object are "composite" for the purposes of the encoder's
    /// long-vs-short optional rendering; Primitive and Enum are not.
    pub fn is_composite(&self) -> bool {
        matches!(self, Type::Array(_) | Type::Object(_))
    }

    /// Convenience accessor for the root schema's fields; panics if this
    /// isn't `Type::Object` (the schema root is always an Object by
    /// construction of the parser). Callers holding a `Type` of unknown
    /// provenance — e.g. one handed in through the public API — should use
    /// [`Type::as_object_fields`] instead.
    pub fn fields(&self) -> &[Field] {
        match self {
            Type::Object(fields) => fields,
            _ => panic!("Type::fields() called on a non-Object schema node"),
        }
    }

    /// Non-panicking counterpart to [`Type::fields`]: `None` unless this is
    /// `Type::Object`.
    pub fn as_object_fields(&self) -> Option<&[Field]> {
        match self {
            Type::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

/// A single named field slot within an [`Type::Object`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub type_: Type,
    /// Optionality attaches to the field slot, not to a value.
    pub optional: bool,
    pub description: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, type_: Type, optional: bool) -> Self {
        Self {
            name: name.into(),
            type_,
            optional,
            description: None,
        }
    }
}
