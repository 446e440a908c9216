//! Bug types to C declarators
//!
//! A C declaration splits an array type around the declared name:
//! `int buf[4]`, never `int[4] buf`. [`CType`] keeps the two halves apart so
//! every use site (variable, field, parameter) writes `base name suffix`.

use bug_ast::{PrimitiveType, Type, TypeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CType {
    /// Tokens before the declared name: `int`, `char*`, `Point*`
    pub base: String,
    /// Declarator suffix after the name: `[4]`, `[]`, `[3][2]`, or empty
    pub suffix: String,
}

impl CType {
    pub fn plain(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            suffix: String::new(),
        }
    }

    /// `base name suffix`
    pub fn declare(&self, name: &str) -> String {
        format!("{} {}{}", self.base, name, self.suffix)
    }

    pub fn is_array(&self) -> bool {
        !self.suffix.is_empty()
    }
}

pub fn c_primitive(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::I32 => "int",
        PrimitiveType::I64 => "long long",
        PrimitiveType::Bool => "bool",
        PrimitiveType::F32 => "float",
        PrimitiveType::F64 => "double",
        PrimitiveType::Char => "char",
        PrimitiveType::String => "char*",
    }
}

/// C spelling of a type name; struct and enum names pass through
pub fn c_type_name(name: &str) -> &str {
    match PrimitiveType::from_name(name) {
        Some(primitive) => c_primitive(primitive),
        None => name,
    }
}

pub fn render_type(ty: &Type) -> CType {
    match &ty.kind {
        TypeKind::Named(name) => CType::plain(c_type_name(name)),
        TypeKind::Array { element, size } => {
            let element = render_type(element);
            let dim = match size {
                Some(n) => format!("[{}]", n),
                None => "[]".to_string(),
            };
            // The outer dimension comes first: [[i32; 2]; 3] -> int x[3][2]
            CType {
                base: element.base,
                suffix: dim + &element.suffix,
            }
        }
        // A pointer to an array points at its element type
        TypeKind::Pointer(element) => CType::plain(format!("{}*", render_type(element).base)),
    }
}

/// Return type of a function. No declared type means `void`; an array
/// return type decays to a pointer to its element.
pub fn render_return_type(ty: Option<&Type>) -> String {
    match ty {
        None => "void".to_string(),
        Some(ty) => {
            let rendered = render_type(ty);
            if rendered.is_array() {
                format!("{}*", rendered.base)
            } else {
                rendered.base
            }
        }
    }
}
