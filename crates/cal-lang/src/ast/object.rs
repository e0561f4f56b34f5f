//! Object-level structure: the header, its sections, and the `CODE` body.

use super::stmt::Statement;
use super::TokenIndex;
use crate::token::TokenKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectKind {
    Table,
    Codeunit,
    Page,
    Report,
    Query,
    XmlPort,
    MenuSuite,
    Form,
}

impl ObjectKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_uppercase().as_str() {
            "TABLE" => ObjectKind::Table,
            "CODEUNIT" => ObjectKind::Codeunit,
            "PAGE" => ObjectKind::Page,
            "REPORT" => ObjectKind::Report,
            "QUERY" => ObjectKind::Query,
            "XMLPORT" => ObjectKind::XmlPort,
            "MENUSUITE" => ObjectKind::MenuSuite,
            "FORM" => ObjectKind::Form,
            _ => return None,
        })
    }
}

/// A `name [@index] : type` entry, used for both `VAR` blocks and
/// procedure parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VarDecl {
    pub name: String,
    pub name_token: TokenIndex,
    pub index: Option<u32>,
    pub type_name: String,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    pub name: String,
    pub name_token: TokenIndex,
    pub is_var: bool,
    pub type_name: String,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

/// A trigger body: an optional local `VAR` block followed by a statement
/// list, attached to a property (`OnRun`) or a field (`OnValidate`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriggerBody {
    pub local_vars: Vec<VarDecl>,
    pub body: Vec<Statement>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

/// A `name = value` entry inside `PROPERTIES`, a field's trailing property
/// list, a control, or an action. `trigger` is set when the value is C/AL
/// code (e.g. `OnRun`, `OnValidate`) rather than an opaque literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PropertyEntry {
    pub name: String,
    pub name_token: TokenIndex,
    pub trigger: Option<TriggerBody>,
    pub raw_value: Option<String>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Properties {
    pub entries: Vec<PropertyEntry>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

/// One `{ id ; ; name ; type [; trailing properties...] }` entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Field {
    pub id: Option<u32>,
    pub name: String,
    pub name_token: TokenIndex,
    pub type_name: String,
    pub triggers: Vec<PropertyEntry>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fields {
    pub fields: Vec<Field>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

/// A key entry: the ordered field name list plus any trailing raw
/// properties (e.g. `Clustered=Yes`). Keys do not introduce new symbols.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Key {
    pub field_names: Vec<String>,
    pub raw_properties: Vec<String>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keys {
    pub keys: Vec<Key>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

/// A generic entry shared by `CONTROLS`, `ACTIONS`, and `ELEMENTS`: a
/// brace-delimited item made of semicolon-separated raw segments, any of
/// which may be a trigger assignment, plus nested child items.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectionItem {
    pub id: Option<u32>,
    pub fields: Vec<String>,
    pub triggers: Vec<PropertyEntry>,
    pub children: Vec<SectionItem>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Controls {
    pub items: Vec<SectionItem>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Actions {
    pub items: Vec<SectionItem>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Elements {
    pub items: Vec<SectionItem>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

/// A section recognized for recovery/synchronization but whose content is
/// discarded via balanced-brace scanning (`MenuNodes`, `DataItems`,
/// `Dataset`, `RequestPage`, `Labels`, `RequestForm`, and `FieldGroups`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkippedSection {
    pub kind: TokenKind,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Procedure {
    pub name: String,
    pub name_token: TokenIndex,
    pub index: Option<u32>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub local_vars: Vec<VarDecl>,
    pub body: Vec<Statement>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Code {
    pub variables: Vec<VarDecl>,
    pub procedures: Vec<Procedure>,
    /// The object-level trailing `BEGIN … END.` trigger, if present.
    pub object_trigger: Option<Vec<Statement>>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectProperties {
    pub entries: Vec<PropertyEntry>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Object {
    pub object_kind: ObjectKind,
    pub object_id: u32,
    pub object_name: String,
    pub name_token: TokenIndex,
    pub object_properties: Option<ObjectProperties>,
    pub properties: Option<Properties>,
    pub fields: Option<Fields>,
    pub keys: Option<Keys>,
    pub controls: Option<Controls>,
    pub actions: Option<Actions>,
    pub elements: Option<Elements>,
    pub code: Option<Code>,
    pub skipped_sections: Vec<SkippedSection>,
    pub start_token: TokenIndex,
    pub end_token: TokenIndex,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalDocument {
    pub object: Option<Object>,
}
