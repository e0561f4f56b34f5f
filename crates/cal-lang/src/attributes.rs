//! The known-attribute registry: a fixed table of C/AL object/field/control
//! property names, consulted by a host validator deciding whether a
//! `name = value` entry it doesn't otherwise recognize is a legitimate
//! property or a typo. This crate does not itself validate anything — see
//! `crate::diagnostics` and the module doc's note on the `builtins`
//! component of the validator context — but the registry is one of the
//! "attribute registries" the crate's own design notes call out as an
//! immutable, process-wide constant table, alongside the reserved-word and
//! section-sync tables in [`crate::token`].
//!
//! `Internal` and `ServiceEnabled` are tooling-level attributes layered on
//! top of C/AL by newer NAV/Dynamics versions rather than attributes the
//! original C/AL grammar defines, but real objects use them, so the
//! registry reports them as known rather than flagging every object that
//! carries one.

const KNOWN_ATTRIBUTES: &[&str] = &[
    // Captions and descriptive metadata
    "Caption",
    "CaptionML",
    "Description",
    "ToolTip",
    "ToolTipML",
    "InstructionalText",
    "InstructionalTextML",
    "PromotedCategory",
    "Promoted",
    "PromotedIsBig",
    // Field-level properties
    "DataLength",
    "InitValue",
    "MinValue",
    "MaxValue",
    "DecimalPlaces",
    "BlankZero",
    "BlankNumbers",
    "AltSearchField",
    "DateFormula",
    "AutoFormatType",
    "AutoFormatExpr",
    "NotBlank",
    "TableRelation",
    "TestTableRelation",
    "ValidateTableRelation",
    "FieldClass",
    "CalcFormula",
    "Editable",
    "Enabled",
    "Visible",
    "Style",
    "StyleExpr",
    // Key properties
    "Clustered",
    "SumIndexFields",
    "MaintainSIFTIndex",
    "MaintainSQLIndex",
    "Unique",
    // Object/page-level properties
    "SourceTable",
    "SourceTableView",
    "SourceTableTemporary",
    "PageType",
    "UsageCategory",
    "ApplicationArea",
    "Permissions",
    "TableNo",
    "Subtype",
    "AccessByPermission",
    "DeleteAllowed",
    "InsertAllowed",
    "ModifyAllowed",
    "LinksAllowed",
    "SaveValues",
    "RefreshOnActivate",
    // Control/action properties
    "ShowCaption",
    "Image",
    "RunObject",
    "RunPageMode",
    "RunPageView",
    "ActionContainerType",
    "Position",
    // Tooling-level attributes, not part of the original C/AL grammar but
    // still recognized by this registry (see module doc).
    "Internal",
    "ServiceEnabled",
];

/// Case-insensitive membership test against the known-attribute registry.
pub fn is_known_attribute(name: &str) -> bool {
    KNOWN_ATTRIBUTES.iter().any(|known| known.eq_ignore_ascii_case(name))
}
