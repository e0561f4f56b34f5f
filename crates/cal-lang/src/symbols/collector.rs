//! AST walk that populates a [`super::SymbolTable`] freshly reset by
//! `build_from_ast`. Scopes are created for the object root, each
//! procedure, and each trigger (object-level, property-level, and
//! field-level); `CONTROLS`/`ACTIONS`/`ELEMENTS` triggers register no scope
//! of their own, since nothing in this language lets code reference a
//! control-local variable from outside its (nonexistent) body.

use crate::ast::{Code, Object, Procedure, PropertyEntry, TriggerBody, VarDecl};
use crate::token::Token;

use super::{Scope, Symbol, SymbolKind, SymbolTable};

pub(super) fn collect_object(table: &mut SymbolTable, object: &Object, tokens: &[Token]) {
    table.define_global(Symbol::new(
        object.object_name.clone(),
        SymbolKind::Object,
        &tokens[object.name_token as usize],
    ));

    if let Some(props) = &object.object_properties {
        for entry in &props.entries {
            collect_trigger_property(table, 0, entry, tokens);
        }
    }

    if let Some(fields) = &object.fields {
        for field in &fields.fields {
            let mut symbol = Symbol::new(
                field.name.clone(),
                SymbolKind::Field,
                &tokens[field.name_token as usize],
            )
            .with_type(field.type_name.clone());
            symbol.span = cal_base::Span::new(
                tokens[field.start_token as usize].start_offset as usize,
                tokens[field.end_token as usize].end_offset as usize,
            );
            table.define_global(symbol);

            for trigger in &field.triggers {
                collect_trigger_property(table, 0, trigger, tokens);
            }
        }
    }

    if let Some(code) = &object.code {
        collect_code(table, code, tokens);
    }
}

fn collect_code(table: &mut SymbolTable, code: &Code, tokens: &[Token]) {
    for var in &code.variables {
        table.define_global(var_symbol(var, tokens));
    }

    for procedure in &code.procedures {
        collect_procedure(table, procedure, tokens);
    }
}

fn collect_procedure(table: &mut SymbolTable, procedure: &Procedure, tokens: &[Token]) {
    table.define_global(Symbol::new(
        procedure.name.clone(),
        SymbolKind::Procedure,
        &tokens[procedure.name_token as usize],
    ));

    let start = tokens[procedure.start_token as usize].start_offset as usize;
    let end = tokens[procedure.end_token as usize].end_offset as usize;
    let scope_idx = push_child_scope(table, 0, start, end);

    for param in &procedure.parameters {
        let symbol = Symbol::new(
            param.name.clone(),
            SymbolKind::Parameter,
            &tokens[param.name_token as usize],
        )
        .with_type(param.type_name.clone());
        insert_into(table, scope_idx, symbol);
    }

    for var in &procedure.local_vars {
        insert_into(table, scope_idx, var_symbol(var, tokens));
    }
}

/// A trigger attached to a property (object-level `OnRun`, field-level
/// `OnValidate`, …). `parent` is the scope index the new trigger scope
/// nests under — always the root scope (`0`) for this language, since
/// triggers never nest inside procedures or each other.
fn collect_trigger_property(
    table: &mut SymbolTable,
    parent: usize,
    entry: &PropertyEntry,
    tokens: &[Token],
) {
    let trigger = match &entry.trigger {
        Some(trigger) => trigger,
        None => return,
    };

    table.define_global(Symbol::new(
        entry.name.clone(),
        SymbolKind::Trigger,
        &tokens[entry.name_token as usize],
    ));

    let start = tokens[entry.start_token as usize].start_offset as usize;
    let end = tokens[entry.end_token as usize].end_offset as usize;
    let scope_idx = push_child_scope(table, parent, start, end);

    collect_trigger_locals(table, scope_idx, trigger, tokens);
}

fn collect_trigger_locals(
    table: &mut SymbolTable,
    scope_idx: usize,
    trigger: &TriggerBody,
    tokens: &[Token],
) {
    for var in &trigger.local_vars {
        insert_into(table, scope_idx, var_symbol(var, tokens));
    }
}

fn var_symbol(var: &VarDecl, tokens: &[Token]) -> Symbol {
    Symbol::new(
        var.name.clone(),
        SymbolKind::Variable,
        &tokens[var.name_token as usize],
    )
    .with_type(var.type_name.clone())
}

fn push_child_scope(table: &mut SymbolTable, parent: usize, start: usize, end: usize) -> usize {
    let idx = table.scopes.len();
    table.scopes.push(Scope::new(start, end, Some(parent)));
    table.scopes[parent].children.push(idx);
    idx
}

fn insert_into(table: &mut SymbolTable, scope_idx: usize, symbol: Symbol) {
    table.scopes[scope_idx].insert(symbol);
}
