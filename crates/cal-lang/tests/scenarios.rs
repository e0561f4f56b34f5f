//! End-to-end scenarios exercising the full lex → parse → symbol table →
//! semantic-token pipeline against representative C/AL snippets.

use cal_lang::ast::ObjectKind;
use cal_lang::lexer::lex;
use cal_lang::parser::Parser;
use cal_lang::semantic_tokens;
use cal_lang::symbols::{SymbolKind, SymbolTable};

fn run(src: &str) -> (cal_lang::CalDocument, Vec<cal_lang::Token>, Vec<cal_lang::ParseError>) {
    let (tokens, lex_errors) = lex(src);
    assert!(lex_errors.is_empty(), "unexpected lex errors: {lex_errors:?}");
    let mut parser = Parser::new(tokens);
    let doc = parser.parse();
    let errors = parser.errors().to_vec();
    (doc, parser.tokens().to_vec(), errors)
}

#[test]
fn s1_table_with_quoted_field() {
    let src = r#"OBJECT Table 18 Customer { FIELDS { { 1 ; ; "Line No." ; Code20 } { 2 ; ; Name ; Text100 } } }"#;
    let (doc, tokens, errors) = run(src);
    assert!(errors.is_empty());

    let object = doc.object.as_ref().expect("object header parsed");
    assert_eq!(object.object_kind, ObjectKind::Table);
    assert_eq!(object.object_id, 18);
    assert_eq!(object.object_name, "Customer");

    let mut symbols = SymbolTable::new();
    symbols.build_from_ast(&doc, &tokens);
    let line_no = symbols.get_symbol("Line No.").expect("quoted field symbol");
    assert_eq!(line_no.kind, SymbolKind::Field);
    let name = symbols.get_symbol("name").expect("case-insensitive lookup");
    assert_eq!(name.kind, SymbolKind::Field);

    let semantic = semantic_tokens::build(&tokens, &doc);
    assert!(!semantic.is_empty());
}

#[test]
fn s2_menunodes_before_code() {
    let src = r#"OBJECT MenuSuite 1 Navigation {
  PROPERTIES { CaptionML=ENU=Navigation; }
  MENUNODES { { ;1 ;MenuItem ;Root } }
  CODE {
    PROCEDURE TestProc@1();
    BEGIN
    END;

    BEGIN
    END.
  }
}"#;
    let (doc, _tokens, errors) = run(src);
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");

    let object = doc.object.as_ref().unwrap();
    let code = object.code.as_ref().expect("CODE section parsed");
    assert_eq!(code.procedures.len(), 1);
    assert_eq!(code.procedures[0].name, "TestProc");
}

#[test]
fn s3_case_branch_missing_colon_recovery() {
    let src = r#"OBJECT Codeunit 50000 Demo {
  CODE {
    PROCEDURE Run@1();
    BEGIN
      CASE x OF
        1 MESSAGE('Error');
        2: MESSAGE('Two');
      END;
    END;
  }
}"#;
    let (doc, _tokens, errors) = run(src);
    assert_eq!(errors.len(), 1, "expected exactly one recovery error: {errors:?}");
    assert!(errors[0].message.contains("Expected : after case branch value"));

    let procedure = &doc.object.unwrap().code.unwrap().procedures[0];
    let case_stmt = procedure
        .body
        .iter()
        .find_map(|s| match s {
            cal_lang::ast::Statement::Case { branches, .. } => Some(branches.clone()),
            _ => None,
        })
        .expect("CASE statement present");

    assert_eq!(case_stmt[0].statements.len(), 0);
    assert!(case_stmt[0].end_token > case_stmt[0].values[0].start_token());
    assert!(case_stmt[0].end_token <= case_stmt[1].start_token);
}

#[test]
fn s4_case_branch_zero_iteration_recovery() {
    let src = "OBJECT Codeunit 50001 Demo {\n  CODE {\n    PROCEDURE Run@1();\n    BEGIN\n      CASE x OF\n        1\n        2: MESSAGE('Two');\n      END;\n    END;\n  }\n}";
    let (doc, _tokens, errors) = run(src);
    assert_eq!(errors.len(), 1);

    let procedure = &doc.object.unwrap().code.unwrap().procedures[0];
    let branches = procedure
        .body
        .iter()
        .find_map(|s| match s {
            cal_lang::ast::Statement::Case { branches, .. } => Some(branches.clone()),
            _ => None,
        })
        .unwrap();

    assert!(branches[0].end_token >= branches[0].start_token);
}

#[test]
fn s5_on_run_property_trigger_scope() {
    let src = r#"OBJECT Codeunit 50002 Demo {
  PROPERTIES {
    OnRun = VAR
              myVar@1000 : Integer;
            BEGIN
              myVar := 5;
            END;
  }
}"#;
    let (doc, tokens, errors) = run(src);
    assert!(errors.is_empty());

    let mut symbols = SymbolTable::new();
    symbols.build_from_ast(&doc, &tokens);
    assert!(!symbols.has_symbol("myVar"));

    let trigger_offset = src.find("myVar := 5").unwrap();
    let sym = symbols
        .get_symbol_at_offset("myVar", trigger_offset)
        .expect("myVar resolves inside the trigger scope");
    assert_eq!(sym.kind, SymbolKind::Variable);

    let property = &doc.object.unwrap().properties.unwrap().entries[0];
    let property_start = tokens[property.start_token as usize].start_offset as usize;
    let property_end = tokens[property.end_token as usize].end_offset as usize;
    let scope = symbols.get_scope_at_offset(trigger_offset);
    assert_eq!(scope.start_offset, property_start);
    assert_eq!(scope.end_offset, property_end);
}

#[test]
fn s6_page_controls_then_code() {
    let src = r#"OBJECT Page 6510 Test {
  CONTROLS { { 1 ; Container ; ContentArea } }
  CODE { VAR X@1003 : Record 336; }
}"#;
    let (doc, _tokens, errors) = run(src);
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");

    let object = doc.object.unwrap();
    assert_eq!(object.object_kind, ObjectKind::Page);
    assert_eq!(object.object_id, 6510);
}
