//! Tree-sitter backed fact extraction for JavaScript/TypeScript.
//!
//! Walks only the top-level statements of a file: ES module imports and
//! exports are syntactically top-level, so no recursive traversal is
//! needed. Everything observed is flattened into the closed fact model;
//! no syntax node kind escapes this module.

use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::{Language, Node, Parser};

use crate::core::{BindingKind, DriftmapError, ExportFact, FactKind, ImportFact, ModuleFacts};
use crate::extraction::FactExtractor;

/// Grammar variant selected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    JavaScript,
    TypeScript,
    Tsx,
}

impl Variant {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") => Variant::TypeScript,
            Some("tsx") => Variant::Tsx,
            _ => Variant::JavaScript,
        }
    }

    fn language(self) -> Language {
        match self {
            Variant::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Variant::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Variant::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TreeSitterExtractor;

impl TreeSitterExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FactExtractor for TreeSitterExtractor {
    fn extract(&self, path: &Path, content: &str) -> Result<ModuleFacts> {
        let mut parser = Parser::new();
        parser
            .set_language(&Variant::from_path(path).language())
            .context("Failed to set tree-sitter language")?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| DriftmapError::parse(path, "parser returned no tree"))?;

        if tree.root_node().has_error() {
            return Err(DriftmapError::parse(path, "syntax errors").into());
        }

        let module = path.to_string_lossy().into_owned();
        let mut facts = ModuleFacts::default();
        let root = tree.root_node();
        let mut cursor = root.walk();
        for statement in root.named_children(&mut cursor) {
            match statement.kind() {
                "import_statement" => collect_import(statement, content, &module, &mut facts),
                "export_statement" => collect_export(statement, content, &module, &mut facts),
                _ => {}
            }
        }
        Ok(facts)
    }
}

fn collect_import(node: Node, source: &str, module: &str, facts: &mut ModuleFacts) {
    let Some(specifier) = source_specifier(node, source) else {
        return;
    };
    let line = node.start_position().row + 1;
    let statement_type_only = has_keyword(node, "type");

    let mut clause = None;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "import_clause" {
            clause = Some(child);
            break;
        }
    }

    let Some(clause) = clause else {
        facts.imports.push(ImportFact {
            module: module.to_string(),
            source: specifier,
            name: String::new(),
            binding: BindingKind::SideEffect,
            type_only: false,
            re_export: false,
            line,
        });
        return;
    };

    let mut cursor = clause.walk();
    for part in clause.named_children(&mut cursor) {
        match part.kind() {
            "identifier" => facts.imports.push(ImportFact {
                module: module.to_string(),
                source: specifier.clone(),
                name: text(part, source),
                binding: BindingKind::Default,
                type_only: statement_type_only,
                re_export: false,
                line,
            }),
            "namespace_import" => {
                let name = named_child_of_kind(part, "identifier")
                    .map(|n| text(n, source))
                    .unwrap_or_default();
                facts.imports.push(ImportFact {
                    module: module.to_string(),
                    source: specifier.clone(),
                    name,
                    binding: BindingKind::Namespace,
                    type_only: statement_type_only,
                    re_export: false,
                    line,
                });
            }
            "named_imports" => {
                let mut inner = part.walk();
                for spec in part.named_children(&mut inner) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let name = spec
                        .child_by_field_name("name")
                        .map(|n| text(n, source))
                        .unwrap_or_default();
                    facts.imports.push(ImportFact {
                        module: module.to_string(),
                        source: specifier.clone(),
                        name,
                        binding: BindingKind::Named,
                        type_only: statement_type_only || has_keyword(spec, "type"),
                        re_export: false,
                        line: spec.start_position().row + 1,
                    });
                }
            }
            _ => {}
        }
    }
}

fn collect_export(node: Node, source: &str, module: &str, facts: &mut ModuleFacts) {
    let line = node.start_position().row + 1;
    let type_only = has_keyword(node, "type");

    // Re-export: `export ... from './x'` imports then re-exposes
    if let Some(specifier) = source_specifier(node, source) {
        if has_keyword(node, "*") {
            facts.imports.push(ImportFact {
                module: module.to_string(),
                source: specifier,
                name: String::new(),
                binding: BindingKind::Namespace,
                type_only,
                re_export: true,
                line,
            });
            return;
        }
        // `export * as ns from './x'` re-imports everything, exposes `ns`
        if let Some(ns) = named_child_of_kind(node, "namespace_export") {
            let mut cursor = ns.walk();
            let exposed = ns
                .named_children(&mut cursor)
                .last()
                .map(|n| text(n, source))
                .unwrap_or_default();
            facts.imports.push(ImportFact {
                module: module.to_string(),
                source: specifier,
                name: exposed.clone(),
                binding: BindingKind::Namespace,
                type_only,
                re_export: true,
                line,
            });
            facts.exports.push(ExportFact {
                module: module.to_string(),
                name: exposed,
                kind: FactKind::Value,
                is_default: false,
                line,
            });
            return;
        }
        if let Some(clause) = named_child_of_kind(node, "export_clause") {
            let mut cursor = clause.walk();
            for spec in clause.named_children(&mut cursor) {
                if spec.kind() != "export_specifier" {
                    continue;
                }
                let name = spec
                    .child_by_field_name("name")
                    .map(|n| text(n, source))
                    .unwrap_or_default();
                let exposed = spec
                    .child_by_field_name("alias")
                    .map(|n| text(n, source))
                    .unwrap_or_else(|| name.clone());
                facts.imports.push(ImportFact {
                    module: module.to_string(),
                    source: specifier.clone(),
                    name,
                    binding: BindingKind::Named,
                    type_only,
                    re_export: true,
                    line: spec.start_position().row + 1,
                });
                facts.exports.push(ExportFact {
                    module: module.to_string(),
                    name: exposed,
                    kind: if type_only { FactKind::TypeAlias } else { FactKind::Value },
                    is_default: false,
                    line: spec.start_position().row + 1,
                });
            }
        }
        return;
    }

    if has_keyword(node, "default") {
        let kind = node
            .child_by_field_name("value")
            .or_else(|| node.child_by_field_name("declaration"))
            .map(|v| match v.kind() {
                "function_declaration" | "generator_function_declaration" | "function_expression"
                | "arrow_function" => FactKind::Function,
                "class_declaration" | "class" => FactKind::Class,
                _ => FactKind::Value,
            })
            .unwrap_or(FactKind::Value);
        facts.exports.push(ExportFact {
            module: module.to_string(),
            name: "default".to_string(),
            kind,
            is_default: true,
            line,
        });
        return;
    }

    if let Some(declaration) = node.child_by_field_name("declaration") {
        collect_declaration_exports(declaration, source, module, facts);
        return;
    }

    // Local export clause: `export { a, b as c }`
    if let Some(clause) = named_child_of_kind(node, "export_clause") {
        let mut cursor = clause.walk();
        for spec in clause.named_children(&mut cursor) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            let exposed = spec
                .child_by_field_name("alias")
                .or_else(|| spec.child_by_field_name("name"))
                .map(|n| text(n, source))
                .unwrap_or_default();
            facts.exports.push(ExportFact {
                module: module.to_string(),
                name: exposed,
                kind: if type_only { FactKind::TypeAlias } else { FactKind::Value },
                is_default: false,
                line: spec.start_position().row + 1,
            });
        }
    }
}

fn collect_declaration_exports(declaration: Node, source: &str, module: &str, facts: &mut ModuleFacts) {
    let line = declaration.start_position().row + 1;
    let push = |facts: &mut ModuleFacts, name: String, kind: FactKind, line: usize| {
        if !name.is_empty() {
            facts.exports.push(ExportFact {
                module: module.to_string(),
                name,
                kind,
                is_default: false,
                line,
            });
        }
    };

    match declaration.kind() {
        "function_declaration" | "generator_function_declaration" => {
            let name = field_text(declaration, "name", source);
            push(facts, name, FactKind::Function, line);
        }
        "class_declaration" | "abstract_class_declaration" => {
            let name = field_text(declaration, "name", source);
            push(facts, name, FactKind::Class, line);
        }
        "interface_declaration" => {
            let name = field_text(declaration, "name", source);
            push(facts, name, FactKind::Interface, line);
        }
        "type_alias_declaration" => {
            let name = field_text(declaration, "name", source);
            push(facts, name, FactKind::TypeAlias, line);
        }
        "enum_declaration" => {
            let name = field_text(declaration, "name", source);
            push(facts, name, FactKind::Value, line);
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = declaration.walk();
            for declarator in declaration.named_children(&mut cursor) {
                if declarator.kind() == "variable_declarator" {
                    let name = field_text(declarator, "name", source);
                    let kind = declarator
                        .child_by_field_name("value")
                        .map(|v| match v.kind() {
                            "arrow_function" | "function_expression" => FactKind::Function,
                            "class" => FactKind::Class,
                            _ => FactKind::Value,
                        })
                        .unwrap_or(FactKind::Value);
                    push(facts, name, kind, declarator.start_position().row + 1);
                }
            }
        }
        _ => {}
    }
}

/// The quoted module specifier of an import/re-export, unquoted
fn source_specifier(node: Node, source: &str) -> Option<String> {
    let string_node = node.child_by_field_name("source")?;
    Some(
        text(string_node, source)
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .to_string(),
    )
}

/// True when an anonymous keyword token (`type`, `default`, `*`) is a
/// direct child of the node
fn has_keyword(node: Node, keyword: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == keyword);
    found
}

fn named_child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn field_text(node: Node, field: &str, source: &str) -> String {
    node.child_by_field_name(field)
        .map(|n| text(n, source))
        .unwrap_or_default()
}

fn text(node: Node, source: &str) -> String {
    source[node.start_byte()..node.end_byte()].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn extract(content: &str) -> ModuleFacts {
        TreeSitterExtractor::new()
            .extract(&PathBuf::from("/p/mod.ts"), content)
            .unwrap()
    }

    #[test]
    fn named_imports_yield_one_fact_per_binding() {
        let facts = extract("import { a, b } from './m';\n");
        assert_eq!(facts.imports.len(), 2);
        assert_eq!(facts.imports[0].name, "a");
        assert_eq!(facts.imports[1].name, "b");
        assert!(facts
            .imports
            .iter()
            .all(|i| i.binding == BindingKind::Named && i.source == "./m"));
    }

    #[test]
    fn default_and_namespace_imports() {
        let facts = extract(indoc! {"
            import React from 'react';
            import * as path from './path';
        "});
        assert_eq!(facts.imports.len(), 2);
        assert_eq!(facts.imports[0].binding, BindingKind::Default);
        assert_eq!(facts.imports[0].name, "React");
        assert_eq!(facts.imports[1].binding, BindingKind::Namespace);
        assert_eq!(facts.imports[1].name, "path");
    }

    #[test]
    fn side_effect_import_has_no_binding() {
        let facts = extract("import './styles.css';\n");
        assert_eq!(facts.imports.len(), 1);
        assert_eq!(facts.imports[0].binding, BindingKind::SideEffect);
        assert_eq!(facts.imports[0].name, "");
    }

    #[test]
    fn type_only_import_is_marked() {
        let facts = extract("import type { User } from './types';\n");
        assert_eq!(facts.imports.len(), 1);
        assert!(facts.imports[0].type_only);
    }

    #[test]
    fn exported_declarations_are_collected_with_kinds() {
        let facts = extract(indoc! {"
            export function run() {}
            export class Engine {}
            export interface Options {}
            export type Id = string;
            export const limit = 10;
        "});
        let kinds: Vec<(String, FactKind)> = facts
            .exports
            .iter()
            .map(|e| (e.name.clone(), e.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("run".to_string(), FactKind::Function),
                ("Engine".to_string(), FactKind::Class),
                ("Options".to_string(), FactKind::Interface),
                ("Id".to_string(), FactKind::TypeAlias),
                ("limit".to_string(), FactKind::Value),
            ]
        );
    }

    #[test]
    fn default_export_is_named_default() {
        let facts = extract("export default function main() {}\n");
        assert_eq!(facts.exports.len(), 1);
        assert_eq!(facts.exports[0].name, "default");
        assert!(facts.exports[0].is_default);
        assert_eq!(facts.exports[0].kind, FactKind::Function);
    }

    #[test]
    fn export_clause_uses_exposed_name() {
        let facts = extract("const a = 1;\nexport { a as alias };\n");
        assert_eq!(facts.exports.len(), 1);
        assert_eq!(facts.exports[0].name, "alias");
    }

    #[test]
    fn re_export_produces_import_and_export_facts() {
        let facts = extract("export { helper } from './util';\n");
        assert_eq!(facts.imports.len(), 1);
        assert!(facts.imports[0].re_export);
        assert_eq!(facts.imports[0].source, "./util");
        assert_eq!(facts.exports.len(), 1);
        assert_eq!(facts.exports[0].name, "helper");
    }

    #[test]
    fn star_re_export_is_namespace_import() {
        let facts = extract("export * from './all';\n");
        assert_eq!(facts.imports.len(), 1);
        assert!(facts.imports[0].re_export);
        assert_eq!(facts.imports[0].binding, BindingKind::Namespace);
        assert!(facts.exports.is_empty());
    }

    #[test]
    fn arrow_function_const_is_a_function_export() {
        let facts = extract("export const go = () => {};\n");
        assert_eq!(facts.exports[0].kind, FactKind::Function);
    }

    #[test]
    fn malformed_source_is_a_per_file_error() {
        let result =
            TreeSitterExtractor::new().extract(&PathBuf::from("/p/bad.ts"), "import { from ;;;");
        assert!(result.is_err());
    }

    #[test]
    fn javascript_files_use_the_js_grammar() {
        let facts = TreeSitterExtractor::new()
            .extract(
                &PathBuf::from("/p/mod.js"),
                "const x = require('y');\nexport default x;\n",
            )
            .unwrap();
        assert_eq!(facts.exports.len(), 1);
        assert!(facts.exports[0].is_default);
    }
}
