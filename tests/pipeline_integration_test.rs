mod common;

use common::{build_graph_for, write_project};
use driftmap::{Confidence, CrossReferencer, ModuleResolver};
use pretty_assertions::assert_eq;

fn id_of(root: &std::path::Path, name: &str) -> String {
    root.join(name).to_string_lossy().into_owned()
}

#[test]
fn builds_graph_with_cycle_and_external_edge() {
    let dir = write_project(&[
        (
            "a.ts",
            "import { b } from './b';\nexport const a = () => b();\n",
        ),
        (
            "b.ts",
            "import { a } from './a';\nimport React from 'react';\nexport const b = () => a();\n",
        ),
    ]);

    let (_, _, graph) = build_graph_for(dir.path());
    let metrics = &graph.metrics;

    // a, b, plus the external react node
    assert_eq!(metrics.node_count, 3);
    assert_eq!(metrics.internal_edge_count, 2);
    assert_eq!(metrics.external_edge_count, 1);
    assert_eq!(metrics.cycles.len(), 1);

    let cycle = &metrics.cycles[0];
    assert_eq!(cycle.len(), 3);
    assert_eq!(cycle.first(), cycle.last());
    assert!(cycle.contains(&id_of(dir.path(), "a.ts")));
    assert!(cycle.contains(&id_of(dir.path(), "b.ts")));

    // one cycle costs exactly ten points
    assert_eq!(metrics.health_score, 90.0);
}

#[test]
fn resolves_directory_index_and_extensionless_imports() {
    let dir = write_project(&[
        ("src/lib/index.ts", "export function entry() {}\n"),
        ("src/util.tsx", "export const Widget = () => null;\n"),
        (
            "src/main.ts",
            "import { entry } from './lib';\nimport { Widget } from './util';\nentry();\n",
        ),
    ]);

    let (_, _, graph) = build_graph_for(dir.path());
    assert_eq!(graph.metrics.internal_edge_count, 2);
    assert_eq!(graph.metrics.cycles.len(), 0);

    let main_id = id_of(dir.path(), "src/main.ts");
    let index_id = id_of(dir.path(), "src/lib/index.ts");
    let util_id = id_of(dir.path(), "src/util.tsx");
    let deps = graph.dependencies_of(&main_id);
    assert!(deps.contains(&index_id.as_str()));
    assert!(deps.contains(&util_id.as_str()));
}

#[test]
fn finds_dead_exports_and_unused_imports_across_files() {
    let dir = write_project(&[
        (
            "util.ts",
            "export function used() {}\nexport function orphan() {}\n",
        ),
        (
            "main.ts",
            "import { used, missing } from './util';\nused();\n",
        ),
    ]);

    let (_, facts, _) = build_graph_for(dir.path());
    let exports: Vec<_> = facts.iter().flat_map(|f| f.exports.clone()).collect();
    let imports: Vec<_> = facts.iter().flat_map(|f| f.imports.clone()).collect();

    let referencer = CrossReferencer::new(ModuleResolver::default());

    let dead = referencer.find_dead_exports(&exports, &imports);
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].export.name, "orphan");
    // a plain function with no risk factors is a high-confidence finding
    assert_eq!(dead[0].confidence, Confidence::High);

    let unused = referencer.find_unused_imports(&imports, &exports);
    assert_eq!(unused.len(), 1);
    assert_eq!(unused[0].import.name, "missing");
}

#[test]
fn namespace_import_keeps_all_exports_alive() {
    let dir = write_project(&[
        (
            "api.ts",
            "export function one() {}\nexport function two() {}\n",
        ),
        ("main.ts", "import * as api from './api';\napi.one();\n"),
    ]);

    let (_, facts, _) = build_graph_for(dir.path());
    let exports: Vec<_> = facts.iter().flat_map(|f| f.exports.clone()).collect();
    let imports: Vec<_> = facts.iter().flat_map(|f| f.imports.clone()).collect();

    let referencer = CrossReferencer::new(ModuleResolver::default());
    assert!(referencer.find_dead_exports(&exports, &imports).is_empty());
}

#[test]
fn re_exports_count_as_references() {
    let dir = write_project(&[
        ("inner.ts", "export const value = 1;\n"),
        ("barrel.ts", "export { value } from './inner';\n"),
        ("main.ts", "import { value } from './barrel';\nvalue;\n"),
    ]);

    let (_, facts, _) = build_graph_for(dir.path());
    let exports: Vec<_> = facts.iter().flat_map(|f| f.exports.clone()).collect();
    let imports: Vec<_> = facts.iter().flat_map(|f| f.imports.clone()).collect();

    let referencer = CrossReferencer::new(ModuleResolver::default());
    let dead = referencer.find_dead_exports(&exports, &imports);
    assert!(
        dead.is_empty(),
        "unexpected dead exports: {:?}",
        dead.iter().map(|d| &d.export.name).collect::<Vec<_>>()
    );
}

#[test]
fn healthy_two_module_project_scores_full_marks() {
    let dir = write_project(&[
        ("util.ts", "export const helper = 1;\n"),
        ("main.ts", "import { helper } from './util';\nhelper;\n"),
    ]);

    let (_, _, graph) = build_graph_for(dir.path());
    assert_eq!(graph.metrics.health_score, 100.0);
    assert_eq!(graph.metrics.average_coupling, 0.5);
}
