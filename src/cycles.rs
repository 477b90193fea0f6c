//! Circular dependency detection over a batch of moves.
//!
//! The graph is restricted to the moved set: edges are kept only when a moved
//! file's import (read from its NEW location) resolves to another file in the
//! same batch. Dependencies on files outside the batch never contribute, even
//! if they participate in a real cycle.
//!
//! The search is a depth-first walk with an explicit stack, not recursion, so
//! arbitrarily large batches cannot blow the call stack. The first cycle found
//! short-circuits the whole detection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::project::ModuleGraph;
use crate::resolve::{candidate_paths, normalize_path};

/// Outcome of one detection pass. `cycle_path`, when present, lists display
/// basenames from a start node back to itself; internal comparisons always
/// use absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub has_cycle: bool,
    pub cycle_path: Option<Vec<String>>,
}

impl CycleReport {
    pub fn clean() -> Self {
        Self {
            has_cycle: false,
            cycle_path: None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Detect a cycle among the moved files described by `move_map`
/// (original path -> new path), reading imports through the project model.
pub fn detect_cycles(
    project: &dyn ModuleGraph,
    move_map: &BTreeMap<PathBuf, PathBuf>,
) -> CycleReport {
    // Membership: both the original and the new spelling of a moved file
    // identify the same node (its new path).
    let mut members: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
    for (old, new) in move_map {
        let new_n = normalize_path(new);
        members.insert(normalize_path(old), new_n.clone());
        members.insert(new_n.clone(), new_n);
    }

    // Adjacency restricted to the moved set. A file with no moved-set
    // dependencies keeps an empty entry: isolated nodes never form cycles.
    let mut adjacency: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for new in move_map.values() {
        let node = normalize_path(new);
        let entry = adjacency.entry(node.clone()).or_default();

        let Ok(specs) = project.import_specifiers(&node) else {
            continue;
        };
        let from_dir = node
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        for r in specs {
            if !r.is_relative() {
                continue;
            }
            let target = candidate_paths(&r.specifier, &from_dir)
                .into_iter()
                .find_map(|c| members.get(&c).cloned());
            if let Some(target) = target {
                entry.push(target);
            }
        }
    }

    debug!(nodes = adjacency.len(), "built moved-set dependency graph");

    let mut marks: BTreeMap<PathBuf, Mark> = adjacency
        .keys()
        .map(|k| (k.clone(), Mark::White))
        .collect();

    for start in adjacency.keys() {
        if marks[start] != Mark::White {
            continue;
        }

        // (node, next neighbor index); `path` mirrors the gray chain.
        let mut stack: Vec<(PathBuf, usize)> = vec![(start.clone(), 0)];
        let mut path: Vec<PathBuf> = vec![start.clone()];
        marks.insert(start.clone(), Mark::Gray);

        while let Some((node, idx)) = stack.last().cloned() {
            let neighbors = &adjacency[&node];
            if idx < neighbors.len() {
                stack.last_mut().expect("nonempty stack").1 += 1;
                let next = neighbors[idx].clone();
                match marks[&next] {
                    Mark::Gray => {
                        // Back edge: slice the gray chain from the revisited
                        // node to the top, closing the loop.
                        let from = path
                            .iter()
                            .position(|p| *p == next)
                            .expect("gray node is on the path");
                        let mut cycle: Vec<String> =
                            path[from..].iter().map(|p| basename(p)).collect();
                        cycle.push(basename(&next));
                        return CycleReport {
                            has_cycle: true,
                            cycle_path: Some(cycle),
                        };
                    }
                    Mark::White => {
                        marks.insert(next.clone(), Mark::Gray);
                        path.push(next.clone());
                        stack.push((next, 0));
                    }
                    Mark::Black => {}
                }
            } else {
                marks.insert(node, Mark::Black);
                stack.pop();
                path.pop();
            }
        }
    }

    CycleReport::clean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::SourceTree;

    fn moves(pairs: &[(&str, &str)]) -> BTreeMap<PathBuf, PathBuf> {
        pairs
            .iter()
            .map(|(a, b)| (PathBuf::from(a), PathBuf::from(b)))
            .collect()
    }

    #[test]
    fn mutual_imports_form_a_cycle() {
        let tree = SourceTree::from_files(
            Path::new("/proj"),
            [
                ("/proj/dst/a.ts", "import { b } from './b';\n"),
                ("/proj/dst/b.ts", "import { a } from './a';\n"),
            ],
        );
        let report = detect_cycles(
            &tree,
            &moves(&[
                ("/proj/src/a.ts", "/proj/dst/a.ts"),
                ("/proj/src/b.ts", "/proj/dst/b.ts"),
            ]),
        );
        assert!(report.has_cycle);
        let path = report.cycle_path.unwrap();
        assert!(path.contains(&"a.ts".to_string()));
        assert!(path.contains(&"b.ts".to_string()));
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn one_way_dependency_is_not_a_cycle() {
        let tree = SourceTree::from_files(
            Path::new("/proj"),
            [
                ("/proj/dst/a.ts", "import { b } from './b';\n"),
                ("/proj/dst/b.ts", "export const b = 1;\n"),
            ],
        );
        let report = detect_cycles(
            &tree,
            &moves(&[
                ("/proj/src/a.ts", "/proj/dst/a.ts"),
                ("/proj/src/b.ts", "/proj/dst/b.ts"),
            ]),
        );
        assert!(!report.has_cycle);
        assert!(report.cycle_path.is_none());
    }

    #[test]
    fn self_import_is_a_one_node_cycle() {
        let tree = SourceTree::from_files(
            Path::new("/proj"),
            [("/proj/dst/loner.ts", "import { x } from './loner';\n")],
        );
        let report = detect_cycles(&tree, &moves(&[("/proj/src/loner.ts", "/proj/dst/loner.ts")]));
        assert!(report.has_cycle);
        assert_eq!(
            report.cycle_path.unwrap(),
            vec!["loner.ts".to_string(), "loner.ts".to_string()]
        );
    }

    #[test]
    fn dependencies_outside_the_moved_set_are_ignored() {
        // dst/a imports an unmoved neighbor that imports it back; the edge
        // leaves the moved set, so no cycle can be reported.
        let tree = SourceTree::from_files(
            Path::new("/proj"),
            [
                ("/proj/dst/a.ts", "import { o } from '../lib/outside';\n"),
                ("/proj/lib/outside.ts", "import { a } from '../dst/a';\n"),
            ],
        );
        let report = detect_cycles(&tree, &moves(&[("/proj/src/a.ts", "/proj/dst/a.ts")]));
        assert!(!report.has_cycle);
    }

    #[test]
    fn longer_cycle_reports_ordered_path() {
        let tree = SourceTree::from_files(
            Path::new("/proj"),
            [
                ("/proj/d/a.ts", "import './b';\n"),
                ("/proj/d/b.ts", "import './c';\n"),
                ("/proj/d/c.ts", "import './a';\n"),
            ],
        );
        let report = detect_cycles(
            &tree,
            &moves(&[
                ("/proj/s/a.ts", "/proj/d/a.ts"),
                ("/proj/s/b.ts", "/proj/d/b.ts"),
                ("/proj/s/c.ts", "/proj/d/c.ts"),
            ]),
        );
        assert!(report.has_cycle);
        let path = report.cycle_path.unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.first(), path.last());
    }
}
