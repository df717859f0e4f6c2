//! Folding pending steps into the project forest.

use crate::core::path::{find_node, node_key, split_segments};
use crate::core::types::{FoldOutcome, FoldSummary};
use crate::step::{Step, StepStatus};
use crate::tree::{FileNode, Forest};

/// Fold every pending `CreateFile` step into `forest`.
///
/// Each folded step is marked `Completed`, including steps whose path is
/// empty or collides with a node of the other kind; those leave the forest
/// untouched. Steps of any other kind or status are returned as they came.
/// When nothing is foldable, `forest` and `steps` come back unchanged and the
/// summary reports no change.
pub fn fold_steps(forest: Forest, steps: Vec<Step>) -> FoldOutcome {
    let mut forest = forest;
    let mut steps = steps;
    let mut summary = FoldSummary::default();
    let mut rewritten = Vec::new();

    for step in &mut steps {
        if !step.is_foldable() {
            continue;
        }
        let path = step.path.as_deref().unwrap_or_default();
        let code = step.code.as_deref().unwrap_or_default();
        apply_create_file(&mut forest, path, code, &mut summary, &mut rewritten);

        step.status = StepStatus::Completed;
        summary.completed.push(step.id);
    }

    summary.updated = rewritten
        .into_iter()
        .filter(|file| file_contents(&forest, &file.path) != file.original)
        .map(|file| file.key)
        .collect();

    FoldOutcome {
        forest,
        steps,
        summary,
    }
}

/// Pre-fold state of a file that existed before the fold and was rewritten.
struct RewrittenFile {
    key: String,
    path: String,
    original: String,
}

/// Contents a file projects to; a node without content mounts as `""`.
fn file_contents<'a>(forest: &'a [FileNode], path: &str) -> &'a str {
    find_node(forest, path)
        .and_then(|node| node.content.as_deref())
        .unwrap_or_default()
}

fn apply_create_file(
    forest: &mut Forest,
    path: &str,
    code: &str,
    summary: &mut FoldSummary,
    rewritten: &mut Vec<RewrittenFile>,
) {
    let segments = split_segments(path);
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    if let Some(conflict) = find_conflict(forest, parents, last) {
        summary.conflicts.push(format!("step path '{path}': {conflict}"));
        return;
    }

    let mut siblings: &mut Vec<FileNode> = forest;
    let mut prefix = String::new();
    for segment in parents {
        prefix = node_key(&prefix, segment);
        let index = match siblings.iter().position(|node| node.path == prefix) {
            Some(index) => index,
            None => {
                siblings.push(FileNode::folder(segment, &prefix));
                summary.created.push(prefix.clone());
                siblings.len() - 1
            }
        };
        siblings = &mut siblings[index].children;
    }

    let key = node_key(&prefix, last);
    match siblings.iter().position(|node| node.path == key) {
        Some(index) => {
            let existing = &mut siblings[index];
            let current = existing.content.as_deref().unwrap_or_default();
            if current == code {
                return;
            }
            // Only the first rewrite of a pre-existing file sees its original content.
            if !summary.created.contains(&key) && !rewritten.iter().any(|file| file.key == key) {
                rewritten.push(RewrittenFile {
                    key,
                    path: path.to_string(),
                    original: current.to_string(),
                });
            }
            existing.content = Some(code.to_string());
        }
        None => {
            siblings.push(FileNode::file(last, &key, code));
            summary.created.push(key);
        }
    }
}

/// Describe why writing a file at `parents/last` would collide, if it would.
fn find_conflict(forest: &[FileNode], parents: &[&str], last: &str) -> Option<String> {
    let mut siblings = forest;
    let mut prefix = String::new();
    for segment in parents {
        prefix = node_key(&prefix, segment);
        match siblings.iter().find(|node| node.path == prefix) {
            Some(node) if !node.is_folder() => {
                return Some(format!("'{prefix}' is a file, expected a folder"));
            }
            Some(node) => siblings = &node.children,
            None => return None,
        }
    }

    let key = node_key(&prefix, last);
    match siblings.iter().find(|node| node.path == key) {
        Some(node) if node.is_folder() => Some(format!("'{key}' is a folder, expected a file")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mount::{MountEntry, project};
    use crate::step::StepKind;
    use crate::test_support::{create_file_with_status, file, folder, step_of_kind};
    use crate::tree::NodeKind;

    fn fold(forest: Forest, steps: Vec<Step>) -> FoldOutcome {
        fold_steps(forest, steps)
    }

    #[test]
    fn deep_path_creates_intermediate_folders() {
        let outcome = fold(
            Vec::new(),
            vec![Step::create_file(1, "src/components/App.tsx", "X")],
        );

        assert_eq!(
            outcome.summary.created,
            vec!["/src", "/src/components", "/src/components/App.tsx"]
        );
        assert_eq!(outcome.forest.iter().map(FileNode::count_nodes).sum::<usize>(), 3);

        let src = &outcome.forest[0];
        assert_eq!((src.name.as_str(), src.kind), ("src", NodeKind::Folder));
        let components = &src.children[0];
        assert_eq!(components.path, "/src/components");
        let app = &components.children[0];
        assert_eq!(app.kind, NodeKind::File);
        assert_eq!(app.content.as_deref(), Some("X"));
    }

    #[test]
    fn reapplying_same_step_is_idempotent() {
        let once = fold(Vec::new(), vec![Step::create_file(1, "a/b.txt", "hi")]);
        let twice = fold(once.forest.clone(), vec![Step::create_file(2, "a/b.txt", "hi")]);

        assert_eq!(twice.forest, once.forest);
        assert!(!twice.summary.forest_changed());
        assert_eq!(twice.summary.completed, vec![2]);
    }

    #[test]
    fn existing_file_is_overwritten_not_duplicated() {
        let first = fold(Vec::new(), vec![Step::create_file(1, "a/b.txt", "old")]);
        let second = fold(first.forest, vec![Step::create_file(2, "a/b.txt", "new")]);

        assert_eq!(second.forest[0].children.len(), 1);
        assert_eq!(
            find_node(&second.forest, "a/b.txt").and_then(|n| n.content.as_deref()),
            Some("new")
        );
        assert_eq!(second.summary.updated, vec!["/a/b.txt"]);
        assert!(second.summary.created.is_empty());
    }

    #[test]
    fn children_keep_first_creation_order_after_overwrites() {
        let outcome = fold(
            Vec::new(),
            vec![
                Step::create_file(1, "a/z.txt", "1"),
                Step::create_file(2, "a/b.txt", "2"),
                Step::create_file(3, "a/m.txt", "3"),
                Step::create_file(4, "a/b.txt", "4"),
                Step::create_file(5, "a/z.txt", "5"),
            ],
        );

        let names: Vec<&str> = outcome.forest[0]
            .children
            .iter()
            .map(|node| node.name.as_str())
            .collect();
        assert_eq!(names, vec!["z.txt", "b.txt", "m.txt"]);
        assert!(outcome.summary.updated.is_empty());
    }

    #[test]
    fn no_pending_create_file_leaves_everything_unchanged() {
        let forest = vec![folder("/a", vec![file("/a/b.txt", "hi")])];
        let steps = vec![
            create_file_with_status(1, "a/b.txt", "changed", StepStatus::Completed),
            create_file_with_status(2, "a/c.txt", "new", StepStatus::InProgress),
            step_of_kind(3, StepKind::RunScript),
        ];

        let outcome = fold(forest.clone(), steps.clone());

        assert_eq!(outcome.forest, forest);
        assert_eq!(outcome.steps, steps);
        assert!(!outcome.summary.changed());
        assert!(!outcome.summary.forest_changed());
    }

    #[test]
    fn other_kinds_keep_their_status() {
        let outcome = fold(
            Vec::new(),
            vec![
                step_of_kind(1, StepKind::CreateFolder),
                Step::create_file(2, "index.html", "<html>"),
                step_of_kind(3, StepKind::DeleteFile),
            ],
        );

        let statuses: Vec<StepStatus> = outcome.steps.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![StepStatus::Pending, StepStatus::Completed, StepStatus::Pending]
        );
        assert_eq!(outcome.summary.completed, vec![2]);
    }

    #[test]
    fn empty_or_missing_path_is_noop_but_completed() {
        let mut missing = Step::create_file(2, "", "x");
        missing.path = None;
        let outcome = fold(Vec::new(), vec![Step::create_file(1, "", "x"), missing]);

        assert!(outcome.forest.is_empty());
        assert!(outcome.steps.iter().all(|s| s.status == StepStatus::Completed));
        assert!(outcome.summary.changed());
        assert!(!outcome.summary.forest_changed());
    }

    #[test]
    fn missing_code_writes_empty_content() {
        let mut step = Step::create_file(1, "empty.txt", "");
        step.code = None;
        let outcome = fold(Vec::new(), vec![step]);
        assert_eq!(outcome.forest, vec![file("/empty.txt", "")]);
    }

    #[test]
    fn leading_slash_keeps_empty_root_segment() {
        let outcome = fold(Vec::new(), vec![Step::create_file(1, "/a.txt", "x")]);

        assert_eq!(outcome.summary.created, vec!["/", "//a.txt"]);
        let root = &outcome.forest[0];
        assert_eq!(root.name, "");
        assert!(root.is_folder());
        assert_eq!(root.children[0].path, "//a.txt");
    }

    #[test]
    fn file_blocking_a_folder_skips_the_step() {
        let forest = vec![file("/a", "file")];
        let outcome = fold(forest.clone(), vec![Step::create_file(1, "a/b/c.txt", "x")]);

        assert_eq!(outcome.forest, forest);
        assert_eq!(outcome.steps[0].status, StepStatus::Completed);
        assert_eq!(outcome.summary.conflicts.len(), 1);
        assert!(outcome.summary.conflicts[0].contains("'/a' is a file"));
    }

    #[test]
    fn folder_at_file_path_skips_the_step() {
        let forest = vec![folder("/a", vec![file("/a/b.txt", "x")])];
        let outcome = fold(forest.clone(), vec![Step::create_file(1, "a", "text")]);

        assert_eq!(outcome.forest, forest);
        assert!(outcome.summary.conflicts[0].contains("'/a' is a folder"));
    }

    #[test]
    fn conflicting_step_does_not_block_later_steps() {
        let outcome = fold(
            Vec::new(),
            vec![
                Step::create_file(1, "a", "file"),
                Step::create_file(2, "a/b.txt", "blocked"),
                Step::create_file(3, "c/d.txt", "ok"),
            ],
        );

        assert_eq!(outcome.summary.completed, vec![1, 2, 3]);
        assert_eq!(outcome.summary.conflicts.len(), 1);
        assert!(find_node(&outcome.forest, "c/d.txt").is_some());
        assert!(find_node(&outcome.forest, "a/b.txt").is_none());
    }

    #[test]
    fn created_file_overwritten_in_same_fold_is_only_listed_as_created() {
        let outcome = fold(
            Vec::new(),
            vec![
                Step::create_file(1, "a.txt", "1"),
                Step::create_file(2, "a.txt", "2"),
            ],
        );

        assert_eq!(outcome.summary.created, vec!["/a.txt"]);
        assert!(outcome.summary.updated.is_empty());
        assert_eq!(outcome.forest, vec![file("/a.txt", "2")]);
    }

    #[test]
    fn rewrite_restored_within_one_fold_is_not_an_update() {
        let forest = vec![file("/a.txt", "A")];
        let outcome = fold(
            forest.clone(),
            vec![
                Step::create_file(1, "a.txt", "B"),
                Step::create_file(2, "a.txt", "A"),
            ],
        );

        assert_eq!(outcome.forest, forest);
        assert!(outcome.summary.updated.is_empty());
        assert!(!outcome.summary.forest_changed());
        assert!(outcome.summary.changed());
    }

    #[test]
    fn rewrite_through_intermediate_content_lists_key_once() {
        let outcome = fold(
            vec![file("/a.txt", "A")],
            vec![
                Step::create_file(1, "a.txt", "B"),
                Step::create_file(2, "a.txt", "C"),
            ],
        );

        assert_eq!(outcome.summary.updated, vec!["/a.txt"]);
        assert_eq!(outcome.forest, vec![file("/a.txt", "C")]);
    }

    #[test]
    fn empty_code_over_missing_content_is_not_an_update() {
        let mut node = file("/a.txt", "");
        node.content = None;
        let forest = vec![node];

        let outcome = fold(forest.clone(), vec![Step::create_file(1, "a.txt", "")]);

        assert_eq!(outcome.forest, forest);
        assert!(outcome.summary.updated.is_empty());
        assert!(!outcome.summary.forest_changed());
    }

    #[test]
    fn empty_middle_segment_creates_unnamed_folder() {
        let outcome = fold(Vec::new(), vec![Step::create_file(1, "a//b.txt", "x")]);

        assert_eq!(outcome.summary.created, vec!["/a", "/a/", "/a//b.txt"]);
        let unnamed = &outcome.forest[0].children[0];
        assert_eq!((unnamed.name.as_str(), unnamed.kind), ("", NodeKind::Folder));
        assert_eq!(
            find_node(&outcome.forest, "a//b.txt").and_then(|n| n.content.as_deref()),
            Some("x")
        );

        let descriptor = project(&outcome.forest);
        let Some(MountEntry::Directory(a)) = descriptor.get("a") else {
            panic!("a should be a directory: {descriptor:?}");
        };
        let Some(MountEntry::Directory(inner)) = a.get("") else {
            panic!("unnamed folder should be a directory: {a:?}");
        };
        assert_eq!(inner.get("b.txt"), Some(&MountEntry::file("x")));
    }

    #[test]
    fn trailing_slash_creates_unnamed_file() {
        let outcome = fold(Vec::new(), vec![Step::create_file(1, "a/", "x")]);

        assert_eq!(outcome.summary.created, vec!["/a", "/a/"]);
        let unnamed = find_node(&outcome.forest, "a/").expect("unnamed file");
        assert_eq!((unnamed.name.as_str(), unnamed.kind), ("", NodeKind::File));

        let descriptor = project(&outcome.forest);
        let Some(MountEntry::Directory(a)) = descriptor.get("a") else {
            panic!("a should be a directory: {descriptor:?}");
        };
        assert_eq!(a.get(""), Some(&MountEntry::file("x")));
    }
}
