use crate::model::Folder;
use serde::Serialize;

/// Icon key the frontend maps to its folder glyph.
pub const FOLDER_ICON: &str = "folder";

/// Folder with its subfolders attached. Bookmarks never appear here:
/// the tree feeds a folder-only path picker, and the typed input makes
/// the old "filter out records with a url" pass structural.
#[derive(Debug, Clone)]
pub struct FolderTreeNode {
    pub folder: Folder,
    pub children: Vec<FolderTreeNode>,
}

/// Build the nested folder tree from the flat folder list. Roots are
/// folders whose parentId is empty or the root sentinel.
///
/// Parent references are assumed acyclic; a cycle in the data would
/// recurse without bound, same as the stores feeding this.
pub fn folder_tree(folders: &[Folder]) -> Vec<FolderTreeNode> {
    folders
        .iter()
        .filter(|f| f.is_root())
        .map(|f| attach_children(f, folders))
        .collect()
}

fn attach_children(folder: &Folder, all: &[Folder]) -> FolderTreeNode {
    let children = all
        .iter()
        .filter(|c| !c.is_root() && c.parent_id == folder.id)
        .map(|c| attach_children(c, all))
        .collect();
    FolderTreeNode {
        folder: folder.clone(),
        children,
    }
}

/// Node shape the frontend's tree-select consumes. `children` is only
/// present when there is at least one subfolder, so childless folders
/// render as picker leaves.
#[derive(Debug, Clone, Serialize)]
pub struct PickerNode {
    pub title: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PickerNode>>,
    pub icon: &'static str,
}

pub fn picker_nodes(tree: &[FolderTreeNode]) -> Vec<PickerNode> {
    tree.iter()
        .map(|node| PickerNode {
            title: node.folder.title.clone(),
            value: node.folder.id.clone(),
            children: if node.children.is_empty() {
                None
            } else {
                Some(picker_nodes(&node.children))
            },
            icon: FOLDER_ICON,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str, title: &str, parent: &str) -> Folder {
        Folder {
            id: id.into(),
            title: title.into(),
            parent_id: parent.into(),
        }
    }

    #[test]
    fn empty_list_builds_empty_tree() {
        let tree = folder_tree(&[]);
        assert!(tree.is_empty());
        assert!(picker_nodes(&tree).is_empty());
    }

    #[test]
    fn roots_are_sentinel_or_blank_parent() {
        let folders = vec![
            folder("1", "Bar", "0"),
            folder("2", "Other", ""),
            folder("3", "Dev", "1"),
        ];
        let tree = folder_tree(&folders);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].folder.id, "1");
        assert_eq!(tree[1].folder.id, "2");
    }

    #[test]
    fn every_child_lands_under_its_declared_parent_once() {
        let folders = vec![
            folder("1", "Bar", "0"),
            folder("2", "Dev", "1"),
            folder("3", "Rust", "2"),
            folder("4", "News", "1"),
        ];
        let tree = folder_tree(&folders);
        assert_eq!(tree.len(), 1);
        let bar = &tree[0];
        assert_eq!(bar.children.len(), 2);
        assert_eq!(bar.children[0].folder.id, "2");
        assert_eq!(bar.children[1].folder.id, "4");
        assert_eq!(bar.children[0].children.len(), 1);
        assert_eq!(bar.children[0].children[0].folder.id, "3");

        // no duplicates anywhere
        let mut ids = Vec::new();
        fn collect(nodes: &[FolderTreeNode], out: &mut Vec<String>) {
            for n in nodes {
                out.push(n.folder.id.clone());
                collect(&n.children, out);
            }
        }
        collect(&tree, &mut ids);
        ids.sort();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn deep_chain_terminates_with_matching_depth() {
        // 1 <- 2 <- 3 <- ... <- 30
        let mut folders = vec![folder("1", "d1", "0")];
        for i in 2..=30u32 {
            folders.push(folder(&i.to_string(), &format!("d{}", i), &(i - 1).to_string()));
        }
        let tree = folder_tree(&folders);
        assert_eq!(tree.len(), 1);

        let mut depth = 0;
        let mut cur = &tree[0];
        loop {
            depth += 1;
            match cur.children.first() {
                Some(next) => cur = next,
                None => break,
            }
        }
        assert_eq!(depth, 30);
    }

    #[test]
    fn picker_omits_children_key_for_childless_folders() {
        let folders = vec![folder("1", "Bar", "0"), folder("2", "Dev", "1")];
        let nodes = picker_nodes(&folder_tree(&folders));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].title, "Bar");
        assert_eq!(nodes[0].value, "1");

        let kids = nodes[0].children.as_ref().unwrap();
        assert_eq!(kids.len(), 1);
        assert!(kids[0].children.is_none());

        // childless folder serializes without a children key at all
        let json = serde_json::to_value(&kids[0]).unwrap();
        assert!(json.get("children").is_none());
        assert_eq!(json["icon"], FOLDER_ICON);
    }

    #[test]
    fn orphan_folder_is_dropped_from_the_tree() {
        // parent "9" does not exist; the folder is neither root nor reachable
        let folders = vec![folder("1", "Bar", "0"), folder("5", "Lost", "9")];
        let tree = folder_tree(&folders);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }
}
