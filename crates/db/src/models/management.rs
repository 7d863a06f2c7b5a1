//! Management tree: main categories → sub categories → staff.

use portico_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `main_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MainCategory {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateMainCategory {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMainCategory {
    pub name: Option<String>,
}

/// A row from the `sub_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubCategory {
    pub id: DbId,
    pub main_category_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubCategory {
    pub main_category_id: DbId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubCategory {
    pub main_category_id: Option<DbId>,
    pub name: Option<String>,
}

/// A row from the `staff` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Staff {
    pub id: DbId,
    pub sub_category_id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub grade: String,
    pub region: String,
    pub email: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateStaff {
    pub sub_category_id: DbId,
    pub name: String,
    pub grade: Option<String>,
    /// Defaults to "Not a Regional Head".
    pub region: Option<String>,
    pub email: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStaff {
    pub sub_category_id: Option<DbId>,
    pub name: Option<String>,
    pub grade: Option<String>,
    pub region: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Tree view
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SubCategoryNode {
    #[serde(flatten)]
    pub sub_category: SubCategory,
    pub staff: Vec<Staff>,
}

#[derive(Debug, Serialize)]
pub struct MainCategoryNode {
    #[serde(flatten)]
    pub main_category: MainCategory,
    pub sub_categories: Vec<SubCategoryNode>,
}

/// Assemble the management tree from flat lists. Children whose parent is
/// missing from the input are dropped. Input order is preserved at every
/// level.
pub fn build_tree(
    mains: Vec<MainCategory>,
    subs: Vec<SubCategory>,
    staff: Vec<Staff>,
) -> Vec<MainCategoryNode> {
    let mut sub_nodes: Vec<SubCategoryNode> = subs
        .into_iter()
        .map(|sub_category| SubCategoryNode {
            sub_category,
            staff: Vec::new(),
        })
        .collect();
    for member in staff {
        if let Some(node) = sub_nodes
            .iter_mut()
            .find(|n| n.sub_category.id == member.sub_category_id)
        {
            node.staff.push(member);
        }
    }

    let mut tree: Vec<MainCategoryNode> = mains
        .into_iter()
        .map(|main_category| MainCategoryNode {
            main_category,
            sub_categories: Vec::new(),
        })
        .collect();
    for node in sub_nodes {
        if let Some(parent) = tree
            .iter_mut()
            .find(|m| m.main_category.id == node.sub_category.main_category_id)
        {
            parent.sub_categories.push(node);
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn main(id: DbId, name: &str) -> MainCategory {
        MainCategory {
            id,
            name: name.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sub(id: DbId, main_category_id: DbId) -> SubCategory {
        SubCategory {
            id,
            main_category_id,
            name: format!("sub {id}"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn member(id: DbId, sub_category_id: DbId) -> Staff {
        Staff {
            id,
            sub_category_id,
            name: format!("staff {id}"),
            image: None,
            grade: String::new(),
            region: "Not a Regional Head".into(),
            email: "a@example.com".into(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn tree_nests_children_under_parents() {
        let tree = build_tree(
            vec![main(1, "Directors"), main(2, "Regional Heads")],
            vec![sub(10, 1), sub(11, 2), sub(12, 1)],
            vec![member(100, 10), member(101, 12), member(102, 10)],
        );

        assert_eq!(tree.len(), 2);
        let directors = &tree[0];
        assert_eq!(directors.sub_categories.len(), 2);
        assert_eq!(directors.sub_categories[0].staff.len(), 2);
        assert_eq!(directors.sub_categories[1].staff.len(), 1);
        assert!(tree[1].sub_categories[0].staff.is_empty());
    }

    #[test]
    fn tree_drops_orphans() {
        let tree = build_tree(vec![main(1, "Directors")], vec![sub(10, 99)], vec![member(1, 77)]);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].sub_categories.is_empty());
    }
}
