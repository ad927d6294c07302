//! Whole-hierarchy view of a user's folders.

use cabinet_core::result::AppResult;
use cabinet_database::repositories::FolderFilter;
use cabinet_entity::folder::FolderNode;

use crate::context::RequestContext;

use super::manager::FolderManager;

impl FolderManager {
    /// Builds the acting user's folder forest from one owner-scoped query.
    pub async fn folder_tree(&self, ctx: &mut RequestContext) -> AppResult<Vec<FolderNode>> {
        let folders = ctx.folders().find_all(&FolderFilter::all()).await?;
        Ok(FolderNode::build_forest(folders))
    }
}
