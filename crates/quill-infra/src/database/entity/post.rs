//! Post entity for SeaORM.
//!
//! Tags and comments are embedded in the row as JSONB.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use serde::de::DeserializeOwned;

use quill_core::domain::{Comment, Post};
use quill_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub is_published: bool,
    pub view_count: i64,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
///
/// A row whose embedded JSON does not decode is an error rather than an
/// empty list, so it can never be written back over the stored value.
impl TryFrom<Model> for Post {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let tags: Vec<String> = decode_embedded(model.id, "tags", model.tags)?;
        let comments: Vec<Comment> = decode_embedded(model.id, "comments", model.comments)?;

        Ok(Self {
            id: model.id,
            author_id: model.author_id,
            category_id: model.category_id,
            title: model.title,
            slug: model.slug,
            content: model.content,
            excerpt: model.excerpt,
            featured_image: model.featured_image,
            tags,
            is_published: model.is_published,
            view_count: model.view_count,
            comments,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

fn decode_embedded<T>(id: Uuid, column: &str, value: Json) -> Result<T, RepoError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(value).map_err(|e| {
        tracing::error!(post_id = %id, column, error = %e, "Stored post JSON is malformed");
        RepoError::Query(format!("invalid {column} column for post {id}: {e}"))
    })
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        let comments =
            serde_json::to_value(&post.comments).unwrap_or_else(|_| Json::Array(Vec::new()));

        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            category_id: Set(post.category_id),
            title: Set(post.title),
            slug: Set(post.slug),
            content: Set(post.content),
            excerpt: Set(post.excerpt),
            featured_image: Set(post.featured_image),
            tags: Set(Json::from(post.tags)),
            is_published: Set(post.is_published),
            view_count: Set(post.view_count),
            comments: Set(comments),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
