//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, Unchanged,
};
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Page, PageRequest, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, PostRepository, UserRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};
use super::{like_pattern, mask_email};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        result.map(User::try_from).transpose()
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        result.map(Category::try_from).transpose()
    }

    async fn list_sorted(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        result.into_iter().map(Category::try_from).collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        result.map(Post::try_from).transpose()
    }

    async fn list(
        &self,
        category_id: Option<Uuid>,
        request: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let mut query = PostEntity::find();
        if let Some(category_id) = category_id {
            query = query.filter(post::Column::CategoryId.eq(category_id));
        }

        let total = query.clone().count(&self.db).await.map_err(map_db_err)?;
        let (offset, limit) = request.window();

        let models = query
            .order_by_desc(post::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let posts = models
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<_, _>>()?;
        Ok(Page::new(posts, request, total))
    }

    async fn search(&self, query: &str) -> Result<Vec<Post>, RepoError> {
        let pattern = like_pattern(query);
        let title_like = LikeExpr::new(&pattern).escape('\\');
        let content_like = LikeExpr::new(&pattern).escape('\\');

        let result = PostEntity::find()
            .filter(
                Condition::any()
                    .add(Expr::col(post::Column::Title).ilike(title_like))
                    .add(Expr::col(post::Column::Content).ilike(content_like)),
            )
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        result.into_iter().map(Post::try_from).collect()
    }

    async fn save_edits(&self, edited: Post) -> Result<Post, RepoError> {
        let active = post::ActiveModel {
            id: Unchanged(edited.id),
            category_id: Set(edited.category_id),
            title: Set(edited.title),
            content: Set(edited.content),
            excerpt: Set(edited.excerpt),
            featured_image: Set(edited.featured_image),
            tags: Set(edited.tags.into()),
            is_published: Set(edited.is_published),
            updated_at: Set(edited.updated_at.into()),
            ..<post::ActiveModel as ActiveModelTrait>::default()
        };

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Post::try_from(model)
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<Post, RepoError> {
        let models = PostEntity::update_many()
            .col_expr(
                post::Column::ViewCount,
                Expr::col(post::Column::ViewCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        first_updated(models)
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Post, RepoError> {
        let updated_at = DateTimeWithTimeZone::from(comment.created_at);
        let appended =
            serde_json::to_value([comment]).map_err(|e| RepoError::Query(e.to_string()))?;

        let models = PostEntity::update_many()
            .col_expr(
                post::Column::Comments,
                Expr::col(post::Column::Comments).concatenate(Expr::value(appended)),
            )
            .col_expr(post::Column::UpdatedAt, Expr::value(updated_at))
            .filter(post::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        first_updated(models)
    }
}

/// The single row an id-filtered `UPDATE .. RETURNING` produced.
fn first_updated(models: Vec<post::Model>) -> Result<Post, RepoError> {
    models
        .into_iter()
        .next()
        .ok_or(RepoError::NotFound)
        .and_then(Post::try_from)
}
