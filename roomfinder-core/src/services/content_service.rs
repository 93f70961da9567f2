//! Blog posts and help-center articles

use std::sync::Arc;

use roomfinder_backend::{
    Article, ArticleDraft, ArticleKind, ArticleQueryParams, Capability, PaginatedResponse,
};

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::Notifier;
use crate::validation;

/// Content service
pub struct ContentService {
    ctx: Arc<ServiceContext>,
}

impl ContentService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn list(
        &self,
        kind: ArticleKind,
        params: &ArticleQueryParams,
    ) -> CoreResult<PaginatedResponse<Article>> {
        let mut params = params.clone();
        params.page = params.page.max(1);
        params.page_size = params.page_size.clamp(1, 100);
        self.ctx
            .call(Capability::Content, |b| async move {
                b.list_articles(kind, &params).await
            })
            .await
    }

    pub async fn get(&self, kind: ArticleKind, slug: &str) -> CoreResult<Article> {
        self.ctx
            .call(Capability::Content, |b| async move {
                b.get_article(kind, slug).await
            })
            .await
    }

    /// Create an article; an empty slug is generated from the title.
    pub async fn create(&self, kind: ArticleKind, draft: &ArticleDraft) -> CoreResult<Article> {
        let draft = prepare(draft)?;
        self.ctx.require_user().await?;
        let article = self
            .ctx
            .call(Capability::Content, |b| async move {
                b.create_article(kind, &draft).await
            })
            .await?;
        log::info!("{kind:?} article '{}' created", article.slug);
        self.ctx.notifier.success("Article created");
        Ok(article)
    }

    pub async fn update(
        &self,
        kind: ArticleKind,
        article_id: &str,
        draft: &ArticleDraft,
    ) -> CoreResult<Article> {
        let draft = prepare(draft)?;
        self.ctx.require_user().await?;
        let article = self
            .ctx
            .call(Capability::Content, |b| async move {
                b.update_article(kind, article_id, &draft).await
            })
            .await?;
        self.ctx.notifier.success("Article updated");
        Ok(article)
    }

    pub async fn delete(&self, kind: ArticleKind, article_id: &str) -> CoreResult<()> {
        self.ctx.require_user().await?;
        self.ctx
            .call(Capability::Content, |b| async move {
                b.delete_article(kind, article_id).await
            })
            .await?;
        log::info!("{kind:?} article {article_id} deleted");
        self.ctx.notifier.success("Article deleted");
        Ok(())
    }
}

fn prepare(draft: &ArticleDraft) -> CoreResult<ArticleDraft> {
    let mut draft = draft.clone();
    draft.title = draft.title.trim().to_string();
    draft.slug = draft.slug.trim().to_string();
    if draft.slug.is_empty() {
        draft.slug = validation::slugify(&draft.title);
    }
    draft.tags.retain(|t| !t.trim().is_empty());
    validation::validate_article(&draft)?;
    Ok(draft)
}
