/**
 * Post Handlers
 *
 * Creation, reads and engagement for posts. Every response that carries
 * posts goes through `readable_posts`, so privacy filtering and the scrub of
 * deactivated contributors happen in one place.
 *
 * # Reads
 *
 * - **mine**: the caller's posts at every privacy level
 * - **feed**: the caller's posts plus public and friends-only posts of friends
 * - **explore**: public posts of users who are neither the caller nor a friend
 *
 * All lists are newest first and paginated with `?limit=&offset=`.
 *
 * # Mutations
 *
 * Reacting, commenting and replying require that the caller can see the
 * post (403 otherwise). The store moves the owner's `activity` counter by
 * the change in post-level engagement.
 */

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::social::{is_visible, readable_posts, Viewer};
use crate::backend::store::{PostQuery, PostStore, UserStore};
use crate::shared::post::{CreatePostRequest, TextRequest};
use crate::shared::{Comment, Pagination, Post, PostMutation, Privacy, Reaction, Reply};

/// Trimmed, non-empty text or a 400 naming `field`
fn text_field(field: &str, value: &str) -> Result<String, BackendError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BackendError::bad_request(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

/// Run posts through the read path and return them as the response body
async fn respond(
    state: &AppState,
    viewer: &Viewer,
    posts: Vec<Post>,
) -> Result<Json<Vec<Post>>, BackendError> {
    Ok(Json(readable_posts(state.store.as_ref(), viewer, posts).await?))
}

/// Load a post the caller may see: 404 when missing or its owner is
/// inactive, 403 when it is hidden from the caller
async fn visible_post(
    state: &AppState,
    me: &User,
    post_id: Uuid,
) -> Result<(Viewer, Post), BackendError> {
    let post = state
        .store
        .post_by_id(post_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;

    let owner_active = state
        .store
        .user_by_id(post.user_id)
        .await?
        .is_some_and(|owner| !owner.deactivated);
    if !owner_active {
        return Err(BackendError::not_found("Post not found"));
    }

    let viewer = Viewer::resolve(state.store.as_ref(), me.id).await?;
    if !is_visible(&viewer, &post) {
        tracing::warn!("{} tried to reach hidden post {}", me.username, post_id);
        return Err(BackendError::forbidden("You cannot see this post"));
    }
    Ok((viewer, post))
}

/// Check visibility, apply `mutation`, and return the scrubbed result
async fn mutate(
    state: &AppState,
    me: &User,
    post_id: Uuid,
    mutation: PostMutation,
) -> Result<Json<Post>, BackendError> {
    let (viewer, _) = visible_post(state, me, post_id).await?;
    let post = state.store.mutate_post(post_id, &mutation).await?;
    readable_posts(state.store.as_ref(), &viewer, vec![post])
        .await?
        .pop()
        .map(Json)
        .ok_or_else(|| BackendError::not_found("Post not found"))
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Json(request): Json<CreatePostRequest>,
) -> Result<Json<Post>, BackendError> {
    let content = text_field("content", &request.content)?;
    let media = request
        .media
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    let privacy = request.privacy.unwrap_or_default();

    let post = Post::new(me.id, content, media, privacy);
    state.store.insert_post(&post).await?;

    tracing::info!("{} created {} post {}", me.username, privacy.as_str(), post.id);
    Ok(Json(post))
}

/// GET /api/posts/mine
pub async fn my_posts(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Post>>, BackendError> {
    let viewer = Viewer::resolve(state.store.as_ref(), me.id).await?;
    let query = PostQuery {
        owners: Some(vec![me.id]),
        exclude_owners: Vec::new(),
        privacy: Privacy::ALL.to_vec(),
        always_include: None,
        page: pagination.page(),
    };
    let posts = state.store.query_posts(&query).await?;
    respond(&state, &viewer, posts).await
}

/// GET /api/posts/feed
pub async fn feed(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Post>>, BackendError> {
    let viewer = Viewer::resolve(state.store.as_ref(), me.id).await?;
    let mut owners: Vec<Uuid> = viewer.friends.iter().copied().collect();
    owners.push(me.id);

    let query = PostQuery {
        owners: Some(owners),
        exclude_owners: Vec::new(),
        privacy: vec![Privacy::Public, Privacy::Friends],
        always_include: Some(me.id),
        page: pagination.page(),
    };
    let posts = state.store.query_posts(&query).await?;
    tracing::debug!("Feed for {}: {} posts", me.username, posts.len());
    respond(&state, &viewer, posts).await
}

/// GET /api/posts/explore
pub async fn explore(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Post>>, BackendError> {
    let viewer = Viewer::resolve(state.store.as_ref(), me.id).await?;
    let mut excluded: Vec<Uuid> = viewer.friends.iter().copied().collect();
    excluded.push(me.id);

    let query = PostQuery {
        owners: None,
        exclude_owners: excluded,
        privacy: vec![Privacy::Public],
        always_include: None,
        page: pagination.page(),
    };
    let posts = state.store.query_posts(&query).await?;
    respond(&state, &viewer, posts).await
}

/// GET /api/posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Post>, BackendError> {
    let (viewer, post) = visible_post(&state, &me, post_id).await?;
    readable_posts(state.store.as_ref(), &viewer, vec![post])
        .await?
        .pop()
        .map(Json)
        .ok_or_else(|| BackendError::not_found("Post not found"))
}

/// DELETE /api/posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Post>, BackendError> {
    let post = state
        .store
        .post_by_id(post_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;

    if post.user_id != me.id {
        tracing::warn!("{} tried to delete post {} they do not own", me.username, post_id);
        return Err(BackendError::forbidden("Only the owner can delete this post"));
    }

    let removed = state.store.delete_post(post_id).await?;
    tracing::info!("{} deleted post {}", me.username, post_id);
    Ok(Json(removed))
}

/// POST /api/posts/{post_id}/like
pub async fn like_post(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Post>, BackendError> {
    let mutation = PostMutation::React {
        user: me.id,
        reaction: Some(Reaction::Like),
    };
    mutate(&state, &me, post_id, mutation).await
}

/// POST /api/posts/{post_id}/dislike
pub async fn dislike_post(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Post>, BackendError> {
    let mutation = PostMutation::React {
        user: me.id,
        reaction: Some(Reaction::Dislike),
    };
    mutate(&state, &me, post_id, mutation).await
}

/// DELETE /api/posts/{post_id}/reaction
pub async fn clear_reaction(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Post>, BackendError> {
    let mutation = PostMutation::React {
        user: me.id,
        reaction: None,
    };
    mutate(&state, &me, post_id, mutation).await
}

/// POST /api/posts/{post_id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(post_id): Path<Uuid>,
    Json(request): Json<TextRequest>,
) -> Result<Json<Post>, BackendError> {
    let text = text_field("text", &request.text)?;
    let comment = Comment::new(me.id, text);
    let post = mutate(&state, &me, post_id, PostMutation::Comment { comment }).await?;
    tracing::info!("{} commented on post {}", me.username, post_id);
    Ok(post)
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Post>, BackendError> {
    let mutation = PostMutation::DeleteComment {
        actor: me.id,
        comment_id,
    };
    mutate(&state, &me, post_id, mutation).await
}

/// POST /api/posts/{post_id}/comments/{comment_id}/like
pub async fn like_comment(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Post>, BackendError> {
    let mutation = PostMutation::ReactToComment {
        user: me.id,
        comment_id,
        reaction: Reaction::Like,
    };
    mutate(&state, &me, post_id, mutation).await
}

/// POST /api/posts/{post_id}/comments/{comment_id}/dislike
pub async fn dislike_comment(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Post>, BackendError> {
    let mutation = PostMutation::ReactToComment {
        user: me.id,
        comment_id,
        reaction: Reaction::Dislike,
    };
    mutate(&state, &me, post_id, mutation).await
}

/// POST /api/posts/{post_id}/comments/{comment_id}/replies
pub async fn reply_to_comment(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<TextRequest>,
) -> Result<Json<Post>, BackendError> {
    let text = text_field("text", &request.text)?;
    let mutation = PostMutation::Reply {
        comment_id,
        reply: Reply::new(me.id, text),
    };
    mutate(&state, &me, post_id, mutation).await
}
