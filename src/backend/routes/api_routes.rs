/**
 * API Route Handlers
 *
 * Wires every `/api` endpoint to its handler. Authentication is enforced by
 * the handlers' `AuthUser` / `AdminUser` extractors, so public and protected
 * routes share one router.
 *
 * # Routes
 *
 * ## Authentication (public except `me`)
 * - `POST /api/auth/signup`, `GET /api/auth/verify/{token}`, `POST /api/auth/login`
 * - `POST /api/auth/forgot-password`, `POST /api/auth/reset-password`
 * - `GET /api/auth/me`
 *
 * ## Account and profiles
 * - `PUT /api/account/{bio,occupation,profile-picture,status,password}`
 * - `POST /api/account/deactivate`
 * - `GET /api/users/{username}`, `GET /api/users/{username}/posts`
 *
 * ## Friends, posts, messages, admin
 * - everything under `/api/friends`, `/api/posts`, `/api/messages` and
 *   `/api/admin/users`
 */

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::account;
use crate::backend::admin;
use crate::backend::auth::handlers as auth;
use crate::backend::friendship;
use crate::backend::messaging;
use crate::backend::posts;
use crate::backend::server::state::AppState;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/verify/{token}", get(auth::verify_email))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/auth/me", get(auth::get_me))
        // Own account
        .route("/api/account/bio", put(account::update_bio))
        .route("/api/account/occupation", put(account::update_occupation))
        .route("/api/account/profile-picture", put(account::update_profile_picture))
        .route("/api/account/status", put(account::set_status))
        .route("/api/account/password", put(account::change_password))
        .route("/api/account/deactivate", post(account::deactivate_self))
        // Public profiles
        .route("/api/users/{username}", get(account::get_profile))
        .route("/api/users/{username}/posts", get(account::get_profile_posts))
        // Friendships
        .route("/api/friends", get(friendship::list_friends))
        .route(
            "/api/friends/requests",
            get(friendship::pending_requests).post(friendship::send_friend_request),
        )
        .route(
            "/api/friends/requests/{user_id}",
            delete(friendship::cancel_friend_request),
        )
        .route(
            "/api/friends/requests/{user_id}/accept",
            post(friendship::accept_friend_request),
        )
        .route(
            "/api/friends/requests/{user_id}/reject",
            post(friendship::reject_friend_request),
        )
        .route("/api/friends/status/{user_id}", get(friendship::relation_status))
        .route("/api/friends/top-contributor", get(friendship::top_contributor))
        .route("/api/friends/most-active", get(friendship::most_active_friend))
        .route("/api/friends/suggestions", get(friendship::friend_suggestions))
        .route("/api/friends/{user_id}", delete(friendship::unfriend))
        // Posts
        .route("/api/posts", post(posts::create_post))
        .route("/api/posts/mine", get(posts::my_posts))
        .route("/api/posts/feed", get(posts::feed))
        .route("/api/posts/explore", get(posts::explore))
        .route(
            "/api/posts/{post_id}",
            get(posts::get_post).delete(posts::delete_post),
        )
        .route("/api/posts/{post_id}/like", post(posts::like_post))
        .route("/api/posts/{post_id}/dislike", post(posts::dislike_post))
        .route("/api/posts/{post_id}/reaction", delete(posts::clear_reaction))
        .route("/api/posts/{post_id}/comments", post(posts::add_comment))
        .route(
            "/api/posts/{post_id}/comments/{comment_id}",
            delete(posts::delete_comment),
        )
        .route(
            "/api/posts/{post_id}/comments/{comment_id}/like",
            post(posts::like_comment),
        )
        .route(
            "/api/posts/{post_id}/comments/{comment_id}/dislike",
            post(posts::dislike_comment),
        )
        .route(
            "/api/posts/{post_id}/comments/{comment_id}/replies",
            post(posts::reply_to_comment),
        )
        // Direct messages
        .route("/api/messages", get(messaging::list_conversations))
        .route("/api/messages/stream", get(messaging::message_stream))
        .route(
            "/api/messages/{user_id}",
            get(messaging::get_thread).post(messaging::send_message),
        )
        // Administration
        .route(
            "/api/admin/users/{user_id}/deactivate",
            post(admin::deactivate_user),
        )
        .route(
            "/api/admin/users/{user_id}/reactivate",
            post(admin::reactivate_user),
        )
        .route("/api/admin/users/{user_id}/role", put(admin::set_role))
        .route(
            "/api/admin/users/{user_id}/reconcile",
            post(admin::reconcile_counters),
        )
}
