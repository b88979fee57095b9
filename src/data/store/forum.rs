//! Forum operations: posts, likes, comments

use std::collections::BTreeSet;

use super::{EntityStore, prepended, record_mutation, removed, replaced, required};
use crate::data::models::{Comment, EntityId, ForumPost, NotificationSeverity, PostCategory};
use crate::error::{AppError, Result};

/// A new discussion as typed by the author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: PostCategory,
}

impl EntityStore {
    pub fn post(&self, id: &str) -> Option<&ForumPost> {
        self.posts.iter().find(|p| p.id == id)
    }

    fn post_index(&self, id: &str) -> Result<usize> {
        self.posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound.recorded())
    }

    /// Start a new discussion authored by the current user
    ///
    /// # Errors
    /// - `Unauthorized` if nobody is logged in
    /// - `Validation` if title or content is blank
    pub fn add_forum_post(&mut self, post: NewPost) -> Result<ForumPost> {
        let author = self.require_user()?.clone();
        let title = required("title", &post.title)?;
        let content = required("content", &post.content)?;

        let post = ForumPost {
            id: EntityId::new().0,
            author_id: author.id,
            author_name: author.name,
            author_avatar: author.avatar,
            category: post.category,
            title,
            content,
            created_at: chrono::Utc::now(),
            likes: 0,
            liked_by: BTreeSet::new(),
            is_reported: false,
            comments: Vec::new(),
        };

        self.posts = prepended(&self.posts, post.clone());
        record_mutation("add_forum_post");
        tracing::info!(post_id = %post.id, category = %post.category, "Forum post created");

        self.notifier.emit(
            "Post created",
            "A new discussion was added to the forum.",
            NotificationSeverity::Success,
        );

        Ok(post)
    }

    /// Remove a discussion (admin only)
    ///
    /// # Errors
    /// - `Unauthorized` / `Forbidden` unless an admin is logged in
    /// - `NotFound` if no post has this id; nothing is emitted
    pub fn delete_forum_post(&mut self, id: &str) -> Result<ForumPost> {
        self.require_admin()?;
        let index = self.post_index(id)?;

        let post = self.posts[index].clone();
        self.posts = removed(&self.posts, index);
        record_mutation("delete_forum_post");
        tracing::info!(post_id = %id, "Forum post deleted");

        self.notifier.emit(
            "Post deleted",
            "The discussion was removed from the forum.",
            NotificationSeverity::Info,
        );

        Ok(post)
    }

    /// Like or unlike a post as the current user
    ///
    /// The liker set and the counter change together, so the counter always
    /// includes the viewer's like exactly when the viewer is in the set.
    /// Emits no notification.
    pub fn toggle_like_post(&mut self, id: &str) -> Result<ForumPost> {
        let user_id = self.require_user()?.id.clone();
        let index = self.post_index(id)?;

        let mut post = self.posts[index].clone();
        if post.liked_by.remove(&user_id) {
            post.likes = post.likes.saturating_sub(1);
        } else {
            post.liked_by.insert(user_id);
            post.likes += 1;
        }

        self.posts = replaced(&self.posts, index, post.clone());
        record_mutation("toggle_like_post");
        tracing::debug!(post_id = %id, likes = post.likes, "Post like toggled");

        Ok(post)
    }

    /// Append a comment by the current user
    ///
    /// Comments keep arrival order.
    ///
    /// # Errors
    /// - `Unauthorized` if nobody is logged in
    /// - `Validation` if the comment is blank
    /// - `NotFound` if no post has this id
    pub fn add_comment(&mut self, post_id: &str, content: &str) -> Result<Comment> {
        let author = self.require_user()?.clone();
        let content = required("comment", content)?;
        let index = self.post_index(post_id)?;

        let comment = Comment {
            id: EntityId::new().0,
            author_name: author.name,
            author_avatar: author.avatar,
            content,
            created_at: chrono::Utc::now(),
        };

        let mut post = self.posts[index].clone();
        post.comments.push(comment.clone());
        self.posts = replaced(&self.posts, index, post);
        record_mutation("add_comment");
        tracing::info!(post_id = %post_id, comment_id = %comment.id, "Comment added");

        self.notifier.emit(
            "Comment added",
            "Your comment has been posted.",
            NotificationSeverity::Success,
        );

        Ok(comment)
    }
}
