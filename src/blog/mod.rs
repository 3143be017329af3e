pub mod handle;

use chrono::Utc;
use webster_shared::blog::*;

use crate::{
    account::{AccountRef, Directory},
    permission::{self, Permission},
    Error, Store,
};

/// Blog posts, newest first.
#[derive(Debug, Default)]
pub struct Blog {
    posts: Vec<BlogPost>,
}

impl Blog {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn list(&self) -> &[BlogPost] {
        &self.posts
    }

    #[inline]
    pub fn get(&self, id: u64) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Publishes a post without checking permissions, returning its id.
    pub(crate) fn insert(&mut self, author: u64, title: String, content: String) -> u64 {
        let id = crate::gen_id(|id| self.get(id).is_some());
        self.posts.insert(
            0,
            BlogPost {
                id,
                title,
                content,
                author,
                created_at: Utc::now(),
                comments: Vec::new(),
            },
        );
        id
    }

    /// Resolves the bylines of a post against the current accounts.
    pub fn view(&self, id: u64, accounts: &Directory) -> Option<BlogPostView> {
        let post = self.get(id)?;
        Some(BlogPostView {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            author: byline(accounts, post.author),
            created_at: post.created_at,
            comments: post
                .comments
                .iter()
                .map(|c| CommentView {
                    comment: c.clone(),
                    byline: byline(accounts, c.author),
                })
                .collect(),
        })
    }
}

/// How an author is shown: admins allowed to write as the site show a bare
/// admin label instead of their profile.
pub fn byline(accounts: &Directory, author: u64) -> Byline {
    match accounts.get(author) {
        Some(AccountRef::Admin(admin)) if admin.has_permission(Permission::CommentAsAdmin) => {
            Byline::Admin
        }
        Some(account) => Byline::Account(account.view()),
        None => Byline::Unknown,
    }
}

impl Store {
    /// Requires [`Permission::ManageBlogs`].
    pub fn create_blog(&mut self, actor: u64, descriptor: NewBlogDescriptor) -> Result<u64, Error> {
        permission::authorize(self.accounts.get(actor), Permission::ManageBlogs)?;
        let title = descriptor.title.trim();
        if title.is_empty() {
            return Err(Error::EmptyField("title"));
        }
        if descriptor.content.trim().is_empty() {
            return Err(Error::EmptyField("content"));
        }

        let id = self
            .blogs
            .insert(actor, title.to_owned(), descriptor.content);
        tracing::info!("admin {actor} published blog post {id}");
        Ok(id)
    }

    /// Requires [`Permission::ManageBlogs`].
    pub fn delete_blog(&mut self, actor: u64, id: u64) -> Result<(), Error> {
        permission::authorize(self.accounts.get(actor), Permission::ManageBlogs)?;
        let index = self
            .blogs
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::BlogPostNotFound(id))?;
        self.blogs.posts.remove(index);
        tracing::info!("admin {actor} deleted blog post {id}");
        Ok(())
    }

    /// Appends a comment to a blog post. Any logged in account may comment.
    pub fn comment(&mut self, actor: u64, post: u64, text: &str) -> Result<u64, Error> {
        if self.accounts.get(actor).is_none() {
            return Err(Error::NotLoggedIn);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyField("comment"));
        }

        let post = self
            .blogs
            .posts
            .iter_mut()
            .find(|p| p.id == post)
            .ok_or(Error::BlogPostNotFound(post))?;
        let id = crate::gen_id(|id| post.comments.iter().any(|c| c.id == id));
        post.comments.push(Comment {
            id,
            post: post.id,
            author: actor,
            text: text.to_owned(),
            created_at: Utc::now(),
        });
        Ok(id)
    }
}
