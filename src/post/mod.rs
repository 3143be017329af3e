pub mod handle;

use chrono::Utc;
use webster_shared::post::UserPost;

use crate::{
    permission::{self, Permission},
    Error, Store,
};

/// User posts, newest first.
#[derive(Debug, Default)]
pub struct Posts {
    inner: Vec<UserPost>,
}

impl Posts {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn list(&self) -> &[UserPost] {
        &self.inner
    }

    #[inline]
    pub fn get(&self, id: u64) -> Option<&UserPost> {
        self.inner.iter().find(|p| p.id == id)
    }
}

impl Store {
    /// Posts as a logged in account, optionally with an uploaded image.
    pub fn create_post(
        &mut self,
        actor: u64,
        content: &str,
        media: Option<u64>,
    ) -> Result<u64, Error> {
        if self.accounts.get(actor).is_none() {
            return Err(Error::NotLoggedIn);
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::EmptyField("content"));
        }
        let media = match media {
            Some(hash) => Some(self.media.reference(hash).ok_or(Error::MediaNotFound(hash))?),
            None => None,
        };

        let id = crate::gen_id(|id| self.posts.get(id).is_some());
        self.posts.inner.insert(
            0,
            UserPost {
                id,
                author: actor,
                content: content.to_owned(),
                media,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    /// Requires [`Permission::ModeratePosts`].
    pub fn delete_post(&mut self, actor: u64, id: u64) -> Result<(), Error> {
        permission::authorize(self.accounts.get(actor), Permission::ModeratePosts)?;
        let index = self
            .posts
            .inner
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::PostNotFound(id))?;
        self.posts.inner.remove(index);
        tracing::info!("admin {actor} removed post {id}");
        Ok(())
    }
}
