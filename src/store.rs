use crate::{
    account::{verify::Outbox, Directory},
    badge::Badges,
    blog::Blog,
    config::Config,
    media::MediaStore,
    post::Posts,
    site::Site,
};

use webster_shared::badge::BadgeDescriptor;

/// All state of the site, held in memory.
#[derive(Debug)]
pub struct Store {
    pub accounts: Directory,
    pub badges: Badges,
    pub blogs: Blog,
    pub posts: Posts,
    pub site: Site,
    pub media: MediaStore,
    /// Verification notices composed at registration.
    pub outbox: Outbox,
}

impl Store {
    /// Creates the state a fresh site starts with: the seed admin, two
    /// badges and two blog posts by the seed admin.
    pub fn new(config: &Config) -> Self {
        let accounts = Directory::new(&config.seed_admin);
        let seed_admin = accounts.seed_admin();

        let mut badges = Badges::new();
        badges.insert(BadgeDescriptor {
            name: "Founder".to_owned(),
            emoji: "👑".to_owned(),
            description: "Was here from the very beginning.".to_owned(),
        });
        badges.insert(BadgeDescriptor {
            name: "Veteran".to_owned(),
            emoji: "🛡️".to_owned(),
            description: "Played on the server for over a year.".to_owned(),
        });

        let mut blogs = Blog::new();
        blogs.insert(
            seed_admin,
            "Server Maintenance Notice".to_owned(),
            "The server will be down for maintenance this weekend while we upgrade the hardware."
                .to_owned(),
        );
        blogs.insert(
            seed_admin,
            "Welcome to the new website".to_owned(),
            "We rebuilt the website from the ground up. Have a look around and tell us what you think!"
                .to_owned(),
        );

        tracing::info!("store initialized with seed admin {seed_admin}");

        Self {
            accounts,
            badges,
            blogs,
            posts: Posts::new(),
            site: Site::default(),
            media: MediaStore::new(),
            outbox: Outbox::new(),
        }
    }
}
