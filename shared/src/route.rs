use serde::{Deserialize, Serialize};

use crate::{
    account::{Permission, Permissions},
    blog::BlogPostView,
};

/// A named page of the site.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "page", content = "id", rename_all = "snake_case")]
pub enum Route {
    Home,
    Blog,
    BlogPost(u64),
    Posts,
    Status,
    Profile,
    /// Shop preview for admins holding [`Permission::ViewShop`].
    Shop,
    Login,
    AdminLogin,
    Register,
    AdminDashboard,
}

impl Route {
    /// Parses a location hash such as `#blog/42`.
    ///
    /// Unknown or empty hashes map to [`Route::Home`]. A blog post id that
    /// isn't a number still maps to a blog post route, with an id that can
    /// never exist, so resolving it falls back to the blog list.
    pub fn from_hash(hash: &str) -> Self {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        if let Some(id) = hash.strip_prefix("blog/") {
            return Route::BlogPost(id.parse().unwrap_or(0));
        }
        match hash {
            "blog" => Route::Blog,
            "posts" => Route::Posts,
            "status" => Route::Status,
            "profile" => Route::Profile,
            "shop" => Route::Shop,
            "login" => Route::Login,
            "adminlogin" => Route::AdminLogin,
            "register" => Route::Register,
            _ => Route::Home,
        }
    }

    /// The location hash of this route.
    ///
    /// The dashboard has none, the hash is cleared when it opens.
    pub fn to_hash(&self) -> String {
        match self {
            Route::Home => "#home".to_owned(),
            Route::Blog => "#blog".to_owned(),
            Route::BlogPost(id) => format!("#blog/{id}"),
            Route::Posts => "#posts".to_owned(),
            Route::Status => "#status".to_owned(),
            Route::Profile => "#profile".to_owned(),
            Route::Shop => "#shop".to_owned(),
            Route::Login => "#login".to_owned(),
            Route::AdminLogin => "#adminlogin".to_owned(),
            Route::Register => "#register".to_owned(),
            Route::AdminDashboard => String::new(),
        }
    }
}

/// A section of the admin dashboard.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSection {
    Overview,
    Content,
    Styles,
    ManageBlogs,
    ManageUsers,
    ManageAdmins,
    ManageBadges,
    ConfigureSmtp,
    ModeratePosts,
}

impl DashboardSection {
    pub const ALL: [DashboardSection; 9] = [
        DashboardSection::Overview,
        DashboardSection::Content,
        DashboardSection::Styles,
        DashboardSection::ManageBlogs,
        DashboardSection::ManageUsers,
        DashboardSection::ManageAdmins,
        DashboardSection::ManageBadges,
        DashboardSection::ConfigureSmtp,
        DashboardSection::ModeratePosts,
    ];

    /// The permission needed to open this section.
    pub fn required_permission(&self) -> Option<Permission> {
        match self {
            DashboardSection::Overview => None,
            DashboardSection::Content => Some(Permission::ManageContent),
            DashboardSection::Styles => Some(Permission::ManageStyles),
            DashboardSection::ManageBlogs => Some(Permission::ManageBlogs),
            DashboardSection::ManageUsers => Some(Permission::ManageUsers),
            DashboardSection::ManageAdmins => Some(Permission::ManageAdmins),
            DashboardSection::ManageBadges => Some(Permission::ManageBadges),
            DashboardSection::ConfigureSmtp => Some(Permission::ConfigureSystem),
            DashboardSection::ModeratePosts => Some(Permission::ModeratePosts),
        }
    }

    /// Sections visible with the given permissions.
    pub fn visible(permissions: &Permissions) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|s| {
                s.required_permission()
                    .map_or(true, |p| permissions.contains(&p))
            })
            .collect()
    }
}

/// The outcome of resolving a location hash.
#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolved {
    /// A page that needs no entity.
    Page { route: Route },
    BlogPost { post: BlogPostView },
    /// The dashboard, opened at `section`.
    Dashboard {
        section: DashboardSection,
        password_prompt: bool,
    },
    /// The requested entity doesn't exist. Show `route` and replace the
    /// location hash with `hash`.
    Fallback { route: Route, hash: String },
    /// The viewer may not open the requested page.
    Redirect { route: Route, hash: String },
}

#[derive(Serialize, Deserialize)]
pub struct ResolveDescriptor {
    pub hash: String,
}
