pub mod account;
pub mod badge;
pub mod blog;
pub mod media;
pub mod post;
pub mod route;
pub mod site;
