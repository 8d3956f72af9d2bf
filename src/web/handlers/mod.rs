pub mod admin_applications;
pub mod admin_leads;
pub mod admin_posts;
pub mod admin_stats;
pub mod admin_taxonomy;
pub mod auth;
pub mod intake;
pub mod public_blog;
pub mod upload;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    public_blog::configure(cfg);
    intake::configure(cfg);
    auth::configure(cfg);
    // The fixed /api/admin/blog/upload path must register before the
    // /api/admin/blog/{id} routes or the id pattern swallows it.
    upload::configure(cfg);
    admin_posts::configure(cfg);
    admin_taxonomy::configure(cfg);
    admin_leads::configure(cfg);
    admin_applications::configure(cfg);
    admin_stats::configure(cfg);
}
